use clap::{Args, ValueEnum};
use payout_engine::error::AppError;
use payout_engine::workflows::payout::{PayoutEngine, RuleTable};
use payout_engine::workflows::pipeline::{calculate_report, RateCardReport};
use payout_engine::workflows::report::{ReportTable, COLUMNS};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

#[derive(Args, Debug)]
pub(crate) struct CalculateArgs {
    /// JSON file holding an array of extracted records
    #[arg(long)]
    pub(crate) records: PathBuf,
    /// Company name used for the report title
    #[arg(long, default_value = "Unknown Company")]
    pub(crate) company: String,
    /// How to print the calculated rows
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub(crate) format: OutputFormat,
    /// Also write the spreadsheet to this path
    #[arg(long)]
    pub(crate) xlsx: Option<PathBuf>,
}

pub(crate) fn run_calculate(args: CalculateArgs) -> Result<(), AppError> {
    let CalculateArgs {
        records,
        company,
        format,
        xlsx,
    } = args;

    let raw = std::fs::read_to_string(&records)?;
    let entries = parse_records(&raw)?;
    let RateCardReport { batch, report } =
        calculate_report(&PayoutEngine::default(), &entries, &company)?;

    match format {
        OutputFormat::Table => {
            print!("{}", render_table(&report.table));
            let metrics = &report.metrics;
            println!(
                "\n{} records | avg payin {:.1}% | {} segments | {} failed",
                metrics.total_records,
                metrics.avg_payin,
                metrics.unique_segments,
                batch.failed_count()
            );
        }
        OutputFormat::Json => println!("{}", report.json),
        OutputFormat::Csv => print!("{}", report.csv),
    }

    if let Some(path) = xlsx {
        std::fs::write(&path, &report.xlsx)?;
        eprintln!("Spreadsheet written to {}", path.display());
    }

    Ok(())
}

pub(crate) fn run_rules() {
    let views = RuleTable::standard().views();
    let rows = views
        .iter()
        .map(|view| vec![view.lob, view.segment, view.payout.as_str(), view.remarks]);
    print!("{}", align(&["LOB", "SEGMENT", "PO", "REMARKS"], rows));
}

/// Accepts either an array of records or a single record object.
fn parse_records(raw: &str) -> Result<Vec<Value>, AppError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|err| AppError::BadRequest(format!("records file is not valid JSON: {err}")))?;
    match value {
        Value::Array(entries) => Ok(entries),
        Value::Object(_) => Ok(vec![value]),
        other => Err(AppError::BadRequest(format!(
            "records file must hold an array of objects, got {other}"
        ))),
    }
}

fn render_table(table: &ReportTable) -> String {
    let mut out = format!("{}\n\n", table.title);
    out.push_str(&align(
        &COLUMNS,
        table.rows.iter().map(|row| row.cells().to_vec()),
    ));
    out
}

fn align<'a>(header: &[&'a str], rows: impl Iterator<Item = Vec<&'a str>>) -> String {
    let rows: Vec<Vec<&str>> = rows.collect();
    let mut widths: Vec<usize> = header.iter().map(|cell| cell.chars().count()).collect();
    for row in &rows {
        for (col, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(col) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut out = format_line(header, &widths);
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    out.push_str(&format!("{}\n", rule.join("  ")));
    for row in &rows {
        out.push_str(&format_line(row, &widths));
    }
    out
}

fn format_line(cells: &[&str], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    format!("{}\n", padded.join("  ").trim_end())
}

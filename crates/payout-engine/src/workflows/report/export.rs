use super::table::{ReportTable, COLUMNS};
use super::ReportError;
use rust_xlsxwriter::{Format, FormatAlign, Workbook};

const SHEET_NAME: &str = "Policy Data";
const TITLE_ROW: u32 = 0;
const HEADER_ROW: u32 = 2;
const FIRST_DATA_ROW: u32 = 3;

/// Header row plus data rows; the title stays out of the CSV.
pub(crate) fn to_csv(table: &ReportTable) -> Result<String, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(COLUMNS)?;
    for row in &table.rows {
        writer.write_record(row.cells())?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ReportError::Flush(err.error().to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

pub(crate) fn to_json(table: &ReportTable) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(&table.rows)?)
}

/// Title merged across the header width on the first row, header on the
/// third, data below.
pub(crate) fn to_xlsx(table: &ReportTable) -> Result<Vec<u8>, ReportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let title_format = Format::new()
        .set_bold()
        .set_font_size(14)
        .set_align(FormatAlign::Center);
    let header_format = Format::new().set_bold();

    let last_col = (COLUMNS.len() - 1) as u16;
    worksheet.merge_range(TITLE_ROW, 0, TITLE_ROW, last_col, &table.title, &title_format)?;

    let mut widths: Vec<usize> = COLUMNS.iter().map(|name| name.chars().count()).collect();
    for (col, header) in COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(HEADER_ROW, col as u16, *header, &header_format)?;
    }

    for (offset, row) in table.rows.iter().enumerate() {
        let row_num = FIRST_DATA_ROW + offset as u32;
        for (col, cell) in row.cells().iter().enumerate() {
            worksheet.write_string(row_num, col as u16, *cell)?;
            widths[col] = widths[col].max(cell.chars().count());
        }
    }

    for (col, width) in widths.into_iter().enumerate() {
        worksheet.set_column_width(col as u16, (width.min(60) + 2) as f64)?;
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::payout::PayoutEngine;
    use serde_json::json;

    fn table() -> ReportTable {
        let batch = PayoutEngine::default().calculate_batch(&[
            json!({ "segment": "TAXI", "policy_type": "TP", "location": "Pune, MH", "payin": 25 }),
            json!({ "segment": "1+5", "payin": 40, "remark": "new \"EV\"" }),
        ]);
        ReportTable::new("Digit", &batch)
    }

    #[test]
    fn csv_has_header_and_quoted_cells() {
        let csv = to_csv(&table()).expect("csv renders");
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("segment,policy type,location,payin,remark,Calculated Payout,Formula Used,Rule Explanation")
        );
        let first = lines.next().expect("first data row");
        assert!(first.starts_with("TAXI,TP,\"Pune, MH\",25.00%,,22.00%,-3%,"));
        let second = lines.next().expect("second data row");
        assert!(second.contains("\"new \"\"EV\"\"\""));
        assert!(lines.next().is_none());
    }

    #[test]
    fn json_is_an_array_of_rows() {
        let json = to_json(&table()).expect("json renders");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(value[1]["Calculated Payout"], "36.00%");
    }

    #[test]
    fn xlsx_buffer_is_a_zip_archive() {
        let bytes = to_xlsx(&table()).expect("xlsx renders");
        assert!(bytes.starts_with(b"PK"));
    }
}

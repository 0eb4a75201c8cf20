use crate::offline::{run_calculate, run_rules, CalculateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use payout_engine::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Rate Card Payout Engine",
    about = "Extract insurance rate cards and calculate broker payouts",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Calculate payouts for records already extracted to a JSON file
    Calculate(CalculateArgs),
    /// Print the payout rule table
    Rules,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Calculate(args) => run_calculate(args),
        Command::Rules => {
            run_rules();
            Ok(())
        }
    }
}

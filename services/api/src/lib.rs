mod cli;
mod infra;
mod offline;
mod routes;
mod server;

use payout_engine::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}

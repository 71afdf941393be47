mod cli;
mod commands;

use photo_sorter::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}

use crate::commands::{run_plan, run_sort, PlanArgs, SortArgs};
use clap::{Parser, Subcommand};
use photo_sorter::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "photo-sorter",
    about = "Copy photos into <archive>/<YYYY>. <MM> folders by their capture date",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Copy every source file into the dated archive (default command)
    Sort(SortArgs),
    /// Print where each file would go, as CSV, without copying anything
    Plan(PlanArgs),
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Sort(SortArgs::default()));

    match command {
        Command::Sort(args) => run_sort(args).await,
        Command::Plan(args) => run_plan(args).await,
    }
}

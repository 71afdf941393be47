use chrono::Local;
use clap::Args;
use photo_sorter::config::{AppConfig, ArchiveConfig};
use photo_sorter::error::AppError;
use photo_sorter::telemetry;
use photo_sorter::workflows::archive::{write_plan, ArchiveBatch, ArchiveError};
use std::fs::File;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct ArchiveOverrides {
    /// Source directory to sort; repeat to sort several (overrides SORTER_SOURCE_DIRS)
    #[arg(long)]
    pub(crate) source: Vec<PathBuf>,
    /// Archive root receiving the dated folders (overrides SORTER_ARCHIVE_ROOT)
    #[arg(long)]
    pub(crate) archive_root: Option<PathBuf>,
}

impl ArchiveOverrides {
    fn apply(self, config: &mut ArchiveConfig) {
        if !self.source.is_empty() {
            config.source_dirs = self.source;
        }
        if let Some(root) = self.archive_root {
            config.archive_root = root;
        }
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct SortArgs {
    #[command(flatten)]
    pub(crate) overrides: ArchiveOverrides,
}

#[derive(Args, Debug, Default)]
pub(crate) struct PlanArgs {
    #[command(flatten)]
    pub(crate) overrides: ArchiveOverrides,
    /// Write the CSV plan to this file instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

fn load_config(overrides: ArchiveOverrides) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    overrides.apply(&mut config.archive);
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

pub(crate) async fn run_sort(args: SortArgs) -> Result<(), AppError> {
    let config = load_config(args.overrides)?;
    info!(
        ?config.environment,
        sources = config.archive.source_dirs.len(),
        archive = %config.archive.archive_root.display(),
        "starting archive run"
    );

    let started = Local::now();
    let summary = ArchiveBatch::local(&config.archive).run().await?;
    let elapsed = Local::now() - started;

    println!(
        "Sorted {} file(s) in {:.1}s",
        summary.processed(),
        elapsed.num_milliseconds() as f64 / 1000.0
    );
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("Summary unavailable: {err}"),
    }

    Ok(())
}

pub(crate) async fn run_plan(args: PlanArgs) -> Result<(), AppError> {
    let PlanArgs { overrides, output } = args;
    let config = load_config(overrides)?;

    let decisions = ArchiveBatch::local(&config.archive).plan().await?;
    match output {
        Some(path) => {
            let file = File::create(&path)?;
            write_plan(&decisions, file).map_err(ArchiveError::from)?;
            info!(path = %path.display(), files = decisions.len(), "plan written");
        }
        None => write_plan(&decisions, std::io::stdout()).map_err(ArchiveError::from)?,
    }

    Ok(())
}

use std::env;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_EARLIEST_YEAR: i32 = 2002;
pub const DEFAULT_UNKNOWN_DIR: &str = "Unknown";

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub archive: ArchiveConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let source_dirs = parse_source_dirs(
            &env::var("SORTER_SOURCE_DIRS").unwrap_or_else(|_| "./dept".to_string()),
        );
        if source_dirs.is_empty() {
            return Err(ConfigError::NoSources);
        }

        let archive_root = PathBuf::from(
            env::var("SORTER_ARCHIVE_ROOT").unwrap_or_else(|_| "./ariv".to_string()),
        );
        let unknown_dir =
            env::var("SORTER_UNKNOWN_DIR").unwrap_or_else(|_| DEFAULT_UNKNOWN_DIR.to_string());

        let earliest_year = match env::var("SORTER_EARLIEST_YEAR") {
            Ok(raw) => raw
                .trim()
                .parse::<i32>()
                .map_err(|_| ConfigError::InvalidEarliestYear(raw))?,
            Err(_) => DEFAULT_EARLIEST_YEAR,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            archive: ArchiveConfig {
                source_dirs,
                archive_root,
                unknown_dir,
                earliest_year,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where photos are read from and where the dated tree is built.
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    pub source_dirs: Vec<PathBuf>,
    pub archive_root: PathBuf,
    pub unknown_dir: String,
    pub earliest_year: i32,
}

impl ArchiveConfig {
    pub fn new(source_dirs: Vec<PathBuf>, archive_root: impl Into<PathBuf>) -> Self {
        Self {
            source_dirs,
            archive_root: archive_root.into(),
            unknown_dir: DEFAULT_UNKNOWN_DIR.to_string(),
            earliest_year: DEFAULT_EARLIEST_YEAR,
        }
    }
}

fn parse_source_dirs(raw: &str) -> Vec<PathBuf> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    NoSources,
    InvalidEarliestYear(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoSources => {
                write!(f, "SORTER_SOURCE_DIRS must name at least one directory")
            }
            ConfigError::InvalidEarliestYear(raw) => {
                write!(f, "SORTER_EARLIEST_YEAR must be a year, got '{}'", raw)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

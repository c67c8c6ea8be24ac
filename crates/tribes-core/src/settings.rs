use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::CountMetric;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Pivot a tier membership export into a per-month member count report
#[derive(Parser, Debug, Clone)]
#[command(
    name = "tribes-report",
    about = "Pivot a tier membership export into a per-month member count report",
    version
)]
pub struct Settings {
    /// Membership export to read (columns: Date, Triber Username, Tier Price, Tier)
    pub input: Option<PathBuf>,

    /// Report file to write
    pub output: Option<PathBuf>,

    /// Further positional arguments are accepted and ignored
    #[arg(hide = true)]
    pub ignored: Vec<PathBuf>,

    /// Which distinct set each report cell counts
    #[arg(long, default_value = "members", value_parser = ["members", "annuals"])]
    pub count: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments. Exits on `--help`, `--version` or a
    /// malformed flag, as clap does.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Parse an explicit argument list (first element is the program name).
    pub fn load_from<I, T>(args: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Settings::try_parse_from(args).map(Self::resolve)
    }

    /// The usage line printed when the input or output path is missing.
    pub fn usage() -> String {
        Settings::command().render_usage().to_string()
    }

    /// Both positional paths, or `None` when either was not supplied.
    pub fn paths(&self) -> Option<(&Path, &Path)> {
        match (&self.input, &self.output) {
            (Some(input), Some(output)) => Some((input.as_path(), output.as_path())),
            _ => None,
        }
    }

    /// The selected count metric.
    pub fn count_metric(&self) -> Result<CountMetric> {
        self.count.parse()
    }

    /// `--debug` overrides the log level.
    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

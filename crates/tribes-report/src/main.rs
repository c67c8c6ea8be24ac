mod bootstrap;

use std::process::ExitCode;

use anyhow::{Context, Result};
use tribes_core::settings::Settings;
use tribes_data::analysis;

/// Exit status when the input or output path is missing.
const USAGE_EXIT_CODE: u8 = 2;

fn main() -> Result<ExitCode> {
    let settings = Settings::load();

    let Some((input, output)) = settings.paths() else {
        println!("{}", Settings::usage());
        return Ok(ExitCode::from(USAGE_EXIT_CODE));
    };

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Tribes Report v{} starting", env!("CARGO_PKG_VERSION"));

    let metric = settings.count_metric()?;
    tracing::debug!(
        "Input: {}, output: {}, counting: {}",
        input.display(),
        output.display(),
        metric
    );

    let summary = analysis::run(input, output, metric)
        .with_context(|| format!("could not build report from {}", input.display()))
        .map_err(|e| {
            tracing::error!("{:#}", e);
            e
        })?;

    tracing::debug!("Run summary: {:?}", summary);

    Ok(ExitCode::SUCCESS)
}

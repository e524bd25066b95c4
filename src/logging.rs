//! Log sink. The game owns the terminal, so log lines go to a file through `simplelog`.

use anyhow::{Context, Result};
use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::OpenOptions;
use std::path::Path;

/// Install the file logger. Appends to `path`, creating it if needed.
pub fn init(path: &Path, level: LevelFilter) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .build();
    WriteLogger::init(level, config, file).context("logger already installed")?;
    Ok(())
}

//! Validate command implementation

use crate::cli::logging::{detail, say};
use crate::config::{ConfigValidator, ExportConfig, ValidateArgs};
use fxpack_common::cli::styles;
use fxpack_common::{Cli, Result};

pub fn run_validate(args: &ValidateArgs, settings: &Cli) -> Result<()> {
    let config = ExportConfig::from_file(&args.config)?;
    ConfigValidator::validate(&config)?;

    say(settings, &styles::success("Configuration valid"));
    detail(settings, &config.to_yaml()?);
    Ok(())
}

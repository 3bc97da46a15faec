//! Fixture command implementation

use crate::cli::logging::say;
use crate::config::{FixtureArgs, InputConfig};
use crate::weights::{write_weights_file, FirmwareGeometry};
use fxpack_common::cli::styles;
use fxpack_common::{Cli, Result};

pub fn run_fixture(args: &FixtureArgs, settings: &Cli) -> Result<()> {
    let weights = args.fill().build(&FirmwareGeometry::FIRMWARE)?;
    write_weights_file(&args.output, &weights, &InputConfig::default())?;

    say(
        settings,
        &styles::success(&format!(
            "Wrote {} weights to {}",
            weights.num_params(),
            args.output.display()
        )),
    );
    Ok(())
}

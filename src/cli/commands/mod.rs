//! CLI command implementations

mod export;
mod fixture;
mod validate;
mod verify;

#[cfg(test)]
mod tests;

use crate::config::{Cli, Command};
use fxpack_common::Result;

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<()> {
    let settings = cli.common.to_cli();

    match cli.command {
        Command::Export(args) => export::run_export(&args, &settings),
        Command::Verify(args) => verify::run_verify(&args, &settings),
        Command::Fixture(args) => fixture::run_fixture(&args, &settings),
        Command::Validate(args) => validate::run_validate(&args, &settings),
    }
}

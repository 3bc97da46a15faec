//! fxpack CLI
//!
//! # Usage
//!
//! ```bash
//! # Quantize and pack a trained model
//! fxpack export --weights digits_tiny_dsconv.safetensors --output artifacts
//!
//! # Same, from a config file, failing unless the bytes match a reference
//! fxpack export --config export.yaml --expect-manifest golden/manifest.json
//!
//! # Check an SD-card image before flashing
//! fxpack verify --dir /media/sd/assets --manifest golden/manifest.json
//! ```

use clap::Parser;
use fxpack::cli::{init_logging, run_command, Cli};
use fxpack_common::cli::styles;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = cli.common.to_cli();
    init_logging(&settings);

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", styles::error(&format!("[{}] {e}", e.code())));
            ExitCode::FAILURE
        }
    }
}

//! Verify command implementation

use crate::cli::logging::say;
use crate::config::VerifyArgs;
use crate::integrity::{verify_dir, Manifest};
use fxpack_common::cli::styles;
use fxpack_common::{Cli, OutputFormat, Result};

pub fn run_verify(args: &VerifyArgs, settings: &Cli) -> Result<()> {
    let expected = Manifest::load(&args.manifest)?;
    let actual = verify_dir(&args.dir, &expected)?;

    match settings.format {
        OutputFormat::Json => println!("{}", actual.to_json()?),
        OutputFormat::Text => {
            if !settings.is_quiet() {
                print!("{}", actual.render());
            }
            say(
                settings,
                &styles::success(&format!(
                    "{} matches {}",
                    args.dir.display(),
                    args.manifest.display()
                )),
            );
        }
    }
    Ok(())
}

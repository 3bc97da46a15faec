//! Export command implementation

use crate::cli::logging::{detail, say};
use crate::config::ExportArgs;
use crate::pipeline::{ExportPipeline, ExportReport};
use crate::quant::QuantStats;
use fxpack_common::cli::styles;
use fxpack_common::{Cli, FxError, OutputFormat, Result};

fn format_stats(label: &str, stats: &QuantStats) -> String {
    format!(
        "  {label}: {} weights, {} saturated, max error {:.6}",
        stats.len, stats.saturated, stats.max_abs_error
    )
}

/// Operator summary printed before flashing.
fn print_text_report(report: &ExportReport, settings: &Cli) {
    let params = &report.calibration.params;

    say(settings, &format!("Chosen w_scale = {:.9} (w_zp={})", params.scale, params.zero_point));
    if report.calibration.fallback {
        say(
            settings,
            &styles::warning("All weights are ~0; fallback scale used. Check the trained model."),
        );
    }
    say(settings, &styles::info(&params.firmware_constants()));

    detail(settings, &format!("  Max |w|: {:.9}", report.calibration.observed_max_abs));
    detail(settings, &format_stats("Depthwise", &report.depthwise_stats));
    detail(settings, &format_stats("Pointwise", &report.pointwise_stats));
    detail(settings, &format!("  Sample seed: {}", report.sample_seed));

    if !settings.is_quiet() {
        print!("{}", report.manifest.render());
    }

    if report.verified {
        say(settings, &styles::success("Artifacts match reference manifest"));
    }
    say(
        settings,
        &styles::success(&format!(
            "Done. Artifacts in {} ({:.3}s)",
            report.output_dir.display(),
            report.duration_seconds
        )),
    );
}

pub fn run_export(args: &ExportArgs, settings: &Cli) -> Result<()> {
    let config = args.resolve_config()?;
    if settings.format == OutputFormat::Text {
        say(settings, &styles::header("fxpack export"));
    }

    let report = ExportPipeline::new(&config).execute()?;

    match settings.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report).map_err(|e| FxError::Serialization {
                message: format!("JSON serialization failed: {e}"),
            })?;
            println!("{json}");
        }
        OutputFormat::Text => print_text_report(&report, settings),
    }

    Ok(())
}

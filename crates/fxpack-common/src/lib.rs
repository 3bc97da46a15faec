//! Shared infrastructure for fxpack CLI tools.
//!
//! - Error handling with actionable diagnostics
//! - Common CLI flags (verbosity, output format)
//! - Console styling

pub mod cli;
pub mod error;

pub use cli::{Cli, CommonArgs, OutputFormat, Verbosity};
pub use error::{FxError, Result};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_has_actionable_message() {
        let err = FxError::ConfigNotFound { path: "/path/to/export.yaml".into() };
        let msg = err.to_string();
        assert!(msg.contains("export.yaml"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn test_output_format_parsing() {
        assert!(matches!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json)));
        assert!(matches!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text)));
        assert!("table".parse::<OutputFormat>().is_err());
    }
}

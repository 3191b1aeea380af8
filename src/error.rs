// src/error.rs
//! Error types for the crossgrade library

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by library operations
#[derive(Error, Debug)]
pub enum Error {
    /// A required input artifact (inventory report, archive, dump) is absent.
    /// Fatal to the action that needs it.
    #[error("missing required input file: {0}")]
    MissingInput(PathBuf),

    /// An external tool could not be spawned at all
    #[error("failed to run {tool}: {source}")]
    Tool {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// An external tool ran but exited with failure
    #[error("{tool} exited with failure: {detail}")]
    ToolFailed { tool: String, detail: String },

    /// Configuration file problem
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_names_the_file() {
        let err = Error::MissingInput(PathBuf::from("/var/lib/crossgrade/inventory-report.txt"));
        let text = err.to_string();
        assert!(text.contains("missing required input file"));
        assert!(text.contains("inventory-report.txt"));
    }

    #[test]
    fn tool_failure_carries_tool_and_detail() {
        let err = Error::ToolFailed {
            tool: "pg_createcluster".to_string(),
            detail: "initdb failed".to_string(),
        };
        assert_eq!(err.to_string(), "pg_createcluster exited with failure: initdb failed");
    }

    #[test]
    fn io_errors_convert_via_question_mark() {
        fn read() -> Result<String> {
            Ok(std::fs::read_to_string("/nonexistent/crossgrade-io-probe")?)
        }
        assert!(matches!(read().unwrap_err(), Error::Io(_)));
    }
}

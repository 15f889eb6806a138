//! Structured diagnostic context for failure logs

use serde::Serialize;
use std::error::Error as StdError;

/// Which configuration values were available when a failure happened
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigPresence {
    pub session_path: String,
    pub session_file_present: bool,
    pub api_id_set: bool,
    pub api_hash_set: bool,
}

/// Description of an error and its cause chain
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    /// Error variant name
    pub kind: String,
    /// Top-level message
    pub message: String,
    /// Messages of every `source()` below the top-level error
    pub chain: Vec<String>,
}

impl ErrorReport {
    pub fn new(kind: impl Into<String>, err: &(dyn StdError + 'static)) -> Self {
        let mut chain = Vec::new();
        let mut cause = err.source();
        while let Some(inner) = cause {
            chain.push(inner.to_string());
            cause = inner.source();
        }

        Self {
            kind: kind.into(),
            message: err.to_string(),
            chain,
        }
    }
}

/// Payload of the `diagnostic_info` log field
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticInfo {
    pub error: ErrorReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<ConfigPresence>,
}

impl DiagnosticInfo {
    pub fn new(error: ErrorReport) -> Self {
        Self {
            error,
            config: None,
        }
    }

    pub fn with_config(mut self, presence: ConfigPresence) -> Self {
        self.config = Some(presence);
        self
    }

    /// Render as a single-line JSON string for log fields
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|e| format!("{{\"serialization_error\":\"{}\"}}", e))
    }
}

//! Error types for session configuration and processing.

use recomp_store::StoreError;

/// Errors that can occur when loading or validating a `recomp.toml`
/// session configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(String),
}

/// Errors that abort a session-level operation.
///
/// Per-unit modeling failures never appear here — they are isolated to the
/// affected unit and reported as "fully changed" in its
/// [`UnitOutcome`](crate::UnitOutcome).
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The snapshot store failed on a write path.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Session configuration failed to load.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An external collaborator process failed or produced no usable
    /// output. Callers degrade to "no data available" rather than abort.
    #[error("external tool '{tool}' failed: {reason}")]
    ExternalTool {
        /// Name of the failing collaborator.
        tool: String,
        /// Description of the failure.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_tool_display() {
        let err = SessionError::ExternalTool {
            tool: "dep-resolver".to_string(),
            reason: "exit code 2".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("dep-resolver"));
        assert!(msg.contains("exit code 2"));
    }

    #[test]
    fn config_missing_field_display() {
        let err = ConfigError::MissingField("tracker.snapshot_dir".to_string());
        assert!(err.to_string().contains("tracker.snapshot_dir"));
    }

    #[test]
    fn store_error_converts() {
        let err: SessionError = StoreError::corrupt("bad tag").into();
        assert!(matches!(err, SessionError::Store(_)));
    }
}

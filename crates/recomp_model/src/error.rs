//! Error types for signature construction.

/// Errors that can occur while building the type or signature model from
/// raw compiler output.
///
/// These errors are fatal for the affected compiled unit but never for the
/// whole build session: the session driver treats a unit that fails to
/// model as fully changed (conservative) and moves on.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// A type or method descriptor could not be parsed.
    #[error("malformed descriptor '{descriptor}': {reason}")]
    MalformedDescriptor {
        /// The descriptor text that failed to parse.
        descriptor: String,
        /// Description of the parse failure.
        reason: String,
    },

    /// A raw modifier bitset contained bits outside the recognized
    /// access/modifier flags.
    #[error("unrecognized access flag bits {bits:#06x}")]
    UnrecognizedFlags {
        /// The offending raw bitset.
        bits: u16,
    },
}

impl ModelError {
    /// Creates a [`ModelError::MalformedDescriptor`] for the given text.
    pub fn malformed(descriptor: &str, reason: impl Into<String>) -> Self {
        Self::MalformedDescriptor {
            descriptor: descriptor.to_string(),
            reason: reason.into(),
        }
    }
}

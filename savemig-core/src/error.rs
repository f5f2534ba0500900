//! Error types for the save-conversion library.

use thiserror::Error;

use crate::version::Version;

/// Top-level error type for all save-conversion operations.
#[derive(Error, Debug)]
pub enum SaveError {
    /// A conversion targets a slot the save record does not contain.
    #[error("Save data does not have slot `{slot}`")]
    MissingSlot {
        /// Name of the missing slot.
        slot: String,
    },

    /// A slot exists but its value has an unexpected shape.
    #[error("Slot `{slot}` is malformed: {reason}")]
    MalformedSlot {
        /// Name of the malformed slot.
        slot: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A strict game-data lookup found no entry for a legacy reference.
    #[error("Unresolvable {kind} reference: {reference}")]
    UnresolvableReference {
        /// Which registry was consulted ("item", "species", "trainer type").
        kind: &'static str,
        /// The reference as it appeared in the save.
        reference: String,
    },

    /// A registered conversion failed; earlier conversions stay applied.
    #[error("Conversion `{step}` failed: {source}")]
    Conversion {
        /// Name of the failing conversion.
        step: String,
        /// The underlying failure.
        #[source]
        source: Box<SaveError>,
    },

    /// A conversion with the same name is already registered.
    #[error("Conversion `{0}` is already registered")]
    DuplicateConversion(String),

    /// The save was stamped by a newer engine than the one running.
    #[error("Save version {found} is newer than supported version {supported}")]
    NewerSave {
        /// Stamp found in the save.
        found: Version,
        /// Version of the running engine or game.
        supported: Version,
    },

    /// A version string could not be parsed.
    #[error("Invalid version `{0}`")]
    InvalidVersion(String),

    /// Free-form failure raised by a content-authored transform.
    #[error("Transform failed: {0}")]
    Transform(String),

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SaveError {
    /// Name of the conversion that failed, if this error came out of a run.
    #[must_use]
    pub fn failed_step(&self) -> Option<&str> {
        match self {
            Self::Conversion { step, .. } => Some(step),
            _ => None,
        }
    }
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, SaveError>;

//! Error handling for Shapemod
//!
//! Provides the error taxonomy shared by every layer of the modifier engine:
//! - Processor errors (a single array/boolean processor rejected its input)
//! - Modifier errors (a specific modifier failed on a specific shape)
//! - Boolean errors (polygon combine failed)
//! - Materialization errors (virtual to real conversion failed)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Processor error type
///
/// Raised by a modifier processor when its settings or its input cannot
/// produce a valid instance list.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessorError {
    /// Settings are structurally invalid (zero counts, empty grids)
    #[error("Invalid {modifier} settings: {reason}")]
    InvalidSettings {
        /// The modifier kind whose settings were rejected.
        modifier: String,
        /// Why the settings were rejected.
        reason: String,
    },

    /// A numeric setting is NaN or infinite
    #[error("Non-finite value for '{field}' in {modifier} settings")]
    NonFinite {
        /// The modifier kind.
        modifier: String,
        /// The offending field name.
        field: String,
    },

    /// The modifier would produce more instances than allowed
    #[error("Instance limit exceeded: {requested} requested, limit is {limit}")]
    InstanceLimit {
        /// The number of instances the modifier would produce.
        requested: usize,
        /// The configured maximum.
        limit: usize,
    },

    /// An instance refers to a shape the engine cannot resolve
    #[error("Source shape {shape_id} not found")]
    MissingShape {
        /// The unresolved shape id.
        shape_id: String,
    },
}

/// Modifier error type
///
/// Carries the modifier and shape a failure belongs to so the host can log
/// and report it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModifierError {
    /// A specific modifier failed while processing a specific shape
    #[error("Modifier {modifier_type} ({modifier_id}) failed on shape {shape_id}: {source}")]
    Processing {
        /// The modifier id.
        modifier_id: String,
        /// The modifier kind, e.g. `linear-array`.
        modifier_type: String,
        /// The source shape id.
        shape_id: String,
        /// The processor failure that caused it.
        #[source]
        source: ProcessorError,
    },

    /// A boolean combine failed
    #[error("Boolean {operation} failed over {instance_ids:?}: {reason}")]
    BooleanOperation {
        /// The boolean operation name.
        operation: String,
        /// The participating virtual instance ids.
        instance_ids: Vec<String>,
        /// The failure reason.
        reason: String,
    },

    /// Virtual instances could not be turned into host shapes
    #[error("Materialization failed for shape {shape_id}: {reason}")]
    Materialization {
        /// The source shape id.
        shape_id: String,
        /// The failure reason.
        reason: String,
    },
}

impl ModifierError {
    /// The shape id the failure relates to, when known
    pub fn shape_id(&self) -> Option<&str> {
        match self {
            ModifierError::Processing { shape_id, .. }
            | ModifierError::Materialization { shape_id, .. } => Some(shape_id),
            ModifierError::BooleanOperation { .. } => None,
        }
    }
}

/// Main error type for Shapemod
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Modifier error
    #[error(transparent)]
    Modifier(#[from] ModifierError),

    /// Processor error raised outside a modifier boundary
    #[error(transparent)]
    Processor(#[from] ProcessorError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a boolean combine error
    pub fn is_boolean_error(&self) -> bool {
        matches!(self, Error::Modifier(ModifierError::BooleanOperation { .. }))
    }

    /// Check if this is a materialization error
    pub fn is_materialization_error(&self) -> bool {
        matches!(self, Error::Modifier(ModifierError::Materialization { .. }))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

/// Result type for processor calls
pub type ProcessorResult<T> = std::result::Result<T, ProcessorError>;

//! # Shapemod Core
//!
//! Core types and error handling for Shapemod.
//! Provides the error taxonomy, identifier aliases and shared-state helpers
//! used by the settings and engine crates.

pub mod constants;
pub mod error;
pub mod types;

pub use error::{Error, ModifierError, ProcessorError, ProcessorResult, Result};

pub use types::{thread_safe, ModifierId, ShapeId, ThreadSafe};

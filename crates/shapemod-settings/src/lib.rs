//! Shapemod Settings Crate
//!
//! Handles engine configuration: error recovery, instance limits, geometry
//! fidelity and cache sizing, loaded from JSON or TOML.

pub mod config;
pub mod error;

pub use config::{
    CacheSettings, EngineSettings, GeometrySettings, ProcessingSettings, RecoveryStrategy,
    ReferencePoint,
};
pub use error::{SettingsError, SettingsResult};

//! # Shapemod
//!
//! Procedural modifiers for 2D vector drawing surfaces. A shape carries an
//! ordered stack of modifiers:
//! - Linear, circular and grid arrays
//! - Mirror across a vertical or horizontal line
//! - Boolean combine (union, subtract, intersect, exclude)
//!
//! The engine evaluates the stack into virtual instances and hands the host
//! a minimal create/update/delete diff of derived shapes.
//!
//! ## Architecture
//!
//! Shapemod is organized as a workspace with multiple crates:
//!
//! 1. **shapemod-core** - Error taxonomy, id aliases, shared-state helpers
//! 2. **shapemod-settings** - Engine configuration (JSON/TOML), recovery strategy
//! 3. **shapemod-engine** - Geometry, processors, composer, booleans, materialization
//! 4. **shapemod** - This facade
//!
//! ## Example
//!
//! ```rust,ignore
//! use shapemod::{
//!     DefaultShapeHost, EngineSettings, LinearArraySettings, Modifier, ModifierCaches,
//!     ShapeKind, ShapeRecord, TransformComposer,
//! };
//!
//! shapemod::init_logging()?;
//! let settings = EngineSettings::default();
//! let caches = ModifierCaches::new(&settings);
//! let composer = TransformComposer::new(&settings, &caches);
//!
//! let shape = ShapeRecord::new("shape:a", ShapeKind::Rectangle, 0.0, 0.0, 100.0, 50.0);
//! let stack = vec![Modifier::new("row", 0, LinearArraySettings::new(4, 120.0, 0.0))];
//! let diff = composer.evaluate(&shape, &stack, None, &DefaultShapeHost)?;
//! ```

pub use shapemod_core::{Error, ModifierError, ProcessorError, Result};
pub use shapemod_engine as engine;
pub use shapemod_settings as settings;

pub use shapemod_engine::{
    BooleanOperation, BooleanSettings, CircularArraySettings, DefaultShapeHost,
    GridArraySettings, GroupContext, LinearArraySettings, MaterializationDiff, MirrorAxis,
    MirrorSettings, Modifier, ModifierCaches, ModifierKind, ModifierSettings, ShapeHost,
    ShapeKind, ShapeRecord, ShapeUpdate, TransformComposer, VirtualInstance,
    VirtualModifierState,
};
pub use shapemod_settings::{EngineSettings, RecoveryStrategy, ReferencePoint};

/// Initialize logging with tracing
///
/// Sets up structured logging with:
/// - Console output with timestamps
/// - Thread IDs and names for debugging
/// - RUST_LOG environment variable support
///
/// Calling it again once a subscriber is installed returns an error.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "logging initialized");
    Ok(())
}

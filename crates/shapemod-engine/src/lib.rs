//! # Shapemod Engine
//!
//! Procedural modifiers for 2D vector shapes. Given one source shape and an
//! ordered stack of modifiers (linear, circular and grid arrays, mirror,
//! boolean combine), the engine computes every derived placement the stack
//! implies as lightweight virtual instances, and only at the end turns them
//! into shape create/update/delete operations for the host document.
//!
//! ## Architecture
//!
//! ```text
//! TransformComposer (fold over the enabled stack)
//!   ├── Processors (linear, circular, grid, mirror)
//!   │     └── UnifiedCompositionHandler (formations, collective bounds)
//!   ├── BooleanProcessor (plan now, execute at materialization)
//!   │     └── BooleanCache / InstanceStorage
//!   └── Materializer (ordinal diff against MaterializedShapes)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shapemod_engine::{DefaultShapeHost, LinearArraySettings, Modifier, ModifierCaches,
//!     ShapeKind, ShapeRecord, TransformComposer};
//! use shapemod_settings::EngineSettings;
//!
//! let settings = EngineSettings::default();
//! let caches = ModifierCaches::new(&settings);
//! let composer = TransformComposer::new(&settings, &caches);
//!
//! let shape = ShapeRecord::new("shape:a", ShapeKind::Rectangle, 0.0, 0.0, 100.0, 100.0);
//! let stack = vec![Modifier::new("m1", 0, LinearArraySettings::new(3, 150.0, 0.0))];
//! let diff = composer.evaluate(&shape, &stack, None, &DefaultShapeHost)?;
//! ```

pub mod boolean;
pub mod cache;
pub mod composer;
pub mod context;
pub mod geometry;
pub mod host;
pub mod materialize;
pub mod model;
pub mod perf;
pub mod processors;
pub mod unified;

pub use boolean::{BooleanExecutor, BooleanGeometry, BooleanPlan, BooleanProcessor};
pub use cache::{
    BooleanCache, CacheStats, InstanceStorage, MaterializedEntry, MaterializedShapes,
    ModifierCaches,
};
pub use composer::TransformComposer;
pub use context::{ProcessContext, ReferenceFrame};
pub use geometry::{Affine2, Bounds, Point};
pub use host::{DefaultShapeHost, ShapeHost};
pub use materialize::{MaterializationDiff, Materializer};
pub use model::{
    BooleanOperation, BooleanSettings, CircularArraySettings, GridArraySettings, GroupContext,
    LinearArraySettings, MirrorAxis, MirrorSettings, Modifier, ModifierKind, ModifierMeta,
    ModifierSettings, Pose, ShapeKind, ShapeMeta, ShapeProps, ShapeRecord, ShapeStyle,
    ShapeUpdate, VirtualInstance, VirtualModifierState,
};
pub use perf::ModifierTiming;
pub use processors::{
    CircularArrayProcessor, GridArrayProcessor, LinearArrayProcessor, MirrorProcessor,
    ModifierProcessor,
};
pub use unified::{CollectiveBounds, UnifiedCompositionHandler};

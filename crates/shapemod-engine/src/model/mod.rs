//! # Data Model
//!
//! Host shapes, modifiers, virtual instances and the state threaded through a
//! modifier stack.

mod instance;
mod modifier;
mod shape;
mod state;

pub use instance::{BaseMeta, InstanceMeta, IntendedTransform, ModifierMeta, Pose, VirtualInstance};
pub use modifier::{
    BooleanOperation, BooleanSettings, CircularArraySettings, GridArraySettings,
    LinearArraySettings, MirrorAxis, MirrorSettings, Modifier, ModifierKind, ModifierSettings,
};
pub use shape::{ShapeKind, ShapeMeta, ShapeProps, ShapeRecord, ShapeStyle, ShapeUpdate};
pub use state::{AppliedModifier, FailedModifier, GroupContext, StateMetadata, VirtualModifierState};

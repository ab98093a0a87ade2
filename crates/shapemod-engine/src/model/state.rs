//! Working state threaded through the modifier fold.

use serde::{Deserialize, Serialize};
use shapemod_core::{ModifierId, ShapeId};
use shapemod_settings::RecoveryStrategy;

use super::instance::VirtualInstance;
use super::modifier::ModifierKind;
use super::shape::ShapeRecord;
use crate::geometry::{Affine2, Bounds, Point};
use crate::perf::ModifierTiming;

/// Document group the source shape belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupContext {
    pub group_center: Point,
    pub group_top_left: Point,
    pub group_bounds: Bounds,
    pub group_shapes: Vec<ShapeRecord>,
    #[serde(default)]
    pub group_transform: Affine2,
}

impl GroupContext {
    /// Builds the context from the member shapes' page bounds.
    ///
    /// Returns `None` for an empty group.
    pub fn from_shapes(shapes: Vec<ShapeRecord>) -> Option<Self> {
        let bounds = shapes
            .iter()
            .map(ShapeRecord::page_bounds)
            .reduce(|acc, b| acc.union(&b))?;
        Some(Self {
            group_center: bounds.center(),
            group_top_left: bounds.top_left(),
            group_bounds: bounds,
            group_shapes: shapes,
            group_transform: Affine2::identity(),
        })
    }

    pub fn shape(&self, id: &str) -> Option<&ShapeRecord> {
        self.group_shapes.iter().find(|s| s.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedModifier {
    pub modifier_id: ModifierId,
    pub kind: ModifierKind,
    pub generation_level: u32,
    pub instances_out: usize,
}

/// A modifier that failed and how the failure was absorbed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedModifier {
    pub modifier_id: ModifierId,
    pub kind: ModifierKind,
    pub generation_level: u32,
    pub error: String,
    pub recovery: RecoveryStrategy,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateMetadata {
    pub applied: Vec<AppliedModifier>,
    pub timings: Vec<ModifierTiming>,
    pub failures: Vec<FailedModifier>,
    /// Instances consumed by boolean modifiers
    pub retired: Vec<VirtualInstance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualModifierState {
    pub original_shape: ShapeRecord,
    pub virtual_instances: Vec<VirtualInstance>,
    pub base_transform: Affine2,
    pub metadata: StateMetadata,
}

impl VirtualModifierState {
    /// Single `Original` instance at generation 0
    pub fn initial(shape: &ShapeRecord) -> Self {
        let original = VirtualInstance::original(shape);
        Self {
            original_shape: shape.clone(),
            base_transform: original.transform.matrix,
            virtual_instances: vec![original],
            metadata: StateMetadata::default(),
        }
    }

    pub fn source_shape_id(&self) -> &ShapeId {
        &self.original_shape.id
    }

    /// Every instance that turns into a host shape, in output order
    pub fn derived_instances(&self) -> impl Iterator<Item = &VirtualInstance> {
        self.virtual_instances.iter().filter(|i| !i.is_original())
    }

    pub fn has_boolean_result(&self) -> bool {
        self.virtual_instances
            .iter()
            .any(|i| i.boolean_plan().is_some())
    }

    /// Retired inputs of one boolean modifier
    pub fn retired_for<'a>(
        &'a self,
        boolean_group_id: &'a str,
    ) -> impl Iterator<Item = &'a VirtualInstance> + 'a {
        self.metadata
            .retired
            .iter()
            .filter(move |i| i.meta.base.boolean_group_id.as_deref() == Some(boolean_group_id))
    }
}

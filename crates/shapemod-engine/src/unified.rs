//! # Unified Composition
//!
//! Decides when the instances coming out of earlier modifiers form one rigid
//! formation, and measures that formation.

use crate::context::instance_half_extents;
use crate::geometry::{oriented_bounds, Bounds, Point};
use crate::model::{GroupContext, ShapeRecord, VirtualInstance};

/// Axis-aligned envelope of a formation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectiveBounds {
    pub bounds: Bounds,
    pub center: Point,
}

pub struct UnifiedCompositionHandler;

impl UnifiedCompositionHandler {
    /// `true` when the next modifier must treat `instances` as one formation:
    /// any group member, or at least two derived (non-original) instances.
    pub fn should_use_unified_composition(instances: &[VirtualInstance]) -> bool {
        if instances.iter().any(VirtualInstance::is_group_member) {
            tracing::trace!("unified composition: group members present");
            return true;
        }

        let derived = instances.iter().filter(|i| !i.is_original()).count();
        let unified = derived >= 2;
        if unified {
            tracing::trace!(derived, "unified composition: derived formation");
        }
        unified
    }

    /// Union of every instance's oriented bounding box.
    ///
    /// Min/max folding makes the result independent of instance order. An
    /// empty list measures the original shape.
    pub fn calculate_collective_bounds(
        instances: &[VirtualInstance],
        original_shape: &ShapeRecord,
        group: Option<&GroupContext>,
    ) -> CollectiveBounds {
        let bounds = instances
            .iter()
            .map(|instance| {
                let shape = group
                    .and_then(|g| g.shape(&instance.source_shape_id))
                    .unwrap_or(original_shape);
                let (hw, hh) = instance_half_extents(instance, shape);
                oriented_bounds(instance.center(), hw, hh, instance.rotation())
            })
            .reduce(|acc, b| acc.union(&b))
            .unwrap_or_else(|| original_shape.page_bounds());

        CollectiveBounds {
            center: bounds.center(),
            bounds,
        }
    }
}

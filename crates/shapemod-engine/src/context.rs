//! # Processing Context
//!
//! Everything a processor may consult besides its own settings and input
//! instances: the source shape, the optional document group, the engine
//! settings and the host-owned caches.

use shapemod_core::constants::MIN_REFERENCE_EXTENT;
use shapemod_core::{ProcessorError, ProcessorResult};
use shapemod_settings::EngineSettings;

use crate::cache::ModifierCaches;
use crate::geometry::Point;
use crate::model::{GroupContext, ShapeRecord, VirtualInstance};
use crate::unified::UnifiedCompositionHandler;

/// Pivot and reference size that percentages resolve against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceFrame {
    pub pivot: Point,
    pub width: f64,
    pub height: f64,
}

impl ReferenceFrame {
    pub fn new(pivot: Point, width: f64, height: f64) -> Self {
        Self {
            pivot,
            width: width.max(MIN_REFERENCE_EXTENT),
            height: height.max(MIN_REFERENCE_EXTENT),
        }
    }

    pub fn with_pivot(mut self, pivot: Point) -> Self {
        self.pivot = pivot;
        self
    }

    /// `percent` of the reference width
    pub fn percent_x(&self, percent: f64) -> f64 {
        self.width * percent / 100.0
    }

    pub fn percent_y(&self, percent: f64) -> f64 {
        self.height * percent / 100.0
    }
}

pub struct ProcessContext<'a> {
    pub original_shape: &'a ShapeRecord,
    pub group: Option<&'a GroupContext>,
    /// 1-based index of the running modifier in the enabled stack
    pub generation_level: u32,
    pub modifier_id: &'a str,
    pub settings: &'a EngineSettings,
    pub caches: &'a ModifierCaches,
}

impl<'a> ProcessContext<'a> {
    /// Looks up the shape an instance was derived from.
    pub fn resolve_shape(&self, shape_id: &str) -> ProcessorResult<&'a ShapeRecord> {
        if self.original_shape.id == shape_id {
            return Ok(self.original_shape);
        }
        self.group
            .and_then(|g| g.shape(shape_id))
            .ok_or_else(|| ProcessorError::MissingShape {
                shape_id: shape_id.to_string(),
            })
    }

    /// Source shape center under its own rotation, or the group center.
    /// Upstream modifiers never move it.
    pub fn stable_center(&self) -> Point {
        match self.group {
            Some(group) => group.group_center,
            None => self.original_shape.center(),
        }
    }

    /// Frame of a single instance expanded on its own
    pub fn individual_frame(&self, instance: &VirtualInstance) -> ProcessorResult<ReferenceFrame> {
        if let Some(group) = self.group {
            return Ok(ReferenceFrame::new(
                group.group_center,
                group.group_bounds.width(),
                group.group_bounds.height(),
            ));
        }
        let shape = self.resolve_shape(&instance.source_shape_id)?;
        let (hw, hh) = instance_half_extents(instance, shape);
        Ok(ReferenceFrame::new(instance.center(), hw * 2.0, hh * 2.0))
    }

    /// Frame of a whole formation: its collective bounds and their center
    pub fn collective_frame(&self, instances: &[VirtualInstance]) -> ReferenceFrame {
        let collective = UnifiedCompositionHandler::calculate_collective_bounds(
            instances,
            self.original_shape,
            self.group,
        );
        ReferenceFrame::new(
            collective.center,
            collective.bounds.width(),
            collective.bounds.height(),
        )
    }

    pub fn ensure_capacity(&self, requested: usize) -> ProcessorResult<()> {
        let limit = self.settings.processing.max_instances;
        if requested > limit {
            return Err(ProcessorError::InstanceLimit { requested, limit });
        }
        Ok(())
    }

    /// Unique instance id for the `index`-th output of the running modifier
    pub fn instance_id(&self, index: usize) -> String {
        format!("{}#{}", self.modifier_id, index)
    }
}

/// Unrotated half size of an instance, including its own scale.
///
/// Boolean results take the size of the formation that fed them.
pub fn instance_half_extents(instance: &VirtualInstance, shape: &ShapeRecord) -> (f64, f64) {
    let (w, h) = match instance.boolean_plan() {
        Some(plan) => (
            plan.collective_bounds.width().max(MIN_REFERENCE_EXTENT),
            plan.collective_bounds.height().max(MIN_REFERENCE_EXTENT),
        ),
        None => shape.local_size(),
    };
    (
        w * instance.scale_x().abs() / 2.0,
        h * instance.scale_y().abs() / 2.0,
    )
}

//! Queries the engine makes against the host document.

use shapemod_core::constants::MIN_REFERENCE_EXTENT;
use shapemod_core::ShapeId;
use uuid::Uuid;

use crate::geometry::Bounds;
use crate::model::ShapeRecord;

/// Read-only services of the host document model
pub trait ShapeHost {
    /// Page-space bounding box of `shape`, when the host can measure it
    fn page_bounds(&self, shape: &ShapeRecord) -> Option<Bounds> {
        Some(shape.page_bounds())
    }

    /// Unrotated size of `shape`: its record size, else the host's
    /// measurement, never below 1×1.
    fn local_size(&self, shape: &ShapeRecord) -> (f64, f64) {
        let (w, h) = shape
            .dimensions()
            .or_else(|| self.page_bounds(shape).map(|b| (b.width(), b.height())))
            .unwrap_or((MIN_REFERENCE_EXTENT, MIN_REFERENCE_EXTENT));
        (w.max(MIN_REFERENCE_EXTENT), h.max(MIN_REFERENCE_EXTENT))
    }

    /// A fresh, unique shape id
    fn create_shape_id(&self) -> ShapeId {
        format!("shape:{}", Uuid::new_v4())
    }
}

/// Host that measures shapes from their records and hands out UUID ids
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultShapeHost;

impl ShapeHost for DefaultShapeHost {}

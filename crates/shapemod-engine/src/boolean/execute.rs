//! Plan execution: shape outlines into `csgrs` sketches, folded with the
//! planned operator.

use csgrs::sketch::Sketch;
use csgrs::traits::CSG;
use shapemod_core::ModifierError;
use shapemod_settings::EngineSettings;
use std::sync::Arc;

use super::BooleanPlan;
use crate::cache::ModifierCaches;
use crate::geometry::outline::shape_outline;
use crate::geometry::{Affine2, Bounds, Point, Ring};
use crate::host::ShapeHost;
use crate::model::{BooleanOperation, GroupContext, ShapeRecord, VirtualInstance, VirtualModifierState};

/// One polygon of a boolean result, page space
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonRings {
    pub exterior: Ring,
    pub interiors: Vec<Ring>,
}

/// Polygons produced by a boolean plan
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanGeometry {
    pub polygons: Vec<PolygonRings>,
    pub bounds: Bounds,
}

impl BooleanGeometry {
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Filled area (exteriors minus holes)
    pub fn area(&self) -> f64 {
        self.polygons
            .iter()
            .map(|p| ring_area(&p.exterior) - p.interiors.iter().map(ring_area).sum::<f64>())
            .sum()
    }

    /// All rings, exteriors first within each polygon
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        self.polygons
            .iter()
            .flat_map(|p| std::iter::once(&p.exterior).chain(p.interiors.iter()))
    }

    fn from_sketch(sketch: &Sketch<()>) -> Self {
        let mp = sketch.to_multipolygon();
        let mut polygons = Vec::new();
        let mut bounds = Bounds::empty();

        for poly in mp.0 {
            let exterior = close_free_ring(poly.exterior().0.iter().map(|c| Point::new(c.x, c.y)));
            if exterior.len() < 3 {
                continue;
            }
            for p in &exterior {
                bounds.include(*p);
            }
            let interiors = poly
                .interiors()
                .iter()
                .map(|ring| close_free_ring(ring.0.iter().map(|c| Point::new(c.x, c.y))))
                .filter(|ring| ring.len() >= 3)
                .collect();
            polygons.push(PolygonRings {
                exterior,
                interiors,
            });
        }

        Self { polygons, bounds }
    }
}

/// Collects a ring, dropping the repeated closing point.
fn close_free_ring(points: impl Iterator<Item = Point>) -> Ring {
    let mut ring: Ring = points.collect();
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

fn ring_area(ring: &Ring) -> f64 {
    let n = ring.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let a = ring[i];
            let b = ring[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();
    (twice / 2.0).abs()
}

/// Sketch of closed rings with even-odd filling, so nested contours of a
/// path become holes.
fn sketch_from_rings<'a>(rings: impl IntoIterator<Item = &'a Ring>) -> Sketch<()> {
    rings
        .into_iter()
        .filter(|ring| ring.len() >= 3)
        .map(|ring| {
            let points: Vec<[f64; 2]> = ring.iter().map(|p| [p.x, p.y]).collect();
            Sketch::polygon(&points, None)
        })
        .reduce(|acc, s| acc.xor(&s))
        .unwrap_or_else(Sketch::new)
}

fn combine(acc: Sketch<()>, next: &Sketch<()>, operation: BooleanOperation) -> Sketch<()> {
    match operation {
        BooleanOperation::Union => acc.union(next),
        BooleanOperation::Subtract => acc.difference(next),
        BooleanOperation::Intersect => acc.intersection(next),
        BooleanOperation::Exclude => acc.xor(next),
    }
}

/// Runs boolean plans against the caches
pub struct BooleanExecutor<'a> {
    settings: &'a EngineSettings,
    caches: &'a ModifierCaches,
    host: &'a dyn ShapeHost,
    group: Option<&'a GroupContext>,
}

impl<'a> BooleanExecutor<'a> {
    pub fn new(settings: &'a EngineSettings, caches: &'a ModifierCaches, host: &'a dyn ShapeHost) -> Self {
        Self {
            settings,
            caches,
            host,
            group: None,
        }
    }

    pub fn with_group(mut self, group: Option<&'a GroupContext>) -> Self {
        self.group = group;
        self
    }

    /// Computes (or fetches) the polygons of `plan`.
    ///
    /// `Ok(None)` means the operation produced nothing, e.g. an intersection
    /// of disjoint shapes.
    pub fn execute(
        &self,
        plan: &BooleanPlan,
        state: &VirtualModifierState,
    ) -> Result<Option<Arc<BooleanGeometry>>, ModifierError> {
        if let Some(geometry) = self.caches.boolean.get(plan.cache_key) {
            tracing::trace!(cache_key = %format!("{:016x}", plan.cache_key), "boolean cache hit");
            return Ok((!geometry.is_empty()).then_some(geometry));
        }

        let inputs = self.inputs(plan, state)?;
        let mut sketches = Vec::with_capacity(inputs.len());
        for instance in inputs.iter() {
            sketches.push(self.instance_sketch(plan, instance, state)?);
        }

        let mut iter = sketches.into_iter();
        let first = iter.next().unwrap_or_else(Sketch::new);
        let combined = iter.fold(first, |acc, next| combine(acc, &next, plan.operation));

        let geometry = Arc::new(BooleanGeometry::from_sketch(&combined));
        tracing::debug!(
            operation = %plan.operation,
            inputs = inputs.len(),
            polygons = geometry.polygons.len(),
            "boolean computed"
        );
        self.caches.boolean.insert(plan.cache_key, Arc::clone(&geometry));

        Ok((!geometry.is_empty()).then_some(geometry))
    }

    /// Stored inputs, or the retired instances of the state when the storage
    /// entry was evicted.
    pub fn inputs(
        &self,
        plan: &BooleanPlan,
        state: &VirtualModifierState,
    ) -> Result<Arc<Vec<VirtualInstance>>, ModifierError> {
        if let Some(stored) = self.caches.storage.get(&plan.storage_key) {
            return Ok(stored);
        }

        let live: Vec<VirtualInstance> = state.retired_for(&plan.boolean_group_id).cloned().collect();
        if live.is_empty() {
            return Err(self.error(plan, "input instances are no longer available"));
        }
        tracing::debug!(
            storage_key = %plan.storage_key,
            "boolean inputs evicted from storage, using retired instances"
        );
        Ok(Arc::new(live))
    }

    fn instance_sketch(
        &self,
        plan: &BooleanPlan,
        instance: &VirtualInstance,
        state: &VirtualModifierState,
    ) -> Result<Sketch<()>, ModifierError> {
        if let Some(nested) = instance.boolean_plan() {
            // Back to the nested result's local frame, then onto this pose.
            let to_local = Affine2::translation(
                -nested.collective_bounds.center().x,
                -nested.collective_bounds.center().y,
            );
            let m = instance.transform.matrix.compose(&to_local);
            let rings: Vec<Ring> = match self.execute(nested, state)? {
                Some(geometry) => geometry
                    .rings()
                    .map(|ring| ring.iter().map(|p| m.transform_point(*p)).collect())
                    .collect(),
                None => Vec::new(),
            };
            return Ok(sketch_from_rings(&rings));
        }

        let shape = self.resolve_shape(plan, &instance.source_shape_id, state)?;
        let (w, h) = self.host.local_size(shape);
        let geometry = &self.settings.geometry;
        let outline = shape_outline(shape, w, h, geometry.flatten_tolerance, geometry.ellipse_segments)
            .transformed(&instance.transform.matrix);
        if outline.approximated {
            tracing::debug!(
                kind = ?shape.kind,
                shape = %shape.id,
                "no polygon extractor, using bounding box"
            );
        }
        Ok(sketch_from_rings(&outline.rings))
    }

    pub fn resolve_shape<'s>(
        &'s self,
        plan: &BooleanPlan,
        shape_id: &str,
        state: &'s VirtualModifierState,
    ) -> Result<&'s ShapeRecord, ModifierError> {
        if state.original_shape.id == shape_id {
            return Ok(&state.original_shape);
        }
        self.group
            .and_then(|g| g.shape(shape_id))
            .ok_or_else(|| self.error(plan, &format!("source shape {shape_id} not found")))
    }

    fn error(&self, plan: &BooleanPlan, reason: &str) -> ModifierError {
        ModifierError::BooleanOperation {
            operation: plan.operation.to_string(),
            instance_ids: plan.input_instance_ids.clone(),
            reason: reason.to_string(),
        }
    }
}

//! # Boolean Operation Processor
//!
//! Combining polygons is the one expensive step in a modifier stack, so it
//! runs in two phases:
//! - [`BooleanProcessor::apply`] plans the operation. Inputs are tagged with
//!   a boolean group id and parked in [`InstanceStorage`](crate::cache::InstanceStorage),
//!   and a single result instance carrying the [`BooleanPlan`] replaces them.
//! - [`BooleanExecutor::execute`] runs the plan when the result is
//!   materialized, reusing the [`BooleanCache`](crate::cache::BooleanCache)
//!   entry when the plan's content hash was computed before.

mod execute;
mod plan;

pub use execute::{BooleanExecutor, BooleanGeometry, PolygonRings};
pub use plan::BooleanPlan;

use rustc_hash::FxHasher;
use shapemod_core::ProcessorResult;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use crate::context::ProcessContext;
use crate::model::{
    BaseMeta, BooleanSettings, InstanceMeta, ModifierMeta, Pose, ShapeRecord, VirtualInstance,
};
use crate::processors::ModifierProcessor;
use crate::unified::UnifiedCompositionHandler;

/// Result instance plus the inputs it consumed
#[derive(Debug, Clone, Default)]
pub struct BooleanOutcome {
    pub result: Vec<VirtualInstance>,
    /// Inputs tagged with the plan's boolean group id
    pub retired: Vec<VirtualInstance>,
}

pub struct BooleanProcessor;

impl BooleanProcessor {
    /// Plans the boolean over `instances`. An empty input plans nothing.
    pub fn plan(
        instances: &[VirtualInstance],
        settings: &BooleanSettings,
        ctx: &ProcessContext<'_>,
    ) -> ProcessorResult<BooleanOutcome> {
        if instances.is_empty() {
            return Ok(BooleanOutcome::default());
        }

        let cache_key = Self::cache_key(instances, settings, ctx)?;
        let boolean_group_id = format!("boolean-{}-{:016x}", ctx.modifier_id, cache_key);
        let storage_key = format!("{}/{}", ctx.original_shape.id, boolean_group_id);
        let collective = UnifiedCompositionHandler::calculate_collective_bounds(
            instances,
            ctx.original_shape,
            ctx.group,
        );

        let retired: Vec<VirtualInstance> = instances
            .iter()
            .cloned()
            .map(|mut instance| {
                instance.meta.base.boolean_group_id = Some(boolean_group_id.clone());
                instance
            })
            .collect();
        ctx.caches.storage.insert(storage_key.clone(), retired.clone());

        let plan = BooleanPlan {
            input_instance_ids: retired.iter().map(|i| i.id.clone()).collect(),
            operation: settings.operation,
            compute_on_materialize: true,
            cache_key,
            storage_key,
            boolean_group_id: boolean_group_id.clone(),
            collective_bounds: collective.bounds,
        };
        tracing::debug!(
            operation = %plan.operation,
            inputs = plan.input_instance_ids.len(),
            cache_key = %format!("{cache_key:016x}"),
            "boolean planned"
        );

        let result = VirtualInstance {
            id: ctx.instance_id(0),
            source_shape_id: ctx.original_shape.id.clone(),
            transform: Pose::new(collective.center, 0.0, 1.0, 1.0),
            meta: InstanceMeta::new(
                BaseMeta {
                    generation_level: ctx.generation_level,
                    boolean_group_id: Some(boolean_group_id),
                    ..BaseMeta::default()
                },
                ModifierMeta::BooleanResult(Box::new(plan)),
            ),
        };

        Ok(BooleanOutcome {
            result: vec![result],
            retired,
        })
    }

    /// Content hash of everything the polygon result depends on: the
    /// operation, every participant's pose, the source shapes' pose, size
    /// and contours, and the geometry settings.
    pub fn cache_key(
        instances: &[VirtualInstance],
        settings: &BooleanSettings,
        ctx: &ProcessContext<'_>,
    ) -> ProcessorResult<u64> {
        let mut hasher = FxHasher::default();
        settings.operation.hash(&mut hasher);
        instances.len().hash(&mut hasher);

        let mut sources = BTreeSet::new();
        for instance in instances {
            instance.source_shape_id.hash(&mut hasher);
            for v in instance.transform.matrix.to_array() {
                v.to_bits().hash(&mut hasher);
            }
            let intended = &instance.transform.intended;
            for v in [intended.rotation, intended.scale_x, intended.scale_y] {
                v.map(f64::to_bits).hash(&mut hasher);
            }
            if let Some(plan) = instance.boolean_plan() {
                plan.cache_key.hash(&mut hasher);
            }
            sources.insert(instance.source_shape_id.as_str());
        }

        for id in sources {
            hash_shape(ctx.resolve_shape(id)?, &mut hasher);
        }

        let geometry = &ctx.settings.geometry;
        geometry.flatten_tolerance.to_bits().hash(&mut hasher);
        geometry.ellipse_segments.hash(&mut hasher);

        Ok(hasher.finish())
    }
}

fn hash_shape(shape: &ShapeRecord, hasher: &mut FxHasher) {
    shape.id.hash(hasher);
    shape.kind.hash(hasher);
    for v in [shape.x, shape.y, shape.rotation] {
        v.to_bits().hash(hasher);
    }
    for v in [shape.props.w, shape.props.h] {
        v.map(f64::to_bits).hash(hasher);
    }
    shape.props.sides.hash(hasher);
    shape.props.paths.len().hash(hasher);
    for contour in &shape.props.paths {
        contour.len().hash(hasher);
        for p in contour {
            p.x.to_bits().hash(hasher);
            p.y.to_bits().hash(hasher);
        }
    }
}

impl ModifierProcessor for BooleanProcessor {
    type Settings = BooleanSettings;

    fn apply(
        instances: &[VirtualInstance],
        settings: &BooleanSettings,
        ctx: &ProcessContext<'_>,
    ) -> ProcessorResult<Vec<VirtualInstance>> {
        Ok(Self::plan(instances, settings, ctx)?.result)
    }
}

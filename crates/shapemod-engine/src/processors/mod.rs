//! # Array Modifier Processors
//!
//! Linear, circular, grid and mirror processors. Each maps the incoming
//! instances plus its settings to a fresh instance list and never mutates
//! its input.
//!
//! Linear, circular and grid share [`expand_instances`]: the incoming set is
//! either one rigid formation (see [`UnifiedCompositionHandler`]) expanded
//! around its collective center, or a list of independent instances each
//! expanded around its own frame.

pub mod circular;
pub mod grid;
pub mod linear;
pub mod mirror;

pub use circular::CircularArrayProcessor;
pub use grid::GridArrayProcessor;
pub use linear::LinearArrayProcessor;
pub use mirror::MirrorProcessor;

use shapemod_core::ProcessorResult;

use crate::context::{ProcessContext, ReferenceFrame};
use crate::geometry::Point;
use crate::model::{BaseMeta, InstanceMeta, ModifierMeta, Pose, VirtualInstance};
use crate::unified::UnifiedCompositionHandler;

/// A modifier implementation
pub trait ModifierProcessor {
    type Settings;

    fn apply(
        instances: &[VirtualInstance],
        settings: &Self::Settings,
        ctx: &ProcessContext<'_>,
    ) -> ProcessorResult<Vec<VirtualInstance>>;
}

/// Where one output position puts a formation (or a single instance)
/// relative to its pivot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub offset: Point,
    /// Radians
    pub rotation: f64,
    pub scale: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            offset: Point::default(),
            rotation: 0.0,
            scale: 1.0,
        }
    }
}

/// Re-poses `member`: center moves to
/// `pivot + offset + R(rotation) · scale · (center − pivot)`, and the
/// placement's rotation and scale accumulate onto the member's own.
pub fn place(member: &VirtualInstance, pivot: Point, placement: &Placement) -> Pose {
    let relative = (member.center() - pivot) * placement.scale;
    let center = pivot + placement.offset + relative.rotated(placement.rotation);
    Pose::new(
        center,
        member.rotation() + placement.rotation,
        member.scale_x() * placement.scale,
        member.scale_y() * placement.scale,
    )
}

/// Position of copy `index` along a ramp of `count` copies, `0..=1`.
pub fn progress(index: usize, count: usize) -> f64 {
    if count <= 1 {
        0.0
    } else {
        index as f64 / (count - 1) as f64
    }
}

/// Interpolates from 1 to `step_percent / 100`.
pub fn scale_ramp(step_percent: f64, progress: f64) -> f64 {
    1.0 + (step_percent / 100.0 - 1.0) * progress
}

/// Metadata of a re-placed instance. Boolean results keep their plan so
/// copies of a combined shape still materialize as that shape.
pub fn carried_kind(member: &VirtualInstance, kind: &ModifierMeta) -> ModifierMeta {
    if member.boolean_plan().is_some() {
        member.meta.kind.clone()
    } else {
        kind.clone()
    }
}

/// Expands `instances` into `count` positions.
///
/// `pivot` overrides the frame's pivot (circular arrays anchor on a stable
/// point). `position` maps an output position and its frame to a placement
/// plus the metadata its instances carry.
pub fn expand_instances<F>(
    instances: &[VirtualInstance],
    ctx: &ProcessContext<'_>,
    count: usize,
    pivot: Option<Point>,
    position: F,
) -> ProcessorResult<Vec<VirtualInstance>>
where
    F: Fn(usize, &ReferenceFrame) -> (Placement, ModifierMeta),
{
    ctx.ensure_capacity(instances.len().saturating_mul(count))?;
    let mut out = Vec::with_capacity(instances.len() * count);

    if UnifiedCompositionHandler::should_use_unified_composition(instances) {
        let mut frame = ctx.collective_frame(instances);
        if let Some(pivot) = pivot {
            frame = frame.with_pivot(pivot);
        }

        for array_index in 0..count {
            let (placement, kind) = position(array_index, &frame);
            let group_id = format!("{}-{}", ctx.modifier_id, array_index);
            for (source_index, member) in instances.iter().enumerate() {
                let index = out.len();
                out.push(VirtualInstance {
                    id: ctx.instance_id(index),
                    source_shape_id: member.source_shape_id.clone(),
                    transform: place(member, frame.pivot, &placement),
                    meta: InstanceMeta::new(
                        BaseMeta {
                            index,
                            source_index,
                            array_index,
                            generation_level: ctx.generation_level,
                            group_id: Some(group_id.clone()),
                            from_unified_group: true,
                            boolean_group_id: member.meta.base.boolean_group_id.clone(),
                        },
                        carried_kind(member, &kind),
                    ),
                });
            }
        }
        return Ok(out);
    }

    for (source_index, instance) in instances.iter().enumerate() {
        let mut frame = ctx.individual_frame(instance)?;
        if let Some(pivot) = pivot {
            frame = frame.with_pivot(pivot);
        }

        for array_index in 0..count {
            let (placement, kind) = position(array_index, &frame);
            let index = out.len();
            out.push(VirtualInstance {
                id: ctx.instance_id(index),
                source_shape_id: instance.source_shape_id.clone(),
                transform: place(instance, frame.pivot, &placement),
                meta: InstanceMeta::new(
                    BaseMeta {
                        index,
                        source_index,
                        array_index,
                        generation_level: ctx.generation_level,
                        group_id: None,
                        from_unified_group: false,
                        boolean_group_id: instance.meta.base.boolean_group_id.clone(),
                    },
                    carried_kind(instance, &kind),
                ),
            });
        }
    }
    Ok(out)
}

//! Mirror: appends a reflected copy of every incoming instance.
//!
//! Unlike the array processors the inputs are kept as they are. With the
//! default stable reference the mirror line does not depend on the incoming
//! instances, so mirroring twice with the same settings reproduces the
//! input poses.

use shapemod_core::ProcessorResult;
use shapemod_settings::ReferencePoint;

use super::{carried_kind, ModifierProcessor};
use crate::context::ProcessContext;
use crate::geometry::Point;
use crate::model::{
    BaseMeta, InstanceMeta, MirrorAxis, MirrorSettings, ModifierMeta, Pose, VirtualInstance,
};

pub struct MirrorProcessor;

impl MirrorProcessor {
    /// Reflects `p` across the mirror line through `line_point`.
    pub fn reflect(p: Point, axis: MirrorAxis, line_point: Point) -> Point {
        match axis {
            MirrorAxis::X => Point::new(2.0 * line_point.x - p.x, p.y),
            MirrorAxis::Y => Point::new(p.x, 2.0 * line_point.y - p.y),
        }
    }

    fn line_point(
        instances: &[VirtualInstance],
        settings: &MirrorSettings,
        ctx: &ProcessContext<'_>,
    ) -> Point {
        let reference = match ctx.settings.processing.mirror_reference {
            ReferencePoint::Stable => ctx.stable_center(),
            ReferencePoint::Collective => ctx.collective_frame(instances).pivot,
        };
        match settings.axis {
            MirrorAxis::X => reference + Point::new(settings.offset, 0.0),
            MirrorAxis::Y => reference + Point::new(0.0, settings.offset),
        }
    }
}

impl ModifierProcessor for MirrorProcessor {
    type Settings = MirrorSettings;

    fn apply(
        instances: &[VirtualInstance],
        settings: &MirrorSettings,
        ctx: &ProcessContext<'_>,
    ) -> ProcessorResult<Vec<VirtualInstance>> {
        settings.validate()?;
        ctx.ensure_capacity(instances.len().saturating_mul(2))?;

        let line_point = Self::line_point(instances, settings, ctx);
        let mut out = instances.to_vec();

        for (source_index, instance) in instances.iter().enumerate() {
            let index = out.len();
            let center = Self::reflect(instance.center(), settings.axis, line_point);
            out.push(VirtualInstance {
                id: ctx.instance_id(index),
                source_shape_id: instance.source_shape_id.clone(),
                transform: Pose::new(
                    center,
                    -instance.rotation(),
                    instance.scale_x(),
                    instance.scale_y(),
                ),
                meta: InstanceMeta::new(
                    BaseMeta {
                        index,
                        source_index,
                        array_index: 1,
                        generation_level: ctx.generation_level,
                        group_id: instance.meta.base.group_id.clone(),
                        from_unified_group: instance.meta.base.from_unified_group,
                        boolean_group_id: instance.meta.base.boolean_group_id.clone(),
                    },
                    carried_kind(
                        instance,
                        &ModifierMeta::Mirror {
                            axis: settings.axis,
                            mirrored: true,
                        },
                    ),
                ),
            });
        }

        Ok(out)
    }
}

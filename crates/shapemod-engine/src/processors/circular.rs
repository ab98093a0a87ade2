//! Circular array: copies distributed on a circular arc.
//!
//! The circle is anchored to the stable center of the source shape by
//! default, so editing an upstream modifier does not drag the circle
//! around. `ReferencePoint::Collective` anchors it on the incoming
//! formation's center instead.

use shapemod_core::constants::{FULL_TURN_DEGREES, GEOMETRY_EPSILON};
use shapemod_core::ProcessorResult;
use shapemod_settings::ReferencePoint;
use std::f64::consts::{FRAC_PI_2, PI};

use super::{expand_instances, ModifierProcessor, Placement};
use crate::context::ProcessContext;
use crate::geometry::Point;
use crate::model::{CircularArraySettings, ModifierMeta, VirtualInstance};

pub struct CircularArrayProcessor;

impl CircularArrayProcessor {
    /// Angular step in degrees. A full turn spreads `count` copies without
    /// doubling up the start; partial arcs include both ends.
    pub fn angle_step(settings: &CircularArraySettings) -> f64 {
        let span = settings.end_angle - settings.start_angle;
        let count = settings.count as f64;
        if (span.abs() - FULL_TURN_DEGREES).abs() < GEOMETRY_EPSILON {
            span / count
        } else if settings.count > 1 {
            span / (count - 1.0)
        } else {
            0.0
        }
    }
}

impl ModifierProcessor for CircularArrayProcessor {
    type Settings = CircularArraySettings;

    fn apply(
        instances: &[VirtualInstance],
        settings: &CircularArraySettings,
        ctx: &ProcessContext<'_>,
    ) -> ProcessorResult<Vec<VirtualInstance>> {
        settings.validate()?;
        let step = Self::angle_step(settings);
        let pivot = match ctx.settings.processing.circular_reference {
            ReferencePoint::Stable => Some(ctx.stable_center()),
            ReferencePoint::Collective => None,
        };
        let center_offset = Point::new(settings.center_x, settings.center_y);

        expand_instances(instances, ctx, settings.count as usize, pivot, |i, _| {
            let angle = (settings.start_angle + step * i as f64).to_radians();
            let mut rotation = (settings.rotate_all + settings.rotate_each * i as f64).to_radians();
            if settings.align_to_center {
                rotation += angle + PI + FRAC_PI_2;
            }
            let placement = Placement {
                offset: center_offset + Point::new(angle.cos(), angle.sin()) * settings.radius,
                rotation,
                scale: 1.0,
            };
            (placement, ModifierMeta::CircularArray { angle })
        })
    }
}

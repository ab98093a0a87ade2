//! Linear array: copies stepped along a straight line.

use shapemod_core::ProcessorResult;

use super::{expand_instances, progress, scale_ramp, ModifierProcessor, Placement};
use crate::context::ProcessContext;
use crate::geometry::Point;
use crate::model::{LinearArraySettings, ModifierMeta, VirtualInstance};

pub struct LinearArrayProcessor;

impl ModifierProcessor for LinearArrayProcessor {
    type Settings = LinearArraySettings;

    fn apply(
        instances: &[VirtualInstance],
        settings: &LinearArraySettings,
        ctx: &ProcessContext<'_>,
    ) -> ProcessorResult<Vec<VirtualInstance>> {
        settings.validate()?;
        let count = settings.count as usize;

        expand_instances(instances, ctx, count, None, |i, frame| {
            let step = Point::new(
                frame.percent_x(settings.offset_x),
                frame.percent_y(settings.offset_y),
            );
            let placement = Placement {
                offset: step * i as f64,
                rotation: (settings.rotate_all + settings.rotation_increment * i as f64)
                    .to_radians(),
                scale: scale_ramp(settings.scale_step, progress(i, count)),
            };
            (placement, ModifierMeta::LinearArray)
        })
    }
}

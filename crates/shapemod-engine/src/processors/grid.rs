//! Grid array: `rows × columns` copies, row-major.

use shapemod_core::ProcessorResult;

use super::{expand_instances, progress, scale_ramp, ModifierProcessor, Placement};
use crate::context::ProcessContext;
use crate::geometry::Point;
use crate::model::{GridArraySettings, ModifierMeta, VirtualInstance};

pub struct GridArrayProcessor;

impl ModifierProcessor for GridArrayProcessor {
    type Settings = GridArraySettings;

    fn apply(
        instances: &[VirtualInstance],
        settings: &GridArraySettings,
        ctx: &ProcessContext<'_>,
    ) -> ProcessorResult<Vec<VirtualInstance>> {
        settings.validate()?;
        let rows = settings.rows as usize;
        let columns = settings.columns as usize;
        let total = settings.total_copies();

        expand_instances(instances, ctx, total, None, |index, frame| {
            let row = index / columns;
            let column = index % columns;

            let offset = Point::new(
                frame.percent_x(settings.spacing_x) * column as f64,
                frame.percent_y(settings.spacing_y) * row as f64,
            );
            let rotation = settings.rotate_all
                + settings.rotate_each * index as f64
                + settings.rotate_each_row * row as f64
                + settings.rotate_each_column * column as f64;
            let scale = scale_ramp(settings.scale_step, progress(index, total))
                * scale_ramp(settings.scale_step_row, progress(row, rows))
                * scale_ramp(settings.scale_step_column, progress(column, columns));

            let placement = Placement {
                offset,
                rotation: rotation.to_radians(),
                scale,
            };
            let meta = ModifierMeta::GridArray {
                row: row as u32,
                column: column as u32,
            };
            (placement, meta)
        })
    }
}

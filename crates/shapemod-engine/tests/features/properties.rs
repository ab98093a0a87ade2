use proptest::prelude::*;
use shapemod_engine::geometry::Point;
use shapemod_engine::model::{BaseMeta, InstanceMeta};
use shapemod_engine::{
    CircularArraySettings, GridArraySettings, LinearArraySettings, MirrorAxis, MirrorSettings,
    Modifier, ModifierMeta, Pose, ShapeRecord, UnifiedCompositionHandler, VirtualInstance,
};
use std::collections::HashSet;

use crate::common::{square, Fixture};

fn instance(i: usize, x: f64, y: f64, rotation: f64) -> VirtualInstance {
    VirtualInstance {
        id: format!("m#{i}"),
        source_shape_id: "s".to_string(),
        transform: Pose::new(Point::new(x, y), rotation, 1.0, 1.0),
        meta: InstanceMeta::new(BaseMeta::default(), ModifierMeta::LinearArray),
    }
}

fn assert_all_coincide(
    shape: &ShapeRecord,
    stack: &[Modifier],
    expected: usize,
) -> Result<(), TestCaseError> {
    let fixture = Fixture::new();
    let state = fixture.composer().process_modifiers(shape, stack, None).unwrap();
    prop_assert_eq!(state.virtual_instances.len(), expected);

    let center = shape.center();
    for copy in &state.virtual_instances {
        prop_assert!(copy.center().distance_to(&center) < 1e-6);
        prop_assert!((copy.rotation() - shape.rotation).abs() < 1e-9);
        prop_assert!((copy.scale_x() - 1.0).abs() < 1e-12);
        prop_assert!((copy.scale_y() - 1.0).abs() < 1e-12);
    }
    Ok(())
}

proptest! {
    #[test]
    fn collective_bounds_ignore_order(
        poses in prop::collection::vec((-500.0..500.0f64, -500.0..500.0f64, -3.2..3.2f64), 1..12)
    ) {
        let shape = square("s", 0.0, 0.0, 20.0);
        let mut instances: Vec<VirtualInstance> = poses
            .iter()
            .enumerate()
            .map(|(i, (x, y, r))| instance(i, *x, *y, *r))
            .collect();

        let forward = UnifiedCompositionHandler::calculate_collective_bounds(&instances, &shape, None);
        instances.reverse();
        let backward = UnifiedCompositionHandler::calculate_collective_bounds(&instances, &shape, None);
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn linear_array_yields_count_unique_ids(count in 1u32..40, offset in -300.0..300.0f64) {
        let fixture = Fixture::new();
        let shape = square("s", 0.0, 0.0, 10.0);
        let stack = vec![Modifier::new("row", 0, LinearArraySettings::new(count, offset, 0.0))];

        let state = fixture.composer().process_modifiers(&shape, &stack, None).unwrap();
        prop_assert_eq!(state.virtual_instances.len(), count as usize);
        let ids: HashSet<&str> = state.virtual_instances.iter().map(|i| i.id.as_str()).collect();
        prop_assert_eq!(ids.len(), count as usize);
    }

    #[test]
    fn mirror_twice_restores_every_input(
        x in -200.0..200.0f64,
        rotation in -3.0..3.0f64,
        offset in -100.0..100.0f64,
    ) {
        let fixture = Fixture::new();
        let shape = square("s", x, 0.0, 30.0).with_rotation(rotation);
        let mirror = MirrorSettings::new(MirrorAxis::X, offset);
        let stack = vec![
            Modifier::new("a", 0, mirror.clone()),
            Modifier::new("b", 1, mirror),
        ];

        let state = fixture.composer().process_modifiers(&shape, &stack, None).unwrap();
        let restored = &state.virtual_instances[3];
        prop_assert!((restored.center().x - shape.center().x).abs() < 1e-6);
        prop_assert!((restored.center().y - shape.center().y).abs() < 1e-6);
        prop_assert_eq!(restored.rotation(), rotation);
    }

    #[test]
    fn circular_copies_sit_on_the_circle(count in 1u32..24, radius in 1.0..500.0f64) {
        let fixture = Fixture::new();
        let shape = square("s", 10.0, 20.0, 40.0);
        let stack = vec![Modifier::new("circ", 0, CircularArraySettings::new(count, radius))];

        let state = fixture.composer().process_modifiers(&shape, &stack, None).unwrap();
        let center = shape.center();
        for copy in &state.virtual_instances {
            prop_assert!((copy.center().distance_to(&center) - radius).abs() < 1e-6);
        }
    }

    #[test]
    fn identity_parameters_stack_copies_on_the_source(
        count in 1u32..40,
        x in -200.0..200.0f64,
        y in -200.0..200.0f64,
        rotation in -3.0..3.0f64,
    ) {
        let shape = square("s", x, y, 25.0).with_rotation(rotation);

        let linear = vec![Modifier::new("lin", 0, LinearArraySettings::new(count, 0.0, 0.0))];
        assert_all_coincide(&shape, &linear, count as usize)?;

        let circular = vec![Modifier::new("circ", 0, CircularArraySettings::new(count, 0.0))];
        assert_all_coincide(&shape, &circular, count as usize)?;

        let rows = count % 7 + 1;
        let columns = count / 7 + 1;
        let grid = vec![Modifier::new("grid", 0, GridArraySettings::new(rows, columns, 0.0, 0.0))];
        assert_all_coincide(&shape, &grid, (rows * columns) as usize)?;
    }
}

use shapemod_engine::geometry::Point;
use shapemod_engine::{LinearArraySettings, Modifier, ModifierMeta};
use shapemod_settings::EngineSettings;
use std::f64::consts::{FRAC_PI_2, PI};

use crate::common::{assert_point, square, Fixture};

#[test]
fn test_linear_array_steps_by_percent_of_width() {
    let fixture = Fixture::new();
    let shape = square("s", 0.0, 0.0, 100.0);
    let stack = vec![Modifier::new("lin", 0, LinearArraySettings::new(3, 150.0, 0.0))];

    let state = fixture
        .composer()
        .process_modifiers(&shape, &stack, None)
        .unwrap();

    let tops: Vec<f64> = state
        .virtual_instances
        .iter()
        .map(|i| i.center().x - 50.0)
        .collect();
    assert_eq!(tops, vec![0.0, 150.0, 300.0]);
    assert!(state
        .virtual_instances
        .iter()
        .all(|i| matches!(i.meta.kind, ModifierMeta::LinearArray)));
}

#[test]
fn test_count_one_is_identity() {
    let fixture = Fixture::new();
    let shape = square("s", 30.0, 40.0, 20.0).with_rotation(0.25);
    let stack = vec![Modifier::new("lin", 0, LinearArraySettings::new(1, 150.0, 0.0))];

    let state = fixture
        .composer()
        .process_modifiers(&shape, &stack, None)
        .unwrap();

    assert_eq!(state.virtual_instances.len(), 1);
    let only = &state.virtual_instances[0];
    assert_point(only.center(), shape.center());
    assert!((only.rotation() - 0.25).abs() < 1e-12);
    assert_eq!(only.scale_x(), 1.0);
}

#[test]
fn test_rotation_increment_accumulates() {
    let fixture = Fixture::new();
    let shape = square("s", 0.0, 0.0, 10.0);
    let settings = LinearArraySettings {
        rotation_increment: 90.0,
        ..LinearArraySettings::new(3, 200.0, 0.0)
    };
    let stack = vec![Modifier::new("lin", 0, settings)];

    let state = fixture
        .composer()
        .process_modifiers(&shape, &stack, None)
        .unwrap();

    let rotations: Vec<f64> = state.virtual_instances.iter().map(|i| i.rotation()).collect();
    assert!((rotations[1] - FRAC_PI_2).abs() < 1e-12);
    assert!((rotations[2] - PI).abs() < 1e-12);
}

#[test]
fn test_scale_step_ramps_to_last_copy() {
    let fixture = Fixture::new();
    let shape = square("s", 0.0, 0.0, 10.0);
    let settings = LinearArraySettings {
        scale_step: 50.0,
        ..LinearArraySettings::new(3, 200.0, 0.0)
    };
    let stack = vec![Modifier::new("lin", 0, settings)];

    let state = fixture
        .composer()
        .process_modifiers(&shape, &stack, None)
        .unwrap();

    let scales: Vec<f64> = state.virtual_instances.iter().map(|i| i.scale_x()).collect();
    assert_eq!(scales, vec![1.0, 0.75, 0.5]);
}

#[test]
fn test_array_of_array_moves_the_whole_row() {
    let fixture = Fixture::new();
    let shape = square("s", 0.0, 0.0, 100.0);
    let stack = vec![
        Modifier::new("row", 0, LinearArraySettings::new(2, 150.0, 0.0)),
        Modifier::new("col", 1, LinearArraySettings::new(2, 0.0, 200.0)),
    ];

    let state = fixture
        .composer()
        .process_modifiers(&shape, &stack, None)
        .unwrap();

    let centers: Vec<Point> = state.virtual_instances.iter().map(|i| i.center()).collect();
    let expected = [
        Point::new(50.0, 50.0),
        Point::new(200.0, 50.0),
        Point::new(50.0, 250.0),
        Point::new(200.0, 250.0),
    ];
    for (actual, expected) in centers.iter().zip(expected) {
        assert_point(*actual, expected);
    }

    let second = &state.virtual_instances[2];
    assert!(second.meta.base.from_unified_group);
    assert_eq!(second.meta.base.group_id.as_deref(), Some("col-1"));
    assert_eq!(second.meta.base.generation_level, 2);
    assert_eq!(second.id, "col#2");
}

#[test]
fn test_instance_limit_is_reported_as_failure() {
    let mut settings = EngineSettings::default();
    settings.processing.max_instances = 5;
    let fixture = Fixture::with_settings(settings);
    let shape = square("s", 0.0, 0.0, 10.0);
    let stack = vec![Modifier::new("lin", 0, LinearArraySettings::new(10, 100.0, 0.0))];

    let state = fixture
        .composer()
        .process_modifiers(&shape, &stack, None)
        .unwrap();

    assert_eq!(state.virtual_instances.len(), 1);
    assert!(state.virtual_instances[0].is_original());
    assert_eq!(state.metadata.failures.len(), 1);
    assert!(state.metadata.failures[0].error.contains("Instance limit"));
}

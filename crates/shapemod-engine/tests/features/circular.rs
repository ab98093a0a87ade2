use shapemod_engine::geometry::Point;
use shapemod_engine::{CircularArraySettings, LinearArraySettings, Modifier, ModifierMeta};
use std::f64::consts::{FRAC_PI_2, PI};

use crate::common::{assert_point, square, Fixture};

#[test]
fn test_four_copies_around_the_source_center() {
    let fixture = Fixture::new();
    let shape = square("s", 0.0, 0.0, 100.0);
    let stack = vec![Modifier::new("circ", 0, CircularArraySettings::new(4, 100.0))];

    let state = fixture
        .composer()
        .process_modifiers(&shape, &stack, None)
        .unwrap();

    let expected = [
        Point::new(150.0, 50.0),
        Point::new(50.0, 150.0),
        Point::new(-50.0, 50.0),
        Point::new(50.0, -50.0),
    ];
    assert_eq!(state.virtual_instances.len(), 4);
    for (instance, expected) in state.virtual_instances.iter().zip(expected) {
        assert_point(instance.center(), expected);
        assert_eq!(instance.rotation(), 0.0);
    }
    match state.virtual_instances[1].meta.kind {
        ModifierMeta::CircularArray { angle } => assert!((angle - FRAC_PI_2).abs() < 1e-12),
        ref other => panic!("unexpected meta {other:?}"),
    }
}

#[test]
fn test_align_to_center_turns_copies_outward() {
    let fixture = Fixture::new();
    let shape = square("s", 0.0, 0.0, 10.0);
    let settings = CircularArraySettings {
        align_to_center: true,
        ..CircularArraySettings::new(2, 50.0)
    };
    let stack = vec![Modifier::new("circ", 0, settings)];

    let state = fixture
        .composer()
        .process_modifiers(&shape, &stack, None)
        .unwrap();

    let first = state.virtual_instances[0].rotation();
    let second = state.virtual_instances[1].rotation();
    assert!((first - (PI + FRAC_PI_2)).abs() < 1e-9);
    assert!((second - (2.0 * PI + FRAC_PI_2)).abs() < 1e-9);
}

#[test]
fn test_rotate_each_spins_the_formation_about_the_stable_center() {
    let fixture = Fixture::new();
    let shape = square("s", 0.0, 0.0, 100.0);
    let settings = CircularArraySettings {
        rotate_each: 90.0,
        ..CircularArraySettings::new(2, 0.0)
    };
    let stack = vec![
        Modifier::new("row", 0, LinearArraySettings::new(2, 200.0, 0.0)),
        Modifier::new("circ", 1, settings),
    ];

    let state = fixture
        .composer()
        .process_modifiers(&shape, &stack, None)
        .unwrap();

    // Second formation: the row turned a quarter about the source center.
    assert_eq!(state.virtual_instances.len(), 4);
    assert_point(state.virtual_instances[2].center(), Point::new(50.0, 50.0));
    assert_point(state.virtual_instances[3].center(), Point::new(50.0, 250.0));
    assert!((state.virtual_instances[3].rotation() - FRAC_PI_2).abs() < 1e-12);
}

#[test]
fn test_partial_arc_places_both_ends() {
    let fixture = Fixture::new();
    let shape = square("s", 0.0, 0.0, 100.0);
    let settings = CircularArraySettings {
        end_angle: 180.0,
        ..CircularArraySettings::new(3, 100.0)
    };
    let stack = vec![Modifier::new("arc", 0, settings)];

    let state = fixture
        .composer()
        .process_modifiers(&shape, &stack, None)
        .unwrap();

    assert_point(state.virtual_instances[0].center(), Point::new(150.0, 50.0));
    assert_point(state.virtual_instances[2].center(), Point::new(-50.0, 50.0));
}

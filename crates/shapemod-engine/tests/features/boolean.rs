use shapemod_core::ModifierError;
use shapemod_engine::{
    BooleanExecutor, BooleanOperation, BooleanSettings, LinearArraySettings, Modifier,
    ShapeKind, ShapeRecord, ShapeStyle, VirtualModifierState,
};

use crate::common::{square, Fixture, SequentialHost};

fn overlapping_pair(operation: BooleanOperation) -> Vec<Modifier> {
    vec![
        Modifier::new("row", 0, LinearArraySettings::new(2, 50.0, 0.0)),
        Modifier::new("bool", 1, BooleanSettings::new(operation)),
    ]
}

fn area(fixture: &Fixture, state: &VirtualModifierState) -> f64 {
    let host = SequentialHost::default();
    let executor = BooleanExecutor::new(&fixture.settings, &fixture.caches, &host);
    let plan = state.virtual_instances[0].boolean_plan().expect("boolean result");
    executor
        .execute(plan, state)
        .unwrap()
        .map(|geometry| geometry.area())
        .unwrap_or(0.0)
}

#[test]
fn test_boolean_plans_without_computing() {
    let fixture = Fixture::new();
    let shape = square("s", 0.0, 0.0, 100.0);

    let state = fixture
        .composer()
        .process_modifiers(&shape, &overlapping_pair(BooleanOperation::Union), None)
        .unwrap();

    assert_eq!(state.virtual_instances.len(), 1);
    let plan = state.virtual_instances[0].boolean_plan().unwrap();
    assert_eq!(plan.input_instance_ids, vec!["row#0", "row#1"]);
    assert_eq!(plan.collective_bounds.width(), 150.0);
    assert_eq!(state.retired_for(&plan.boolean_group_id).count(), 2);
    assert!(fixture.caches.boolean.is_empty());
}

#[test]
fn test_operations_produce_expected_areas() {
    let shape = square("s", 0.0, 0.0, 100.0);
    let cases = [
        (BooleanOperation::Union, 15_000.0),
        (BooleanOperation::Subtract, 5_000.0),
        (BooleanOperation::Intersect, 5_000.0),
        (BooleanOperation::Exclude, 10_000.0),
    ];

    for (operation, expected) in cases {
        let fixture = Fixture::new();
        let state = fixture
            .composer()
            .process_modifiers(&shape, &overlapping_pair(operation), None)
            .unwrap();
        let actual = area(&fixture, &state);
        assert!(
            (actual - expected).abs() < 1e-3,
            "{operation}: expected {expected}, got {actual}"
        );
    }
}

#[test]
fn test_union_materializes_as_one_path() {
    let fixture = Fixture::new();
    let host = SequentialHost::default();
    let style = ShapeStyle {
        color: Some("red".to_string()),
        ..ShapeStyle::default()
    };
    let shape = square("s", 0.0, 0.0, 100.0).with_style(style);

    let diff = fixture
        .composer()
        .evaluate(&shape, &overlapping_pair(BooleanOperation::Union), None, &host)
        .unwrap();

    assert_eq!(diff.create.len(), 1);
    assert!(diff.update.is_empty());
    let result = &diff.create[0];
    assert_eq!(result.kind, ShapeKind::Path);
    assert_eq!((result.x, result.y), (0.0, 0.0));
    assert_eq!(result.props.w, Some(150.0));
    assert_eq!(result.props.h, Some(100.0));
    assert_eq!(result.props.style.color.as_deref(), Some("red"));
    assert!(result.meta.boolean_result);
    assert!(!result.props.paths.is_empty());
    assert!(result.props.paths.iter().flatten().all(|p| {
        (-1e-6..=150.0 + 1e-6).contains(&p.x) && (-1e-6..=100.0 + 1e-6).contains(&p.y)
    }));
}

#[test]
fn test_boolean_result_replaces_previous_shapes() {
    let fixture = Fixture::new();
    let host = SequentialHost::default();
    let shape = square("s", 0.0, 0.0, 100.0);
    let stack = overlapping_pair(BooleanOperation::Union);
    let composer = fixture.composer();

    let first = composer.evaluate(&shape, &stack, None, &host).unwrap();
    let second = composer.evaluate(&shape, &stack, None, &host).unwrap();

    assert_eq!(second.delete, vec![first.create[0].id.clone()]);
    assert_eq!(second.create.len(), 1);
    assert_ne!(second.create[0].id, first.create[0].id);
}

#[test]
fn test_unchanged_inputs_hit_the_cache() {
    let fixture = Fixture::new();
    let host = SequentialHost::default();
    let shape = square("s", 0.0, 0.0, 100.0);
    let composer = fixture.composer();

    let stack = overlapping_pair(BooleanOperation::Union);
    composer.evaluate(&shape, &stack, None, &host).unwrap();
    composer.evaluate(&shape, &stack, None, &host).unwrap();

    let stats = fixture.caches.boolean.stats();
    assert_eq!(stats.computations, 1);
    assert_eq!(stats.hits, 1);

    let moved = vec![
        Modifier::new("row", 0, LinearArraySettings::new(2, 60.0, 0.0)),
        Modifier::new("bool", 1, BooleanSettings::new(BooleanOperation::Union)),
    ];
    composer.evaluate(&shape, &moved, None, &host).unwrap();
    assert_eq!(fixture.caches.boolean.stats().computations, 2);
}

#[test]
fn test_source_edits_recompute_with_the_same_stack() {
    let fixture = Fixture::new();
    let host = SequentialHost::default();
    let composer = fixture.composer();
    let stack = overlapping_pair(BooleanOperation::Union);
    let shape = square("s", 0.0, 0.0, 100.0);

    composer.evaluate(&shape, &stack, None, &host).unwrap();
    assert_eq!(fixture.caches.boolean.stats().computations, 1);

    let edits = [
        square("s", 1.0, 0.0, 100.0),
        ShapeRecord::new("s", ShapeKind::Rectangle, 0.0, 0.0, 120.0, 100.0),
        square("s", 0.0, 0.0, 100.0).with_rotation(0.3),
    ];
    for (i, edited) in edits.iter().enumerate() {
        composer.evaluate(edited, &stack, None, &host).unwrap();
        assert_eq!(
            fixture.caches.boolean.stats().computations,
            i as u64 + 2,
            "edit {i} should not reuse a cached result"
        );
    }

    composer.evaluate(&shape, &stack, None, &host).unwrap();
    assert_eq!(fixture.caches.boolean.stats().computations, 4);
}

#[test]
fn test_materialization_consumes_stored_inputs() {
    let fixture = Fixture::new();
    let host = SequentialHost::default();
    let shape = square("s", 0.0, 0.0, 100.0);
    let mut stack = overlapping_pair(BooleanOperation::Union);
    stack.push(Modifier::new("copies", 2, LinearArraySettings::new(2, 100.0, 0.0)));
    stack.push(Modifier::new("outer", 3, BooleanSettings::new(BooleanOperation::Union)));
    let composer = fixture.composer();

    let state = composer.process_modifiers(&shape, &stack, None).unwrap();
    assert_eq!(fixture.caches.storage.len(), 2);

    let diff = composer.materialize(&state, &host, None).unwrap();
    assert_eq!(diff.create.len(), 1);
    assert!(fixture.caches.storage.is_empty());

    // A second evaluation plans again and still hits the cache.
    composer.evaluate(&shape, &stack, None, &host).unwrap();
    assert!(fixture.caches.storage.is_empty());
    assert!(fixture.caches.boolean.stats().hits >= 1);
}

#[test]
fn test_disjoint_intersection_creates_nothing() {
    let fixture = Fixture::new();
    let host = SequentialHost::default();
    let shape = square("s", 0.0, 0.0, 100.0);
    let stack = vec![
        Modifier::new("row", 0, LinearArraySettings::new(2, 200.0, 0.0)),
        Modifier::new("bool", 1, BooleanSettings::new(BooleanOperation::Intersect)),
    ];

    let diff = fixture
        .composer()
        .evaluate(&shape, &stack, None, &host)
        .unwrap();
    assert!(diff.is_empty());
}

#[test]
fn test_arrayed_boolean_results_keep_their_geometry() {
    let fixture = Fixture::new();
    let host = SequentialHost::default();
    let shape = square("s", 0.0, 0.0, 100.0);
    let mut stack = overlapping_pair(BooleanOperation::Union);
    stack.push(Modifier::new("copies", 2, LinearArraySettings::new(2, 200.0, 0.0)));

    let diff = fixture
        .composer()
        .evaluate(&shape, &stack, None, &host)
        .unwrap();

    assert_eq!(diff.create.len(), 2);
    assert!(diff.create.iter().all(|c| c.kind == ShapeKind::Path));
    assert_eq!(diff.create[0].x, 0.0);
    assert_eq!(diff.create[1].x, 300.0);
    assert_eq!(fixture.caches.boolean.stats().computations, 1);
}

#[test]
fn test_nested_booleans_combine_results() {
    let fixture = Fixture::new();
    let shape = square("s", 0.0, 0.0, 100.0);
    let mut stack = overlapping_pair(BooleanOperation::Union);
    stack.push(Modifier::new("copies", 2, LinearArraySettings::new(2, 100.0, 0.0)));
    stack.push(Modifier::new("outer", 3, BooleanSettings::new(BooleanOperation::Union)));

    let state = fixture
        .composer()
        .process_modifiers(&shape, &stack, None)
        .unwrap();

    assert_eq!(state.virtual_instances.len(), 1);
    assert!((area(&fixture, &state) - 30_000.0).abs() < 1e-3);
}

#[test]
fn test_evicted_storage_falls_back_to_retired_instances() {
    let fixture = Fixture::new();
    let shape = square("s", 0.0, 0.0, 100.0);
    let state = fixture
        .composer()
        .process_modifiers(&shape, &overlapping_pair(BooleanOperation::Union), None)
        .unwrap();

    fixture.caches.storage.clear();
    assert!((area(&fixture, &state) - 15_000.0).abs() < 1e-3);
}

#[test]
fn test_missing_inputs_raise_boolean_error() {
    let fixture = Fixture::new();
    let host = SequentialHost::default();
    let shape = square("s", 0.0, 0.0, 100.0);
    let mut state = fixture
        .composer()
        .process_modifiers(&shape, &overlapping_pair(BooleanOperation::Union), None)
        .unwrap();

    fixture.caches.storage.clear();
    state.metadata.retired.clear();

    let err = fixture
        .composer()
        .materialize(&state, &host, None)
        .unwrap_err();
    match err {
        ModifierError::BooleanOperation {
            operation,
            instance_ids,
            ..
        } => {
            assert_eq!(operation, "union");
            assert_eq!(instance_ids.len(), 2);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_text_participants_use_their_bounding_box() {
    let fixture = Fixture::new();
    let shape = ShapeRecord::new("t", ShapeKind::Text, 0.0, 0.0, 100.0, 20.0);
    let stack = vec![
        Modifier::new("row", 0, LinearArraySettings::new(2, 50.0, 0.0)),
        Modifier::new("bool", 1, BooleanSettings::new(BooleanOperation::Union)),
    ];

    let state = fixture
        .composer()
        .process_modifiers(&shape, &stack, None)
        .unwrap();
    assert!((area(&fixture, &state) - 3_000.0).abs() < 1e-3);
}

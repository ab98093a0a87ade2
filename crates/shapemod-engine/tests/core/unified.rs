use shapemod_engine::geometry::Point;
use shapemod_engine::model::{BaseMeta, InstanceMeta};
use shapemod_engine::{
    GroupContext, ModifierMeta, Pose, UnifiedCompositionHandler, VirtualInstance,
};
use std::f64::consts::FRAC_PI_2;

use crate::common::{assert_point, square};

fn copy(id: &str, center: Point, rotation: f64) -> VirtualInstance {
    VirtualInstance {
        id: id.to_string(),
        source_shape_id: "s".to_string(),
        transform: Pose::new(center, rotation, 1.0, 1.0),
        meta: InstanceMeta::new(BaseMeta::default(), ModifierMeta::LinearArray),
    }
}

#[test]
fn test_original_alone_is_not_a_formation() {
    let shape = square("s", 0.0, 0.0, 10.0);
    let instances = vec![VirtualInstance::original(&shape)];
    assert!(!UnifiedCompositionHandler::should_use_unified_composition(&instances));
}

#[test]
fn test_two_copies_form_a_formation_with_or_without_original() {
    let shape = square("s", 0.0, 0.0, 10.0);
    let copies = vec![
        copy("a", Point::new(0.0, 0.0), 0.0),
        copy("b", Point::new(20.0, 0.0), 0.0),
    ];
    assert!(UnifiedCompositionHandler::should_use_unified_composition(&copies));

    let mut with_original = vec![VirtualInstance::original(&shape)];
    with_original.extend(copies);
    assert!(UnifiedCompositionHandler::should_use_unified_composition(&with_original));
}

#[test]
fn test_group_members_always_form_a_formation() {
    let shape = square("s", 0.0, 0.0, 10.0);
    let instances = vec![VirtualInstance::group_member(&shape, 0)];
    assert!(UnifiedCompositionHandler::should_use_unified_composition(&instances));
}

#[test]
fn test_collective_bounds_account_for_rotation() {
    let shape = square("s", 0.0, 0.0, 10.0);
    let mut long = shape.clone();
    long.props.w = Some(40.0);
    let instances = vec![copy("a", Point::new(0.0, 0.0), FRAC_PI_2)];

    let collective =
        UnifiedCompositionHandler::calculate_collective_bounds(&instances, &long, None);
    assert!((collective.bounds.width() - 10.0).abs() < 1e-6);
    assert!((collective.bounds.height() - 40.0).abs() < 1e-6);
    assert_point(collective.center, Point::new(0.0, 0.0));
}

#[test]
fn test_collective_bounds_ignore_instance_order() {
    let shape = square("s", 0.0, 0.0, 10.0);
    let mut instances = vec![
        copy("a", Point::new(0.0, 0.0), 0.3),
        copy("b", Point::new(50.0, -20.0), 1.1),
        copy("c", Point::new(-35.0, 80.0), 0.0),
    ];
    let forward = UnifiedCompositionHandler::calculate_collective_bounds(&instances, &shape, None);
    instances.reverse();
    let backward = UnifiedCompositionHandler::calculate_collective_bounds(&instances, &shape, None);
    assert_eq!(forward, backward);
}

#[test]
fn test_empty_formation_measures_the_original() {
    let shape = square("s", 10.0, 10.0, 30.0);
    let collective = UnifiedCompositionHandler::calculate_collective_bounds(&[], &shape, None);
    assert_eq!(collective.bounds, shape.page_bounds());
}

#[test]
fn test_group_shapes_are_measured_with_their_own_size() {
    let shape = square("s", 0.0, 0.0, 10.0);
    let big = square("big", 100.0, 0.0, 60.0);
    let group = GroupContext::from_shapes(vec![shape.clone(), big.clone()]).expect("group");
    let instances = vec![
        VirtualInstance::group_member(&shape, 0),
        VirtualInstance::group_member(&big, 1),
    ];

    let collective =
        UnifiedCompositionHandler::calculate_collective_bounds(&instances, &shape, Some(&group));
    assert_eq!(collective.bounds, group.group_bounds);
}

use shapemod_engine::geometry::outline::shape_outline;
use shapemod_engine::geometry::{oriented_bounds, Affine2, Bounds, Point};
use shapemod_engine::{Pose, ShapeKind, ShapeRecord};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::common::{assert_point, square, EPS};

#[test]
fn test_shape_center_follows_own_rotation() {
    let shape = square("s", 10.0, 20.0, 100.0).with_rotation(FRAC_PI_2);
    // Rotation pivots on the top-left corner.
    assert_point(shape.center(), Point::new(-40.0, 70.0));
}

#[test]
fn test_page_bounds_of_rotated_rectangle() {
    let shape = ShapeRecord::new("r", ShapeKind::Rectangle, 0.0, 0.0, 100.0, 20.0)
        .with_rotation(FRAC_PI_2);
    let bounds = shape.page_bounds();
    assert!((bounds.width() - 20.0).abs() < 1e-6);
    assert!((bounds.height() - 100.0).abs() < 1e-6);
}

#[test]
fn test_oriented_bounds_at_45_degrees() {
    let b = oriented_bounds(Point::new(0.0, 0.0), 1.0, 1.0, FRAC_PI_4);
    let half = 2f64.sqrt();
    assert!((b.max_x - half).abs() < EPS);
    assert!((b.min_y + half).abs() < EPS);
}

#[test]
fn test_pose_keeps_intended_values() {
    let pose = Pose::new(Point::new(5.0, 6.0), -FRAC_PI_2, -1.0, 1.0);
    assert_eq!(pose.rotation(), -FRAC_PI_2);
    assert_eq!(pose.scale_x(), -1.0);
    assert_eq!(pose.scale_y(), 1.0);
    assert_point(pose.center(), Point::new(5.0, 6.0));

    // A matrix alone cannot tell a flip from a half turn.
    let decomposed = pose.matrix.decompose();
    assert!((decomposed.scale_x.abs() - 1.0).abs() < EPS);
}

#[test]
fn test_matrix_inverse_round_trips_points() {
    let m = Affine2::from_trs(Point::new(3.0, -2.0), 0.7, 2.0, 0.5);
    let inv = m.inverse().expect("invertible");
    let p = Point::new(11.0, 4.0);
    assert_point(inv.transform_point(m.transform_point(p)), p);
}

#[test]
fn test_singular_matrix_has_no_inverse() {
    assert!(Affine2::scale(0.0, 1.0).inverse().is_none());
}

#[test]
fn test_rectangle_outline_is_centered() {
    let shape = square("s", 0.0, 0.0, 10.0);
    let outline = shape_outline(&shape, 10.0, 10.0, 0.25, 48);
    assert!(!outline.approximated);
    assert_eq!(outline.rings.len(), 1);
    let bounds = Bounds::from_points(&outline.rings[0]).expect("ring");
    assert_eq!(bounds, Bounds::new(-5.0, -5.0, 5.0, 5.0));
}

#[test]
fn test_text_outline_falls_back_to_bounding_box() {
    let shape = ShapeRecord::new("t", ShapeKind::Text, 0.0, 0.0, 40.0, 10.0);
    let outline = shape_outline(&shape, 40.0, 10.0, 0.25, 48);
    assert!(outline.approximated);
    assert_eq!(outline.rings[0].len(), 4);
}

#[test]
fn test_ellipse_outline_stays_inside_its_box() {
    let shape = ShapeRecord::new("e", ShapeKind::Ellipse, 0.0, 0.0, 40.0, 20.0);
    let outline = shape_outline(&shape, 40.0, 20.0, 0.25, 48);
    assert!(outline.rings[0].len() >= 8);
    assert!(outline.rings[0]
        .iter()
        .all(|p| p.x.abs() <= 20.0 + 1e-3 && p.y.abs() <= 10.0 + 1e-3));
}

//! Polygon outlines of host shapes.
//!
//! Outlines are built as lyon paths in local coordinates (origin at the
//! shape's middle) and flattened into point rings. Kinds without an area
//! (lines, text, images) fall back to their bounding rectangle.

use lyon::math::point;
use lyon::path::iterator::*;
use lyon::path::{Path, Winding};

use super::{Affine2, Point};
use crate::model::{ShapeKind, ShapeRecord};

/// Closed ring of points; the closing edge is implicit.
pub type Ring = Vec<Point>;

/// Polygon rings of one shape and whether they only approximate it.
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    pub rings: Vec<Ring>,
    /// `true` when the kind has no polygon extractor and the bounding box
    /// stands in for it.
    pub approximated: bool,
}

impl Outline {
    pub fn transformed(&self, m: &Affine2) -> Outline {
        Outline {
            rings: self
                .rings
                .iter()
                .map(|ring| ring.iter().map(|p| m.transform_point(*p)).collect())
                .collect(),
            approximated: self.approximated,
        }
    }
}

/// Builds the local outline of `shape` sized `width × height`.
pub fn shape_outline(
    shape: &ShapeRecord,
    width: f64,
    height: f64,
    tolerance: f64,
    ellipse_segments: u32,
) -> Outline {
    let hw = width / 2.0;
    let hh = height / 2.0;

    let rings = match shape.kind {
        ShapeKind::Rectangle => vec![rectangle(hw, hh)],
        ShapeKind::Ellipse => vec![ellipse(hw, hh, tolerance, ellipse_segments)],
        ShapeKind::Triangle => vec![vec![
            Point::new(0.0, -hh),
            Point::new(hw, hh),
            Point::new(-hw, hh),
        ]],
        ShapeKind::Polygon => vec![regular_polygon(hw, hh, shape.props.sides.unwrap_or(6))],
        ShapeKind::Path => {
            let offset = Point::new(hw, hh);
            let rings: Vec<Ring> = flatten_contours(&shape.props.paths, tolerance)
                .into_iter()
                .map(|ring| ring.into_iter().map(|p| p - offset).collect::<Ring>())
                .filter(|ring| ring.len() >= 3)
                .collect();
            if rings.is_empty() {
                return bounding_outline(hw, hh);
            }
            rings
        }
        ShapeKind::Line | ShapeKind::Text | ShapeKind::Image => {
            return bounding_outline(hw, hh);
        }
    };

    Outline {
        rings,
        approximated: false,
    }
}

fn bounding_outline(hw: f64, hh: f64) -> Outline {
    Outline {
        rings: vec![rectangle(hw, hh)],
        approximated: true,
    }
}

fn rectangle(hw: f64, hh: f64) -> Ring {
    vec![
        Point::new(-hw, -hh),
        Point::new(hw, -hh),
        Point::new(hw, hh),
        Point::new(-hw, hh),
    ]
}

fn ellipse(rx: f64, ry: f64, tolerance: f64, min_segments: u32) -> Ring {
    let mut builder = Path::builder();
    builder.add_ellipse(
        point(0.0, 0.0),
        lyon::math::vector(rx as f32, ry as f32),
        lyon::math::Angle::radians(0.0),
        Winding::Positive,
    );
    let path = builder.build();

    let ring = flatten_path(&path, tolerance)
        .into_iter()
        .next()
        .unwrap_or_default();
    if ring.len() >= min_segments as usize {
        return ring;
    }

    // Coarse tolerance on a small ellipse; sample it directly instead.
    (0..min_segments)
        .map(|i| {
            let theta = 2.0 * std::f64::consts::PI * (i as f64) / (min_segments as f64);
            Point::new(rx * theta.cos(), ry * theta.sin())
        })
        .collect()
}

fn regular_polygon(hw: f64, hh: f64, sides: u32) -> Ring {
    let sides = sides.max(3);
    // First vertex points up, like the host's polygon tool.
    (0..sides)
        .map(|i| {
            let theta = 2.0 * std::f64::consts::PI * (i as f64) / (sides as f64)
                - std::f64::consts::FRAC_PI_2;
            Point::new(hw * theta.cos(), hh * theta.sin())
        })
        .collect()
}

/// Flattens polyline contours through lyon, closing each one.
pub fn flatten_contours(contours: &[Vec<Point>], tolerance: f64) -> Vec<Ring> {
    let mut builder = Path::builder();
    let mut any = false;
    for contour in contours.iter().filter(|c| c.len() >= 2) {
        let mut iter = contour.iter();
        if let Some(first) = iter.next() {
            builder.begin(point(first.x as f32, first.y as f32));
            for p in iter {
                builder.line_to(point(p.x as f32, p.y as f32));
            }
            builder.close();
            any = true;
        }
    }
    if !any {
        return Vec::new();
    }
    flatten_path(&builder.build(), tolerance)
}

fn flatten_path(path: &Path, tolerance: f64) -> Vec<Ring> {
    let mut rings = Vec::new();
    let mut current: Ring = Vec::new();

    for event in path.iter().flattened(tolerance as f32) {
        match event {
            lyon::path::Event::Begin { at } => {
                current.clear();
                current.push(Point::new(at.x as f64, at.y as f64));
            }
            lyon::path::Event::Line { to, .. } => {
                current.push(Point::new(to.x as f64, to.y as f64));
            }
            lyon::path::Event::End { .. } => {
                if let (Some(first), Some(last)) = (current.first(), current.last()) {
                    if current.len() > 1 && first.distance_to(last) < 1e-6 {
                        current.pop();
                    }
                }
                if !current.is_empty() {
                    rings.push(std::mem::take(&mut current));
                }
            }
            _ => {}
        }
    }

    rings
}

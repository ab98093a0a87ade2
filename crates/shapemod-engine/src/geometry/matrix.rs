//! 2D affine transforms backed by a homogeneous `nalgebra::Matrix3`.
//!
//! Composition follows column-vector convention: `a.compose(&b)` applies `b`
//! first, then `a`.

use nalgebra::{Matrix3, Point2, Vector2};
use serde::{Deserialize, Serialize};

use super::Point;

/// Affine transform (translation, rotation, scale, reflection)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 6]", into = "[f64; 6]")]
pub struct Affine2(Matrix3<f64>);

/// Result of splitting a matrix back into translation, rotation and scale.
///
/// Rotation extracted from a composed rotation+scale matrix is not unique
/// (a reflection can be read as a negative scale on either axis), which is
/// why instances carry their intended values next to the matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decomposed {
    pub translation: Point,
    /// Radians
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Default for Affine2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Affine2 {
    pub fn identity() -> Self {
        Self(Matrix3::identity())
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self(Matrix3::new_translation(&Vector2::new(tx, ty)))
    }

    /// Rotation about the origin by `angle` radians
    pub fn rotation(angle: f64) -> Self {
        Self(Matrix3::new_rotation(angle))
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self(Matrix3::new_nonuniform_scaling(&Vector2::new(sx, sy)))
    }

    /// `T(translation) · R(rotation) · S(sx, sy)`: scale first, then rotate,
    /// then move local origin to `translation`.
    pub fn from_trs(translation: Point, rotation: f64, sx: f64, sy: f64) -> Self {
        Self::translation(translation.x, translation.y)
            .compose(&Self::rotation(rotation))
            .compose(&Self::scale(sx, sy))
    }

    /// Rotation of `angle` radians around `pivot`
    pub fn rotation_about(pivot: Point, angle: f64) -> Self {
        Self::translation(pivot.x, pivot.y)
            .compose(&Self::rotation(angle))
            .compose(&Self::translation(-pivot.x, -pivot.y))
    }

    /// `self · other` (apply `other` first)
    pub fn compose(&self, other: &Affine2) -> Affine2 {
        Affine2(self.0 * other.0)
    }

    /// Apply `self` first, then `next`
    pub fn then(&self, next: &Affine2) -> Affine2 {
        next.compose(self)
    }

    pub fn transform_point(&self, p: Point) -> Point {
        let out = self.0.transform_point(&Point2::new(p.x, p.y));
        Point::new(out.x, out.y)
    }

    pub fn transform_vector(&self, v: Point) -> Point {
        let out = self.0.transform_vector(&Vector2::new(v.x, v.y));
        Point::new(out.x, out.y)
    }

    pub fn translation_part(&self) -> Point {
        Point::new(self.0[(0, 2)], self.0[(1, 2)])
    }

    pub fn determinant(&self) -> f64 {
        self.0[(0, 0)] * self.0[(1, 1)] - self.0[(0, 1)] * self.0[(1, 0)]
    }

    pub fn inverse(&self) -> Option<Affine2> {
        self.0.try_inverse().map(Affine2)
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    /// Splits the linear part into rotation and scale. A negative
    /// determinant is reported as a negative `scale_y`.
    pub fn decompose(&self) -> Decomposed {
        let a = self.0[(0, 0)];
        let b = self.0[(1, 0)];
        let scale_x = (a * a + b * b).sqrt();
        let rotation = b.atan2(a);
        let scale_y = if scale_x > 0.0 {
            self.determinant() / scale_x
        } else {
            (self.0[(0, 1)].powi(2) + self.0[(1, 1)].powi(2)).sqrt()
        };

        Decomposed {
            translation: self.translation_part(),
            rotation,
            scale_x,
            scale_y,
        }
    }

    /// `[a, b, c, d, tx, ty]` in the usual 2D canvas order
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.0[(0, 0)],
            self.0[(1, 0)],
            self.0[(0, 1)],
            self.0[(1, 1)],
            self.0[(0, 2)],
            self.0[(1, 2)],
        ]
    }
}

impl From<[f64; 6]> for Affine2 {
    fn from(v: [f64; 6]) -> Self {
        Affine2(Matrix3::new(v[0], v[2], v[4], v[1], v[3], v[5], 0.0, 0.0, 1.0))
    }
}

impl From<Affine2> for [f64; 6] {
    fn from(m: Affine2) -> Self {
        m.to_array()
    }
}

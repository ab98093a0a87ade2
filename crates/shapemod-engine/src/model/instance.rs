//! # Virtual Instances
//!
//! Lightweight placements standing in for shape copies until materialization.

use serde::{Deserialize, Serialize};
use shapemod_core::ShapeId;

use super::modifier::MirrorAxis;
use super::shape::ShapeRecord;
use crate::boolean::BooleanPlan;
use crate::geometry::{Affine2, Point};

/// Rotation and scale as a processor meant them
///
/// Decomposing a composed rotation+scale matrix is not unique, so these win
/// over [`Affine2::decompose`] whenever they are set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IntendedTransform {
    /// Radians
    #[serde(rename = "targetRotation", skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(rename = "targetScaleX", skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f64>,
    #[serde(rename = "targetScaleY", skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f64>,
}

/// Center-anchored placement: `T(center) · R(rotation) · S(sx, sy)` applied
/// to coordinates centered on the shape's middle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub matrix: Affine2,
    #[serde(default)]
    pub intended: IntendedTransform,
}

impl Pose {
    pub fn new(center: Point, rotation: f64, scale_x: f64, scale_y: f64) -> Self {
        Self {
            matrix: Affine2::from_trs(center, rotation, scale_x, scale_y),
            intended: IntendedTransform {
                rotation: Some(rotation),
                scale_x: Some(scale_x),
                scale_y: Some(scale_y),
            },
        }
    }

    /// Pose known only through its matrix
    pub fn from_matrix(matrix: Affine2) -> Self {
        Self {
            matrix,
            intended: IntendedTransform::default(),
        }
    }

    pub fn center(&self) -> Point {
        self.matrix.translation_part()
    }

    pub fn rotation(&self) -> f64 {
        self.intended
            .rotation
            .unwrap_or_else(|| self.matrix.decompose().rotation)
    }

    pub fn scale_x(&self) -> f64 {
        self.intended
            .scale_x
            .unwrap_or_else(|| self.matrix.decompose().scale_x)
    }

    pub fn scale_y(&self) -> f64 {
        self.intended
            .scale_y
            .unwrap_or_else(|| self.matrix.decompose().scale_y)
    }

    pub fn is_finite(&self) -> bool {
        self.matrix.is_finite()
            && [
                self.intended.rotation,
                self.intended.scale_x,
                self.intended.scale_y,
            ]
            .iter()
            .flatten()
            .all(|v| v.is_finite())
    }
}

/// Bookkeeping shared by every instance regardless of the modifier that
/// produced it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseMeta {
    /// Position in the producing modifier's output
    pub index: usize,
    /// Position of the input instance this one was derived from
    pub source_index: usize,
    /// Array position (copy number) within the modifier
    pub array_index: usize,
    /// 1-based index of the producing modifier in the enabled stack
    pub generation_level: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub from_unified_group: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boolean_group_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "modifierType", rename_all = "kebab-case")]
pub enum ModifierMeta {
    Original,
    GroupMember,
    LinearArray,
    CircularArray {
        /// Angle on the circle, radians
        angle: f64,
    },
    GridArray {
        row: u32,
        column: u32,
    },
    Mirror {
        axis: MirrorAxis,
        mirrored: bool,
    },
    BooleanResult(Box<BooleanPlan>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceMeta {
    #[serde(flatten)]
    pub base: BaseMeta,
    #[serde(flatten)]
    pub kind: ModifierMeta,
}

impl InstanceMeta {
    pub fn new(base: BaseMeta, kind: ModifierMeta) -> Self {
        Self { base, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualInstance {
    pub id: String,
    pub source_shape_id: ShapeId,
    pub transform: Pose,
    pub meta: InstanceMeta,
}

impl VirtualInstance {
    /// The untransformed source: its own center and rotation, scale 1
    pub fn original(shape: &ShapeRecord) -> Self {
        Self {
            id: shape.id.clone(),
            source_shape_id: shape.id.clone(),
            transform: Pose::new(shape.center(), shape.rotation, 1.0, 1.0),
            meta: InstanceMeta::new(BaseMeta::default(), ModifierMeta::Original),
        }
    }

    /// A document group member entering the stack as part of a formation
    pub fn group_member(shape: &ShapeRecord, index: usize) -> Self {
        Self {
            id: shape.id.clone(),
            source_shape_id: shape.id.clone(),
            transform: Pose::new(shape.center(), shape.rotation, 1.0, 1.0),
            meta: InstanceMeta::new(
                BaseMeta {
                    index,
                    source_index: index,
                    ..BaseMeta::default()
                },
                ModifierMeta::GroupMember,
            ),
        }
    }

    pub fn is_original(&self) -> bool {
        matches!(self.meta.kind, ModifierMeta::Original)
    }

    pub fn is_group_member(&self) -> bool {
        matches!(self.meta.kind, ModifierMeta::GroupMember)
    }

    pub fn boolean_plan(&self) -> Option<&BooleanPlan> {
        match &self.meta.kind {
            ModifierMeta::BooleanResult(plan) => Some(plan),
            _ => None,
        }
    }

    pub fn center(&self) -> Point {
        self.transform.center()
    }

    pub fn rotation(&self) -> f64 {
        self.transform.rotation()
    }

    pub fn scale_x(&self) -> f64 {
        self.transform.scale_x()
    }

    pub fn scale_y(&self) -> f64 {
        self.transform.scale_y()
    }

    pub fn generation_level(&self) -> u32 {
        self.meta.base.generation_level
    }
}

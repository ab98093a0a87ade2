use serde::{Deserialize, Serialize};
use shapemod_core::constants::MIN_REFERENCE_EXTENT;
use shapemod_core::ShapeId;

use crate::geometry::{oriented_bounds, Bounds, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Triangle,
    Polygon,
    Path,
    Line,
    Text,
    Image,
}

impl ShapeKind {
    /// Kinds with a dedicated polygon extractor; the rest are approximated
    /// by their bounding box in boolean operations.
    pub fn has_polygon_outline(&self) -> bool {
        matches!(
            self,
            ShapeKind::Rectangle
                | ShapeKind::Ellipse
                | ShapeKind::Triangle
                | ShapeKind::Polygon
                | ShapeKind::Path
        )
    }
}

/// Visual attributes shared by every shape kind
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShapeStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
}

impl ShapeStyle {
    /// Field-by-field intersection: a field survives only when every style
    /// agrees on it, otherwise it is left unset.
    pub fn shared<'a>(styles: impl IntoIterator<Item = &'a ShapeStyle>) -> ShapeStyle {
        fn agree<T: PartialEq + Clone>(acc: &mut Option<Option<T>>, value: &Option<T>) {
            match acc {
                None => *acc = Some(value.clone()),
                Some(current) if current != value => *current = None,
                Some(_) => {}
            }
        }

        let mut color = None;
        let mut fill = None;
        let mut dash = None;
        let mut size = None;
        let mut stroke_width = None;

        for style in styles {
            agree(&mut color, &style.color);
            agree(&mut fill, &style.fill);
            agree(&mut dash, &style.dash);
            agree(&mut size, &style.size);
            agree(&mut stroke_width, &style.stroke_width);
        }

        ShapeStyle {
            color: color.flatten(),
            fill: fill.flatten(),
            dash: dash.flatten(),
            size: size.flatten(),
            stroke_width: stroke_width.flatten(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShapeProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
    /// Side count of regular polygons
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sides: Option<u32>,
    /// Contours in local coordinates (origin at the unrotated top-left)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<Vec<Point>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

/// Metadata the engine attaches to shapes it derives
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShapeMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_shape_id: Option<ShapeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_index: Option<usize>,
    /// Intended rotation (radians); the host applies it around the center.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_scale_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_scale_y: Option<f64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub boolean_result: bool,
}

/// Host shape record
///
/// `x`/`y` is the page-space origin (top-left before rotation) and
/// `rotation` (radians) pivots around it, as the host stores shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeRecord {
    pub id: ShapeId,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub props: ShapeProps,
    #[serde(default)]
    pub meta: ShapeMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ShapeId>,
}

impl ShapeRecord {
    pub fn new(id: impl Into<ShapeId>, kind: ShapeKind, x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            id: id.into(),
            kind,
            x,
            y,
            rotation: 0.0,
            props: ShapeProps {
                w: Some(w),
                h: Some(h),
                ..ShapeProps::default()
            },
            meta: ShapeMeta::default(),
            parent_id: None,
        }
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.props.style = style;
        self
    }

    pub fn with_paths(mut self, paths: Vec<Vec<Point>>) -> Self {
        self.props.paths = paths;
        self
    }

    /// Width and height as the host knows them: `w`/`h` props, or the extent
    /// of the contours. `None` for shapes the host sizes itself (text).
    pub fn dimensions(&self) -> Option<(f64, f64)> {
        if let (Some(w), Some(h)) = (self.props.w, self.props.h) {
            return Some((w, h));
        }
        Bounds::from_points(self.props.paths.iter().flatten()).map(|b| (b.width(), b.height()))
    }

    /// Local size never smaller than 1×1.
    pub fn local_size(&self) -> (f64, f64) {
        let (w, h) = self.dimensions().unwrap_or((0.0, 0.0));
        (w.max(MIN_REFERENCE_EXTENT), h.max(MIN_REFERENCE_EXTENT))
    }

    /// Geometric center under the shape's own rotation
    pub fn center(&self) -> Point {
        let (w, h) = self.local_size();
        Point::new(self.x, self.y) + Point::new(w / 2.0, h / 2.0).rotated(self.rotation)
    }

    pub fn page_bounds(&self) -> Bounds {
        let (w, h) = self.local_size();
        oriented_bounds(self.center(), w / 2.0, h / 2.0, self.rotation)
    }
}

/// Partial record for an existing derived shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeUpdate {
    pub id: ShapeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub props: Option<ShapeProps>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ShapeMeta>,
}

impl ShapeUpdate {
    /// Update that moves `id` onto everything `record` describes
    pub fn from_record(id: ShapeId, record: ShapeRecord) -> Self {
        Self {
            id,
            x: Some(record.x),
            y: Some(record.y),
            rotation: Some(record.rotation),
            props: Some(record.props),
            meta: Some(record.meta),
        }
    }
}

//! # Modifier Model
//!
//! Modifiers and their type-specific settings.
//!
//! Offsets and spacing are percentages of the reference width/height, angles
//! are degrees and scale steps are percentages (`100` means unchanged), the
//! same units the host's modifier panel edits them in.

use serde::{Deserialize, Serialize};
use shapemod_core::{ModifierId, ProcessorError, ProcessorResult};
use std::fmt;

/// The five modifier kinds the engine knows how to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModifierKind {
    LinearArray,
    CircularArray,
    GridArray,
    Mirror,
    Boolean,
}

impl ModifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LinearArray => "linear-array",
            Self::CircularArray => "circular-array",
            Self::GridArray => "grid-array",
            Self::Mirror => "mirror",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ModifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry of a shape's modifier stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Modifier {
    pub id: ModifierId,
    /// Position in the stack; lower runs first, ties keep insertion order
    pub order: i32,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    pub settings: ModifierSettings,
}

fn enabled_by_default() -> bool {
    true
}

impl Modifier {
    pub fn new(id: impl Into<ModifierId>, order: i32, settings: impl Into<ModifierSettings>) -> Self {
        Self {
            id: id.into(),
            order,
            enabled: true,
            settings: settings.into(),
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn kind(&self) -> ModifierKind {
        self.settings.kind()
    }
}

/// Settings of a modifier, tagged by `type` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ModifierSettings {
    LinearArray(LinearArraySettings),
    CircularArray(CircularArraySettings),
    GridArray(GridArraySettings),
    Mirror(MirrorSettings),
    Boolean(BooleanSettings),
}

impl ModifierSettings {
    pub fn kind(&self) -> ModifierKind {
        match self {
            Self::LinearArray(_) => ModifierKind::LinearArray,
            Self::CircularArray(_) => ModifierKind::CircularArray,
            Self::GridArray(_) => ModifierKind::GridArray,
            Self::Mirror(_) => ModifierKind::Mirror,
            Self::Boolean(_) => ModifierKind::Boolean,
        }
    }

    pub fn validate(&self) -> ProcessorResult<()> {
        match self {
            Self::LinearArray(s) => s.validate(),
            Self::CircularArray(s) => s.validate(),
            Self::GridArray(s) => s.validate(),
            Self::Mirror(s) => s.validate(),
            Self::Boolean(_) => Ok(()),
        }
    }
}

macro_rules! impl_into_settings {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for ModifierSettings {
                fn from(settings: $ty) -> Self {
                    ModifierSettings::$variant(settings)
                }
            }
        )*
    };
}

impl_into_settings!(
    LinearArraySettings => LinearArray,
    CircularArraySettings => CircularArray,
    GridArraySettings => GridArray,
    MirrorSettings => Mirror,
    BooleanSettings => Boolean,
);

fn require_finite(modifier: ModifierKind, fields: &[(&str, f64)]) -> ProcessorResult<()> {
    match fields.iter().find(|(_, value)| !value.is_finite()) {
        Some((field, _)) => Err(ProcessorError::NonFinite {
            modifier: modifier.to_string(),
            field: (*field).to_string(),
        }),
        None => Ok(()),
    }
}

fn require_positive(modifier: ModifierKind, field: &str, value: u32) -> ProcessorResult<()> {
    if value == 0 {
        return Err(ProcessorError::InvalidSettings {
            modifier: modifier.to_string(),
            reason: format!("{field} must be at least 1"),
        });
    }
    Ok(())
}

/// Copies along a straight line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinearArraySettings {
    pub count: u32,
    /// Step along x, percent of the reference width
    pub offset_x: f64,
    /// Step along y, percent of the reference height
    pub offset_y: f64,
    /// Degrees added per copy
    pub rotation_increment: f64,
    /// Degrees applied to every copy
    pub rotate_all: f64,
    /// Scale of the last copy in percent; intermediate copies interpolate
    pub scale_step: f64,
}

impl Default for LinearArraySettings {
    fn default() -> Self {
        Self {
            count: 3,
            offset_x: 120.0,
            offset_y: 0.0,
            rotation_increment: 0.0,
            rotate_all: 0.0,
            scale_step: 100.0,
        }
    }
}

impl LinearArraySettings {
    pub fn new(count: u32, offset_x: f64, offset_y: f64) -> Self {
        Self {
            count,
            offset_x,
            offset_y,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> ProcessorResult<()> {
        let kind = ModifierKind::LinearArray;
        require_positive(kind, "count", self.count)?;
        require_finite(
            kind,
            &[
                ("offsetX", self.offset_x),
                ("offsetY", self.offset_y),
                ("rotationIncrement", self.rotation_increment),
                ("rotateAll", self.rotate_all),
                ("scaleStep", self.scale_step),
            ],
        )
    }
}

/// Copies distributed over a circular arc
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CircularArraySettings {
    pub count: u32,
    /// Page units
    pub radius: f64,
    /// Degrees
    pub start_angle: f64,
    /// Degrees
    pub end_angle: f64,
    /// Circle center relative to the reference point, page units
    pub center_x: f64,
    pub center_y: f64,
    /// Degrees applied to every copy
    pub rotate_all: f64,
    /// Degrees added per copy
    pub rotate_each: f64,
    /// Turn each copy to face the circle's center
    pub align_to_center: bool,
}

impl Default for CircularArraySettings {
    fn default() -> Self {
        Self {
            count: 8,
            radius: 100.0,
            start_angle: 0.0,
            end_angle: 360.0,
            center_x: 0.0,
            center_y: 0.0,
            rotate_all: 0.0,
            rotate_each: 0.0,
            align_to_center: false,
        }
    }
}

impl CircularArraySettings {
    pub fn new(count: u32, radius: f64) -> Self {
        Self {
            count,
            radius,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> ProcessorResult<()> {
        let kind = ModifierKind::CircularArray;
        require_positive(kind, "count", self.count)?;
        require_finite(
            kind,
            &[
                ("radius", self.radius),
                ("startAngle", self.start_angle),
                ("endAngle", self.end_angle),
                ("centerX", self.center_x),
                ("centerY", self.center_y),
                ("rotateAll", self.rotate_all),
                ("rotateEach", self.rotate_each),
            ],
        )
    }
}

/// Copies laid out in rows and columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridArraySettings {
    pub rows: u32,
    pub columns: u32,
    /// Column pitch, percent of the reference width
    pub spacing_x: f64,
    /// Row pitch, percent of the reference height
    pub spacing_y: f64,
    pub rotate_all: f64,
    /// Degrees per linear index
    pub rotate_each: f64,
    pub rotate_each_row: f64,
    pub rotate_each_column: f64,
    /// Final scale in percent along the linear index
    pub scale_step: f64,
    pub scale_step_row: f64,
    pub scale_step_column: f64,
}

impl Default for GridArraySettings {
    fn default() -> Self {
        Self {
            rows: 2,
            columns: 2,
            spacing_x: 120.0,
            spacing_y: 120.0,
            rotate_all: 0.0,
            rotate_each: 0.0,
            rotate_each_row: 0.0,
            rotate_each_column: 0.0,
            scale_step: 100.0,
            scale_step_row: 100.0,
            scale_step_column: 100.0,
        }
    }
}

impl GridArraySettings {
    pub fn new(rows: u32, columns: u32, spacing_x: f64, spacing_y: f64) -> Self {
        Self {
            rows,
            columns,
            spacing_x,
            spacing_y,
            ..Self::default()
        }
    }

    pub fn total_copies(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    pub fn validate(&self) -> ProcessorResult<()> {
        let kind = ModifierKind::GridArray;
        require_positive(kind, "rows", self.rows)?;
        require_positive(kind, "columns", self.columns)?;
        require_finite(
            kind,
            &[
                ("spacingX", self.spacing_x),
                ("spacingY", self.spacing_y),
                ("rotateAll", self.rotate_all),
                ("rotateEach", self.rotate_each),
                ("rotateEachRow", self.rotate_each_row),
                ("rotateEachColumn", self.rotate_each_column),
                ("scaleStep", self.scale_step),
                ("scaleStepRow", self.scale_step_row),
                ("scaleStepColumn", self.scale_step_column),
            ],
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MirrorAxis {
    /// Reflect across a vertical line (x flips)
    #[default]
    X,
    /// Reflect across a horizontal line (y flips)
    Y,
}

impl fmt::Display for MirrorAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MirrorSettings {
    pub axis: MirrorAxis,
    /// Distance of the mirror line from the reference center, page units
    pub offset: f64,
}

impl MirrorSettings {
    pub fn new(axis: MirrorAxis, offset: f64) -> Self {
        Self { axis, offset }
    }

    pub fn validate(&self) -> ProcessorResult<()> {
        require_finite(ModifierKind::Mirror, &[("offset", self.offset)])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BooleanOperation {
    #[default]
    Union,
    Subtract,
    Intersect,
    Exclude,
}

impl fmt::Display for BooleanOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Union => write!(f, "union"),
            Self::Subtract => write!(f, "subtract"),
            Self::Intersect => write!(f, "intersect"),
            Self::Exclude => write!(f, "exclude"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BooleanSettings {
    pub operation: BooleanOperation,
}

impl BooleanSettings {
    pub fn new(operation: BooleanOperation) -> Self {
        Self { operation }
    }
}

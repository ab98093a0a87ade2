//! Numeric constants shared across the workspace.

/// Tolerance below which lengths, angles and scale deltas count as zero.
pub const GEOMETRY_EPSILON: f64 = 1e-9;

/// Smallest reference extent used when resolving percentage settings, so a
/// zero-size shape never divides by zero.
pub const MIN_REFERENCE_EXTENT: f64 = 1.0;

/// Angular span (degrees) treated as a full turn by circular arrays.
pub const FULL_TURN_DEGREES: f64 = 360.0;

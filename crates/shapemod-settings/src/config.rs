//! Engine configuration for Shapemod
//!
//! Configuration is organized into logical sections:
//! - Processing (error recovery, instance limits, reference points)
//! - Geometry (polygon extraction fidelity)
//! - Cache (boolean geometry cache sizing)
//!
//! Settings can be loaded from and saved to JSON or TOML files.

use crate::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// What the composer does when a single modifier fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecoveryStrategy {
    /// Skip the failing modifier and continue with the previous instances
    #[default]
    Skip,
    /// Replace the instance list with nothing and continue
    EmptyResult,
    /// Run the modifier once more; skip it if it fails again
    RetryOnce,
    /// Stop processing and return the error to the host
    Abort,
}

impl fmt::Display for RecoveryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => write!(f, "skip"),
            Self::EmptyResult => write!(f, "empty-result"),
            Self::RetryOnce => write!(f, "retry-once"),
            Self::Abort => write!(f, "abort"),
        }
    }
}

/// Which point a modifier anchors to when its input is a formation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferencePoint {
    /// The source shape's own center; unaffected by upstream modifiers
    #[default]
    Stable,
    /// The center of the incoming formation's collective bounds
    Collective,
}

impl fmt::Display for ReferencePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stable => write!(f, "stable"),
            Self::Collective => write!(f, "collective"),
        }
    }
}

/// Processing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingSettings {
    /// Recovery strategy for failing modifiers
    pub recovery: RecoveryStrategy,
    /// Upper bound on the number of virtual instances a stack may produce
    pub max_instances: usize,
    /// Anchor of circular arrays applied to formations
    pub circular_reference: ReferencePoint,
    /// Anchor of mirror lines
    pub mirror_reference: ReferencePoint,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            recovery: RecoveryStrategy::Skip,
            max_instances: 10_000,
            circular_reference: ReferencePoint::Stable,
            mirror_reference: ReferencePoint::Stable,
        }
    }
}

/// Geometry extraction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometrySettings {
    /// Flattening tolerance (page units) for curved outlines
    pub flatten_tolerance: f64,
    /// Minimum number of vertices used for ellipse outlines
    pub ellipse_segments: u32,
}

impl Default for GeometrySettings {
    fn default() -> Self {
        Self {
            flatten_tolerance: 0.25,
            ellipse_segments: 48,
        }
    }
}

/// Cache sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Maximum number of boolean results kept before the oldest is evicted
    pub boolean_capacity: usize,
    /// Maximum number of stored boolean input lists
    pub storage_capacity: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            boolean_capacity: 256,
            storage_capacity: 1024,
        }
    }
}

/// Complete engine configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineSettings {
    /// Processing settings
    pub processing: ProcessingSettings,
    /// Geometry settings
    pub geometry: GeometrySettings,
    /// Cache settings
    pub cache: CacheSettings,
}

impl EngineSettings {
    /// Create new settings with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style override of the recovery strategy
    pub fn with_recovery(mut self, recovery: RecoveryStrategy) -> Self {
        self.processing.recovery = recovery;
        self
    }

    /// Load settings from a file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let settings: Self = match Format::from_path(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::from_path(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)
                .map_err(|e| SettingsError::SaveError(e.to_string()))?,
        };

        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate settings
    pub fn validate(&self) -> SettingsResult<()> {
        if self.processing.max_instances == 0 {
            return Err(SettingsError::InvalidSetting {
                key: "processing.max_instances".to_string(),
                reason: "must be > 0".to_string(),
            });
        }

        if !self.geometry.flatten_tolerance.is_finite() || self.geometry.flatten_tolerance <= 0.0
        {
            return Err(SettingsError::InvalidSetting {
                key: "geometry.flatten_tolerance".to_string(),
                reason: "must be a positive number".to_string(),
            });
        }

        if self.geometry.ellipse_segments < 8 {
            return Err(SettingsError::InvalidSetting {
                key: "geometry.ellipse_segments".to_string(),
                reason: "must be >= 8".to_string(),
            });
        }

        if self.cache.boolean_capacity == 0 || self.cache.storage_capacity == 0 {
            return Err(SettingsError::InvalidSetting {
                key: "cache".to_string(),
                reason: "capacities must be > 0".to_string(),
            });
        }

        Ok(())
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(SettingsError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

//! Scenario models and loaders for visibility, shadow, and coordinate searches.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use vw_core::search::{Aberration, CoordinateSystem, Relation, ShapeModel};

/// Picture used for reports when a scenario does not name one.
pub const DEFAULT_TIME_FORMAT: &str = "YYYY MON DD HR:MN:SC.### (TDB) ::TDB";
/// Coarse search step used when a scenario does not name one.
pub const DEFAULT_STEP_SECONDS: f64 = 300.0;
/// Result capacity used when a scenario does not name one.
pub const DEFAULT_MAX_INTERVALS: usize = 1000;

/// Complete scenario file: shared search settings plus one section per search kind.
#[derive(Debug, Deserialize, Clone)]
pub struct Scenario {
    pub meta_kernel: PathBuf,
    #[serde(flatten)]
    pub window: SearchWindowConfig,
    #[serde(default = "default_time_format")]
    pub time_format: String,
    #[serde(default)]
    pub visibility: Option<VisibilityConfig>,
    #[serde(default)]
    pub shadow: Option<ShadowConfig>,
    #[serde(default)]
    pub coordinate: Option<CoordinateConfig>,
}

/// Confinement interval and search granularity.
#[derive(Debug, Deserialize, Clone)]
pub struct SearchWindowConfig {
    pub start: String,
    pub stop: String,
    #[serde(default = "default_step_seconds")]
    pub step_seconds: f64,
    #[serde(default = "default_max_intervals")]
    pub max_intervals: usize,
}

/// Ground-station view periods, optionally excluding occultations.
#[derive(Debug, Deserialize, Clone)]
pub struct VisibilityConfig {
    pub target: String,
    pub station: String,
    pub station_frame: String,
    #[serde(default)]
    pub aberration: Aberration,
    pub elevation_limit_deg: f64,
    #[serde(default)]
    pub occultation: Option<OccultationConfig>,
}

/// Blocking body used to remove occulted periods from a view period window.
#[derive(Debug, Deserialize, Clone)]
pub struct OccultationConfig {
    pub blocker: String,
    pub blocker_frame: String,
    #[serde(default = "default_shapes")]
    pub shapes: Vec<ShapeModel>,
}

/// Eclipse of a light source by a body as seen from a spacecraft.
#[derive(Debug, Deserialize, Clone)]
pub struct ShadowConfig {
    pub spacecraft: String,
    pub body: String,
    pub body_frame: String,
    #[serde(default = "default_light_source")]
    pub light_source: String,
    #[serde(default = "default_light_source_frame")]
    pub light_source_frame: String,
    #[serde(default)]
    pub aberration: Aberration,
}

/// Generic coordinate relation search.
#[derive(Debug, Deserialize, Clone)]
pub struct CoordinateConfig {
    pub target: String,
    pub observer: String,
    pub frame: String,
    #[serde(default)]
    pub aberration: Aberration,
    pub coordinate_system: CoordinateSystem,
    pub coordinate: String,
    pub relation: Relation,
    /// Degrees for angular coordinates, kilometres otherwise.
    #[serde(default)]
    pub reference_value: f64,
    #[serde(default)]
    pub adjustment: f64,
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid scenario field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Load and validate a scenario from a YAML or TOML file.
pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<Scenario, ConfigError> {
    let path = path.as_ref();
    let scenario: Scenario = if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)?
    } else {
        let reader = File::open(path)?;
        serde_yaml::from_reader(reader)?
    };
    scenario.validate()?;
    Ok(scenario)
}

impl Scenario {
    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.window.validate()?;
        if let Some(visibility) = &self.visibility {
            visibility.validate()?;
        }
        if let Some(coordinate) = &self.coordinate {
            coordinate.validate()?;
        }
        Ok(())
    }
}

impl SearchWindowConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.step_seconds.is_finite() && self.step_seconds > 0.0) {
            return Err(invalid(
                "step_seconds",
                format!("must be positive (got {})", self.step_seconds),
            ));
        }
        if self.max_intervals == 0 {
            return Err(invalid("max_intervals", "must be at least 1"));
        }
        Ok(())
    }
}

impl VisibilityConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(-90.0..=90.0).contains(&self.elevation_limit_deg) {
            return Err(invalid(
                "visibility.elevation_limit_deg",
                format!("must lie in [-90, 90] (got {})", self.elevation_limit_deg),
            ));
        }
        if let Some(occultation) = &self.occultation {
            if occultation.shapes.is_empty() {
                return Err(invalid(
                    "visibility.occultation.shapes",
                    "at least one shape model is required",
                ));
            }
            if occultation.shapes.contains(&ShapeModel::Point) {
                return Err(invalid(
                    "visibility.occultation.shapes",
                    "the blocking body cannot be modelled as a point",
                ));
            }
        }
        Ok(())
    }
}

impl CoordinateConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.reference_value.is_finite() {
            return Err(invalid(
                "coordinate.reference_value",
                format!("must be finite (got {})", self.reference_value),
            ));
        }
        if !(self.adjustment.is_finite() && self.adjustment >= 0.0) {
            return Err(invalid(
                "coordinate.adjustment",
                format!("must be finite and not negative (got {})", self.adjustment),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn default_time_format() -> String {
    DEFAULT_TIME_FORMAT.to_string()
}

fn default_step_seconds() -> f64 {
    DEFAULT_STEP_SECONDS
}

fn default_max_intervals() -> usize {
    DEFAULT_MAX_INTERVALS
}

fn default_shapes() -> Vec<ShapeModel> {
    vec![ShapeModel::Ellipsoid]
}

fn default_light_source() -> String {
    "SUN".to_string()
}

fn default_light_source_frame() -> String {
    "IAU_SUN".to_string()
}

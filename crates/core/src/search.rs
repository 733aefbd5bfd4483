//! Vocabulary shared by geometry searches: aberration corrections, relations,
//! coordinate systems, occultation types, and body shape models.
//!
//! Each type maps onto the keyword string the SPICE geometry finder expects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A keyword that names none of the accepted values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}`: expected one of {expected}")]
pub struct KeywordError {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

/// Case-insensitive lookup of `value` among the SPICE keywords of `all`.
fn lookup<T: Copy>(
    kind: &'static str,
    value: &str,
    all: &[T],
    spice: fn(T) -> &'static str,
) -> Result<T, KeywordError> {
    let wanted = value.trim();
    all.iter()
        .copied()
        .find(|candidate| spice(*candidate).eq_ignore_ascii_case(wanted))
        .ok_or_else(|| KeywordError {
            kind,
            value: value.to_string(),
            expected: all.iter().map(|c| spice(*c)).collect::<Vec<_>>().join(", "),
        })
}

/// Light-time and stellar aberration correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Aberration {
    #[default]
    #[serde(rename = "NONE")]
    None,
    #[serde(rename = "LT")]
    LightTime,
    #[serde(rename = "LT+S")]
    LightTimeStellar,
    #[serde(rename = "CN")]
    Converged,
    #[serde(rename = "CN+S")]
    ConvergedStellar,
    #[serde(rename = "XLT")]
    TransmitLightTime,
    #[serde(rename = "XLT+S")]
    TransmitLightTimeStellar,
    #[serde(rename = "XCN")]
    TransmitConverged,
    #[serde(rename = "XCN+S")]
    TransmitConvergedStellar,
}

impl Aberration {
    pub const ALL: [Self; 9] = [
        Self::None,
        Self::LightTime,
        Self::LightTimeStellar,
        Self::Converged,
        Self::ConvergedStellar,
        Self::TransmitLightTime,
        Self::TransmitLightTimeStellar,
        Self::TransmitConverged,
        Self::TransmitConvergedStellar,
    ];

    pub fn as_spice(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::LightTime => "LT",
            Self::LightTimeStellar => "LT+S",
            Self::Converged => "CN",
            Self::ConvergedStellar => "CN+S",
            Self::TransmitLightTime => "XLT",
            Self::TransmitLightTimeStellar => "XLT+S",
            Self::TransmitConverged => "XCN",
            Self::TransmitConvergedStellar => "XCN+S",
        }
    }
}

/// Embedded blanks are ignored, so `"CN + S"` reads as `CN+S`.
impl FromStr for Aberration {
    type Err = KeywordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        lookup("aberration correction", &compact, &Self::ALL, Self::as_spice).map_err(|err| {
            KeywordError {
                value: s.to_string(),
                ..err
            }
        })
    }
}

impl fmt::Display for Aberration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_spice())
    }
}

/// Constraint applied to a scalar geometric quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation {
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "ABSMAX")]
    AbsoluteMaximum,
    #[serde(rename = "ABSMIN")]
    AbsoluteMinimum,
    #[serde(rename = "LOCMAX")]
    LocalMaximum,
    #[serde(rename = "LOCMIN")]
    LocalMinimum,
}

impl Relation {
    pub const ALL: [Self; 7] = [
        Self::Greater,
        Self::Less,
        Self::Equal,
        Self::AbsoluteMaximum,
        Self::AbsoluteMinimum,
        Self::LocalMaximum,
        Self::LocalMinimum,
    ];

    pub fn as_spice(self) -> &'static str {
        match self {
            Self::Greater => ">",
            Self::Less => "<",
            Self::Equal => "=",
            Self::AbsoluteMaximum => "ABSMAX",
            Self::AbsoluteMinimum => "ABSMIN",
            Self::LocalMaximum => "LOCMAX",
            Self::LocalMinimum => "LOCMIN",
        }
    }

    /// Only absolute extremum searches honour the adjustment value.
    pub fn uses_adjustment(self) -> bool {
        matches!(self, Self::AbsoluteMaximum | Self::AbsoluteMinimum)
    }

    /// Only inequality and equality searches compare against a reference value.
    pub fn uses_reference(self) -> bool {
        matches!(self, Self::Greater | Self::Less | Self::Equal)
    }
}

impl FromStr for Relation {
    type Err = KeywordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup("relation", s, &Self::ALL, Self::as_spice)
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_spice())
    }
}

/// Coordinate system for position searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoordinateSystem {
    Rectangular,
    Latitudinal,
    #[serde(rename = "RA/DEC")]
    RaDec,
    Spherical,
    Cylindrical,
    Geodetic,
    Planetographic,
}

impl CoordinateSystem {
    pub const ALL: [Self; 7] = [
        Self::Rectangular,
        Self::Latitudinal,
        Self::RaDec,
        Self::Spherical,
        Self::Cylindrical,
        Self::Geodetic,
        Self::Planetographic,
    ];

    pub fn as_spice(self) -> &'static str {
        match self {
            Self::Rectangular => "RECTANGULAR",
            Self::Latitudinal => "LATITUDINAL",
            Self::RaDec => "RA/DEC",
            Self::Spherical => "SPHERICAL",
            Self::Cylindrical => "CYLINDRICAL",
            Self::Geodetic => "GEODETIC",
            Self::Planetographic => "PLANETOGRAPHIC",
        }
    }

    /// Whether `coordinate` names an angle in this system (reference values are then in degrees).
    pub fn is_angular(self, coordinate: &str) -> bool {
        if self == Self::Rectangular {
            return false;
        }
        let upper = coordinate.to_ascii_uppercase();
        matches!(
            upper.as_str(),
            "LATITUDE"
                | "LONGITUDE"
                | "RIGHT ASCENSION"
                | "DECLINATION"
                | "COLATITUDE"
        )
    }
}

impl FromStr for CoordinateSystem {
    type Err = KeywordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup("coordinate system", s, &Self::ALL, Self::as_spice)
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_spice())
    }
}

/// Kind of occultation searched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OccultationType {
    /// Back body entirely hidden by the front body.
    Full,
    /// Front body entirely inside the back body's disk.
    Annular,
    /// Partial overlap, neither full nor annular.
    Partial,
    /// Any of the above.
    Any,
}

impl OccultationType {
    pub const ALL: [Self; 4] = [
        Self::Full,
        Self::Annular,
        Self::Partial,
        Self::Any,
    ];

    pub fn as_spice(self) -> &'static str {
        match self {
            Self::Full => "FULL",
            Self::Annular => "ANNULAR",
            Self::Partial => "PARTIAL",
            Self::Any => "ANY",
        }
    }
}

impl FromStr for OccultationType {
    type Err = KeywordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup("occultation type", s, &Self::ALL, Self::as_spice)
    }
}

impl fmt::Display for OccultationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_spice())
    }
}

/// Shape model for a body taking part in an occultation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeModel {
    #[serde(rename = "POINT")]
    Point,
    #[serde(rename = "ELLIPSOID")]
    Ellipsoid,
    #[serde(rename = "DSK/UNPRIORITIZED")]
    DskUnprioritized,
}

impl ShapeModel {
    pub const ALL: [Self; 3] = [
        Self::Point,
        Self::Ellipsoid,
        Self::DskUnprioritized,
    ];

    pub fn as_spice(self) -> &'static str {
        match self {
            Self::Point => "POINT",
            Self::Ellipsoid => "ELLIPSOID",
            Self::DskUnprioritized => "DSK/UNPRIORITIZED",
        }
    }

    /// Short tag used when reports compare shape models side by side.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Point => "Pnt",
            Self::Ellipsoid => "Ell",
            Self::DskUnprioritized => "DSK",
        }
    }

    /// Adjective used in report headings ("ellipsoidal target shape models").
    pub fn description(self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Ellipsoid => "ellipsoidal",
            Self::DskUnprioritized => "DSK",
        }
    }

    /// Point targets have no orientation, so no body-fixed frame is passed.
    pub fn needs_frame(self) -> bool {
        !matches!(self, Self::Point)
    }
}

impl FromStr for ShapeModel {
    type Err = KeywordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup("shape model", s, &Self::ALL, Self::as_spice)
    }
}

impl fmt::Display for ShapeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_spice())
    }
}

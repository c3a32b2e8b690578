//! Sample values and coordinate modes.

use crate::BedmapError;
use std::fmt;
use std::str::FromStr;

/// The value of a layer at one input coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    /// A valid cell value.
    Value(f32),
    /// The cell holds the layer's no-data value.
    NoData,
    /// The coordinate does not address a cell of the layer.
    OutOfGrid,
}

impl Sample {
    /// The value, if there is one.
    pub fn value(&self) -> Option<f32> {
        match self {
            Sample::Value(v) => Some(*v),
            _ => None,
        }
    }

    /// Whether this sample is missing for any reason.
    pub fn is_missing(&self) -> bool {
        !matches!(self, Sample::Value(_))
    }
}

impl From<Sample> for Option<f32> {
    fn from(sample: Sample) -> Self {
        sample.value()
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sample::Value(v) => write!(f, "{}", v),
            Sample::NoData => f.write_str("nodata"),
            Sample::OutOfGrid => f.write_str("outside grid"),
        }
    }
}

/// How the two coordinate arrays passed to a sampling call are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordMode {
    /// Latitude and longitude in decimal degrees.
    #[default]
    Geographic,
    /// Polar stereographic x and y in meters.
    Projected,
}

impl CoordMode {
    pub fn name(&self) -> &'static str {
        match self {
            CoordMode::Geographic => "latlon",
            CoordMode::Projected => "xy",
        }
    }
}

impl fmt::Display for CoordMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CoordMode {
    type Err = BedmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latlon" | "geographic" => Ok(CoordMode::Geographic),
            "xy" | "projected" => Ok(CoordMode::Projected),
            other => Err(BedmapError::InvalidMode(other.to_string())),
        }
    }
}

//! The ten Bedmap2 layers and their file names.

use crate::BedmapError;
use std::fmt;
use std::str::FromStr;

/// Prefix shared by every layer file except the geoid correction.
const FILE_PREFIX: &str = "bedmap2";

/// A Bedmap2 raster layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    /// Bed height (m, relative to the GL04C geoid).
    Bed,
    /// Data coverage mask.
    Coverage,
    /// Bed uncertainty over grounded ice (m).
    GroundedBedUncertainty,
    /// Rock outcrop mask.
    RockMask,
    /// Grounded ice and ice shelf mask.
    IceMaskGroundedAndShelves,
    /// Lake Vostok mask.
    LakeMaskVostok,
    /// Surface height (m, relative to the GL04C geoid).
    Surface,
    /// Ice thickness (m).
    Thickness,
    /// Thickness uncertainty, 5 km resolution (m).
    ThicknessUncertainty5km,
    /// Offset to add to convert GL04C geoid heights to WGS84 ellipsoid heights (m).
    Gl04cGeoidToWgs84,
}

impl Layer {
    /// Every layer, in the order Bedmap2 documents them.
    pub const ALL: [Layer; 10] = [
        Layer::Bed,
        Layer::Coverage,
        Layer::GroundedBedUncertainty,
        Layer::RockMask,
        Layer::IceMaskGroundedAndShelves,
        Layer::LakeMaskVostok,
        Layer::Surface,
        Layer::Thickness,
        Layer::ThicknessUncertainty5km,
        Layer::Gl04cGeoidToWgs84,
    ];

    /// The layer identifier as used in file names.
    pub fn name(&self) -> &'static str {
        match self {
            Layer::Bed => "bed",
            Layer::Coverage => "coverage",
            Layer::GroundedBedUncertainty => "grounded_bed_uncertainty",
            Layer::RockMask => "rockmask",
            Layer::IceMaskGroundedAndShelves => "icemask_grounded_and_shelves",
            Layer::LakeMaskVostok => "lakemask_vostok",
            Layer::Surface => "surface",
            Layer::Thickness => "thickness",
            Layer::ThicknessUncertainty5km => "thickness_uncertainty_5km",
            Layer::Gl04cGeoidToWgs84 => "gl04c_geiod_to_WGS84",
        }
    }

    /// File name of the layer inside the data directory.
    ///
    /// All layers are `bedmap2_<name>.tif` except the geoid correction, which
    /// ships without the prefix.
    pub fn file_name(&self) -> String {
        match self {
            Layer::Gl04cGeoidToWgs84 => format!("{}.tif", self.name()),
            _ => format!("{}_{}.tif", FILE_PREFIX, self.name()),
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Layer {
    type Err = BedmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Layer::ALL
            .iter()
            .copied()
            .find(|layer| layer.name() == s)
            .ok_or_else(|| BedmapError::UnknownLayer(s.to_string()))
    }
}

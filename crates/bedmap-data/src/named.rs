//! One method per Bedmap2 layer.
//!
//! Each method is [`Dataset::sample`] with the layer fixed. Heights are in
//! meters relative to the GL04C geoid unless noted.

use crate::{CoordMode, Dataset, Layer, Result, Sample};

impl Dataset {
    /// Bed height (m).
    pub fn bed(&self, first: &[f64], second: &[f64], mode: CoordMode) -> Result<Vec<Sample>> {
        self.sample(first, second, Layer::Bed, mode)
    }

    /// Surface height (m).
    pub fn surface(&self, first: &[f64], second: &[f64], mode: CoordMode) -> Result<Vec<Sample>> {
        self.sample(first, second, Layer::Surface, mode)
    }

    /// Ice thickness (m).
    pub fn thickness(
        &self,
        first: &[f64],
        second: &[f64],
        mode: CoordMode,
    ) -> Result<Vec<Sample>> {
        self.sample(first, second, Layer::Thickness, mode)
    }

    /// Rock mask: 1 where rock outcrops.
    pub fn rockmask(&self, first: &[f64], second: &[f64], mode: CoordMode) -> Result<Vec<Sample>> {
        self.sample(first, second, Layer::RockMask, mode)
    }

    /// Bed uncertainty over grounded ice (m).
    pub fn bed_uncertainty(
        &self,
        first: &[f64],
        second: &[f64],
        mode: CoordMode,
    ) -> Result<Vec<Sample>> {
        self.sample(first, second, Layer::GroundedBedUncertainty, mode)
    }

    /// Ice mask: whether each point is grounded ice or ice shelf.
    pub fn icemask(&self, first: &[f64], second: &[f64], mode: CoordMode) -> Result<Vec<Sample>> {
        self.sample(first, second, Layer::IceMaskGroundedAndShelves, mode)
    }

    /// Height to add to a GL04C geoid height to get a WGS84 ellipsoid height (m).
    pub fn gl04c_to_wgs84(
        &self,
        first: &[f64],
        second: &[f64],
        mode: CoordMode,
    ) -> Result<Vec<Sample>> {
        self.sample(first, second, Layer::Gl04cGeoidToWgs84, mode)
    }

    /// Data coverage mask.
    pub fn coverage(&self, first: &[f64], second: &[f64], mode: CoordMode) -> Result<Vec<Sample>> {
        self.sample(first, second, Layer::Coverage, mode)
    }

    /// Lake Vostok mask.
    pub fn lakemask_vostok(
        &self,
        first: &[f64],
        second: &[f64],
        mode: CoordMode,
    ) -> Result<Vec<Sample>> {
        self.sample(first, second, Layer::LakeMaskVostok, mode)
    }

    /// Thickness uncertainty on the 5 km grid (m).
    pub fn thickness_uncertainty(
        &self,
        first: &[f64],
        second: &[f64],
        mode: CoordMode,
    ) -> Result<Vec<Sample>> {
        self.sample(first, second, Layer::ThicknessUncertainty5km, mode)
    }
}

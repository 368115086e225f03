//! # Slider Detents
//!
//! Helpers for the input sliders that feed the engine. These only decide
//! which discrete values a slider may land on; they never touch the
//! depth-of-field math.
//!
//! - [`ApertureDetents`] - the aperture codes a lens clicks through, and
//!   snapping of a raw slider value to the nearest one
//! - [`DistanceSlider`] - subject distance slider positions in whole metres
//!   or whole feet, read back as metres
//!
//! ## Example
//!
//! ```rust
//! use dof_core::aperture::StopScale;
//! use dof_core::detents::ApertureDetents;
//!
//! let detents = ApertureDetents::from_scales(&[StopScale::Full]).unwrap();
//! assert_eq!(detents.snap(750), 800);
//! assert_eq!(detents.snap(50), 100);
//! assert_eq!(detents.snap(9000), 6400);
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::aperture::StopScale;
use crate::catalog::{DistanceRange, Lens};
use crate::errors::{CalcError, CalcResult};
use crate::units::Units;

/// Ordered set of aperture codes an aperture slider can stop on.
///
/// Never empty, ascending, no repeats. Deserialized values go through the
/// same checks as the constructors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDetents")]
pub struct ApertureDetents {
    values: Vec<u32>,
}

#[derive(Deserialize)]
struct RawDetents {
    values: Vec<u32>,
}

impl TryFrom<RawDetents> for ApertureDetents {
    type Error = CalcError;

    fn try_from(raw: RawDetents) -> CalcResult<Self> {
        Self::from_codes(raw.values.into_iter().collect())
    }
}

impl ApertureDetents {
    fn from_codes(codes: BTreeSet<u32>) -> CalcResult<Self> {
        if codes.is_empty() {
            return Err(CalcError::invalid_input(
                "stop_scales",
                "[]",
                "No aperture values to move between",
            ));
        }
        Ok(ApertureDetents {
            values: codes.into_iter().collect(),
        })
    }

    /// Union of the codes on the given scales, ascending.
    pub fn from_scales(scales: &[StopScale]) -> CalcResult<Self> {
        let codes = scales.iter().flat_map(|scale| scale.codes()).collect();
        Self::from_codes(codes)
    }

    /// Codes on the lens's scales, limited to its aperture range.
    pub fn for_lens(lens: &Lens) -> CalcResult<Self> {
        let codes = lens
            .stop_scales
            .iter()
            .flat_map(|scale| scale.codes())
            .filter(|code| (lens.min_aperture..=lens.max_aperture).contains(code))
            .collect();
        Self::from_codes(codes)
    }

    /// Snap a raw slider value to the closest detent.
    ///
    /// Values outside the detents clamp to the ends. Between two detents
    /// the lower one wins only when it is strictly closer, so an exact
    /// midpoint goes to the upper detent.
    pub fn snap(&self, input: u32) -> u32 {
        let first = self.first();
        let last = self.last();
        if input <= first {
            return first;
        }
        if input >= last {
            return last;
        }

        // index of the first detent >= input; guaranteed in 1..len
        let upper = self.values.partition_point(|&v| v < input);
        let hi = self.values[upper];
        let lo = self.values[upper - 1];
        if input - lo < hi - input {
            lo
        } else {
            hi
        }
    }

    /// Slider index of a detent value
    pub fn position(&self, code: u32) -> Option<usize> {
        self.values.binary_search(&code).ok()
    }

    /// Detent value at a slider index
    pub fn at(&self, index: usize) -> Option<u32> {
        self.values.get(index).copied()
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn first(&self) -> u32 {
        self.values[0]
    }

    pub fn last(&self) -> u32 {
        self.values[self.values.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Round half to even, matching how slider positions were always rounded.
fn rint(value: f64) -> u32 {
    value.round_ties_even().max(0.0) as u32
}

/// Subject distance slider over a catalog range.
///
/// Positions are whole display units (metres or feet). The engine only
/// ever sees the metric value from [`DistanceSlider::to_metres`].
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceSlider {
    min_m: f64,
    max_m: f64,
    starting_m: f64,
    units: Units,
}

impl DistanceSlider {
    pub fn new(range: &DistanceRange, units: Units) -> Self {
        DistanceSlider {
            min_m: f64::from(range.min_distance_m),
            max_m: f64::from(range.max_distance_m),
            starting_m: f64::from(range.starting_distance_m),
            units,
        }
    }

    pub fn units(&self) -> Units {
        self.units
    }

    /// Slider bounds in whole display units
    pub fn bounds(&self) -> (u32, u32) {
        (self.position_for(self.min_m), self.position_for(self.max_m))
    }

    /// Slider position for a metric distance, clamped to the bounds.
    pub fn position_for(&self, metres: f64) -> u32 {
        let clamped = metres.clamp(self.min_m, self.max_m);
        rint(self.units.from_metres(clamped))
    }

    /// Position a fresh slider starts at
    pub fn starting_position(&self) -> u32 {
        self.position_for(self.starting_m)
    }

    /// Metric distance for a slider position.
    ///
    /// # Errors
    ///
    /// `CalcError::InvalidInput` if the position is outside [`Self::bounds`].
    pub fn to_metres(&self, position: u32) -> CalcResult<f64> {
        let (min, max) = self.bounds();
        if position < min || position > max {
            return Err(CalcError::invalid_input(
                "distance_position",
                position.to_string(),
                format!("Value out of range {}..={} {}", min, max, self.units.suffix()),
            ));
        }
        Ok(self.units.to_metres(f64::from(position)))
    }

    /// Switch display units, carrying a position across.
    ///
    /// Returns the equivalent whole-unit position in the new units.
    pub fn switch_units(&mut self, units: Units, position: u32) -> u32 {
        let metres = self.units.to_metres(f64::from(position));
        self.units = units;
        self.position_for(metres)
    }
}

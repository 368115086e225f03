//! Distance ranges
//!
//! A range sets the span of the subject distance slider, in whole metres.

use serde::{Deserialize, Serialize};

use super::CatalogEntry;
use crate::errors::{CalcError, CalcResult};

/// Span of subject distances a slider covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceRange {
    /// Unique display name
    pub name: String,

    /// Nearest distance on the slider (m)
    pub min_distance_m: u32,

    /// Farthest distance on the slider (m)
    pub max_distance_m: u32,

    /// Distance a fresh tab starts at (m)
    pub starting_distance_m: u32,
}

impl DistanceRange {
    pub fn contains(&self, distance_m: f64) -> bool {
        distance_m >= f64::from(self.min_distance_m) && distance_m <= f64::from(self.max_distance_m)
    }
}

impl CatalogEntry for DistanceRange {
    const KIND: &'static str = "Range";

    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> CalcResult<()> {
        if self.max_distance_m <= self.min_distance_m {
            return Err(CalcError::invalid_catalog(format!(
                "range '{}': max distance {} must be greater than min distance {}",
                self.name, self.max_distance_m, self.min_distance_m
            )));
        }
        if !(self.min_distance_m..=self.max_distance_m).contains(&self.starting_distance_m) {
            return Err(CalcError::invalid_catalog(format!(
                "range '{}': starting distance {} is outside {}..={}",
                self.name, self.starting_distance_m, self.min_distance_m, self.max_distance_m
            )));
        }
        Ok(())
    }
}

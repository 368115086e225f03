//! Lenses
//!
//! A lens bounds the focal length and aperture sliders and decides which
//! stop scales the aperture slider clicks through.

use serde::{Deserialize, Serialize};

use super::CatalogEntry;
use crate::aperture::{ApertureTable, StopScale};
use crate::errors::{CalcError, CalcResult};

fn default_stop_scales() -> Vec<StopScale> {
    vec![StopScale::Full]
}

/// A lens with its focal length and aperture ranges.
///
/// ## JSON Example
///
/// ```json
/// {
///   "name": "24-105mm f/4 zoom",
///   "min_length_mm": 24,
///   "max_length_mm": 105,
///   "starting_length_mm": 50,
///   "min_aperture": 400,
///   "max_aperture": 2200,
///   "starting_aperture": 800,
///   "stop_scales": ["full", "third"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lens {
    /// Unique display name
    pub name: String,

    /// Shortest focal length (mm)
    pub min_length_mm: u32,

    /// Longest focal length (mm); equal to `min_length_mm` for a prime
    pub max_length_mm: u32,

    /// Focal length a fresh tab starts at (mm)
    pub starting_length_mm: u32,

    /// Widest aperture code (e.g., 280 for f/2.8)
    pub min_aperture: u32,

    /// Narrowest aperture code
    pub max_aperture: u32,

    /// Aperture code a fresh tab starts at
    pub starting_aperture: u32,

    /// Stop scales marked on the aperture ring
    #[serde(default = "default_stop_scales")]
    pub stop_scales: Vec<StopScale>,
}

impl Lens {
    /// Whether this is a fixed focal length lens
    pub fn is_prime(&self) -> bool {
        self.min_length_mm == self.max_length_mm
    }

    /// Whether a focal length is within this lens's range
    pub fn covers_focal_length(&self, focal_length_mm: u32) -> bool {
        (self.min_length_mm..=self.max_length_mm).contains(&focal_length_mm)
    }
}

impl CatalogEntry for Lens {
    const KIND: &'static str = "Lens";

    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> CalcResult<()> {
        let fail = |reason: String| Err(CalcError::invalid_catalog(format!("lens '{}': {}", self.name, reason)));

        if self.min_length_mm == 0 {
            return fail("focal length must be positive".to_string());
        }
        if !(self.min_length_mm <= self.starting_length_mm && self.starting_length_mm <= self.max_length_mm) {
            return fail(format!(
                "focal lengths must satisfy min <= starting <= max, got {} / {} / {}",
                self.min_length_mm, self.starting_length_mm, self.max_length_mm
            ));
        }

        let table = ApertureTable::global();
        for code in [self.min_aperture, self.max_aperture, self.starting_aperture] {
            if !table.contains(code) {
                return fail(format!("aperture code {} is not in the aperture table", code));
            }
        }
        if !(self.min_aperture <= self.starting_aperture && self.starting_aperture <= self.max_aperture) {
            return fail(format!(
                "apertures must satisfy min <= starting <= max, got {} / {} / {}",
                self.min_aperture, self.starting_aperture, self.max_aperture
            ));
        }

        if self.stop_scales.is_empty() {
            return fail("at least one stop scale is required".to_string());
        }
        let on_scale = self
            .stop_scales
            .iter()
            .any(|scale| scale.codes().any(|code| code == self.starting_aperture));
        if !on_scale {
            return fail(format!(
                "starting aperture {} is not marked on any of the lens's stop scales",
                self.starting_aperture
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_lens() -> Lens {
        Lens {
            name: "24-105mm".to_string(),
            min_length_mm: 24,
            max_length_mm: 105,
            starting_length_mm: 50,
            min_aperture: 400,
            max_aperture: 2200,
            starting_aperture: 800,
            stop_scales: vec![StopScale::Full, StopScale::Third],
        }
    }

    #[test]
    fn test_valid_lens() {
        let lens = test_lens();
        assert!(lens.validate().is_ok());
        assert!(!lens.is_prime());
        assert!(lens.covers_focal_length(24));
        assert!(lens.covers_focal_length(105));
        assert!(!lens.covers_focal_length(200));
    }

    #[test]
    fn test_starting_length_out_of_range() {
        let lens = Lens { starting_length_mm: 200, ..test_lens() };
        assert!(lens.validate().is_err());
    }

    #[test]
    fn test_unknown_aperture_rejected() {
        let lens = Lens { max_aperture: 2300, ..test_lens() };
        assert!(matches!(lens.validate(), Err(CalcError::InvalidCatalog { .. })));
    }

    #[test]
    fn test_starting_aperture_must_be_on_scale() {
        // 870 is a quarter stop; the lens only has full and third
        let lens = Lens { starting_aperture: 870, ..test_lens() };
        assert!(lens.validate().is_err());
    }

    #[test]
    fn test_stop_scales_default_to_full() {
        let json = r#"{
            "name": "Old prime",
            "min_length_mm": 50, "max_length_mm": 50, "starting_length_mm": 50,
            "min_aperture": 200, "max_aperture": 1600, "starting_aperture": 800
        }"#;
        let lens: Lens = serde_json::from_str(json).unwrap();
        assert_eq!(lens.stop_scales, vec![StopScale::Full]);
        assert!(lens.is_prime());
        assert!(lens.validate().is_ok());
    }
}

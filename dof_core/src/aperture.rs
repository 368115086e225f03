//! # Aperture Table
//!
//! Maps nominal aperture codes (the f-number × 100, so `400` is f/4.0) to
//! the exact f-stop ratio used in the depth-of-field formulas.
//!
//! Lens barrels are marked with rounded numbers. The optical value behind a
//! marking is a power of √2: stop `n` on the full scale is `√2^n`, and the
//! half, third and quarter scales sit at fractional exponents between them.
//! Dividing the code by 100 is close but measurably wrong (f/2.6 is really
//! 2.594, f/11 is really 11.31), so the table is the only source of truth.
//!
//! ## Overlapping markings
//!
//! A few markings appear on more than one scale with different exponents:
//!
//! | Marking | Third stop | Other scale      |
//! |---------|------------|------------------|
//! | f/1.2   | 0.667      | half 0.5         |
//! | f/2.2   | 2.333      | quarter 2.25     |
//! | f/10    | 6.667      | quarter 6.75     |
//! | f/13    | 7.333      | half/quarter 7.5 |
//! | f/14    | 7.667      | half/quarter 7.5 |
//!
//! The third-stop value is used for all of them. f/3.3 and f/3.4 both mark
//! exponent 3.5 on different lenses, so both codes are kept.
//!
//! ## Example
//!
//! ```rust
//! use dof_core::aperture::resolve_exact_f_stop;
//!
//! let f8 = resolve_exact_f_stop(800).unwrap();
//! assert!((f8 - 8.0).abs() < 1e-12);
//!
//! // Quarter stop: f/2.6 is √2^2.75, not 2.6
//! let f2_6 = resolve_exact_f_stop(260).unwrap();
//! assert!((f2_6 - 2.0_f64.sqrt().powf(2.75)).abs() < 1e-12);
//!
//! assert!(resolve_exact_f_stop(360).is_err());
//! ```

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Photographic stop scale a lens can click through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopScale {
    /// Whole stops: f/1.0, f/1.4, f/2.0, ...
    Full,
    /// Half stops between the full ones
    Half,
    /// One-third stops (most modern bodies)
    Third,
    /// Quarter stops
    Quarter,
}

// (code, exponent of √2) pairs per scale
const FULL_STOPS: [(u32, f64); 13] = [
    (100, 0.0),
    (140, 1.0),
    (200, 2.0),
    (280, 3.0),
    (400, 4.0),
    (560, 5.0),
    (800, 6.0),
    (1100, 7.0),
    (1600, 8.0),
    (2200, 9.0),
    (3200, 10.0),
    (4500, 11.0),
    (6400, 12.0),
];

// f/2.2 (2.25) and f/10 (6.75) are third-stop markings
const QUARTER_STOPS: [(u32, f64); 12] = [
    (260, 2.75),
    (340, 3.5),
    (370, 3.75),
    (440, 4.25),
    (520, 4.75),
    (620, 5.25),
    (730, 5.75),
    (870, 6.25),
    (1200, 7.25),
    (1500, 7.75),
    (1700, 8.25),
    (2100, 8.75),
];

// f/1.2 (0.5) and f/13 (7.5) are third-stop markings
const HALF_STOPS: [(u32, f64); 7] = [
    (170, 1.5),
    (240, 2.5),
    (330, 3.5),
    (480, 4.5),
    (670, 5.5),
    (950, 6.5),
    (1900, 8.5),
];

const THIRD_STOPS: [(u32, f64); 20] = [
    (110, 0.3333333333),
    (120, 0.6666666666),
    (160, 1.3333333333),
    (180, 1.6666666666),
    (220, 2.3333333333),
    (250, 2.6666666666),
    (320, 3.3333333333),
    (350, 3.6666666666),
    (450, 4.3333333333),
    (500, 4.6666666666),
    (630, 5.3333333333),
    (710, 5.6666666666),
    (900, 6.3333333333),
    (1000, 6.6666666666),
    (1300, 7.3333333333),
    (1400, 7.6666666666),
    (1800, 8.3333333333),
    (2000, 8.6666666666),
    (2500, 9.3333333333),
    (2800, 9.6666666666),
];

impl StopScale {
    /// All scales, in the order they are layered into the table
    pub const ALL: [StopScale; 4] = [
        StopScale::Full,
        StopScale::Quarter,
        StopScale::Half,
        StopScale::Third,
    ];

    fn entries(&self) -> &'static [(u32, f64)] {
        match self {
            StopScale::Full => &FULL_STOPS,
            StopScale::Half => &HALF_STOPS,
            StopScale::Third => &THIRD_STOPS,
            StopScale::Quarter => &QUARTER_STOPS,
        }
    }

    /// Aperture codes marked on this scale, ascending.
    pub fn codes(&self) -> impl Iterator<Item = u32> {
        self.entries().iter().map(|(code, _)| *code)
    }

    /// Display name for UI selection
    pub fn display_name(&self) -> &'static str {
        match self {
            StopScale::Full => "Full stops",
            StopScale::Half => "Half stops",
            StopScale::Third => "Third stops",
            StopScale::Quarter => "Quarter stops",
        }
    }
}

impl fmt::Display for StopScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Lookup from nominal aperture code to exact f-stop ratio.
#[derive(Debug, Clone)]
pub struct ApertureTable {
    values: BTreeMap<u32, f64>,
}

impl ApertureTable {
    /// Build the table from the stop scales.
    ///
    /// Later scales overwrite earlier ones, and the third-stop scale is
    /// layered last so it wins any shared marking.
    fn build() -> Self {
        let sqrt_2 = 2.0_f64.sqrt();
        let mut values = BTreeMap::new();
        for scale in StopScale::ALL {
            for &(code, exponent) in scale.entries() {
                values.insert(code, sqrt_2.powf(exponent));
            }
        }
        log::trace!("Aperture table built with {} entries", values.len());
        ApertureTable { values }
    }

    /// The process-wide table, built on first access.
    pub fn global() -> &'static ApertureTable {
        &APERTURE_TABLE
    }

    /// Exact f-stop ratio for a nominal code.
    pub fn exact_f_stop(&self, code: u32) -> CalcResult<f64> {
        self.values
            .get(&code)
            .copied()
            .ok_or_else(|| CalcError::unknown_aperture(code))
    }

    /// Whether the table has an entry for this code
    pub fn contains(&self, code: u32) -> bool {
        self.values.contains_key(&code)
    }

    /// All known codes, ascending
    pub fn codes(&self) -> impl Iterator<Item = u32> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

static APERTURE_TABLE: Lazy<ApertureTable> = Lazy::new(ApertureTable::build);

/// Resolve a nominal aperture code to the exact f-stop ratio.
///
/// # Errors
///
/// `CalcError::UnknownApertureCode` if the code is not in the table. No
/// nearby value is substituted.
pub fn resolve_exact_f_stop(code: u32) -> CalcResult<f64> {
    APERTURE_TABLE.exact_f_stop(code)
}

/// Label as marked on a lens barrel, e.g. `800` → `"f/8.0"`.
pub fn f_number_label(code: u32) -> String {
    format!("f/{:.1}", f64::from(code) / 100.0)
}

//! # Display Formatting
//!
//! Turns metric results into the strings a front end shows. Conversion to
//! feet happens here and nowhere else.
//!
//! ## Example
//!
//! ```rust
//! use dof_core::calculations::Distance;
//! use dof_core::display::{format_circle_of_confusion, format_distance};
//! use dof_core::units::Units;
//!
//! assert_eq!(format_distance(Distance::Finite(3.3836), Units::Metric), "3.38m");
//! assert_eq!(format_distance(Distance::Finite(10.0), Units::Imperial), "32.81ft");
//! assert_eq!(format_distance(Distance::Infinite, Units::Metric), "∞");
//! assert_eq!(format_circle_of_confusion(0.03), "0.030mm");
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::Distance;
use crate::units::Units;

/// Symbol shown for an unbounded distance
pub const INFINITY_SYMBOL: &str = "∞";

/// How results are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Units distances are shown in
    pub units: Units,

    /// Decimal places for distances
    pub decimals: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            units: Units::Metric,
            decimals: 2,
        }
    }
}

impl DisplaySettings {
    pub fn imperial() -> Self {
        DisplaySettings {
            units: Units::Imperial,
            ..Default::default()
        }
    }

    /// Format a metric distance with these settings.
    pub fn format_distance(&self, distance_m: Distance) -> String {
        match distance_m.in_units(self.units) {
            Distance::Finite(value) => format!("{:.*}{}", self.decimals, value, self.units.suffix()),
            Distance::Infinite => INFINITY_SYMBOL.to_string(),
        }
    }
}

/// Format a metric distance to two decimals in the given units.
pub fn format_distance(distance_m: Distance, units: Units) -> String {
    DisplaySettings { units, decimals: 2 }.format_distance(distance_m)
}

/// Circle of confusion as shown next to a body, e.g. `0.030mm`.
pub fn format_circle_of_confusion(circle_of_confusion_mm: f64) -> String {
    format!("{:05.3}mm", circle_of_confusion_mm)
}

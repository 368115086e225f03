//! # Unit Types
//!
//! Type-safe wrappers for the lengths the calculator deals with. These are
//! plain f64 newtypes so JSON stays clean (just numbers).
//!
//! ## Metric Internally
//!
//! The engine works in metric only:
//! - Focal length and circle of confusion: millimetres (mm)
//! - Distances (subject, hyperfocal, near/far limits): metres (m)
//!
//! Feet exist only at the display boundary. Converting a distance to feet
//! and back gives the original value to within floating point error.
//!
//! ## Example
//!
//! ```rust
//! use dof_core::units::{Feet, Metres, Millimetres};
//!
//! let distance = Metres(10.0);
//! let in_feet: Feet = distance.into();
//! assert!((in_feet.0 - 32.808399).abs() < 1e-9);
//!
//! let hyperfocal: Metres = Millimetres(10466.67).into();
//! assert!((hyperfocal.0 - 10.46667).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// Conversion factor used for all imperial display values
pub const FEET_PER_METRE: f64 = 3.2808399;

/// Millimetres per metre
pub const MM_PER_METRE: f64 = 1000.0;

/// Convert metres to feet.
pub fn to_imperial(metres: f64) -> f64 {
    metres * FEET_PER_METRE
}

/// Convert feet to metres.
pub fn to_metric(feet: f64) -> f64 {
    feet / FEET_PER_METRE
}

// ============================================================================
// Length Units
// ============================================================================

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metres(pub f64);

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimetres(pub f64);

impl From<Metres> for Feet {
    fn from(m: Metres) -> Self {
        Feet(to_imperial(m.0))
    }
}

impl From<Feet> for Metres {
    fn from(ft: Feet) -> Self {
        Metres(to_metric(ft.0))
    }
}

impl From<Millimetres> for Metres {
    fn from(mm: Millimetres) -> Self {
        Metres(mm.0 / MM_PER_METRE)
    }
}

impl From<Metres> for Millimetres {
    fn from(m: Metres) -> Self {
        Millimetres(m.0 * MM_PER_METRE)
    }
}

// ============================================================================
// Display Units
// ============================================================================

/// Unit system used when presenting distances.
///
/// This never affects the engine; it only selects how a metric value is
/// shown or how a slider value is read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Metres
    #[default]
    Metric,
    /// Feet
    Imperial,
}

impl Units {
    /// Short suffix appended to formatted distances
    pub fn suffix(&self) -> &'static str {
        match self {
            Units::Metric => "m",
            Units::Imperial => "ft",
        }
    }

    /// Convert a metric distance into this unit system
    pub fn from_metres(&self, metres: f64) -> f64 {
        match self {
            Units::Metric => metres,
            Units::Imperial => to_imperial(metres),
        }
    }

    /// Convert a distance in this unit system back to metres
    pub fn to_metres(&self, value: f64) -> f64 {
        match self {
            Units::Metric => value,
            Units::Imperial => to_metric(value),
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Units::Metric => write!(f, "metric"),
            Units::Imperial => write!(f, "imperial"),
        }
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Metres);
impl_arithmetic!(Feet);
impl_arithmetic!(Millimetres);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metres_to_feet() {
        let ft: Feet = Metres(1.0).into();
        assert_eq!(ft.0, 3.2808399);
    }

    #[test]
    fn test_feet_to_metres() {
        let m: Metres = Feet(3.2808399).into();
        assert!((m.0 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_round_trip_relative_error() {
        for x in [1e-6, 0.003, 0.5, 1.0, 3.38, 10.4667, 250.0, 1e6] {
            let back = to_metric(to_imperial(x));
            assert!(((back - x) / x).abs() < 1e-9, "round trip drifted for {}", x);
        }
    }

    #[test]
    fn test_millimetres_to_metres() {
        let m: Metres = Millimetres(10466.0).into();
        assert!((m.0 - 10.466).abs() < 1e-12);
        let mm: Millimetres = Metres(0.05).into();
        assert!((mm.0 - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_units_selection() {
        assert_eq!(Units::Metric.from_metres(5.0), 5.0);
        assert!((Units::Imperial.from_metres(5.0) - 16.4041995).abs() < 1e-9);
        assert!((Units::Imperial.to_metres(16.4041995) - 5.0).abs() < 1e-9);
        assert_eq!(Units::Imperial.suffix(), "ft");
    }

    #[test]
    fn test_arithmetic() {
        let a = Metres(10.0);
        let b = Metres(4.0);
        assert_eq!((a + b).0, 14.0);
        assert_eq!((a - b).0, 6.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_serialization() {
        let m = Metres(3.5);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "3.5");
        assert_eq!(serde_json::to_string(&Units::Imperial).unwrap(), "\"imperial\"");

        let roundtrip: Metres = serde_json::from_str(&json).unwrap();
        assert_eq!(m, roundtrip);
    }
}

//! Camera bodies
//!
//! A body contributes a single number to the calculation: the circle of
//! confusion, which follows from sensor size (roughly the sensor diagonal
//! divided by 1500).
//!
//! | Format          | CoC (mm) |
//! |-----------------|----------|
//! | Full frame      | 0.030    |
//! | APS-C (Nikon)   | 0.020    |
//! | APS-C (Canon)   | 0.019    |
//! | Four Thirds     | 0.015    |

use serde::{Deserialize, Serialize};

use super::CatalogEntry;
use crate::errors::{CalcError, CalcResult};

/// A camera body and its circle of confusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraBody {
    /// Unique display name
    pub name: String,

    /// Circle of confusion in millimetres
    pub circle_of_confusion_mm: f64,
}

impl CameraBody {
    pub fn new(name: impl Into<String>, circle_of_confusion_mm: f64) -> Self {
        CameraBody {
            name: name.into(),
            circle_of_confusion_mm,
        }
    }
}

impl CatalogEntry for CameraBody {
    const KIND: &'static str = "Body";

    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> CalcResult<()> {
        if !self.circle_of_confusion_mm.is_finite() || self.circle_of_confusion_mm <= 0.0 {
            return Err(CalcError::invalid_catalog(format!(
                "body '{}': circle of confusion must be positive, got {}",
                self.name, self.circle_of_confusion_mm
            )));
        }
        Ok(())
    }
}

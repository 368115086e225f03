//! # Calculator Session
//!
//! A `Session` is one calculator page: the selected body, lens and distance
//! range plus whatever slider values the user last supplied. It owns no
//! callbacks and renders nothing; every operation hands the new
//! [`DofResult`] back to the caller.
//!
//! ## Lifecycle
//!
//! ```text
//! with_defaults ──► (no result) ──update──► valid ──update / change_*──► valid
//!                       │
//!                       └── change_* only switches the selection
//! ```
//!
//! ## Example
//!
//! ```rust
//! use dof_core::catalog::Catalog;
//! use dof_core::session::Session;
//!
//! let catalog = Catalog::builtin().unwrap();
//! let mut session = Session::with_defaults(&catalog);
//! assert!(session.last_result().is_none());
//!
//! let result = session.update(session.starting_inputs()).unwrap();
//! assert!(result.near_limit_m > 0.0);
//! assert!(session.has_valid_state());
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::{calculate, DofInput, DofResult};
use crate::catalog::{CameraBody, Catalog, DistanceRange, Lens};
use crate::detents::{ApertureDetents, DistanceSlider};
use crate::errors::CalcResult;
use crate::units::Units;

/// Values read off the three sliders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderInputs {
    /// Focal length (mm)
    pub focal_length_mm: u32,

    /// Nominal aperture code (f-number × 100)
    pub aperture_code: u32,

    /// Subject distance (m)
    pub subject_distance_m: f64,
}

/// Current selection and last calculation for one calculator page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    body: CameraBody,
    lens: Lens,
    range: DistanceRange,

    /// Last inputs that produced a result; `None` until the first update
    inputs: Option<SliderInputs>,

    last_result: Option<DofResult>,
}

impl Session {
    /// New session on the catalog's default body, lens and range.
    ///
    /// No result exists until [`Session::update`] is called.
    pub fn with_defaults(catalog: &Catalog) -> Self {
        Session {
            body: catalog.default_body().clone(),
            lens: catalog.default_lens().clone(),
            range: catalog.default_range().clone(),
            inputs: None,
            last_result: None,
        }
    }

    pub fn body(&self) -> &CameraBody {
        &self.body
    }

    pub fn lens(&self) -> &Lens {
        &self.lens
    }

    pub fn range(&self) -> &DistanceRange {
        &self.range
    }

    /// Slider values a fresh page starts at: the lens's starting focal
    /// length and aperture and the range's starting distance.
    pub fn starting_inputs(&self) -> SliderInputs {
        SliderInputs {
            focal_length_mm: self.lens.starting_length_mm,
            aperture_code: self.lens.starting_aperture,
            subject_distance_m: f64::from(self.range.starting_distance_m),
        }
    }

    /// Last supplied slider values, if any
    pub fn inputs(&self) -> Option<SliderInputs> {
        self.inputs
    }

    /// Aperture detents for the selected lens
    pub fn aperture_detents(&self) -> CalcResult<ApertureDetents> {
        ApertureDetents::for_lens(&self.lens)
    }

    /// Distance slider for the selected range
    pub fn distance_slider(&self, units: Units) -> DistanceSlider {
        DistanceSlider::new(&self.range, units)
    }

    fn compute(body: &CameraBody, inputs: SliderInputs) -> CalcResult<DofResult> {
        calculate(&DofInput {
            focal_length_mm: inputs.focal_length_mm,
            aperture_code: inputs.aperture_code,
            subject_distance_m: inputs.subject_distance_m,
            circle_of_confusion_mm: body.circle_of_confusion_mm,
        })
    }

    /// Store new slider values and recompute.
    ///
    /// On error the session keeps its previous inputs and result.
    pub fn update(&mut self, inputs: SliderInputs) -> CalcResult<DofResult> {
        let result = Self::compute(&self.body, inputs)?;
        self.inputs = Some(inputs);
        self.last_result = Some(result);
        Ok(result)
    }

    /// Recompute with the stored inputs, if there are any.
    fn recompute(&mut self) -> CalcResult<Option<DofResult>> {
        let Some(inputs) = self.inputs else {
            return Ok(None);
        };
        let result = Self::compute(&self.body, inputs)?;
        self.last_result = Some(result);
        Ok(Some(result))
    }

    /// Switch to another body.
    ///
    /// Returns the recomputed result, or `None` if no inputs have been
    /// supplied yet. A failed lookup leaves the session untouched.
    pub fn change_body(&mut self, catalog: &Catalog, name: &str) -> CalcResult<Option<DofResult>> {
        let body = catalog.body(name)?.clone();
        if let Some(inputs) = self.inputs {
            Self::compute(&body, inputs)?;
        }
        log::debug!("Session body -> {}", body.name);
        self.body = body;
        self.recompute()
    }

    /// Switch to another lens, keeping the current slider values.
    pub fn change_lens(&mut self, catalog: &Catalog, name: &str) -> CalcResult<Option<DofResult>> {
        self.lens = catalog.lens(name)?.clone();
        log::debug!("Session lens -> {}", self.lens.name);
        self.recompute()
    }

    /// Switch to another distance range, keeping the current slider values.
    pub fn change_range(&mut self, catalog: &Catalog, name: &str) -> CalcResult<Option<DofResult>> {
        self.range = catalog.range(name)?.clone();
        log::debug!("Session range -> {}", self.range.name);
        self.recompute()
    }

    /// The result of the last successful calculation
    pub fn last_result(&self) -> Option<&DofResult> {
        self.last_result.as_ref()
    }

    /// Whether inputs have been supplied and a result exists
    pub fn has_valid_state(&self) -> bool {
        self.inputs.is_some() && self.last_result.is_some()
    }
}

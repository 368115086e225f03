//! # Depth-of-Field Calculation
//!
//! Computes the hyperfocal distance and the near/far limits of acceptable
//! sharpness for a focal length, aperture, circle of confusion and subject
//! distance.
//!
//! ## Formulas
//!
//! Hyperfocal distance, in millimetres:
//!
//! ```text
//! H = f² / (N · c) + f
//! ```
//!
//! where `f` is the focal length (mm), `N` the exact f-stop ratio and `c`
//! the circle of confusion (mm). The trailing `+ f` is often dropped as
//! negligible, but the near/far formulas below amplify it, so it stays.
//!
//! With `H` and the subject distance `D` both in metres:
//!
//! ```text
//! near = H·D / (H + D)
//! far  = H·D / (H - D)      only when D < H
//! ```
//!
//! At or beyond the hyperfocal distance everything out to infinity is
//! sharp. A subject within `1e-6` m of `H` counts as "at" the hyperfocal
//! distance and gets `near = H / 2`. That test runs before `H - D` is ever
//! used as a divisor.
//!
//! ## Example
//!
//! ```rust
//! use dof_core::calculations::depth_of_field::{calculate, DofInput, Distance};
//!
//! let input = DofInput {
//!     focal_length_mm: 50,
//!     aperture_code: 800,
//!     subject_distance_m: 5.0,
//!     circle_of_confusion_mm: 0.03,
//! };
//!
//! let result = calculate(&input).unwrap();
//! assert!((result.hyperfocal_distance_m - 10.467).abs() < 0.001);
//! assert!((result.near_limit_m - 3.384).abs() < 0.001);
//! assert!(matches!(result.far_limit_m, Distance::Finite(far) if (far - 9.573).abs() < 0.001));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::aperture::resolve_exact_f_stop;
use crate::errors::{CalcError, CalcResult};
use crate::units::{Metres, Millimetres, Units};

/// Absolute tolerance (m) for treating the subject as at the hyperfocal distance
pub const HYPERFOCAL_TOLERANCE_M: f64 = 1e-6;

/// Input parameters for one depth-of-field calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "focal_length_mm": 50,
///   "aperture_code": 800,
///   "subject_distance_m": 5.0,
///   "circle_of_confusion_mm": 0.03
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DofInput {
    /// Focal length in millimetres
    pub focal_length_mm: u32,

    /// Nominal aperture code, f-number × 100 (e.g., 800 for f/8.0)
    pub aperture_code: u32,

    /// Distance from the camera to the subject in metres
    pub subject_distance_m: f64,

    /// Circle of confusion of the camera body in millimetres
    pub circle_of_confusion_mm: f64,
}

impl DofInput {
    /// Validate input parameters.
    ///
    /// The aperture code is checked separately by the table lookup.
    pub fn validate(&self) -> CalcResult<()> {
        if self.focal_length_mm == 0 {
            return Err(CalcError::invalid_input(
                "focal_length_mm",
                self.focal_length_mm.to_string(),
                "Focal length must be positive",
            ));
        }
        if !self.circle_of_confusion_mm.is_finite() || self.circle_of_confusion_mm <= 0.0 {
            return Err(CalcError::invalid_input(
                "circle_of_confusion_mm",
                self.circle_of_confusion_mm.to_string(),
                "Circle of confusion must be a positive number",
            ));
        }
        if !self.subject_distance_m.is_finite() {
            return Err(CalcError::invalid_input(
                "subject_distance_m",
                self.subject_distance_m.to_string(),
                "Distance must be a finite number",
            ));
        }
        if self.subject_distance_m < 0.0 {
            return Err(CalcError::invalid_input(
                "subject_distance_m",
                self.subject_distance_m.to_string(),
                "Distance cannot be negative",
            ));
        }
        Ok(())
    }
}

/// A distance that may be unbounded.
///
/// Serializes as `{"finite": 9.57}` or `"infinite"`, so consumers never have
/// to guess whether a huge number meant infinity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Distance {
    /// A finite distance in metres
    Finite(f64),
    /// Unbounded
    Infinite,
}

impl Distance {
    pub fn is_infinite(&self) -> bool {
        matches!(self, Distance::Infinite)
    }

    /// The value in metres, or `None` when infinite
    pub fn finite(&self) -> Option<f64> {
        match self {
            Distance::Finite(m) => Some(*m),
            Distance::Infinite => None,
        }
    }

    /// Apply `f` to a finite value; infinity stays infinite.
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Distance {
        match self {
            Distance::Finite(m) => Distance::Finite(f(m)),
            Distance::Infinite => Distance::Infinite,
        }
    }

    /// Convert a metric distance into display units
    pub fn in_units(self, units: Units) -> Distance {
        self.map(|m| units.from_metres(m))
    }
}

/// Where the subject sits relative to the hyperfocal distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubjectPosition {
    /// D < H: both limits are finite
    Closer,
    /// |D - H| < 1e-6 m
    AtHyperfocal,
    /// D > H: far limit is infinite
    Beyond,
}

impl fmt::Display for SubjectPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubjectPosition::Closer => write!(f, "closer than hyperfocal"),
            SubjectPosition::AtHyperfocal => write!(f, "at hyperfocal"),
            SubjectPosition::Beyond => write!(f, "beyond hyperfocal"),
        }
    }
}

/// Results from a depth-of-field calculation. All distances are metres.
///
/// ## JSON Example
///
/// ```json
/// {
///   "exact_f_stop": 8.000000000000004,
///   "subject_distance_m": 5.0,
///   "position": "Closer",
///   "hyperfocal_distance_m": 10.466666666666665,
///   "near_limit_m": 3.383620689655172,
///   "far_limit_m": { "finite": 9.573170731707316 },
///   "total_depth_m": { "finite": 6.189550042052144 },
///   "in_front_of_subject_m": 1.616379310344828,
///   "behind_subject_m": { "finite": 4.573170731707316 }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DofResult {
    /// Exact f-stop ratio the aperture code resolved to
    pub exact_f_stop: f64,

    /// Subject distance the limits were computed for
    pub subject_distance_m: f64,

    /// Subject position relative to the hyperfocal distance
    pub position: SubjectPosition,

    /// Hyperfocal distance
    pub hyperfocal_distance_m: f64,

    /// Nearest acceptably sharp distance
    pub near_limit_m: f64,

    /// Farthest acceptably sharp distance
    pub far_limit_m: Distance,

    /// far - near
    pub total_depth_m: Distance,

    /// D - near, always finite
    pub in_front_of_subject_m: f64,

    /// far - D
    pub behind_subject_m: Distance,
}

impl DofResult {
    /// Whether everything beyond the near limit is sharp
    pub fn sharp_to_infinity(&self) -> bool {
        self.far_limit_m.is_infinite()
    }
}

/// Hyperfocal distance in metres.
///
/// `H = f² / (N · c) + f`, evaluated in millimetres and converted once.
pub fn hyperfocal_distance_m(focal_length_mm: u32, exact_f_stop: f64, circle_of_confusion_mm: f64) -> f64 {
    let f = f64::from(focal_length_mm);
    let h_mm = Millimetres((f * f) / (exact_f_stop * circle_of_confusion_mm) + f);
    Metres::from(h_mm).value()
}

/// Classify a subject distance against a hyperfocal distance.
pub fn classify(subject_distance_m: f64, hyperfocal_distance_m: f64) -> SubjectPosition {
    if (subject_distance_m - hyperfocal_distance_m).abs() < HYPERFOCAL_TOLERANCE_M {
        SubjectPosition::AtHyperfocal
    } else if subject_distance_m < hyperfocal_distance_m {
        SubjectPosition::Closer
    } else {
        SubjectPosition::Beyond
    }
}

/// `H·D / (H + D)`, divided through by the larger of the two so the
/// product never overflows.
fn near_limit_m(h: f64, d: f64) -> f64 {
    if d == 0.0 {
        0.0
    } else if d <= h {
        d / (1.0 + d / h)
    } else {
        h / (1.0 + h / d)
    }
}

/// `H·D / (H - D)` for `D < H`.
fn far_limit_m(h: f64, d: f64) -> f64 {
    if d == 0.0 {
        0.0
    } else {
        d / ((h - d) / h)
    }
}

/// Calculate depth of field.
///
/// Pure and deterministic: identical inputs give bit-identical results.
///
/// # Arguments
///
/// * `input` - Focal length, aperture code, subject distance and circle of confusion
///
/// # Returns
///
/// * `Ok(DofResult)` - Hyperfocal distance and near/far limits in metres
/// * `Err(CalcError::UnknownApertureCode)` - Aperture code not in the table
/// * `Err(CalcError::InvalidInput)` - Non-positive focal length or CoC, bad distance
pub fn calculate(input: &DofInput) -> CalcResult<DofResult> {
    input.validate()?;
    let exact_f_stop = resolve_exact_f_stop(input.aperture_code)?;

    let h = hyperfocal_distance_m(input.focal_length_mm, exact_f_stop, input.circle_of_confusion_mm);
    if !h.is_finite() {
        return Err(CalcError::invalid_input(
            "circle_of_confusion_mm",
            input.circle_of_confusion_mm.to_string(),
            "Hyperfocal distance is not representable for this circle of confusion",
        ));
    }
    let d = input.subject_distance_m;
    let position = classify(d, h);

    let (near, far) = match position {
        SubjectPosition::AtHyperfocal => (h / 2.0, Distance::Infinite),
        SubjectPosition::Closer => (near_limit_m(h, d), Distance::Finite(far_limit_m(h, d))),
        SubjectPosition::Beyond => (near_limit_m(h, d), Distance::Infinite),
    };
    if let Distance::Finite(far) = far {
        if !far.is_finite() {
            return Err(CalcError::invalid_input(
                "subject_distance_m",
                d.to_string(),
                "Far limit is not representable this close to the hyperfocal distance",
            ));
        }
    }

    let result = DofResult {
        exact_f_stop,
        subject_distance_m: d,
        position,
        hyperfocal_distance_m: h,
        near_limit_m: near,
        far_limit_m: far,
        total_depth_m: far.map(|far| far - near),
        in_front_of_subject_m: d - near,
        behind_subject_m: far.map(|far| far - d),
    };

    log::debug!(
        "DoF {}mm {} D={:.3}m: H={:.3}m near={:.3}m far={:?} ({})",
        input.focal_length_mm,
        crate::aperture::f_number_label(input.aperture_code),
        d,
        h,
        near,
        far,
        position
    );

    Ok(result)
}

/// Calculate depth of field from loose values.
///
/// Same as [`calculate`], for callers that hold the values separately
/// (e.g. a circle of confusion just read from the catalog).
pub fn calculate_dof(
    focal_length_mm: u32,
    aperture_code: u32,
    subject_distance_m: f64,
    circle_of_confusion_mm: f64,
) -> CalcResult<DofResult> {
    calculate(&DofInput {
        focal_length_mm,
        aperture_code,
        subject_distance_m,
        circle_of_confusion_mm,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{to_imperial, to_metric};

    fn test_input() -> DofInput {
        DofInput {
            focal_length_mm: 50,
            aperture_code: 800,
            subject_distance_m: 5.0,
            circle_of_confusion_mm: 0.03,
        }
    }

    #[test]
    fn test_hyperfocal_distance() {
        // H = 50² / (8 · 0.03) + 50 = 10416.67 + 50 = 10466.67 mm
        let h = hyperfocal_distance_m(50, 8.0, 0.03);
        assert!((h - 10.46667).abs() < 1e-5);
    }

    #[test]
    fn test_focal_length_term_is_kept() {
        let with_term = hyperfocal_distance_m(50, 8.0, 0.03);
        let without_term = (50.0 * 50.0) / (8.0 * 0.03) / 1000.0;
        assert!((with_term - without_term - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_50mm_f8_at_5m() {
        let result = calculate(&test_input()).unwrap();

        assert!((result.hyperfocal_distance_m - 10.467).abs() < 0.001);
        assert_eq!(result.position, SubjectPosition::Closer);

        // near = (10.467 · 5) / 15.467 = 3.384
        assert!((result.near_limit_m - 3.384).abs() < 0.001);

        // far = (10.467 · 5) / 5.467 = 9.573
        let far = result.far_limit_m.finite().unwrap();
        assert!((far - 9.574).abs() < 0.01);

        assert!((result.in_front_of_subject_m - (5.0 - result.near_limit_m)).abs() < 1e-12);
        assert!((result.behind_subject_m.finite().unwrap() - (far - 5.0)).abs() < 1e-12);
    }

    #[test]
    fn test_closer_invariants() {
        for &d in &[0.3, 1.0, 2.5, 5.0, 10.0, 10.4] {
            let input = DofInput { subject_distance_m: d, ..test_input() };
            let result = calculate(&input).unwrap();
            let far = result.far_limit_m.finite().unwrap();
            assert!(result.near_limit_m > 0.0);
            assert!(result.near_limit_m < d && d < far, "ordering broken at {}", d);
            let total = result.total_depth_m.finite().unwrap();
            assert!((total - (far - result.near_limit_m)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_subject_at_hyperfocal() {
        let h = hyperfocal_distance_m(50, resolve_exact_f_stop(800).unwrap(), 0.03);
        let input = DofInput { subject_distance_m: h, ..test_input() };
        let result = calculate(&input).unwrap();

        assert_eq!(result.position, SubjectPosition::AtHyperfocal);
        assert_eq!(result.near_limit_m, h / 2.0);
        assert_eq!(result.far_limit_m, Distance::Infinite);
        assert_eq!(result.total_depth_m, Distance::Infinite);
        assert_eq!(result.behind_subject_m, Distance::Infinite);
        assert!((result.in_front_of_subject_m - h / 2.0).abs() < 1e-12);
        assert!(result.sharp_to_infinity());
    }

    #[test]
    fn test_within_tolerance_counts_as_hyperfocal() {
        let h = hyperfocal_distance_m(50, resolve_exact_f_stop(800).unwrap(), 0.03);
        for offset in [-5e-7, 5e-7] {
            let input = DofInput { subject_distance_m: h + offset, ..test_input() };
            let result = calculate(&input).unwrap();
            assert_eq!(result.position, SubjectPosition::AtHyperfocal);
            assert_eq!(result.near_limit_m, h / 2.0);
        }
        // Just outside the band on the near side: finite, but huge
        let input = DofInput { subject_distance_m: h - 2e-6, ..test_input() };
        let result = calculate(&input).unwrap();
        assert_eq!(result.position, SubjectPosition::Closer);
        assert!(result.far_limit_m.finite().unwrap() > 1e6);
    }

    #[test]
    fn test_subject_beyond_hyperfocal() {
        let input = DofInput { subject_distance_m: 25.0, ..test_input() };
        let result = calculate(&input).unwrap();

        assert_eq!(result.position, SubjectPosition::Beyond);
        assert!(result.near_limit_m < 25.0);
        assert!(result.near_limit_m > result.hyperfocal_distance_m / 2.0);
        assert!(result.far_limit_m.is_infinite());
        assert!(result.total_depth_m.is_infinite());
        assert!(result.behind_subject_m.is_infinite());
        assert!((result.in_front_of_subject_m - (25.0 - result.near_limit_m)).abs() < 1e-12);
    }

    #[test]
    fn test_idempotent() {
        let a = calculate(&test_input()).unwrap();
        let b = calculate(&test_input()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_imperial_round_trip_input_matches_metric() {
        let metric = calculate(&test_input()).unwrap();
        let via_feet = DofInput {
            subject_distance_m: to_metric(to_imperial(5.0)),
            ..test_input()
        };
        let converted = calculate(&via_feet).unwrap();
        assert_eq!(metric.hyperfocal_distance_m, converted.hyperfocal_distance_m);
        assert!((metric.near_limit_m - converted.near_limit_m).abs() < 1e-9);
        let far_a = metric.far_limit_m.finite().unwrap();
        let far_b = converted.far_limit_m.finite().unwrap();
        assert!((far_a - far_b).abs() < 1e-9);
    }

    #[test]
    fn test_uses_exact_f_stop_not_linear() {
        // f/11 is really 11.3137; a linear code/100 would give a longer H
        let input = DofInput { aperture_code: 1100, ..test_input() };
        let result = calculate(&input).unwrap();
        let linear_h = hyperfocal_distance_m(50, 11.0, 0.03);
        assert!((result.exact_f_stop - 11.3137).abs() < 1e-4);
        assert!(result.hyperfocal_distance_m < linear_h);
    }

    #[test]
    fn test_unknown_aperture_code() {
        let input = DofInput { aperture_code: 360, ..test_input() };
        assert_eq!(calculate(&input), Err(CalcError::unknown_aperture(360)));
    }

    #[test]
    fn test_invalid_inputs() {
        let zero_focal = DofInput { focal_length_mm: 0, ..test_input() };
        assert!(matches!(calculate(&zero_focal), Err(CalcError::InvalidInput { .. })));

        let zero_coc = DofInput { circle_of_confusion_mm: 0.0, ..test_input() };
        assert!(matches!(calculate(&zero_coc), Err(CalcError::InvalidInput { .. })));

        let negative_coc = DofInput { circle_of_confusion_mm: -0.02, ..test_input() };
        assert!(matches!(calculate(&negative_coc), Err(CalcError::InvalidInput { .. })));

        let negative_distance = DofInput { subject_distance_m: -1.0, ..test_input() };
        assert!(matches!(calculate(&negative_distance), Err(CalcError::InvalidInput { .. })));

        let nan_distance = DofInput { subject_distance_m: f64::NAN, ..test_input() };
        assert!(matches!(calculate(&nan_distance), Err(CalcError::InvalidInput { .. })));
    }

    #[test]
    fn test_zero_distance_is_degenerate_but_finite() {
        let input = DofInput { subject_distance_m: 0.0, ..test_input() };
        let result = calculate(&input).unwrap();
        assert_eq!(result.near_limit_m, 0.0);
        assert_eq!(result.far_limit_m, Distance::Finite(0.0));
        assert_eq!(result.in_front_of_subject_m, 0.0);
    }

    #[test]
    fn test_huge_distance_stays_below_subject() {
        let result = calculate_dof(50, 800, 1e308, 0.03).unwrap();
        assert_eq!(result.position, SubjectPosition::Beyond);
        assert!(result.near_limit_m.is_finite());
        assert!(result.near_limit_m < 1e308);
        assert!((result.near_limit_m - result.hyperfocal_distance_m).abs() < 1e-9);
        assert!(result.in_front_of_subject_m.is_finite());
        assert!(result.in_front_of_subject_m > 0.0);
    }

    #[test]
    fn test_tiny_distance_keeps_positive_near_limit() {
        let d = 1e-300;
        let result = calculate_dof(50, 800, d, 0.03).unwrap();
        assert_eq!(result.position, SubjectPosition::Closer);
        assert!(result.near_limit_m > 0.0);
        assert!(result.near_limit_m <= d);
        let far = result.far_limit_m.finite().unwrap();
        assert!(far >= d);
    }

    #[test]
    fn test_subnormal_coc_rejected() {
        let err = calculate_dof(50, 800, 5.0, 1e-320).unwrap_err();
        assert!(matches!(
            err,
            CalcError::InvalidInput { ref field, .. } if field == "circle_of_confusion_mm"
        ));
    }

    #[test]
    fn test_results_never_nan() {
        for &d in &[0.0, 1e-300, 0.5, 5.0, 10.4, 25.0, 1e6, 1e300, f64::MAX] {
            let result = calculate_dof(50, 800, d, 0.03).unwrap();
            assert!(!result.near_limit_m.is_nan(), "near NaN at {}", d);
            assert!(!result.in_front_of_subject_m.is_nan(), "in front NaN at {}", d);
            if let Distance::Finite(far) = result.far_limit_m {
                assert!(far.is_finite(), "far not finite at {}", d);
            }
        }
    }

    #[test]
    fn test_calculate_dof_matches_calculate() {
        let loose = calculate_dof(50, 800, 5.0, 0.03).unwrap();
        assert_eq!(loose, calculate(&test_input()).unwrap());
    }

    #[test]
    fn test_distance_serialization() {
        assert_eq!(serde_json::to_string(&Distance::Infinite).unwrap(), "\"infinite\"");
        assert_eq!(serde_json::to_string(&Distance::Finite(2.5)).unwrap(), "{\"finite\":2.5}");

        let result = calculate(&DofInput { subject_distance_m: 30.0, ..test_input() }).unwrap();
        let json = serde_json::to_string_pretty(&result).unwrap();
        assert!(json.contains("\"far_limit_m\": \"infinite\""));
        let roundtrip: DofResult = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.far_limit_m, Distance::Infinite);
        assert_eq!(roundtrip.position, SubjectPosition::Beyond);
    }

    #[test]
    fn test_distance_in_units() {
        assert_eq!(Distance::Infinite.in_units(Units::Imperial), Distance::Infinite);
        let ft = Distance::Finite(1.0).in_units(Units::Imperial).finite().unwrap();
        assert!((ft - 3.2808399).abs() < 1e-12);
    }
}

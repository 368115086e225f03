//! # Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(input) -> Result<*Result, CalcError>` - Pure calculation function
//!
//! ## Available Calculations
//!
//! - [`depth_of_field`] - Hyperfocal distance and near/far sharpness limits

pub mod depth_of_field;

// Re-export commonly used types
pub use depth_of_field::{
    calculate, calculate_dof, classify, hyperfocal_distance_m, Distance, DofInput, DofResult, SubjectPosition,
};

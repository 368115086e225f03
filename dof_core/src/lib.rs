//! # dof_core - Depth-of-Field Calculation Engine
//!
//! `dof_core` computes the hyperfocal distance and the near/far limits of
//! acceptable sharpness for a camera body, lens and subject distance. All
//! inputs and outputs are JSON-serializable so a front end (or anything
//! else) can store and exchange them freely.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: the engine is a pure function from input to result
//! - **Metric Inside**: feet appear only at the display boundary
//! - **Exact Apertures**: nominal codes resolve through a table of powers of √2
//! - **Rich Errors**: structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use dof_core::catalog::Catalog;
//! use dof_core::calculate_dof;
//!
//! let catalog = Catalog::builtin().unwrap();
//! let coc = catalog.circle_of_confusion("Full frame (35mm)").unwrap();
//!
//! // 50mm at f/8, subject at 5 m
//! let result = calculate_dof(50, 800, 5.0, coc).unwrap();
//! assert!(result.near_limit_m < 5.0);
//!
//! let json = serde_json::to_string_pretty(&result).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Depth-of-field formulas and result types
//! - [`aperture`] - Nominal aperture codes and the exact f-stop table
//! - [`catalog`] - Camera bodies, lenses and distance ranges
//! - [`detents`] - Discrete slider values and snapping
//! - [`session`] - Current selection and last result for one calculator page
//! - [`display`] - Formatting results for people
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod aperture;
pub mod calculations;
pub mod catalog;
pub mod detents;
pub mod display;
pub mod errors;
pub mod session;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use aperture::{resolve_exact_f_stop, StopScale};
pub use calculations::{calculate, calculate_dof, Distance, DofInput, DofResult, SubjectPosition};
pub use catalog::Catalog;
pub use display::DisplaySettings;
pub use errors::{CalcError, CalcResult};
pub use session::{Session, SliderInputs};
pub use units::Units;

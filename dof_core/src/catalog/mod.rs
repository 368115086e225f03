//! # Reference Catalog
//!
//! Camera bodies, lenses and distance ranges the calculator can offer.
//!
//! The catalog is an ordinary value: build it once at startup (from the
//! bundled data or a JSON file), then pass it by reference to whatever
//! needs it. There is no hidden global cache, and each section names its
//! default entry explicitly.
//!
//! ## File Format
//!
//! ```json
//! {
//!   "bodies": {
//!     "default": "Full frame (35mm)",
//!     "entries": [
//!       { "name": "Full frame (35mm)", "circle_of_confusion_mm": 0.030 },
//!       { "name": "Large format 4x5", "circle_of_confusion_mm": 0.1, "include": false }
//!     ]
//!   },
//!   "lenses": { "default": "...", "entries": [ ... ] },
//!   "ranges": { "default": "...", "entries": [ ... ] }
//! }
//! ```
//!
//! Entries marked `"include": false` are dropped at load time. Loading fails
//! if a section ends up empty, a name is repeated, an entry is invalid, or
//! the default does not name an included entry.
//!
//! ## Example
//!
//! ```rust
//! use dof_core::catalog::Catalog;
//!
//! let catalog = Catalog::builtin().unwrap();
//! let body = catalog.default_body();
//! let coc = catalog.circle_of_confusion(&body.name).unwrap();
//! assert!(coc > 0.0);
//! ```

pub mod body;
pub mod lens;
pub mod range;

pub use body::CameraBody;
pub use lens::Lens;
pub use range::DistanceRange;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

/// Shared behaviour of bodies, lenses and ranges.
pub trait CatalogEntry {
    /// Entry kind used in error messages ("Body", "Lens", "Range")
    const KIND: &'static str;

    /// Unique key within its section
    fn name(&self) -> &str;

    /// Check the entry's own values
    fn validate(&self) -> CalcResult<()>;
}

// ============================================================================
// File format
// ============================================================================

fn included_by_default() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawEntry<T> {
    #[serde(default = "included_by_default")]
    include: bool,
    #[serde(flatten)]
    item: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawSection<T> {
    default: String,
    entries: Vec<RawEntry<T>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawCatalog {
    bodies: RawSection<CameraBody>,
    lenses: RawSection<Lens>,
    ranges: RawSection<DistanceRange>,
}

// ============================================================================
// Sections
// ============================================================================

/// An ordered, validated list of entries with one default.
#[derive(Debug, Clone)]
pub struct Section<T> {
    entries: Vec<T>,
    default_index: usize,
}

impl<T: CatalogEntry> Section<T> {
    fn from_raw(raw: RawSection<T>) -> CalcResult<Self> {
        let total = raw.entries.len();
        let entries: Vec<T> = raw
            .entries
            .into_iter()
            .filter(|entry| entry.include)
            .map(|entry| entry.item)
            .collect();

        if entries.len() < total {
            log::info!("Catalog: skipped {} excluded {} entries", total - entries.len(), T::KIND);
        }
        if entries.is_empty() {
            return Err(CalcError::invalid_catalog(format!("no {} entries", T::KIND)));
        }

        let mut seen = HashSet::new();
        for entry in &entries {
            entry.validate()?;
            if !seen.insert(entry.name()) {
                return Err(CalcError::invalid_catalog(format!(
                    "duplicate {} name '{}'",
                    T::KIND,
                    entry.name()
                )));
            }
        }

        let default_index = entries
            .iter()
            .position(|entry| entry.name() == raw.default)
            .ok_or_else(|| {
                CalcError::invalid_catalog(format!(
                    "default {} '{}' is not an included entry",
                    T::KIND,
                    raw.default
                ))
            })?;

        Ok(Section { entries, default_index })
    }

    /// All entries in file order
    pub fn list(&self) -> &[T] {
        &self.entries
    }

    /// Look up an entry by name
    pub fn find(&self, name: &str) -> Option<&T> {
        self.entries.iter().find(|entry| entry.name() == name)
    }

    /// Look up an entry by name, failing with `CatalogEntryNotFound`
    pub fn get(&self, name: &str) -> CalcResult<&T> {
        self.find(name).ok_or_else(|| CalcError::not_found(T::KIND, name))
    }

    /// The designated default entry
    pub fn default_entry(&self) -> &T {
        &self.entries[self.default_index]
    }

    /// Entry names in file order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Reference data for bodies, lenses and distance ranges.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub bodies: Section<CameraBody>,
    pub lenses: Section<Lens>,
    pub ranges: Section<DistanceRange>,
}

impl Catalog {
    /// The catalog bundled with the crate.
    pub fn builtin() -> CalcResult<Self> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    /// Parse and validate catalog JSON.
    pub fn from_json_str(json: &str) -> CalcResult<Self> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        let catalog = Catalog {
            bodies: Section::from_raw(raw.bodies)?,
            lenses: Section::from_raw(raw.lenses)?,
            ranges: Section::from_raw(raw.ranges)?,
        };
        log::info!(
            "Catalog loaded: {} bodies, {} lenses, {} ranges",
            catalog.bodies.len(),
            catalog.lenses.len(),
            catalog.ranges.len()
        );
        Ok(catalog)
    }

    /// Load catalog JSON from a file.
    pub fn load(path: impl AsRef<Path>) -> CalcResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
        Self::from_json_str(&json)
    }

    pub fn list_bodies(&self) -> &[CameraBody] {
        self.bodies.list()
    }

    pub fn list_lenses(&self) -> &[Lens] {
        self.lenses.list()
    }

    pub fn list_ranges(&self) -> &[DistanceRange] {
        self.ranges.list()
    }

    pub fn find_body(&self, name: &str) -> Option<&CameraBody> {
        self.bodies.find(name)
    }

    pub fn find_lens(&self, name: &str) -> Option<&Lens> {
        self.lenses.find(name)
    }

    pub fn find_range(&self, name: &str) -> Option<&DistanceRange> {
        self.ranges.find(name)
    }

    pub fn body(&self, name: &str) -> CalcResult<&CameraBody> {
        self.bodies.get(name)
    }

    pub fn lens(&self, name: &str) -> CalcResult<&Lens> {
        self.lenses.get(name)
    }

    pub fn range(&self, name: &str) -> CalcResult<&DistanceRange> {
        self.ranges.get(name)
    }

    pub fn default_body(&self) -> &CameraBody {
        self.bodies.default_entry()
    }

    pub fn default_lens(&self) -> &Lens {
        self.lenses.default_entry()
    }

    pub fn default_range(&self) -> &DistanceRange {
        self.ranges.default_entry()
    }

    /// Circle of confusion (mm) for a named body.
    pub fn circle_of_confusion(&self, body_name: &str) -> CalcResult<f64> {
        Ok(self.body(body_name)?.circle_of_confusion_mm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_CATALOG: &str = r#"{
        "bodies": {
            "default": "Crop",
            "entries": [
                { "name": "Full", "circle_of_confusion_mm": 0.03 },
                { "name": "Crop", "circle_of_confusion_mm": 0.02 },
                { "name": "Hidden", "circle_of_confusion_mm": 0.1, "include": false }
            ]
        },
        "lenses": {
            "default": "Prime",
            "entries": [
                {
                    "name": "Prime",
                    "min_length_mm": 50, "max_length_mm": 50, "starting_length_mm": 50,
                    "min_aperture": 140, "max_aperture": 1600, "starting_aperture": 400
                }
            ]
        },
        "ranges": {
            "default": "Near",
            "entries": [
                { "name": "Near", "min_distance_m": 0, "max_distance_m": 10, "starting_distance_m": 3 }
            ]
        }
    }"#;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert!(!catalog.list_bodies().is_empty());
        assert!(!catalog.list_lenses().is_empty());
        assert!(!catalog.list_ranges().is_empty());
        assert_eq!(catalog.default_body().name, "Full frame (35mm)");
        assert!((catalog.circle_of_confusion("Full frame (35mm)").unwrap() - 0.03).abs() < 1e-12);
    }

    #[test]
    fn test_builtin_excludes_hidden_entries() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.find_body("Large format 4x5").is_none());
        assert!(catalog.find_lens("150mm large format (quarter stops)").is_none());
    }

    #[test]
    fn test_small_catalog() {
        let catalog = Catalog::from_json_str(SMALL_CATALOG).unwrap();
        assert_eq!(catalog.bodies.names().collect::<Vec<_>>(), vec!["Full", "Crop"]);
        assert_eq!(catalog.default_body().name, "Crop");
        assert!(catalog.find_body("Hidden").is_none());
        assert_eq!(catalog.default_lens().stop_scales, vec![crate::aperture::StopScale::Full]);
        assert_eq!(catalog.default_range().starting_distance_m, 3);
    }

    #[test]
    fn test_lookup_missing_entry() {
        let catalog = Catalog::from_json_str(SMALL_CATALOG).unwrap();
        assert_eq!(
            catalog.body("Nope").unwrap_err(),
            CalcError::not_found("Body", "Nope")
        );
        assert!(matches!(
            catalog.circle_of_confusion("Nope"),
            Err(CalcError::CatalogEntryNotFound { .. })
        ));
    }

    #[test]
    fn test_default_must_be_included() {
        let json = SMALL_CATALOG.replace("\"default\": \"Crop\"", "\"default\": \"Hidden\"");
        let err = Catalog::from_json_str(&json).unwrap_err();
        assert!(matches!(err, CalcError::InvalidCatalog { .. }));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let json = SMALL_CATALOG.replace("\"name\": \"Full\"", "\"name\": \"Crop\"");
        assert!(matches!(
            Catalog::from_json_str(&json),
            Err(CalcError::InvalidCatalog { .. })
        ));
    }

    #[test]
    fn test_invalid_entry_rejected() {
        let json = SMALL_CATALOG.replace("0.02", "-0.02");
        assert!(matches!(
            Catalog::from_json_str(&json),
            Err(CalcError::InvalidCatalog { .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Catalog::from_json_str("{ not json"),
            Err(CalcError::SerializationError { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Catalog::load("/definitely/not/here/catalog.json").unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("dof_core_catalog_{}.json", std::process::id()));
        fs::write(&path, SMALL_CATALOG).unwrap();
        let catalog = Catalog::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(catalog.list_bodies().len(), 2);
    }
}

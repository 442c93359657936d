//! # gis-analysis
//!
//! Pure, synchronous scoring over an in-memory snapshot of projects and
//! reference data:
//! - [`detector`]: weighted keyword/barangay zone detection
//! - [`suitability`]: 0–100 land-suitability score from five weighted factors
//! - [`compatibility`]: project-type vs zone-type rules, validation, recommendation
//! - [`clustering`]: administrative, k-means, DBSCAN, and hierarchical clustering
//!   with quality metrics and a best-algorithm ranking
//! - [`analytics`]: per-zone and per-barangay aggregates
//!
//! Nothing here touches the database; `gis-db` loads the snapshot and
//! persists the results.

pub mod analytics;
pub mod clustering;
pub mod compatibility;
pub mod detector;
pub mod error;
pub mod geo;
pub mod suitability;

pub use error::AnalysisError;

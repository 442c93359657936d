//! Repository modules for all tracker entities.
//!
//! Each module adds methods to `GisService` via `impl GisService` blocks.

pub mod analytics;
pub mod audit;
pub mod budget;
pub mod clustering;
pub mod detection;
pub mod progress;
pub mod project;
pub mod reference;
pub mod suitability;
pub mod zone;

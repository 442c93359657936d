//! # gis-core
//!
//! Core types, zone codes, ID prefixes, and error types for the municipal
//! infrastructure-project tracker.
//!
//! This crate provides the foundational types shared across all `gis` crates:
//! - Entity structs for all domain objects (projects, zones, budget requests, etc.)
//! - Status enums with state machine transitions
//! - Zone type codes with canonical/compact/display conversions
//! - ID prefix constants
//! - Cross-cutting error types
//! - CLI response types
//! - Audit detail sub-types

pub mod audit_detail;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod responses;
pub mod zone_code;

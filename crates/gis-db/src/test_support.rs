//! Shared test utilities for gis-db tests.

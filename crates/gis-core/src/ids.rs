//! ID prefix constants.
//!
//! Every persisted entity carries a prefixed ID (`prj-a3f8b2c1`). The prefix
//! makes IDs self-describing in logs, audit rows, and CLI output.

pub const PREFIX_PROJECT: &str = "prj";
pub const PREFIX_ZONE: &str = "zon";
pub const PREFIX_BUDGET_REQUEST: &str = "bud";
pub const PREFIX_BUDGET_HISTORY: &str = "bsh";
pub const PREFIX_CLUSTERING: &str = "clu";
pub const PREFIX_PROGRESS: &str = "prg";
pub const PREFIX_COST: &str = "cst";
pub const PREFIX_AUDIT: &str = "aud";

/// All known prefixes, for exhaustive checks in tests.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_PROJECT,
    PREFIX_ZONE,
    PREFIX_BUDGET_REQUEST,
    PREFIX_BUDGET_HISTORY,
    PREFIX_CLUSTERING,
    PREFIX_PROGRESS,
    PREFIX_COST,
    PREFIX_AUDIT,
];

/// Whether `id` carries the given prefix followed by a dash.
#[must_use]
pub fn has_prefix(id: &str, prefix: &str) -> bool {
    id.strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('-') && rest.len() > 1)
}

//! Service layer containing the link-guard logic and side-effect helpers.
//!
//! ## Service map
//! - `policy.rs` — url normalization and allowlist host matching.
//! - `probe.rs` — bounded HEAD/GET reachability probe + title extraction.
//! - `rules.rs` — free text to official-page rule matching.
//! - `guard.rs` — candidate/topic decisions (allowlist, probe, fallback).
//! - `limiter.rs` — per-checklist global and per-host probe permits.
//! - `enricher.rs` — concurrent checklist sanitize/enrich/process.
//! - `summary.rs` — visa summary parsing and link guarding.
//! - `output.rs` — JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Network I/O lives in `probe.rs` only.
//! - Guard operations return decisions, never errors.

pub mod enricher;
pub mod guard;
pub mod limiter;
pub mod output;
pub mod policy;
pub mod probe;
pub mod rules;
pub mod summary;

#[cfg(test)]
pub(crate) mod testing;

//! Shared data model layer (structs/constants only).
//!
//! ## Purpose
//! - Keep checklist, decision and report structs in one place.
//! - Make JSON output schema changes explicit and reviewable.
//!
//! ## Files
//! - `models.rs` — checklist shapes, probe/guard results, rules, CLI reports.
//! - `constants.rs` — timeouts, limits and the embedded default registry.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem/network side effects.
//!
//! ## Compatibility note
//! The checklist structs mirror what the content generator emits and what the
//! display layer consumes. Keep schema-impacting changes synchronized with
//! `docs/contracts/*`.

pub mod constants;
pub mod models;

//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `links.rs` — check/topic/match/normalize/summary.
//! - `checklist.rs` — sanitize/enrich/process over checklist JSON.
//! - `registry.rs` — registry list/show/lint.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*`.
//! - Keep behavior and output schema stable.

pub mod checklist;
pub mod links;
pub mod registry;

pub use checklist::handle_checklist_commands;
pub use links::handle_link_commands;
pub use registry::handle_registry_commands;

use crate::cli::Cli;
use crate::registry::load_registry;
use crate::services::guard::LinkGuard;
use crate::services::probe::HttpProbe;
use std::sync::Arc;
use std::time::Duration;

pub async fn run(cli: &Cli) -> anyhow::Result<()> {
    let registry = Arc::new(load_registry(cli.registry.as_deref())?);
    if handle_registry_commands(cli, &registry)? {
        return Ok(());
    }

    let probe = HttpProbe::new(Duration::from_millis(cli.timeout_ms))?;
    let guard = LinkGuard::new(registry, probe);
    if handle_link_commands(cli, &guard).await? {
        return Ok(());
    }
    handle_checklist_commands(cli, &guard).await?;
    Ok(())
}

//! linkguard: official-link guard for generated immigration checklists.
//!
//! Links proposed by a text generator are only handed out when their host is
//! on the destination country's (or the global) allowlist and a probe shows
//! the page is live. Checklists get their stale links removed and rule-matched
//! official links attached.

pub mod cli;
pub mod commands;
pub mod domain;
pub mod registry;
pub mod services;

pub use registry::{load_registry, Registry, RegistryError};
pub use services::enricher::{ChecklistEnricher, EnrichOptions};
pub use services::guard::LinkGuard;
pub use services::policy::{is_allowed_host, normalize_url};
pub use services::probe::{HttpProbe, Probe};

use crate::domain::constants::{
    DEFAULT_MAX_CONCURRENCY, DEFAULT_PER_HOST_LIMIT, DEFAULT_PROBE_TIMEOUT_MS,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "linkguard",
    version,
    about = "Official-link guard for generated immigration checklists"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        env = "LINKGUARD_REGISTRY",
        help = "Registry TOML (default: ~/.config/linkguard/registry.toml, else built-in)"
    )]
    pub registry: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        env = "LINKGUARD_TIMEOUT_MS",
        default_value_t = DEFAULT_PROBE_TIMEOUT_MS,
        help = "Deadline for one reachability probe (HEAD + GET)"
    )]
    pub timeout_ms: u64,
    #[arg(
        long,
        global = true,
        env = "LINKGUARD_MAX_CONCURRENCY",
        default_value_t = DEFAULT_MAX_CONCURRENCY,
        help = "Probes in flight per checklist"
    )]
    pub max_concurrency: usize,
    #[arg(
        long,
        global = true,
        env = "LINKGUARD_PER_HOST_LIMIT",
        default_value_t = DEFAULT_PER_HOST_LIMIT,
        help = "Probes in flight per destination host"
    )]
    pub per_host_limit: usize,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate one candidate link (allowlist + probe)
    Check { country: String, url: String },
    /// Best official link for a topic, with fallback
    Topic {
        country: String,
        #[arg(long)]
        candidate: Option<String>,
    },
    /// Show which rule an item text selects (no network)
    Match { country: String, text: String },
    /// Normalize a url (no network)
    Normalize { url: String },
    /// Re-validate links already present in a checklist
    Sanitize {
        country: String,
        #[arg(long, default_value = "-")]
        input: String,
    },
    /// Attach rule-derived official links to a checklist
    Enrich {
        country: String,
        #[arg(long, default_value = "-")]
        input: String,
    },
    /// Sanitize then enrich a checklist
    Process {
        country: String,
        #[arg(long, default_value = "-")]
        input: String,
    },
    /// Parse a tagged visa summary and guard its link
    Summary {
        country: String,
        #[arg(long, default_value = "-")]
        input: String,
    },
    Registry {
        #[command(subcommand)]
        command: RegistryCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum RegistryCommands {
    List,
    Show { country: String },
    Lint,
}

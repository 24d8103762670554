/// Budget for a whole probe (HEAD, fallback GET and body read combined).
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 8_000;
pub const DEFAULT_MAX_CONCURRENCY: usize = 16;
pub const DEFAULT_PER_HOST_LIMIT: usize = 4;

pub const MAX_REDIRECTS: usize = 10;

/// Title extraction never reads more than this much of a page.
pub const TITLE_SCAN_LIMIT_BYTES: usize = 64 * 1024;

pub const USER_AGENT: &str = concat!("linkguard/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_REGISTRY_TOML: &str = include_str!("../../assets/registry.toml");

pub const SUMMARY_UNAVAILABLE: &str =
    "Não foi possível gerar um resumo. Verifique as fontes oficiais.";

use crate::domain::constants::DEFAULT_REGISTRY_TOML;
use crate::domain::models::Rule;
use crate::services::policy::{canonical_host_entry, host_of, is_allowed_host, normalize_url};
use crate::services::rules::fold_text;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RegistryFile {
    #[serde(default)]
    pub global: GlobalSection,
    #[serde(default)]
    pub countries: Vec<CountryEntry>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct GlobalSection {
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CountryEntry {
    pub key: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(default)]
    pub fallback: Option<String>,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl CountryEntry {
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.key)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    #[error("failed to read registry {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse registry: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("country entry with empty key")]
    EmptyCountryKey,
    #[error("duplicate country key or alias: {0}")]
    DuplicateCountry(String),
    #[error("invalid host entry in {scope}: {host:?}")]
    InvalidHost { scope: String, host: String },
    #[error("rule without usable terms in {scope}: {url}")]
    EmptyRuleTerms { scope: String, url: String },
    #[error("fallback for {country} is not on an allowlisted host: {fallback}")]
    FallbackNotAllowlisted { country: String, fallback: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingFallback,
    UnparseableFallback,
    RuleNeverAllowed,
}

/// Operator-fixable gap that does not stop the registry from loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryIssue {
    pub scope: String,
    pub kind: IssueKind,
    pub detail: String,
}

/// Immutable allowlist/fallback/rule configuration, built once and shared.
#[derive(Debug, Clone)]
pub struct Registry {
    countries: Vec<CountryEntry>,
    index: HashMap<String, usize>,
    global_hosts: Vec<String>,
    global_rules: Vec<Rule>,
}

/// Lookup key for a country name or alias.
pub fn country_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn valid_host_entry(host: &str) -> bool {
    !host.is_empty()
        && !host
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | ':' | '@' | '?' | '#' | '*'))
}

fn prepare_hosts(scope: &str, raw: &[String]) -> Result<Vec<String>, RegistryError> {
    let mut out: Vec<String> = Vec::new();
    for h in raw {
        let host = canonical_host_entry(h);
        if !valid_host_entry(&host) {
            return Err(RegistryError::InvalidHost {
                scope: scope.to_string(),
                host: h.clone(),
            });
        }
        if !out.contains(&host) {
            out.push(host);
        }
    }
    Ok(out)
}

fn prepare_rules(scope: &str, raw: &[Rule]) -> Result<Vec<Rule>, RegistryError> {
    raw.iter()
        .map(|rule| {
            let terms: Vec<String> = rule
                .terms
                .iter()
                .map(|t| fold_text(t))
                .filter(|t| !t.is_empty())
                .collect();
            if terms.is_empty() || rule.url.trim().is_empty() {
                return Err(RegistryError::EmptyRuleTerms {
                    scope: scope.to_string(),
                    url: rule.url.clone(),
                });
            }
            Ok(Rule {
                terms,
                url: rule.url.trim().to_string(),
                label: rule.label.clone(),
            })
        })
        .collect()
}

impl Registry {
    /// The registry shipped with the binary.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_toml_str(DEFAULT_REGISTRY_TOML)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = toml::from_str(raw)?;
        Self::from_file_data(file)
    }

    pub fn from_path(path: &Path) -> Result<Self, RegistryError> {
        let raw = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_file_data(file: RegistryFile) -> Result<Self, RegistryError> {
        let global_hosts = prepare_hosts("global", &file.global.hosts)?;
        let global_rules = prepare_rules("global", &file.global.rules)?;

        let mut countries = Vec::with_capacity(file.countries.len());
        let mut index = HashMap::new();
        for entry in file.countries {
            let key = country_key(&entry.key);
            if key.is_empty() {
                return Err(RegistryError::EmptyCountryKey);
            }
            let aliases: Vec<String> = entry
                .aliases
                .iter()
                .map(|a| country_key(a))
                .filter(|a| !a.is_empty() && *a != key)
                .collect();
            let slot = countries.len();
            for name in std::iter::once(&key).chain(aliases.iter()) {
                if index.insert(name.clone(), slot).is_some() {
                    return Err(RegistryError::DuplicateCountry(name.clone()));
                }
            }

            let hosts = prepare_hosts(&key, &entry.hosts)?;
            let rules = prepare_rules(&key, &entry.rules)?;
            let fallback = entry
                .fallback
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty());

            let fallback_host = fallback
                .as_deref()
                .and_then(normalize_url)
                .and_then(|n| host_of(&n));
            if let Some(host) = fallback_host {
                if !is_allowed_host(&host, &hosts) && !is_allowed_host(&host, &global_hosts) {
                    return Err(RegistryError::FallbackNotAllowlisted {
                        country: key,
                        fallback: fallback.unwrap_or_default(),
                    });
                }
            }

            countries.push(CountryEntry {
                key,
                label: entry.label,
                aliases,
                hosts,
                fallback,
                rules,
            });
        }

        debug!(
            countries = countries.len(),
            global_hosts = global_hosts.len(),
            "registry loaded"
        );
        Ok(Self {
            countries,
            index,
            global_hosts,
            global_rules,
        })
    }

    pub fn countries(&self) -> &[CountryEntry] {
        &self.countries
    }

    /// Country by key or alias, case-insensitive.
    pub fn country(&self, name: &str) -> Option<&CountryEntry> {
        self.index
            .get(&country_key(name))
            .and_then(|i| self.countries.get(*i))
    }

    pub fn global_hosts(&self) -> &[String] {
        &self.global_hosts
    }

    pub fn global_rules(&self) -> &[Rule] {
        &self.global_rules
    }

    /// Country hosts; empty for unsupported countries.
    pub fn country_hosts(&self, name: &str) -> &[String] {
        self.country(name).map(|c| c.hosts.as_slice()).unwrap_or(&[])
    }

    pub fn country_rules(&self, name: &str) -> &[Rule] {
        self.country(name).map(|c| c.rules.as_slice()).unwrap_or(&[])
    }

    pub fn fallback(&self, name: &str) -> Option<&str> {
        self.country(name).and_then(|c| c.fallback.as_deref())
    }

    pub fn is_allowed(&self, name: &str, host: &str) -> bool {
        is_allowed_host(host, self.country_hosts(name))
            || is_allowed_host(host, &self.global_hosts)
    }

    pub fn lint(&self) -> Vec<RegistryIssue> {
        let mut issues = Vec::new();
        for c in &self.countries {
            match c.fallback.as_deref() {
                None => issues.push(RegistryIssue {
                    scope: c.key.clone(),
                    kind: IssueKind::MissingFallback,
                    detail: "no fallback anchor configured".to_string(),
                }),
                Some(f) if normalize_url(f).is_none() => issues.push(RegistryIssue {
                    scope: c.key.clone(),
                    kind: IssueKind::UnparseableFallback,
                    detail: f.to_string(),
                }),
                Some(_) => {}
            }
            for rule in &c.rules {
                if !self.rule_url_allowed(&c.key, &rule.url) {
                    issues.push(RegistryIssue {
                        scope: c.key.clone(),
                        kind: IssueKind::RuleNeverAllowed,
                        detail: rule.url.clone(),
                    });
                }
            }
        }
        for rule in &self.global_rules {
            let allowed = normalize_url(&rule.url)
                .and_then(|n| host_of(&n))
                .is_some_and(|h| is_allowed_host(&h, &self.global_hosts));
            if !allowed {
                issues.push(RegistryIssue {
                    scope: "global".to_string(),
                    kind: IssueKind::RuleNeverAllowed,
                    detail: rule.url.clone(),
                });
            }
        }
        issues
    }

    fn rule_url_allowed(&self, country: &str, url: &str) -> bool {
        normalize_url(url)
            .and_then(|n| host_of(&n))
            .is_some_and(|h| self.is_allowed(country, &h))
    }
}

/// Explicit path first, then `$HOME/.config/linkguard/registry.toml`, then the
/// built-in registry. Lint issues are logged, not fatal.
pub fn load_registry(explicit: Option<&Path>) -> Result<Registry, RegistryError> {
    let registry = match explicit {
        Some(path) => Registry::from_path(path)?,
        None => match user_registry_path().filter(|p| p.exists()) {
            Some(path) => Registry::from_path(&path)?,
            None => Registry::builtin()?,
        },
    };
    for issue in registry.lint() {
        warn!(scope = %issue.scope, kind = ?issue.kind, detail = %issue.detail, "registry issue");
    }
    Ok(registry)
}

fn user_registry_path() -> Option<PathBuf> {
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".config/linkguard/registry.toml"))
}

//! Allowlist-first link decisions.
//!
//! Order is fixed: normalize, check the host against country ∪ global
//! allowlists, and only then touch the network. Redirects that leave the
//! allowlist count as failures, so every url handed out stays on an official
//! host.

use crate::domain::models::{GuardDecision, ValidationResult};
use crate::registry::Registry;
use crate::services::policy::{host_of, normalize_url};
use crate::services::probe::{HttpProbe, Probe};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Verified {
    url: String,
    title: Option<String>,
}

pub struct LinkGuard<P = HttpProbe> {
    registry: Arc<Registry>,
    probe: P,
}

impl<P: Probe> LinkGuard<P> {
    pub fn new(registry: Arc<Registry>, probe: P) -> Self {
        Self { registry, probe }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Validated, redirect-resolved url for `candidate`, or `None` when it is
    /// malformed, off the allowlist, or not live.
    pub async fn guard_candidate(&self, country: &str, candidate: &str) -> Option<String> {
        self.verify_candidate(country, candidate).await.map(|v| v.url)
    }

    /// Best official link for a topic; falls back to the country's anchor and
    /// never fails the caller.
    pub async fn guard_topic(&self, country: &str, candidate: Option<&str>) -> GuardDecision {
        if let Some(candidate) = candidate {
            if let Some(v) = self.verify_candidate(country, candidate).await {
                return GuardDecision {
                    url: v.url,
                    verified: true,
                    title: v.title,
                };
            }
        }

        let fallback = self.registry.fallback(country);
        if let Some(anchor) = fallback.and_then(normalize_url) {
            let result = self.probe.probe(&anchor).await;
            return match self.resolve(country, &anchor, &result) {
                Some(url) => GuardDecision {
                    url,
                    verified: true,
                    title: result.page_title,
                },
                None => {
                    debug!(country, anchor = %anchor, "fallback anchor not verified");
                    GuardDecision {
                        url: anchor,
                        verified: false,
                        title: None,
                    }
                }
            };
        }

        warn!(country, "no usable fallback anchor, returning degraded decision");
        let url = match fallback {
            Some(raw) => raw.to_string(),
            None => candidate
                .and_then(normalize_url)
                .filter(|n| self.host_allowed(country, n))
                .unwrap_or_default(),
        };
        GuardDecision {
            url,
            verified: false,
            title: None,
        }
    }

    async fn verify_candidate(&self, country: &str, candidate: &str) -> Option<Verified> {
        let Some(normalized) = normalize_url(candidate) else {
            debug!(country, candidate, "candidate rejected: not a valid url");
            return None;
        };
        if !self.host_allowed(country, &normalized) {
            debug!(country, url = %normalized, "candidate rejected: host not allowlisted");
            return None;
        }
        let result = self.probe.probe(&normalized).await;
        let url = self.resolve(country, &normalized, &result)?;
        debug!(country, url = %url, "candidate verified");
        Some(Verified {
            url,
            title: result.page_title,
        })
    }

    /// Final url of a live probe, provided it is still on an allowed host.
    fn resolve(
        &self,
        country: &str,
        requested: &str,
        result: &ValidationResult,
    ) -> Option<String> {
        if !result.reachable {
            debug!(country, url = requested, "probe reported unreachable");
            return None;
        }
        let final_url = result
            .final_url
            .as_deref()
            .and_then(normalize_url)
            .unwrap_or_else(|| requested.to_string());
        if !self.host_allowed(country, &final_url) {
            debug!(
                country,
                url = requested,
                final_url = %final_url,
                "redirect left the allowlist"
            );
            return None;
        }
        Some(final_url)
    }

    fn host_allowed(&self, country: &str, url: &str) -> bool {
        host_of(url).is_some_and(|h| self.registry.is_allowed(country, &h))
    }
}

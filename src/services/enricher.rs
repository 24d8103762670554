//! Checklist-wide link sanitization and enrichment.
//!
//! Every item of every category is processed concurrently; output keeps the
//! input order. Probes are bounded by a [`HostLimiter`] created per call.

use crate::domain::constants::{DEFAULT_MAX_CONCURRENCY, DEFAULT_PER_HOST_LIMIT};
use crate::domain::models::{Checklist, ChecklistItem};
use crate::services::guard::LinkGuard;
use crate::services::limiter::HostLimiter;
use crate::services::policy::{host_of, normalize_url};
use crate::services::probe::Probe;
use crate::services::rules::match_item;
use futures::future::join_all;
use std::future::Future;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichOptions {
    pub max_concurrency: usize,
    pub per_host_limit: usize,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            per_host_limit: DEFAULT_PER_HOST_LIMIT,
        }
    }
}

pub struct ChecklistEnricher<'g, P> {
    guard: &'g LinkGuard<P>,
    options: EnrichOptions,
}

impl<'g, P: Probe> ChecklistEnricher<'g, P> {
    pub fn new(guard: &'g LinkGuard<P>, options: EnrichOptions) -> Self {
        Self { guard, options }
    }

    /// Re-validates every link already present; failures are removed.
    pub async fn sanitize(&self, country: &str, checklist: &Checklist) -> Checklist {
        let limiter = self.limiter();
        rebuild(checklist, |item| self.sanitize_item(country, &limiter, item)).await
    }

    /// Attaches rule-derived official links to items that have none.
    pub async fn enrich(&self, country: &str, checklist: &Checklist) -> Checklist {
        let limiter = self.limiter();
        rebuild(checklist, |item| self.enrich_item(country, &limiter, item)).await
    }

    /// Sanitize, then enrich what is left without a link.
    pub async fn process(&self, country: &str, checklist: &Checklist) -> Checklist {
        let sanitized = self.sanitize(country, checklist).await;
        self.enrich(country, &sanitized).await
    }

    fn limiter(&self) -> HostLimiter {
        HostLimiter::new(self.options.max_concurrency, self.options.per_host_limit)
    }

    async fn sanitize_item(
        &self,
        country: &str,
        limiter: &HostLimiter,
        item: &ChecklistItem,
    ) -> ChecklistItem {
        let Some(link) = item.present_link() else {
            return if item.link.is_some() {
                item.without_link()
            } else {
                item.clone()
            };
        };

        match self.guarded(country, limiter, link).await {
            Some(url) => item.with_link(url, item.cta_label.clone()),
            None => {
                debug!(country, item = %item.id, link, "link removed");
                item.without_link()
            }
        }
    }

    async fn enrich_item(
        &self,
        country: &str,
        limiter: &HostLimiter,
        item: &ChecklistItem,
    ) -> ChecklistItem {
        if item.present_link().is_some() {
            return item.clone();
        }
        let Some(rule) = match_item(self.guard.registry(), country, item) else {
            return item.clone();
        };

        match self.guarded(country, limiter, &rule.url).await {
            Some(url) => {
                debug!(country, item = %item.id, url = %url, "link attached");
                item.with_link(url, rule.label.clone())
            }
            None => {
                debug!(
                    country,
                    item = %item.id,
                    rule_url = %rule.url,
                    "rule matched but link not verified"
                );
                item.clone()
            }
        }
    }

    async fn guarded(
        &self,
        country: &str,
        limiter: &HostLimiter,
        candidate: &str,
    ) -> Option<String> {
        match normalize_url(candidate).and_then(|n| host_of(&n)) {
            Some(host) => {
                let _permit = limiter.acquire(&host).await;
                self.guard.guard_candidate(country, candidate).await
            }
            None => None,
        }
    }
}

async fn rebuild<'a, F, Fut>(checklist: &'a Checklist, per_item: F) -> Checklist
where
    F: Fn(&'a ChecklistItem) -> Fut,
    Fut: Future<Output = ChecklistItem>,
{
    let per_item = &per_item;
    let categories = join_all(checklist.categories.iter().map(|category| async move {
        let items = join_all(category.items.iter().map(per_item)).await;
        category.with_items(items)
    }))
    .await;
    checklist.with_categories(categories)
}

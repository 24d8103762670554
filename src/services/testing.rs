use crate::domain::models::ValidationResult;
use crate::services::probe::Probe;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Canned probe results keyed by url; unknown urls are unreachable.
#[derive(Default)]
pub(crate) struct StubProbe {
    responses: HashMap<String, ValidationResult>,
    calls: Mutex<Vec<String>>,
    delay: Option<Duration>,
    url_delays: HashMap<String, Duration>,
    finished: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StubProbe {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn live(mut self, url: &str, final_url: &str, title: Option<&str>) -> Self {
        self.responses.insert(
            url.to_string(),
            ValidationResult::reachable(final_url, title.map(str::to_string)),
        );
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Delay for one url only; overrides [`StubProbe::with_delay`].
    pub(crate) fn with_url_delay(mut self, url: &str, delay: Duration) -> Self {
        self.url_delays.insert(url.to_string(), delay);
        self
    }

    /// Urls in the order their probes completed.
    pub(crate) fn finished(&self) -> Vec<String> {
        self.finished.lock().map(|f| f.clone()).unwrap_or_default()
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Probe for StubProbe {
    async fn probe(&self, url: &str) -> ValidationResult {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(url.to_string());
        }
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.url_delays.get(url).copied().or(self.delay) {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if let Ok(mut finished) = self.finished.lock() {
            finished.push(url.to_string());
        }
        self.responses.get(url).cloned().unwrap_or_default()
    }
}

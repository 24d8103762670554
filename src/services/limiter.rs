use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{OwnedSemaphorePermit, Semaphore, SemaphorePermit};

/// Caps probes in flight for one checklist, globally and per destination host.
#[derive(Debug)]
pub struct HostLimiter {
    global: Semaphore,
    per_host_limit: usize,
    hosts: Mutex<HashMap<String, Arc<Semaphore>>>,
}

/// Held for the duration of one guarded probe.
#[derive(Debug)]
pub struct HostPermit<'a> {
    _host: Option<OwnedSemaphorePermit>,
    _global: Option<SemaphorePermit<'a>>,
}

impl HostLimiter {
    pub fn new(max_concurrency: usize, per_host_limit: usize) -> Self {
        Self {
            global: Semaphore::new(max_concurrency.max(1)),
            per_host_limit: per_host_limit.max(1),
            hosts: Mutex::new(HashMap::new()),
        }
    }

    fn host_semaphore(&self, host: &str) -> Arc<Semaphore> {
        let mut hosts = self.hosts.lock().unwrap_or_else(PoisonError::into_inner);
        hosts
            .entry(host.to_string())
            .or_insert_with(|| Arc::new(Semaphore::new(self.per_host_limit)))
            .clone()
    }

    /// Host slot first so a busy host does not sit on global slots.
    pub async fn acquire(&self, host: &str) -> HostPermit<'_> {
        let host_permit = self.host_semaphore(host).acquire_owned().await.ok();
        let global_permit = self.global.acquire().await.ok();
        HostPermit {
            _host: host_permit,
            _global: global_permit,
        }
    }

    pub fn available_global(&self) -> usize {
        self.global.available_permits()
    }
}

use crate::config::CrawlerConfig;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::Instant;

/// Per-host politeness limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleConfig {
    /// Maximum concurrent requests to one host
    pub parallelism: usize,

    /// Minimum time between the starts of two requests to one host
    pub delay: Duration,

    /// Maximum number of requests per host, `None` for unlimited
    pub max_requests: Option<u32>,
}

impl From<&CrawlerConfig> for ThrottleConfig {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            parallelism: config.per_host_parallelism.max(1) as usize,
            delay: Duration::from_millis(config.per_host_delay_ms),
            max_requests: (config.max_host_requests > 0).then_some(config.max_host_requests),
        }
    }
}

/// Tracks the pacing state of a host during crawling
#[derive(Debug, Clone, Default)]
pub struct DomainState {
    /// Number of requests admitted to this host
    pub request_count: u32,

    /// Start time of the most recently admitted request
    pub last_request_time: Option<Instant>,
}

impl DomainState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if this host has used up its request budget
    pub fn has_exceeded_limit(&self, config: &ThrottleConfig) -> bool {
        config
            .max_requests
            .is_some_and(|max| self.request_count >= max)
    }

    /// Calculates the time until the next request can start
    ///
    /// Returns None if a request can start now.
    pub fn time_until_next_request(&self, config: &ThrottleConfig, now: Instant) -> Option<Duration> {
        let last = self.last_request_time?;
        let ready_at = last + config.delay;
        (ready_at > now).then(|| ready_at - now)
    }

    /// Records a request to this host starting at `now`
    pub fn record_request(&mut self, now: Instant) {
        self.request_count += 1;
        self.last_request_time = Some(now);
    }
}

/// A host slot: the parallelism gate plus pacing state
struct HostSlot {
    permits: Arc<Semaphore>,
    state: DomainState,
}

/// Permission to send one request to a host
///
/// Dropping it frees the host's parallelism slot.
#[derive(Debug)]
pub struct HostPermit {
    _permit: OwnedSemaphorePermit,
}

/// Whether a request to a host may start right now
#[derive(Debug)]
pub enum Admission {
    /// Send the request now; hold the permit until it finishes
    Ready(HostPermit),

    /// The host is still in its delay until the given instant
    Paced(Instant),

    /// Every parallelism slot of the host is taken by an in-flight request
    Busy,

    /// The host has reached its request cap; skip the URL
    Capped,
}

/// Per-host throttling shared by all workers
///
/// Admission never waits: a host that is not ready is reported as such, and
/// the caller keeps the URL queued while other hosts proceed. A host never
/// sees more than `parallelism` requests at once, and request starts are
/// spaced at least `delay` apart. Nothing else depends on it.
pub struct HostThrottle {
    config: ThrottleConfig,
    hosts: Mutex<HashMap<String, HostSlot>>,
}

impl HostThrottle {
    pub fn new(config: ThrottleConfig) -> Self {
        Self {
            config,
            hosts: Mutex::new(HashMap::new()),
        }
    }

    /// Tries to admit one request to `host`
    ///
    /// The cap is checked first, then pacing, then parallelism. A request is
    /// only counted against the host when it is admitted.
    pub fn try_acquire(&self, host: &str) -> Admission {
        let mut hosts = self.hosts.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = hosts
            .entry(host.to_string())
            .or_insert_with(|| HostSlot {
                permits: Arc::new(Semaphore::new(self.config.parallelism)),
                state: DomainState::new(),
            });

        if slot.state.has_exceeded_limit(&self.config) {
            return Admission::Capped;
        }

        let now = Instant::now();
        if let Some(wait) = slot.state.time_until_next_request(&self.config, now) {
            return Admission::Paced(now + wait);
        }

        let Ok(permit) = Arc::clone(&slot.permits).try_acquire_owned() else {
            return Admission::Busy;
        };
        slot.state.record_request(now);

        Admission::Ready(HostPermit { _permit: permit })
    }

    /// Returns a copy of a host's pacing state
    pub fn domain_state(&self, host: &str) -> Option<DomainState> {
        let hosts = self.hosts.lock().unwrap_or_else(PoisonError::into_inner);
        hosts.get(host).map(|slot| slot.state.clone())
    }

    /// Number of hosts that have been contacted
    pub fn host_count(&self) -> usize {
        self.hosts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

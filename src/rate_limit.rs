//! Fixed-window rate limiting
//!
//! Counts requests per client address in contiguous, non-overlapping windows
//! of fixed length. The first request of a window opens it; once the window
//! has elapsed the next request starts a fresh one with a count of 1.
//!
//! State lives in process memory only and is lost on restart. It is not
//! shared between processes.
//!
//! # Example
//!
//! ```
//! use std::net::{IpAddr, Ipv4Addr};
//! use std::time::{Duration, Instant};
//! use wme_site_server::rate_limit::{RateLimitConfig, RateLimiter};
//!
//! let limiter = RateLimiter::new(RateLimitConfig::new(Duration::from_secs(60), 2));
//! let client = IpAddr::V4(Ipv4Addr::LOCALHOST);
//! let now = Instant::now();
//!
//! assert!(limiter.admit(client, now));
//! assert!(limiter.admit(client, now));
//! assert!(!limiter.admit(client, now));
//! assert!(limiter.admit(client, now + Duration::from_secs(60)));
//! ```

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::config::RateLimitSettings;

/// Source of the current time for window bookkeeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Monotonic system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Window length and per-window allowance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: u32,
}

impl RateLimitConfig {
    pub const fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
        }
    }

    pub const fn from_settings(settings: &RateLimitSettings) -> Self {
        Self::new(settings.window(), settings.max_requests)
    }
}

impl Default for RateLimitConfig {
    /// Three requests per fifteen minutes.
    fn default() -> Self {
        Self::new(Duration::from_secs(15 * 60), 3)
    }
}

/// Outcome of a single rate limit check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub admitted: bool,
    /// Configured allowance per window
    pub limit: u32,
    /// Requests still admitted in the current window
    pub remaining: u32,
}

/// Counter for one client within its current window.
#[derive(Debug, Clone, Copy)]
struct WindowState {
    count: u32,
    window_start: Instant,
}

#[derive(Debug)]
struct LimiterState {
    windows: HashMap<IpAddr, WindowState>,
    last_sweep: Instant,
}

/// Per-client fixed-window limiter.
///
/// Decisions go through [`RateLimiter::admit`], which takes the request time
/// explicitly, or [`RateLimiter::check`], which reads the injected [`Clock`].
pub struct RateLimiter {
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
    state: Mutex<LimiterState>,
}

impl RateLimiter {
    /// Creates a limiter backed by the system clock.
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        let last_sweep = clock.now();
        Self {
            config,
            clock,
            state: Mutex::new(LimiterState {
                windows: HashMap::new(),
                last_sweep,
            }),
        }
    }

    pub const fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Decides whether a request from `key` arriving at `now` is admitted.
    pub fn admit(&self, key: IpAddr, now: Instant) -> bool {
        self.decide(key, now).admitted
    }

    /// Same decision as [`RateLimiter::admit`], timed by the injected clock.
    pub fn check(&self, key: IpAddr) -> RateLimitDecision {
        self.decide(key, self.clock.now())
    }

    /// Number of clients currently holding a window.
    pub fn tracked_clients(&self) -> usize {
        self.lock().windows.len()
    }

    fn decide(&self, key: IpAddr, now: Instant) -> RateLimitDecision {
        let window = self.config.window;
        let mut state = self.lock();

        // Drop elapsed windows at most once per window length
        if now.saturating_duration_since(state.last_sweep) >= window {
            state
                .windows
                .retain(|_, w| now.saturating_duration_since(w.window_start) < window);
            state.last_sweep = now;
        }

        let fresh = WindowState {
            count: 1,
            window_start: now,
        };
        let count = match state.windows.entry(key) {
            Entry::Vacant(slot) => slot.insert(fresh).count,
            Entry::Occupied(mut slot) => {
                let current = slot.get_mut();
                if now.saturating_duration_since(current.window_start) >= window {
                    *current = fresh;
                } else {
                    current.count = current.count.saturating_add(1);
                }
                current.count
            }
        };

        RateLimitDecision {
            admitted: count <= self.config.max_requests,
            limit: self.config.max_requests,
            remaining: self.config.max_requests.saturating_sub(count),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LimiterState> {
        // The map stays consistent even if a holder panicked
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clock advanced by hand.
#[cfg(test)]
pub(crate) struct ManualClock {
    now: Mutex<Instant>,
}

#[cfg(test)]
impl ManualClock {
    pub(crate) fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub(crate) fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap()
    }
}

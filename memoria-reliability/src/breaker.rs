//! `CircuitBreaker` — per-dependency `closed → open → half_open → closed|open`
//! state machine (§4.9). One instance guards one external dependency
//! (embedder, reranker, summarizer, vector index, lexical index); state is
//! process-local, never shared across dependencies.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use memoria_core::config::CircuitBreakerConfig;
use memoria_core::errors::{CortexError, CortexResult};

/// Observable breaker state (§4.9: "the breaker state is observable").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

struct Inner {
    state: BreakerState,
    consecutive_failures: u32,
    consecutive_successes: u32,
    opened_at: Option<Instant>,
    half_open_inflight: u32,
}

/// A reservation against the breaker's half-open admission budget. Must be
/// resolved with [`Permit::success`] or [`Permit::failure`]; dropping it
/// unresolved counts as a failure, since an abandoned call (e.g. a panic
/// unwind) is not evidence the dependency is healthy.
pub struct Permit<'a> {
    breaker: &'a CircuitBreaker,
    resolved: bool,
}

impl<'a> Permit<'a> {
    pub fn success(mut self) {
        self.breaker.on_success();
        self.resolved = true;
    }

    pub fn failure(mut self) {
        self.breaker.on_failure();
        self.resolved = true;
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        if !self.resolved {
            self.breaker.on_failure();
        }
    }
}

pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            inner: Mutex::new(Inner {
                state: BreakerState::Closed,
                consecutive_failures: 0,
                consecutive_successes: 0,
                opened_at: None,
                half_open_inflight: 0,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> BreakerState {
        let mut inner = self.inner.lock().unwrap();
        self.maybe_transition_to_half_open(&mut inner);
        inner.state
    }

    pub fn is_closed(&self) -> bool {
        self.state() == BreakerState::Closed
    }

    /// Reserve a call slot, or reject immediately if the breaker is open (or
    /// half-open at its concurrency cap).
    pub fn try_acquire(&self) -> CortexResult<Permit<'_>> {
        let mut inner = self.inner.lock().unwrap();
        self.maybe_transition_to_half_open(&mut inner);

        match inner.state {
            BreakerState::Closed => Ok(Permit {
                breaker: self,
                resolved: false,
            }),
            BreakerState::Open => Err(CortexError::Unavailable(format!(
                "{}: breaker open",
                self.name
            ))),
            BreakerState::HalfOpen => {
                if inner.half_open_inflight < self.config.half_open_max_concurrency {
                    inner.half_open_inflight += 1;
                    Ok(Permit {
                        breaker: self,
                        resolved: false,
                    })
                } else {
                    Err(CortexError::Unavailable(format!(
                        "{}: breaker half-open, probe budget exhausted",
                        self.name
                    )))
                }
            }
        }
    }

    /// Run `f` under the breaker's protection, recording the outcome.
    /// Returns `Unavailable` immediately without calling `f` if the breaker
    /// will not admit the call.
    pub fn call<T>(&self, f: impl FnOnce() -> CortexResult<T>) -> CortexResult<T> {
        let permit = self.try_acquire()?;
        match f() {
            Ok(v) => {
                permit.success();
                Ok(v)
            }
            Err(e) => {
                permit.failure();
                Err(e)
            }
        }
    }

    fn maybe_transition_to_half_open(&self, inner: &mut Inner) {
        if inner.state == BreakerState::Open {
            let open_duration = Duration::from_secs(self.config.open_duration_secs);
            if inner.opened_at.map(|t| t.elapsed() >= open_duration).unwrap_or(false) {
                debug!(breaker = %self.name, "transitioning open -> half_open");
                inner.state = BreakerState::HalfOpen;
                inner.consecutive_successes = 0;
                inner.half_open_inflight = 0;
            }
        }
    }

    fn on_success(&self) {
        let mut inner = self.inner.lock().unwrap();
        match inner.state {
            BreakerState::Closed => {
                inner.consecutive_failures = 0;
            }
            BreakerState::HalfOpen => {
                inner.half_open_inflight = inner.half_open_inflight.saturating_sub(1);
                inner.consecutive_successes += 1;
                if inner.consecutive_successes >= self.config.success_threshold {
                    debug!(breaker = %self.name, "transitioning half_open -> closed");
                    inner.state = BreakerState::Closed;
                    inner.consecutive_failures = 0;
                    inner.consecutive_successes = 0;
                    inner.opened_at = None;
                }
            }
            BreakerState::Open => {}
        }
    }

    fn on_failure(&self) {
        let mut inner = self.inner.lock().unwrap();
        match inner.state {
            BreakerState::Closed => {
                inner.consecutive_failures += 1;
                if inner.consecutive_failures >= self.config.failure_threshold {
                    warn!(breaker = %self.name, "transitioning closed -> open");
                    inner.state = BreakerState::Open;
                    inner.opened_at = Some(Instant::now());
                }
            }
            BreakerState::HalfOpen => {
                inner.half_open_inflight = inner.half_open_inflight.saturating_sub(1);
                warn!(breaker = %self.name, "transitioning half_open -> open");
                inner.state = BreakerState::Open;
                inner.opened_at = Some(Instant::now());
                inner.consecutive_successes = 0;
            }
            BreakerState::Open => {}
        }
    }
}

//! Bounded polling
//!
//! [`Waiter`] is the single polling primitive every wait-aware action is
//! built on: check, sleep one interval, check again, until the check yields a
//! value or the deadline passes.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

use crate::Result;

/// Default timeout for wait operations (20 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default polling interval (500ms)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Polling interval of presence-only waits
pub const PRESENCE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Polling interval of value waits
pub const VALUE_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Wait policy shared by all operations of one actions instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Default timeout
    pub timeout: Duration,
    /// Default polling interval
    pub poll_interval: Duration,
    /// Polling interval of `wait_for_present`
    pub presence_poll_interval: Duration,
    /// Polling interval of `wait_for_has_value`
    pub value_poll_interval: Duration,
    /// How many times a sticky field is re-cleared before typing anyway
    pub clear_attempts: u32,
    /// Pause between clear attempts
    pub clear_retry_delay: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            presence_poll_interval: PRESENCE_POLL_INTERVAL,
            value_poll_interval: VALUE_POLL_INTERVAL,
            clear_attempts: 5,
            clear_retry_delay: Duration::from_millis(200),
        }
    }
}

impl WaitPolicy {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Resolve a per-call timeout override
    pub fn timeout_or(&self, timeout: Option<Duration>) -> Duration {
        timeout.unwrap_or(self.timeout)
    }

    /// Waiter with the default interval and the given (or default) timeout
    pub fn waiter(&self, timeout: Option<Duration>) -> Waiter {
        Waiter::new(self.timeout_or(timeout), self.poll_interval)
    }
}

/// Deadline-bounded poller
#[derive(Debug, Clone, Copy)]
pub struct Waiter {
    timeout: Duration,
    interval: Duration,
}

impl Waiter {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }

    /// Replace the polling interval
    pub fn every(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Poll until `check` yields `Some`.
    ///
    /// Returns `Ok(None)` once the deadline passes. The check always runs at
    /// least once, and the last sleep is cut short at the deadline, so the
    /// call returns within `timeout` plus one check. A timeout too large to
    /// represent as an instant never expires.
    pub async fn until<T, F, Fut>(&self, mut check: F) -> Result<Option<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        let deadline = Instant::now().checked_add(self.timeout);

        loop {
            if let Some(value) = check().await? {
                return Ok(Some(value));
            }

            let pause = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Ok(None);
                    }
                    self.interval.min(deadline - now)
                }
                None => self.interval,
            };
            tokio::time::sleep(pause).await;
        }
    }

    /// Poll until `check` yields `None`; `true` if that happened in time
    pub async fn until_not<T, F, Fut>(&self, mut check: F) -> Result<bool>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        let released = self
            .until(|| {
                let pending = check();
                async move { Ok::<_, crate::Error>(pending.await?.is_none().then_some(())) }
            })
            .await?;
        Ok(released.is_some())
    }
}

//! Bounded polling with a fixed interval.
//!
//! Funding an address is eventually consistent: the faucet acknowledges the
//! request long before the coin is visible to queries. [`poll_until`] repeats
//! a query a fixed number of times, sleeping a fixed interval between
//! attempts, until a predicate accepts the result.
//!
//! # Example
//!
//! ```rust
//! use mys_sponsor::retry::{poll_until, PollConfig, Polled};
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> mys_sponsor::SponsorResult<()> {
//! let config = PollConfig::builder()
//!     .max_attempts(3)
//!     .interval(Duration::from_millis(1))
//!     .build();
//!
//! let polled = poll_until(
//!     &config,
//!     || async { Ok::<_, mys_sponsor::SponsorError>(vec![1u8]) },
//!     |items: &Vec<u8>| !items.is_empty(),
//!     |err| err.is_retryable(),
//! )
//! .await?;
//! assert!(matches!(polled, Polled::Ready { attempts: 1, .. }));
//! # Ok(())
//! # }
//! ```

use crate::error::{SponsorError, SponsorResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, trace};

/// Configuration for a bounded poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Maximum number of attempts, including the first one.
    pub max_attempts: u32,
    /// Fixed delay between consecutive attempts.
    pub interval: Duration,
    /// Optional wall-clock bound. When set, polling also stops once this much
    /// time has passed since the first attempt.
    pub deadline: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::sponsor_default()
    }
}

impl PollConfig {
    /// Creates a new builder for PollConfig.
    pub fn builder() -> PollConfigBuilder {
        PollConfigBuilder::default()
    }

    /// The budget used while waiting for a freshly funded sponsor:
    /// 50 attempts, 200 ms apart, no deadline.
    pub fn sponsor_default() -> Self {
        Self {
            max_attempts: 50,
            interval: Duration::from_millis(200),
            deadline: None,
        }
    }

    /// A single attempt with no waiting.
    pub fn once() -> Self {
        Self {
            max_attempts: 1,
            interval: Duration::ZERO,
            deadline: None,
        }
    }

    /// Upper bound on the time spent sleeping when every attempt is rejected.
    pub fn max_wait(&self) -> Duration {
        let sleeps = self.interval * self.max_attempts.saturating_sub(1);
        match self.deadline {
            Some(deadline) => sleeps.min(deadline),
            None => sleeps,
        }
    }

    fn deadline_passed(&self, start: Instant) -> bool {
        self.deadline
            .is_some_and(|deadline| start.elapsed() >= deadline)
    }

    /// The interval, cut short so a sleep never runs past the deadline.
    fn next_wait(&self, start: Instant) -> Duration {
        match self.deadline {
            Some(deadline) => self
                .interval
                .min(deadline.saturating_sub(start.elapsed())),
            None => self.interval,
        }
    }
}

/// Builder for PollConfig.
#[derive(Debug, Clone, Default)]
pub struct PollConfigBuilder {
    max_attempts: Option<u32>,
    interval: Option<Duration>,
    deadline: Option<Duration>,
}

impl PollConfigBuilder {
    /// Sets the maximum number of attempts.
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Sets the delay between attempts.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Sets the delay between attempts in milliseconds.
    pub fn interval_ms(self, interval_ms: u64) -> Self {
        self.interval(Duration::from_millis(interval_ms))
    }

    /// Adds a wall-clock deadline on top of the attempt count.
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Builds the PollConfig.
    pub fn build(self) -> PollConfig {
        let default = PollConfig::sponsor_default();
        PollConfig {
            max_attempts: self.max_attempts.unwrap_or(default.max_attempts),
            interval: self.interval.unwrap_or(default.interval),
            deadline: self.deadline.or(default.deadline),
        }
    }
}

/// The result of a bounded poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Polled<T> {
    /// An attempt produced an accepted value.
    Ready {
        /// The accepted value.
        value: T,
        /// Attempts made, including the successful one.
        attempts: u32,
    },
    /// The budget ran out without an accepted value.
    Exhausted {
        /// Attempts made.
        attempts: u32,
        /// Time spent polling.
        elapsed: Duration,
    },
}

impl<T> Polled<T> {
    /// Returns the number of attempts made.
    pub fn attempts(&self) -> u32 {
        match self {
            Polled::Ready { attempts, .. } | Polled::Exhausted { attempts, .. } => *attempts,
        }
    }

    /// Returns the accepted value, if any.
    pub fn into_value(self) -> Option<T> {
        match self {
            Polled::Ready { value, .. } => Some(value),
            Polled::Exhausted { .. } => None,
        }
    }
}

/// Runs `operation` until `accept` returns true for its result or the budget
/// in `config` runs out.
///
/// Attempts are strictly sequential. After a rejected result, or an error for
/// which `should_retry` returns true, the poll sleeps `config.interval` and
/// tries again; it never sleeps after the final attempt. With a deadline set,
/// the sleep is cut short at the deadline and no attempt starts after it. An
/// error that `should_retry` rejects is returned immediately.
///
/// # Errors
///
/// Returns the first non-retryable error produced by `operation`.
pub async fn poll_until<F, Fut, T, A, R>(
    config: &PollConfig,
    mut operation: F,
    accept: A,
    should_retry: R,
) -> SponsorResult<Polled<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = SponsorResult<T>>,
    A: Fn(&T) -> bool,
    R: Fn(&SponsorError) -> bool,
{
    let start = Instant::now();
    let mut attempts = 0;

    while attempts < config.max_attempts {
        attempts += 1;

        match operation().await {
            Ok(value) if accept(&value) => return Ok(Polled::Ready { value, attempts }),
            Ok(_) => trace!(attempt = attempts, "Poll result not accepted"),
            Err(error) if should_retry(&error) => {
                debug!(attempt = attempts, error = %error, "Retryable error while polling");
            }
            Err(error) => return Err(error),
        }

        if attempts >= config.max_attempts || config.deadline_passed(start) {
            break;
        }
        let wait = config.next_wait(start);
        if !wait.is_zero() {
            sleep(wait).await;
        }
        if config.deadline_passed(start) {
            break;
        }
    }

    Ok(Polled::Exhausted {
        attempts,
        elapsed: start.elapsed(),
    })
}

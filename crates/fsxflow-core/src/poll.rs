//! Bounded polling for asynchronous provider-side operations
//!
//! Creating or deleting a file system returns immediately on the provider
//! side; the operation itself takes minutes. [`wait_until`] drives such an
//! operation to completion with a sleep-then-probe loop: one status query
//! per tick, one log line per tick, and two exit bounds (an optional
//! wall-clock timeout and a cap on consecutive probe failures) so the loop
//! cannot hang forever on a provider that never settles or a query that
//! never succeeds.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{Instant, sleep};

/// Default seconds between status probes.
const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Default cap on consecutive failed probes before the poll aborts.
const DEFAULT_MAX_PROBE_FAILURES: u32 = 5;

/// Poll loop tuning.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Fixed delay between probes. The delay also runs before the first
    /// probe; a freshly issued mutating call is never ready immediately.
    pub interval: Duration,

    /// Overall wall-clock bound. `None` polls until a terminal state, which
    /// matches how long-running create operations behave operationally.
    pub timeout: Option<Duration>,

    /// Consecutive probe errors tolerated before giving up. A successful
    /// probe (pending or complete) resets the count; there is no extra
    /// backoff, the next scheduled tick is the retry.
    pub max_probe_failures: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            timeout: None,
            max_probe_failures: DEFAULT_MAX_PROBE_FAILURES,
        }
    }
}

impl PollConfig {
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Outcome of a single status probe.
#[derive(Debug)]
pub enum Probe<T> {
    /// Not terminal yet; the label (typically the lifecycle state) goes
    /// into the per-tick log line.
    Pending(String),

    /// Terminal; the poll exits and yields the value.
    Complete(T),
}

/// Why a poll gave up.
#[derive(Debug, Error)]
pub enum PollError<E: std::error::Error> {
    #[error("no terminal state after {waited_secs}s, giving up")]
    Timeout { waited_secs: u64 },

    #[error("{failures} consecutive status probes failed, last error: {last}")]
    ProbeFailed { failures: u32, last: E },
}

/// Poll `tick` on a fixed interval until it reports [`Probe::Complete`].
///
/// Probe errors are logged and retried on the next tick; only
/// `max_probe_failures` consecutive errors, or the configured timeout,
/// abort the poll. Distinguishing "resource gone" from "query failed" is
/// the probe's job: a deletion probe reports the former as `Complete`, so a
/// genuine fault is never silently counted as success.
pub async fn wait_until<T, E, F, Fut>(config: &PollConfig, mut tick: F) -> Result<T, PollError<E>>
where
    E: std::error::Error,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Probe<T>, E>>,
{
    let started = Instant::now();
    let mut failures: u32 = 0;

    loop {
        if let Some(timeout) = config.timeout {
            if started.elapsed() >= timeout {
                return Err(PollError::Timeout {
                    waited_secs: started.elapsed().as_secs(),
                });
            }
        }

        sleep(config.interval).await;

        match tick().await {
            Ok(Probe::Complete(value)) => return Ok(value),
            Ok(Probe::Pending(state)) => {
                failures = 0;
                tracing::info!(
                    elapsed_secs = started.elapsed().as_secs(),
                    state = %state,
                    "still waiting"
                );
            }
            Err(err) => {
                failures += 1;
                if failures >= config.max_probe_failures {
                    return Err(PollError::ProbeFailed { failures, last: err });
                }
                tracing::warn!(
                    elapsed_secs = started.elapsed().as_secs(),
                    error = %err,
                    "status probe failed, retrying on next tick"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_config() -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(1),
            timeout: None,
            max_probe_failures: 3,
        }
    }

    #[tokio::test]
    async fn completes_on_terminal_probe() {
        let ticks = AtomicU32::new(0);
        let ticks_ref = &ticks;
        let result: Result<&str, PollError<io::Error>> =
            wait_until(&fast_config(), move || async move {
                if ticks_ref.fetch_add(1, Ordering::SeqCst) < 2 {
                    Ok(Probe::Pending("CREATING".to_string()))
                } else {
                    Ok(Probe::Complete("AVAILABLE"))
                }
            })
            .await;

        assert_eq!(result.unwrap(), "AVAILABLE");
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn times_out_when_never_terminal() {
        let config = PollConfig {
            interval: Duration::from_millis(1),
            timeout: Some(Duration::from_millis(20)),
            max_probe_failures: 3,
        };

        let result: Result<(), PollError<io::Error>> = wait_until(&config, || async {
            Ok(Probe::Pending("CREATING".to_string()))
        })
        .await;

        assert!(matches!(result, Err(PollError::Timeout { .. })));
    }

    #[tokio::test]
    async fn aborts_after_consecutive_probe_failures() {
        let ticks = AtomicU32::new(0);
        let ticks_ref = &ticks;
        let result: Result<(), PollError<io::Error>> =
            wait_until(&fast_config(), move || async move {
                ticks_ref.fetch_add(1, Ordering::SeqCst);
                Err(io::Error::other("describe blew up"))
            })
            .await;

        match result {
            Err(PollError::ProbeFailed { failures, .. }) => assert_eq!(failures, 3),
            other => panic!("expected ProbeFailed, got {other:?}"),
        }
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn successful_tick_resets_failure_count() {
        let ticks = AtomicU32::new(0);
        let ticks_ref = &ticks;
        let result: Result<&str, PollError<io::Error>> =
            wait_until(&fast_config(), move || async move {
                match ticks_ref.fetch_add(1, Ordering::SeqCst) {
                    // two failures, a pending tick, two more failures
                    0 | 1 | 3 | 4 => Err(io::Error::other("transient")),
                    2 => Ok(Probe::Pending("DELETING".to_string())),
                    _ => Ok(Probe::Complete("gone")),
                }
            })
            .await;

        assert_eq!(result.unwrap(), "gone");
        assert_eq!(ticks.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn deletion_style_probe_completes_on_absence() {
        // Absence is reported by the probe as Complete, not inferred from a
        // query error.
        let listed = AtomicU32::new(2);
        let listed_ref = &listed;
        let result: Result<(), PollError<io::Error>> =
            wait_until(&fast_config(), move || async move {
                if listed_ref.fetch_sub(1, Ordering::SeqCst) > 1 {
                    Ok(Probe::Pending("DELETING".to_string()))
                } else {
                    Ok(Probe::Complete(()))
                }
            })
            .await;

        assert!(result.is_ok());
    }
}

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{system} unavailable after {attempts} attempts: {reason}")]
    Unavailable {
        system: &'static str,
        attempts: u32,
        reason: String,
    },
}

/// Bounds for one upstream call: a per-attempt timeout, a fixed backoff
/// between attempts, and a total attempt count.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub timeout: Duration,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            attempts: 3,
            timeout: Duration::from_secs(5),
            backoff: Duration::from_millis(500),
        }
    }
}

/// Runs `op` until it succeeds or the policy is exhausted. Every attempt is
/// timeout-bound so a stalled upstream cannot hang the caller.
pub async fn with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    system: &'static str,
    mut op: F,
) -> Result<T, UpstreamError>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let attempts = policy.attempts.max(1);
    let mut reason = String::new();

    for attempt in 1..=attempts {
        match tokio::time::timeout(policy.timeout, op()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(e)) => {
                reason = e.to_string();
                log::warn!("{system} attempt {attempt}/{attempts} failed: {reason}");
            }
            Err(_) => {
                reason = format!("timed out after {:?}", policy.timeout);
                log::warn!("{system} attempt {attempt}/{attempts} {reason}");
            }
        }
        if attempt < attempts {
            tokio::time::sleep(policy.backoff).await;
        }
    }

    Err(UpstreamError::Unavailable {
        system,
        attempts,
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            attempts: 3,
            timeout: Duration::from_millis(50),
            backoff: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&fast_policy(), "test store", || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err("transient")
            } else {
                Ok(7)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausted_attempts_surface_as_unavailable() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(&fast_policy(), "test store", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>("down")
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(
            result,
            Err(UpstreamError::Unavailable { attempts: 3, .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_calls_are_cut_off_by_the_timeout() {
        let result: Result<(), _> = with_retry(&fast_policy(), "test store", || async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok::<(), &str>(())
        })
        .await;
        let err = result.unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }
}

//! Job Poller
//!
//! Drives a submitted provider job to a terminal state under a bounded time
//! budget: fixed interval between status checks, hard attempt ceiling.
//! Provider jobs are short-lived, so a fixed interval suffices; no backoff.
//! A non-OK transport response aborts the loop immediately. Once started,
//! the loop runs to one of its three exits; there is no cancellation
//! primitive.
//!
//! The loop is generic over the status-fetching operation so the state
//! machine can be exercised without a network.

use std::future::Future;
use std::time::Duration;

use serde_json::Value;

use crate::models::job::{GenerationJob, JobStatus};

/// Polling cadence and budget. Defaults mirror the provider's observed job
/// duration profile: 3 s × 60 attempts ≈ a 3 minute ceiling.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_attempts: 60,
        }
    }
}

/// One status observation from the provider.
#[derive(Debug, Clone)]
pub struct StatusSnapshot {
    /// `None` means the status string was unrecognized; the poller keeps
    /// waiting.
    pub status: Option<JobStatus>,
    pub error_detail: Option<String>,
    pub payload: Value,
}

impl StatusSnapshot {
    /// Build a snapshot from a raw status payload. The status lives under
    /// `status` or `state` depending on the endpoint version.
    pub fn from_payload(payload: Value) -> Self {
        let status = payload
            .get("status")
            .or_else(|| payload.get("state"))
            .and_then(Value::as_str)
            .and_then(JobStatus::from_provider);

        let error_detail = match payload.get("error") {
            Some(Value::String(message)) => Some(message.clone()),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        };

        Self {
            status,
            error_detail,
            payload,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("status check failed: {0}")]
    Transport(String),

    #[error("generation failed: {0}")]
    Failed(String),

    #[error("generation timed out after {attempts} attempts")]
    TimedOut { attempts: u32 },
}

/// Poll the job until it reaches a terminal state, returning the terminal
/// payload on success.
///
/// `fetch` is called once per attempt (1-based). Any fetch error is a hard
/// abort; transport failures are not retryable poll states. Status
/// transitions on `job` are driven here and nowhere else.
pub async fn poll_until_terminal<F, Fut, E>(
    job: &mut GenerationJob,
    policy: &PollPolicy,
    mut fetch: F,
) -> Result<Value, PollError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<StatusSnapshot, E>>,
    E: std::fmt::Display,
{
    for attempt in 1..=policy.max_attempts {
        tokio::time::sleep(policy.interval).await;

        let snapshot = fetch(attempt)
            .await
            .map_err(|e| PollError::Transport(e.to_string()))?;

        match snapshot.status {
            Some(JobStatus::Succeeded) => {
                job.status = JobStatus::Succeeded;
                return Ok(snapshot.payload);
            }
            Some(JobStatus::Failed) => {
                job.status = JobStatus::Failed;
                return Err(PollError::Failed(
                    snapshot
                        .error_detail
                        .unwrap_or_else(|| "unknown error".to_string()),
                ));
            }
            Some(running @ (JobStatus::Queued | JobStatus::Processing)) => {
                job.status = running;
                tracing::debug!(
                    prediction_id = %job.prediction_id,
                    attempt,
                    max_attempts = policy.max_attempts,
                    status = ?running,
                    "job still running"
                );
            }
            // Unrecognized (or echoed-terminal) statuses keep the loop
            // going; the ceiling bounds them.
            Some(_) | None => {
                tracing::debug!(
                    prediction_id = %job.prediction_id,
                    attempt,
                    "unrecognized provider status, continuing"
                );
            }
        }
    }

    job.status = JobStatus::TimedOut;
    Err(PollError::TimedOut {
        attempts: policy.max_attempts,
    })
}

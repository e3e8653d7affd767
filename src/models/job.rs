use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a provider-side generation job.
///
/// Transitions are driven exclusively by the job poller; `Succeeded`,
/// `Failed` and `TimedOut` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Processing,
    Succeeded,
    Failed,
    TimedOut,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Succeeded | JobStatus::Failed | JobStatus::TimedOut
        )
    }

    /// Classify a raw provider status string. The provider's vocabulary is
    /// not contractually fixed; unrecognized values return `None` and the
    /// poller keeps waiting.
    pub fn from_provider(raw: &str) -> Option<JobStatus> {
        match raw {
            "queued" | "in_queue" | "in-queue" | "starting" => Some(JobStatus::Queued),
            "processing" => Some(JobStatus::Processing),
            "succeeded" | "completed" | "success" => Some(JobStatus::Succeeded),
            "failed" | "error" => Some(JobStatus::Failed),
            _ => None,
        }
    }
}

/// A try-on job accepted by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationJob {
    pub prediction_id: String,
    pub submitted_at: DateTime<Utc>,
    pub status: JobStatus,
}

impl GenerationJob {
    pub fn new(prediction_id: String) -> Self {
        Self {
            prediction_id,
            submitted_at: Utc::now(),
            status: JobStatus::Queued,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_status_vocabulary() {
        assert_eq!(JobStatus::from_provider("starting"), Some(JobStatus::Queued));
        assert_eq!(JobStatus::from_provider("in_queue"), Some(JobStatus::Queued));
        assert_eq!(
            JobStatus::from_provider("processing"),
            Some(JobStatus::Processing)
        );
        assert_eq!(
            JobStatus::from_provider("completed"),
            Some(JobStatus::Succeeded)
        );
        assert_eq!(
            JobStatus::from_provider("succeeded"),
            Some(JobStatus::Succeeded)
        );
        assert_eq!(JobStatus::from_provider("error"), Some(JobStatus::Failed));
        assert_eq!(JobStatus::from_provider("warming_up"), None);
    }

    #[test]
    fn test_terminal_states() {
        assert!(JobStatus::Succeeded.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(JobStatus::TimedOut.is_terminal());
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
    }

    #[test]
    fn test_new_job_starts_queued() {
        let job = GenerationJob::new("pred-123".to_string());
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.prediction_id, "pred-123");
    }
}

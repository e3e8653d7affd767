//! Generation orchestration.
//!
//! The single-angle pipeline runs strictly sequentially: resolve the model
//! reference, probe it, submit the job, poll to a terminal state, normalize
//! the payload, persist inline results. Every failure is caught at the
//! boundary and converted to demo-mode fallback (the original garment
//! image), so the caller always has something to show; the outcome type
//! keeps the two cases distinguishable and absorbed errors are logged.
//!
//! The multi-angle coordinator fans the pipeline out across the fixed angle
//! set concurrently. One angle's failure never cancels the others; results
//! are keyed by angle and recorded in completion order.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinSet;

use crate::models::customization::{Angle, CustomizationRequest};
use crate::models::generation::{AngleBatch, GenerationResult, ImageRef, TryOnOutcome};
use crate::models::job::GenerationJob;
use crate::services::catalog::ModelCatalog;
use crate::services::normalize::{self, NormalizeError};
use crate::services::poller::{self, PollError, PollPolicy};
use crate::services::provider::{self, ProviderError, TryOnProvider};
use crate::services::storage::ImageStore;

/// Why a pipeline run could not produce a generated image.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("no model reference configured for this customization")]
    NoModelReference,

    #[error("provider credentials not configured")]
    NoCredentials,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Poll(#[from] PollError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

impl GenerateError {
    /// Expected, non-exceptional routes into demo mode.
    fn is_config_absence(&self) -> bool {
        matches!(
            self,
            GenerateError::NoModelReference | GenerateError::NoCredentials
        )
    }
}

pub struct Generator {
    catalog: ModelCatalog,
    provider: Option<Arc<dyn TryOnProvider>>,
    store: Option<Arc<ImageStore>>,
    http: reqwest::Client,
    poll_policy: PollPolicy,
    probe_timeout: Duration,
}

impl Generator {
    pub fn new(
        catalog: ModelCatalog,
        provider: Option<Arc<dyn TryOnProvider>>,
        store: Option<Arc<ImageStore>>,
        poll_policy: PollPolicy,
        probe_timeout: Duration,
    ) -> Self {
        Self {
            catalog,
            provider,
            store,
            http: reqwest::Client::new(),
            poll_policy,
            probe_timeout,
        }
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn demo_mode(&self) -> bool {
        self.provider.is_none()
    }

    /// Orchestration boundary: never fails. Any pipeline error becomes a
    /// fallback outcome carrying the original garment image.
    pub async fn generate(
        &self,
        garment: &ImageRef,
        request: &CustomizationRequest,
    ) -> TryOnOutcome {
        let started = std::time::Instant::now();
        metrics::counter!("tryon_jobs_total").increment(1);

        match self.run_pipeline(garment, request).await {
            Ok(image) => {
                metrics::histogram!("tryon_generation_seconds")
                    .record(started.elapsed().as_secs_f64());
                tracing::info!(
                    angle = %request.angle,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "try-on generated"
                );
                TryOnOutcome::Generated(image)
            }
            Err(err) => {
                metrics::counter!("tryon_fallback_total").increment(1);
                if err.is_config_absence() {
                    tracing::info!(
                        angle = %request.angle,
                        reason = %err,
                        "demo mode, returning garment image"
                    );
                } else {
                    tracing::warn!(
                        angle = %request.angle,
                        error = %err,
                        "generation failed, falling back to garment image"
                    );
                }
                TryOnOutcome::Fallback {
                    image: garment.clone(),
                    reason: err.to_string(),
                }
            }
        }
    }

    /// The sequential pipeline. Errors propagate; `generate` converts them
    /// at the boundary.
    pub async fn run_pipeline(
        &self,
        garment: &ImageRef,
        request: &CustomizationRequest,
    ) -> Result<ImageRef, GenerateError> {
        let reference = self
            .catalog
            .resolve(
                &request.pose,
                &request.skin_tone,
                &request.body_type,
                request.angle,
            )
            .ok_or(GenerateError::NoModelReference)?;

        let provider = self
            .provider
            .as_ref()
            .ok_or(GenerateError::NoCredentials)?;

        // Diagnostics only; the provider reports its own errors
        // authoritatively.
        let probe = provider::probe_reference(&self.http, &reference, self.probe_timeout).await;
        if !probe.accessible {
            tracing::warn!(
                url = %reference,
                status = ?probe.status,
                error = ?probe.error,
                "reference image probe failed, submitting anyway"
            );
        }

        let prediction_id = provider.submit(&reference, garment).await?;
        let mut job = GenerationJob::new(prediction_id);
        tracing::info!(
            prediction_id = %job.prediction_id,
            angle = %request.angle,
            "try-on job submitted"
        );

        let id = job.prediction_id.clone();
        let payload =
            poller::poll_until_terminal(&mut job, &self.poll_policy, |_attempt| {
                provider.status(&id)
            })
            .await?;

        let image = normalize::normalize(&payload)?;
        Ok(self.persist(image).await)
    }

    /// Persist an inline result to durable storage when a store is
    /// configured. Persistence failure keeps the inline payload.
    async fn persist(&self, image: ImageRef) -> ImageRef {
        let Some(store) = &self.store else {
            return image;
        };
        let Some(bytes) = image.decode_inline() else {
            return image;
        };

        match store.store(&bytes, "image/jpeg").await {
            Ok(url) => ImageRef::Url(url),
            Err(err) => {
                tracing::warn!(error = %err, "image store upload failed, keeping inline payload");
                image
            }
        }
    }

    /// Fan one request out across all angles concurrently and aggregate
    /// partial success. Each completed angle is also sent on `progress`
    /// (when given) so callers can render results as they arrive.
    pub async fn generate_angles(
        self: Arc<Self>,
        garment: &ImageRef,
        template: &CustomizationRequest,
        progress: Option<UnboundedSender<GenerationResult>>,
    ) -> AngleBatch {
        let mut tasks = JoinSet::new();
        for angle in Angle::ALL {
            let generator = Arc::clone(&self);
            let garment = garment.clone();
            let request = template.with_angle(angle);
            tasks.spawn(async move {
                let outcome = generator.generate(&garment, &request).await;
                GenerationResult::from_outcome(angle, outcome)
            });
        }

        let mut batch = AngleBatch::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => {
                    tracing::info!(
                        angle = %result.angle,
                        generated = result.generated,
                        "angle completed"
                    );
                    if let Some(tx) = &progress {
                        let _ = tx.send(result.clone());
                    }
                    batch.insert(result);
                }
                Err(err) => {
                    tracing::error!(error = %err, "angle task panicked");
                }
            }
        }

        if !batch.succeeded() {
            tracing::warn!("no images generated, all angles fell back");
        }
        batch
    }
}

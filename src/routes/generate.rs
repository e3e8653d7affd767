use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use garde::Validate;
use serde::Serialize;

use crate::app_state::AppState;
use crate::models::customization::{Angle, CustomizationRequest};
use crate::models::generation::{AngleBatch, ImageRef, TryOnOutcome};
use crate::services::preprocess;

/// Response for a single-angle generation. `mode` is `generated` or `demo`
/// so clients can label fallback results; a raw provider error never
/// surfaces here.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub mode: &'static str,
    pub angle: Angle,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl GenerateResponse {
    fn from_outcome(angle: Angle, outcome: TryOnOutcome) -> Self {
        match outcome {
            TryOnOutcome::Generated(image) => Self {
                success: true,
                mode: "generated",
                angle,
                image_url: image.to_uri(),
                diagnostic: None,
            },
            TryOnOutcome::Fallback { image, reason } => Self {
                success: true,
                mode: "demo",
                angle,
                image_url: image.to_uri(),
                diagnostic: Some(reason),
            },
        }
    }
}

/// Response for a multi-angle batch. Result keys appear in completion
/// order; the batch fails only when zero angles generated.
#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub success: bool,
    pub generated: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    #[serde(flatten)]
    pub batch: AngleBatch,
}

/// POST /api/v1/generate — upload a garment photo plus customization
/// fields, receive one try-on image for the requested angle.
pub async fn generate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<GenerateResponse>, StatusCode> {
    let (garment, request) = read_upload(multipart).await?;
    let outcome = state.generator.generate(&garment, &request).await;
    Ok(Json(GenerateResponse::from_outcome(request.angle, outcome)))
}

/// POST /api/v1/generate/angles — same upload, fanned out across all
/// viewing angles concurrently with partial-success aggregation.
pub async fn generate_angles(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<BatchResponse>, StatusCode> {
    let (garment, request) = read_upload(multipart).await?;
    let batch = Arc::clone(&state.generator)
        .generate_angles(&garment, &request, None)
        .await;

    Ok(Json(BatchResponse {
        success: batch.succeeded(),
        generated: batch.generated_count(),
        error: batch.error(),
        batch,
    }))
}

/// Extract the garment image and customization fields from a multipart
/// upload. The image is size-normalized here, before any generation work.
async fn read_upload(
    mut multipart: Multipart,
) -> Result<(ImageRef, CustomizationRequest), StatusCode> {
    let mut image_data: Option<Vec<u8>> = None;
    let mut pose = "standing".to_string();
    let mut skin_tone = "medium".to_string();
    let mut body_type = "athletic-spanish".to_string();
    let mut background = "studio-white".to_string();
    let mut angle = Angle::Front;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("image") => {
                let data = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
                image::guess_format(&data).map_err(|_| StatusCode::UNSUPPORTED_MEDIA_TYPE)?;
                image_data = Some(data.to_vec());
            }
            Some("pose") => pose = text_field(field).await?,
            Some("skin_tone") => skin_tone = text_field(field).await?,
            Some("body_type") => body_type = text_field(field).await?,
            Some("background") => background = text_field(field).await?,
            Some("angle") => {
                let raw = text_field(field).await?;
                angle = raw.parse().map_err(|_| StatusCode::BAD_REQUEST)?;
            }
            _ => {}
        }
    }

    let image_data = image_data.ok_or(StatusCode::BAD_REQUEST)?;
    let normalized = preprocess::normalize_garment(&image_data)
        .map_err(|_| StatusCode::UNSUPPORTED_MEDIA_TYPE)?;
    let garment = ImageRef::from_jpeg_bytes(&normalized);

    let request = CustomizationRequest {
        pose,
        skin_tone,
        body_type,
        background,
        angle,
    };
    request.validate().map_err(|_| StatusCode::BAD_REQUEST)?;

    Ok((garment, request))
}

async fn text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, StatusCode> {
    field.text().await.map_err(|_| StatusCode::BAD_REQUEST)
}

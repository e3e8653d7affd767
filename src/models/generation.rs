use base64::Engine;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::customization::Angle;

/// A usable image: either hosted at a remote URL or carried inline as a
/// base64 payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageRef {
    Url(String),
    Inline { media_type: String, data: String },
}

impl ImageRef {
    pub fn from_jpeg_bytes(bytes: &[u8]) -> Self {
        ImageRef::Inline {
            media_type: "image/jpeg".to_string(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    pub fn inline_base64(data: impl Into<String>) -> Self {
        ImageRef::Inline {
            media_type: "image/jpeg".to_string(),
            data: data.into(),
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, ImageRef::Inline { .. })
    }

    /// Renderable form: the URL itself, or a `data:` URI for inline payloads.
    pub fn to_uri(&self) -> String {
        match self {
            ImageRef::Url(url) => url.clone(),
            ImageRef::Inline { media_type, data } => {
                format!("data:{};base64,{}", media_type, data)
            }
        }
    }

    pub fn decode_inline(&self) -> Option<Vec<u8>> {
        match self {
            ImageRef::Url(_) => None,
            ImageRef::Inline { data, .. } => base64::engine::general_purpose::STANDARD
                .decode(data)
                .ok(),
        }
    }
}

/// How one try-on attempt concluded.
///
/// `Fallback` is the demo-mode path: the caller still gets an image (the
/// original garment photo) plus the reason generation did not happen, so
/// "provider unavailable, showed demo" stays distinguishable from a real
/// generation.
#[derive(Debug, Clone, PartialEq)]
pub enum TryOnOutcome {
    Generated(ImageRef),
    Fallback { image: ImageRef, reason: String },
}

impl TryOnOutcome {
    pub fn image(&self) -> &ImageRef {
        match self {
            TryOnOutcome::Generated(image) => image,
            TryOnOutcome::Fallback { image, .. } => image,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, TryOnOutcome::Generated(_))
    }
}

/// Result recorded for one angle of a generation attempt. Immutable once
/// created.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    pub angle: Angle,
    pub image_url: Option<String>,
    pub generated: bool,
    pub error: Option<String>,
}

impl GenerationResult {
    pub fn from_outcome(angle: Angle, outcome: TryOnOutcome) -> Self {
        match outcome {
            TryOnOutcome::Generated(image) => Self {
                angle,
                image_url: Some(image.to_uri()),
                generated: true,
                error: None,
            },
            TryOnOutcome::Fallback { image, reason } => Self {
                angle,
                image_url: Some(image.to_uri()),
                generated: false,
                error: Some(reason),
            },
        }
    }
}

/// Per-angle results of a multi-angle batch, keyed by angle.
///
/// Insertion order is completion order, not request order.
#[derive(Debug, Default, Serialize)]
pub struct AngleBatch {
    pub results: IndexMap<Angle, GenerationResult>,
}

impl AngleBatch {
    pub fn insert(&mut self, result: GenerationResult) {
        self.results.insert(result.angle, result);
    }

    pub fn generated_count(&self) -> usize {
        self.results.values().filter(|r| r.generated).count()
    }

    /// A batch succeeds when at least one angle produced a genuinely
    /// generated image; an all-fallback batch still carries demo images but
    /// reports failure.
    pub fn succeeded(&self) -> bool {
        self.generated_count() > 0
    }

    pub fn error(&self) -> Option<&'static str> {
        if self.succeeded() {
            None
        } else {
            Some("no images generated")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_uri_is_data_url() {
        let image = ImageRef::inline_base64("QQ==");
        assert_eq!(image.to_uri(), "data:image/jpeg;base64,QQ==");
        assert!(image.is_inline());
    }

    #[test]
    fn test_url_uri_passthrough() {
        let image = ImageRef::Url("https://x/img.png".to_string());
        assert_eq!(image.to_uri(), "https://x/img.png");
        assert!(!image.is_inline());
        assert!(image.decode_inline().is_none());
    }

    #[test]
    fn test_inline_round_trips_bytes() {
        let image = ImageRef::from_jpeg_bytes(b"jpeg bytes");
        assert_eq!(image.decode_inline().unwrap(), b"jpeg bytes");
    }

    #[test]
    fn test_batch_success_requires_one_generated() {
        let garment = ImageRef::inline_base64("QQ==");
        let mut batch = AngleBatch::default();
        batch.insert(GenerationResult::from_outcome(
            Angle::Side,
            TryOnOutcome::Fallback {
                image: garment.clone(),
                reason: "provider unavailable".to_string(),
            },
        ));
        assert!(!batch.succeeded());
        assert_eq!(batch.error(), Some("no images generated"));

        batch.insert(GenerationResult::from_outcome(
            Angle::Front,
            TryOnOutcome::Generated(ImageRef::Url("https://x/front.png".to_string())),
        ));
        assert!(batch.succeeded());
        assert_eq!(batch.generated_count(), 1);
        assert!(batch.error().is_none());
    }

    #[test]
    fn test_batch_preserves_completion_order() {
        let mut batch = AngleBatch::default();
        for angle in [Angle::Back, Angle::Front, Angle::Side] {
            batch.insert(GenerationResult::from_outcome(
                angle,
                TryOnOutcome::Generated(ImageRef::Url(format!("https://x/{angle}.png"))),
            ));
        }
        let keys: Vec<Angle> = batch.results.keys().copied().collect();
        assert_eq!(keys, vec![Angle::Back, Angle::Front, Angle::Side]);
    }
}

//! Live test against the real FASHN API.
//!
//! Requires FASHN_API_KEY in the environment.
//! Run with: cargo test --test live_test -- --ignored

use std::io::Cursor;
use std::sync::Arc;

use image::{DynamicImage, ImageFormat, RgbImage};

use tryon_svc::config::AppConfig;
use tryon_svc::models::customization::{Angle, CustomizationRequest};
use tryon_svc::models::generation::ImageRef;
use tryon_svc::services::catalog::ModelCatalog;
use tryon_svc::services::orchestrator::Generator;
use tryon_svc::services::preprocess;
use tryon_svc::services::provider::{FashnClient, TryOnProvider};

fn sample_garment() -> ImageRef {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(256, 256, image::Rgb([200, 30, 30])));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).expect("encode sample garment");
    let normalized = preprocess::normalize_garment(&out.into_inner()).expect("normalize garment");
    ImageRef::from_jpeg_bytes(&normalized)
}

#[tokio::test]
#[ignore] // Run with: cargo test --test live_test -- --ignored
async fn test_live_generation() {
    let config = AppConfig::from_env().expect("Failed to load config");
    let key = config
        .fashn_credential()
        .expect("FASHN_API_KEY must be set for the live test");

    let provider: Arc<dyn TryOnProvider> =
        Arc::new(FashnClient::new(key, config.fashn_base_url.clone()));

    let generator = Generator::new(
        ModelCatalog::builtin(),
        Some(provider),
        None,
        config.poll_policy(),
        config.probe_timeout(),
    );

    let request = CustomizationRequest {
        pose: "standing".to_string(),
        skin_tone: "medium".to_string(),
        body_type: "athletic-spanish".to_string(),
        background: "studio-white".to_string(),
        angle: Angle::Front,
    };

    let outcome = generator.generate(&sample_garment(), &request).await;

    // Even a provider-side failure must resolve to an image.
    assert!(!outcome.image().to_uri().is_empty());
    println!(
        "live generation finished, generated = {}",
        outcome.is_generated()
    );
}

//! Response Normalizer
//!
//! Extracts a usable image reference from an arbitrary provider success
//! payload. The provider's success schema varies by endpoint version, so
//! extraction runs through a small ordered list of extractor functions; the
//! first match wins. A payload that reports success but carries no
//! extractable image is a provider contract violation and surfaces as an
//! error rather than defaulting silently.

use serde_json::Value;

use crate::models::generation::ImageRef;

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("no image in completed result")]
    NoImage,
}

type Extractor = fn(&Value) -> Option<ImageRef>;

/// Tried in order; order is part of the contract.
const EXTRACTORS: &[Extractor] = &[first_output_element, probed_url_field, inline_base64];

/// Pure function, no I/O.
pub fn normalize(payload: &Value) -> Result<ImageRef, NormalizeError> {
    EXTRACTORS
        .iter()
        .find_map(|extract| extract(payload))
        .ok_or(NormalizeError::NoImage)
}

/// `output` as a non-empty ordered sequence: take the first element.
fn first_output_element(payload: &Value) -> Option<ImageRef> {
    match payload.get("output")? {
        Value::Array(items) => items
            .first()
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .map(|url| ImageRef::Url(url.to_string())),
        _ => None,
    }
}

/// Known URL field locations across provider endpoint versions. A numeric
/// segment indexes into an array.
const URL_FIELD_PATHS: &[&[&str]] = &[
    &["output", "image_url"],
    &["output", "url"],
    &["output", "image"],
    &["output", "output", "0", "url"],
    &["result", "image_url"],
    &["result", "url"],
    &["image_url"],
    &["url"],
    &["output_url"],
];

fn probed_url_field(payload: &Value) -> Option<ImageRef> {
    URL_FIELD_PATHS
        .iter()
        .find_map(|path| {
            lookup(payload, path)
                .and_then(Value::as_str)
                .filter(|url| !url.is_empty())
        })
        .map(|url| ImageRef::Url(url.to_string()))
}

/// Inline encoded bytes under `output.image_base64` or `output.base64`,
/// wrapped as a self-contained inline image reference.
fn inline_base64(payload: &Value) -> Option<ImageRef> {
    let output = payload.get("output")?;
    output
        .get("image_base64")
        .or_else(|| output.get("base64"))
        .and_then(Value::as_str)
        .filter(|data| !data.is_empty())
        .map(ImageRef::inline_base64)
}

fn lookup<'a>(payload: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(payload, |value, segment| {
        match segment.parse::<usize>() {
            Ok(index) => value.get(index),
            Err(_) => value.get(*segment),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_output_array_takes_first_element() {
        let payload = json!({"status": "succeeded", "output": ["https://x/img.png", "https://x/alt.png"]});
        assert_eq!(
            normalize(&payload).unwrap(),
            ImageRef::Url("https://x/img.png".to_string())
        );
    }

    #[test]
    fn test_probed_fields_in_order() {
        let payload = json!({"output": {"image_url": "https://x/a.png", "url": "https://x/b.png"}});
        assert_eq!(
            normalize(&payload).unwrap(),
            ImageRef::Url("https://x/a.png".to_string())
        );

        let payload = json!({"result": {"url": "https://x/c.png"}});
        assert_eq!(
            normalize(&payload).unwrap(),
            ImageRef::Url("https://x/c.png".to_string())
        );

        let payload = json!({"output_url": "https://x/d.png"});
        assert_eq!(
            normalize(&payload).unwrap(),
            ImageRef::Url("https://x/d.png".to_string())
        );
    }

    #[test]
    fn test_nested_output_array_url() {
        let payload = json!({"output": {"output": [{"url": "https://x/nested.png"}]}});
        assert_eq!(
            normalize(&payload).unwrap(),
            ImageRef::Url("https://x/nested.png".to_string())
        );
    }

    #[test]
    fn test_inline_base64_wrapped() {
        let payload = json!({"output": {"image_base64": "QQ=="}});
        assert_eq!(normalize(&payload).unwrap(), ImageRef::inline_base64("QQ=="));

        let payload = json!({"output": {"base64": "Qg=="}});
        assert_eq!(normalize(&payload).unwrap(), ImageRef::inline_base64("Qg=="));
    }

    #[test]
    fn test_success_without_image_is_error() {
        let payload = json!({"status": "succeeded"});
        assert!(matches!(normalize(&payload), Err(NormalizeError::NoImage)));
    }

    #[test]
    fn test_empty_output_array_falls_through() {
        let payload = json!({"status": "succeeded", "output": [], "image_url": "https://x/top.png"});
        assert_eq!(
            normalize(&payload).unwrap(),
            ImageRef::Url("https://x/top.png".to_string())
        );
    }

    #[test]
    fn test_url_array_wins_over_probed_fields() {
        let payload = json!({"output": ["https://x/first.png"], "image_url": "https://x/probed.png"});
        assert_eq!(
            normalize(&payload).unwrap(),
            ImageRef::Url("https://x/first.png".to_string())
        );
    }
}

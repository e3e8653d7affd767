//! Model Reference Catalog
//!
//! Maps a customization tuple (pose, skin tone, body type, angle) to a
//! hosted reference photo of a model. Entries are static; the resolver
//! applies the fallback chain exact match → front view of the same model →
//! first catalog entry, and rejects blank or placeholder URLs so callers can
//! short-circuit into demo mode instead of wasting a provider call.

use serde::Serialize;

use crate::models::customization::Angle;

/// Substrings marking an entry whose URL was never configured.
const PLACEHOLDER_MARKERS: &[&str] = &["placeholder", "your-cdn.com", "Model+Image+Required"];

/// A static catalog entry. For a given (pose, skin_tone, body_type), at most
/// one entry exists per angle.
#[derive(Debug, Clone, Serialize)]
pub struct ModelReference {
    pub id: &'static str,
    pub name: &'static str,
    pub pose: &'static str,
    pub skin_tone: &'static str,
    pub body_type: &'static str,
    pub angle: Angle,
    pub url: &'static str,
}

/// Unique model presented for selection UIs.
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub id: &'static str,
    pub name: &'static str,
    pub value: String,
    pub angles: Vec<Angle>,
}

const BUILTIN_GALLERY: &[ModelReference] = &[
    ModelReference {
        id: "spanish-front",
        name: "Spanish",
        pose: "standing",
        skin_tone: "medium",
        body_type: "athletic-spanish",
        angle: Angle::Front,
        url: "https://i.ibb.co.com/9mty2g5y/Spanish-front.png",
    },
    ModelReference {
        id: "spanish-side",
        name: "Spanish",
        pose: "standing",
        skin_tone: "medium",
        body_type: "athletic-spanish",
        angle: Angle::Side,
        url: "https://i.ibb.co.com/Hp7f7ZzR/spanish-side.png",
    },
    ModelReference {
        id: "spanish-side-back",
        name: "Spanish",
        pose: "standing",
        skin_tone: "medium",
        body_type: "athletic-spanish",
        angle: Angle::SideBack,
        url: "https://i.ibb.co.com/ynqLbrFK/spanish-side-left.png",
    },
    ModelReference {
        id: "spanish-back",
        name: "Spanish",
        pose: "standing",
        skin_tone: "medium",
        body_type: "athletic-spanish",
        angle: Angle::Back,
        url: "https://i.ibb.co.com/cKWtnG10/spanish-back.png",
    },
    ModelReference {
        id: "blonde-front",
        name: "Blonde",
        pose: "standing",
        skin_tone: "light",
        body_type: "athletic-blonde",
        angle: Angle::Front,
        url: "https://i.ibb.co.com/JjqHyWtP/Blonde.png",
    },
    ModelReference {
        id: "blonde-side",
        name: "Blonde",
        pose: "standing",
        skin_tone: "light",
        body_type: "athletic-blonde",
        angle: Angle::Side,
        url: "https://i.ibb.co.com/1fTBjgjv/blonde-side-2.png",
    },
    ModelReference {
        id: "blonde-side-back",
        name: "Blonde",
        pose: "standing",
        skin_tone: "light",
        body_type: "athletic-blonde",
        angle: Angle::SideBack,
        url: "https://i.ibb.co.com/v6hkwLzz/blonde-side.png",
    },
    ModelReference {
        id: "blonde-back",
        name: "Blonde",
        pose: "standing",
        skin_tone: "light",
        body_type: "athletic-blonde",
        angle: Angle::Back,
        url: "https://i.ibb.co.com/S4fTytq9/blonde-back.png",
    },
    ModelReference {
        id: "asian-front",
        name: "Asian",
        pose: "standing",
        skin_tone: "light",
        body_type: "athletic-asian",
        angle: Angle::Front,
        url: "https://i.ibb.co.com/x8PNFG3k/Asian.png",
    },
    ModelReference {
        id: "asian-side",
        name: "Asian",
        pose: "standing",
        skin_tone: "light",
        body_type: "athletic-asian",
        angle: Angle::Side,
        url: "https://i.ibb.co.com/6RZbdsMY/Asian-side.png",
    },
    ModelReference {
        id: "asian-side-back",
        name: "Asian",
        pose: "standing",
        skin_tone: "light",
        body_type: "athletic-asian",
        angle: Angle::SideBack,
        url: "https://i.ibb.co.com/jkMgN6jt/Asian-side-2.png",
    },
    ModelReference {
        id: "asian-back",
        name: "Asian",
        pose: "standing",
        skin_tone: "light",
        body_type: "athletic-asian",
        angle: Angle::Back,
        url: "https://i.ibb.co.com/gLXyYKgj/Asian-back.png",
    },
    ModelReference {
        id: "korean-front",
        name: "Korean",
        pose: "standing",
        skin_tone: "light",
        body_type: "athletic-korean",
        angle: Angle::Front,
        url: "https://i.ibb.co.com/p6gpX3Q5/Korean-Front.png",
    },
    ModelReference {
        id: "korean-side",
        name: "Korean",
        pose: "standing",
        skin_tone: "light",
        body_type: "athletic-korean",
        angle: Angle::Side,
        url: "https://i.ibb.co.com/vvqLpkC3/Korean-side.png",
    },
    ModelReference {
        id: "korean-side-back",
        name: "Korean",
        pose: "standing",
        skin_tone: "light",
        body_type: "athletic-korean",
        angle: Angle::SideBack,
        url: "https://i.ibb.co.com/JF76jxGY/Korean-side-2.png",
    },
    ModelReference {
        id: "korean-back",
        name: "Korean",
        pose: "standing",
        skin_tone: "light",
        body_type: "athletic-korean",
        angle: Angle::Back,
        url: "https://i.ibb.co.com/QvC58b9n/Korean-back.png",
    },
];

pub struct ModelCatalog {
    entries: Vec<ModelReference>,
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ModelCatalog {
    pub fn new(entries: Vec<ModelReference>) -> Self {
        Self { entries }
    }

    pub fn builtin() -> Self {
        Self::new(BUILTIN_GALLERY.to_vec())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a customization tuple to a reference image URL.
    ///
    /// Returns `None` when the settled entry is blank or a placeholder; the
    /// caller must treat that as "no reference available" and fall back to
    /// demo mode.
    pub fn resolve(
        &self,
        pose: &str,
        skin_tone: &str,
        body_type: &str,
        angle: Angle,
    ) -> Option<String> {
        let matches_tuple = |m: &&ModelReference| {
            m.pose == pose && m.skin_tone == skin_tone && m.body_type == body_type
        };

        let candidate = self
            .entries
            .iter()
            .find(|m| matches_tuple(m) && m.angle == angle)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|m| matches_tuple(m) && m.angle == Angle::Front)
            })
            .or_else(|| self.entries.first())?;

        let url = candidate.url;
        if url.is_empty() || PLACEHOLDER_MARKERS.iter().any(|marker| url.contains(marker)) {
            return None;
        }
        Some(url.to_string())
    }

    pub fn by_id(&self, id: &str) -> Option<&ModelReference> {
        self.entries.iter().find(|m| m.id == id)
    }

    /// Unique models (one row per name/skin-tone/body-type), preferring the
    /// front-angle entry as the representative.
    pub fn available_models(&self) -> Vec<ModelSummary> {
        let mut summaries: Vec<ModelSummary> = Vec::new();
        for entry in &self.entries {
            let value = format!("{}-{}-{}", entry.pose, entry.skin_tone, entry.body_type);
            match summaries.iter_mut().find(|s| s.value == value) {
                Some(existing) => {
                    if entry.angle == Angle::Front {
                        existing.id = entry.id;
                        existing.name = entry.name;
                    }
                    if !existing.angles.contains(&entry.angle) {
                        existing.angles.push(entry.angle);
                    }
                }
                None => summaries.push(ModelSummary {
                    id: entry.id,
                    name: entry.name,
                    value,
                    angles: vec![entry.angle],
                }),
            }
        }
        summaries
    }

    /// Angles available for the model identified by `id`.
    pub fn angles_for(&self, id: &str) -> Vec<Angle> {
        let Some(model) = self.by_id(id) else {
            return vec![Angle::Front];
        };
        let mut angles: Vec<Angle> = Vec::new();
        for entry in &self.entries {
            if entry.name == model.name
                && entry.skin_tone == model.skin_tone
                && entry.body_type == model.body_type
                && !angles.contains(&entry.angle)
            {
                angles.push(entry.angle);
            }
        }
        angles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sparse_catalog() -> ModelCatalog {
        ModelCatalog::new(vec![
            ModelReference {
                id: "a-front",
                name: "A",
                pose: "standing",
                skin_tone: "medium",
                body_type: "average",
                angle: Angle::Front,
                url: "https://cdn/a-front.png",
            },
            ModelReference {
                id: "a-side",
                name: "A",
                pose: "standing",
                skin_tone: "medium",
                body_type: "average",
                angle: Angle::Side,
                url: "https://cdn/a-side.png",
            },
            ModelReference {
                id: "b-front",
                name: "B",
                pose: "sitting",
                skin_tone: "dark",
                body_type: "average",
                angle: Angle::Front,
                url: "https://cdn/b-front.png",
            },
        ])
    }

    #[test]
    fn test_exact_match_returns_that_url() {
        let catalog = sparse_catalog();
        assert_eq!(
            catalog.resolve("standing", "medium", "average", Angle::Side),
            Some("https://cdn/a-side.png".to_string())
        );
    }

    #[test]
    fn test_builtin_exact_matches() {
        let catalog = ModelCatalog::builtin();
        for entry in BUILTIN_GALLERY {
            assert_eq!(
                catalog.resolve(entry.pose, entry.skin_tone, entry.body_type, entry.angle),
                Some(entry.url.to_string()),
                "exact lookup failed for {}",
                entry.id
            );
        }
    }

    #[test]
    fn test_missing_angle_falls_back_to_front() {
        let catalog = sparse_catalog();
        // No back view for model A: front view of the same model wins.
        assert_eq!(
            catalog.resolve("standing", "medium", "average", Angle::Back),
            Some("https://cdn/a-front.png".to_string())
        );
    }

    #[test]
    fn test_absent_combination_falls_back_to_first_entry() {
        let catalog = sparse_catalog();
        assert_eq!(
            catalog.resolve("kneeling", "light", "tall", Angle::Front),
            Some("https://cdn/a-front.png".to_string())
        );
    }

    #[test]
    fn test_placeholder_url_is_rejected() {
        let catalog = ModelCatalog::new(vec![ModelReference {
            id: "unset",
            name: "Unset",
            pose: "standing",
            skin_tone: "medium",
            body_type: "average",
            angle: Angle::Front,
            url: "https://your-cdn.com/models/placeholder.jpg",
        }]);
        assert_eq!(
            catalog.resolve("standing", "medium", "average", Angle::Front),
            None
        );
        // The same rejection applies on the last-resort path.
        assert_eq!(catalog.resolve("other", "other", "other", Angle::Back), None);
    }

    #[test]
    fn test_empty_catalog_resolves_to_none() {
        let catalog = ModelCatalog::new(Vec::new());
        assert_eq!(catalog.resolve("standing", "medium", "average", Angle::Front), None);
    }

    #[test]
    fn test_available_models_unique_with_front_representative() {
        let catalog = ModelCatalog::builtin();
        let models = catalog.available_models();
        assert_eq!(models.len(), 4);
        for model in &models {
            assert!(model.id.ends_with("-front"), "representative should be the front entry");
            assert_eq!(model.angles.len(), 4);
        }
    }

    #[test]
    fn test_angles_for_unknown_model_defaults_to_front() {
        let catalog = ModelCatalog::builtin();
        assert_eq!(catalog.angles_for("nope"), vec![Angle::Front]);
        let spanish = catalog.angles_for("spanish-side");
        assert_eq!(spanish.len(), 4);
    }
}

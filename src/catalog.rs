//! Built-in catalog of language models and their training data.
//!
//! Each entry carries a diversity and transparency score, the training
//! size and a percentage breakdown over five source classes. The catalog
//! groups entries by provider and derives [`ModelDefaults`] and ready to
//! use [`SimulationParams`] through the [`mapping`](crate::mapping) layer.
//!
//! ```ignore
//! let catalog = ModelCatalog::builtin()?;
//! let gpt4 = catalog.find("openai", "gpt-4").unwrap();
//! let params = gpt4.to_params();
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::color::{Category, Rgb};
use crate::error::ConfigError;
use crate::mapping;
use crate::params::SimulationParams;

const BUILTIN_MODELS: &str = include_str!("../presets/models.json");

/// Label and color used when a model lists no source shares.
pub const UNKNOWN_SOURCE: (&str, Rgb) = ("Unknown", Rgb::new(0x33, 0x41, 0x55));

/// The five classes training data is broken down into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceClass {
    ClassicWeb,
    Social,
    Academic,
    Proprietary,
    Synthetic,
}

impl SourceClass {
    pub const ALL: [SourceClass; 5] = [
        SourceClass::ClassicWeb,
        SourceClass::Social,
        SourceClass::Academic,
        SourceClass::Proprietary,
        SourceClass::Synthetic,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SourceClass::ClassicWeb => "Classic web",
            SourceClass::Social => "Social media",
            SourceClass::Academic => "Academic",
            SourceClass::Proprietary => "Proprietary",
            SourceClass::Synthetic => "Synthetic",
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            SourceClass::ClassicWeb => Rgb::new(0x1D, 0x4E, 0xD8),
            SourceClass::Social => Rgb::new(0xDC, 0x26, 0x26),
            SourceClass::Academic => Rgb::new(0x05, 0x96, 0x69),
            SourceClass::Proprietary => Rgb::new(0xF5, 0x9E, 0x0B),
            SourceClass::Synthetic => Rgb::new(0x6B, 0x72, 0x80),
        }
    }
}

/// Percentage of training data per source class.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceBreakdown {
    pub blue_classic_web: f64,
    pub red_social: f64,
    pub green_academic: f64,
    pub yellow_proprietary: f64,
    pub gray_synthetic: f64,
}

impl SourceBreakdown {
    pub fn share(&self, class: SourceClass) -> f64 {
        match class {
            SourceClass::ClassicWeb => self.blue_classic_web,
            SourceClass::Social => self.red_social,
            SourceClass::Academic => self.green_academic,
            SourceClass::Proprietary => self.yellow_proprietary,
            SourceClass::Synthetic => self.gray_synthetic,
        }
    }

    /// The class with the largest positive share, if any.
    pub fn dominant(&self) -> Option<(SourceClass, f64)> {
        SourceClass::ALL
            .iter()
            .map(|&class| (class, self.share(class)))
            .filter(|(_, share)| *share > 0.0)
            .fold(None, |best, (class, share)| match best {
                Some((_, top)) if top >= share => best,
                _ => Some((class, share)),
            })
    }
}

/// Training corpus size. Either figure may be unknown.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrainingInfo {
    pub tokens: Option<f64>,
    pub parameters: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawModel {
    provider: String,
    model: String,
    release_date: String,
    training: TrainingInfo,
    diversity_score: f64,
    transparency_score: f64,
    sources: SourceBreakdown,
}

/// Visual defaults derived from a model's metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDefaults {
    pub points: u32,
    /// Points were derived from parameters or a fixed fallback.
    pub points_estimated: bool,
    pub structure_diameter: u32,
    pub blur: f32,
    pub colors: Vec<Category>,
}

/// One model in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelEntry {
    pub id: String,
    pub name: String,
    pub provider: String,
    /// ISO date, `YYYY-MM-DD`.
    pub release_date: String,
    pub training: TrainingInfo,
    pub diversity_score: f64,
    pub transparency_score: f64,
    pub sources: SourceBreakdown,
}

impl ModelEntry {
    pub fn defaults(&self) -> ModelDefaults {
        let points = mapping::estimate_points(self.training.tokens, self.training.parameters);
        ModelDefaults {
            points: points.points,
            points_estimated: points.estimated,
            structure_diameter: mapping::diversity_to_diameter(self.diversity_score),
            blur: mapping::transparency_to_blur(self.transparency_score),
            colors: self.source_categories(),
        }
    }

    /// One category per source class with a positive share.
    pub fn source_categories(&self) -> Vec<Category> {
        let colors: Vec<Category> = SourceClass::ALL
            .iter()
            .filter(|&&class| self.sources.share(class) > 0.0)
            .map(|&class| {
                Category::new(class.label(), class.color(), self.sources.share(class) as f32)
            })
            .collect();

        if colors.is_empty() {
            let (name, color) = UNKNOWN_SOURCE;
            vec![Category::new(name, color, 100.0)]
        } else {
            colors
        }
    }

    /// Diversity the simulation should use: dataset score blended with how
    /// evenly the sources are mixed.
    pub fn effective_diversity(&self) -> f32 {
        let ratios: Vec<f64> = self
            .source_categories()
            .iter()
            .map(|c| c.ratio as f64)
            .collect();
        mapping::blended_diversity(self.diversity_score, mapping::color_entropy_score(&ratios))
    }

    pub fn to_params(&self) -> SimulationParams {
        let defaults = self.defaults();
        SimulationParams::new(defaults.points, self.effective_diversity(), defaults.colors)
            .with_spread(mapping::diameter_to_spread(defaults.structure_diameter as f64))
            .with_blur(defaults.blur)
    }
}

/// A provider and its models, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Provider {
    pub id: String,
    pub name: String,
    pub models: Vec<ModelEntry>,
}

/// Models grouped by provider, providers sorted by name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelCatalog {
    providers: Vec<Provider>,
}

impl ModelCatalog {
    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json(BUILTIN_MODELS)
    }

    /// Parse a JSON array of model records.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: Vec<RawModel> = serde_json::from_str(json)?;
        Ok(Self::from_raw(raw))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn from_raw(raw: Vec<RawModel>) -> Self {
        let mut providers: Vec<Provider> = Vec::new();
        for model in raw {
            let provider_id = slugify(&model.provider);
            let index = match providers.iter().position(|p| p.id == provider_id) {
                Some(index) => index,
                None => {
                    providers.push(Provider {
                        id: provider_id,
                        name: model.provider.clone(),
                        models: Vec::new(),
                    });
                    providers.len() - 1
                }
            };

            providers[index].models.push(ModelEntry {
                id: slugify(&model.model),
                name: model.model,
                provider: model.provider,
                release_date: model.release_date,
                training: model.training,
                diversity_score: model.diversity_score,
                transparency_score: model.transparency_score,
                sources: model.sources,
            });
        }

        for provider in &mut providers {
            provider
                .models
                .sort_by(|a, b| b.release_date.cmp(&a.release_date));
        }
        providers.sort_by_key(|p| p.name.to_lowercase());

        let count: usize = providers.iter().map(|p| p.models.len()).sum();
        log::debug!("Loaded {} models from {} providers", count, providers.len());

        Self { providers }
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    pub fn provider(&self, id: &str) -> Option<&Provider> {
        self.providers.iter().find(|p| p.id == id)
    }

    /// Look up a model by provider and model slug.
    pub fn find(&self, provider_id: &str, model_id: &str) -> Option<&ModelEntry> {
        self.provider(provider_id)?
            .models
            .iter()
            .find(|m| m.id == model_id)
    }

    /// Every model, in catalog order.
    pub fn models(&self) -> impl Iterator<Item = &ModelEntry> {
        self.providers.iter().flat_map(|p| p.models.iter())
    }

    pub fn len(&self) -> usize {
        self.providers.iter().map(|p| p.models.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lowercase, with runs of anything but `a-z0-9` collapsed to `-`.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    for c in value.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Aleph Alpha"), "aleph-alpha");
        assert_eq!(slugify("GPT-3.5"), "gpt-3-5");
        assert_eq!(slugify("  xAI!! "), "xai");
        assert_eq!(slugify("LLaMA 3 70B"), "llama-3-70b");
    }

    #[test]
    fn test_builtin_groups_and_sorts() {
        let catalog = ModelCatalog::builtin().unwrap();
        let ids: Vec<&str> = catalog.providers().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["aleph-alpha", "anthropic", "google", "meta", "openai", "xai"]);
        assert_eq!(catalog.len(), 16);

        let openai = catalog.provider("openai").unwrap();
        assert_eq!(openai.models.first().map(|m| m.name.as_str()), Some("GPT-5"));
        assert_eq!(openai.models.last().map(|m| m.name.as_str()), Some("GPT-2"));
        for provider in catalog.providers() {
            for pair in provider.models.windows(2) {
                assert!(pair[0].release_date >= pair[1].release_date);
            }
        }
    }

    #[test]
    fn test_defaults_for_known_model() {
        let catalog = ModelCatalog::builtin().unwrap();
        let gpt2 = catalog.find("openai", "gpt-2").unwrap();
        let defaults = gpt2.defaults();

        // 1e10 tokens sits below the log floor
        assert_eq!(defaults.points, 0);
        assert!(!defaults.points_estimated);
        assert_eq!(defaults.structure_diameter, 53);
        assert_eq!(defaults.blur, 4.2);

        let names: Vec<&str> = defaults.colors.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Classic web", "Academic", "Synthetic"]);
        assert_eq!(defaults.colors[0].color, Rgb::new(0x1D, 0x4E, 0xD8));
    }

    #[test]
    fn test_missing_training_size_is_estimated() {
        let catalog = ModelCatalog::builtin().unwrap();
        let grok = catalog.find("xai", "grok-1").unwrap();
        let defaults = grok.defaults();
        assert_eq!(defaults.points, mapping::FALLBACK_POINTS);
        assert!(defaults.points_estimated);
    }

    #[test]
    fn test_empty_sources_fall_back_to_unknown() {
        let json = r#"[{
            "provider": "Test Lab",
            "model": "Blank",
            "release_date": "2024-01-01",
            "training": { "tokens": null, "parameters": 1e10 },
            "diversity_score": 0,
            "transparency_score": 100,
            "sources": {
                "blue_classic_web": 0, "red_social": 0, "green_academic": 0,
                "yellow_proprietary": 0, "gray_synthetic": 0
            }
        }]"#;
        let catalog = ModelCatalog::from_json(json).unwrap();
        let model = catalog.find("test-lab", "blank").unwrap();
        let defaults = model.defaults();
        assert_eq!(defaults.colors.len(), 1);
        assert_eq!(defaults.colors[0].name, "Unknown");
        assert_eq!(defaults.colors[0].ratio, 100.0);
        assert!(defaults.points_estimated);
        assert_eq!(model.sources.dominant(), None);
        // Single source: zero entropy, no dataset score
        assert_eq!(model.effective_diversity(), 0.0);
    }

    #[test]
    fn test_to_params_uses_mapping() {
        let catalog = ModelCatalog::builtin().unwrap();
        let palm = catalog.find("google", "palm").unwrap();
        let params = palm.to_params();
        let defaults = palm.defaults();
        assert_eq!(params.points, defaults.points);
        assert_eq!(params.categories, defaults.colors);
        assert_eq!(params.blur(), defaults.blur);
        assert_eq!(
            params.spread(),
            mapping::diameter_to_spread(defaults.structure_diameter as f64)
        );
        assert!(params.diversity > 0.0 && params.diversity <= 100.0);
        assert_eq!(palm.sources.dominant().map(|(c, _)| c), Some(SourceClass::Social));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            ModelCatalog::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            ModelCatalog::load("/definitely/not/here.json"),
            Err(ConfigError::Io(_))
        ));
    }
}

//! Scene files.
//!
//! A scene is a JSON description of one formation, with colors written the
//! way people write them (hex strings):
//!
//! ```json
//! {
//!   "points": 1500,
//!   "diversity": 65,
//!   "spread": 1.2,
//!   "blur": 4,
//!   "dark_mode": true,
//!   "categories": [
//!     { "name": "Classic web", "color": "#1D4ED8", "ratio": 60 },
//!     { "name": "Social media", "color": "#DC2626", "ratio": 40 }
//!   ]
//! }
//! ```
//!
//! Everything except `points` and `categories` is optional.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::color::{Category, Rgb};
use crate::error::ConfigError;
use crate::params::SimulationParams;

/// One category as written in a scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    /// `#rrggbb`, `#rgb` or an `"r,g,b"` triple.
    pub color: String,
    pub ratio: f32,
}

impl CategoryConfig {
    pub fn to_category(&self) -> Result<Category, ConfigError> {
        let parsed = if self.color.contains(',') {
            Rgb::parse_triple(&self.color)
        } else {
            Rgb::from_hex(&self.color)
        };
        let color = parsed.map_err(|source| ConfigError::Color {
            name: self.name.clone(),
            source,
        })?;
        Ok(Category::new(self.name.clone(), color, self.ratio))
    }
}

impl From<&Category> for CategoryConfig {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            color: category.color.to_hex(),
            ratio: category.ratio,
        }
    }
}

/// A serializable formation description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub points: u32,
    #[serde(default)]
    pub diversity: f32,
    pub categories: Vec<CategoryConfig>,
    #[serde(default = "default_one")]
    pub spread: f32,
    #[serde(default)]
    pub blur: f32,
    #[serde(default)]
    pub horizontal_shift: f32,
    #[serde(default = "default_one")]
    pub convergence: f32,
    #[serde(default = "default_one")]
    pub size_multiplier: f32,
    #[serde(default)]
    pub dark_mode: bool,
}

fn default_one() -> f32 {
    1.0
}

impl SceneConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let scene = Self::from_json(&json)?;
        log::info!(
            "Loaded scene {} ({} points, {} categories)",
            path.display(),
            scene.points,
            scene.categories.len()
        );
        Ok(scene)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate colors and build clamped simulation parameters.
    pub fn to_params(&self) -> Result<SimulationParams, ConfigError> {
        let categories = self
            .categories
            .iter()
            .map(CategoryConfig::to_category)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SimulationParams::new(self.points, self.diversity, categories)
            .with_spread(self.spread)
            .with_blur(self.blur)
            .with_horizontal_shift(self.horizontal_shift)
            .with_convergence(self.convergence)
            .with_size_multiplier(self.size_multiplier)
            .with_dark_mode(self.dark_mode))
    }
}

impl From<&SimulationParams> for SceneConfig {
    fn from(params: &SimulationParams) -> Self {
        Self {
            points: params.points,
            diversity: params.diversity,
            categories: params.categories.iter().map(CategoryConfig::from).collect(),
            spread: params.spread(),
            blur: params.blur(),
            horizontal_shift: params.horizontal_shift,
            convergence: params.convergence(),
            size_multiplier: params.size_multiplier(),
            dark_mode: params.dark_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ColorError;

    const SCENE: &str = r##"{
        "points": 1500,
        "diversity": 65,
        "dark_mode": true,
        "categories": [
            { "name": "Classic web", "color": "#1D4ED8", "ratio": 60 },
            { "name": "Social media", "color": "220,38,38", "ratio": 40 }
        ]
    }"##;

    #[test]
    fn test_defaults_fill_optional_fields() {
        let scene = SceneConfig::from_json(SCENE).unwrap();
        assert_eq!(scene.spread, 1.0);
        assert_eq!(scene.convergence, 1.0);
        assert_eq!(scene.size_multiplier, 1.0);
        assert_eq!(scene.blur, 0.0);

        let params = scene.to_params().unwrap();
        assert_eq!(params.points, 1500);
        assert!(params.dark_mode);
        assert_eq!(params.categories[0].color, Rgb::new(0x1D, 0x4E, 0xD8));
        assert_eq!(params.categories[1].color, Rgb::new(220, 38, 38));
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let mut scene = SceneConfig::from_json(SCENE).unwrap();
        scene.spread = 0.0;
        scene.convergence = 4.0;
        let params = scene.to_params().unwrap();
        assert_eq!(params.spread(), 0.2);
        assert_eq!(params.convergence(), 1.0);
    }

    #[test]
    fn test_bad_color_names_the_category() {
        let mut scene = SceneConfig::from_json(SCENE).unwrap();
        scene.categories[1].color = "#12345".into();
        match scene.to_params() {
            Err(ConfigError::Color { name, source }) => {
                assert_eq!(name, "Social media");
                assert_eq!(source, ColorError::InvalidLength(5));
            }
            other => panic!("expected color error, got {:?}", other),
        }
    }

    #[test]
    fn test_params_survive_json() {
        let params = SceneConfig::from_json(SCENE).unwrap().to_params().unwrap();
        let json = SceneConfig::from(&params).to_json().unwrap();
        let back = SceneConfig::from_json(&json).unwrap().to_params().unwrap();
        assert_eq!(back, params);
    }

    #[test]
    fn test_missing_points_is_rejected() {
        let err = SceneConfig::from_json(r#"{ "categories": [] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}

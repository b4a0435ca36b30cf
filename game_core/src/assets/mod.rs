//! Asset registry
//!
//! Immutable lookup tables for colours, gradients and obstacle sprites,
//! populated once when a session is created and read thereafter.

pub mod texture;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::resources::GameRng;
pub use texture::{GradientTexture, Rgba};

/// Obstacle cluster shapes as (width, height) in grid cells
pub const SHAPES: [(u32, u32); 7] = [(1, 1), (1, 2), (1, 3), (1, 4), (2, 1), (3, 1), (4, 1)];

/// Prefix for keys synthesized from gradient definitions
pub const GRADIENT_KEY_PREFIX: &str = "_gradient-";

/// A single colour or a list of gradient stops
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    Solid(String),
    Gradient(Vec<String>),
}

impl ColorValue {
    /// CSS `background` value for this colour
    pub fn css_background(&self) -> String {
        match self {
            ColorValue::Solid(hex) => hex.clone(),
            ColorValue::Gradient(stops) => format!("linear-gradient({})", stops.join(",")),
        }
    }
}

/// A pickup colour and the text colour that reads well on top of it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub color: ColorValue,
    #[serde(default)]
    pub font_color: Option<String>,
}

impl ColorDefinition {
    pub fn solid(hex: &str, font_color: &str) -> Self {
        Self {
            name: None,
            color: ColorValue::Solid(hex.to_string()),
            font_color: Some(font_color.to_string()),
        }
    }

    pub fn gradient(name: Option<&str>, stops: &[&str], font_color: &str) -> Self {
        Self {
            name: name.map(str::to_string),
            color: ColorValue::Gradient(stops.iter().map(|s| s.to_string()).collect()),
            font_color: Some(font_color.to_string()),
        }
    }
}

/// Display label for a colour key, without the gradient prefix
pub fn display_name(color_key: &str) -> &str {
    color_key
        .strip_prefix(GRADIENT_KEY_PREFIX)
        .unwrap_or(color_key)
}

/// Colour, gradient and obstacle catalogs
#[derive(Debug, Clone)]
pub struct AssetRegistry {
    definitions: HashMap<String, ColorDefinition>,
    color_keys: Vec<String>,
    gradient_keys: Vec<String>,
    obstacle_keys: Vec<String>,
    obstacle_urls: HashMap<String, String>,
    solid_values: HashMap<String, u32>,
    textures: HashMap<String, GradientTexture>,
    texture_size: (u32, u32),
}

impl AssetRegistry {
    /// Build the registry from host-supplied catalogs
    ///
    /// Catalog order is preserved; the first colour is the one a run starts
    /// with. Gradients with fewer than two stops, or with stops that are
    /// not hex colours, are skipped.
    pub fn load_definitions(
        colors: Vec<(String, ColorDefinition)>,
        gradients: Vec<ColorDefinition>,
        obstacles: Vec<(String, String)>,
        texture_size: (u32, u32),
    ) -> Result<Self, RegistryError> {
        if colors.is_empty() {
            return Err(RegistryError::EmptyColorCatalog);
        }
        if obstacles.is_empty() {
            return Err(RegistryError::EmptyObstacleCatalog);
        }

        let mut definitions = HashMap::new();
        let mut color_keys = Vec::with_capacity(colors.len());
        let mut solid_values = HashMap::new();

        for (key, definition) in colors {
            let value = match &definition.color {
                ColorValue::Solid(hex) => Rgba::parse_hex(hex),
                ColorValue::Gradient(_) => None,
            }
            .ok_or_else(|| RegistryError::InvalidHexColor {
                key: key.clone(),
                value: definition.color.css_background(),
            })?;

            solid_values.insert(key.clone(), value.to_rgb_number());
            if definitions.insert(key.clone(), definition).is_none() {
                color_keys.push(key);
            }
        }

        let mut gradient_keys = Vec::new();
        let mut textures = HashMap::new();

        for (index, definition) in gradients.into_iter().enumerate() {
            let stops = match &definition.color {
                ColorValue::Gradient(stops) if stops.len() >= 2 => stops.clone(),
                _ => {
                    log::warn!("Skipping gradient {index}: needs at least two color stops");
                    continue;
                }
            };

            let key = format!(
                "{GRADIENT_KEY_PREFIX}{}",
                definition
                    .name
                    .clone()
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| index.to_string())
            );

            let Some(parsed) = stops
                .iter()
                .map(|stop| Rgba::parse_hex(stop))
                .collect::<Option<Vec<_>>>()
            else {
                log::warn!("Skipping gradient {key}: stops must be hex colors, got {stops:?}");
                continue;
            };

            let (w, h) = texture_size;
            textures.insert(key.clone(), GradientTexture::render(&parsed, w, h));
            if definitions.insert(key.clone(), definition).is_none() {
                gradient_keys.push(key);
            }
        }

        let mut obstacle_keys = Vec::with_capacity(obstacles.len());
        let mut obstacle_urls = HashMap::new();
        for (key, url) in obstacles {
            if obstacle_urls.insert(key.clone(), url).is_none() {
                obstacle_keys.push(key);
            }
        }

        log::info!(
            "Loaded {} colors, {} gradients, {} obstacles",
            color_keys.len(),
            gradient_keys.len(),
            obstacle_keys.len()
        );

        Ok(Self {
            definitions,
            color_keys,
            gradient_keys,
            obstacle_keys,
            obstacle_urls,
            solid_values,
            textures,
            texture_size,
        })
    }

    pub fn definition(&self, color_key: &str) -> Option<&ColorDefinition> {
        self.definitions.get(color_key)
    }

    /// Packed `0xRRGGBB` for a solid colour key
    pub fn solid_value(&self, color_key: &str) -> Option<u32> {
        self.solid_values.get(color_key).copied()
    }

    pub fn texture(&self, gradient_key: &str) -> Option<&GradientTexture> {
        self.textures.get(gradient_key)
    }

    pub fn texture_size(&self) -> (u32, u32) {
        self.texture_size
    }

    pub fn obstacle_url(&self, key: &str) -> Option<&str> {
        self.obstacle_urls.get(key).map(String::as_str)
    }

    pub fn color_keys(&self) -> &[String] {
        &self.color_keys
    }

    pub fn gradient_keys(&self) -> &[String] {
        &self.gradient_keys
    }

    pub fn obstacle_keys(&self) -> &[String] {
        &self.obstacle_keys
    }

    /// The colour a run starts with
    pub fn first_color_key(&self) -> &str {
        // Non-empty by construction
        &self.color_keys[0]
    }

    pub fn random_color_key(&self, rng: &mut GameRng) -> &str {
        &self.color_keys[rng.index(self.color_keys.len())]
    }

    /// `None` when no gradient survived loading
    pub fn random_gradient_key(&self, rng: &mut GameRng) -> Option<&str> {
        if self.gradient_keys.is_empty() {
            return None;
        }
        Some(&self.gradient_keys[rng.index(self.gradient_keys.len())])
    }

    /// Random obstacle label, optionally avoiding one label
    ///
    /// The excluded label is only skipped when another label exists, so a
    /// one-entry catalog always yields its single key.
    pub fn random_obstacle_key(&self, rng: &mut GameRng, exclude: Option<&str>) -> &str {
        let keys = &self.obstacle_keys;
        let excluded = exclude.and_then(|label| keys.iter().position(|k| k == label));

        match excluded {
            Some(skip) if keys.len() > 1 => {
                let mut i = rng.index(keys.len() - 1);
                if i >= skip {
                    i += 1;
                }
                &keys[i]
            }
            _ => &keys[rng.index(keys.len())],
        }
    }

    pub fn random_shape(&self, rng: &mut GameRng) -> (u32, u32) {
        SHAPES[rng.index(SHAPES.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(obstacles: &[&str]) -> AssetRegistry {
        AssetRegistry::load_definitions(
            vec![
                ("purple".into(), ColorDefinition::solid("#9146ff", "#fff")),
                ("mint".into(), ColorDefinition::solid("#00f593", "#000")),
            ],
            vec![
                ColorDefinition::gradient(Some("dusk"), &["#ff0000", "#0000ff"], "#fff"),
                ColorDefinition::gradient(None, &["#ffffff"], "#000"),
                ColorDefinition::gradient(None, &["#000", "#fff", "#000"], "#f00"),
            ],
            obstacles
                .iter()
                .map(|k| (k.to_string(), format!("https://cdn.test/{k}.png")))
                .collect(),
            (40, 40),
        )
        .unwrap()
    }

    #[test]
    fn test_load_keeps_catalog_order() {
        let reg = registry(&["Kappa", "PogChamp"]);
        assert_eq!(reg.color_keys(), ["purple", "mint"]);
        assert_eq!(reg.first_color_key(), "purple");
        assert_eq!(reg.obstacle_keys(), ["Kappa", "PogChamp"]);
        assert_eq!(reg.obstacle_url("Kappa"), Some("https://cdn.test/Kappa.png"));
    }

    #[test]
    fn test_gradient_keys_are_synthesized() {
        let reg = registry(&["Kappa"]);
        // The single-stop gradient at index 1 is skipped, indices are not renumbered
        assert_eq!(reg.gradient_keys(), ["_gradient-dusk", "_gradient-2"]);
        assert!(reg.texture("_gradient-dusk").is_some());
        assert!(reg.texture("_gradient-1").is_none());
        assert!(reg.definition("_gradient-2").is_some());
    }

    #[test]
    fn test_solid_values_are_numeric() {
        let reg = registry(&["Kappa"]);
        assert_eq!(reg.solid_value("purple"), Some(0x9146ff));
        assert_eq!(reg.solid_value("_gradient-dusk"), None);
    }

    #[test]
    fn test_empty_catalogs_fail_fast() {
        let err = AssetRegistry::load_definitions(
            vec![],
            vec![],
            vec![("Kappa".into(), "k.png".into())],
            (40, 40),
        )
        .unwrap_err();
        assert_eq!(err, RegistryError::EmptyColorCatalog);

        let err = AssetRegistry::load_definitions(
            vec![("a".into(), ColorDefinition::solid("#fff", "#000"))],
            vec![],
            vec![],
            (40, 40),
        )
        .unwrap_err();
        assert_eq!(err, RegistryError::EmptyObstacleCatalog);
    }

    #[test]
    fn test_bad_hex_is_rejected() {
        let err = AssetRegistry::load_definitions(
            vec![("bad".into(), ColorDefinition::solid("not-a-color", "#000"))],
            vec![],
            vec![("Kappa".into(), "k.png".into())],
            (40, 40),
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidHexColor { ref key, .. } if key == "bad"));
    }

    #[test]
    fn test_gradient_with_css_stop_is_skipped() {
        let reg = AssetRegistry::load_definitions(
            vec![("purple".into(), ColorDefinition::solid("#9146ff", "#fff"))],
            vec![
                ColorDefinition::gradient(Some("named"), &["red", "#00f"], "#fff"),
                ColorDefinition::gradient(Some("dusk"), &["#f00", "#00f"], "#fff"),
            ],
            vec![("Kappa".into(), "k.png".into())],
            (40, 40),
        )
        .unwrap();
        assert_eq!(reg.gradient_keys(), ["_gradient-dusk"]);
        assert!(reg.definition("_gradient-named").is_none());
        assert!(reg.texture("_gradient-named").is_none());
    }

    #[test]
    fn test_exclusion_never_returns_excluded_key() {
        let reg = registry(&["Kappa", "PogChamp", "LUL"]);
        let mut rng = GameRng::new(3);
        for _ in 0..300 {
            assert_ne!(reg.random_obstacle_key(&mut rng, Some("PogChamp")), "PogChamp");
        }
    }

    #[test]
    fn test_exclusion_with_single_entry_does_not_underflow() {
        let reg = registry(&["Kappa"]);
        let mut rng = GameRng::new(3);
        for _ in 0..20 {
            assert_eq!(reg.random_obstacle_key(&mut rng, Some("Kappa")), "Kappa");
        }
    }

    #[test]
    fn test_unknown_exclusion_uses_full_catalog() {
        let reg = registry(&["Kappa", "LUL"]);
        let mut rng = GameRng::new(9);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(reg.random_obstacle_key(&mut rng, Some("Missing")).to_string());
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_random_shape_is_from_catalog() {
        let reg = registry(&["Kappa"]);
        let mut rng = GameRng::new(5);
        for _ in 0..100 {
            assert!(SHAPES.contains(&reg.random_shape(&mut rng)));
        }
    }

    #[test]
    fn test_display_name_strips_prefix() {
        assert_eq!(display_name("_gradient-dusk"), "dusk");
        assert_eq!(display_name("purple"), "purple");
    }

    #[test]
    fn test_css_background() {
        assert_eq!(ColorValue::Solid("#fff".into()).css_background(), "#fff");
        assert_eq!(
            ColorValue::Gradient(vec!["#f00".into(), "#00f".into()]).css_background(),
            "linear-gradient(#f00,#00f)"
        );
    }

    #[test]
    fn test_definition_json_shape() {
        let def: ColorDefinition =
            serde_json::from_str(r##"{"color":["#f00","#0f0"],"fontColor":"#fff","name":"x"}"##)
                .unwrap();
        assert_eq!(def.name.as_deref(), Some("x"));
        assert!(matches!(def.color, ColorValue::Gradient(ref s) if s.len() == 2));
    }
}

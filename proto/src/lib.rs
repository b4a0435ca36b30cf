//! Host boundary for Flappy Glitch
//!
//! JSON for everything exchanged with the embedding page, postcard for
//! compact binary copies of run results.

use std::fmt;

use game_core::{
    AssetRegistry, ColorDefinition, ColorValue, Config, RegistryError, RunResults, Snapshot, Sound,
};
use postcard::{from_bytes, to_allocvec};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum ProtoError {
    Json(serde_json::Error),
    /// An entry in one of the catalogs had the wrong shape
    InvalidEntry {
        catalog: &'static str,
        key: String,
        reason: String,
    },
    Registry(RegistryError),
    Postcard(postcard::Error),
}

impl fmt::Display for ProtoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed options: {err}"),
            Self::InvalidEntry {
                catalog,
                key,
                reason,
            } => write!(f, "{catalog} entry `{key}`: {reason}"),
            Self::Registry(err) => write!(f, "{err}"),
            Self::Postcard(err) => write!(f, "malformed record: {err}"),
        }
    }
}

impl std::error::Error for ProtoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Registry(err) => Some(err),
            Self::Postcard(_) | Self::InvalidEntry { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ProtoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<RegistryError> for ProtoError {
    fn from(err: RegistryError) -> Self {
        Self::Registry(err)
    }
}

impl From<postcard::Error> for ProtoError {
    fn from(err: postcard::Error) -> Self {
        Self::Postcard(err)
    }
}

// ============================================================================
// Init options (page -> game)
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInitOptions {
    #[serde(default)]
    color_map: Map<String, Value>,
    #[serde(default)]
    gradient_map: Vec<ColorDefinition>,
    #[serde(default)]
    emote_map: Map<String, Value>,
    #[serde(default)]
    assets_base_url: Option<String>,
    #[serde(default)]
    container_id: Option<String>,
    #[serde(default)]
    config: Config,
    #[serde(default)]
    seed: Option<u64>,
}

/// Options the page passes when starting the game
///
/// Catalog order follows the page's JSON objects; the first colour is the
/// one a run starts with.
#[derive(Debug, Clone, PartialEq)]
pub struct InitOptions {
    pub colors: Vec<(String, ColorDefinition)>,
    pub gradients: Vec<ColorDefinition>,
    pub obstacles: Vec<(String, String)>,
    pub assets_base_url: Option<String>,
    pub container_id: Option<String>,
    pub config: Config,
    pub seed: Option<u64>,
}

impl InitOptions {
    pub fn from_json(json: &str) -> Result<Self, ProtoError> {
        let raw: RawInitOptions = serde_json::from_str(json)?;

        let colors = raw
            .color_map
            .into_iter()
            .map(|(key, value)| {
                serde_json::from_value::<ColorDefinition>(value)
                    .map(|definition| (key.clone(), definition))
                    .map_err(|err| ProtoError::InvalidEntry {
                        catalog: "colorMap",
                        key,
                        reason: err.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let obstacles = raw
            .emote_map
            .into_iter()
            .map(|(key, value)| match value {
                Value::String(url) => Ok((key, url)),
                other => Err(ProtoError::InvalidEntry {
                    catalog: "emoteMap",
                    key,
                    reason: format!("expected an image URL, got {other}"),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            colors,
            gradients: raw.gradient_map,
            obstacles,
            assets_base_url: raw.assets_base_url,
            container_id: raw.container_id,
            config: raw.config,
            seed: raw.seed,
        })
    }

    /// Build the asset registry; gradient textures match the pickup size
    pub fn registry(&self) -> Result<AssetRegistry, ProtoError> {
        let texture_size = (
            self.config.pickup_width.max(1.0) as u32,
            self.config.pickup_height.max(1.0) as u32,
        );
        let registry = AssetRegistry::load_definitions(
            self.colors.clone(),
            self.gradients.clone(),
            self.obstacles.clone(),
            texture_size,
        )?;
        Ok(registry)
    }

    pub fn asset_manifest(&self) -> AssetManifest {
        AssetManifest::new(self.assets_base_url.as_deref(), &self.obstacles)
    }
}

// ============================================================================
// Asset manifest
// ============================================================================

/// Normalise a base URL to end in exactly one slash; `/` when absent
pub fn normalize_base_url(base: Option<&str>) -> String {
    match base {
        Some(base) if !base.is_empty() => format!("{}/", base.trim_end_matches('/')),
        _ => "/".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundAsset {
    pub sound: Sound,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    pub key: String,
    pub url: String,
}

/// Everything the page has to fetch before the first run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetManifest {
    pub base_url: String,
    pub player: String,
    pub sounds: Vec<SoundAsset>,
    /// Obstacle images, used exactly as the page gave them
    pub obstacles: Vec<ImageAsset>,
}

impl AssetManifest {
    pub fn new(base_url: Option<&str>, obstacles: &[(String, String)]) -> Self {
        let base_url = normalize_base_url(base_url);
        let sounds = [Sound::Hit, Sound::Jump, Sound::Pickup]
            .into_iter()
            .map(|sound| SoundAsset {
                sound,
                url: format!("{base_url}sounds/{}.mp3", sound.as_str()),
            })
            .collect();

        Self {
            player: format!("{base_url}images/glitch.png"),
            sounds,
            obstacles: obstacles
                .iter()
                .map(|(key, url)| ImageAsset {
                    key: key.clone(),
                    url: url.clone(),
                })
                .collect(),
            base_url,
        }
    }

    pub fn sound_url(&self, sound: Sound) -> Option<&str> {
        self.sounds
            .iter()
            .find(|asset| asset.sound == sound)
            .map(|asset| asset.url.as_str())
    }
}

// ============================================================================
// Results (game -> page)
// ============================================================================

pub fn results_to_json(results: &RunResults) -> Result<String, ProtoError> {
    Ok(serde_json::to_string(results)?)
}

pub fn definition_to_json(definition: &ColorDefinition) -> Result<String, ProtoError> {
    Ok(serde_json::to_string(definition)?)
}

pub fn snapshot_to_json(snapshot: &Snapshot) -> Result<String, ProtoError> {
    Ok(serde_json::to_string(snapshot)?)
}

/// Colour value with an explicit tag, for non-self-describing formats
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordColor {
    Solid(String),
    Gradient(Vec<String>),
}

/// Compact binary copy of [`RunResults`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsRecord {
    pub score: u64,
    pub highscore: u64,
    pub emote: Option<String>,
    pub color_name: Option<String>,
    pub font_color: Option<String>,
    pub color: Option<RecordColor>,
}

impl From<&RunResults> for ResultsRecord {
    fn from(results: &RunResults) -> Self {
        Self {
            score: results.score,
            highscore: results.highscore,
            emote: results.emote.clone(),
            color_name: results.color.name.clone(),
            font_color: results.color.font_color.clone(),
            color: results.color.value.as_ref().map(|value| match value {
                ColorValue::Solid(hex) => RecordColor::Solid(hex.clone()),
                ColorValue::Gradient(stops) => RecordColor::Gradient(stops.clone()),
            }),
        }
    }
}

impl From<ResultsRecord> for RunResults {
    fn from(record: ResultsRecord) -> Self {
        let mut results = RunResults {
            score: record.score,
            highscore: record.highscore,
            emote: record.emote,
            ..Default::default()
        };
        results.color.name = record.color_name;
        results.color.font_color = record.font_color;
        results.color.value = record.color.map(|color| match color {
            RecordColor::Solid(hex) => ColorValue::Solid(hex),
            RecordColor::Gradient(stops) => ColorValue::Gradient(stops),
        });
        results
    }
}

impl ResultsRecord {
    /// Serialize to postcard bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtoError> {
        Ok(to_allocvec(self)?)
    }

    /// Deserialize from postcard bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtoError> {
        Ok(from_bytes(bytes)?)
    }
}

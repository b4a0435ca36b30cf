//! Host boundary
//!
//! Everything the simulation tells the embedding page goes through the
//! [`Host`] trait, synchronously with the event that caused it.

use serde::{Deserialize, Serialize};

use crate::assets::{ColorDefinition, ColorValue};

/// Sound cues; mixing and playback belong to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sound {
    Jump,
    Pickup,
    Hit,
}

impl Sound {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sound::Jump => "jump",
            Sound::Pickup => "pickup",
            Sound::Hit => "hit",
        }
    }
}

/// A presentation change to apply to the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationUpdate {
    /// Make `layer` the visible background with this CSS value
    Background { layer: usize, css: String },
    /// Reset every background layer to the default
    ClearBackgrounds { css: String },
    /// Score text; `None` clears it
    ScoreText(Option<String>),
    /// Colour label and the font colour for both text elements
    ColorText {
        text: String,
        font_color: Option<String>,
    },
    ClearColorText,
}

/// Colour part of the run results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultColor {
    pub name: Option<String>,
    pub font_color: Option<String>,
    pub value: Option<ColorValue>,
}

/// Reported once when a run ends
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResults {
    pub score: u64,
    pub highscore: u64,
    pub emote: Option<String>,
    pub color: ResultColor,
}

impl RunResults {
    pub fn new(
        score: u64,
        highscore: u64,
        emote: Option<String>,
        color_key: Option<&str>,
        definition: Option<&ColorDefinition>,
    ) -> Self {
        Self {
            score,
            highscore,
            emote,
            color: ResultColor {
                name: color_key.map(str::to_string),
                font_color: definition.and_then(|d| d.font_color.clone()),
                value: definition.map(|d| d.color.clone()),
            },
        }
    }
}

/// Callbacks into the embedding page
///
/// Every method defaults to a no-op so hosts only implement what they use.
pub trait Host {
    /// Assets are ready and the first run is waiting for input
    fn on_load(&mut self) {}

    /// The player collected a pickup of this colour
    fn on_collect(&mut self, _definition: &ColorDefinition) {}

    /// The run is over; fired exactly once per run
    fn on_done(&mut self, _results: &RunResults) {}

    fn play_sound(&mut self, _sound: Sound, _volume: f32) {}

    fn present(&mut self, _update: &PresentationUpdate) {}

    /// Whether the host wants to be told about the end of a run. When false
    /// the session restarts straight into Start instead of halting.
    fn reports_results(&self) -> bool {
        true
    }
}

/// Host that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl Host for NullHost {
    fn reports_results(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_json_shape() {
        let def = ColorDefinition::solid("#9146ff", "#fff");
        let results = RunResults::new(550, 550, Some("Kappa".into()), Some("purple"), Some(&def));
        let json = serde_json::to_value(&results).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "score": 550,
                "highscore": 550,
                "emote": "Kappa",
                "color": { "name": "purple", "fontColor": "#fff", "value": "#9146ff" }
            })
        );
    }

    #[test]
    fn test_results_without_color_are_null() {
        let results = RunResults::new(0, 10, None, None, None);
        let json = serde_json::to_value(&results).unwrap();
        assert_eq!(json["emote"], serde_json::Value::Null);
        assert_eq!(json["color"]["name"], serde_json::Value::Null);
        assert_eq!(json["color"]["value"], serde_json::Value::Null);
    }

    #[test]
    fn test_gradient_value_is_an_array() {
        let def = ColorDefinition::gradient(Some("dusk"), &["#f00", "#00f"], "#fff");
        let results = RunResults::new(0, 0, None, Some("_gradient-dusk"), Some(&def));
        let json = serde_json::to_value(&results).unwrap();
        assert_eq!(json["color"]["value"], serde_json::json!(["#f00", "#00f"]));
    }
}

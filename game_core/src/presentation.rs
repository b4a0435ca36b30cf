use crate::assets::{display_name, ColorDefinition};
use crate::host::PresentationUpdate;
use crate::params::Params;

/// Alternating background layers for crossfading colour changes
#[derive(Debug, Clone)]
pub struct Backdrop {
    active: usize,
    layers: usize,
}

impl Backdrop {
    pub fn new() -> Self {
        Self {
            active: 0,
            layers: Params::BACKGROUND_LAYERS,
        }
    }

    pub fn active_layer(&self) -> usize {
        self.active
    }

    /// Swap to the next layer and paint it with this colour
    pub fn recolor(&mut self, color_key: &str, definition: &ColorDefinition) -> [PresentationUpdate; 2] {
        self.active = (self.active + 1) % self.layers;
        [
            PresentationUpdate::Background {
                layer: self.active,
                css: definition.color.css_background(),
            },
            PresentationUpdate::ColorText {
                text: display_name(color_key).to_string(),
                font_color: definition.font_color.clone(),
            },
        ]
    }

    /// Updates that put the page back to its state before a run
    pub fn reset(&self) -> [PresentationUpdate; 3] {
        [
            PresentationUpdate::ClearBackgrounds {
                css: Params::DEFAULT_BACKGROUND.to_string(),
            },
            PresentationUpdate::ScoreText(None),
            PresentationUpdate::ClearColorText,
        ]
    }
}

impl Default for Backdrop {
    fn default() -> Self {
        Self::new()
    }
}

pub fn score_text(score: u64) -> PresentationUpdate {
    PresentationUpdate::ScoreText(Some(score.to_string()))
}

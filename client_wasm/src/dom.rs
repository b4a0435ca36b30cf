//! DOM-backed host: score and colour text, crossfading backgrounds,
//! sound cues and the page callbacks.

use std::cell::RefCell;
use std::rc::Rc;

use game_core::{ColorDefinition, Host, PresentationUpdate, RunResults, Sound};
use js_sys::Function;
use proto::AssetManifest;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlAudioElement, HtmlElement};

/// Page callbacks passed to `start_flappy_glitch`
#[derive(Default)]
pub struct Callbacks {
    pub on_load: Option<Function>,
    pub on_collect: Option<Function>,
    pub on_done: Option<Function>,
}

pub struct DomHost {
    score: HtmlElement,
    color: HtmlElement,
    backgrounds: Vec<HtmlElement>,
    sounds: Vec<(Sound, HtmlAudioElement)>,
    callbacks: Callbacks,
    last_results: Rc<RefCell<Option<RunResults>>>,
}

fn create_div(document: &Document, classes: &[&str]) -> Result<HtmlElement, JsValue> {
    let element = document.create_element("div")?.dyn_into::<HtmlElement>()?;
    for class in classes {
        element.class_list().add_1(class)?;
    }
    Ok(element)
}

fn call_with_json(callback: Option<&Function>, json: Result<String, proto::ProtoError>) {
    let Some(callback) = callback else {
        return;
    };

    let arg = match json.map_err(|e| JsValue::from_str(&e.to_string())) {
        Ok(json) => js_sys::JSON::parse(&json),
        Err(e) => Err(e),
    };

    match arg {
        Ok(arg) => {
            if let Err(e) = callback.call1(&JsValue::NULL, &arg) {
                log::error!("Page callback threw: {e:?}");
            }
        }
        Err(e) => log::error!("Failed to encode callback argument: {e:?}"),
    }
}

impl DomHost {
    /// Append the text and background elements to the container
    pub fn mount(
        document: &Document,
        container_id: &str,
        manifest: &AssetManifest,
        callbacks: Callbacks,
        last_results: Rc<RefCell<Option<RunResults>>>,
    ) -> Result<Self, JsValue> {
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| JsValue::from_str(&format!("No element with id `{container_id}`")))?;

        let score = create_div(document, &["game-text", "score-text"])?;
        container.append_child(&score)?;

        let color = create_div(document, &["game-text", "color-text"])?;
        container.append_child(&color)?;

        let mut backgrounds = Vec::with_capacity(game_core::Params::BACKGROUND_LAYERS);
        for _ in 0..game_core::Params::BACKGROUND_LAYERS {
            let background = create_div(document, &["game-background"])?;
            container.append_child(&background)?;
            backgrounds.push(background);
        }
        if let Some(first) = backgrounds.first() {
            first.class_list().add_1("active")?;
        }

        let sounds = manifest
            .sounds
            .iter()
            .map(|asset| HtmlAudioElement::new_with_src(&asset.url).map(|audio| (asset.sound, audio)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            score,
            color,
            backgrounds,
            sounds,
            callbacks,
            last_results,
        })
    }

    fn set_font_color(&self, font_color: &str) -> Result<(), JsValue> {
        self.score.style().set_property("color", font_color)?;
        self.color.style().set_property("color", font_color)
    }

    fn apply(&self, update: &PresentationUpdate) -> Result<(), JsValue> {
        match update {
            PresentationUpdate::Background { layer, css } => {
                for background in &self.backgrounds {
                    background.class_list().remove_1("active")?;
                }
                if let Some(background) = self.backgrounds.get(*layer) {
                    background.class_list().add_1("active")?;
                    background.style().set_property("background", css)?;
                }
            }
            PresentationUpdate::ClearBackgrounds { css } => {
                for background in &self.backgrounds {
                    background.style().set_property("background", css)?;
                }
            }
            PresentationUpdate::ScoreText(text) => {
                self.score.set_inner_text(text.as_deref().unwrap_or(""));
            }
            PresentationUpdate::ColorText { text, font_color } => {
                self.color.set_inner_text(text);
                if let Some(font_color) = font_color {
                    self.set_font_color(font_color)?;
                }
            }
            PresentationUpdate::ClearColorText => self.color.set_inner_text(""),
        }
        Ok(())
    }
}

impl Host for DomHost {
    fn on_load(&mut self) {
        if let Some(on_load) = &self.callbacks.on_load {
            if let Err(e) = on_load.call0(&JsValue::NULL) {
                log::error!("onLoad threw: {e:?}");
            }
        }
    }

    fn on_collect(&mut self, definition: &ColorDefinition) {
        call_with_json(
            self.callbacks.on_collect.as_ref(),
            proto::definition_to_json(definition),
        );
    }

    fn on_done(&mut self, results: &RunResults) {
        *self.last_results.borrow_mut() = Some(results.clone());
        call_with_json(
            self.callbacks.on_done.as_ref(),
            proto::results_to_json(results),
        );
    }

    fn play_sound(&mut self, sound: Sound, volume: f32) {
        let Some((_, audio)) = self.sounds.iter().find(|(s, _)| *s == sound) else {
            return;
        };
        audio.set_volume(f64::from(volume));
        audio.set_current_time(0.0);
        // Autoplay may be blocked until the first user gesture
        if let Err(e) = audio.play() {
            log::debug!("Could not play {}: {e:?}", sound.as_str());
        }
    }

    fn present(&mut self, update: &PresentationUpdate) {
        if let Err(e) = self.apply(update) {
            log::warn!("Failed to apply {update:?}: {e:?}");
        }
    }

    fn reports_results(&self) -> bool {
        true
    }
}

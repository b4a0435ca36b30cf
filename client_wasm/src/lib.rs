//! Browser bridge for Flappy Glitch
//!
//! The page owns the render loop and calls [`frame`] once per animation
//! frame; everything else is event-driven.

#![cfg(target_arch = "wasm32")]

mod dom;
mod input;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use dom::{Callbacks, DomHost};
use game_core::{Launch, Launcher, RestartRequest, RunResults, Session, Viewport};
use js_sys::Function;
use proto::{InitOptions, ResultsRecord};
use wasm_bindgen::prelude::*;
use web_sys::KeyboardEvent;

thread_local! {
    /// Restarts asked for from inside a game callback
    static RESTART: RestartRequest = RestartRequest::new();
    static LAUNCHER: RefCell<Launcher> =
        RefCell::new(Launcher::with_restart_request(RESTART.with(RestartRequest::clone)));
    static LAST_RESULTS: Rc<RefCell<Option<RunResults>>> = Rc::new(RefCell::new(None));
}

static INIT: Once = Once::new();

fn init_logging() {
    INIT.call_once(|| {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already installed".into());
        }
    });
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn random_seed() -> u64 {
    let mut bytes = [0u8; 8];
    match getrandom::getrandom(&mut bytes) {
        Ok(()) => u64::from_le_bytes(bytes),
        Err(_) => js_sys::Date::now() as u64,
    }
}

/// Size of the container the game fills
fn container_viewport(document: &web_sys::Document, container_id: &str) -> Viewport {
    document
        .get_element_by_id(container_id)
        .map(|el| Viewport::new(el.client_width() as f32, el.client_height() as f32))
        .unwrap_or(Viewport::new(0.0, 0.0))
}

fn build_session(options: &InitOptions, callbacks: Callbacks) -> Result<Session, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document"))?;
    let container_id = options
        .container_id
        .as_deref()
        .ok_or_else(|| JsValue::from_str("containerId is required"))?;

    let registry = options.registry().map_err(js_error)?;
    let manifest = options.asset_manifest();
    let host = DomHost::mount(
        &document,
        container_id,
        &manifest,
        callbacks,
        LAST_RESULTS.with(Rc::clone),
    )?;

    Session::new(
        options.config.clone(),
        registry,
        container_viewport(&document, container_id),
        options.seed.unwrap_or_else(random_seed),
        Box::new(host),
    )
    .map_err(js_error)
}

/// Mount the game, or restart it if it is already mounted
///
/// `options_json` carries `containerId`, `assetsBaseUrl`, `colorMap`,
/// `gradientMap`, `emoteMap` and optional `config` overrides and `seed`.
#[wasm_bindgen]
pub fn start_flappy_glitch(
    options_json: &str,
    on_load: Option<Function>,
    on_collect: Option<Function>,
    on_done: Option<Function>,
) -> Result<(), JsValue> {
    init_logging();

    LAUNCHER.with(|launcher| {
        let Ok(mut launcher) = launcher.try_borrow_mut() else {
            // Called back from inside a frame; restart once it finishes
            RESTART.with(RestartRequest::request);
            return Ok(());
        };

        let outcome = launcher.launch(|| {
            let options = InitOptions::from_json(options_json).map_err(js_error)?;
            let callbacks = Callbacks {
                on_load,
                on_collect,
                on_done,
            };
            build_session(&options, callbacks)
        });

        match outcome? {
            Launch::Created => log::info!("Flappy Glitch mounted"),
            Launch::Restarted => log::info!("Flappy Glitch restarted"),
        }
        Ok(())
    })
}

fn with_session<R>(f: impl FnOnce(&mut Session) -> R) -> Result<R, JsValue> {
    LAUNCHER.with(|launcher| {
        let mut launcher = launcher
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("Game is busy"))?;
        launcher
            .session_mut()
            .map(f)
            .ok_or_else(|| JsValue::from_str("Game not started"))
    })
}

/// Advance the game by `dt` seconds
#[wasm_bindgen]
pub fn frame(dt: f32) -> Result<(), JsValue> {
    LAUNCHER.with(|launcher| {
        let mut launcher = launcher
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("Game is busy"))?;
        if !launcher.is_mounted() {
            return Err(JsValue::from_str("Game not started"));
        }
        launcher.step(dt);
        Ok(())
    })
}

#[wasm_bindgen]
pub fn jump() -> Result<(), JsValue> {
    with_session(Session::jump)
}

/// Feed a keydown event; returns true when the game used it
#[wasm_bindgen]
pub fn key_down(event: KeyboardEvent) -> Result<bool, JsValue> {
    if !input::jump_pressed(&event) {
        return Ok(false);
    }
    with_session(Session::jump)?;
    Ok(true)
}

#[wasm_bindgen]
pub fn resize(width: f32, height: f32) -> Result<(), JsValue> {
    with_session(|session| session.resize(width, height))
}

/// Back to the start screen, keeping the highscore
///
/// Safe to call from `onDone`; inside a frame the restart runs once the
/// frame returns.
#[wasm_bindgen]
pub fn restart() -> Result<(), JsValue> {
    LAUNCHER.with(|launcher| {
        let Ok(mut launcher) = launcher.try_borrow_mut() else {
            RESTART.with(RestartRequest::request);
            return Ok(());
        };
        if launcher.restart() {
            Ok(())
        } else {
            Err(JsValue::from_str("Game not started"))
        }
    })
}

/// Live entities for the page's renderer, as JSON
#[wasm_bindgen]
pub fn snapshot_json() -> Result<String, JsValue> {
    let snapshot = with_session(|session| session.snapshot())?;
    proto::snapshot_to_json(&snapshot).map_err(js_error)
}

/// Results of the last finished run as compact bytes, if any
#[wasm_bindgen]
pub fn last_results_bytes() -> Result<Option<Vec<u8>>, JsValue> {
    LAST_RESULTS.with(|last| {
        last.borrow()
            .as_ref()
            .map(|results| ResultsRecord::from(results).to_bytes().map_err(js_error))
            .transpose()
    })
}

/// Decode bytes from [`last_results_bytes`] back into results JSON
#[wasm_bindgen]
pub fn results_from_bytes(bytes: &[u8]) -> Result<String, JsValue> {
    let record = ResultsRecord::from_bytes(bytes).map_err(js_error)?;
    proto::results_to_json(&RunResults::from(record)).map_err(js_error)
}

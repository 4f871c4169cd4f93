//! Browser host bindings
//!
//! JavaScript owns the DOM (canvas drawing, file browser, overlays) and
//! forwards keyboard and click events here. Frames come from
//! `requestAnimationFrame` through [`RafScheduler`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::audio::WebAudio;
use crate::game::Game;
use crate::platform::{FrameHandle, FrameScheduler, Key};
use crate::settings::Settings;

type WebSession = Game<RafScheduler, WebAudio>;

/// Frame scheduler backed by `requestAnimationFrame`
pub struct RafScheduler {
    game: Weak<RefCell<WebSession>>,
    next_id: u32,
    /// (our handle, browser request id)
    pending: Option<(FrameHandle, i32)>,
}

impl RafScheduler {
    fn new(game: Weak<RefCell<WebSession>>) -> Self {
        Self {
            game,
            next_id: 0,
            pending: None,
        }
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id = self.next_id.wrapping_add(1);
        let handle = FrameHandle(self.next_id);
        let game = self.game.clone();
        let callback = Closure::once_into_js(move |time: f64| {
            if let Some(game) = game.upgrade() {
                game.borrow_mut().on_frame(handle, time);
            }
        });
        let request = web_sys::window()
            .ok_or_else(|| JsValue::from_str("no window"))
            .and_then(|w| w.request_animation_frame(callback.unchecked_ref()));
        match request {
            Ok(id) => self.pending = Some((handle, id)),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Some((pending, id)) = self.pending {
            if pending == handle {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(id);
                }
                self.pending = None;
            }
        }
    }
}

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
    log::info!("Ritual Runner loaded");
}

/// Handle held by the page script
#[wasm_bindgen]
pub struct WebGame {
    inner: Rc<RefCell<WebSession>>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let inner = Rc::new_cyclic(|weak| {
            let audio = WebAudio::new(&settings, seed);
            RefCell::new(Game::new(
                settings.clone(),
                RafScheduler::new(weak.clone()),
                audio,
            ))
        });
        log::info!("Session created (seed {})", seed);
        WebGame { inner }
    }

    pub fn start(&self) -> bool {
        self.inner.borrow_mut().start()
    }

    #[wasm_bindgen(js_name = togglePause)]
    pub fn toggle_pause(&self) -> bool {
        self.inner.borrow_mut().toggle_pause()
    }

    pub fn reset(&self) {
        self.inner.borrow_mut().reset();
    }

    /// `KeyboardEvent.key` and `KeyboardEvent.repeat`
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&self, key: &str, repeat: bool) {
        if let Some(key) = Key::from_dom_key(key) {
            self.inner.borrow_mut().key_down(key, repeat);
        }
    }

    #[wasm_bindgen(js_name = keyUp)]
    pub fn key_up(&self, key: &str) {
        if let Some(key) = Key::from_dom_key(key) {
            self.inner.borrow_mut().key_up(key);
        }
    }

    /// Delete a file; rejects with the reason on failure
    #[wasm_bindgen(js_name = deleteFile)]
    pub fn delete_file(&self, path: &str) -> Result<(), JsValue> {
        self.inner
            .borrow_mut()
            .delete_resource(path, js_sys::Date::now())
            .map(|_| ())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Play out the final fade once frames have stopped
    #[wasm_bindgen(js_name = fadeTick)]
    pub fn fade_tick(&self, dt: f32) {
        self.inner.borrow_mut().fade_tick(dt);
    }

    /// World snapshot for the renderer, as JSON
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.inner.borrow().world())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Remaining file tree, as JSON
    #[wasm_bindgen(js_name = fileTree)]
    pub fn file_tree(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.inner.borrow().vfs().root())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Deletion log, newest first, as JSON
    pub fn journal(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.inner.borrow().journal().entries())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn progress(&self) -> f32 {
        self.inner.borrow().progress()
    }

    /// Latest overlay message, if any
    pub fn overlay(&self) -> Option<String> {
        self.inner.borrow().overlay().map(str::to_string)
    }

    #[wasm_bindgen(js_name = resolveImage)]
    pub fn resolve_image(&self, resource_id: &str) -> String {
        self.inner.borrow().assets().resolve_image(resource_id).to_string()
    }

    #[wasm_bindgen(js_name = setSettings)]
    pub fn set_settings(&self, json: &str) {
        self.inner
            .borrow_mut()
            .update_settings(Settings::from_json(json));
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}

//! WASM bindings for the ReefTag player.
//!
//! Wraps `reeftag::VideoPlayer` around a page's `<video>` element. The page
//! forwards pointer, resize and media events; the player reports back
//! through a single event listener callback.

mod escape;
mod media;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use futures::future::{FutureExt, LocalBoxFuture};
use reeftag::config::load_player_config_json;
use reeftag::logging::{log_from_host, LogLevel};
use reeftag::{
    fetch_suggestions, Annotator, CapturedFrame, InMemoryTagStore, PlayerEvent, ReefTagError,
    ReefTagResult, SuggestionService, Tag, TagSession, VideoPlayer,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlVideoElement;

pub use escape::WindowEscapeHook;
pub use media::HtmlMediaAdapter;

/// Initialize panic hook and logging for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("[ReefTag] WASM module initialized");
}

/// Replace the player configuration from a JSON object string.
#[wasm_bindgen(js_name = setPlayerConfig)]
pub fn set_player_config(json: &str) -> Result<(), JsValue> {
    load_player_config_json(json).map(|_| ()).map_err(js_error)
}

/// Forward a page log line into the Rust log pipeline.
#[wasm_bindgen(js_name = logFromHost)]
pub fn log_from_page(level: &str, source: &str, message: &str) {
    let level = level.parse().unwrap_or(LogLevel::Info);
    log_from_host(level, source, message);
}

fn js_error(err: ReefTagError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

struct Shared {
    player: VideoPlayer<HtmlMediaAdapter>,
    listener: Option<js_sys::Function>,
}

/// Deliver events after the player borrow is released so listeners may call
/// back into the player.
fn dispatch(listener: Option<js_sys::Function>, events: Vec<PlayerEvent>) {
    let Some(listener) = listener else {
        return;
    };
    for event in events {
        let value = match to_js(&event) {
            Ok(value) => value,
            Err(e) => {
                log::error!("[PLAYER] Failed to serialize event: {:?}", e);
                continue;
            }
        };
        if let Err(e) = listener.call1(&JsValue::NULL, &value) {
            log::warn!("[PLAYER] Event listener threw: {:?}", e);
        }
    }
}

fn with_shared<R>(
    shared: &Rc<RefCell<Shared>>,
    f: impl FnOnce(&mut VideoPlayer<HtmlMediaAdapter>) -> R,
) -> R {
    let (result, events, listener) = {
        let mut shared = shared.borrow_mut();
        let result = f(&mut shared.player);
        let events = shared.player.drain_events();
        (result, events, shared.listener.clone())
    };
    dispatch(listener, events);
    result
}

fn escape_pressed(shared: &Weak<RefCell<Shared>>) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    // Escape while the page is inside a player call; nothing to do
    if shared.try_borrow_mut().is_err() {
        return;
    }
    with_shared(&shared, |player| player.handle_escape());
}

/// Suggestion service backed by a page function `(dataUrl) => Promise<string[]>`.
struct JsSuggestionService {
    callback: js_sys::Function,
}

impl SuggestionService for JsSuggestionService {
    fn suggest<'a>(
        &'a self,
        frame: &'a CapturedFrame,
    ) -> LocalBoxFuture<'a, ReefTagResult<Vec<String>>> {
        async move {
            let value = self
                .callback
                .call1(&JsValue::NULL, &JsValue::from_str(&frame.data_url))
                .map_err(|e| ReefTagError::SuggestionFailed(format!("{:?}", e)))?;
            let value = JsFuture::from(js_sys::Promise::resolve(&value))
                .await
                .map_err(|e| ReefTagError::SuggestionFailed(format!("{:?}", e)))?;
            serde_wasm_bindgen::from_value::<Vec<String>>(value)
                .map_err(|e| ReefTagError::SuggestionFailed(e.to_string()))
        }
        .boxed_local()
    }
}

/// Player bound to one `<video>` element.
#[wasm_bindgen]
pub struct WasmVideoPlayer {
    shared: Rc<RefCell<Shared>>,
}

impl WasmVideoPlayer {
    fn with_player<R>(&self, f: impl FnOnce(&mut VideoPlayer<HtmlMediaAdapter>) -> R) -> R {
        with_shared(&self.shared, f)
    }
}

#[wasm_bindgen]
impl WasmVideoPlayer {
    #[wasm_bindgen(constructor)]
    pub fn new(video_id: String, video: HtmlVideoElement) -> Result<WasmVideoPlayer, JsValue> {
        let window = web_sys::window().ok_or("No window")?;
        let media = HtmlMediaAdapter::new(video)?;

        let shared = Rc::new_cyclic(|weak: &Weak<RefCell<Shared>>| {
            let weak = weak.clone();
            let hook = WindowEscapeHook::new(window, move || escape_pressed(&weak));
            RefCell::new(Shared {
                player: VideoPlayer::new(video_id, media, Box::new(hook)),
                listener: None,
            })
        });
        Ok(WasmVideoPlayer { shared })
    }

    /// Receive `PlayerEvent` objects.
    #[wasm_bindgen(js_name = setEventListener)]
    pub fn set_event_listener(&self, listener: Option<js_sys::Function>) {
        self.shared.borrow_mut().listener = listener;
    }

    pub fn mode(&self) -> Result<JsValue, JsValue> {
        to_js(self.shared.borrow().player.mode())
    }

    pub fn transport(&self) -> Result<JsValue, JsValue> {
        to_js(&self.shared.borrow().player.transport())
    }

    /// Markers for the given tags, back to front.
    pub fn markers(&self, tags: JsValue) -> Result<JsValue, JsValue> {
        let tags: Vec<Tag> = serde_wasm_bindgen::from_value(tags)?;
        to_js(&self.shared.borrow().player.markers(&tags))
    }

    // Pointer

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&self, x: f64, y: f64) {
        self.with_player(|p| p.pointer_move(x, y));
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&self) {
        self.with_player(|p| p.pointer_leave());
    }

    pub fn click(&self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        let outcome = self.with_player(|p| p.click(x, y));
        to_js(&outcome)
    }

    // Selection

    pub fn cancel(&self) -> bool {
        self.with_player(|p| p.cancel())
    }

    #[wasm_bindgen(js_name = commitDraft)]
    pub fn commit_draft(&self, text: &str, annotator: JsValue) -> Result<JsValue, JsValue> {
        let annotator: Annotator = serde_wasm_bindgen::from_value(annotator)?;
        let tag = self
            .with_player(|p| p.commit_draft(text, &annotator))
            .map_err(js_error)?;
        to_js(&tag)
    }

    #[wasm_bindgen(js_name = selectTag)]
    pub fn select_tag(&self, tag: JsValue) -> Result<(), JsValue> {
        let tag: Tag = serde_wasm_bindgen::from_value(tag)?;
        self.with_player(|p| p.select_tag(tag)).map_err(js_error)
    }

    #[wasm_bindgen(js_name = captureFrame)]
    pub fn capture_frame(&self) -> Result<JsValue, JsValue> {
        let frame = self
            .with_player(|p| p.capture_frame())
            .map_err(js_error)?;
        to_js(&frame)
    }

    /// Capture the draft's frame and ask `service` for labels.
    ///
    /// Resolves to a `SuggestionResult`, or `null` when the draft was
    /// cancelled or replaced before the service answered.
    #[wasm_bindgen(js_name = requestSuggestions)]
    pub fn request_suggestions(&self, service: js_sys::Function) -> js_sys::Promise {
        let begun = self.with_player(|p| p.begin_suggestions());
        let shared = self.shared.clone();

        wasm_bindgen_futures::future_to_promise(async move {
            let (ticket, frame) = begun.map_err(js_error)?;
            let service = JsSuggestionService { callback: service };
            let result = fetch_suggestions(&service, &frame).await;

            match with_shared(&shared, |p| p.finish_suggestions(ticket, result)) {
                Some(result) => to_js(&result),
                None => Ok(JsValue::NULL),
            }
        })
    }

    // Transport

    pub fn play(&self) {
        self.with_player(|p| p.play());
    }

    pub fn pause(&self) {
        self.with_player(|p| p.pause());
    }

    #[wasm_bindgen(js_name = togglePlayback)]
    pub fn toggle_playback(&self) {
        self.with_player(|p| p.toggle_playback());
    }

    pub fn seek(&self, seconds: f64) -> f64 {
        self.with_player(|p| p.seek(seconds))
    }

    #[wasm_bindgen(js_name = skipForward)]
    pub fn skip_forward(&self) -> f64 {
        self.with_player(|p| p.skip_forward())
    }

    #[wasm_bindgen(js_name = skipBack)]
    pub fn skip_back(&self) -> f64 {
        self.with_player(|p| p.skip_back())
    }

    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&self, volume: f64) {
        self.with_player(|p| p.set_volume(volume));
    }

    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&self) {
        self.with_player(|p| p.toggle_mute());
    }

    // Layout and media element events

    #[wasm_bindgen(js_name = onResize)]
    pub fn on_resize(&self, width: f64, height: f64) {
        self.with_player(|p| p.on_resize(width, height));
    }

    #[wasm_bindgen(js_name = beginFullscreenTransition)]
    pub fn begin_fullscreen_transition(&self) {
        self.with_player(|p| p.begin_fullscreen_transition());
    }

    #[wasm_bindgen(js_name = onFullscreenChange)]
    pub fn on_fullscreen_change(&self, width: f64, height: f64) {
        self.with_player(|p| p.on_fullscreen_change(width, height));
    }

    #[wasm_bindgen(js_name = onLoadedMetadata)]
    pub fn on_loaded_metadata(&self) {
        self.with_player(|p| p.on_loaded_metadata());
    }

    #[wasm_bindgen(js_name = onTimeUpdate)]
    pub fn on_time_update(&self) {
        self.with_player(|p| p.on_time_update());
    }

    #[wasm_bindgen(js_name = onPlay)]
    pub fn on_play(&self) {
        self.with_player(|p| p.on_play());
    }

    #[wasm_bindgen(js_name = onPause)]
    pub fn on_pause(&self) {
        self.with_player(|p| p.on_pause());
    }

    #[wasm_bindgen(js_name = onSeeked)]
    pub fn on_seeked(&self) {
        self.with_player(|p| p.on_seeked());
    }

    #[wasm_bindgen(js_name = onVolumeChange)]
    pub fn on_volume_change(&self) {
        self.with_player(|p| p.on_volume_change());
    }
}

/// Tags for the video on screen, kept in page memory until submitted.
#[wasm_bindgen]
pub struct WasmTagSession {
    session: TagSession,
    store: InMemoryTagStore,
}

#[wasm_bindgen]
impl WasmTagSession {
    #[wasm_bindgen(constructor)]
    pub fn new(video_id: String, annotator: JsValue) -> Result<WasmTagSession, JsValue> {
        let annotator: Annotator = serde_wasm_bindgen::from_value(annotator)?;
        Ok(WasmTagSession {
            session: TagSession::new(video_id, annotator),
            store: InMemoryTagStore::new(),
        })
    }

    pub fn tags(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.tags())
    }

    pub fn pending(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.pending())
    }

    /// Add a tag returned by `WasmVideoPlayer.commitDraft`.
    pub fn add(&mut self, tag: JsValue) -> Result<(), JsValue> {
        let tag: Tag = serde_wasm_bindgen::from_value(tag)?;
        self.session.add(tag).map_err(js_error)
    }

    #[wasm_bindgen(js_name = updateText)]
    pub fn update_text(&mut self, id: &str, text: &str) -> Result<JsValue, JsValue> {
        let tag = self.session.update_text(id, text).map_err(js_error)?;
        to_js(tag)
    }

    pub fn delete(&mut self, id: &str) -> Result<JsValue, JsValue> {
        let tag = self.session.delete(id).map_err(js_error)?;
        to_js(&tag)
    }

    #[wasm_bindgen(js_name = isSubmitted)]
    pub fn is_submitted(&self) -> bool {
        self.session.is_submitted()
    }

    /// Submit pending tags for review. Returns how many were sent.
    pub fn submit(&mut self) -> Result<u32, JsValue> {
        let count = self.session.submit(&mut self.store).map_err(js_error)?;
        Ok(count as u32)
    }
}

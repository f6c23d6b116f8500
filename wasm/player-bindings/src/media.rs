//! `<video>` element adapter.

use reeftag::{MediaElement, RgbaFrame};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement};

/// Drives an `HtmlVideoElement` for the player.
///
/// Frames are read through an offscreen 2D canvas sized to the video's
/// intrinsic dimensions, never the displayed size.
pub struct HtmlMediaAdapter {
    video: HtmlVideoElement,
    canvas: HtmlCanvasElement,
}

impl HtmlMediaAdapter {
    pub fn new(video: HtmlVideoElement) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("No window")?;
        let document = window.document().ok_or("No document")?;
        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()?;
        Ok(Self { video, canvas })
    }

    pub fn video_element(&self) -> &HtmlVideoElement {
        &self.video
    }

    fn draw_current_frame(&self) -> Result<RgbaFrame, JsValue> {
        let (width, height) = self.video_dimensions();
        self.canvas.set_width(width);
        self.canvas.set_height(height);

        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or("2D context unavailable")?
            .dyn_into::<CanvasRenderingContext2d>()?;
        ctx.draw_image_with_html_video_element(&self.video, 0.0, 0.0)?;

        // Throws SecurityError for cross-origin video without CORS
        let image = ctx.get_image_data(0.0, 0.0, width as f64, height as f64)?;
        Ok(RgbaFrame::new(width, height, image.data().0))
    }
}

impl MediaElement for HtmlMediaAdapter {
    fn current_time(&self) -> f64 {
        self.video.current_time()
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.video.set_current_time(seconds);
    }

    fn duration(&self) -> Option<f64> {
        let duration = self.video.duration();
        duration.is_finite().then_some(duration)
    }

    fn is_paused(&self) -> bool {
        self.video.paused()
    }

    fn play(&mut self) {
        // A refused play() leaves `paused` set; later changes arrive as events
        if let Err(e) = self.video.play() {
            log::warn!("[PLAYER] play() failed: {:?}", e);
        }
    }

    fn pause(&mut self) {
        self.video.pause().ok();
    }

    fn volume(&self) -> f64 {
        self.video.volume()
    }

    fn set_volume(&mut self, volume: f64) {
        self.video.set_volume(volume.clamp(0.0, 1.0));
    }

    fn is_muted(&self) -> bool {
        self.video.muted()
    }

    fn set_muted(&mut self, muted: bool) {
        self.video.set_muted(muted);
    }

    fn ready_state(&self) -> u16 {
        self.video.ready_state()
    }

    fn video_dimensions(&self) -> (u32, u32) {
        (self.video.video_width(), self.video.video_height())
    }

    fn request_repaint(&mut self) {
        // Re-seeking to the same time makes a paused element decode and
        // present the frame; `seeked` fires once it is on screen.
        let time = self.video.current_time();
        self.video.set_current_time(time);
    }

    fn read_frame(&mut self) -> Option<RgbaFrame> {
        match self.draw_current_frame() {
            Ok(frame) => Some(frame),
            Err(e) => {
                log::warn!("[PLAYER] Frame read failed: {:?}", e);
                None
            }
        }
    }
}

//! Media element capability.
//!
//! The player never touches a DOM element directly. The host wraps its
//! `<video>` in a [`MediaElement`] and the state machine drives it through
//! these calls only.

/// Raw RGBA8 pixels of one decoded frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbaFrame {
    pub width: u32,
    pub height: u32,
    /// Row-major, 4 bytes per pixel.
    pub data: Vec<u8>,
}

impl RgbaFrame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Non-empty and the buffer length matches the dimensions.
    pub fn is_well_formed(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.data.len() == self.width as usize * self.height as usize * 4
    }
}

/// Operations the player needs from a playing video.
pub trait MediaElement {
    /// Playback position in seconds.
    fn current_time(&self) -> f64;

    fn set_current_time(&mut self, seconds: f64);

    /// Total length in seconds, `None` until metadata is known.
    fn duration(&self) -> Option<f64>;

    fn is_paused(&self) -> bool;

    fn play(&mut self);

    fn pause(&mut self);

    /// Volume in `[0, 1]`.
    fn volume(&self) -> f64;

    fn set_volume(&mut self, volume: f64);

    fn is_muted(&self) -> bool;

    fn set_muted(&mut self, muted: bool);

    /// `HTMLMediaElement.readyState` (0 = nothing, 4 = enough data).
    fn ready_state(&self) -> u16;

    /// Decoded frame size, `(0, 0)` before metadata.
    fn video_dimensions(&self) -> (u32, u32);

    /// Ask the element to present the frame at `current_time` while paused.
    ///
    /// Browsers may otherwise keep showing the previous frame after a seek.
    fn request_repaint(&mut self);

    /// Read the displayed frame at intrinsic size.
    fn read_frame(&mut self) -> Option<RgbaFrame>;
}

//! The video player state machine.
//!
//! ```text
//!            pointer over frame            click on frame
//!   Idle  <──────────────────>  Hovering ───────────────> Selecting
//!    ▲   pointer leaves frame      ▲                        │  │
//!    │                             │ cancel / Escape / click│  │ commit
//!    └─────────────────────────────┴────────────────────────┘  │
//!                                                              ▼
//!   (any mode) ── select_tag ──> Viewing ── cancel / click ──> Idle | Hovering
//! ```
//!
//! Owns the frame geometry inputs, the Escape listener scope and the audio
//! state. Hosts feed pointer and media events in, call commands, and drain
//! [`PlayerEvent`]s out.

use crate::config::{player_config, PlayerConfig};
use crate::error::{ReefTagError, ReefTagResult};
use crate::geometry::{
    pixel_to_normalized, ContainerSpace, Coord, IntrinsicFrameGeometry, NormalizedPosition, Size,
    VisibleRect,
};
use crate::overlay::{render_markers, Marker, OverlayStyle};
use crate::suggestion::{SuggestionGuard, SuggestionResult, SuggestionTicket};
use crate::tags::{format_timestamp, Annotator, Tag};

use super::capture::encode_jpeg_data_url;
use super::escape::{EscapeHook, EscapeRegistration};
use super::media::MediaElement;
use super::types::{
    CapturedFrame, ClickOutcome, Draft, PlayerEvent, PlayerMode, TransportSnapshot,
};

/// Player for one video.
pub struct VideoPlayer<M: MediaElement> {
    video_id: String,
    media: M,
    config: PlayerConfig,
    escape_hook: Box<dyn EscapeHook>,
    escape: Option<EscapeRegistration>,

    mode: PlayerMode,
    /// Last in-frame pointer position, kept while a selection is shown so
    /// cancelling can fall back to hovering.
    pointer: Option<NormalizedPosition>,
    /// `None` while the container has no settled size (e.g. mid fullscreen).
    container: Option<Size<ContainerSpace>>,
    next_draft_id: u64,
    repaint_pending: bool,

    playing: bool,
    volume: f64,
    muted: bool,

    suggestions: SuggestionGuard,
    events: Vec<PlayerEvent>,
}

impl<M: MediaElement> VideoPlayer<M> {
    /// Create a player using the global configuration.
    pub fn new(video_id: impl Into<String>, media: M, escape_hook: Box<dyn EscapeHook>) -> Self {
        Self::with_config(video_id, media, escape_hook, player_config())
    }

    pub fn with_config(
        video_id: impl Into<String>,
        media: M,
        escape_hook: Box<dyn EscapeHook>,
        config: PlayerConfig,
    ) -> Self {
        let video_id = video_id.into();
        let playing = !media.is_paused();
        let volume = sanitize_volume(media.volume()).unwrap_or(1.0);
        let muted = media.is_muted();
        log::info!("[PLAYER] Created player for video {}", video_id);

        Self {
            video_id,
            media,
            config: config.sanitized(),
            escape_hook,
            escape: None,
            mode: PlayerMode::Idle,
            pointer: None,
            container: None,
            next_draft_id: 1,
            repaint_pending: false,
            playing,
            volume,
            muted,
            suggestions: SuggestionGuard::new(),
            events: Vec::new(),
        }
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn mode(&self) -> &PlayerMode {
        &self.mode
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn active_draft(&self) -> Option<&Draft> {
        self.mode.draft()
    }

    /// True while an Escape listener is installed.
    pub fn is_listening_for_escape(&self) -> bool {
        self.escape.is_some()
    }

    /// Take the events produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.events)
    }

    #[cfg(test)]
    pub(crate) fn media(&self) -> &M {
        &self.media
    }

    #[cfg(test)]
    pub(crate) fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    // ---------------------------------------------------------------------
    // Geometry
    // ---------------------------------------------------------------------

    /// Current geometry, built fresh from the media and container size.
    pub fn geometry(&self) -> Option<IntrinsicFrameGeometry> {
        let container = self.container?;
        let (video_width, video_height) = self.media.video_dimensions();
        Some(IntrinsicFrameGeometry::new(
            video_width,
            video_height,
            container.width,
            container.height,
        ))
    }

    pub fn visible_rect(&self) -> ReefTagResult<VisibleRect> {
        self.geometry()
            .ok_or_else(|| ReefTagError::geometry_unavailable("container size not settled"))?
            .visible_rect()
    }

    /// Markers to draw for `tags` in the current state.
    pub fn markers(&self, tags: &[Tag]) -> Vec<Marker> {
        let Some(geometry) = self.geometry() else {
            return Vec::new();
        };
        let style = OverlayStyle {
            hover_opacity: self.config.hover_opacity,
        };
        render_markers(tags, &self.mode, &geometry, &style)
    }

    /// The container was laid out at a new size.
    pub fn on_resize(&mut self, width: f64, height: f64) {
        let size = Size::<ContainerSpace>::new(width, height);
        self.container = size.is_usable().then_some(size);
        if self.container.is_none() {
            self.pointer = None;
            if matches!(self.mode, PlayerMode::Hovering { .. }) {
                self.mode = PlayerMode::Idle;
            }
        }
        log::trace!("[PLAYER] Container resized to {}x{}", width, height);
    }

    /// Fullscreen is about to toggle; ignore the pointer until the new size
    /// is reported.
    pub fn begin_fullscreen_transition(&mut self) {
        self.container = None;
        self.pointer = None;
        if matches!(self.mode, PlayerMode::Hovering { .. }) {
            self.mode = PlayerMode::Idle;
        }
        log::debug!("[PLAYER] Fullscreen transition started");
    }

    /// Fullscreen toggled and the container settled at its new size.
    pub fn on_fullscreen_change(&mut self, width: f64, height: f64) {
        self.on_resize(width, height);
        log::debug!("[PLAYER] Fullscreen settled at {}x{}", width, height);
    }

    // ---------------------------------------------------------------------
    // Pointer
    // ---------------------------------------------------------------------

    fn map_pointer(&self, x: f64, y: f64) -> Option<NormalizedPosition> {
        let geometry = self.geometry()?;
        pixel_to_normalized(Coord::new(x, y), &geometry)
    }

    /// Pointer moved to container coordinates `(x, y)`.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.pointer = self.map_pointer(x, y);
        if !self.mode.has_selection() {
            self.mode = self.resting_mode();
        }
    }

    /// Pointer left the player container.
    pub fn pointer_leave(&mut self) {
        self.pointer = None;
        if matches!(self.mode, PlayerMode::Hovering { .. }) {
            self.mode = PlayerMode::Idle;
        }
    }

    /// Click at container coordinates `(x, y)`.
    ///
    /// With a draft or highlighted tag showing, any click dismisses it and
    /// creates nothing. Otherwise a click on the visible frame pauses the
    /// video and opens a draft at the current time.
    pub fn click(&mut self, x: f64, y: f64) -> ClickOutcome {
        // Mid-transition or collapsed: the click can't be placed, so it
        // must not dismiss anything either.
        if self.visible_rect().is_err() {
            log::trace!("[PLAYER] Click at ({:.1}, {:.1}) with no geometry", x, y);
            return ClickOutcome::Ignored;
        }

        if self.mode.has_selection() {
            self.pointer = self.map_pointer(x, y);
            self.cancel();
            return ClickOutcome::Cancelled;
        }

        let Some(position) = self.map_pointer(x, y) else {
            log::trace!("[PLAYER] Click at ({:.1}, {:.1}) outside frame", x, y);
            return ClickOutcome::Ignored;
        };

        if !self.media.is_paused() {
            self.pause();
        }

        let draft = Draft {
            id: self.next_draft_id,
            timestamp: self.media.current_time(),
            position,
        };
        self.next_draft_id += 1;

        self.escape = Some(self.escape_hook.install());
        self.mode = PlayerMode::Selecting { draft };
        self.events.push(PlayerEvent::DraftStarted { draft });
        log::debug!(
            "[PLAYER] Draft {} at {} {}",
            draft.id,
            format_timestamp(draft.timestamp),
            position.label()
        );
        ClickOutcome::DraftStarted { draft }
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    /// Dismiss the draft or highlighted tag. Returns false when there was
    /// nothing to dismiss.
    pub fn cancel(&mut self) -> bool {
        let previous = std::mem::replace(&mut self.mode, PlayerMode::Idle);
        match previous {
            PlayerMode::Selecting { draft } => {
                self.suggestions.cancel();
                self.events
                    .push(PlayerEvent::DraftCancelled { draft_id: draft.id });
                log::debug!("[PLAYER] Draft {} cancelled", draft.id);
            }
            PlayerMode::Viewing { tag } => {
                self.events.push(PlayerEvent::ViewCleared { tag_id: tag.id });
            }
            other => {
                self.mode = other;
                return false;
            }
        }
        self.escape = None;
        self.mode = self.resting_mode();
        true
    }

    /// Escape pressed on the host. Only closes an open draft.
    pub fn handle_escape(&mut self) -> bool {
        if matches!(self.mode, PlayerMode::Selecting { .. }) {
            self.cancel()
        } else {
            false
        }
    }

    /// Turn the open draft into a tag labelled `text`.
    pub fn commit_draft(&mut self, text: &str, annotator: &Annotator) -> ReefTagResult<Tag> {
        let draft = *self.mode.draft().ok_or(ReefTagError::NoActiveDraft)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(ReefTagError::EmptyTagText);
        }

        let tag = Tag::new(
            self.video_id.clone(),
            draft.timestamp,
            text,
            annotator,
            draft.position,
        );
        self.suggestions.cancel();
        self.escape = None;
        self.mode = self.resting_mode();
        self.events.push(PlayerEvent::TagAdded { tag: tag.clone() });
        log::info!(
            "[PLAYER] Tag '{}' added at {}",
            tag.text,
            tag.timestamp_label()
        );
        Ok(tag)
    }

    /// Jump to a saved tag and highlight it.
    ///
    /// Seeks to the tag's timestamp and forces the paused video to show that
    /// frame; frame capture stays unavailable until the frame is presented.
    pub fn select_tag(&mut self, tag: Tag) -> ReefTagResult<()> {
        if tag.video_id != self.video_id {
            log::error!(
                "[PLAYER] Tag {} belongs to video {}, not {}",
                tag.id,
                tag.video_id,
                self.video_id
            );
            return Err(ReefTagError::TagVideoMismatch {
                expected: self.video_id.clone(),
                actual: tag.video_id,
            });
        }

        if let PlayerMode::Selecting { draft } = &self.mode {
            self.suggestions.cancel();
            self.events
                .push(PlayerEvent::DraftCancelled { draft_id: draft.id });
        }
        self.escape = None;

        let target = self.clamp_time(tag.timestamp);
        self.media.set_current_time(target);
        if self.media.is_paused() {
            self.media.request_repaint();
        }
        self.repaint_pending = true;

        log::debug!(
            "[PLAYER] Viewing tag {} at {}",
            tag.id,
            format_timestamp(target)
        );
        self.events.push(PlayerEvent::Seeked { time: target });
        self.events.push(PlayerEvent::TagSelected { tag: tag.clone() });
        self.mode = PlayerMode::Viewing { tag };
        Ok(())
    }

    fn resting_mode(&self) -> PlayerMode {
        match self.pointer {
            Some(position) => PlayerMode::Hovering { position },
            None => PlayerMode::Idle,
        }
    }

    // ---------------------------------------------------------------------
    // Frame capture and suggestions
    // ---------------------------------------------------------------------

    /// True once the element has a decoded frame at the current position.
    pub fn can_capture(&self) -> bool {
        !self.repaint_pending && self.media.ready_state() >= self.config.min_capture_ready_state
    }

    /// Encode the displayed frame at intrinsic size.
    pub fn capture_frame(&mut self) -> ReefTagResult<CapturedFrame> {
        if self.repaint_pending {
            return Err(ReefTagError::capture_unavailable("seeked frame not presented yet"));
        }
        let ready_state = self.media.ready_state();
        if ready_state < self.config.min_capture_ready_state {
            return Err(ReefTagError::capture_unavailable(format!(
                "video not ready (readyState {})",
                ready_state
            )));
        }
        let (width, height) = self.media.video_dimensions();
        if width == 0 || height == 0 {
            return Err(ReefTagError::capture_unavailable("video dimensions unknown"));
        }

        let frame = self
            .media
            .read_frame()
            .ok_or_else(|| ReefTagError::capture_unavailable("frame could not be read"))?;
        if !frame.is_well_formed() || frame.width != width || frame.height != height {
            log::warn!(
                "[PLAYER] Frame read returned {}x{} ({} bytes), expected {}x{}",
                frame.width,
                frame.height,
                frame.data.len(),
                width,
                height
            );
            return Err(ReefTagError::capture_unavailable("frame buffer does not match video size"));
        }

        let data_url = encode_jpeg_data_url(frame, self.config.capture_quality)?;
        Ok(CapturedFrame {
            data_url,
            width,
            height,
            timestamp: self.media.current_time(),
        })
    }

    /// Capture the frame for the open draft and start a suggestion request.
    ///
    /// The host sends the frame to its suggestion service and hands the
    /// response to [`VideoPlayer::finish_suggestions`] with the ticket.
    pub fn begin_suggestions(&mut self) -> ReefTagResult<(SuggestionTicket, CapturedFrame)> {
        let draft_id = self.mode.draft().ok_or(ReefTagError::NoActiveDraft)?.id;
        let frame = self.capture_frame()?;
        Ok((self.suggestions.begin(draft_id), frame))
    }

    /// Accept a suggestion response if its draft is still open.
    pub fn finish_suggestions(
        &mut self,
        ticket: SuggestionTicket,
        result: SuggestionResult,
    ) -> Option<SuggestionResult> {
        let current = self.mode.draft().map(|d| d.id);
        self.suggestions.resolve(ticket, current, result)
    }

    pub fn is_suggesting(&self) -> bool {
        self.suggestions.is_in_flight()
    }

    // ---------------------------------------------------------------------
    // Transport
    // ---------------------------------------------------------------------

    /// Ask the element to play. A refused request (autoplay policy) leaves
    /// the element paused, so the flag follows `is_paused` afterwards.
    pub fn play(&mut self) {
        self.media.play();
        let playing = !self.media.is_paused();
        if !playing {
            log::debug!("[PLAYER] Play request refused by the media element");
        }
        self.set_playing(playing);
    }

    pub fn pause(&mut self) {
        self.media.pause();
        self.set_playing(false);
    }

    pub fn toggle_playback(&mut self) {
        if self.media.is_paused() {
            self.play();
        } else {
            self.pause();
        }
    }

    /// Seek to `seconds`, clamped to `[0, duration]`. Returns the new time.
    pub fn seek(&mut self, seconds: f64) -> f64 {
        let target = self.clamp_time(seconds);
        self.media.set_current_time(target);
        self.events.push(PlayerEvent::Seeked { time: target });
        target
    }

    /// Move by `delta` seconds from the current position.
    pub fn skip(&mut self, delta: f64) -> f64 {
        let current = self.media.current_time();
        self.seek(current + delta)
    }

    pub fn skip_forward(&mut self) -> f64 {
        self.skip(self.config.skip_seconds)
    }

    pub fn skip_back(&mut self) -> f64 {
        self.skip(-self.config.skip_seconds)
    }

    /// Set the volume. A non-zero volume unmutes; zero mutes.
    pub fn set_volume(&mut self, volume: f64) {
        let Some(volume) = sanitize_volume(volume) else {
            log::warn!("[PLAYER] Ignoring invalid volume {}", volume);
            return;
        };
        self.volume = volume;
        self.media.set_volume(volume);

        let muted = volume == 0.0;
        if muted != self.muted {
            self.muted = muted;
            self.media.set_muted(muted);
        }
        self.push_volume_event();
    }

    /// Toggle mute. Unmuting from zero restores the configured volume;
    /// muting keeps the previous volume for later.
    pub fn toggle_mute(&mut self) {
        if self.muted {
            if self.volume <= 0.0 {
                self.volume = self.config.unmute_volume;
                self.media.set_volume(self.volume);
            }
            self.muted = false;
        } else {
            self.muted = true;
        }
        self.media.set_muted(self.muted);
        self.push_volume_event();
    }

    /// Value for the volume slider; 0 while muted.
    pub fn slider_volume(&self) -> f64 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    pub fn transport(&self) -> TransportSnapshot {
        let current_time = self.media.current_time();
        let duration = self.known_duration();
        TransportSnapshot {
            current_time,
            duration,
            playing: self.playing,
            volume: self.slider_volume(),
            muted: self.muted,
            current_label: format_timestamp(current_time),
            duration_label: format_timestamp(duration.unwrap_or(0.0)),
        }
    }

    fn known_duration(&self) -> Option<f64> {
        self.media
            .duration()
            .filter(|d| d.is_finite() && *d >= 0.0)
    }

    fn clamp_time(&self, seconds: f64) -> f64 {
        let seconds = if seconds.is_finite() { seconds } else { 0.0 };
        let seconds = seconds.max(0.0);
        match self.known_duration() {
            Some(duration) => seconds.min(duration),
            None => seconds,
        }
    }

    fn set_playing(&mut self, playing: bool) {
        if self.playing != playing {
            self.playing = playing;
            self.events.push(PlayerEvent::PlaybackChanged { playing });
        }
    }

    fn push_volume_event(&mut self) {
        self.events.push(PlayerEvent::VolumeChanged {
            volume: self.slider_volume(),
            muted: self.muted,
        });
    }

    // ---------------------------------------------------------------------
    // Media element callbacks
    // ---------------------------------------------------------------------

    pub fn on_loaded_metadata(&mut self) {
        let (width, height) = self.media.video_dimensions();
        log::info!(
            "[PLAYER] Metadata loaded: {}x{}, duration {}",
            width,
            height,
            format_timestamp(self.known_duration().unwrap_or(0.0))
        );
    }

    /// Playback position advanced while playing.
    pub fn on_time_update(&mut self) {
        let time = self.media.current_time();
        self.events.push(PlayerEvent::TimeUpdated { time });
    }

    pub fn on_play(&mut self) {
        self.set_playing(true);
    }

    pub fn on_pause(&mut self) {
        self.set_playing(false);
    }

    /// Seek finished on the element.
    pub fn on_seeked(&mut self) {
        self.on_frame_presented();
    }

    /// The element presented the frame at the current time.
    pub fn on_frame_presented(&mut self) {
        if self.repaint_pending {
            self.repaint_pending = false;
            log::trace!("[PLAYER] Repaint settled");
        }
    }

    /// External volume change (e.g. browser controls).
    pub fn on_volume_change(&mut self) {
        let volume = sanitize_volume(self.media.volume()).unwrap_or(self.volume);
        let muted = self.media.is_muted();
        if volume != self.volume || muted != self.muted {
            self.volume = volume;
            self.muted = muted;
            self.push_volume_event();
        }
    }
}

fn sanitize_volume(volume: f64) -> Option<f64> {
    volume.is_finite().then(|| volume.clamp(0.0, 1.0))
}

//! Video player.

use serde::{Deserialize, Serialize};

use super::controls::LoadState;

/// Playback speeds cycled by the speed button.
pub const SPEEDS: [f64; 5] = [0.5, 1.0, 1.25, 1.5, 2.0];

/// Seconds skipped by the arrow keys.
pub const SKIP_SECONDS: f64 = 5.0;

/// Format seconds as zero-padded `mm:ss`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "00:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Video preview with transport controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoPlayer {
    /// Stream URL the video loads from.
    pub url: String,
    /// Load status.
    pub load: LoadState,
    playing: bool,
    duration: f64,
    position: f64,
    volume: f64,
    muted: bool,
    speed_index: usize,
    /// Whether the player fills the screen.
    pub fullscreen: bool,
}

impl VideoPlayer {
    /// A paused player at 0:00, full volume, normal speed.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            load: LoadState::Loading,
            playing: false,
            duration: 0.0,
            position: 0.0,
            volume: 1.0,
            muted: false,
            speed_index: 1,
            fullscreen: false,
        }
    }

    /// Metadata arrived with the stream duration.
    pub fn on_loaded(&mut self, duration: f64) {
        if self.load.is_failed() {
            return;
        }
        self.duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
        self.load.ready();
    }

    /// Mark the video as failed to load; playback stops.
    pub fn on_error(&mut self, message: impl Into<String>) {
        self.playing = false;
        self.load.fail(message);
    }

    /// Playback advanced to `position`.
    pub fn on_time_update(&mut self, position: f64) {
        self.position = self.clamp_position(position);
    }

    /// Play if paused, pause if playing.
    pub fn toggle_play(&mut self) {
        if self.load.is_ready() {
            self.playing = !self.playing;
        }
    }

    /// Pause playback.
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Whether the video is playing.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Total length in seconds (0 until loaded).
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Playback position in seconds.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Move by `delta` seconds, staying inside the stream.
    pub fn seek_by(&mut self, delta: f64) {
        self.position = self.clamp_position(self.position + delta);
    }

    /// Jump forward by [`SKIP_SECONDS`].
    pub fn skip_forward(&mut self) {
        self.seek_by(SKIP_SECONDS);
    }

    /// Jump back by [`SKIP_SECONDS`].
    pub fn skip_back(&mut self) {
        self.seek_by(-SKIP_SECONDS);
    }

    /// Jump to a fraction of the duration (progress bar click).
    pub fn seek_ratio(&mut self, ratio: f64) {
        let ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
        self.position = ratio * self.duration;
    }

    /// Back to 0:00.
    pub fn restart(&mut self) {
        self.position = 0.0;
    }

    /// Set volume in `[0, 1]`; zero mutes, anything else unmutes.
    pub fn set_volume(&mut self, volume: f64) {
        let volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        self.volume = volume;
        self.muted = volume == 0.0;
    }

    /// Current volume in `[0, 1]`.
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Mute or unmute.
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Whether the sound is muted.
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Advance to the next speed, wrapping around.
    pub fn cycle_speed(&mut self) -> f64 {
        self.speed_index = (self.speed_index + 1) % SPEEDS.len();
        self.speed()
    }

    /// Current playback speed.
    pub fn speed(&self) -> f64 {
        SPEEDS[self.speed_index]
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
    }

    /// Percentage played, 0 while the duration is unknown.
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            self.position / self.duration * 100.0
        } else {
            0.0
        }
    }

    /// `position / duration` label.
    pub fn time_label(&self) -> String {
        format!("{} / {}", format_time(self.position), format_time(self.duration))
    }

    fn clamp_position(&self, position: f64) -> f64 {
        if position.is_nan() {
            return 0.0;
        }
        position.clamp(0.0, self.duration)
    }
}

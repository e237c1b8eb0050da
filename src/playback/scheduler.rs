use crate::foundation::core::{PERCENT_MAX, PERCENT_MIN, clamp_percent};
use crate::foundation::error::{PlayframeError, PlayframeResult};

/// Handle for one requested display frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameToken(pub u64);

/// The host's per-display-frame callback mechanism.
///
/// Playback asks for exactly one frame at a time and cancels it synchronously when it stops, so a
/// host never has a callback outstanding for a stopped timeline.
pub trait FrameScheduler {
    /// Schedule the next frame callback.
    fn request_frame(&mut self) -> FrameToken;
    /// Cancel a previously requested frame.
    fn cancel_frame(&mut self, token: FrameToken);
}

/// A frame scheduler driven by hand; used by tests and the CLI.
#[derive(Debug, Default)]
pub struct ManualFrames {
    next_id: u64,
    pending: Vec<FrameToken>,
}

impl ManualFrames {
    /// Frames requested and not yet fired or cancelled.
    pub fn pending(&self) -> &[FrameToken] {
        &self.pending
    }

    /// Pop the oldest pending frame, as a host would when its display refreshes.
    pub fn fire(&mut self) -> Option<FrameToken> {
        if self.pending.is_empty() {
            return None;
        }
        Some(self.pending.remove(0))
    }
}

impl FrameScheduler for ManualFrames {
    fn request_frame(&mut self) -> FrameToken {
        self.next_id += 1;
        let token = FrameToken(self.next_id);
        self.pending.push(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.pending.retain(|t| *t != token);
    }
}

/// Playback parameters and cursor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackState {
    /// Cursor on the `[0, 100]` percent scale.
    pub time_percent: f64,
    /// Whether the scheduler is running.
    pub is_playing: bool,
    /// Speed slider position, `0..=100`.
    pub speed_multiplier: u8,
    /// Loop seamlessly at the end instead of stopping.
    pub autoplay_enabled: bool,
    /// Wall-clock length of one pass over the timeline at speed factor 1.
    pub loop_seconds: f64,
    /// Selected keyframe; always a live keyframe time when set.
    pub selected_keyframe: Option<f64>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            time_percent: 0.0,
            is_playing: false,
            speed_multiplier: 50,
            autoplay_enabled: true,
            loop_seconds: 10.0,
            selected_keyframe: None,
        }
    }
}

/// Map the `0..=100` speed slider onto a playback rate.
///
/// The slider is linear in `[0.25, 4.0]`, then scaled by 3: `0 -> 0.75`, `100 -> 12`.
pub fn speed_factor(speed_multiplier: u8) -> f64 {
    let m = f64::from(speed_multiplier.min(100));
    (0.25 + (m / 100.0) * 3.75) * 3.0
}

/// What a frame callback did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameOutcome {
    /// Stale or unexpected token; nothing changed.
    Ignored,
    /// First frame of a run: wall-clock baseline recorded, time unchanged.
    Baseline,
    /// Time advanced; another frame is scheduled.
    Advanced {
        /// The new cursor.
        time: f64,
    },
    /// Time reached the end with autoplay off; playback stopped.
    Finished,
}

#[derive(Clone, Copy, Debug)]
enum Phase {
    Stopped,
    Running {
        pending: FrameToken,
        last_secs: Option<f64>,
    },
}

/// Two-state playback scheduler over a [`FrameScheduler`].
#[derive(Clone, Debug)]
pub struct Playback {
    state: PlaybackState,
    phase: Phase,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(PlaybackState::default())
    }
}

impl Playback {
    pub fn new(mut state: PlaybackState) -> Self {
        state.is_playing = false;
        Self {
            state,
            phase: Phase::Stopped,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    pub fn time(&self) -> f64 {
        self.state.time_percent
    }

    /// Move the cursor. Non-finite values are rejected; others are clamped to `[0, 100]`.
    pub fn set_time(&mut self, time: f64) -> PlayframeResult<()> {
        if !time.is_finite() {
            return Err(PlayframeError::validation("time must be finite"));
        }
        self.state.time_percent = clamp_percent(time);
        Ok(())
    }

    pub fn set_speed_multiplier(&mut self, speed: u8) {
        self.state.speed_multiplier = speed.min(100);
    }

    pub fn set_autoplay(&mut self, enabled: bool) {
        self.state.autoplay_enabled = enabled;
    }

    pub fn set_loop_seconds(&mut self, secs: f64) -> PlayframeResult<()> {
        if !secs.is_finite() || secs <= 0.0 {
            return Err(PlayframeError::validation(
                "loop_seconds must be finite and > 0",
            ));
        }
        self.state.loop_seconds = secs;
        Ok(())
    }

    pub(crate) fn set_selected(&mut self, selected: Option<f64>) {
        self.state.selected_keyframe = selected;
    }

    /// Start playing. A stopped cursor sitting at the end rewinds first when autoplay is off.
    pub fn play(&mut self, frames: &mut dyn FrameScheduler) {
        if self.is_playing() {
            return;
        }
        if !self.state.autoplay_enabled && self.state.time_percent >= PERCENT_MAX {
            self.state.time_percent = PERCENT_MIN;
        }
        self.phase = Phase::Running {
            pending: frames.request_frame(),
            last_secs: None,
        };
        self.state.is_playing = true;
    }

    /// Stop playing and cancel the outstanding frame.
    pub fn pause(&mut self, frames: &mut dyn FrameScheduler) {
        if let Phase::Running { pending, .. } = self.phase {
            frames.cancel_frame(pending);
        }
        self.phase = Phase::Stopped;
        self.state.is_playing = false;
    }

    pub fn toggle(&mut self, frames: &mut dyn FrameScheduler) {
        if self.is_playing() {
            self.pause(frames);
        } else {
            self.play(frames);
        }
    }

    /// Handle a display frame fired at wall-clock `now_secs`.
    pub fn on_frame(
        &mut self,
        frames: &mut dyn FrameScheduler,
        token: FrameToken,
        now_secs: f64,
    ) -> FrameOutcome {
        let Phase::Running { pending, last_secs } = self.phase else {
            return FrameOutcome::Ignored;
        };
        if pending != token {
            return FrameOutcome::Ignored;
        }

        let Some(last) = last_secs else {
            self.phase = Phase::Running {
                pending: frames.request_frame(),
                last_secs: Some(now_secs),
            };
            return FrameOutcome::Baseline;
        };

        let dt = (now_secs - last).max(0.0);
        if self.advance(dt) {
            self.phase = Phase::Stopped;
            self.state.is_playing = false;
            return FrameOutcome::Finished;
        }
        self.phase = Phase::Running {
            pending: frames.request_frame(),
            last_secs: Some(now_secs),
        };
        FrameOutcome::Advanced {
            time: self.state.time_percent,
        }
    }

    /// Advance the cursor by `dt` wall-clock seconds. Returns `true` when the end was reached with
    /// autoplay off.
    pub fn advance(&mut self, dt: f64) -> bool {
        let speed = speed_factor(self.state.speed_multiplier);
        let next = self.state.time_percent + (dt / self.state.loop_seconds) * PERCENT_MAX * speed;
        if next >= PERCENT_MAX {
            if self.state.autoplay_enabled {
                self.state.time_percent = next % PERCENT_MAX;
                return false;
            }
            self.state.time_percent = PERCENT_MAX;
            return true;
        }
        self.state.time_percent = next.max(PERCENT_MIN);
        false
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/scheduler.rs"]
mod tests;

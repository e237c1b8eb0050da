use crate::foundation::error::{PlayframeError, PlayframeResult};

/// Default distance, in percent, within which the cursor counts as "on" a keyframe.
pub const DEFAULT_EDIT_TOLERANCE: f64 = 0.5;

/// What the engine is doing to the live scene right now.
///
/// Programmatic applications (undo, redo, scrub sampling, import) run in `Restoring` so they are
/// never mistaken for user edits; a pointer drag runs in `Dragging` so keyframe writes wait for
/// drag end. The two never overlap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EditMode {
    /// No programmatic application or drag in progress.
    #[default]
    Idle,
    /// A programmatic state application is in progress.
    Restoring,
    /// A token drag is in progress.
    Dragging,
}

impl EditMode {
    pub fn is_idle(self) -> bool {
        self == Self::Idle
    }

    pub fn is_restoring(self) -> bool {
        self == Self::Restoring
    }

    pub fn is_dragging(self) -> bool {
        self == Self::Dragging
    }

    /// `Idle -> Restoring`.
    pub fn begin_restore(&mut self) -> PlayframeResult<()> {
        self.transition(Self::Idle, Self::Restoring, "begin restore")
    }

    /// `Restoring -> Idle`.
    pub fn end_restore(&mut self) -> PlayframeResult<()> {
        self.transition(Self::Restoring, Self::Idle, "end restore")
    }

    /// `Idle -> Dragging`.
    pub fn begin_drag(&mut self) -> PlayframeResult<()> {
        self.transition(Self::Idle, Self::Dragging, "begin drag")
    }

    /// `Dragging -> Idle`.
    pub fn end_drag(&mut self) -> PlayframeResult<()> {
        self.transition(Self::Dragging, Self::Idle, "end drag")
    }

    fn transition(&mut self, from: Self, to: Self, what: &str) -> PlayframeResult<()> {
        if *self != from {
            return Err(PlayframeError::mode(format!(
                "cannot {what} while {self:?} (expected {from:?})"
            )));
        }
        *self = to;
        Ok(())
    }
}

/// Pick the keyframe a live edit at `time` should be written into.
///
/// In order: the nearest keyframe within `tolerance`; the only keyframe when there is exactly one;
/// the last keyframe when `time` is past it; the first when `time` is before it. A cursor strictly
/// between two keyframes, neither within tolerance, has no target and the edit stays unpersisted.
/// `times` must be sorted ascending.
pub fn edit_target(time: f64, times: &[f64], tolerance: f64) -> Option<f64> {
    let near = times
        .iter()
        .copied()
        .filter(|t| (t - time).abs() <= tolerance)
        .min_by(|a, b| (a - time).abs().total_cmp(&(b - time).abs()));
    if near.is_some() {
        return near;
    }
    match times {
        [] => None,
        [only] => Some(*only),
        [first, .., last] => {
            if time > *last {
                Some(*last)
            } else if time < *first {
                Some(*first)
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/edit/sync.rs"]
mod tests;

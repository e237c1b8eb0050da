use serde::{Deserialize, Serialize};

use crate::edit::sync::DEFAULT_EDIT_TOLERANCE;
use crate::foundation::error::{PlayframeError, PlayframeResult};
use crate::history::stack::DEFAULT_HISTORY_LIMIT;
use crate::timeline::store::{DEFAULT_MAX_KEYFRAMES, DEFAULT_MIN_SPACING};

/// Options controlling a [`crate::TimelineEngine`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineOpts {
    /// Upper bound on live keyframes.
    pub max_keyframes: usize,
    /// Minimum distance, in percent, between a new keyframe and existing ones.
    pub min_spacing: f64,
    /// Distance, in percent, within which the cursor counts as sitting on a keyframe.
    pub edit_tolerance: f64,
    /// Undo steps retained per history stack.
    pub history_limit: usize,
}

impl Default for TimelineOpts {
    fn default() -> Self {
        Self {
            max_keyframes: DEFAULT_MAX_KEYFRAMES,
            min_spacing: DEFAULT_MIN_SPACING,
            edit_tolerance: DEFAULT_EDIT_TOLERANCE,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl TimelineOpts {
    pub fn validate(&self) -> PlayframeResult<()> {
        if self.max_keyframes == 0 {
            return Err(PlayframeError::validation("max_keyframes must be > 0"));
        }
        if !self.min_spacing.is_finite() || self.min_spacing < 0.0 {
            return Err(PlayframeError::validation(
                "min_spacing must be finite and >= 0",
            ));
        }
        if !self.edit_tolerance.is_finite() || self.edit_tolerance < 0.0 {
            return Err(PlayframeError::validation(
                "edit_tolerance must be finite and >= 0",
            ));
        }
        if self.history_limit == 0 {
            return Err(PlayframeError::validation("history_limit must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/opts.rs"]
mod tests;

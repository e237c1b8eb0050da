//! Canonical string keys for percent times.
//!
//! Keyframe snapshots are stored in a map keyed by the *rendered* time rather than the raw float,
//! so that values differing only by floating-point noise (`33.33333` vs `33.333331`) land on the
//! same entry.

use std::collections::BTreeMap;

use crate::foundation::core::same_time;
use crate::scene::model::SceneSnapshot;

const KEY_DECIMALS: i32 = 3;

/// Render `value` as a canonical key: rounded to 3 decimals, no trailing zeros, no trailing
/// decimal point. Non-finite values and negative zero render as `"0"`.
pub fn encode_percent_key(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_owned();
    }
    let scale = 10f64.powi(KEY_DECIMALS);
    let rounded = (value * scale).round() / scale;
    let mut s = format!("{rounded:.3}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s.is_empty() || s == "-0" {
        return "0".to_owned();
    }
    s
}

/// Find the snapshot stored for `value`.
///
/// Lookup order: the canonical key, then the plain float rendering (keys written before rounding
/// was introduced), then any key whose numeric value is within [`KEY_EPSILON`] of `value`.
/// Non-finite values never resolve.
///
/// [`KEY_EPSILON`]: crate::foundation::core::KEY_EPSILON
pub fn resolve_snapshot<'a>(
    value: f64,
    snapshots: &'a BTreeMap<String, SceneSnapshot>,
) -> Option<(&'a String, &'a SceneSnapshot)> {
    if !value.is_finite() {
        return None;
    }
    if let Some(hit) = snapshots.get_key_value(&encode_percent_key(value)) {
        return Some(hit);
    }
    if let Some(hit) = snapshots.get_key_value(&value.to_string()) {
        return Some(hit);
    }
    snapshots.iter().find(|(key, _)| {
        key.parse::<f64>()
            .is_ok_and(|k| k.is_finite() && same_time(k, value))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/key.rs"]
mod tests;

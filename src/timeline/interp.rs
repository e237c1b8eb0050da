use std::collections::BTreeMap;

use crate::foundation::core::{Lerp, Point, same_time};
use crate::scene::model::{BallToken, SceneSnapshot};
use crate::timeline::key::resolve_snapshot;

/// Sample the scene at `time` (percent) from a set of keyframe snapshots.
///
/// Exact keyframe hits are returned untouched. Between keyframes every token is linearly
/// interpolated; outside the keyed range the nearest endpoint is held (no extrapolation).
/// Returns `None` when `snapshots` holds no usable entry or `time` is NaN; infinities clamp to the
/// matching end.
pub fn sample_at(time: f64, snapshots: &BTreeMap<String, SceneSnapshot>) -> Option<SceneSnapshot> {
    if time.is_nan() {
        return None;
    }
    if let Some((_, exact)) = resolve_snapshot(time, snapshots) {
        return Some(exact.clone());
    }

    let mut keyed: Vec<(f64, &SceneSnapshot)> = snapshots
        .iter()
        .filter_map(|(k, s)| k.parse::<f64>().ok().filter(|t| t.is_finite()).map(|t| (t, s)))
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

    let (&(min_t, min_s), &(max_t, max_s)) = (keyed.first()?, keyed.last()?);
    if time <= min_t {
        return Some(min_s.clone());
    }
    if time >= max_t {
        return Some(max_s.clone());
    }

    let idx = keyed.partition_point(|(t, _)| *t <= time);
    let (lower_t, lower) = keyed[idx - 1];
    let (upper_t, upper) = keyed[idx];
    if same_time(lower_t, upper_t) {
        return Some(lower.clone());
    }

    let alpha = (time - lower_t) / (upper_t - lower_t);
    Some(blend(lower, upper, alpha))
}

/// Blend two snapshots with factor `alpha` in `[0, 1]`.
///
/// The output covers the union of both sides' players. A player missing on one side holds its
/// position from the side that has it.
pub fn blend(lower: &SceneSnapshot, upper: &SceneSnapshot, alpha: f64) -> SceneSnapshot {
    let mut represented: Vec<String> = Vec::new();
    for id in lower
        .represented_player_ids
        .iter()
        .chain(&upper.represented_player_ids)
        .chain(lower.players_by_id.keys())
        .chain(upper.players_by_id.keys())
    {
        if !represented.contains(id) {
            represented.push(id.clone());
        }
    }

    let mut players_by_id = BTreeMap::new();
    for id in &represented {
        let (a, b) = match (lower.player(id), upper.player(id)) {
            (Some(a), Some(b)) => (a, b),
            (Some(a), None) => (a, a),
            (None, Some(b)) => (b, b),
            (None, None) => continue,
        };
        let mut out = a.clone();
        out.set_position(<Point as Lerp>::lerp(&a.position(), &b.position(), alpha));
        players_by_id.insert(id.clone(), out);
    }

    let ball = match (&lower.ball, &upper.ball) {
        (Some(a), Some(b)) => Some(lerp_ball(a, b, alpha)),
        (Some(only), None) | (None, Some(only)) => Some(only.clone()),
        (None, None) => None,
    };

    SceneSnapshot {
        players_by_id,
        represented_player_ids: represented,
        ball,
    }
}

fn lerp_ball(a: &BallToken, b: &BallToken, alpha: f64) -> BallToken {
    let mut out = a.clone();
    out.set_position(<Point as Lerp>::lerp(&a.position(), &b.position(), alpha));
    out
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/interp.rs"]
mod tests;

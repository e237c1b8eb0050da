//! The continuous-track (`1.0.0`) format and its migration to keyframe snapshots.
//!
//! Each token has its own list of `(t_ms, x, y)` samples. Migration samples every track on the
//! union of all sample times (plus 0) and turns each grid time into one scene-wide keyframe.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use serde_json::Value;

use crate::foundation::core::{Lerp, Point, clamp_percent};
use crate::playback::scheduler::PlaybackState;
use crate::scene::model::{BallToken, PlayerNumber, PlayerToken, SceneSnapshot};
use crate::scene::play::PlayInfo;
use crate::timeline::key::encode_percent_key;

/// Duration assumed when a file declares none and has no samples past 0.
pub const FALLBACK_DURATION_MS: f64 = 10_000.0;

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TrackDoc {
    pub(crate) play: TrackPlayDoc,
    pub(crate) items: Vec<TrackItem>,
    pub(crate) tracks: BTreeMap<String, TrackDef>,
    #[serde(default)]
    pub(crate) timeline: TrackTimelineDoc,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct TrackPlayDoc {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) id: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TrackTimelineDoc {
    #[serde(default)]
    pub(crate) duration_ms: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ItemKind {
    Player,
    Ball,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct TrackItem {
    pub(crate) id: String,
    #[serde(rename = "type")]
    pub(crate) kind: ItemKind,
    #[serde(default)]
    pub(crate) x: f64,
    #[serde(default)]
    pub(crate) y: f64,
    #[serde(default)]
    pub(crate) number: Option<PlayerNumber>,
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) assignment: Option<String>,
    #[serde(default)]
    pub(crate) color: Option<String>,
}

impl TrackItem {
    fn base(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn to_player(&self, at: Point) -> PlayerToken {
        let mut p = PlayerToken::new(self.id.clone(), at.x, at.y);
        if let Some(number) = &self.number {
            p.number = number.clone();
        }
        if let Some(name) = &self.name {
            p.name = name.clone();
        }
        if let Some(assignment) = &self.assignment {
            p.assignment = assignment.clone();
        }
        if let Some(color) = &self.color {
            p.color = color.clone();
        }
        p
    }
}

/// Raw track as found in the file; samples are coerced by [`TrackSamples::normalize`].
#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct TrackDef {
    #[serde(default)]
    pub(crate) keyframes: Vec<Value>,
}

/// One cleaned track: integer-millisecond times, strictly ascending.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackSamples {
    samples: Vec<(i64, Point)>,
}

impl TrackSamples {
    /// Build from already-clean samples (sorted, last duplicate wins).
    pub fn from_samples(samples: impl IntoIterator<Item = (i64, Point)>) -> Self {
        let mut by_time = BTreeMap::new();
        for (t, p) in samples {
            by_time.insert(t, p);
        }
        Self {
            samples: by_time.into_iter().collect(),
        }
    }

    /// Coerce raw JSON samples: `t` (or `t_ms`) may be a number or numeric string and is rounded to
    /// whole milliseconds. Entries with a missing, negative or non-finite time or a non-finite
    /// coordinate are dropped. Returns the track and the number of dropped entries.
    pub(crate) fn normalize(raw: &[Value]) -> (Self, usize) {
        let mut dropped = 0usize;
        let mut kept = Vec::with_capacity(raw.len());
        for entry in raw {
            match coerce_sample(entry) {
                Some(sample) => kept.push(sample),
                None => dropped += 1,
            }
        }
        (Self::from_samples(kept), dropped)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn times(&self) -> impl Iterator<Item = i64> + '_ {
        self.samples.iter().map(|(t, _)| *t)
    }

    /// Position at `t_ms`: held before the first and after the last sample, linear in between.
    pub fn value_at(&self, t_ms: i64) -> Option<Point> {
        let (first_t, first_p) = *self.samples.first()?;
        let (last_t, last_p) = *self.samples.last()?;
        if t_ms <= first_t {
            return Some(first_p);
        }
        if t_ms >= last_t {
            return Some(last_p);
        }
        let idx = self.samples.partition_point(|(t, _)| *t <= t_ms);
        let (a_t, a) = self.samples[idx - 1];
        let (b_t, b) = self.samples[idx];
        if a_t == b_t {
            return Some(a);
        }
        let alpha = (t_ms - a_t) as f64 / (b_t - a_t) as f64;
        Some(<Point as Lerp>::lerp(&a, &b, alpha))
    }
}

fn coerce_sample(entry: &Value) -> Option<(i64, Point)> {
    let obj = entry.as_object()?;
    let t = obj.get("t").or_else(|| obj.get("t_ms"))?;
    let t = match t {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !t.is_finite() || t < 0.0 {
        return None;
    }
    let x = obj.get("x")?.as_f64()?;
    let y = obj.get("y")?.as_f64()?;
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    Some((t.round() as i64, Point::new(x, y)))
}

/// Result of migrating a track document.
#[derive(Clone, Debug)]
pub(crate) struct MigratedPlay {
    pub(crate) info: PlayInfo,
    pub(crate) keyframes: Vec<f64>,
    pub(crate) snapshots: BTreeMap<String, SceneSnapshot>,
    pub(crate) playback: PlaybackState,
}

/// Convert a validated track document into keyframe snapshots.
pub(crate) fn migrate_tracks(doc: &TrackDoc) -> MigratedPlay {
    let mut players: Vec<&TrackItem> = doc
        .items
        .iter()
        .filter(|i| i.kind == ItemKind::Player)
        .collect();
    players.sort_by(|a, b| a.id.cmp(&b.id));
    players.dedup_by(|a, b| a.id == b.id);

    let mut balls = doc.items.iter().filter(|i| i.kind == ItemKind::Ball);
    let ball = balls.next();
    let extra_balls = balls.count();
    if extra_balls > 0 {
        tracing::warn!(extra_balls, "track import keeps only the first ball item");
    }

    let mut normalized: BTreeMap<&str, TrackSamples> = BTreeMap::new();
    for (id, def) in &doc.tracks {
        let (samples, dropped) = TrackSamples::normalize(&def.keyframes);
        if dropped > 0 {
            tracing::warn!(track = %id, dropped, "dropped invalid track samples");
        }
        normalized.insert(id.as_str(), samples);
    }

    let mut grid: BTreeSet<i64> = BTreeSet::new();
    grid.insert(0);
    for samples in normalized.values() {
        grid.extend(samples.times());
    }

    let duration_ms = match doc.timeline.duration_ms {
        Some(d) if d.is_finite() && d > 0.0 => d,
        _ => {
            let max_t = grid.last().copied().unwrap_or(0);
            if max_t > 0 {
                max_t as f64
            } else {
                FALLBACK_DURATION_MS
            }
        }
    };

    let position = |item: &TrackItem, t: i64| {
        normalized
            .get(item.id.as_str())
            .and_then(|s| s.value_at(t))
            .unwrap_or_else(|| item.base())
    };

    let mut by_key: BTreeMap<String, (f64, SceneSnapshot)> = BTreeMap::new();
    for &t in &grid {
        let mut snapshot = SceneSnapshot::default();
        for item in &players {
            snapshot.upsert_player(item.to_player(position(item, t)));
        }
        snapshot.ball = ball.map(|b| {
            let p = position(b, t);
            BallToken {
                id: b.id.clone(),
                x: p.x,
                y: p.y,
            }
        });
        let percent = clamp_percent(t as f64 / duration_ms * 100.0);
        by_key.insert(encode_percent_key(percent), (percent, snapshot));
    }

    let mut keyframes: Vec<f64> = by_key.values().map(|(p, _)| *p).collect();
    keyframes.sort_by(f64::total_cmp);
    let snapshots = by_key.into_iter().map(|(k, (_, s))| (k, s)).collect();

    MigratedPlay {
        info: PlayInfo {
            name: doc.play.name.clone(),
            id: doc.play.id.clone(),
            ..PlayInfo::default()
        },
        keyframes,
        snapshots,
        playback: PlaybackState {
            loop_seconds: duration_ms / 1000.0,
            ..PlaybackState::default()
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schema/tracks.rs"]
mod tests;

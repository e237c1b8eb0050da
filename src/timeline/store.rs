use std::collections::BTreeMap;

use crate::foundation::core::same_time;
use crate::scene::model::SceneSnapshot;
use crate::scene::reconcile::{purge_player, reconcile_with_live};
use crate::timeline::key::{encode_percent_key, resolve_snapshot};

/// Default cap on the number of keyframes.
pub const DEFAULT_MAX_KEYFRAMES: usize = 30;
/// Default minimum distance, in percent, between a new keyframe and existing ones.
pub const DEFAULT_MIN_SPACING: f64 = 2.0;

/// Outcome of [`KeyframeStore::insert`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InsertResult {
    /// A new keyframe was created at `time`.
    Added {
        /// The inserted time.
        time: f64,
    },
    /// An existing keyframe is closer than the minimum spacing; callers should select it instead.
    TooClose {
        /// The nearest existing keyframe time.
        existing: f64,
    },
    /// The keyframe limit is reached; nothing changed.
    AtCapacity,
}

/// Ordered keyframe times plus the snapshot stored for each.
///
/// Snapshots are keyed by [`encode_percent_key`]. Entries without a live time are allowed (a write
/// may land before its keyframe is inserted) and are pruned when a time is deleted.
#[derive(Clone, Debug)]
pub struct KeyframeStore {
    times: Vec<f64>, // sorted ascending
    snapshots: BTreeMap<String, SceneSnapshot>,
    max_keyframes: usize,
    min_spacing: f64,
}

impl Default for KeyframeStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_KEYFRAMES, DEFAULT_MIN_SPACING)
    }
}

impl KeyframeStore {
    /// Create an empty store with the given limits.
    pub fn new(max_keyframes: usize, min_spacing: f64) -> Self {
        Self {
            times: Vec::new(),
            snapshots: BTreeMap::new(),
            max_keyframes,
            min_spacing: min_spacing.max(0.0),
        }
    }

    /// Keyframe times, ascending.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// All stored snapshots by canonical key.
    pub fn snapshots(&self) -> &BTreeMap<String, SceneSnapshot> {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn first(&self) -> Option<f64> {
        self.times.first().copied()
    }

    pub fn last(&self) -> Option<f64> {
        self.times.last().copied()
    }

    /// The live time equal to `time` (within epsilon), if any.
    pub fn find(&self, time: f64) -> Option<f64> {
        self.times.iter().copied().find(|t| same_time(*t, time))
    }

    /// Whether `time` is a live keyframe time.
    pub fn contains(&self, time: f64) -> bool {
        self.find(time).is_some()
    }

    /// The live time nearest to `time`.
    pub fn nearest(&self, time: f64) -> Option<f64> {
        self.times
            .iter()
            .copied()
            .min_by(|a, b| (a - time).abs().total_cmp(&(b - time).abs()))
    }

    /// Snapshot stored for `time`, resolved through the key codec.
    pub fn snapshot_at(&self, time: f64) -> Option<&SceneSnapshot> {
        resolve_snapshot(time, &self.snapshots).map(|(_, s)| s)
    }

    /// Add a keyframe time, honouring the capacity limit and the minimum spacing.
    pub fn insert(&mut self, time: f64) -> InsertResult {
        if self.times.len() >= self.max_keyframes {
            return InsertResult::AtCapacity;
        }
        let too_close = self
            .times
            .iter()
            .copied()
            .filter(|t| (t - time).abs() < self.min_spacing || same_time(*t, time))
            .min_by(|a, b| (a - time).abs().total_cmp(&(b - time).abs()));
        if let Some(existing) = too_close {
            return InsertResult::TooClose { existing };
        }
        let idx = self.times.partition_point(|t| *t < time);
        self.times.insert(idx, time);
        InsertResult::Added { time }
    }

    /// Remove a keyframe time and prune its snapshot. Returns `false` when `time` is not live.
    pub fn delete(&mut self, time: f64) -> bool {
        let Some(idx) = self.times.iter().position(|t| same_time(*t, time)) else {
            return false;
        };
        let removed = self.times.remove(idx);
        let key = resolve_snapshot(removed, &self.snapshots).map(|(k, _)| k.clone());
        if let Some(key) = key {
            // Imported times closer than the key resolution may share one entry.
            let shared = self.times.iter().any(|t| {
                resolve_snapshot(*t, &self.snapshots).is_some_and(|(k, _)| *k == key)
            });
            if !shared {
                self.snapshots.remove(&key);
            }
        }
        true
    }

    /// Remove every time and snapshot.
    pub fn clear(&mut self) {
        self.times.clear();
        self.snapshots.clear();
    }

    /// Upsert the snapshot for `time` whether or not `time` is a live keyframe yet.
    pub fn write(&mut self, time: f64, mut snapshot: SceneSnapshot) {
        snapshot.dedupe_represented();
        let key = encode_percent_key(time);
        if !self.snapshots.contains_key(&key) {
            // Replace a legacy-keyed entry for the same time instead of forking a second one.
            let legacy = resolve_snapshot(time, &self.snapshots).map(|(k, _)| k.clone());
            if let Some(legacy) = legacy {
                self.snapshots.remove(&legacy);
            }
        }
        self.snapshots.insert(key, snapshot);
    }

    /// Replace the whole state, bypassing spacing and capacity checks.
    ///
    /// Used when loading files: imported keyframes may sit closer than the minimum spacing and
    /// must still resolve.
    pub fn restore(&mut self, mut times: Vec<f64>, snapshots: BTreeMap<String, SceneSnapshot>) {
        times.retain(|t| t.is_finite());
        times.sort_by(f64::total_cmp);
        times.dedup_by(|a, b| same_time(*a, *b));
        self.times = times;
        self.snapshots = snapshots;
    }

    /// Align every snapshot with the player set of `live`. Returns the number of snapshots changed.
    pub fn reconcile(&mut self, live: &SceneSnapshot) -> usize {
        self.snapshots
            .values_mut()
            .map(|s| reconcile_with_live(s, live))
            .filter(|changed| *changed)
            .count()
    }

    /// Purge a deleted player from every snapshot.
    pub fn purge_player(&mut self, id: &str) {
        for snapshot in self.snapshots.values_mut() {
            purge_player(snapshot, id);
        }
    }

    /// Times with no resolvable snapshot.
    pub fn unresolved_times(&self) -> Vec<f64> {
        self.times
            .iter()
            .copied()
            .filter(|t| resolve_snapshot(*t, &self.snapshots).is_none())
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/store.rs"]
mod tests;

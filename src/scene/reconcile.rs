//! Keeps stored snapshots consistent with the set of players in the live scene.

use std::collections::HashSet;

use crate::scene::model::SceneSnapshot;

/// Align `snapshot` with the player set of `live`.
///
/// Players realized in `live` but missing from `snapshot` are copied in at their live position;
/// ids `live` no longer knows about (neither realized nor represented) are purged. The ball is left
/// untouched. Returns `true` when `snapshot` changed.
pub fn reconcile_with_live(snapshot: &mut SceneSnapshot, live: &SceneSnapshot) -> bool {
    let before = (
        snapshot.players_by_id.len(),
        snapshot.represented_player_ids.clone(),
    );

    let known: HashSet<&str> = live
        .players_by_id
        .keys()
        .map(String::as_str)
        .chain(live.represented_player_ids.iter().map(String::as_str))
        .collect();

    snapshot
        .players_by_id
        .retain(|id, _| known.contains(id.as_str()));
    snapshot
        .represented_player_ids
        .retain(|id| known.contains(id.as_str()));

    for id in live.ordered_player_ids() {
        if let Some(player) = live.players_by_id.get(&id) {
            if !snapshot.players_by_id.contains_key(&id) {
                snapshot.players_by_id.insert(id.clone(), player.clone());
            }
        }
        if !snapshot.represented_player_ids.contains(&id) {
            snapshot.represented_player_ids.push(id);
        }
    }
    snapshot.dedupe_represented();

    before.0 != snapshot.players_by_id.len() || before.1 != snapshot.represented_player_ids
}

/// Remove every trace of `id` from `snapshot`. Returns `true` when something was removed.
pub fn purge_player(snapshot: &mut SceneSnapshot, id: &str) -> bool {
    let had_entry = snapshot.represented_player_ids.iter().any(|r| r == id);
    snapshot.remove_player(id).is_some() || had_entry
}

#[cfg(test)]
#[path = "../../tests/unit/scene/reconcile.rs"]
mod tests;

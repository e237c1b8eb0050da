//! Version-dispatching import of play files.
//!
//! Parsing, validation and migration produce a complete [`ImportedPlay`] before anything touches an
//! engine, so a failed import never leaves partial state behind.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde_json::Value;

use crate::foundation::core::same_time;
use crate::foundation::error::{PlayframeError, PlayframeResult};
use crate::playback::scheduler::PlaybackState;
use crate::scene::model::{BallToken, FieldState, SceneSnapshot};
use crate::scene::play::PlayInfo;
use crate::schema::export::PlayExport;
use crate::schema::tracks::{TrackDoc, migrate_tracks};
use crate::schema::validate::{
    SchemaError, SchemaErrors, SchemaPathElem, validate_snapshot_doc, validate_track_doc,
};
use crate::schema::version::{SNAPSHOT_SCHEMA_VERSION, SchemaKind, TRACK_SCHEMA_VERSION};
use crate::timeline::key::resolve_snapshot;

/// Largest play file accepted, in bytes.
pub const MAX_IMPORT_BYTES: usize = 5 * 1024 * 1024;

/// A fully parsed and validated play, ready to be applied to an engine.
#[derive(Clone, Debug)]
pub struct ImportedPlay {
    /// Layout the file used.
    pub schema: SchemaKind,
    pub info: PlayInfo,
    pub field: FieldState,
    /// Live scene; always holds a ball.
    pub scene: SceneSnapshot,
    /// Keyframe times as stored in the file (or produced by migration).
    pub keyframes: Vec<f64>,
    pub snapshots: BTreeMap<String, SceneSnapshot>,
    /// Playback parameters; `is_playing` is always `false`.
    pub playback: PlaybackState,
}

/// Parse a play document of either supported schema.
#[tracing::instrument(level = "debug", skip(text), fields(bytes = text.len()))]
pub fn parse_play(text: &str) -> PlayframeResult<ImportedPlay> {
    if text.len() > MAX_IMPORT_BYTES {
        return Err(too_large());
    }
    let root: Value = serde_json::from_str(text)
        .map_err(|e| PlayframeError::serde(format!("parse play JSON: {e}")))?;

    let Some(obj) = root.as_object() else {
        return Err(invalid(SchemaErrors::single(&[], "root must be an object")));
    };
    let version = match obj.get("schemaVersion") {
        Some(Value::String(v)) => v.as_str(),
        Some(_) => {
            return Err(invalid(SchemaErrors::single(
                &[SchemaPathElem::Field("schemaVersion")],
                "must be a string",
            )));
        }
        None => {
            return Err(invalid(SchemaErrors::single(
                &[SchemaPathElem::Field("schemaVersion")],
                "missing field",
            )));
        }
    };

    match SchemaKind::from_version(version) {
        Some(SchemaKind::Snapshot) => import_snapshot_doc(root),
        Some(SchemaKind::Track) => import_track_doc(root),
        None => Err(invalid(SchemaErrors::single(
            &[SchemaPathElem::Field("schemaVersion")],
            format!(
                "unsupported schemaVersion \"{version}\" (expected \"{SNAPSHOT_SCHEMA_VERSION}\" or \"{TRACK_SCHEMA_VERSION}\")"
            ),
        ))),
    }
}

/// Read a play document from `r`, refusing more than [`MAX_IMPORT_BYTES`].
pub fn read_play<R: Read>(r: R) -> PlayframeResult<String> {
    let mut text = String::new();
    r.take(MAX_IMPORT_BYTES as u64 + 1)
        .read_to_string(&mut text)
        .map_err(|e| PlayframeError::validation(format!("read play file: {e}")))?;
    if text.len() > MAX_IMPORT_BYTES {
        return Err(too_large());
    }
    Ok(text)
}

/// Read and parse a play file from disk.
pub fn load_play(path: impl AsRef<Path>) -> PlayframeResult<ImportedPlay> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| {
        PlayframeError::validation(format!("open play file '{}': {e}", path.display()))
    })?;
    let text = read_play(BufReader::new(f))?;
    parse_play(&text)
}

fn import_snapshot_doc(root: Value) -> PlayframeResult<ImportedPlay> {
    validate_snapshot_doc(&root).map_err(invalid)?;
    let doc: PlayExport = serde_json::from_value(root)
        .map_err(|e| PlayframeError::validation(format!("import validation failed: {e}")))?;
    let play = doc.play;
    let timeline = play.timeline;

    let unresolved: Vec<SchemaError> = timeline
        .keyframes
        .iter()
        .enumerate()
        .filter(|(_, t)| resolve_snapshot(**t, &timeline.keyframe_snapshots).is_none())
        .map(|(i, t)| {
            SchemaError::at(
                &[
                    SchemaPathElem::Field("play"),
                    SchemaPathElem::Field("timeline"),
                    SchemaPathElem::Field("keyframes"),
                    SchemaPathElem::Index(i),
                ],
                format!("keyframe {t} has no entry in keyframeSnapshots"),
            )
        })
        .collect();
    if !unresolved.is_empty() {
        return Err(invalid(SchemaErrors { errors: unresolved }));
    }

    let mut scene = SceneSnapshot {
        players_by_id: play.entities.players_by_id,
        represented_player_ids: play.entities.represented_player_ids,
        ball: play.entities.ball,
    };
    normalize_live(&mut scene);

    let mut snapshots = timeline.keyframe_snapshots;
    for snapshot in snapshots.values_mut() {
        snapshot.dedupe_represented();
    }

    let mut playback = timeline.playback.to_state();
    playback.selected_keyframe = playback
        .selected_keyframe
        .and_then(|sel| timeline.keyframes.iter().copied().find(|t| same_time(*t, sel)));

    Ok(ImportedPlay {
        schema: SchemaKind::Snapshot,
        info: PlayInfo {
            name: play.name,
            id: play.id,
            settings: play.settings,
            coordinate_system: play.canvas.coordinate_system,
        },
        field: FieldState {
            camera: play.canvas.camera,
            field_rotation: play.canvas.field_rotation,
        },
        scene,
        keyframes: timeline.keyframes,
        snapshots,
        playback,
    })
}

fn import_track_doc(root: Value) -> PlayframeResult<ImportedPlay> {
    validate_track_doc(&root).map_err(invalid)?;
    let doc: TrackDoc = serde_json::from_value(root)
        .map_err(|e| PlayframeError::validation(format!("import validation failed: {e}")))?;
    let migrated = migrate_tracks(&doc);

    let mut scene = resolve_snapshot(0.0, &migrated.snapshots)
        .map(|(_, s)| s.clone())
        .unwrap_or_default();
    normalize_live(&mut scene);
    tracing::debug!(
        players = scene.player_count(),
        keyframes = migrated.keyframes.len(),
        "migrated track document"
    );

    Ok(ImportedPlay {
        schema: SchemaKind::Track,
        info: migrated.info,
        field: FieldState::default(),
        scene,
        keyframes: migrated.keyframes,
        snapshots: migrated.snapshots,
        playback: migrated.playback,
    })
}

/// Live scenes always carry a display order and a ball.
fn normalize_live(scene: &mut SceneSnapshot) {
    scene.dedupe_represented();
    if scene.represented_player_ids.is_empty() {
        scene.represented_player_ids = scene.players_by_id.keys().cloned().collect();
    }
    if scene.ball.is_none() {
        scene.ball = Some(BallToken::default());
    }
}

fn invalid(e: SchemaErrors) -> PlayframeError {
    PlayframeError::validation(format!("import validation failed: {e}"))
}

fn too_large() -> PlayframeError {
    PlayframeError::validation(format!(
        "play file exceeds the {} MiB import limit",
        MAX_IMPORT_BYTES / (1024 * 1024)
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/schema/import.rs"]
mod tests;

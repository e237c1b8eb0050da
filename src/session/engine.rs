use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::edit::sync::{EditMode, edit_target};
use crate::foundation::core::{Point, clamp_percent, same_time};
use crate::foundation::error::{PlayframeError, PlayframeResult};
use crate::history::stack::History;
use crate::playback::scheduler::{FrameOutcome, FrameScheduler, FrameToken, Playback, PlaybackState};
use crate::scene::model::{Camera, FieldState, PlayerNumber, PlayerToken, SceneSnapshot, TokenRef};
use crate::scene::play::PlayInfo;
use crate::schema::export::{ExportInput, PlayExport, build_export};
use crate::schema::import::{ImportedPlay, load_play, parse_play, read_play};
use crate::schema::version::SchemaKind;
use crate::session::opts::TimelineOpts;
use crate::timeline::interp::sample_at;
use crate::timeline::store::{InsertResult, KeyframeStore};

/// A discrete, non-drag change to the live scene.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneEdit {
    /// Place a player at an absolute position.
    MovePlayer { id: String, x: f64, y: f64 },
    /// Place the ball at an absolute position.
    MoveBall { x: f64, y: f64 },
    /// Change display attributes of a player; `None` leaves a field as is.
    UpdatePlayer {
        id: String,
        number: Option<PlayerNumber>,
        name: Option<String>,
        assignment: Option<String>,
        color: Option<String>,
    },
    /// Add a new player.
    AddPlayer(PlayerToken),
    /// Delete a player from the live scene, every keyframe and the selection.
    RemovePlayer { id: String },
}

impl SceneEdit {
    fn changes_player_set(&self) -> bool {
        matches!(self, Self::AddPlayer(_) | Self::RemovePlayer { .. })
    }

    fn apply_to(&self, scene: &mut SceneSnapshot) -> PlayframeResult<()> {
        match self {
            Self::MovePlayer { id, x, y } => {
                scene.set_position(&TokenRef::player(id.as_str()), Point::new(*x, *y))
            }
            Self::MoveBall { x, y } => scene.set_position(&TokenRef::Ball, Point::new(*x, *y)),
            Self::UpdatePlayer {
                id,
                number,
                name,
                assignment,
                color,
            } => {
                let player = scene
                    .players_by_id
                    .get_mut(id)
                    .ok_or_else(|| PlayframeError::validation(format!("unknown player '{id}'")))?;
                if let Some(number) = number {
                    player.number = number.clone();
                }
                if let Some(name) = name {
                    player.name = name.clone();
                }
                if let Some(assignment) = assignment {
                    player.assignment = assignment.clone();
                }
                if let Some(color) = color {
                    player.color = color.clone();
                }
                Ok(())
            }
            Self::AddPlayer(player) => {
                if player.id.is_empty() {
                    return Err(PlayframeError::validation("player id must not be empty"));
                }
                if scene.player(&player.id).is_some() {
                    return Err(PlayframeError::validation(format!(
                        "player '{}' already exists",
                        player.id
                    )));
                }
                if !player.x.is_finite() || !player.y.is_finite() {
                    return Err(PlayframeError::validation(
                        "token position must be finite",
                    ));
                }
                scene.upsert_player(player.clone());
                Ok(())
            }
            Self::RemovePlayer { id } => scene
                .remove_player(id)
                .map(|_| ())
                .ok_or_else(|| PlayframeError::validation(format!("unknown player '{id}'"))),
        }
    }
}

/// Owner of all timeline state: live scene, keyframes, playback, edit mode, selection and the
/// scene and field histories.
///
/// Every operation validates before it mutates, so an `Err` leaves the engine unchanged.
#[derive(Debug)]
pub struct TimelineEngine {
    opts: TimelineOpts,
    info: PlayInfo,
    field: FieldState,
    scene: SceneSnapshot,
    store: KeyframeStore,
    playback: Playback,
    mode: EditMode,
    selection: BTreeSet<String>,
    scene_history: History<SceneSnapshot>,
    field_history: History<FieldState>,
}

impl Default for TimelineEngine {
    fn default() -> Self {
        Self::with_valid_opts(TimelineOpts::default())
    }
}

impl TimelineEngine {
    /// Create an engine holding an empty play with the default ball.
    pub fn new(opts: TimelineOpts) -> PlayframeResult<Self> {
        opts.validate()?;
        Ok(Self::with_valid_opts(opts))
    }

    fn with_valid_opts(opts: TimelineOpts) -> Self {
        Self {
            info: PlayInfo::default(),
            field: FieldState::default(),
            scene: SceneSnapshot::with_default_ball(),
            store: KeyframeStore::new(opts.max_keyframes, opts.min_spacing),
            playback: Playback::default(),
            mode: EditMode::Idle,
            selection: BTreeSet::new(),
            scene_history: History::new(opts.history_limit),
            field_history: History::new(opts.history_limit),
            opts,
        }
    }

    pub fn opts(&self) -> &TimelineOpts {
        &self.opts
    }

    pub fn info(&self) -> &PlayInfo {
        &self.info
    }

    pub fn set_play_name(&mut self, name: impl Into<String>) {
        self.info.name = name.into();
    }

    /// The live scene.
    pub fn scene(&self) -> &SceneSnapshot {
        &self.scene
    }

    pub fn field(&self) -> &FieldState {
        &self.field
    }

    pub fn store(&self) -> &KeyframeStore {
        &self.store
    }

    pub fn keyframe_times(&self) -> &[f64] {
        self.store.times()
    }

    pub fn playback(&self) -> &PlaybackState {
        self.playback.state()
    }

    pub fn time(&self) -> f64 {
        self.playback.time()
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn selected_keyframe(&self) -> Option<f64> {
        self.playback.state().selected_keyframe
    }

    /// Players currently selected in the editor.
    pub fn selection(&self) -> &BTreeSet<String> {
        &self.selection
    }

    pub fn can_undo(&self) -> bool {
        self.scene_history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.scene_history.can_redo()
    }

    pub fn can_undo_field(&self) -> bool {
        self.field_history.can_undo()
    }

    pub fn can_redo_field(&self) -> bool {
        self.field_history.can_redo()
    }

    /// Interpolated scene at `time` without touching the live scene.
    pub fn sample(&self, time: f64) -> Option<SceneSnapshot> {
        sample_at(time, self.store.snapshots())
    }

    // ---- keyframes ----

    /// Add a keyframe at `time` holding the live scene.
    ///
    /// `TooClose` selects the existing keyframe instead; `AtCapacity` changes nothing.
    pub fn insert_keyframe(&mut self, time: f64) -> PlayframeResult<InsertResult> {
        self.ensure_idle("insert a keyframe")?;
        if !time.is_finite() {
            return Err(PlayframeError::validation("keyframe time must be finite"));
        }
        let time = clamp_percent(time);
        let result = self.store.insert(time);
        match result {
            InsertResult::Added { time } => {
                self.store.write(time, self.scene.clone());
                self.store.reconcile(&self.scene);
                self.scene_history.clear_future();
                self.playback.set_selected(Some(time));
                tracing::debug!(time, count = self.store.len(), "keyframe added");
            }
            InsertResult::TooClose { existing } => {
                self.playback.set_selected(Some(existing));
                tracing::debug!(time, existing, "keyframe too close; selected existing");
            }
            InsertResult::AtCapacity => {
                tracing::debug!(time, max = self.opts.max_keyframes, "keyframe limit reached");
            }
        }
        Ok(result)
    }

    /// Add a keyframe at the playback cursor.
    pub fn insert_keyframe_at_cursor(&mut self) -> PlayframeResult<InsertResult> {
        self.insert_keyframe(self.time())
    }

    /// Remove the keyframe at `time`. Returns `false` when there is none.
    pub fn delete_keyframe(&mut self, time: f64) -> PlayframeResult<bool> {
        self.ensure_idle("delete a keyframe")?;
        if !self.store.delete(time) {
            return Ok(false);
        }
        if self
            .selected_keyframe()
            .is_some_and(|sel| same_time(sel, time))
        {
            self.playback.set_selected(None);
        }
        self.store.reconcile(&self.scene);
        tracing::debug!(time, count = self.store.len(), "keyframe deleted");
        Ok(true)
    }

    pub fn clear_keyframes(&mut self) -> PlayframeResult<()> {
        self.ensure_idle("clear keyframes")?;
        self.store.clear();
        self.playback.set_selected(None);
        Ok(())
    }

    /// Select the keyframe at `time` and move the cursor onto it; `None` clears the selection.
    pub fn select_keyframe(&mut self, time: Option<f64>) -> PlayframeResult<()> {
        let Some(time) = time else {
            self.playback.set_selected(None);
            return Ok(());
        };
        let live = self
            .store
            .find(time)
            .ok_or_else(|| PlayframeError::validation(format!("no keyframe at {time}")))?;
        self.scrub(live)?;
        self.playback.set_selected(Some(live));
        Ok(())
    }

    // ---- time ----

    /// Move the cursor and show the interpolated scene there.
    ///
    /// During a drag only the cursor moves; the live scene keeps the dragged positions.
    pub fn scrub(&mut self, time: f64) -> PlayframeResult<()> {
        if self.mode.is_restoring() {
            return Err(PlayframeError::mode("cannot scrub while restoring"));
        }
        self.playback.set_time(time)?;
        if !self.mode.is_dragging() {
            self.apply_sample()?;
        }
        Ok(())
    }

    pub fn play(&mut self, frames: &mut dyn FrameScheduler) {
        self.playback.play(frames);
    }

    pub fn pause(&mut self, frames: &mut dyn FrameScheduler) {
        self.playback.pause(frames);
    }

    pub fn toggle_play(&mut self, frames: &mut dyn FrameScheduler) {
        self.playback.toggle(frames);
    }

    pub fn set_speed_multiplier(&mut self, speed: u8) {
        self.playback.set_speed_multiplier(speed);
    }

    pub fn set_autoplay(&mut self, enabled: bool) {
        self.playback.set_autoplay(enabled);
    }

    pub fn set_loop_seconds(&mut self, secs: f64) -> PlayframeResult<()> {
        self.playback.set_loop_seconds(secs)
    }

    /// Handle a display frame. Advanced time is applied to the live scene unless a drag is active.
    pub fn on_frame(
        &mut self,
        frames: &mut dyn FrameScheduler,
        token: FrameToken,
        now_secs: f64,
    ) -> PlayframeResult<FrameOutcome> {
        let outcome = self.playback.on_frame(frames, token, now_secs);
        if matches!(outcome, FrameOutcome::Advanced { .. } | FrameOutcome::Finished)
            && self.mode.is_idle()
        {
            self.apply_sample()?;
        }
        Ok(outcome)
    }

    /// Replace the live scene with the sample at the cursor. Live players missing from the sample
    /// and the live ball are kept.
    fn apply_sample(&mut self) -> PlayframeResult<bool> {
        let Some(mut sample) = sample_at(self.playback.time(), self.store.snapshots()) else {
            return Ok(false);
        };
        self.mode.begin_restore()?;
        for id in self.scene.ordered_player_ids() {
            if sample.player(&id).is_none() {
                if let Some(player) = self.scene.player(&id) {
                    sample.upsert_player(player.clone());
                }
            }
        }
        if sample.ball.is_none() {
            sample.ball = self.scene.ball.take();
        }
        self.scene = sample;
        self.mode.end_restore()?;
        Ok(true)
    }

    // ---- edits ----

    /// Start a pointer drag. Records the pre-drag scene for undo.
    pub fn begin_drag(&mut self) -> PlayframeResult<()> {
        self.mode.begin_drag()?;
        self.record_scene();
        Ok(())
    }

    /// Move a token during a drag. Only the live scene changes.
    pub fn drag_to(&mut self, token: &TokenRef, x: f64, y: f64) -> PlayframeResult<()> {
        if !self.mode.is_dragging() {
            return Err(PlayframeError::mode(format!(
                "cannot move a token without an active drag (mode {:?})",
                self.mode
            )));
        }
        self.scene.set_position(token, Point::new(x, y))
    }

    /// Finish a drag and persist the live scene into the edit target.
    ///
    /// Returns the keyframe written, if any.
    pub fn end_drag(&mut self) -> PlayframeResult<Option<f64>> {
        self.mode.end_drag()?;
        self.sync_edit()
    }

    /// Apply a discrete edit and persist it into the edit target.
    ///
    /// Returns the keyframe written, if any.
    pub fn apply_edit(&mut self, edit: SceneEdit) -> PlayframeResult<Option<f64>> {
        self.ensure_idle("apply an edit")?;
        let mut next = self.scene.clone();
        edit.apply_to(&mut next)?;

        self.record_scene();
        self.scene = next;
        if let SceneEdit::RemovePlayer { id } = &edit {
            self.store.purge_player(id);
            self.selection.remove(id);
        }
        if edit.changes_player_set() {
            let changed = self.store.reconcile(&self.scene);
            tracing::debug!(changed, "reconciled keyframes with live players");
        }
        self.sync_edit()
    }

    fn sync_edit(&mut self) -> PlayframeResult<Option<f64>> {
        let time = self.playback.time();
        let target = edit_target(time, self.store.times(), self.opts.edit_tolerance);
        match target {
            Some(target) => {
                self.store.write(target, self.scene.clone());
                tracing::debug!(time, target, "live scene written to keyframe");
                if (target - time).abs() > self.opts.edit_tolerance {
                    self.apply_sample()?;
                }
            }
            None => tracing::debug!(time, "edit between keyframes left unpersisted"),
        }
        Ok(target)
    }

    /// Replace the player selection. Unknown ids are rejected.
    pub fn set_selection<I, S>(&mut self, ids: I) -> PlayframeResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: BTreeSet<String> = ids.into_iter().map(Into::into).collect();
        if let Some(unknown) = ids.iter().find(|id| self.scene.player(id).is_none()) {
            return Err(PlayframeError::validation(format!(
                "unknown player '{unknown}'"
            )));
        }
        self.selection = ids;
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ---- history ----

    fn record_scene(&mut self) {
        if !self.mode.is_restoring() {
            self.scene_history.record(self.scene.clone());
        }
    }

    fn record_field(&mut self) {
        if !self.mode.is_restoring() {
            self.field_history.record(self.field);
        }
    }

    fn ensure_idle(&self, what: &str) -> PlayframeResult<()> {
        if self.mode.is_idle() {
            Ok(())
        } else {
            Err(PlayframeError::mode(format!(
                "cannot {what} while {:?}",
                self.mode
            )))
        }
    }

    /// Undo the last scene edit. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> PlayframeResult<bool> {
        self.ensure_idle("undo")?;
        let Some(prev) = self.scene_history.undo(self.scene.clone()) else {
            return Ok(false);
        };
        self.restore_scene(prev)?;
        Ok(true)
    }

    /// Redo the last undone scene edit. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> PlayframeResult<bool> {
        self.ensure_idle("redo")?;
        let Some(next) = self.scene_history.redo(self.scene.clone()) else {
            return Ok(false);
        };
        self.restore_scene(next)?;
        Ok(true)
    }

    fn restore_scene(&mut self, scene: SceneSnapshot) -> PlayframeResult<()> {
        self.mode.begin_restore()?;
        let player_set_changed = !self.scene.same_player_set(&scene);
        self.scene = scene;
        if player_set_changed {
            self.store.reconcile(&self.scene);
            let scene = &self.scene;
            self.selection.retain(|id| scene.player(id).is_some());
        }
        // Written while still restoring: the keyframe follows the undo without recording history.
        if let Some(target) = edit_target(
            self.playback.time(),
            self.store.times(),
            self.opts.edit_tolerance,
        ) {
            self.store.write(target, self.scene.clone());
        }
        self.mode.end_restore()
    }

    /// Move the camera. Recorded on the field history.
    pub fn set_camera(&mut self, camera: Camera) -> PlayframeResult<()> {
        if !camera.x.is_finite() || !camera.y.is_finite() {
            return Err(PlayframeError::validation("camera position must be finite"));
        }
        if !camera.zoom.is_finite() || camera.zoom <= 0.0 {
            return Err(PlayframeError::validation("camera zoom must be finite and > 0"));
        }
        self.record_field();
        self.field.camera = camera;
        Ok(())
    }

    /// Rotate the field, in degrees. Recorded on the field history.
    pub fn set_field_rotation(&mut self, degrees: f64) -> PlayframeResult<()> {
        if !degrees.is_finite() {
            return Err(PlayframeError::validation("field rotation must be finite"));
        }
        self.record_field();
        self.field.field_rotation = degrees;
        Ok(())
    }

    pub fn undo_field(&mut self) -> PlayframeResult<bool> {
        self.ensure_idle("undo a field change")?;
        let Some(prev) = self.field_history.undo(self.field) else {
            return Ok(false);
        };
        self.restore_field(prev)?;
        Ok(true)
    }

    pub fn redo_field(&mut self) -> PlayframeResult<bool> {
        self.ensure_idle("redo a field change")?;
        let Some(next) = self.field_history.redo(self.field) else {
            return Ok(false);
        };
        self.restore_field(next)?;
        Ok(true)
    }

    fn restore_field(&mut self, field: FieldState) -> PlayframeResult<()> {
        self.mode.begin_restore()?;
        self.field = field;
        self.mode.end_restore()
    }

    /// Back to an empty play: default scene, field and playback, no keyframes, no history.
    pub fn reset(&mut self, frames: &mut dyn FrameScheduler) {
        self.playback.pause(frames);
        *self = Self::with_valid_opts(self.opts.clone());
    }

    /// Default camera and rotation; clears only the field history.
    pub fn reset_field(&mut self) {
        self.field = FieldState::default();
        self.field_history.reset();
    }

    // ---- import / export ----

    /// Build a `play-export-v1` document stamped with the current time.
    pub fn export(&self) -> PlayExport {
        self.export_at(Utc::now())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn export_at(&self, exported_at: DateTime<Utc>) -> PlayExport {
        build_export(
            ExportInput {
                info: &self.info,
                field: &self.field,
                scene: &self.scene,
                store: &self.store,
                playback: self.playback.state(),
            },
            exported_at,
        )
    }

    /// Pretty-printed export document.
    pub fn export_json(&self) -> PlayframeResult<String> {
        serde_json::to_string_pretty(&self.export())
            .map_err(|e| PlayframeError::serde(format!("write play JSON: {e}")))
    }

    /// Replace the whole engine state with a play document of either schema.
    ///
    /// Nothing changes unless the document parses and validates.
    #[tracing::instrument(level = "debug", skip(self, text), fields(bytes = text.len()))]
    pub fn import_str(&mut self, text: &str) -> PlayframeResult<SchemaKind> {
        self.ensure_importable()?;
        let play = parse_play(text)?;
        self.apply_import(play)
    }

    /// Like [`Self::import_str`], reading at most [`crate::MAX_IMPORT_BYTES`] from `r`.
    pub fn import_reader<R: Read>(&mut self, r: R) -> PlayframeResult<SchemaKind> {
        self.ensure_importable()?;
        let text = read_play(r)?;
        self.import_str(&text)
    }

    /// Like [`Self::import_str`], reading a file from disk.
    #[tracing::instrument(level = "debug", skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn import_path(&mut self, path: impl AsRef<Path>) -> PlayframeResult<SchemaKind> {
        self.ensure_importable()?;
        let play = load_play(path)?;
        self.apply_import(play)
    }

    fn ensure_importable(&self) -> PlayframeResult<()> {
        self.ensure_idle("import")?;
        if self.playback.is_playing() {
            return Err(PlayframeError::mode("pause playback before importing"));
        }
        Ok(())
    }

    fn apply_import(&mut self, play: ImportedPlay) -> PlayframeResult<SchemaKind> {
        self.mode.begin_restore()?;
        let mut store = KeyframeStore::new(self.opts.max_keyframes, self.opts.min_spacing);
        store.restore(play.keyframes, play.snapshots);
        self.store = store;
        self.info = play.info;
        self.field = play.field;
        self.scene = play.scene;
        self.playback = Playback::new(play.playback);
        self.selection.clear();
        self.scene_history.reset();
        self.field_history.reset();
        self.mode.end_restore()?;
        tracing::debug!(
            schema = play.schema.version(),
            players = self.scene.player_count(),
            keyframes = self.store.len(),
            "play imported"
        );
        Ok(play.schema)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/engine.rs"]
mod tests;

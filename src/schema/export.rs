//! On-disk layout of the discrete-snapshot format and the export builder.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::playback::scheduler::PlaybackState;
use crate::scene::model::{BallToken, Camera, FieldState, PlayerToken, SceneSnapshot};
use crate::scene::play::{DEFAULT_COORDINATE_SYSTEM, PlayInfo, PlaySettings};
use crate::schema::version::SNAPSHOT_SCHEMA_VERSION;
use crate::timeline::store::KeyframeStore;

/// A complete `play-export-v1` document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayExport {
    pub schema_version: String,
    #[serde(default)]
    pub exported_at: String,
    pub play: PlayDoc,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayDoc {
    pub name: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub settings: PlaySettings,
    #[serde(default)]
    pub canvas: CanvasDoc,
    pub entities: EntitiesDoc,
    pub timeline: TimelineDoc,
    #[serde(default)]
    pub meta: MetaDoc,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasDoc {
    #[serde(default)]
    pub camera: Camera,
    #[serde(default)]
    pub field_rotation: f64,
    #[serde(default = "default_coordinate_system")]
    pub coordinate_system: String,
}

fn default_coordinate_system() -> String {
    DEFAULT_COORDINATE_SYSTEM.to_owned()
}

impl Default for CanvasDoc {
    fn default() -> Self {
        Self {
            camera: Camera::default(),
            field_rotation: 0.0,
            coordinate_system: default_coordinate_system(),
        }
    }
}

/// The live scene at export time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitiesDoc {
    pub players_by_id: BTreeMap<String, PlayerToken>,
    #[serde(default)]
    pub represented_player_ids: Vec<String>,
    #[serde(default)]
    pub ball: Option<BallToken>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineDoc {
    pub keyframes: Vec<f64>,
    pub keyframe_snapshots: BTreeMap<String, SceneSnapshot>,
    #[serde(default)]
    pub playback: PlaybackDoc,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackDoc {
    #[serde(default)]
    pub time_percent: f64,
    #[serde(default = "default_speed")]
    pub speed_multiplier: u8,
    #[serde(default = "default_autoplay")]
    pub autoplay_enabled: bool,
    #[serde(default = "default_loop_seconds")]
    pub loop_seconds: f64,
    #[serde(default)]
    pub selected_keyframe: Option<f64>,
}

fn default_speed() -> u8 {
    PlaybackState::default().speed_multiplier
}

fn default_autoplay() -> bool {
    PlaybackState::default().autoplay_enabled
}

fn default_loop_seconds() -> f64 {
    PlaybackState::default().loop_seconds
}

impl Default for PlaybackDoc {
    fn default() -> Self {
        PlaybackDoc::from(&PlaybackState::default())
    }
}

impl From<&PlaybackState> for PlaybackDoc {
    fn from(s: &PlaybackState) -> Self {
        Self {
            time_percent: s.time_percent,
            speed_multiplier: s.speed_multiplier,
            autoplay_enabled: s.autoplay_enabled,
            loop_seconds: s.loop_seconds,
            selected_keyframe: s.selected_keyframe,
        }
    }
}

impl PlaybackDoc {
    /// Convert to engine state, replacing out-of-range values with defaults.
    pub(crate) fn to_state(&self) -> PlaybackState {
        let defaults = PlaybackState::default();
        PlaybackState {
            time_percent: if self.time_percent.is_finite() {
                self.time_percent.clamp(0.0, 100.0)
            } else {
                defaults.time_percent
            },
            is_playing: false,
            speed_multiplier: self.speed_multiplier.min(100),
            autoplay_enabled: self.autoplay_enabled,
            loop_seconds: if self.loop_seconds.is_finite() && self.loop_seconds > 0.0 {
                self.loop_seconds
            } else {
                defaults.loop_seconds
            },
            selected_keyframe: self.selected_keyframe,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaDoc {
    #[serde(default)]
    pub app_version: String,
}

impl Default for MetaDoc {
    fn default() -> Self {
        Self {
            app_version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

/// Everything export reads from the engine.
pub(crate) struct ExportInput<'a> {
    pub(crate) info: &'a PlayInfo,
    pub(crate) field: &'a FieldState,
    pub(crate) scene: &'a SceneSnapshot,
    pub(crate) store: &'a KeyframeStore,
    pub(crate) playback: &'a PlaybackState,
}

/// Build a `play-export-v1` document. The internal model already has the snapshot shape, so this is
/// a structural copy plus metadata.
pub(crate) fn build_export(input: ExportInput<'_>, exported_at: DateTime<Utc>) -> PlayExport {
    PlayExport {
        schema_version: SNAPSHOT_SCHEMA_VERSION.to_owned(),
        exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        play: PlayDoc {
            name: input.info.name.clone(),
            id: input.info.id.clone(),
            settings: input.info.settings.clone(),
            canvas: CanvasDoc {
                camera: input.field.camera,
                field_rotation: input.field.field_rotation,
                coordinate_system: input.info.coordinate_system.clone(),
            },
            entities: EntitiesDoc {
                players_by_id: input.scene.players_by_id.clone(),
                represented_player_ids: input.scene.represented_player_ids.clone(),
                ball: input.scene.ball.clone(),
            },
            timeline: TimelineDoc {
                keyframes: input.store.times().to_vec(),
                keyframe_snapshots: input.store.snapshots().clone(),
                playback: PlaybackDoc::from(input.playback),
            },
            meta: MetaDoc::default(),
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schema/export.rs"]
mod tests;

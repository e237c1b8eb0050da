//! Playframe is the timeline engine behind a sports-play diagram editor.
//!
//! A play is a set of scene snapshots (player and ball positions) pinned to times on a `[0, 100]`
//! percent scale. The engine interpolates between them for playback, keeps keyframes in sync with
//! live edits, and carries independent undo stacks for the scene and the field view:
//!
//! - Build or [`TimelineEngine::import_str`] a play
//! - Insert keyframes, drag tokens, scrub and play through [`TimelineEngine`]
//! - Write it back out with [`TimelineEngine::export`]
#![forbid(unsafe_code)]

mod foundation;

/// Edit-mode state machine and edit-target selection.
pub mod edit;
/// Bounded undo/redo stacks.
pub mod history;
/// Frame-driven playback.
pub mod playback;
/// Scene value types.
pub mod scene;
/// On-disk play formats.
pub mod schema;
/// The engine facade and its options.
pub mod session;
/// Keyframe storage, keys and interpolation.
pub mod timeline;

pub use crate::foundation::core::{Lerp, PERCENT_MAX, PERCENT_MIN, Point, clamp_percent};
pub use crate::foundation::error::{PlayframeError, PlayframeResult};

pub use crate::edit::sync::{EditMode, edit_target};
pub use crate::history::stack::History;
pub use crate::playback::scheduler::{
    FrameOutcome, FrameScheduler, FrameToken, ManualFrames, Playback, PlaybackState, speed_factor,
};
pub use crate::scene::model::{
    BallToken, Camera, FieldState, PlayerNumber, PlayerToken, SceneSnapshot, TokenRef,
};
pub use crate::scene::play::{PlayInfo, PlaySettings};
pub use crate::schema::export::PlayExport;
pub use crate::schema::import::{ImportedPlay, MAX_IMPORT_BYTES, load_play, parse_play, read_play};
pub use crate::schema::version::{SNAPSHOT_SCHEMA_VERSION, SchemaKind, TRACK_SCHEMA_VERSION};
pub use crate::session::engine::{SceneEdit, TimelineEngine};
pub use crate::session::opts::TimelineOpts;
pub use crate::timeline::interp::sample_at;
pub use crate::timeline::key::{encode_percent_key, resolve_snapshot};
pub use crate::timeline::store::{InsertResult, KeyframeStore};

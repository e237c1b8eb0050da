//! Play file formats.
//!
//! `play-export-v1` is written and read; `1.0.0` track files are read and migrated to keyframes.

pub mod export;
pub mod import;
pub mod tracks;
pub(crate) mod validate;
pub mod version;

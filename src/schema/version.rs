/// Version tag of the discrete-snapshot format; the only format written by export.
pub const SNAPSHOT_SCHEMA_VERSION: &str = "play-export-v1";
/// Version tag of the continuous-track format; read and migrated on import.
pub const TRACK_SCHEMA_VERSION: &str = "1.0.0";

/// Which on-disk layout a file used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaKind {
    /// `play-export-v1`: keyframe times plus one snapshot per keyframe.
    Snapshot,
    /// `1.0.0`: per-token millisecond tracks.
    Track,
}

impl SchemaKind {
    /// Detect the layout from a `schemaVersion` value.
    pub fn from_version(version: &str) -> Option<Self> {
        match version {
            SNAPSHOT_SCHEMA_VERSION => Some(Self::Snapshot),
            TRACK_SCHEMA_VERSION => Some(Self::Track),
            _ => None,
        }
    }

    pub fn version(self) -> &'static str {
        match self {
            Self::Snapshot => SNAPSHOT_SCHEMA_VERSION,
            Self::Track => TRACK_SCHEMA_VERSION,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schema/version.rs"]
mod tests;

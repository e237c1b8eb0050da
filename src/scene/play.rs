use serde::{Deserialize, Serialize};

use crate::scene::model::DEFAULT_PLAYER_COLOR;

/// Coordinate system tag written when a play does not declare one.
pub const DEFAULT_COORDINATE_SYSTEM: &str = "canvas-px";

/// Display settings carried alongside a play.
///
/// The engine does not interpret them; they round-trip through import and export unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaySettings {
    #[serde(default)]
    pub advanced_settings: serde_json::Value,
    #[serde(default)]
    pub all_players_display: serde_json::Value,
    #[serde(default = "default_current_color")]
    pub current_player_color: String,
}

fn default_current_color() -> String {
    DEFAULT_PLAYER_COLOR.to_owned()
}

impl Default for PlaySettings {
    fn default() -> Self {
        Self {
            advanced_settings: serde_json::Value::Object(Default::default()),
            all_players_display: serde_json::Value::Object(Default::default()),
            current_player_color: default_current_color(),
        }
    }
}

/// Identity and presentation metadata of the play being edited.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayInfo {
    pub name: String,
    pub id: String,
    pub settings: PlaySettings,
    pub coordinate_system: String,
}

impl Default for PlayInfo {
    fn default() -> Self {
        Self {
            name: "Untitled play".to_owned(),
            id: String::new(),
            settings: PlaySettings::default(),
            coordinate_system: DEFAULT_COORDINATE_SYSTEM.to_owned(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/play.rs"]
mod tests;

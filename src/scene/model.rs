use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::foundation::core::Point;
use crate::foundation::error::{PlayframeError, PlayframeResult};

/// Color assigned to players created without one.
pub const DEFAULT_PLAYER_COLOR: &str = "#1d4ed8";
/// Id of the ball synthesized when a scene has none.
pub const DEFAULT_BALL_ID: &str = "ball";

/// Jersey number as authored: either numeric or free text (`"7"`, `"GK"`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlayerNumber {
    /// Numeric jersey number.
    Number(serde_json::Number),
    /// Textual label.
    Text(String),
}

impl Default for PlayerNumber {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<u32> for PlayerNumber {
    fn from(n: u32) -> Self {
        Self::Number(n.into())
    }
}

impl From<&str> for PlayerNumber {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

/// A player token on the field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerToken {
    /// Stable identity.
    pub id: String,
    /// Horizontal position in field coordinates.
    pub x: f64,
    /// Vertical position in field coordinates.
    pub y: f64,
    /// Jersey number or label.
    #[serde(default)]
    pub number: PlayerNumber,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Free-form assignment text ("screen", "cut left", ...).
    #[serde(default)]
    pub assignment: String,
    /// Fill color as `#rrggbb`.
    #[serde(default = "default_player_color")]
    pub color: String,
}

fn default_player_color() -> String {
    DEFAULT_PLAYER_COLOR.to_owned()
}

impl PlayerToken {
    /// Build a player with default display attributes.
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            number: PlayerNumber::default(),
            name: String::new(),
            assignment: String::new(),
            color: default_player_color(),
        }
    }

    /// Current position as a point.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub(crate) fn set_position(&mut self, p: Point) {
        self.x = p.x;
        self.y = p.y;
    }
}

/// The ball token.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BallToken {
    /// Stable identity.
    pub id: String,
    /// Horizontal position in field coordinates.
    pub x: f64,
    /// Vertical position in field coordinates.
    pub y: f64,
}

impl Default for BallToken {
    fn default() -> Self {
        Self {
            id: DEFAULT_BALL_ID.to_owned(),
            x: 0.0,
            y: 0.0,
        }
    }
}

impl BallToken {
    /// Current position as a point.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub(crate) fn set_position(&mut self, p: Point) {
        self.x = p.x;
        self.y = p.y;
    }
}

/// Reference to a movable token in a scene.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenRef {
    /// A player by id.
    Player(String),
    /// The ball.
    Ball,
}

impl TokenRef {
    /// Shorthand for [`TokenRef::Player`].
    pub fn player(id: impl Into<String>) -> Self {
        Self::Player(id.into())
    }
}

/// All token positions and attributes at one instant.
///
/// Snapshots are plain values: everything that retains one (keyframes, history) owns its own
/// clone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSnapshot {
    /// Player records keyed by id.
    #[serde(default)]
    pub players_by_id: BTreeMap<String, PlayerToken>,
    /// Display order. May mention ids with no record yet; never holds duplicates.
    #[serde(default)]
    pub represented_player_ids: Vec<String>,
    /// The ball, if this snapshot has one.
    #[serde(default)]
    pub ball: Option<BallToken>,
}

impl SceneSnapshot {
    /// An empty scene holding only the default ball.
    pub fn with_default_ball() -> Self {
        Self {
            ball: Some(BallToken::default()),
            ..Self::default()
        }
    }

    /// Look up a player record.
    pub fn player(&self, id: &str) -> Option<&PlayerToken> {
        self.players_by_id.get(id)
    }

    /// Number of realized player records.
    pub fn player_count(&self) -> usize {
        self.players_by_id.len()
    }

    /// Insert or replace a player, appending it to the display order when new.
    pub fn upsert_player(&mut self, player: PlayerToken) {
        if !self.represented_player_ids.iter().any(|id| *id == player.id) {
            self.represented_player_ids.push(player.id.clone());
        }
        self.players_by_id.insert(player.id.clone(), player);
    }

    /// Remove a player record and its display-order entry.
    pub fn remove_player(&mut self, id: &str) -> Option<PlayerToken> {
        self.represented_player_ids.retain(|r| r != id);
        self.players_by_id.remove(id)
    }

    /// Ids in display order: represented ids first, then any record not yet represented.
    pub fn ordered_player_ids(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(self.represented_player_ids.len());
        for id in self
            .represented_player_ids
            .iter()
            .chain(self.players_by_id.keys())
        {
            if !out.contains(id) {
                out.push(id.clone());
            }
        }
        out
    }

    /// Drop repeated entries from `represented_player_ids`, keeping first occurrences.
    pub fn dedupe_represented(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.represented_player_ids
            .retain(|id| seen.insert(id.clone()));
    }

    /// Position of a token, if present.
    pub fn position_of(&self, token: &TokenRef) -> Option<Point> {
        match token {
            TokenRef::Player(id) => self.player(id).map(PlayerToken::position),
            TokenRef::Ball => self.ball.as_ref().map(BallToken::position),
        }
    }

    /// Move a token. Fails when the token is not part of this scene.
    pub fn set_position(&mut self, token: &TokenRef, p: Point) -> PlayframeResult<()> {
        if !p.x.is_finite() || !p.y.is_finite() {
            return Err(PlayframeError::validation(
                "token position must be finite",
            ));
        }
        match token {
            TokenRef::Player(id) => {
                let player = self
                    .players_by_id
                    .get_mut(id)
                    .ok_or_else(|| PlayframeError::validation(format!("unknown player '{id}'")))?;
                player.set_position(p);
            }
            TokenRef::Ball => {
                let ball = self
                    .ball
                    .as_mut()
                    .ok_or_else(|| PlayframeError::validation("scene has no ball"))?;
                ball.set_position(p);
            }
        }
        Ok(())
    }

    /// Whether both scenes realize exactly the same set of player ids.
    pub(crate) fn same_player_set(&self, other: &Self) -> bool {
        self.players_by_id.len() == other.players_by_id.len()
            && self
                .players_by_id
                .keys()
                .all(|id| other.players_by_id.contains_key(id))
    }
}

/// Viewport camera over the field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Pan offset, horizontal.
    pub x: f64,
    /// Pan offset, vertical.
    pub y: f64,
    /// Zoom factor; `1.0` is unscaled.
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

/// Camera plus field orientation; the unit of the field undo stack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldState {
    /// Viewport camera.
    pub camera: Camera,
    /// Field rotation in degrees.
    pub field_rotation: f64,
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;

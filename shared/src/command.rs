use serde::{Deserialize, Serialize};

use crate::game_state::GameState;

/// Message a game-state provider or parent controller sends to the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapCommand {
    /// Redraw the map from a new snapshot.
    GameState { state: GameState },
    /// Center the view on a player drawn by the last snapshot.
    CenterOnPlayer { player: String },
}

impl MapCommand {
    pub fn from_json(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|e| format!("invalid map command: {e}"))
    }
}

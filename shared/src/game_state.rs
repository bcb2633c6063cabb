use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::coord::Coord;

pub type PlayerId = String;
pub type PlayerMap = BTreeMap<PlayerId, PlayerState>;
pub type LootMap = BTreeMap<Coord, LootInfo>;

/// Collectible value lying on a tile, in base units (see [`crate::money::COIN`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootInfo {
    pub amount: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub coord: Coord,
    /// Team index. 0 and 1 are the two playable teams.
    #[serde(default)]
    pub color: u8,
}

/// Read-only world snapshot handed to the map view by the game-state provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    #[serde(default)]
    pub players: PlayerMap,
    #[serde(default, with = "loot_entries")]
    pub loot: LootMap,
}

impl GameState {
    pub fn is_empty(&self) -> bool {
        self.players.is_empty() && self.loot.is_empty()
    }
}

/// JSON object keys are strings, so loot travels as a list of `{x, y, amount}` entries.
mod loot_entries {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{Coord, LootInfo, LootMap};

    #[derive(Serialize, Deserialize)]
    struct LootEntry {
        x: i32,
        y: i32,
        amount: i64,
    }

    pub fn serialize<S: Serializer>(loot: &LootMap, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(loot.iter().map(|(coord, info)| LootEntry {
            x: coord.x,
            y: coord.y,
            amount: info.amount,
        }))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<LootMap, D::Error> {
        let entries = Vec::<LootEntry>::deserialize(deserializer)?;
        Ok(entries
            .into_iter()
            .map(|e| (Coord::new(e.x, e.y), LootInfo { amount: e.amount }))
            .collect())
    }
}

use std::cmp::Reverse;

use crate::config::MapStyle;
use crate::coord::Coord;
use crate::game_state::{PlayerMap, PlayerState};

/// Origin axis hint drawn near the top-left of tile (0, 0).
pub const AXIS_LABEL: &str = "\u{a0}\u{a0} \u{2192} x\n\u{2193}\ny";

/// A player placed in draw order with its position in the tile's stack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StackedPlayer<'a> {
    pub name: &'a str,
    pub state: &'a PlayerState,
    /// 0 for the first occupant drawn on a tile, 1 for the next, and so on.
    pub rank: u32,
}

/// Order players by descending coordinate so tiles further down and right draw
/// last and sit on top. Occupants of one tile keep name order and get rising ranks.
pub fn stack_players(players: &PlayerMap) -> Vec<StackedPlayer<'_>> {
    let mut ordered: Vec<(&str, &PlayerState)> = players
        .iter()
        .map(|(name, state)| (name.as_str(), state))
        .collect();
    // Stable: equal coordinates stay in name order.
    ordered.sort_by_key(|(_, state)| Reverse(state.coord));

    let mut out = Vec::with_capacity(ordered.len());
    let mut prev: Option<(Coord, u32)> = None;
    for (name, state) in ordered {
        let rank = match prev {
            Some((coord, rank)) if coord == state.coord => rank + 1,
            _ => 0,
        };
        prev = Some((state.coord, rank));
        out.push(StackedPlayer { name, state, rank });
    }
    out
}

pub fn stack_offset(rank: u32, style: &MapStyle) -> (f64, f64) {
    (
        rank as f64 * style.stack_step_x,
        rank as f64 * style.stack_step_y,
    )
}

pub fn player_marker_origin(coord: Coord, rank: u32, style: &MapStyle) -> (f64, f64) {
    let (x, y) = coord.tile_origin(style.tile_size);
    let (dx, dy) = stack_offset(rank, style);
    (x + dx, y + dy)
}

pub fn name_label_origin(marker: (f64, f64), style: &MapStyle) -> (f64, f64) {
    (marker.0 + style.name_inset, marker.1)
}

pub fn loot_label_origin(coord: Coord, style: &MapStyle) -> (f64, f64) {
    let (x, y) = coord.tile_origin(style.tile_size);
    (x, y + style.loot_label_drop)
}

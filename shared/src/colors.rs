pub type Rgb = (u8, u8, u8);

pub const BLACK: Rgb = (0, 0, 0);
pub const WHITE: Rgb = (255, 255, 255);
/// Terrain fill of a background tile.
pub const GROUND: Rgb = (0, 180, 0);
pub const LOOT_YELLOW: Rgb = (255, 255, 0);
pub const TEAM_RED: Rgb = (255, 0, 0);
pub const TEAM_BLUE: Rgb = (0, 0, 255);

/// Marker fill for a team index. Team 0 is red, every other index draws blue.
pub const fn player_fill(color: u8) -> Rgb {
    if color == 0 { TEAM_RED } else { TEAM_BLUE }
}

/// Name label color for a team index. Only team 1 gets light text.
pub const fn player_text(color: u8) -> Rgb {
    if color == 1 { WHITE } else { BLACK }
}

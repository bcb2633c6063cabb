use serde::{Deserialize, Serialize};

/// Integer tile position on the game grid.
///
/// Ordering is lexicographic (`x` first, then `y`), which is what the sorted
/// loot map and the player stacking order rely on.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Top-left corner of the tile in world pixels.
    pub fn tile_origin(self, tile_size: f64) -> (f64, f64) {
        (self.x as f64 * tile_size, self.y as f64 * tile_size)
    }

    /// Midpoint of the tile in world pixels.
    pub fn tile_center(self, tile_size: f64) -> (f64, f64) {
        (
            (self.x as f64 + 0.5) * tile_size,
            (self.y as f64 + 0.5) * tile_size,
        )
    }
}

pub mod colors;
pub mod command;
pub mod config;
pub mod coord;
pub mod draw;
pub mod game_state;
pub mod label_layout;
pub mod map_view;
pub mod money;
pub mod viewport;

pub use command::MapCommand;
pub use config::MapStyle;
pub use coord::Coord;
pub use draw::{BackgroundBrush, DrawCommand, DrawList, Layer, Rect, TextAlign};
pub use game_state::{GameState, LootInfo, PlayerState};
pub use map_view::MapView;
pub use viewport::Viewport;

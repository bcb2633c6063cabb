use std::collections::HashMap;

use crate::colors::{player_fill, player_text};
use crate::config::MapStyle;
use crate::coord::Coord;
use crate::draw::{BackgroundBrush, DrawCommand, DrawList, Layer, Rect, TextAlign};
use crate::game_state::GameState;
use crate::label_layout::{
    AXIS_LABEL, loot_label_origin, name_label_origin, player_marker_origin, stack_players,
};
use crate::money::write_money;
use crate::viewport::Viewport;

/// Render model of the world map.
///
/// Owns the draw list and the name -> tile table used for centering. Both are
/// rebuilt wholesale by [`MapView::update_game_map`].
#[derive(Debug, Clone)]
pub struct MapView {
    style: MapStyle,
    scene: DrawList,
    player_locations: HashMap<String, Coord>,
    fingerprint: Option<u32>,
    revision: u64,
}

impl Default for MapView {
    fn default() -> Self {
        Self::new(MapStyle::default())
    }
}

impl MapView {
    pub fn new(style: MapStyle) -> Self {
        let style = style.sanitized();
        let background = BackgroundBrush {
            tile_size: style.tile_size,
            fill: style.ground_color,
            stroke: style.grid_color,
        };
        Self {
            style,
            scene: DrawList::new(background),
            player_locations: HashMap::new(),
            fingerprint: None,
            revision: 0,
        }
    }

    pub fn style(&self) -> &MapStyle {
        &self.style
    }

    pub fn background(&self) -> &BackgroundBrush {
        self.scene.background()
    }

    pub fn scene(&self) -> &DrawList {
        &self.scene
    }

    /// Bumped whenever an update changes what is drawn.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Clear the scene and redraw it from `state`. Returns whether the drawn
    /// result differs from the previous one.
    pub fn update_game_map(&mut self, state: &GameState) -> bool {
        let ts = self.style.tile_size;
        self.scene.clear();

        self.scene.push(DrawCommand::Text {
            layer: Layer::Overlay,
            x: self.style.axis_label_x,
            y: self.style.axis_label_y,
            text: AXIS_LABEL.to_string(),
            color: self.style.axis_label_color,
            align: TextAlign::Left,
            width: None,
        });

        let mut amount = String::with_capacity(20);
        for (coord, loot) in &state.loot {
            let (x, y) = coord.tile_origin(ts);
            self.scene.push(DrawCommand::Ellipse {
                layer: Layer::Loot,
                bounds: Rect::new(x, y, ts, ts),
                stroke: self.style.loot_stroke,
                fill: self.style.loot_fill,
            });
            write_money(&mut amount, loot.amount);
            let (lx, ly) = loot_label_origin(*coord, &self.style);
            self.scene.push(DrawCommand::Text {
                layer: Layer::Loot,
                x: lx,
                y: ly,
                text: amount.clone(),
                color: self.style.loot_label_color,
                align: TextAlign::Center,
                width: Some(ts),
            });
        }

        self.player_locations.clear();
        self.player_locations.reserve(state.players.len());
        for (name, player) in &state.players {
            self.player_locations.insert(name.clone(), player.coord);
        }

        for stacked in stack_players(&state.players) {
            let color = stacked.state.color;
            let (x, y) = player_marker_origin(stacked.state.coord, stacked.rank, &self.style);
            self.scene.push(DrawCommand::Rect {
                layer: Layer::Players,
                bounds: Rect::new(x, y, ts, ts),
                stroke: self.style.marker_stroke,
                fill: player_fill(color),
            });
            let (nx, ny) = name_label_origin((x, y), &self.style);
            self.scene.push(DrawCommand::Text {
                layer: Layer::Players,
                x: nx,
                y: ny,
                text: stacked.name.to_string(),
                color: player_text(color),
                align: TextAlign::Left,
                width: None,
            });
        }

        let fingerprint = self.scene.fingerprint();
        let changed = self.fingerprint != Some(fingerprint);
        if changed {
            self.fingerprint = Some(fingerprint);
            self.revision += 1;
        }

        tracing::debug!(
            loot = state.loot.len(),
            players = state.players.len(),
            commands = self.scene.len(),
            revision = self.revision,
            changed,
            "rebuilt map scene"
        );
        changed
    }

    pub fn player_location(&self, name: &str) -> Option<Coord> {
        self.player_locations.get(name).copied()
    }

    /// World-pixel midpoint of the tile the player was last drawn on.
    pub fn player_focus(&self, name: &str) -> Option<(f64, f64)> {
        self.player_location(name)
            .map(|coord| coord.tile_center(self.style.tile_size))
    }

    /// Names of the players in the last update, sorted.
    pub fn player_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.player_locations.keys().cloned().collect();
        names.sort();
        names
    }

    /// Center `viewport` on the named player's tile. Unknown names leave it untouched.
    pub fn center_map_on_player(&self, name: &str, viewport: &mut Viewport) -> bool {
        let Some((wx, wy)) = self.player_focus(name) else {
            tracing::trace!(player = name, "center request for unknown player ignored");
            return false;
        };
        viewport.center_on(wx, wy);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BLACK, LOOT_YELLOW, TEAM_BLUE, TEAM_RED, WHITE};
    use crate::game_state::{LootInfo, PlayerState};
    use crate::money::COIN;

    fn state(loot: &[(i32, i32, i64)], players: &[(&str, i32, i32, u8)]) -> GameState {
        let mut state = GameState::default();
        for &(x, y, amount) in loot {
            state.loot.insert(Coord::new(x, y), LootInfo { amount });
        }
        for &(name, x, y, color) in players {
            state.players.insert(
                name.to_string(),
                PlayerState {
                    coord: Coord::new(x, y),
                    color,
                },
            );
        }
        state
    }

    fn rects(view: &MapView) -> Vec<Rect> {
        view.scene()
            .layer(Layer::Players)
            .filter_map(|c| match c {
                DrawCommand::Rect { bounds, .. } => Some(*bounds),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn empty_state_draws_only_axis_label() {
        let mut view = MapView::default();
        view.update_game_map(&GameState::default());
        assert_eq!(view.scene().len(), 1);
        match &view.scene().commands()[0] {
            DrawCommand::Text { x, y, text, color, .. } => {
                assert_eq!((*x, *y), (-6.0, -12.0));
                assert_eq!(text, AXIS_LABEL);
                assert_eq!(*color, WHITE);
            }
            other => panic!("expected axis label, got {other:?}"),
        }
    }

    #[test]
    fn one_marker_and_label_per_loot_entry() {
        let mut view = MapView::default();
        view.update_game_map(&state(&[(0, 0, COIN), (3, -2, 150_000_000)], &[]));

        let loot: Vec<&DrawCommand> = view.scene().layer(Layer::Loot).collect();
        assert_eq!(loot.len(), 4);

        assert_eq!(
            loot[2],
            &DrawCommand::Ellipse {
                layer: Layer::Loot,
                bounds: Rect::new(144.0, -96.0, 48.0, 48.0),
                stroke: BLACK,
                fill: LOOT_YELLOW,
            }
        );
        assert_eq!(
            loot[3],
            &DrawCommand::Text {
                layer: Layer::Loot,
                x: 144.0,
                y: -83.0,
                text: "1.50".to_string(),
                color: BLACK,
                align: TextAlign::Center,
                width: Some(48.0),
            }
        );
    }

    #[test]
    fn players_use_team_colors() {
        let mut view = MapView::default();
        view.update_game_map(&state(&[], &[("red", 0, 0, 0), ("blue", 5, 5, 1)]));

        let players: Vec<&DrawCommand> = view.scene().layer(Layer::Players).collect();
        assert_eq!(players.len(), 4);
        // (5,5) sorts first in descending order.
        match (players[0], players[1]) {
            (DrawCommand::Rect { fill, .. }, DrawCommand::Text { text, color, x, y, .. }) => {
                assert_eq!(*fill, TEAM_BLUE);
                assert_eq!(text, "blue");
                assert_eq!(*color, WHITE);
                assert_eq!((*x, *y), (242.0, 240.0));
            }
            other => panic!("unexpected commands {other:?}"),
        }
        match (players[2], players[3]) {
            (DrawCommand::Rect { fill, .. }, DrawCommand::Text { text, color, .. }) => {
                assert_eq!(*fill, TEAM_RED);
                assert_eq!(text, "red");
                assert_eq!(*color, BLACK);
            }
            other => panic!("unexpected commands {other:?}"),
        }
    }

    #[test]
    fn stacked_players_shift_per_occupant() {
        let mut view = MapView::default();
        view.update_game_map(&state(
            &[],
            &[("a", 1, 1, 0), ("b", 1, 1, 1), ("c", 1, 1, 0), ("d", 0, 4, 0)],
        ));
        assert_eq!(
            rects(&view),
            vec![
                Rect::new(48.0, 48.0, 48.0, 48.0),
                Rect::new(50.0, 61.0, 48.0, 48.0),
                Rect::new(52.0, 74.0, 48.0, 48.0),
                Rect::new(0.0, 192.0, 48.0, 48.0),
            ]
        );
    }

    #[test]
    fn draw_order_is_axis_loot_players() {
        let mut view = MapView::default();
        view.update_game_map(&state(&[(9, 9, 1)], &[("p", -3, -3, 0)]));
        let layers: Vec<Layer> = view.scene().commands().iter().map(|c| c.layer()).collect();
        assert_eq!(
            layers,
            vec![
                Layer::Overlay,
                Layer::Loot,
                Layer::Loot,
                Layer::Players,
                Layer::Players,
            ]
        );
    }

    #[test]
    fn update_replaces_previous_scene_and_locations() {
        let mut view = MapView::default();
        view.update_game_map(&state(&[(1, 1, 1)], &[("gone", 2, 2, 0)]));
        view.update_game_map(&state(&[], &[("here", 4, 4, 1)]));

        assert_eq!(view.scene().layer(Layer::Loot).count(), 0);
        assert_eq!(view.player_location("gone"), None);
        assert_eq!(view.player_location("here"), Some(Coord::new(4, 4)));
        assert_eq!(view.player_names(), vec!["here".to_string()]);
    }

    #[test]
    fn revision_only_moves_when_scene_changes() {
        let mut view = MapView::default();
        assert_eq!(view.revision(), 0);
        let snapshot = state(&[(1, 1, 1)], &[("p", 0, 0, 0)]);
        assert!(view.update_game_map(&snapshot));
        assert_eq!(view.revision(), 1);
        assert!(!view.update_game_map(&snapshot));
        assert_eq!(view.revision(), 1);
        assert!(view.update_game_map(&state(&[(1, 1, 2)], &[("p", 0, 0, 0)])));
        assert_eq!(view.revision(), 2);
    }

    #[test]
    fn centering_on_known_player_uses_tile_midpoint() {
        let mut view = MapView::default();
        view.update_game_map(&state(&[], &[("alice", 3, -2, 0)]));

        let mut vp = Viewport::new(800.0, 600.0);
        assert!(view.center_map_on_player("alice", &mut vp));
        assert_eq!(vp.center_world(), (3.5 * 48.0, -1.5 * 48.0));
    }

    #[test]
    fn centering_on_unknown_player_is_a_no_op() {
        let mut view = MapView::default();
        view.update_game_map(&state(&[], &[("alice", 3, -2, 0)]));

        let mut vp = Viewport::new(800.0, 600.0);
        vp.pan(17.0, -4.0);
        let before = vp.clone();
        assert!(!view.center_map_on_player("mallory", &mut vp));
        assert_eq!(vp, before);
    }

    #[test]
    fn custom_tile_size_scales_everything() {
        let mut view = MapView::new(MapStyle {
            tile_size: 10.0,
            ..MapStyle::default()
        });
        view.update_game_map(&state(&[(2, 3, 1)], &[("p", 2, 3, 0)]));
        assert_eq!(view.background().tile_size, 10.0);
        assert_eq!(rects(&view), vec![Rect::new(20.0, 30.0, 10.0, 10.0)]);
        assert_eq!(view.player_focus("p"), Some((25.0, 35.0)));
    }
}

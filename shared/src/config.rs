use serde::{Deserialize, Serialize};

use crate::colors::{BLACK, GROUND, LOOT_YELLOW, Rgb, WHITE};

pub const DEFAULT_TILE_SIZE: f64 = 48.0;
pub const DEFAULT_FONT_PX: f64 = 12.0;
/// Smallest tile edge accepted from configuration. Below this the background
/// alone needs millions of tiles per frame.
pub const MIN_TILE_SIZE: f64 = 8.0;

/// Visual constants of the map. Every field is optional in JSON; missing fields
/// take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapStyle {
    /// Edge length of a grid tile in world pixels.
    pub tile_size: f64,
    pub ground_color: Rgb,
    pub grid_color: Rgb,
    pub loot_fill: Rgb,
    pub loot_stroke: Rgb,
    /// Vertical drop of the amount label below the loot tile's top edge.
    pub loot_label_drop: f64,
    /// Per-occupant shift of stacked player markers.
    pub stack_step_x: f64,
    pub stack_step_y: f64,
    /// Horizontal inset of a name label inside its marker.
    pub name_inset: f64,
    pub marker_stroke: Rgb,
    pub axis_label_x: f64,
    pub axis_label_y: f64,
    pub axis_label_color: Rgb,
    pub loot_label_color: Rgb,
    pub font_px: f64,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            ground_color: GROUND,
            grid_color: BLACK,
            loot_fill: LOOT_YELLOW,
            loot_stroke: BLACK,
            loot_label_drop: 13.0,
            stack_step_x: 2.0,
            stack_step_y: 13.0,
            name_inset: 2.0,
            marker_stroke: BLACK,
            axis_label_x: -6.0,
            axis_label_y: -12.0,
            axis_label_color: WHITE,
            loot_label_color: BLACK,
            font_px: DEFAULT_FONT_PX,
        }
    }
}

impl MapStyle {
    /// Replace values that cannot produce a drawable map with their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.tile_size.is_finite() && self.tile_size >= MIN_TILE_SIZE) {
            tracing::warn!(tile_size = self.tile_size, "invalid tile size, using default");
            self.tile_size = defaults.tile_size;
        }
        if !(self.font_px.is_finite() && self.font_px > 0.0) {
            tracing::warn!(font_px = self.font_px, "invalid font size, using default");
            self.font_px = defaults.font_px;
        }
        // Stack offsets must grow with occupancy.
        self.stack_step_x = positive_or(self.stack_step_x, defaults.stack_step_x, "stack_step_x");
        self.stack_step_y = positive_or(self.stack_step_y, defaults.stack_step_y, "stack_step_y");
        self.loot_label_drop =
            finite_or(self.loot_label_drop, defaults.loot_label_drop, "loot_label_drop");
        self.name_inset = finite_or(self.name_inset, defaults.name_inset, "name_inset");
        self.axis_label_x = finite_or(self.axis_label_x, defaults.axis_label_x, "axis_label_x");
        self.axis_label_y = finite_or(self.axis_label_y, defaults.axis_label_y, "axis_label_y");
        self
    }
}

fn positive_or(value: f64, default: f64, field: &'static str) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        tracing::warn!(field, value, "non-positive stack step, using default");
        default
    }
}

fn finite_or(value: f64, default: f64, field: &'static str) -> f64 {
    if value.is_finite() {
        value
    } else {
        tracing::warn!(field, value, "non-finite style offset, using default");
        default
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let style: MapStyle =
            serde_json::from_value(json!({ "tile_size": 32.0, "ground_color": [10, 20, 30] }))
                .expect("style decodes");
        assert_eq!(style.tile_size, 32.0);
        assert_eq!(style.ground_color, (10, 20, 30));
        assert_eq!(style.stack_step_y, 13.0);
        assert_eq!(style.loot_fill, LOOT_YELLOW);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let style: MapStyle =
            serde_json::from_value(json!({ "zoom": 4 })).expect("style decodes");
        assert_eq!(style, MapStyle::default());
    }

    #[test]
    fn sanitized_restores_unusable_sizes() {
        let style = MapStyle {
            tile_size: 0.0,
            font_px: f64::NAN,
            ..MapStyle::default()
        }
        .sanitized();
        assert_eq!(style.tile_size, DEFAULT_TILE_SIZE);
        assert_eq!(style.font_px, DEFAULT_FONT_PX);

        let custom = MapStyle {
            tile_size: 20.0,
            ..MapStyle::default()
        }
        .sanitized();
        assert_eq!(custom.tile_size, 20.0);
    }

    #[test]
    fn sanitized_rejects_tiny_tiles() {
        let style = MapStyle {
            tile_size: 1e-4,
            ..MapStyle::default()
        }
        .sanitized();
        assert_eq!(style.tile_size, DEFAULT_TILE_SIZE);

        let smallest = MapStyle {
            tile_size: MIN_TILE_SIZE,
            ..MapStyle::default()
        }
        .sanitized();
        assert_eq!(smallest.tile_size, MIN_TILE_SIZE);
    }

    #[test]
    fn sanitized_keeps_stack_steps_increasing() {
        let style: MapStyle =
            serde_json::from_value(json!({ "stack_step_x": 0.0, "stack_step_y": -13.0 }))
                .expect("style decodes");
        let style = style.sanitized();
        assert_eq!(style.stack_step_x, 2.0);
        assert_eq!(style.stack_step_y, 13.0);

        let custom = MapStyle {
            stack_step_y: 8.0,
            ..MapStyle::default()
        }
        .sanitized();
        assert_eq!(custom.stack_step_y, 8.0);
    }

    #[test]
    fn sanitized_restores_non_finite_offsets() {
        let style = MapStyle {
            loot_label_drop: f64::NAN,
            name_inset: f64::INFINITY,
            axis_label_x: f64::NEG_INFINITY,
            axis_label_y: -20.0,
            ..MapStyle::default()
        }
        .sanitized();
        assert_eq!(style.loot_label_drop, 13.0);
        assert_eq!(style.name_inset, 2.0);
        assert_eq!(style.axis_label_x, -6.0);
        assert_eq!(style.axis_label_y, -20.0);
    }
}

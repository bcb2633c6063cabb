use serde::{Deserialize, Serialize};

use crate::colors::Rgb;

/// Axis-aligned rectangle in world pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect {
            x,
            y,
            w: self.right().max(other.right()) - x,
            h: self.bottom().max(other.bottom()) - y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Overlay,
    Loot,
    Players,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    /// Centered inside the command's `width`.
    Center,
}

/// One backend-neutral primitive. Backends draw commands in list order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    Rect {
        layer: Layer,
        bounds: Rect,
        stroke: Rgb,
        fill: Rgb,
    },
    Ellipse {
        layer: Layer,
        bounds: Rect,
        stroke: Rgb,
        fill: Rgb,
    },
    /// `(x, y)` is the top-left of the text box. `text` may span lines.
    Text {
        layer: Layer,
        x: f64,
        y: f64,
        text: String,
        color: Rgb,
        align: TextAlign,
        width: Option<f64>,
    },
}

impl DrawCommand {
    pub fn layer(&self) -> Layer {
        match self {
            DrawCommand::Rect { layer, .. }
            | DrawCommand::Ellipse { layer, .. }
            | DrawCommand::Text { layer, .. } => *layer,
        }
    }

    /// Geometric extent. Text without a layout width only contributes its anchor.
    pub fn bounds(&self) -> Rect {
        match self {
            DrawCommand::Rect { bounds, .. } | DrawCommand::Ellipse { bounds, .. } => *bounds,
            DrawCommand::Text { x, y, width, .. } => Rect::new(*x, *y, width.unwrap_or(0.0), 0.0),
        }
    }
}

/// Terrain brush repeated under the whole map: a filled tile with a grid outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackgroundBrush {
    pub tile_size: f64,
    pub fill: Rgb,
    pub stroke: Rgb,
}

impl BackgroundBrush {
    /// Tiles needed to cover `view`, row by row. Tiles are anchored at the world origin.
    pub fn tiles_in(&self, view: Rect) -> impl Iterator<Item = Rect> + use<> {
        let ts = self.tile_size;
        let (cols, rows) = if ts > 0.0 && view.w > 0.0 && view.h > 0.0 {
            (
                (view.x / ts).floor() as i64..(view.right() / ts).ceil() as i64,
                (view.y / ts).floor() as i64..(view.bottom() / ts).ceil() as i64,
            )
        } else {
            (0..0, 0..0)
        };
        rows.flat_map(move |row| {
            cols.clone()
                .map(move |col| Rect::new(col as f64 * ts, row as f64 * ts, ts, ts))
        })
    }
}

/// Ordered primitives of one rendered map, plus the background brush.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawList {
    background: BackgroundBrush,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(background: BackgroundBrush) -> Self {
        Self {
            background,
            commands: Vec::new(),
        }
    }

    pub fn background(&self) -> &BackgroundBrush {
        &self.background
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn layer(&self, layer: Layer) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(move |c| c.layer() == layer)
    }

    /// Union of every primitive's extent, or `None` for an empty list.
    pub fn bounds(&self) -> Option<Rect> {
        self.commands
            .iter()
            .map(DrawCommand::bounds)
            .reduce(|acc, r| acc.union(&r))
    }

    /// CRC32 over the serialized commands. Equal lists hash equal.
    pub fn fingerprint(&self) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        for command in &self.commands {
            match serde_json::to_vec(command) {
                Ok(bytes) => hasher.update(&bytes),
                Err(e) => tracing::warn!(error = %e, "failed to serialize draw command"),
            }
        }
        hasher.finalize()
    }
}

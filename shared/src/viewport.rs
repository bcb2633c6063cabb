use crate::draw::Rect;

/// Pan transform from world pixels to screen pixels, plus the screen size it maps onto.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Viewport {
    pub offset_x: f64,
    pub offset_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            width,
            height,
        }
    }

    /// Convert world coordinates to screen coordinates.
    pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
        (wx + self.offset_x, wy + self.offset_y)
    }

    /// Convert screen coordinates to world coordinates.
    pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
        (sx - self.offset_x, sy - self.offset_y)
    }

    /// Pan by screen-space delta.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Change the screen size, keeping the world point under the screen center fixed.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.offset_x += (width - self.width) / 2.0;
        self.offset_y += (height - self.height) / 2.0;
        self.width = width;
        self.height = height;
    }

    /// World point currently shown at the screen center.
    pub fn center_world(&self) -> (f64, f64) {
        self.screen_to_world(self.width / 2.0, self.height / 2.0)
    }

    pub fn center_on(&mut self, wx: f64, wy: f64) {
        self.offset_x = self.width / 2.0 - wx;
        self.offset_y = self.height / 2.0 - wy;
    }

    pub fn center_on_rect(&mut self, rect: &Rect) {
        let (cx, cy) = rect.center();
        self.center_on(cx, cy);
    }

    /// World rectangle covered by the screen.
    pub fn visible_world_rect(&self) -> Rect {
        let (x, y) = self.screen_to_world(0.0, 0.0);
        Rect::new(x, y, self.width, self.height)
    }
}

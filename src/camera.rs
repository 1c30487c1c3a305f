use crate::config::WorldConfig;

/// A fixed-size window into world space that follows a focus point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    tile_px: f32,
    /// Added to the focus so the actor's tile, not its corner, is centered.
    bias: f32,
}

impl Camera {
    pub fn new(config: &WorldConfig) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: config.viewport_width,
            height: config.viewport_height,
            tile_px: config.tile_px(),
            bias: config.tile_size as f32,
        }
    }

    /// Centers on `focus` (a top-left world position) and clamps to the world.
    pub fn center_on(
        &mut self,
        focus: (f32, f32),
        world_cols: usize,
        world_rows: usize,
    ) -> (f32, f32) {
        self.x = focus.0 - self.width / 2.0 + self.bias;
        self.y = focus.1 - self.height / 2.0 + self.bias;
        self.clamp(world_cols, world_rows);
        (self.x, self.y)
    }

    /// Keeps the view inside `[0, world - viewport]`; pins to 0 when the world is smaller.
    pub fn clamp(&mut self, world_cols: usize, world_rows: usize) {
        let max_x = world_cols as f32 * self.tile_px - self.width;
        let max_y = world_rows as f32 * self.tile_px - self.height;
        self.x = self.x.min(max_x).max(0.0);
        self.y = self.y.min(max_y).max(0.0);
    }

    /// Viewport-relative draw position of a world point. The world value is untouched.
    pub fn to_view(&self, world: (f32, f32)) -> (f32, f32) {
        (world.0 - self.x, world.1 - self.y)
    }
}

//! Looping two-tile ground scroller
//!
//! Two tiles drift left with the world; a tile fully past the left edge
//! hops to the right of the other, so the strip never shows a seam.

use crate::tuning::Tuning;

#[derive(Debug, Clone)]
pub struct GroundScroller {
    /// X positions of the two tiles
    pub tiles: [f32; 2],
    tile_width: f32,
    scroll_speed: f32,
}

impl GroundScroller {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            tiles: [0.0, tuning.ground_tile_width],
            tile_width: tuning.ground_tile_width,
            scroll_speed: tuning.scroll_speed,
        }
    }

    pub fn reset(&mut self) {
        self.tiles = [0.0, self.tile_width];
    }

    pub fn tick(&mut self, dt: f32) {
        let dx = self.scroll_speed * dt;
        self.tiles[0] -= dx;
        self.tiles[1] -= dx;

        if self.tiles[0] <= -self.tile_width {
            self.tiles[0] = self.tiles[1] + self.tile_width;
        } else if self.tiles[1] <= -self.tile_width {
            self.tiles[1] = self.tiles[0] + self.tile_width;
        }
    }
}

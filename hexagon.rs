//! hexagon - Hexagon outlines and the scrolling hexagon grid

use core::f32::consts::FRAC_PI_3;

use crate::field::Viewport;

/// Height factor of a flat-topped hexagon relative to its circumradius.
const SQRT_3: f32 = 1.732_050_8;

/// Corner points of a hexagon centred on `(cx, cy)`, starting at angle 0
/// and advancing in 60° steps.
pub fn hexagon_vertices(cx: f32, cy: f32, size: f32) -> [(f32, f32); 6] {
    core::array::from_fn(|i| {
        let angle = FRAC_PI_3 * i as f32;
        (cx + size * libm::cosf(angle), cy + size * libm::sinf(angle))
    })
}

/// A static tiling of hexagons that scrolls downward one row pitch at a time.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HexGrid {
    size: f32,
    columns: i32,
    rows: i32,
    offset: f32,
}

impl HexGrid {
    pub fn new(viewport: Viewport, size: f32) -> Self {
        let mut grid = Self {
            size,
            columns: 0,
            rows: 0,
            offset: 0.0,
        };
        grid.resize(viewport);
        grid
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn columns(&self) -> i32 {
        self.columns
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    fn column_pitch(&self) -> f32 {
        self.size * 2.0
    }

    /// Vertical distance between consecutive rows.
    pub fn row_pitch(&self) -> f32 {
        self.size * SQRT_3 * 0.75
    }

    /// Recompute how many rows and columns cover the viewport. The scroll
    /// offset is kept.
    pub fn resize(&mut self, viewport: Viewport) {
        if self.size <= 0.0 {
            self.columns = 0;
            self.rows = 0;
            return;
        }
        self.columns = libm::ceilf(viewport.width as f32 / self.column_pitch()) as i32 + 1;
        self.rows = libm::ceilf(viewport.height as f32 / self.row_pitch()) as i32 + 1;
    }

    /// Scroll by `speed`, wrapping after one row pitch so the pattern repeats.
    pub fn advance(&mut self, speed: f32) {
        let pitch = self.row_pitch();
        if pitch <= 0.0 {
            return;
        }
        self.offset = libm::fmodf(self.offset + speed, pitch);
    }

    /// Centres of every cell, including one extra row and column before the
    /// origin so scrolling never exposes an empty band.
    pub fn cells(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        let first = if self.rows > 0 && self.columns > 0 { -1 } else { self.rows };
        (first..self.rows).flat_map(move |row| {
            (-1..self.columns).map(move |col| {
                let shift = if row.rem_euclid(2) == 0 { self.size } else { 0.0 };
                let x = col as f32 * self.column_pitch() + shift;
                let y = row as f32 * self.row_pitch() + self.offset;
                (x, y)
            })
        })
    }
}

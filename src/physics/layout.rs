//! Board geometry in world units: cell rectangles, the U-shaped column
//! channels pieces fall into, and the arena around the board.
//!
//! The board's top-left corner sits at the origin; `x` grows to the right and
//! `y` grows downward, so row 0 is the top row. Everything above `y = 0` is
//! the spawn zone.

use glam::Vec2;

use crate::config::{BoardConfig, PhysicsConfig};
use crate::game::CellPos;

/// Number of cell pitches between the board top and the arena ceiling.
const CEILING_PITCHES: f32 = 4.0;

/// Staggered rows of bouncer pegs above the board in plinko mode.
const PLINKO_ROWS: usize = 2;

/// A static line collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
}

impl Segment {
    pub const fn new(a: Vec2, b: Vec2) -> Self {
        Segment { a, b }
    }

    /// Closest point on the segment to `p`.
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        let ab = self.b - self.a;
        let len_sq = ab.length_squared();
        if len_sq <= f32::EPSILON {
            return self.a;
        }
        let t = ((p - self.a).dot(ab) / len_sq).clamp(0.0, 1.0);
        self.a + ab * t
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardLayout {
    num_cols: usize,
    num_rows: usize,
    cell_size: f32,
    cell_spacing: f32,
    arena_margin: f32,
    plinko: bool,
}

impl BoardLayout {
    pub fn new(
        num_cols: usize,
        num_rows: usize,
        cell_size: f32,
        cell_spacing: f32,
        arena_margin: f32,
    ) -> Self {
        BoardLayout {
            num_cols,
            num_rows,
            cell_size,
            cell_spacing,
            arena_margin,
            plinko: false,
        }
    }

    /// Add bouncer pegs between the drop height and the board.
    pub fn with_plinko(mut self, plinko: bool) -> Self {
        self.plinko = plinko;
        self
    }

    pub fn from_config(board: &BoardConfig, physics: &PhysicsConfig) -> Self {
        Self::new(
            board.num_cols,
            board.num_rows,
            board.cell_size,
            board.cell_spacing,
            physics.arena_margin,
        )
        .with_plinko(physics.plinko)
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Distance between neighbouring cell origins.
    pub fn pitch(&self) -> f32 {
        self.cell_size + self.cell_spacing
    }

    pub fn board_width(&self) -> f32 {
        self.num_cols as f32 * self.pitch() - self.cell_spacing
    }

    pub fn board_height(&self) -> f32 {
        self.num_rows as f32 * self.pitch() - self.cell_spacing
    }

    /// Rectangle occupied by a cell. Out-of-range cells extrapolate the grid.
    pub fn cell_rect(&self, cell: CellPos) -> Rect {
        let min = Vec2::new(
            cell.col as f32 * self.pitch(),
            cell.row as f32 * self.pitch(),
        );
        Rect {
            min,
            max: min + Vec2::new(self.cell_size, self.cell_size),
        }
    }

    pub fn cell_center(&self, cell: CellPos) -> Vec2 {
        self.cell_rect(cell).center()
    }

    /// Point-overlap query against the cell layer. Points in the spacing
    /// between cells or outside the grid hit nothing.
    pub fn cell_at(&self, point: Vec2) -> Option<CellPos> {
        let col = self.axis_index(point.x, self.num_cols)?;
        let row = self.axis_index(point.y, self.num_rows)?;
        Some(CellPos::new(col, row))
    }

    fn axis_index(&self, coord: f32, count: usize) -> Option<usize> {
        if coord < 0.0 {
            return None;
        }
        let index = (coord / self.pitch()).floor() as usize;
        if index >= count {
            return None;
        }
        let local = coord - index as f32 * self.pitch();
        (local <= self.cell_size).then_some(index)
    }

    /// Column whose channel spans `x`, if any.
    pub fn column_at(&self, x: f32) -> Option<usize> {
        self.axis_index(x, self.num_cols)
    }

    pub fn column_center_x(&self, col: usize) -> f32 {
        col as f32 * self.pitch() + self.cell_size * 0.5
    }

    /// Where an automated drop into `col` starts: one pitch above the board,
    /// or above the top row of pegs in plinko mode.
    pub fn column_spawn_point(&self, col: usize) -> Vec2 {
        let pitches = if self.plinko {
            PLINKO_ROWS as f32 + 1.25
        } else {
            1.0
        };
        Vec2::new(self.column_center_x(col), -pitches * self.pitch())
    }

    pub fn is_plinko(&self) -> bool {
        self.plinko
    }

    pub fn bouncer_radius(&self) -> f32 {
        self.cell_size * 0.1
    }

    /// Centres of the bouncer pegs. Each row sits a quarter pitch off the
    /// column centres, alternating sides, so straight drops get deflected.
    pub fn bouncers(&self) -> Vec<Vec2> {
        if !self.plinko {
            return Vec::new();
        }
        let mut pegs = Vec::with_capacity(PLINKO_ROWS * self.num_cols);
        for row in 0..PLINKO_ROWS {
            let y = -(row as f32 + 1.25) * self.pitch();
            let side = if row % 2 == 0 { -0.25 } else { 0.25 };
            let offset = side * self.pitch();
            for col in 0..self.num_cols {
                pegs.push(Vec2::new(self.column_center_x(col) + offset, y));
            }
        }
        pegs
    }

    /// Lowest `y` a held piece may be dragged to without entering the board.
    pub fn spawn_line(&self) -> f32 {
        -self.cell_size * 0.5
    }

    /// Keep a held piece inside the spawn zone above the board.
    pub fn clamp_to_spawn_zone(&self, point: Vec2) -> Vec2 {
        let arena = self.arena();
        let half = self.cell_size * 0.5;
        Vec2::new(
            point.x.clamp(arena.min.x + half, arena.max.x - half),
            point.y.clamp(arena.min.y + half, self.spawn_line()),
        )
    }

    /// Bounds of the play area. The floor sits one pitch below the board.
    pub fn arena(&self) -> Rect {
        let margin = self.arena_margin * self.pitch();
        Rect {
            min: Vec2::new(-margin, -CEILING_PITCHES * self.pitch()),
            max: Vec2::new(
                self.board_width() + margin,
                self.board_height() + self.pitch(),
            ),
        }
    }

    /// Walls and floors of every column channel, open at the top.
    pub fn channel_segments(&self) -> Vec<Segment> {
        let bottom = self.board_height();
        let mut segments = Vec::with_capacity(self.num_cols * 3);
        for col in 0..self.num_cols {
            let left = col as f32 * self.pitch();
            let right = left + self.cell_size;
            segments.push(Segment::new(Vec2::new(left, 0.0), Vec2::new(left, bottom)));
            segments.push(Segment::new(Vec2::new(left, bottom), Vec2::new(right, bottom)));
            segments.push(Segment::new(Vec2::new(right, bottom), Vec2::new(right, 0.0)));
        }
        segments
    }

    /// The four arena walls: ceiling, floor, left, right.
    pub fn arena_segments(&self) -> [Segment; 4] {
        let r = self.arena();
        let top_left = r.min;
        let top_right = Vec2::new(r.max.x, r.min.y);
        let bottom_left = Vec2::new(r.min.x, r.max.y);
        let bottom_right = r.max;
        [
            Segment::new(top_left, top_right),
            Segment::new(bottom_left, bottom_right),
            Segment::new(top_left, bottom_left),
            Segment::new(top_right, bottom_right),
        ]
    }
}

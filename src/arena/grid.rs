//! Occupancy grid rasterization
//!
//! Cells are classified in global (uncropped) cell coordinates and only then
//! shifted into the local grid, so a cropped grid holds exactly the same
//! classification as the matching window of an uncropped one.

use glam::{IVec2, Vec2};

use super::spec::ArenaSpec;
use crate::consts::{BOUNDARY_MARGIN, CROP_PADDING};

/// Walkable/blocked bitmap of an arena at one cell size
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyGrid {
    /// Cells per side (the grid is square)
    pub side: i32,
    /// World units per cell
    pub cell_size: f32,
    /// Global cell of local (0, 0) when cropped
    pub crop_origin: Option<IVec2>,
    walkable: Vec<bool>,
}

impl OccupancyGrid {
    /// Build a grid, cropped to the arena boundary when that saves cells
    pub fn build(spec: &ArenaSpec, cell_size: f32) -> Self {
        Self::rasterize(spec, cell_size, true)
    }

    /// Build a grid spanning the whole arena square
    pub fn build_uncropped(spec: &ArenaSpec, cell_size: f32) -> Self {
        Self::rasterize(spec, cell_size, false)
    }

    fn rasterize(spec: &ArenaSpec, cell_size: f32, allow_crop: bool) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            log::warn!("Invalid cell size {}, using 1.0", cell_size);
            1.0
        };
        let full_side = ((spec.size / cell_size).ceil() as i32).max(1);
        let boundary = spec.outer_radius() + BOUNDARY_MARGIN;
        let half_extent = boundary + CROP_PADDING;

        let (crop_origin, side) = if allow_crop && half_extent * 2.0 < spec.size {
            let side = (((half_extent * 2.0) / cell_size).ceil() as i32 + 1).min(full_side);
            let max_origin = full_side - side;
            let origin = IVec2::new(
                (((spec.center.x - half_extent) / cell_size).floor() as i32).clamp(0, max_origin),
                (((spec.center.y - half_extent) / cell_size).floor() as i32).clamp(0, max_origin),
            );
            (Some(origin), side)
        } else {
            (None, full_side)
        };

        let mut grid = Self {
            side,
            cell_size,
            crop_origin,
            walkable: vec![true; cell_count(side)],
        };

        // Circular arena boundary
        let origin = grid.origin();
        for y in 0..side {
            for x in 0..side {
                let global = origin + IVec2::new(x, y);
                let world = (global.as_vec2() + 0.5) * cell_size;
                if world.distance(spec.center) > boundary {
                    grid.walkable[y as usize * side as usize + x as usize] = false;
                }
            }
        }

        for wall in &spec.walls {
            let from = global_cell(wall.a, cell_size);
            let to = global_cell(wall.b, cell_size);
            let stamp = ((wall.thickness / cell_size).round() as i32).max(1);
            let lo = -(stamp - 1) / 2;
            let hi = stamp / 2;
            for point in line_cells(from, to) {
                for dy in lo..=hi {
                    for dx in lo..=hi {
                        grid.block_global(point + IVec2::new(dx, dy));
                    }
                }
            }
        }

        grid
    }

    #[inline]
    fn origin(&self) -> IVec2 {
        self.crop_origin.unwrap_or(IVec2::ZERO)
    }

    #[inline]
    fn index(&self, cell: IVec2) -> Option<usize> {
        let in_bounds = cell.x >= 0 && cell.y >= 0 && cell.x < self.side && cell.y < self.side;
        in_bounds.then(|| cell.y as usize * self.side as usize + cell.x as usize)
    }

    fn block_global(&mut self, global: IVec2) {
        if let Some(i) = self.index(global - self.origin()) {
            self.walkable[i] = false;
        }
    }

    /// Walkability of a local cell (out of bounds counts as blocked)
    pub fn is_walkable(&self, cell: IVec2) -> bool {
        self.index(cell).is_some_and(|i| self.walkable[i])
    }

    /// Local cell containing a world point, clamped to the grid
    pub fn world_to_cell(&self, point: Vec2) -> IVec2 {
        let local = global_cell(point, self.cell_size) - self.origin();
        local.clamp(IVec2::ZERO, IVec2::splat(self.side - 1))
    }

    /// World-space center of a local cell
    pub fn cell_center(&self, cell: IVec2) -> Vec2 {
        ((self.origin() + cell).as_vec2() + 0.5) * self.cell_size
    }

    /// Total cells (`side²`)
    pub fn cell_count(&self) -> usize {
        self.walkable.len()
    }

    pub fn walkable_count(&self) -> usize {
        self.walkable.iter().filter(|w| **w).count()
    }

    /// Debug dump: `#` blocked, `.` walkable, first row is y = 0
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(cell_count(self.side) + self.side as usize);
        for row in self.walkable.chunks(self.side as usize) {
            out.extend(row.iter().map(|&w| if w { '.' } else { '#' }));
            out.push('\n');
        }
        out
    }
}

/// Cells in a square grid of `side`, in `usize`
#[inline]
fn cell_count(side: i32) -> usize {
    let side = side.max(0) as usize;
    side * side
}

#[inline]
fn global_cell(point: Vec2, cell_size: f32) -> IVec2 {
    (point / cell_size).floor().as_ivec2()
}

/// Integer line walk between two cells (Bresenham, all octants)
pub fn line_cells(from: IVec2, to: IVec2) -> Vec<IVec2> {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let step = IVec2::new(
        if from.x < to.x { 1 } else { -1 },
        if from.y < to.y { 1 } else { -1 },
    );

    let mut cells = Vec::with_capacity((dx.max(-dy) + 1) as usize);
    let mut err = dx + dy;
    let mut p = from;
    loop {
        cells.push(p);
        if p == to {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            p.x += step.x;
        }
        if e2 <= dx {
            err += dx;
            p.y += step.y;
        }
    }
    cells
}

//! Tiled-grid layout.
//!
//! Splits the logical screen into `rows x cols` planar tiles placed on a
//! virtual sphere of radius `effective_distance` around the viewer, each
//! textured with its exact UV sub-rectangle of the framebuffer. Grids are
//! always rebuilt from scratch; tile counts are tens, not thousands, so
//! correctness wins over incremental updates.

use foundation::math::{Quat, Vec2, Vec3};

use crate::geometry::ScreenGeometry;

/// One rectangular sub-region of the logical screen.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tile {
    /// Grid coordinate; row 0 is the top row, col 0 the left column.
    pub row: u32,
    pub col: u32,
    /// UV rectangle of the framebuffer this tile samples.
    pub uv_offset: Vec2,
    pub uv_repeat: Vec2,
    /// Center position on the placement sphere (Y-up, forward = -Z).
    pub position: Vec3,
    /// Orientation facing the viewer at the origin.
    pub facing: Quat,
}

/// A full tile set plus the parameters it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    pub rows: u32,
    pub cols: u32,
    pub padding: f64,
    /// World footprint of a single tile.
    pub tile_world_size: Vec2,
    pub tiles: Vec<Tile>,
    /// Tiles whose computed position was non-finite, skipped but reported.
    pub skipped: Vec<(u32, u32)>,
    /// Set when the whole layout was rejected as degenerate.
    pub reject_reason: Option<&'static str>,
}

impl TileGrid {
    fn rejected(rows: u32, cols: u32, padding: f64, reason: &'static str) -> Self {
        Self {
            rows,
            cols,
            padding,
            tile_world_size: Vec2::zero(),
            tiles: Vec::new(),
            skipped: Vec::new(),
            reject_reason: Some(reason),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Lay out the tile set for the given geometry.
///
/// Degenerate inputs (zero-sized screen, zero rows/cols, collapsed distance)
/// produce an empty grid with a reject reason instead of failing. A
/// non-finite individual tile is skipped and recorded without aborting the
/// rest of the grid.
pub fn layout_tiles(geometry: &ScreenGeometry, rows: u32, cols: u32, padding: f64) -> TileGrid {
    let w = geometry.world_width;
    let h = geometry.world_height;
    let distance = geometry.effective_distance;

    if w <= 0.001 || h <= 0.001 {
        return TileGrid::rejected(rows, cols, padding, "screen world size is degenerate");
    }
    if rows == 0 || cols == 0 {
        return TileGrid::rejected(rows, cols, padding, "tile grid has zero rows or columns");
    }
    if distance <= 0.001 {
        return TileGrid::rejected(rows, cols, padding, "effective distance is degenerate");
    }

    let tile_w = w / f64::from(cols);
    let tile_h = h / f64::from(rows);
    if tile_w <= 0.001 || tile_h <= 0.001 {
        return TileGrid::rejected(rows, cols, padding, "tile footprint is degenerate");
    }

    // Angular distance between adjacent tile centers; zero on an axis with a
    // single tile.
    let step_x = if cols > 1 { (tile_w + padding) / distance } else { 0.0 };
    let step_y = if rows > 1 { (tile_h + padding) / distance } else { 0.0 };

    let mut tiles = Vec::with_capacity((rows * cols) as usize);
    let mut skipped = Vec::new();

    for row in 0..rows {
        for col in 0..cols {
            let azimuth = (f64::from(col) - f64::from(cols - 1) / 2.0) * step_x;
            // Row 0 is the top row and gets the highest elevation.
            let elevation = (f64::from(rows - 1) / 2.0 - f64::from(row)) * step_y;

            let position = Vec3::new(
                distance * elevation.cos() * azimuth.sin(),
                distance * elevation.sin(),
                -distance * elevation.cos() * azimuth.cos(),
            );
            if !position.is_finite() {
                skipped.push((row, col));
                continue;
            }

            // Same pose as looking from the origin toward the tile center;
            // applying it to (0, 0, -distance) reproduces `position`.
            let facing = Quat::from_yaw_pitch(-azimuth, elevation);

            let uv_offset = Vec2::new(
                f64::from(col) / f64::from(cols),
                1.0 - f64::from(row + 1) / f64::from(rows),
            );
            let uv_repeat = Vec2::new(1.0 / f64::from(cols), 1.0 / f64::from(rows));

            tiles.push(Tile {
                row,
                col,
                uv_offset,
                uv_repeat,
                position,
                facing,
            });
        }
    }

    TileGrid {
        rows,
        cols,
        padding,
        tile_world_size: Vec2::new(tile_w, tile_h),
        tiles,
        skipped,
        reject_reason: None,
    }
}

#[cfg(test)]
mod tests {
    use super::{TileGrid, layout_tiles};
    use crate::geometry::ScreenGeometry;
    use foundation::math::Vec3;

    fn geometry(world_width: f64, world_height: f64, distance: f64) -> ScreenGeometry {
        ScreenGeometry {
            world_width,
            world_height,
            base_distance: distance,
            effective_distance: distance,
            curve_radius: distance * 0.95,
            curve_angle: world_width / (distance * 0.95),
            fov_y_rad: 55f64.to_radians(),
            radial_segments: 32,
            curve_angle_is_fallback: false,
        }
    }

    #[test]
    fn centered_2x2_grid_angles() {
        let g = geometry(2.0, 2.0, 3.0);
        let grid = layout_tiles(&g, 2, 2, 0.0);
        assert_eq!(grid.tiles.len(), 4);
        assert!(grid.skipped.is_empty());

        let step = 1.0 / 3.0; // (tile_w + padding) / distance
        for tile in &grid.tiles {
            let azimuth = tile.position.x.atan2(-tile.position.z);
            let elevation = (tile.position.y / 3.0).asin();
            assert!((azimuth.abs() - step / 2.0).abs() < 1e-9, "azimuth {azimuth}");
            assert!((elevation.abs() - step / 2.0).abs() < 1e-9, "elevation {elevation}");
        }
    }

    #[test]
    fn row_zero_is_the_top_row() {
        let grid = layout_tiles(&geometry(2.0, 2.0, 3.0), 3, 1, 0.0);
        let y_of = |row: u32| {
            grid.tiles
                .iter()
                .find(|t| t.row == row)
                .map(|t| t.position.y)
                .unwrap()
        };
        assert!(y_of(0) > y_of(1));
        assert!(y_of(1) > y_of(2));
    }

    #[test]
    fn facing_reproduces_position() {
        let grid = layout_tiles(&geometry(3.2, 1.8, 4.0), 3, 4, 0.05);
        for tile in &grid.tiles {
            let replayed = tile.facing.rotate(Vec3::new(0.0, 0.0, -4.0));
            assert!((replayed - tile.position).length() < 1e-9);
        }
    }

    #[test]
    fn tiles_sit_on_the_placement_sphere() {
        let grid = layout_tiles(&geometry(2.667, 2.0, 3.0), 2, 3, 0.05);
        for tile in &grid.tiles {
            assert!((tile.position.length() - 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn uv_rectangles_partition_unit_square() {
        // Deterministic LCG over small random grid shapes.
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move |n: u32| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((state >> 33) as u32 % n) + 1
        };

        for _ in 0..50 {
            let rows = next(6);
            let cols = next(6);
            let grid = layout_tiles(&geometry(2.667, 2.0, 3.0), rows, cols, 0.02);
            assert_eq!(grid.tiles.len(), (rows * cols) as usize);

            let mut area = 0.0;
            for tile in &grid.tiles {
                let o = tile.uv_offset;
                let r = tile.uv_repeat;
                assert!(o.x >= -1e-12 && o.y >= -1e-12);
                assert!(o.x + r.x <= 1.0 + 1e-12);
                assert!(o.y + r.y <= 1.0 + 1e-12);

                // Edges land exactly on the grid lines; neighbors share them.
                assert!((o.x - f64::from(tile.col) / f64::from(cols)).abs() < 1e-12);
                assert!((o.x + r.x - f64::from(tile.col + 1) / f64::from(cols)).abs() < 1e-12);
                assert!((o.y - (1.0 - f64::from(tile.row + 1) / f64::from(rows))).abs() < 1e-12);
                assert!((o.y + r.y - (1.0 - f64::from(tile.row) / f64::from(rows))).abs() < 1e-12);

                area += r.x * r.y;
            }
            assert!((area - 1.0).abs() < 1e-9, "{rows}x{cols} area {area}");
        }
    }

    #[test]
    fn degenerate_inputs_reject_with_reason() {
        let good = geometry(2.0, 2.0, 3.0);
        assert!(layout_tiles(&good, 0, 2, 0.0).reject_reason.is_some());
        assert!(layout_tiles(&good, 2, 0, 0.0).reject_reason.is_some());
        assert!(layout_tiles(&geometry(0.0, 2.0, 3.0), 2, 2, 0.0).reject_reason.is_some());
        assert!(layout_tiles(&geometry(2.0, 2.0, 0.0), 2, 2, 0.0).reject_reason.is_some());

        let rejected: TileGrid = layout_tiles(&good, 0, 0, 0.0);
        assert!(rejected.is_empty());
    }

    #[test]
    fn non_finite_positions_are_skipped_not_fatal() {
        let mut g = geometry(2.0, 2.0, 3.0);
        g.effective_distance = f64::INFINITY;
        let grid = layout_tiles(&g, 2, 2, 0.0);
        assert!(grid.reject_reason.is_none());
        assert_eq!(grid.tiles.len() + grid.skipped.len(), 4);
        assert!(!grid.skipped.is_empty());
    }
}

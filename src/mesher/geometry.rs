//! Box primitives and model dimensions.
//!
//! Coordinates are millimeters. X runs left to right along the weeks,
//! Y runs from the front face towards the back, Z is up. The base slab
//! sits below `z = 0` so that columns, top-face text and the auxiliary
//! mesh all start from the same plane.

use crate::error::{Result, SkylineError};
use crate::types::{Mesh, Point3D, Triangle};
use std::path::PathBuf;

/// Height of the supporting slab.
pub const BASE_HEIGHT: f64 = 10.0;
/// Tallest possible contribution column.
pub const MAX_HEIGHT: f64 = 25.0;
/// Shortest column for a day with any activity.
pub const MIN_HEIGHT: f64 = 2.0;
/// Edge length of one day cell.
pub const CELL_SIZE: f64 = 2.5;
/// Maximum number of weeks in one year's grid.
pub const GRID_SIZE: usize = 53;
/// Depth taken by one year of seven day rows.
pub const YEAR_OFFSET: f64 = 7.0 * CELL_SIZE;
/// Extra gap between consecutive years.
pub const YEAR_SPACING: f64 = 0.0;
/// Cells of margin added to the grid footprint on each axis.
pub const GRID_MARGIN_CELLS: f64 = 4.0;

const TRIANGLES_PER_BOX: usize = 12;

/// Each face as (outward normal, corner indices counter-clockwise seen from outside).
/// Corner index bits: 1 = max x, 2 = max y, 4 = max z.
const BOX_FACES: [([f64; 3], [usize; 4]); 6] = [
    ([0.0, 0.0, -1.0], [0, 2, 3, 1]),
    ([0.0, 0.0, 1.0], [4, 5, 7, 6]),
    ([0.0, -1.0, 0.0], [0, 1, 5, 4]),
    ([0.0, 1.0, 0.0], [2, 6, 7, 3]),
    ([-1.0, 0.0, 0.0], [0, 4, 6, 2]),
    ([1.0, 0.0, 0.0], [1, 3, 7, 5]),
];

/// Build the 12 triangles of an axis-aligned box.
///
/// The box spans `(x, y, z)` to `(x + length, y + thickness, z + height)`.
/// Normals are unit length and point outward.
pub fn create_cuboid(
    x: f64,
    y: f64,
    z: f64,
    length: f64,
    thickness: f64,
    height: f64,
) -> Result<Mesh> {
    let extents_valid = [length, thickness, height]
        .iter()
        .all(|extent| extent.is_finite() && *extent > 0.0);
    if !extents_valid {
        return Err(SkylineError::Geometry(format!(
            "box extents must be positive, got {length} x {thickness} x {height}"
        )));
    }

    let origin = Point3D::new(x, y, z);
    let corners: [Point3D; 8] = std::array::from_fn(|i| {
        origin
            + Point3D::new(
                if i & 1 != 0 { length } else { 0.0 },
                if i & 2 != 0 { thickness } else { 0.0 },
                if i & 4 != 0 { height } else { 0.0 },
            )
    });

    let mut mesh = Mesh::with_capacity(TRIANGLES_PER_BOX);
    for (normal, [a, b, c, d]) in BOX_FACES {
        let normal = Point3D::from_array(normal);
        mesh.push(Triangle::new(normal, corners[a], corners[b], corners[c]));
        mesh.push(Triangle::new(normal, corners[a], corners[c], corners[d]));
    }
    Ok(mesh)
}

/// A square column of side `size` standing on `z = 0`.
pub fn create_column(x: f64, y: f64, height: f64, size: f64) -> Result<Mesh> {
    create_cuboid(x, y, 0.0, size, size, height)
}

/// The slab under the grid, with its top face at `z = 0`.
pub fn create_cuboid_base(width: f64, depth: f64) -> Result<Mesh> {
    create_cuboid(0.0, 0.0, -BASE_HEIGHT, width, depth, BASE_HEIGHT)
}

/// Footprint of the grid for `year_count` stacked years, margin included.
pub fn multi_year_dimensions(year_count: usize) -> (f64, f64) {
    let width = (GRID_SIZE as f64 + GRID_MARGIN_CELLS) * CELL_SIZE;
    let depth = (7.0 * year_count as f64 + GRID_MARGIN_CELLS) * CELL_SIZE;
    (width, depth)
}

/// Derived measurements for one generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDimensions {
    /// Width of the contribution grid (X).
    pub inner_width: f64,
    /// Depth of the contribution grid (Y).
    pub inner_depth: f64,
    /// Logo embossed on the front face.
    pub image_path: Option<PathBuf>,
}

impl ModelDimensions {
    pub fn for_years(year_count: usize, image_path: Option<PathBuf>) -> Result<Self> {
        if year_count == 0 {
            return Err(SkylineError::Validation("year count must be positive".into()));
        }

        let (inner_width, inner_depth) = multi_year_dimensions(year_count);
        if inner_width <= 0.0 || inner_depth <= 0.0 {
            return Err(SkylineError::Validation("invalid model dimensions".into()));
        }

        Ok(Self {
            inner_width,
            inner_depth,
            image_path,
        })
    }
}

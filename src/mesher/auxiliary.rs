//! Merging an external STL model into the skyline.

use super::geometry::ModelDimensions;
use crate::export::stl::{read_stl_file, ParseMode};
use crate::types::Mesh;
use std::path::Path;

/// Uniform scale applied to the auxiliary model.
pub const AUXILIARY_SCALE: f64 = 0.7;
/// Gap between the model's right edge and the auxiliary model.
pub const AUXILIARY_MARGIN_X: f64 = 10.0;
/// Gap between the model's back edge and the auxiliary model.
pub const AUXILIARY_MARGIN_Y: f64 = 3.0;

/// How the auxiliary model is fitted into the back-right corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuxiliaryPlacement {
    pub scale: f64,
    pub margin_x: f64,
    pub margin_y: f64,
}

impl Default for AuxiliaryPlacement {
    fn default() -> Self {
        Self {
            scale: AUXILIARY_SCALE,
            margin_x: AUXILIARY_MARGIN_X,
            margin_y: AUXILIARY_MARGIN_Y,
        }
    }
}

/// Scale `mesh` and move it so its maximum X/Y corner sits inside the
/// model's back-right corner and its lowest point rests on `z = 0`.
///
/// Returns `None` for an empty mesh.
pub fn place_auxiliary_mesh(
    mesh: &Mesh,
    dims: &ModelDimensions,
    placement: &AuxiliaryPlacement,
) -> Option<Mesh> {
    let scaled = mesh.scale(placement.scale);
    let bounds = scaled.bounding_box();
    if !bounds.is_valid() {
        return None;
    }

    let dx = dims.inner_width - placement.margin_x - bounds.max.x;
    let dy = dims.inner_depth - placement.margin_y - bounds.max.y;
    let dz = -bounds.min.z;
    Some(scaled.translate(dx, dy, dz))
}

/// Load an auxiliary STL, treating every failure as "no auxiliary mesh".
pub fn load_auxiliary_mesh(path: &Path, mode: ParseMode) -> Option<Mesh> {
    match read_stl_file(path, mode) {
        Ok(mesh) if !mesh.is_empty() => Some(mesh),
        Ok(_) => {
            log::debug!("Auxiliary mesh {} has no triangles", path.display());
            None
        }
        Err(e) => {
            log::debug!(
                "No auxiliary mesh found at {} or error reading it: {}",
                path.display(),
                e
            );
            None
        }
    }
}

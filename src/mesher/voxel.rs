//! Raster-to-voxel conversion.
//!
//! A face of the model is overlaid with a raster grid: a fixed number of
//! samples across the face width and a row count chosen to keep cells
//! square in model space. Every active sample becomes a small box
//! ("voxel") extruded out of that face.

use super::geometry::create_cuboid;
use crate::error::{Result, ResultExt, SkylineError};
use crate::types::Mesh;
use image::{GrayImage, Rgba, RgbaImage};
use std::path::Path;

/// Samples across the width of a face.
pub const DEFAULT_RASTER_RESOLUTION: u32 = 2000;
/// How far voxels protrude from their face.
pub const VOXEL_DEPTH: f64 = 1.0;

/// Logo size in raster cells per image pixel.
pub const LOGO_SCALE: f64 = 0.5;
/// Logo left edge as a fraction of the face width.
pub const LOGO_LEFT_OFFSET: f64 = 0.03;
/// Logo top edge as a fraction of the face height.
pub const LOGO_TOP_OFFSET: f64 = -0.18;

/// The model surface a raster is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    /// The front of the base (`y = 0`), voxels protrude towards the viewer.
    Front,
    /// The top of the base (`z = 0`), voxels are embossed upwards.
    Top,
}

/// Raster grid laid over one face of the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceRaster {
    face: Face,
    resolution: u32,
    face_width: f64,
    face_height: f64,
    voxel_depth: f64,
}

impl FaceRaster {
    /// `face_height` is the base height for [`Face::Front`] and the base
    /// depth for [`Face::Top`].
    pub fn new(
        face: Face,
        resolution: u32,
        face_width: f64,
        face_height: f64,
        voxel_depth: f64,
    ) -> Result<Self> {
        if resolution == 0 {
            return Err(SkylineError::Validation(
                "raster resolution must be positive".into(),
            ));
        }
        if !(face_width > 0.0 && face_height > 0.0) {
            return Err(SkylineError::Validation(format!(
                "face dimensions must be positive, got {face_width} x {face_height}"
            )));
        }
        Ok(Self {
            face,
            resolution,
            face_width,
            face_height,
            voxel_depth,
        })
    }

    pub fn face(&self) -> Face {
        self.face
    }

    /// Samples across the face.
    pub fn x_resolution(&self) -> f64 {
        self.resolution as f64
    }

    /// Rows down the face, unrounded.
    pub fn y_resolution(&self) -> f64 {
        self.x_resolution() * self.face_height / self.face_width
    }

    /// Pixel size of the canvas that covers this face.
    pub fn canvas_size(&self) -> (u32, u32) {
        (self.resolution, self.y_resolution() as u32)
    }

    /// Size of one raster cell in millimeters.
    pub fn cell_size(&self) -> (f64, f64) {
        (
            self.face_width / self.x_resolution(),
            self.face_height / self.y_resolution(),
        )
    }

    /// Blank canvas matching [`FaceRaster::canvas_size`].
    pub fn blank_canvas(&self) -> GrayImage {
        let (width, height) = self.canvas_size();
        GrayImage::new(width, height)
    }

    /// The voxel for raster position `(x, y)`, measured from the top-left of the face.
    pub fn voxel_at(&self, x: f64, y: f64) -> Result<Mesh> {
        let (cell_w, cell_h) = self.cell_size();
        let x = x / self.x_resolution() * self.face_width;

        let voxel = match self.face {
            Face::Front => {
                let y = y / self.y_resolution() * self.face_height;
                create_cuboid(
                    x,
                    -self.voxel_depth,
                    -cell_h - y,
                    cell_w,
                    self.voxel_depth,
                    cell_h,
                )
            }
            Face::Top => {
                // Raster rows run front to back so text reads correctly from above.
                let y = self.face_height - (y + 1.0) / self.y_resolution() * self.face_height;
                create_cuboid(x, y, 0.0, cell_w, cell_h, self.voxel_depth)
            }
        };

        voxel.context("failed to create voxel")
    }

    /// One voxel per active canvas pixel, column by column.
    ///
    /// Stops at the first voxel that cannot be built.
    pub fn voxelize(&self, canvas: &GrayImage) -> Result<Mesh> {
        let mut mesh = Mesh::new();
        for x in 0..canvas.width() {
            for y in 0..canvas.height() {
                if is_canvas_pixel_active(canvas.get_pixel(x, y).0[0]) {
                    mesh.append(self.voxel_at(x as f64, y as f64)?);
                }
            }
        }
        Ok(mesh)
    }
}

/// Canvas samples above half coverage are solid.
pub fn is_canvas_pixel_active(coverage: u8) -> bool {
    coverage > u8::MAX / 2
}

/// Image pixels are solid when both alpha and red exceed half scale.
///
/// Coloured or dark pixels stay inactive even when opaque.
pub fn is_image_pixel_active(pixel: &Rgba<u8>) -> bool {
    let [r, _, _, a] = pixel.0;
    a > u8::MAX / 2 && r > u8::MAX / 2
}

/// Where an image lands on its face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    /// Raster cells per image pixel.
    pub scale: f64,
    /// Left edge as a fraction of the face width.
    pub left_offset: f64,
    /// Top edge as a fraction of the face height.
    pub top_offset: f64,
}

impl Default for ImagePlacement {
    fn default() -> Self {
        Self {
            scale: LOGO_SCALE,
            left_offset: LOGO_LEFT_OFFSET,
            top_offset: LOGO_TOP_OFFSET,
        }
    }
}

/// Voxels for every active pixel of a decoded image.
pub fn render_image(
    image: &RgbaImage,
    raster: &FaceRaster,
    placement: &ImagePlacement,
) -> Result<Mesh> {
    let (width_res, height_res) = raster.canvas_size();
    let left = placement.left_offset * width_res as f64;
    let top = placement.top_offset * height_res as f64;

    let mut mesh = Mesh::new();
    for x in 0..image.width() {
        for y in (0..image.height()).rev() {
            if is_image_pixel_active(image.get_pixel(x, y)) {
                let voxel = raster.voxel_at(
                    left + x as f64 * placement.scale,
                    top + y as f64 * placement.scale,
                )?;
                mesh.append(voxel);
            }
        }
    }
    Ok(mesh)
}

/// Decode a PNG held in memory and render it.
pub fn render_image_bytes(
    data: &[u8],
    raster: &FaceRaster,
    placement: &ImagePlacement,
) -> Result<Mesh> {
    let image = image::load_from_memory(data)
        .context("failed to decode image")?
        .to_rgba8();
    render_image(&image, raster, placement)
}

/// Load a PNG from disk and render it.
pub fn render_image_file<P: AsRef<Path>>(
    path: P,
    raster: &FaceRaster,
    placement: &ImagePlacement,
) -> Result<Mesh> {
    let path = path.as_ref();
    let data = std::fs::read(path).context(format!("failed to open image {}", path.display()))?;
    render_image_bytes(&data, raster, placement)
}

//! Text captions rasterized onto the model faces.

use super::voxel::FaceRaster;
use crate::error::{Result, SkylineError};
use crate::types::Mesh;
use ab_glyph::{point, Font, FontArc, Glyph, PxScale, ScaleFont};
use image::GrayImage;
use std::path::PathBuf;

/// Username caption on the front face.
pub const USERNAME_PLACEMENT: TextPlacement = TextPlacement {
    justification: Justification::Left,
    left_offset: 0.1,
    top_offset: 0.5,
    font_size: 120.0,
};

/// Year (or right caption) on the front face.
pub const YEAR_PLACEMENT: TextPlacement = TextPlacement {
    justification: Justification::Right,
    left_offset: 0.97,
    top_offset: 0.5,
    font_size: 100.0,
};

/// Free caption centered on the top face.
pub const TOP_TEXT_PLACEMENT: TextPlacement = TextPlacement {
    justification: Justification::Center,
    left_offset: 0.5,
    top_offset: 0.5,
    font_size: 150.0,
};

/// DejaVu Sans, built into the library so captions render without any
/// font installed. License in `assets/fonts/DejaVuSans-LICENSE.txt`.
pub static BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// Where a font comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// TrueType/OpenType file on disk.
    File(PathBuf),
    /// Font data already in memory.
    Bytes(Vec<u8>),
    /// Font data embedded in the binary.
    Static(&'static [u8]),
}

impl FontSource {
    /// The font built into the library.
    pub fn bundled() -> Self {
        FontSource::Static(BUNDLED_FONT)
    }

    pub fn load(&self) -> Result<FontArc> {
        match self {
            FontSource::File(path) => {
                let data = std::fs::read(path).map_err(|e| {
                    SkylineError::Font(format!("failed to read font {}: {}", path.display(), e))
                })?;
                FontArc::try_from_vec(data).map_err(|e| {
                    SkylineError::Font(format!("invalid font {}: {}", path.display(), e))
                })
            }
            FontSource::Bytes(data) => FontArc::try_from_vec(data.clone())
                .map_err(|e| SkylineError::Font(format!("invalid font data: {}", e))),
            FontSource::Static(data) => FontArc::try_from_slice(*data)
                .map_err(|e| SkylineError::Font(format!("invalid font data: {}", e))),
        }
    }
}

/// Load the primary font, falling back to the secondary one.
pub fn load_font(primary: Option<&FontSource>, fallback: Option<&FontSource>) -> Result<FontArc> {
    for source in [primary, fallback].into_iter().flatten() {
        match source.load() {
            Ok(font) => return Ok(font),
            Err(e) => log::debug!("Font unavailable: {}", e),
        }
    }
    Err(SkylineError::Font("failed to load any fonts".into()))
}

/// Horizontal anchoring of a caption relative to its offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justification {
    Left,
    Center,
    Right,
}

impl Justification {
    /// Fraction of the text width placed left of the anchor.
    pub fn anchor(self) -> f32 {
        match self {
            Justification::Left => 0.0,
            Justification::Center => 0.5,
            Justification::Right => 1.0,
        }
    }
}

/// Position and size of one caption on its face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPlacement {
    pub justification: Justification,
    /// Anchor x as a fraction of the canvas width.
    pub left_offset: f64,
    /// Vertical center as a fraction of the canvas height.
    pub top_offset: f64,
    /// Font size in canvas pixels.
    pub font_size: f32,
}

/// Lay out `text` on a single baseline at `x = 0`, returning the glyphs and total advance.
fn layout_line<F: Font>(font: &F, scale: PxScale, text: &str) -> (Vec<Glyph>, f32) {
    let scaled = font.as_scaled(scale);
    let mut glyphs = Vec::with_capacity(text.len());
    let mut caret = 0.0f32;
    let mut previous = None;

    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        glyphs.push(id.with_scale_and_position(scale, point(caret, 0.0)));
        caret += scaled.h_advance(id);
        previous = Some(id);
    }

    (glyphs, caret)
}

/// Draw `text` in white onto a black canvas, anchored per `placement`.
pub fn draw_text<F: Font>(canvas: &mut GrayImage, font: &F, text: &str, placement: &TextPlacement) {
    let scale = PxScale::from(placement.font_size);
    let scaled = font.as_scaled(scale);
    let (glyphs, width) = layout_line(font, scale, text);

    let origin_x = canvas.width() as f32 * placement.left_offset as f32
        - placement.justification.anchor() * width;
    let center_y = canvas.height() as f32 * placement.top_offset as f32;
    let baseline = center_y + (scaled.ascent() + scaled.descent()) / 2.0;

    let (canvas_w, canvas_h) = (canvas.width() as i32, canvas.height() as i32);
    for mut glyph in glyphs {
        glyph.position = point(glyph.position.x + origin_x, baseline);
        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            let x = bounds.min.x as i32 + gx as i32;
            let y = bounds.min.y as i32 + gy as i32;
            if x < 0 || y < 0 || x >= canvas_w || y >= canvas_h {
                return;
            }
            let value = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
            let pixel = canvas.get_pixel_mut(x as u32, y as u32);
            pixel.0[0] = pixel.0[0].max(value);
        });
    }
}

/// Rasterize one caption onto `raster` and turn it into voxels.
pub fn render_text<F: Font>(
    font: &F,
    text: &str,
    placement: &TextPlacement,
    raster: &FaceRaster,
) -> Result<Mesh> {
    let mut canvas = raster.blank_canvas();
    draw_text(&mut canvas, font, text, placement);
    raster.voxelize(&canvas)
}

/// The captions embossed on a model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captions {
    /// Left side of the front face.
    pub username: String,
    /// Right side of the front face, usually the year range.
    pub right_text: String,
    /// Centered on the top face.
    pub top_text: Option<String>,
}

/// Voxels for every non-empty caption: username, right text, then top text.
pub fn create_3d_text<F: Font>(
    font: &F,
    captions: &Captions,
    front: &FaceRaster,
    top: &FaceRaster,
) -> Result<Mesh> {
    let mut mesh = Mesh::new();

    if !captions.username.is_empty() {
        mesh.append(render_text(font, &captions.username, &USERNAME_PLACEMENT, front)?);
    }
    if !captions.right_text.is_empty() {
        mesh.append(render_text(font, &captions.right_text, &YEAR_PLACEMENT, front)?);
    }
    if let Some(top_text) = captions.top_text.as_deref().filter(|t| !t.is_empty()) {
        mesh.append(render_text(font, top_text, &TOP_TEXT_PLACEMENT, top)?);
    }

    Ok(mesh)
}

/// Caption for the right side of the front face.
///
/// An explicit caption wins; otherwise a single year renders as `2023`
/// and a range as `2021-23`.
pub fn right_caption(right_text: Option<&str>, start_year: i32, end_year: i32) -> String {
    match right_text.filter(|t| !t.is_empty()) {
        Some(text) => text.to_string(),
        None if start_year == end_year => end_year.to_string(),
        None => format!("{:04}-{:02}", start_year, end_year.rem_euclid(100)),
    }
}

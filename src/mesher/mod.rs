//! Skyline mesh generation.
//!
//! This module turns contribution grids into one triangle mesh: a base
//! slab, a column per active day, embossed captions and logo, and an
//! optional auxiliary model.

pub mod auxiliary;
pub mod columns;
pub mod geometry;
pub mod text;
pub mod voxel;

pub use geometry::ModelDimensions;
pub use text::FontSource;

use crate::error::{Result, ResultExt, SkylineError};
use crate::export::stl::{write_stl_binary_file, ParseMode};
use crate::types::{max_contribution_across_years, ContributionGrid, Mesh};
use auxiliary::{load_auxiliary_mesh, place_auxiliary_mesh, AuxiliaryPlacement};
use crossbeam::channel::{self, Receiver};
use geometry::{create_cuboid_base, BASE_HEIGHT, GRID_SIZE};
use std::fmt;
use std::path::{Path, PathBuf};
use text::{create_3d_text, load_font, right_caption, Captions};
use voxel::{render_image_file, Face, FaceRaster, ImagePlacement};

/// Triangles reserved for captions when pre-sizing the merged mesh.
const TEXT_TRIANGLE_ESTIMATE: usize = 1000;

/// Main mesher configuration.
#[derive(Debug, Clone)]
pub struct MesherConfig {
    /// Raster samples across the width of a face.
    pub raster_resolution: u32,
    /// Extrusion depth of text and logo voxels in millimeters.
    pub voxel_depth: f64,
    /// Font tried first for captions.
    pub primary_font: Option<FontSource>,
    /// Font tried when the primary one cannot be loaded.
    pub fallback_font: Option<FontSource>,
    /// PNG embossed on the front face.
    pub logo_path: Option<PathBuf>,
    /// STL model merged into the back-right corner.
    pub auxiliary_mesh: Option<PathBuf>,
    pub auxiliary_scale: f64,
    pub auxiliary_margin_x: f64,
    pub auxiliary_margin_y: f64,
    /// How the auxiliary STL is parsed when it is ASCII.
    pub stl_parse_mode: ParseMode,
    /// Fail the run when a whole component (base, logo, text) fails
    /// instead of leaving it out.
    pub strict_components: bool,
}

impl Default for MesherConfig {
    fn default() -> Self {
        Self {
            raster_resolution: voxel::DEFAULT_RASTER_RESOLUTION,
            voxel_depth: voxel::VOXEL_DEPTH,
            primary_font: Some(FontSource::bundled()),
            fallback_font: None,
            logo_path: Some(PathBuf::from("logo.png")),
            auxiliary_mesh: Some(PathBuf::from("character.stl")),
            auxiliary_scale: auxiliary::AUXILIARY_SCALE,
            auxiliary_margin_x: auxiliary::AUXILIARY_MARGIN_X,
            auxiliary_margin_y: auxiliary::AUXILIARY_MARGIN_Y,
            stl_parse_mode: ParseMode::Lenient,
            strict_components: false,
        }
    }
}

impl MesherConfig {
    /// Use `primary` for captions, keeping `fallback` as a second choice.
    pub fn with_fonts(mut self, primary: FontSource, fallback: Option<FontSource>) -> Self {
        self.primary_font = Some(primary);
        self.fallback_font = fallback;
        self
    }

    /// Use the font at `path`, keeping the bundled font as a fallback.
    pub fn with_font_file(self, path: impl Into<PathBuf>) -> Self {
        self.with_fonts(FontSource::File(path.into()), Some(FontSource::bundled()))
    }

    /// Render no captions.
    pub fn without_fonts(mut self) -> Self {
        self.primary_font = None;
        self.fallback_font = None;
        self
    }

    pub fn with_logo(mut self, path: impl Into<PathBuf>) -> Self {
        self.logo_path = Some(path.into());
        self
    }

    pub fn without_logo(mut self) -> Self {
        self.logo_path = None;
        self
    }

    pub fn with_auxiliary_mesh(mut self, path: impl Into<PathBuf>) -> Self {
        self.auxiliary_mesh = Some(path.into());
        self
    }

    pub fn without_auxiliary_mesh(mut self) -> Self {
        self.auxiliary_mesh = None;
        self
    }

    pub fn with_raster_resolution(mut self, resolution: u32) -> Self {
        self.raster_resolution = resolution;
        self
    }

    pub fn with_parse_mode(mut self, mode: ParseMode) -> Self {
        self.stl_parse_mode = mode;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict_components = strict;
        self
    }

    fn auxiliary_placement(&self) -> AuxiliaryPlacement {
        AuxiliaryPlacement {
            scale: self.auxiliary_scale,
            margin_x: self.auxiliary_margin_x,
            margin_y: self.auxiliary_margin_y,
        }
    }
}

/// Everything needed to generate one model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkylineRequest {
    /// One grid per year, oldest first.
    pub contributions: Vec<ContributionGrid>,
    pub username: String,
    pub start_year: i32,
    pub end_year: i32,
    /// Caption centered on the top face.
    pub top_text: Option<String>,
    /// Replaces the year caption on the front face.
    pub right_text: Option<String>,
}

impl SkylineRequest {
    pub fn new(
        contributions: Vec<ContributionGrid>,
        username: impl Into<String>,
        start_year: i32,
        end_year: i32,
    ) -> Self {
        Self {
            contributions,
            username: username.into(),
            start_year,
            end_year,
            top_text: None,
            right_text: None,
        }
    }

    /// A request covering a single year.
    pub fn single_year(grid: ContributionGrid, username: impl Into<String>, year: i32) -> Self {
        Self::new(vec![grid], username, year, year)
    }

    pub fn with_top_text(mut self, text: impl Into<String>) -> Self {
        self.top_text = Some(text.into());
        self
    }

    pub fn with_right_text(mut self, text: impl Into<String>) -> Self {
        self.right_text = Some(text.into());
        self
    }

    /// Check the request before any geometry is built.
    pub fn validate(&self) -> Result<()> {
        let Some(first) = self.contributions.first() else {
            return Err(SkylineError::Validation(
                "contributions data cannot be empty".into(),
            ));
        };
        if first.is_empty() {
            return Err(SkylineError::Validation(
                "contributions data cannot be empty".into(),
            ));
        }
        if let Some(weeks) = self
            .contributions
            .iter()
            .map(Vec::len)
            .find(|weeks| *weeks > GRID_SIZE)
        {
            return Err(SkylineError::Validation(format!(
                "contributions data exceeds maximum grid size ({weeks} > {GRID_SIZE} weeks)"
            )));
        }
        if self.username.is_empty() {
            return Err(SkylineError::Validation("username cannot be empty".into()));
        }
        if self.start_year > self.end_year {
            return Err(SkylineError::Validation(format!(
                "start year {} is after end year {}",
                self.start_year, self.end_year
            )));
        }
        Ok(())
    }

    fn captions(&self) -> Captions {
        Captions {
            username: self.username.clone(),
            right_text: right_caption(self.right_text.as_deref(), self.start_year, self.end_year),
            top_text: self.top_text.clone(),
        }
    }
}

/// Geometry producers run for every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Base,
    Image,
    Columns,
    Text,
}

impl Component {
    /// The order in which component meshes are merged.
    pub const MERGE_ORDER: [Component; 4] = [
        Component::Base,
        Component::Image,
        Component::Columns,
        Component::Text,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Component::Base => "base",
            Component::Image => "image",
            Component::Columns => "columns",
            Component::Text => "text",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Triangle counts of a generated model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    pub base_triangles: usize,
    pub image_triangles: usize,
    pub column_triangles: usize,
    pub text_triangles: usize,
    /// Zero when no auxiliary model was merged.
    pub auxiliary_triangles: usize,
    pub total_triangles: usize,
}

impl GenerationSummary {
    fn record(&mut self, component: Component, triangles: usize) {
        match component {
            Component::Base => self.base_triangles = triangles,
            Component::Image => self.image_triangles = triangles,
            Component::Columns => self.column_triangles = triangles,
            Component::Text => self.text_triangles = triangles,
        }
    }
}

/// Output from the mesher.
#[derive(Debug, Clone)]
pub struct SkylineOutput {
    pub mesh: Mesh,
    pub summary: GenerationSummary,
}

/// The main mesher struct.
#[derive(Debug, Clone, Default)]
pub struct SkylineMesher {
    config: MesherConfig,
}

impl SkylineMesher {
    /// Create a new mesher with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new mesher with custom configuration.
    pub fn with_config(config: MesherConfig) -> Self {
        Self { config }
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &MesherConfig {
        &self.config
    }

    /// Build the complete model for `request`.
    pub fn generate(&self, request: &SkylineRequest) -> Result<SkylineOutput> {
        log::debug!(
            "Starting STL generation for user {}, years {}-{}",
            request.username,
            request.start_year,
            request.end_year
        );

        request.validate().context("input validation failed")?;

        let dims = ModelDimensions::for_years(
            request.contributions.len(),
            self.config.logo_path.clone(),
        )
        .context("failed to calculate dimensions")?;
        let max_count = max_contribution_across_years(&request.contributions);

        let (mut mesh, mut summary) = self
            .generate_model_geometry(request, &dims, max_count)
            .context("failed to generate geometry")?;

        if let Some(auxiliary) = self.auxiliary_geometry(&dims) {
            summary.auxiliary_triangles = auxiliary.triangle_count();
            mesh.append(auxiliary);
            log::info!(
                "Merged auxiliary mesh: {} triangles",
                summary.auxiliary_triangles
            );
        }

        summary.total_triangles = mesh.triangle_count();
        log::info!(
            "Model generation complete: {} total triangles",
            summary.total_triangles
        );
        Ok(SkylineOutput { mesh, summary })
    }

    /// Build the model and write it as binary STL to `output_path`.
    pub fn write_stl<P: AsRef<Path>>(
        &self,
        request: &SkylineRequest,
        output_path: P,
    ) -> Result<GenerationSummary> {
        let output_path = output_path.as_ref();
        if output_path.as_os_str().is_empty() {
            return Err(SkylineError::Validation("output path cannot be empty".into())
                .context("input validation failed"));
        }

        let output = self.generate(request)?;

        log::debug!("Writing STL file to: {}", output_path.display());
        write_stl_binary_file(output_path, &output.mesh).context("failed to write STL file")?;
        log::info!("STL file written successfully to: {}", output_path.display());

        Ok(output.summary)
    }

    /// Run every producer on its own scoped thread and merge the results
    /// in [`Component::MERGE_ORDER`].
    fn generate_model_geometry(
        &self,
        request: &SkylineRequest,
        dims: &ModelDimensions,
        max_count: u32,
    ) -> Result<(Mesh, GenerationSummary)> {
        let capacity = estimate_triangle_count(&request.contributions);

        let outcome = crossbeam::scope(|scope| {
            let (base_tx, base_rx) = channel::bounded(0);
            let (image_tx, image_rx) = channel::bounded(0);
            let (columns_tx, columns_rx) = channel::bounded(0);
            let (text_tx, text_rx) = channel::bounded(0);

            // A failed send means the receiver already gave up on this run.
            scope.spawn(move |_| {
                let _ = base_tx.send(self.base_geometry(dims));
            });
            scope.spawn(move |_| {
                let _ = columns_tx.send(Ok(columns::columns_for_year_range(
                    &request.contributions,
                    max_count,
                )));
            });
            scope.spawn(move |_| {
                let _ = text_tx.send(self.text_geometry(request, dims));
            });
            scope.spawn(move |_| {
                let _ = image_tx.send(self.image_geometry(dims));
            });

            let receivers: [Receiver<Result<Mesh>>; 4] = [base_rx, image_rx, columns_rx, text_rx];

            let mut mesh = Mesh::with_capacity(capacity);
            let mut summary = GenerationSummary::default();
            for (component, receiver) in Component::MERGE_ORDER.into_iter().zip(receivers) {
                let part = receiver
                    .recv()
                    .map_err(|_| {
                        SkylineError::Geometry(format!("{component} producer exited without a result"))
                    })
                    .and_then(|result| result)
                    .context(format!("failed to generate {component} geometry"))?;
                summary.record(component, part.triangle_count());
                mesh.append(part);
            }
            Ok::<_, SkylineError>((mesh, summary))
        });

        outcome.unwrap_or_else(|_| {
            Err(SkylineError::Geometry(
                "a geometry producer panicked".into(),
            ))
        })
    }

    fn base_geometry(&self, dims: &ModelDimensions) -> Result<Mesh> {
        let base = create_cuboid_base(dims.inner_width, dims.inner_depth);
        self.degrade(Component::Base, base)
    }

    fn image_geometry(&self, dims: &ModelDimensions) -> Result<Mesh> {
        let Some(path) = dims.image_path.as_deref() else {
            return Ok(Mesh::new());
        };

        let image = FaceRaster::new(
            Face::Front,
            self.config.raster_resolution,
            dims.inner_width,
            BASE_HEIGHT,
            self.config.voxel_depth,
        )
        .and_then(|raster| render_image_file(path, &raster, &ImagePlacement::default()));
        self.degrade(Component::Image, image)
    }

    fn text_geometry(&self, request: &SkylineRequest, dims: &ModelDimensions) -> Result<Mesh> {
        let text = self.render_captions(request, dims);
        self.degrade(Component::Text, text)
    }

    fn render_captions(&self, request: &SkylineRequest, dims: &ModelDimensions) -> Result<Mesh> {
        let front = FaceRaster::new(
            Face::Front,
            self.config.raster_resolution,
            dims.inner_width,
            BASE_HEIGHT,
            self.config.voxel_depth,
        )?;
        let top = FaceRaster::new(
            Face::Top,
            self.config.raster_resolution,
            dims.inner_width,
            dims.inner_depth,
            self.config.voxel_depth,
        )?;
        let font = load_font(
            self.config.primary_font.as_ref(),
            self.config.fallback_font.as_ref(),
        )?;
        create_3d_text(&font, &request.captions(), &front, &top)
    }

    /// Replace a failed component with an empty mesh unless running strict.
    fn degrade(&self, component: Component, result: Result<Mesh>) -> Result<Mesh> {
        match result {
            Ok(mesh) => Ok(mesh),
            Err(e) if self.config.strict_components => Err(e),
            Err(e) => {
                log::warn!(
                    "Failed to generate {} geometry: {}. Continuing without it.",
                    component,
                    e
                );
                Ok(Mesh::new())
            }
        }
    }

    fn auxiliary_geometry(&self, dims: &ModelDimensions) -> Option<Mesh> {
        let path = self.config.auxiliary_mesh.as_deref()?;
        let mesh = load_auxiliary_mesh(path, self.config.stl_parse_mode)?;
        place_auxiliary_mesh(&mesh, dims, &self.config.auxiliary_placement())
    }
}

/// Rough triangle count of a finished model: the base, one column per
/// active day and a fixed allowance for captions.
pub fn estimate_triangle_count(years: &[ContributionGrid]) -> usize {
    let columns: usize = years
        .iter()
        .map(|grid| columns::active_cell_count(grid) * 12)
        .sum();
    12 + columns + TEXT_TRIANGLE_ESTIMATE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::export::stl::{read_stl_binary_file, write_stl_binary_file, HEADER_SIZE};
    use crate::mesher::geometry::create_cuboid;
    use crate::types::ContributionDay;
    use approx::assert_relative_eq;
    use image::{Rgba, RgbaImage};

    fn one_day_grid(count: u32) -> ContributionGrid {
        vec![vec![ContributionDay::new("2023-01-01", count)]]
    }

    /// No fonts, logo or auxiliary model: only the base and columns.
    fn bare_config() -> MesherConfig {
        MesherConfig::default()
            .without_fonts()
            .without_logo()
            .without_auxiliary_mesh()
            .with_raster_resolution(200)
    }

    fn alice() -> SkylineRequest {
        SkylineRequest::single_year(one_day_grid(5), "alice", 2023)
    }

    #[test]
    fn test_request_validation() {
        assert!(alice().validate().is_ok());

        let empty = SkylineRequest::new(Vec::new(), "alice", 2023, 2023);
        assert_eq!(empty.validate().unwrap_err().kind(), ErrorKind::Validation);

        let zero_weeks = SkylineRequest::single_year(Vec::new(), "alice", 2023);
        assert_eq!(zero_weeks.validate().unwrap_err().kind(), ErrorKind::Validation);

        let too_wide = SkylineRequest::single_year(
            vec![vec![ContributionDay::new("2023-01-01", 1)]; GRID_SIZE + 1],
            "alice",
            2023,
        );
        assert_eq!(too_wide.validate().unwrap_err().kind(), ErrorKind::Validation);

        let anonymous = SkylineRequest::single_year(one_day_grid(5), "", 2023);
        assert_eq!(anonymous.validate().unwrap_err().kind(), ErrorKind::Validation);

        let backwards = SkylineRequest::new(vec![one_day_grid(1)], "alice", 2024, 2023);
        assert_eq!(backwards.validate().unwrap_err().kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_single_cell_model_writes_valid_stl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skyline.stl");
        let mesher = SkylineMesher::with_config(bare_config());

        let summary = mesher.write_stl(&alice(), &path).unwrap();
        assert_eq!(summary.base_triangles, 12);
        assert_eq!(summary.column_triangles, 12);
        assert_eq!(summary.text_triangles, 0);
        assert_eq!(summary.image_triangles, 0);
        assert_eq!(summary.auxiliary_triangles, 0);
        assert_eq!(summary.total_triangles, 24);

        let bytes = std::fs::read(&path).unwrap();
        let declared = u32::from_le_bytes(bytes[HEADER_SIZE..HEADER_SIZE + 4].try_into().unwrap());
        assert_eq!(declared, 24);
        assert_eq!(read_stl_binary_file(&path).unwrap().triangle_count(), 24);
    }

    #[test]
    fn test_default_fonts_emboss_username_and_year() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alice.stl");
        let config = MesherConfig::default()
            .without_logo()
            .without_auxiliary_mesh();
        let summary = SkylineMesher::with_config(config)
            .write_stl(&alice(), &path)
            .unwrap();

        let dims = ModelDimensions::for_years(1, None).unwrap();
        let raster = |face, height| {
            FaceRaster::new(
                face,
                voxel::DEFAULT_RASTER_RESOLUTION,
                dims.inner_width,
                height,
                voxel::VOXEL_DEPTH,
            )
            .unwrap()
        };
        let font = FontSource::bundled().load().unwrap();
        let expected_text = create_3d_text(
            &font,
            &alice().captions(),
            &raster(Face::Front, BASE_HEIGHT),
            &raster(Face::Top, dims.inner_depth),
        )
        .unwrap()
        .triangle_count();

        assert!(expected_text > 0);
        assert_eq!(summary.base_triangles, 12);
        assert_eq!(summary.column_triangles, 12);
        assert_eq!(summary.text_triangles, expected_text);
        assert_eq!(summary.total_triangles, 12 + 12 + expected_text);

        let bytes = std::fs::read(&path).unwrap();
        let declared = u32::from_le_bytes(bytes[HEADER_SIZE..HEADER_SIZE + 4].try_into().unwrap());
        assert_eq!(declared as usize, summary.total_triangles);

        // Username and year are both on the front face, inside the base.
        let mesh = read_stl_binary_file(&path).unwrap();
        let eps = 1e-4;
        for triangle in &mesh.triangles[24..] {
            for v in triangle.vertices {
                assert!(v.x >= -eps && v.x <= dims.inner_width + eps, "x out of face: {v}");
                assert!(v.y >= -voxel::VOXEL_DEPTH - eps && v.y <= eps, "y out of face: {v}");
                assert!(v.z >= -BASE_HEIGHT - eps && v.z <= eps, "z out of face: {v}");
            }
        }
    }

    #[test]
    fn test_empty_grid_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skyline.stl");
        let request = SkylineRequest::single_year(Vec::new(), "alice", 2023);

        let err = SkylineMesher::with_config(bare_config())
            .write_stl(&request, &path)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().starts_with("input validation failed"));
        assert!(!path.exists());
    }

    #[test]
    fn test_empty_output_path_fails_validation() {
        let err = SkylineMesher::with_config(bare_config())
            .write_stl(&alice(), "")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_merge_order_and_determinism() {
        let dir = tempfile::tempdir().unwrap();
        let logo = dir.path().join("logo.png");
        let mut image = RgbaImage::new(4, 4);
        image.put_pixel(1, 1, Rgba([255, 255, 255, 255]));
        image.put_pixel(2, 3, Rgba([255, 0, 0, 255]));
        image.save(&logo).unwrap();

        let mesher = SkylineMesher::with_config(bare_config().with_logo(&logo));
        let grids = vec![one_day_grid(2), vec![vec![ContributionDay::new("2023-01-01", 4); 3]]];
        let request = SkylineRequest::new(grids, "alice", 2022, 2023);

        let first = mesher.generate(&request).unwrap();
        let second = mesher.generate(&request).unwrap();
        assert_eq!(first.mesh, second.mesh);

        let summary = first.summary;
        assert_eq!(summary.image_triangles, 24);
        assert_eq!(summary.column_triangles, 4 * 12);
        assert_eq!(summary.total_triangles, 12 + 24 + 48);

        // Base first, then the logo on the front face.
        let base: Mesh = first.mesh.triangles[..12].to_vec().into();
        assert_relative_eq!(base.bounding_box().min.z, -BASE_HEIGHT);
        let logo_part: Mesh = first.mesh.triangles[12..36].to_vec().into();
        assert!(logo_part.bounding_box().max.y <= 0.0);
    }

    #[test]
    fn test_missing_components_degrade_to_empty() {
        let config = bare_config()
            .with_fonts(FontSource::File("no/such/font.ttf".into()), None)
            .with_logo("no/such/logo.png");
        let output = SkylineMesher::with_config(config).generate(&alice()).unwrap();
        assert_eq!(output.summary.text_triangles, 0);
        assert_eq!(output.summary.image_triangles, 0);
        assert_eq!(output.summary.total_triangles, 24);
    }

    #[test]
    fn test_strict_components_name_the_failure() {
        let config = bare_config()
            .with_fonts(FontSource::File("no/such/font.ttf".into()), None)
            .strict(true);
        let err = SkylineMesher::with_config(config)
            .generate(&alice())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("failed to generate text geometry"));
        assert!(matches!(err.root(), SkylineError::Font(_)));
    }

    #[test]
    fn test_corrupt_auxiliary_mesh_is_skipped() {
        testing_logger::setup();
        let dir = tempfile::tempdir().unwrap();
        let character = dir.path().join("character.stl");
        std::fs::write(&character, b"").unwrap();

        let mesher = SkylineMesher::with_config(bare_config().with_auxiliary_mesh(&character));
        let output = mesher.generate(&alice()).unwrap();
        assert_eq!(output.summary.auxiliary_triangles, 0);
        assert_eq!(output.summary.total_triangles, 24);

        testing_logger::validate(|logs| {
            assert!(logs.iter().any(|entry| entry.level == log::Level::Debug
                && entry.body.contains("No auxiliary mesh found")));
        });
    }

    #[test]
    fn test_auxiliary_mesh_is_merged_last() {
        let dir = tempfile::tempdir().unwrap();
        let character = dir.path().join("character.stl");
        write_stl_binary_file(&character, &create_cuboid(0.0, 0.0, -3.0, 10.0, 10.0, 10.0).unwrap())
            .unwrap();

        let mesher = SkylineMesher::with_config(bare_config().with_auxiliary_mesh(&character));
        let output = mesher.generate(&alice()).unwrap();
        assert_eq!(output.summary.auxiliary_triangles, 12);
        assert_eq!(output.summary.total_triangles, 36);

        let dims = ModelDimensions::for_years(1, None).unwrap();
        let figure: Mesh = output.mesh.triangles[24..].to_vec().into();
        let bounds = figure.bounding_box();
        assert_relative_eq!(bounds.max.x, dims.inner_width - 10.0, epsilon = 1e-4);
        assert_relative_eq!(bounds.max.y, dims.inner_depth - 3.0, epsilon = 1e-4);
        assert_relative_eq!(bounds.min.z, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_estimate_triangle_count() {
        let grids = vec![one_day_grid(1), one_day_grid(0)];
        assert_eq!(estimate_triangle_count(&grids), 12 + 12 + TEXT_TRIANGLE_ESTIMATE);
    }
}

//! # Skyline Mesher
//!
//! A Rust library for turning a year (or several years) of contribution
//! activity into a printable 3D skyline.
//!
//! ## Overview
//!
//! Each active day becomes a column whose height follows its contribution
//! count. The columns stand on a base slab whose front face carries the
//! username, the year range and an optional logo; an optional caption can
//! be embossed on top. The result is written as a binary STL file.
//!
//! ## Quick Start
//!
//! ```ignore
//! use skyline_mesher::{load_contributions_json, SkylineMesher, SkylineRequest};
//!
//! // One grid per year, oldest first
//! let years = load_contributions_json(std::fs::File::open("contributions.json")?)?;
//!
//! let request = SkylineRequest::new(years, "octocat", 2021, 2023)
//!     .with_top_text("Ship it");
//!
//! let summary = SkylineMesher::new().write_stl(&request, "skyline.stl")?;
//! println!("{} triangles", summary.total_triangles);
//! ```
//!
//! ## Configuration
//!
//! Fonts, the logo, the auxiliary model and the raster resolution are set
//! through [`MesherConfig`]:
//!
//! ```ignore
//! use skyline_mesher::{FontSource, MesherConfig, SkylineMesher};
//!
//! let config = MesherConfig::default()
//!     .with_fonts(FontSource::File("fonts/Inter.ttf".into()), None)
//!     .without_auxiliary_mesh();
//! let mesher = SkylineMesher::with_config(config);
//! ```

pub mod error;
pub mod export;
pub mod mesher;
pub mod types;

// Re-export main types for convenience
pub use error::{ErrorKind, Result, ResultExt, SkylineError};
pub use export::stl::{export_stl_binary, read_stl, read_stl_file, write_stl_binary_file, ParseMode};
pub use mesher::{
    Component, FontSource, GenerationSummary, MesherConfig, ModelDimensions, SkylineMesher,
    SkylineOutput, SkylineRequest,
};
pub use types::{
    filter_by_month, load_contributions_json, BoundingBox, ContributionDay, ContributionGrid, Mesh,
    Point3D, Triangle,
};

use std::path::Path;

/// Generate a single-year skyline with the default configuration and
/// write it to `output_path` as binary STL.
///
/// Captions use the bundled font. For other fonts, logo or auxiliary
/// model, build a [`SkylineRequest`] and call
/// [`SkylineMesher::with_config`] instead.
pub fn generate_stl<P: AsRef<Path>>(
    contributions: ContributionGrid,
    output_path: P,
    username: &str,
    year: i32,
    top_text: Option<&str>,
    right_text: Option<&str>,
) -> Result<GenerationSummary> {
    generate_stl_range(
        vec![contributions],
        output_path,
        username,
        year,
        year,
        top_text,
        right_text,
    )
}

/// Generate a multi-year skyline. `contributions` holds one grid per year
/// from `start_year` to `end_year`, oldest first.
pub fn generate_stl_range<P: AsRef<Path>>(
    contributions: Vec<ContributionGrid>,
    output_path: P,
    username: &str,
    start_year: i32,
    end_year: i32,
    top_text: Option<&str>,
    right_text: Option<&str>,
) -> Result<GenerationSummary> {
    let mut request = SkylineRequest::new(contributions, username, start_year, end_year);
    request.top_text = top_text.map(str::to_string);
    request.right_text = right_text.map(str::to_string);
    SkylineMesher::new().write_stl(&request, output_path)
}

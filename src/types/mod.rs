//! Shared types used throughout the library.

mod contribution;

pub use contribution::{
    filter_by_month, load_contributions_json, max_contribution, max_contribution_across_years,
    ContributionDay, ContributionGrid,
};

use glam::DVec3;

/// A point or direction in model space, in millimeters.
pub type Point3D = DVec3;

/// A single facet of the output mesh.
///
/// Every triangle owns its three vertices; meshes never share vertices
/// between facets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Facet normal. Not required to be unit length.
    pub normal: Point3D,
    /// Vertices in winding order.
    pub vertices: [Point3D; 3],
}

impl Triangle {
    pub fn new(normal: Point3D, v1: Point3D, v2: Point3D, v3: Point3D) -> Self {
        Self {
            normal,
            vertices: [v1, v2, v3],
        }
    }

    /// Copy of this triangle moved by `offset`. The normal is unchanged.
    pub fn translated(&self, offset: Point3D) -> Self {
        Self {
            normal: self.normal,
            vertices: self.vertices.map(|v| v + offset),
        }
    }

    /// Copy of this triangle with every vertex and normal component multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            normal: self.normal * factor,
            vertices: self.vertices.map(|v| v * factor),
        }
    }
}

/// An ordered triangle soup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    /// Add one triangle.
    pub fn push(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Append another mesh to this one, consuming it.
    pub fn append(&mut self, mut other: Mesh) {
        self.triangles.append(&mut other.triangles);
    }

    /// Get the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Check if the mesh is empty.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Triangle> {
        self.triangles.iter()
    }

    /// New mesh with every vertex moved by `(dx, dy, dz)`.
    pub fn translate(&self, dx: f64, dy: f64, dz: f64) -> Mesh {
        let offset = DVec3::new(dx, dy, dz);
        self.triangles.iter().map(|t| t.translated(offset)).collect()
    }

    /// New mesh uniformly scaled about the origin.
    ///
    /// Normals are scaled along with the vertices, so a non-unit factor
    /// leaves them non-unit.
    pub fn scale(&self, factor: f64) -> Mesh {
        self.triangles.iter().map(|t| t.scaled(factor)).collect()
    }

    /// Extrema over all vertices.
    ///
    /// An empty mesh yields an inverted box (min = +inf, max = -inf); check
    /// [`BoundingBox::is_valid`] before using its dimensions.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bounds = BoundingBox::EMPTY;
        for triangle in &self.triangles {
            for vertex in &triangle.vertices {
                bounds.min = bounds.min.min(*vertex);
                bounds.max = bounds.max.max(*vertex);
            }
        }
        bounds
    }
}

impl FromIterator<Triangle> for Mesh {
    fn from_iter<I: IntoIterator<Item = Triangle>>(iter: I) -> Self {
        Self {
            triangles: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Triangle>> for Mesh {
    fn from(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }
}

impl IntoIterator for Mesh {
    type Item = Triangle;
    type IntoIter = std::vec::IntoIter<Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.into_iter()
    }
}

impl<'a> IntoIterator for &'a Mesh {
    type Item = &'a Triangle;
    type IntoIter = std::slice::Iter<'a, Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.iter()
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point3D,
    pub max: Point3D,
}

impl BoundingBox {
    /// The inverted box every accumulation starts from.
    pub const EMPTY: BoundingBox = BoundingBox {
        min: DVec3::INFINITY,
        max: DVec3::NEG_INFINITY,
    };

    pub fn new(min: Point3D, max: Point3D) -> Self {
        Self { min, max }
    }

    /// False for the inverted box of an empty mesh.
    pub fn is_valid(&self) -> bool {
        self.min.cmple(self.max).all()
    }

    pub fn dimensions(&self) -> Point3D {
        self.max - self.min
    }
}

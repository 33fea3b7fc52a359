//! STL import and export.
//!
//! Binary layout: an 80-byte header, a little-endian `u32` triangle count,
//! then one 50-byte record per triangle (normal and three vertices as
//! little-endian `f32` triples, followed by a zero `u16` attribute).

use crate::error::{Result, ResultExt, SkylineError};
use crate::types::{Mesh, Point3D, Triangle};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Size of the binary header.
pub const HEADER_SIZE: usize = 80;
/// Size of one binary triangle record.
pub const TRIANGLE_RECORD_SIZE: usize = 50;

const COUNT_SIZE: usize = 4;
const ASCII_MARKER: &[u8] = b"solid";
// Must not start with "solid", or readers would take the file for ASCII.
const HEADER_TEXT: &[u8] = b"binary STL generated by skyline-mesher";

/// How the ASCII reader treats malformed input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Unparsable numbers read as zero; facets without three vertices are dropped.
    #[default]
    Lenient,
    /// Any malformed number or facet is an error.
    Strict,
}

/// The two STL encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StlFormat {
    Binary,
    Ascii,
}

/// Guess the encoding from the first bytes: ASCII files open with `solid`.
pub fn detect_format(data: &[u8]) -> StlFormat {
    let header = &data[..data.len().min(HEADER_SIZE)];
    if header.starts_with(ASCII_MARKER) {
        StlFormat::Ascii
    } else {
        StlFormat::Binary
    }
}

fn write_vec3<W: Write>(writer: &mut W, v: Point3D) -> std::io::Result<()> {
    for component in v.to_array() {
        writer.write_all(&(component as f32).to_le_bytes())?;
    }
    Ok(())
}

/// Encode a mesh as binary STL.
pub fn write_stl_binary<W: Write>(mut writer: W, mesh: &Mesh) -> Result<()> {
    let count = u32::try_from(mesh.triangle_count()).map_err(|_| {
        SkylineError::Stl(format!(
            "{} triangles exceed the binary STL limit",
            mesh.triangle_count()
        ))
    })?;

    let mut header = [0u8; HEADER_SIZE];
    header[..HEADER_TEXT.len()].copy_from_slice(HEADER_TEXT);
    writer.write_all(&header)?;
    writer.write_all(&count.to_le_bytes())?;

    for triangle in mesh {
        write_vec3(&mut writer, triangle.normal)?;
        for vertex in triangle.vertices {
            write_vec3(&mut writer, vertex)?;
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }

    writer.flush()?;
    Ok(())
}

/// Encode a mesh as binary STL in memory.
pub fn export_stl_binary(mesh: &Mesh) -> Result<Vec<u8>> {
    let mut data =
        Vec::with_capacity(HEADER_SIZE + COUNT_SIZE + mesh.triangle_count() * TRIANGLE_RECORD_SIZE);
    write_stl_binary(&mut data, mesh)?;
    Ok(data)
}

/// Write a binary STL file, replacing any existing file.
pub fn write_stl_binary_file<P: AsRef<Path>>(path: P, mesh: &Mesh) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).context(format!("failed to create {}", path.display()))?;
    write_stl_binary(BufWriter::new(file), mesh)
}

fn read_f32(data: &[u8], offset: usize) -> f64 {
    f32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ]) as f64
}

fn read_vec3(data: &[u8], offset: usize) -> Point3D {
    Point3D::new(
        read_f32(data, offset),
        read_f32(data, offset + 4),
        read_f32(data, offset + 8),
    )
}

fn declared_triangle_count(data: &[u8]) -> Option<usize> {
    let count = data.get(HEADER_SIZE..HEADER_SIZE + COUNT_SIZE)?;
    Some(u32::from_le_bytes([count[0], count[1], count[2], count[3]]) as usize)
}

/// True when `data` is exactly as long as its declared triangle count implies.
fn has_binary_layout(data: &[u8]) -> bool {
    declared_triangle_count(data).is_some_and(|count| {
        count
            .checked_mul(TRIANGLE_RECORD_SIZE)
            .and_then(|body| body.checked_add(HEADER_SIZE + COUNT_SIZE))
            == Some(data.len())
    })
}

/// Decode binary STL.
pub fn read_stl_binary(data: &[u8]) -> Result<Mesh> {
    let count = declared_triangle_count(data).ok_or_else(|| {
        SkylineError::Stl(format!(
            "file too small for header and triangle count ({} bytes)",
            data.len()
        ))
    })?;

    let expected = count
        .checked_mul(TRIANGLE_RECORD_SIZE)
        .and_then(|body| body.checked_add(HEADER_SIZE + COUNT_SIZE));
    if expected.map_or(true, |expected| data.len() < expected) {
        return Err(SkylineError::Stl(format!(
            "file truncated: {} triangles declared, got {} bytes",
            count,
            data.len()
        )));
    }

    let mut mesh = Mesh::with_capacity(count);
    let mut offset = HEADER_SIZE + COUNT_SIZE;
    for _ in 0..count {
        let normal = read_vec3(data, offset);
        let v1 = read_vec3(data, offset + 12);
        let v2 = read_vec3(data, offset + 24);
        let v3 = read_vec3(data, offset + 36);
        mesh.push(Triangle::new(normal, v1, v2, v3));
        offset += TRIANGLE_RECORD_SIZE;
    }

    Ok(mesh)
}

/// Read a binary STL file.
pub fn read_stl_binary_file<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    let data = std::fs::read(path).context(format!("failed to read {}", path.display()))?;
    read_stl_binary(&data)
}

/// Encode a mesh as ASCII STL.
pub fn write_stl_ascii<W: Write>(mut writer: W, mesh: &Mesh, name: &str) -> Result<()> {
    writeln!(writer, "solid {}", name)?;
    for triangle in mesh {
        let n = triangle.normal;
        writeln!(writer, "  facet normal {:e} {:e} {:e}", n.x, n.y, n.z)?;
        writeln!(writer, "    outer loop")?;
        for v in triangle.vertices {
            writeln!(writer, "      vertex {:e} {:e} {:e}", v.x, v.y, v.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid {}", name)?;
    writer.flush()?;
    Ok(())
}

/// Parse three coordinates starting at `fields[start]`.
fn parse_coords(fields: &[&str], start: usize, line_no: usize, mode: ParseMode) -> Result<Point3D> {
    let mut coords = [0.0f64; 3];
    for (i, coord) in coords.iter_mut().enumerate() {
        let parsed = fields.get(start + i).and_then(|f| f.parse::<f64>().ok());
        *coord = match (parsed, mode) {
            (Some(value), _) => value,
            (None, ParseMode::Lenient) => 0.0,
            (None, ParseMode::Strict) => {
                return Err(SkylineError::Stl(format!(
                    "line {}: expected three numbers, got {:?}",
                    line_no,
                    &fields[start.min(fields.len())..]
                )));
            }
        };
    }
    Ok(Point3D::from_array(coords))
}

/// Parse ASCII STL.
///
/// Only `facet normal`, `vertex` and `endfacet` lines carry data; all
/// other lines are ignored.
pub fn read_stl_ascii<R: BufRead>(reader: R, mode: ParseMode) -> Result<Mesh> {
    let mut mesh = Mesh::new();
    let mut normal = Point3D::ZERO;
    let mut vertices: Vec<Point3D> = Vec::with_capacity(3);

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();

        match fields.as_slice() {
            ["facet", "normal", ..] => {
                normal = parse_coords(&fields, 2, line_no, mode)?;
                vertices.clear();
            }
            ["vertex", ..] => {
                vertices.push(parse_coords(&fields, 1, line_no, mode)?);
            }
            ["endfacet", ..] => {
                if let [v1, v2, v3] = vertices.as_slice() {
                    mesh.push(Triangle::new(normal, *v1, *v2, *v3));
                } else if mode == ParseMode::Strict {
                    return Err(SkylineError::Stl(format!(
                        "line {}: facet has {} vertices",
                        line_no,
                        vertices.len()
                    )));
                }
                vertices.clear();
            }
            _ => {}
        }
    }

    Ok(mesh)
}

/// Read an ASCII STL file.
pub fn read_stl_ascii_file<P: AsRef<Path>>(path: P, mode: ParseMode) -> Result<Mesh> {
    let path = path.as_ref();
    let file = File::open(path).context(format!("failed to open {}", path.display()))?;
    read_stl_ascii(BufReader::new(file), mode)
}

/// Decode STL in either encoding.
///
/// A `solid`-prefixed file that yields no ASCII facets but is laid out as
/// binary is decoded as binary; some exporters write `solid` into binary headers.
pub fn read_stl(data: &[u8], mode: ParseMode) -> Result<Mesh> {
    match detect_format(data) {
        StlFormat::Binary => read_stl_binary(data),
        StlFormat::Ascii => match read_stl_ascii(data, mode) {
            Ok(mesh) if !mesh.is_empty() => Ok(mesh),
            _ if has_binary_layout(data) => read_stl_binary(data),
            result => result,
        },
    }
}

/// Read an STL file in either encoding.
pub fn read_stl_file<P: AsRef<Path>>(path: P, mode: ParseMode) -> Result<Mesh> {
    let path = path.as_ref();
    let data = std::fs::read(path).context(format!("failed to read {}", path.display()))?;
    read_stl(&data, mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::mesher::geometry::create_cuboid;

    fn sample_mesh() -> Mesh {
        let mut mesh = create_cuboid(0.25, -1.5, 3.0, 2.0, 0.125, 7.75).unwrap();
        mesh.push(Triangle::new(
            Point3D::new(0.6, 0.0, 0.8),
            Point3D::new(1.1, 2.2, 3.3),
            Point3D::new(-4.4, 5.5, 6.6),
            Point3D::new(7.7, -8.8, 9.9),
        ));
        mesh
    }

    fn to_f32_precision(mesh: &Mesh) -> Mesh {
        let round = |v: Point3D| v.as_vec3().as_dvec3();
        mesh.iter()
            .map(|t| Triangle {
                normal: round(t.normal),
                vertices: t.vertices.map(round),
            })
            .collect()
    }

    #[test]
    fn test_binary_layout() {
        let mesh = create_cuboid(0.0, 0.0, 0.0, 1.0, 2.0, 3.0).unwrap();
        let data = export_stl_binary(&mesh).unwrap();

        assert_eq!(data.len(), 80 + 4 + 12 * 50);
        assert_eq!(u32::from_le_bytes([data[80], data[81], data[82], data[83]]), 12);
        assert!(!data.starts_with(b"solid"));

        // First record: normal then first vertex, both little-endian f32.
        let first = &data[84..84 + 50];
        assert_eq!(&first[0..4], &0.0f32.to_le_bytes());
        assert_eq!(&first[8..12], &(-1.0f32).to_le_bytes());
        assert_eq!(&first[12..24], &[0u8; 12]);
        assert_eq!(&first[48..50], &[0, 0]);
    }

    #[test]
    fn test_binary_round_trip() {
        let mesh = sample_mesh();
        let decoded = read_stl_binary(&export_stl_binary(&mesh).unwrap()).unwrap();
        assert_eq!(decoded, to_f32_precision(&mesh));
    }

    #[test]
    fn test_empty_mesh_round_trip() {
        let data = export_stl_binary(&Mesh::new()).unwrap();
        assert_eq!(data.len(), 84);
        assert!(read_stl_binary(&data).unwrap().is_empty());
    }

    #[test]
    fn test_truncated_binary_is_rejected() {
        let data = export_stl_binary(&sample_mesh()).unwrap();
        let err = read_stl_binary(&data[..data.len() - 1]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Stl);

        let err = read_stl_binary(&data[..40]).unwrap_err();
        assert!(matches!(err, SkylineError::Stl(_)));
        assert!(read_stl_binary(&[]).is_err());
    }

    #[test]
    fn test_absurd_triangle_count_is_rejected() {
        let mut data = vec![0u8; 84];
        data[80..84].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(read_stl_binary(&data).is_err());
    }

    #[test]
    fn test_ascii_round_trip() {
        let mesh = sample_mesh();
        let mut text = Vec::new();
        write_stl_ascii(&mut text, &mesh, "skyline").unwrap();
        assert!(text.starts_with(b"solid skyline"));

        let decoded = read_stl_ascii(text.as_slice(), ParseMode::Strict).unwrap();
        assert_eq!(decoded, mesh);
    }

    #[test]
    fn test_ascii_lenient_numbers() {
        let text = "solid bad\n\
            facet normal 0 0 abc\n\
              outer loop\n\
                vertex 1 2 3\n\
                vertex 4 x 6\n\
                vertex 7 8\n\
              endloop\n\
            endfacet\n\
            endsolid bad\n";

        let mesh = read_stl_ascii(text.as_bytes(), ParseMode::Lenient).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        let triangle = mesh.triangles[0];
        assert_eq!(triangle.normal, Point3D::ZERO);
        assert_eq!(triangle.vertices[1], Point3D::new(4.0, 0.0, 6.0));
        assert_eq!(triangle.vertices[2], Point3D::new(7.0, 8.0, 0.0));

        let err = read_stl_ascii(text.as_bytes(), ParseMode::Strict).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Stl);
    }

    #[test]
    fn test_ascii_incomplete_facets() {
        let text = "solid s\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nendloop\nendfacet\nendsolid s\n";
        assert!(read_stl_ascii(text.as_bytes(), ParseMode::Lenient)
            .unwrap()
            .is_empty());
        assert!(read_stl_ascii(text.as_bytes(), ParseMode::Strict).is_err());
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(b"solid cube\n"), StlFormat::Ascii);
        assert_eq!(detect_format(b"sol"), StlFormat::Binary);
        assert_eq!(detect_format(&[]), StlFormat::Binary);
        let binary = export_stl_binary(&sample_mesh()).unwrap();
        assert_eq!(detect_format(&binary), StlFormat::Binary);
    }

    #[test]
    fn test_read_stl_auto_detects() {
        let mesh = sample_mesh();
        let binary = export_stl_binary(&mesh).unwrap();
        assert_eq!(read_stl(&binary, ParseMode::Lenient).unwrap().triangle_count(), 13);

        let mut ascii = Vec::new();
        write_stl_ascii(&mut ascii, &mesh, "x").unwrap();
        assert_eq!(read_stl(&ascii, ParseMode::Lenient).unwrap(), mesh);
    }

    #[test]
    fn test_binary_with_solid_header_falls_back() {
        let mesh = sample_mesh();
        let mut binary = export_stl_binary(&mesh).unwrap();
        binary[..5].copy_from_slice(b"solid");
        assert_eq!(detect_format(&binary), StlFormat::Ascii);
        let decoded = read_stl(&binary, ParseMode::Lenient).unwrap();
        assert_eq!(decoded, to_f32_precision(&mesh));
    }

    #[test]
    fn test_file_round_trip_truncates_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.stl");
        std::fs::write(&path, vec![0xAB; 10_000]).unwrap();

        let mesh = sample_mesh();
        write_stl_binary_file(&path, &mesh).unwrap();
        assert_eq!(
            std::fs::metadata(&path).unwrap().len() as usize,
            84 + 13 * TRIANGLE_RECORD_SIZE
        );
        assert_eq!(read_stl_file(&path, ParseMode::Strict).unwrap().triangle_count(), 13);
        assert_eq!(read_stl_binary_file(&path).unwrap(), to_f32_precision(&mesh));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_stl_file("no/such/file.stl", ParseMode::Lenient).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        let err = read_stl_ascii_file("no/such/file.stl", ParseMode::Lenient).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}

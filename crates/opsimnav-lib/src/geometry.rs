//! Hull extents from STL surface meshes.
//!
//! Both STL encodings are supported and detected automatically:
//!
//! ```text
//! binary: UINT8[80] header, UINT32 triangle count, then per triangle
//!         REAL32[3] normal, REAL32[3] x 3 vertices, UINT16 attribute
//! ascii:  solid name / facet normal .. / outer loop / vertex x y z (x3) /
//!         endloop / endfacet / ... / endsolid name
//! ```
//!
//! Only the global bounding box is read. Orientation and closedness are not
//! checked since extents are unaffected by either.

use std::fs;
use std::path::Path;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Size of one triangle in binary STL (normal + 3 vertices + attribute).
const TRIANGLE_SIZE: usize = 50;

/// Triangle soup read from an STL file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Point3<f64>>,
    pub triangle_count: usize,
}

/// Bounding-box extents of a hull under the x = length, y = beam, z = draft convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HullExtents {
    pub length_m: f64,
    pub beam_m: f64,
    pub draft_m: f64,
    pub triangle_count: usize,
}

impl Mesh {
    /// Axis-aligned bounding box corners `(min, max)`.
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(min, max), v| {
            (
                Point3::new(min.x.min(v.x), min.y.min(v.y), min.z.min(v.z)),
                Point3::new(max.x.max(v.x), max.y.max(v.y), max.z.max(v.z)),
            )
        }))
    }

    /// Extents along the three principal axes.
    ///
    /// # Errors
    /// Returns [`Error::MalformedMesh`] for an empty mesh or non-finite coordinates.
    pub fn extents(&self) -> Result<HullExtents> {
        // min/max skip NaN, so check the vertices rather than the box.
        if let Some(index) = self.vertices.iter().position(|v| !is_finite_point(v)) {
            return Err(Error::malformed_mesh(format!(
                "vertex {index} has a non-finite coordinate"
            )));
        }

        let (min, max) = self
            .bounds()
            .ok_or_else(|| Error::malformed_mesh("mesh contains no triangles"))?;
        let size: Vector3<f64> = max - min;

        if size.iter().any(|v| !v.is_finite()) {
            return Err(Error::malformed_mesh("mesh extents overflow"));
        }

        Ok(HullExtents {
            length_m: size.x,
            beam_m: size.y,
            draft_m: size.z,
            triangle_count: self.triangle_count,
        })
    }
}

fn is_finite_point(point: &Point3<f64>) -> bool {
    point.coords.iter().all(|c| c.is_finite())
}

/// Load a mesh from an STL file on disk.
pub fn load_stl(path: &Path) -> Result<Mesh> {
    let bytes = fs::read(path).map_err(|source| Error::MeshRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mesh = parse_stl(&bytes)?;
    debug!(
        triangles = mesh.triangle_count,
        "parsed STL mesh from {}",
        path.display()
    );
    Ok(mesh)
}

/// Read the hull extents of the STL file at `path`.
pub fn extract_hull_extents(path: &Path) -> Result<HullExtents> {
    load_stl(path)?.extents()
}

/// Parse an in-memory STL document, detecting ASCII vs binary.
pub fn parse_stl(bytes: &[u8]) -> Result<Mesh> {
    if bytes.len() < 6 {
        return Err(Error::malformed_mesh("input too small to be an STL file"));
    }

    if looks_binary(bytes) {
        parse_binary(bytes)
    } else {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| Error::malformed_mesh(format!("ASCII STL is not valid UTF-8: {e}")))?;
        parse_ascii(text)
    }
}

/// Binary unless the file starts with `solid` and its length does not match
/// the binary layout implied by the triangle count.
///
/// Some exporters write "solid" into binary headers, so the size check wins.
fn looks_binary(bytes: &[u8]) -> bool {
    if let Some(count) = binary_triangle_count(bytes) {
        if bytes.len() == HEADER_SIZE + 4 + count * TRIANGLE_SIZE {
            return true;
        }
    }

    let head = &bytes[..bytes.len().min(HEADER_SIZE)];
    let starts_with_solid = String::from_utf8_lossy(head)
        .trim_start()
        .starts_with("solid");
    !starts_with_solid || head.contains(&0)
}

fn binary_triangle_count(bytes: &[u8]) -> Option<usize> {
    let raw = bytes.get(HEADER_SIZE..HEADER_SIZE + 4)?;
    Some(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as usize)
}

fn parse_binary(bytes: &[u8]) -> Result<Mesh> {
    let count = binary_triangle_count(bytes).ok_or_else(|| {
        Error::malformed_mesh(format!(
            "binary STL header truncated: expected {} bytes, got {}",
            HEADER_SIZE + 4,
            bytes.len()
        ))
    })?;
    if count == 0 {
        return Err(Error::malformed_mesh("mesh contains no triangles"));
    }

    let body = &bytes[HEADER_SIZE + 4..];
    let available = body.len() / TRIANGLE_SIZE;
    if available < count {
        return Err(Error::malformed_mesh(format!(
            "binary STL declares {count} triangles but only {available} are present"
        )));
    }

    let mut vertices = Vec::with_capacity(count * 3);
    for (index, triangle) in body.chunks_exact(TRIANGLE_SIZE).take(count).enumerate() {
        // Skip the 12-byte normal.
        for offset in [12, 24, 36] {
            let vertex = read_vertex(&triangle[offset..offset + 12]);
            if !is_finite_point(&vertex) {
                return Err(Error::malformed_mesh(format!(
                    "triangle {index}: non-finite coordinate"
                )));
            }
            vertices.push(vertex);
        }
    }

    Ok(Mesh {
        vertices,
        triangle_count: count,
    })
}

/// Read a vertex from 12 bytes (3 little-endian f32s).
fn read_vertex(buf: &[u8]) -> Point3<f64> {
    let x = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let y = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let z = f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    Point3::new(f64::from(x), f64::from(y), f64::from(z))
}

fn parse_ascii(text: &str) -> Result<Mesh> {
    let mut mesh = Mesh::default();
    let mut in_loop = false;
    let mut facet: Vec<Point3<f64>> = Vec::with_capacity(3);

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };

        match keyword.to_ascii_lowercase().as_str() {
            "outer" => {
                in_loop = true;
                facet.clear();
            }
            "vertex" => {
                if !in_loop {
                    return Err(Error::malformed_mesh(format!(
                        "line {line_no}: vertex outside of an outer loop"
                    )));
                }
                let mut coords = [0.0_f64; 3];
                for coord in &mut coords {
                    let raw = parts.next().ok_or_else(|| {
                        Error::malformed_mesh(format!("line {line_no}: vertex needs 3 coordinates"))
                    })?;
                    *coord = raw.parse().map_err(|e| {
                        Error::malformed_mesh(format!("line {line_no}: invalid coordinate '{raw}': {e}"))
                    })?;
                    if !coord.is_finite() {
                        return Err(Error::malformed_mesh(format!(
                            "line {line_no}: non-finite coordinate '{raw}'"
                        )));
                    }
                }
                facet.push(Point3::new(coords[0], coords[1], coords[2]));
            }
            "endloop" => {
                in_loop = false;
            }
            "endfacet" => {
                if facet.len() != 3 {
                    return Err(Error::malformed_mesh(format!(
                        "line {line_no}: facet has {} vertices, expected 3",
                        facet.len()
                    )));
                }
                mesh.vertices.append(&mut facet);
                mesh.triangle_count += 1;
            }
            "endsolid" => break,
            _ => {}
        }
    }

    if mesh.triangle_count == 0 {
        return Err(Error::malformed_mesh("mesh contains no triangles"));
    }

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE_FACET: &str = "solid t
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 4 0 0
      vertex 0 2 1.5
    endloop
  endfacet
endsolid t
";

    #[test]
    fn ascii_single_facet_extents() {
        let mesh = parse_stl(SINGLE_FACET.as_bytes()).expect("valid ascii stl");
        let extents = mesh.extents().expect("non-empty");
        assert_eq!(extents.length_m, 4.0);
        assert_eq!(extents.beam_m, 2.0);
        assert_eq!(extents.draft_m, 1.5);
        assert_eq!(extents.triangle_count, 1);
    }

    #[test]
    fn ascii_bad_coordinate_is_malformed() {
        let text = SINGLE_FACET.replace("vertex 4 0 0", "vertex four 0 0");
        let err = parse_stl(text.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MalformedMesh { .. }));
        assert!(err.to_string().contains("line 5"), "{err}");
    }

    #[test]
    fn binary_with_solid_header_is_detected_by_size() {
        let mut bytes = vec![0u8; HEADER_SIZE];
        bytes[..5].copy_from_slice(b"solid");
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 12]);
        for v in [[0.0f32, 0.0, 0.0], [3.0, 0.0, 0.0], [0.0, 1.0, 2.0]] {
            for c in v {
                bytes.extend_from_slice(&c.to_le_bytes());
            }
        }
        bytes.extend_from_slice(&0u16.to_le_bytes());

        let extents = parse_stl(&bytes).unwrap().extents().unwrap();
        assert_eq!((extents.length_m, extents.beam_m, extents.draft_m), (3.0, 1.0, 2.0));
    }

    #[test]
    fn nan_vertex_in_mesh_fails_extents() {
        let mut mesh = parse_stl(SINGLE_FACET.as_bytes()).unwrap();
        mesh.vertices[1].x = f64::NAN;
        let err = mesh.extents().unwrap_err();
        assert!(err.to_string().contains("vertex 1"), "{err}");
    }

    #[test]
    fn tiny_input_is_malformed() {
        assert!(matches!(
            parse_stl(b"sol"),
            Err(Error::MalformedMesh { .. })
        ));
    }
}

//! Wavefront OBJ loading and saving.
//!
//! Only the `v` and `f` directives are recognised; comments, blank lines
//! and every other directive are skipped. Face tokens may be `n`, `n/vt`,
//! `n//vn` or `n/vt/vn`; only the leading vertex index is used. Indices
//! follow the OBJ convention: 1-based when positive, relative to the
//! current vertex count when negative. A face token whose index is zero,
//! non-numeric, or does not resolve to an already-parsed vertex
//! invalidates the whole face (forward references are not supported).
//! Polygons with more than three corners are fan-triangulated around
//! their first corner.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::error::Result;
use crate::mesh::TriMesh;

/// Load a triangle mesh from an OBJ file.
///
/// Fails with an I/O error when the file cannot be opened; a file with no
/// recognised directives yields an empty mesh.
///
/// # Example
///
/// ```no_run
/// let mesh = geolab::io::obj::load("model.obj").unwrap();
/// println!("vertices: {}", mesh.num_vertices());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriMesh> {
    let file = File::open(path.as_ref())?;
    read(BufReader::new(file))
}

/// Parse OBJ text from any buffered reader.
pub fn read<R: BufRead>(reader: R) -> Result<TriMesh> {
    let mut vertices: Vec<Point3<f64>> = Vec::new();
    let mut faces: Vec<[usize; 3]> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let mut fields = line.split_whitespace();
        match fields.next() {
            Some("v") => {
                if let Some(p) = parse_vertex(fields) {
                    vertices.push(p);
                }
            }
            Some("f") => {
                if let Some(corners) = parse_face(fields, vertices.len()) {
                    // Fan triangulation around the first corner.
                    for i in 1..corners.len() - 1 {
                        faces.push([corners[0], corners[i], corners[i + 1]]);
                    }
                }
            }
            // Blank lines, comments, and unrecognised directives.
            _ => {}
        }
    }

    Ok(TriMesh::from_triangles(vertices, faces))
}

/// Parse the three leading coordinate fields of a `v` line.
///
/// Lines with fewer than three numeric fields are skipped.
fn parse_vertex<'a, I: Iterator<Item = &'a str>>(mut fields: I) -> Option<Point3<f64>> {
    let mut coords = [0.0; 3];
    for c in &mut coords {
        *c = fields.next()?.parse().ok()?;
    }
    Some(Point3::new(coords[0], coords[1], coords[2]))
}

/// Resolve the corner indices of an `f` line, or `None` if the face is
/// invalid and must be dropped whole.
fn parse_face<'a, I: Iterator<Item = &'a str>>(
    fields: I,
    num_vertices: usize,
) -> Option<Vec<usize>> {
    let mut corners = Vec::new();
    for token in fields {
        let head = token.split('/').next().unwrap_or("");
        let raw: i64 = match head.parse() {
            Ok(v) => v,
            Err(_) => {
                tracing::debug!(token, "dropping face with non-numeric index");
                return None;
            }
        };
        if raw == 0 {
            tracing::debug!("dropping face with zero index");
            return None;
        }
        let resolved = if raw > 0 {
            raw as usize - 1
        } else {
            let offset = num_vertices as i64 + raw;
            if offset < 0 {
                tracing::debug!(raw, "dropping face with unresolvable negative index");
                return None;
            }
            offset as usize
        };
        if resolved >= num_vertices {
            tracing::debug!(resolved, num_vertices, "dropping face with out-of-range index");
            return None;
        }
        corners.push(resolved);
    }
    if corners.len() < 3 {
        return None;
    }
    Some(corners)
}

/// Save a mesh as OBJ `v`/`f` lines with 1-based indices.
///
/// Coordinates are written in Rust's shortest round-trip decimal form, so
/// saving and reloading reproduces the vertex buffer bit for bit.
pub fn save<P: AsRef<Path>>(mesh: &TriMesh, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut out = BufWriter::new(file);
    for v in mesh.vertices() {
        writeln!(out, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for f in mesh.faces() {
        writeln!(out, "f {} {} {}", f[0] + 1, f[1] + 1, f[2] + 1)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_str(text: &str) -> TriMesh {
        read(Cursor::new(text)).unwrap()
    }

    #[test]
    fn test_vertices_and_faces() {
        let mesh = read_str(
            "# a triangle\n\
             v 0 0 0\n\
             v 1 0 0\n\
             v 0 1 0\n\
             f 1 2 3\n",
        );
        assert_eq!(mesh.num_vertices(), 3);
        assert_eq!(mesh.num_faces(), 1);
        assert_eq!(mesh.faces()[0], [0, 1, 2]);
        assert_eq!(mesh.position(1), Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_empty_input_gives_empty_mesh() {
        let mesh = read_str("# nothing here\n\nusemtl steel\n");
        assert!(mesh.is_empty());
        assert_eq!(mesh.num_faces(), 0);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load("definitely/not/here.obj").unwrap_err();
        assert!(matches!(err, crate::error::EngineError::Io(_)));
    }

    #[test]
    fn test_short_vertex_line_skipped() {
        let mesh = read_str("v 1 2\nv 1 2 3\nv a b c\n");
        assert_eq!(mesh.num_vertices(), 1);
        assert_eq!(mesh.position(0), Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_extra_vertex_fields_ignored() {
        // OBJ allows a w coordinate and some exporters append colours.
        let mesh = read_str("v 1 2 3 1.0 0.5 0.5\n");
        assert_eq!(mesh.num_vertices(), 1);
        assert_eq!(mesh.position(0), Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_face_token_forms() {
        let mesh = read_str(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\n\
             f 1/5 2//7 3/5/7\n",
        );
        assert_eq!(mesh.num_faces(), 1);
        assert_eq!(mesh.faces()[0], [0, 1, 2]);
    }

    #[test]
    fn test_negative_indices() {
        let mesh = read_str(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\n\
             f -3 -2 -1\n",
        );
        assert_eq!(mesh.num_faces(), 1);
        assert_eq!(mesh.faces()[0], [0, 1, 2]);
    }

    #[test]
    fn test_zero_index_invalidates_face() {
        let mesh = read_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n");
        assert_eq!(mesh.num_faces(), 0);
    }

    #[test]
    fn test_non_numeric_index_invalidates_face() {
        let mesh = read_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 x\n");
        assert_eq!(mesh.num_faces(), 0);
    }

    #[test]
    fn test_forward_reference_invalidates_face() {
        // The face names vertex 4 before it is parsed.
        let mesh = read_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\nv 0 0 1\n");
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 0);
    }

    #[test]
    fn test_fan_triangulation() {
        let mesh = read_str(
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nv 0 2 0\n\
             f 1 2 3 4 5\n",
        );
        assert_eq!(mesh.num_faces(), 3);
        assert_eq!(mesh.faces()[0], [0, 1, 2]);
        assert_eq!(mesh.faces()[1], [0, 2, 3]);
        assert_eq!(mesh.faces()[2], [0, 3, 4]);
    }

    #[test]
    fn test_duplicate_corner_triangle_dropped() {
        let mesh = read_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 1 2\nf 1 2 3\n");
        assert_eq!(mesh.num_faces(), 1);
        // The surviving face's edges are intact.
        assert_eq!(mesh.num_edges(), 3);
    }

    #[test]
    fn test_save_load_round_trip() {
        let source = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 0.25 0.125 3.5\nf 1 2 3\nf 2 3 4\n";
        let mesh = read_str(source);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("round_trip.obj");
        save(&mesh, &path).unwrap();
        let reloaded = load(&path).unwrap();

        assert_eq!(mesh.vertices(), reloaded.vertices());
        assert_eq!(mesh.faces(), reloaded.faces());
    }
}

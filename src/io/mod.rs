//! Mesh file I/O.
//!
//! The engine consumes Wavefront OBJ geometry: `v` and `f` directives
//! populate the mesh model, everything else is ignored. See [`obj`] for
//! the exact parsing rules (negative indices, fan triangulation,
//! invalid-face handling).
//!
//! [`load`] detects the format from the file extension and rejects
//! anything it does not recognise, so a PLY or STL file is refused up
//! front instead of being run through the OBJ line parser.

pub mod obj;

use std::path::Path;

use crate::error::{EngineError, Result};
use crate::mesh::TriMesh;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
}

impl Format {
    /// Detect format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            _ => None,
        }
    }

    /// Detect format from a file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

/// Load a mesh from a file with format detection.
///
/// The format is determined by the file extension; unrecognised
/// extensions fail with [`EngineError::UnsupportedFormat`].
///
/// # Example
///
/// ```no_run
/// let mesh = geolab::io::load("model.obj").unwrap();
/// println!("vertices: {}", mesh.num_vertices());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriMesh> {
    let path = path.as_ref();
    let format = Format::from_path(path).ok_or_else(|| EngineError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })?;

    match format {
        Format::Obj => obj::load(path),
    }
}

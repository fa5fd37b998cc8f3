//! Error types for geolab.
//!
//! This module defines all error types used throughout the engine.

use thiserror::Error;

/// Result type alias using [`EngineError`].
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while loading a mesh or running a solver.
///
/// Numerical non-convergence is deliberately absent: a conjugate-gradient
/// solve that misses its tolerance or a shooting iteration that fails to
/// land on the target are reported through outcome flags and logged, and
/// the caller falls back to its documented alternative. Every solver
/// returns a well-formed result.
#[derive(Error, Debug)]
pub enum EngineError {
    /// File could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A start or end vertex id does not exist in the mesh.
    #[error("vertex index {index} out of range for mesh with {len} vertices")]
    InvalidIndex {
        /// The offending vertex id.
        index: usize,
        /// Number of vertices in the mesh.
        len: usize,
    },

    /// The mesh has no vertices.
    #[error("mesh has no vertices")]
    EmptyMesh,

    /// The mesh has no faces, but the requested solver needs triangles.
    #[error("mesh has no faces")]
    DegenerateTopology,

    /// The heat source vertex is not part of any non-degenerate triangle.
    #[error("source vertex {vertex} has zero lumped mass")]
    DegenerateSource {
        /// The source vertex id.
        vertex: usize,
    },

    /// No path exists between the requested vertices.
    #[error("no path between vertices {start} and {end}")]
    Unreachable {
        /// The start vertex id.
        start: usize,
        /// The end vertex id.
        end: usize,
    },

    /// The model file's extension does not name a supported format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension, or `(none)` when the path has none.
        extension: String,
    },

    /// The dispatcher could not choose a solver for this model.
    #[error(
        "no solver for model '{name}': expected plane, sphere, torus/donut, \
         saddle, or a triangulated mesh"
    )]
    Unsupported {
        /// Basename of the model file.
        name: String,
    },

    /// A result record could not be serialised.
    #[error("failed to serialise result: {0}")]
    Serialize(#[from] serde_json::Error),
}

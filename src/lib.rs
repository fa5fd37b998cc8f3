//! # Geolab
//!
//! A geodesic computation engine for triangle meshes.
//!
//! Given a mesh and two vertex ids, geolab returns one or more polylines
//! approximating the shortest path between them, using one of three
//! solver families:
//!
//! - **Dijkstra** over the mesh edge graph with Euclidean weights
//! - **Analytic / ODE geodesics** for recognised parametric surfaces
//!   (plane, sphere, torus, saddle), via RK4 integration of the geodesic
//!   equation and a shooting boundary-value solver
//! - **Heat method** geodesic distance on general triangle meshes
//!   (cotangent Laplacian, one backward-Euler diffusion step, Poisson
//!   recovery, greedy descent), with matrix-free conjugate-gradient
//!   solves
//!
//! ## Quick start
//!
//! ```
//! use geolab::algo::dijkstra::shortest_path;
//! use geolab::mesh::TriMesh;
//! use nalgebra::Point3;
//!
//! let mesh = TriMesh::from_triangles(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!         Point3::new(0.0, 0.0, 1.0),
//!     ],
//!     vec![[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]],
//! );
//!
//! let result = shortest_path(&mesh, 0, 3).unwrap();
//! assert_eq!(result.path, vec![0, 3]);
//! ```
//!
//! The `geolab` binary wires these solvers to an OBJ loader and a JSON
//! result writer; see [`engine`] for the dispatch rules.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod engine;
pub mod error;
pub mod io;
pub mod mesh;
pub mod report;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::algo::Curve;
    pub use crate::engine::{EngineReport, Mode};
    pub use crate::error::{EngineError, Result};
    pub use crate::mesh::{NormalizeTransform, TriMesh};
}

// Re-export nalgebra so downstream code can name the point types without
// pinning its own copy.
pub use nalgebra;

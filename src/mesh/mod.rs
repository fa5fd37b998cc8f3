//! Core mesh data structures.
//!
//! The engine works on a plain face-vertex representation: an ordered
//! vertex array (indices double as vertex ids, matching the OBJ `v`-line
//! order), a triangle array, and a per-vertex edge adjacency with
//! Euclidean weights. Solvers borrow these buffers and build whatever
//! auxiliary structures they need.
//!
//! # Construction
//!
//! Meshes usually come out of [`crate::io::obj::load`], but can be built
//! directly from face-vertex lists:
//!
//! ```
//! use geolab::mesh::TriMesh;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let mesh = TriMesh::from_triangles(vertices, faces);
//! assert_eq!(mesh.num_vertices(), 3);
//! assert_eq!(mesh.num_faces(), 1);
//! ```

mod normalize;
mod trimesh;

pub use normalize::NormalizeTransform;
pub use trimesh::{EdgeTo, TriMesh};

//! Geodesic solvers and their numerical support code.
//!
//! Three solver families are available:
//!
//! - [`dijkstra`]: shortest path over the mesh edge graph (exact on the
//!   graph, an upper bound on the surface geodesic)
//! - [`analytic`]: closed-form and ODE-based curves on recognised
//!   parametric surfaces (plane, sphere, torus, saddle)
//! - [`heat`]: heat-method geodesic distance on a general triangle mesh
//!   with greedy path recovery
//!
//! [`linear`] provides the matrix-free conjugate-gradient solver shared by
//! the heat pipeline, and [`surface`] the metric/Christoffel/RK4/shooting
//! machinery behind the ODE curves.

pub mod analytic;
pub mod dijkstra;
pub mod heat;
pub mod linear;
pub mod surface;

use nalgebra::Point3;

/// A polyline approximation of a geodesic.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    /// Solver-specific curve name (e.g. `sphere_great_circle`).
    pub name: String,
    /// Sum of chord lengths between consecutive points.
    pub length: f64,
    /// Ordered samples along the curve.
    pub points: Vec<Point3<f64>>,
}

impl Curve {
    /// Build a curve from sampled points, computing the chord-sum length.
    pub fn from_points(name: impl Into<String>, points: Vec<Point3<f64>>) -> Self {
        let length = chord_length(&points);
        Self {
            name: name.into(),
            length,
            points,
        }
    }

    /// Build a curve with an externally known length (closed-form cases
    /// where the analytic arc length is exact).
    pub fn with_length(name: impl Into<String>, length: f64, points: Vec<Point3<f64>>) -> Self {
        Self {
            name: name.into(),
            length,
            points,
        }
    }
}

/// Sum of chord lengths between consecutive points.
pub fn chord_length(points: &[Point3<f64>]) -> f64 {
    points
        .windows(2)
        .map(|w| (w[1] - w[0]).norm())
        .sum()
}

//! Recognised parametric surfaces and their parameter estimators.
//!
//! Torus and saddle parameters are inferred from the normalised vertex
//! cloud with closed-form averages; there is no fitting loop. Degenerate
//! or non-finite fits fall back to fixed defaults.

use nalgebra::Point3;

use super::ParametricSurface;
use crate::mesh::NormalizeTransform;

/// Torus of revolution around the z axis.
#[derive(Debug, Clone, Copy)]
pub struct Torus {
    /// Centre of the torus.
    pub center: Point3<f64>,
    /// Distance from the centre to the tube centre line (R).
    pub major_radius: f64,
    /// Tube radius (r).
    pub minor_radius: f64,
}

impl Torus {
    /// Estimate torus parameters from a vertex cloud.
    ///
    /// The centre is the bounding-box midpoint, `R` the mean cylindrical
    /// radius, and `r` the mean distance from the tube centre line.
    pub fn estimate(vertices: &[Point3<f64>]) -> Self {
        let center = NormalizeTransform::from_vertices(vertices).center;

        let mut sum_major = 0.0;
        let mut count_major = 0usize;
        for p in vertices {
            let rho = ((p.x - center.x).powi(2) + (p.y - center.y).powi(2)).sqrt();
            if rho.is_finite() {
                sum_major += rho;
                count_major += 1;
            }
        }
        let mut major_radius = if count_major > 0 {
            sum_major / count_major as f64
        } else {
            1.0
        };

        let mut sum_minor = 0.0;
        let mut count_minor = 0usize;
        for p in vertices {
            let rho = ((p.x - center.x).powi(2) + (p.y - center.y).powi(2)).sqrt();
            let dz = p.z - center.z;
            let tube = ((rho - major_radius).powi(2) + dz * dz).sqrt();
            if tube.is_finite() {
                sum_minor += tube;
                count_minor += 1;
            }
        }
        let mut minor_radius = if count_minor > 0 {
            sum_minor / count_minor as f64
        } else {
            0.25
        };

        if !major_radius.is_finite() || major_radius <= 1e-6 {
            major_radius = 1.0;
        }
        if !minor_radius.is_finite() || minor_radius <= 1e-6 {
            minor_radius = 0.25;
        }

        Self {
            center,
            major_radius,
            minor_radius,
        }
    }

    /// Angular parameters of a point: `u = atan2(y, x)`,
    /// `v = atan2(z, ρ − R)`.
    pub fn to_uv(&self, p: &Point3<f64>) -> (f64, f64) {
        let x = p.x - self.center.x;
        let y = p.y - self.center.y;
        let z = p.z - self.center.z;
        let rho = (x * x + y * y).sqrt();
        (y.atan2(x), z.atan2(rho - self.major_radius))
    }
}

impl ParametricSurface for Torus {
    fn eval(&self, u: f64, v: f64) -> Point3<f64> {
        let ring = self.major_radius + self.minor_radius * v.cos();
        Point3::new(
            self.center.x + ring * u.cos(),
            self.center.y + ring * u.sin(),
            self.center.z + self.minor_radius * v.sin(),
        )
    }
}

/// Saddle surface `z = a (x² − y²)` over the xy plane.
#[derive(Debug, Clone, Copy)]
pub struct Saddle {
    /// Centre of the fitted patch.
    pub center: Point3<f64>,
    /// Quadratic coefficient.
    pub a: f64,
}

impl Saddle {
    /// Fit `z = a (x² − y²)` in closed form:
    /// `a = Σ(x²−y²)·z / Σ(x²−y²)²` around the bounding-box midpoint.
    pub fn estimate(vertices: &[Point3<f64>]) -> Self {
        let center = NormalizeTransform::from_vertices(vertices).center;

        let mut num = 0.0;
        let mut den = 0.0;
        for p in vertices {
            let x = p.x - center.x;
            let y = p.y - center.y;
            let z = p.z - center.z;
            let txy = x * x - y * y;
            if txy.is_finite() && z.is_finite() {
                num += txy * z;
                den += txy * txy;
            }
        }
        let mut a = if den > 1e-12 { num / den } else { 0.5 };
        if !a.is_finite() {
            a = 0.5;
        }

        Self { center, a }
    }

    /// Planar parameters of a point relative to the patch centre.
    pub fn to_uv(&self, p: &Point3<f64>) -> (f64, f64) {
        (p.x - self.center.x, p.y - self.center.y)
    }
}

impl ParametricSurface for Saddle {
    fn eval(&self, u: f64, v: f64) -> Point3<f64> {
        Point3::new(
            self.center.x + u,
            self.center.y + v,
            self.center.z + self.a * (u * u - v * v),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    fn synthetic_torus(major: f64, minor: f64) -> Vec<Point3<f64>> {
        let torus = Torus {
            center: Point3::origin(),
            major_radius: major,
            minor_radius: minor,
        };
        let mut out = Vec::new();
        for i in 0..24 {
            for j in 0..12 {
                let u = TAU * i as f64 / 24.0;
                let v = TAU * j as f64 / 12.0;
                out.push(torus.eval(u, v));
            }
        }
        out
    }

    #[test]
    fn test_torus_estimate_recovers_radii() {
        let cloud = synthetic_torus(1.0, 0.25);
        let torus = Torus::estimate(&cloud);
        assert!((torus.major_radius - 1.0).abs() < 0.05);
        assert!((torus.minor_radius - 0.25).abs() < 0.05);
        assert!(torus.center.coords.norm() < 1e-9);
    }

    #[test]
    fn test_torus_uv_round_trip() {
        let torus = Torus {
            center: Point3::new(1.0, -2.0, 0.5),
            major_radius: 1.0,
            minor_radius: 0.25,
        };
        let p = torus.eval(0.7, -1.3);
        let (u, v) = torus.to_uv(&p);
        assert!((u - 0.7).abs() < 1e-9);
        assert!((v + 1.3).abs() < 1e-9);
    }

    #[test]
    fn test_torus_degenerate_cloud_falls_back() {
        let torus = Torus::estimate(&[Point3::origin(); 5]);
        assert_eq!(torus.major_radius, 1.0);
        assert_eq!(torus.minor_radius, 0.25);
    }

    #[test]
    fn test_saddle_estimate_recovers_coefficient() {
        let mut cloud = Vec::new();
        for i in -5..=5 {
            for j in -5..=5 {
                let x = i as f64 / 5.0;
                let y = j as f64 / 5.0;
                cloud.push(Point3::new(x, y, 0.8 * (x * x - y * y)));
            }
        }
        let saddle = Saddle::estimate(&cloud);
        assert!((saddle.a - 0.8).abs() < 0.05);
    }

    #[test]
    fn test_saddle_degenerate_cloud_falls_back() {
        let saddle = Saddle::estimate(&[Point3::origin(); 3]);
        assert_eq!(saddle.a, 0.5);
    }

    #[test]
    fn test_saddle_eval() {
        let saddle = Saddle {
            center: Point3::new(1.0, 2.0, 3.0),
            a: 0.5,
        };
        let p = saddle.eval(2.0, 1.0);
        assert_eq!(p, Point3::new(3.0, 3.0, 3.0 + 0.5 * 3.0));
    }
}

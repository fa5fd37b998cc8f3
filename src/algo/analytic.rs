//! Analytic geodesic curves on recognised surfaces.
//!
//! Plane and sphere have closed forms; torus and saddle go through the
//! shooting solver in [`crate::algo::surface`] and fall back to
//! parameter-space interpolation when shooting fails. All curves pin
//! their first and last sample to the exact endpoints they were asked
//! to connect.

use std::f64::consts::PI;

use nalgebra::{Point3, Vector3};

use super::surface::{integrate, solve_shooting, GeodesicState, ParametricSurface, Saddle, Torus};
use super::{chord_length, Curve};

/// Samples on a plane segment.
pub const PLANE_SAMPLES: usize = 64;

/// Samples on a great-circle arc.
pub const SPHERE_SAMPLES: usize = 128;

/// Samples on torus and saddle geodesics.
pub const SURFACE_SAMPLES: usize = 160;

/// Straight segment between two points.
///
/// The length is the exact Euclidean distance, not a chord sum.
pub fn plane_segment(p1: &Point3<f64>, p2: &Point3<f64>, samples: usize) -> Curve {
    let n = samples.max(2);
    let points = (0..n)
        .map(|i| {
            let t = i as f64 / (n - 1) as f64;
            Point3::from(p1.coords.lerp(&p2.coords, t))
        })
        .collect();
    Curve::with_length("plane_straight_line", (p2 - p1).norm(), points)
}

/// Great-circle arc between two points on a sphere centred at the origin.
///
/// The radius is the mean of the endpoint radii. Coincident directions
/// yield a constant curve of length zero; antipodal directions pick one
/// of the infinitely many great circles using a fixed orthogonal
/// reference ladder; everything else is spherical linear interpolation
/// with arc length `r·θ`.
pub fn great_circle(p1: &Point3<f64>, p2: &Point3<f64>, samples: usize) -> Curve {
    let n = samples.max(2);
    let r1 = p1.coords.norm();
    let r2 = p2.coords.norm();
    let r = if r1 > 1e-12 && r2 > 1e-12 {
        0.5 * (r1 + r2)
    } else {
        r1.max(r2)
    };
    let a = if r1 > 1e-12 {
        p1.coords / r1
    } else {
        Vector3::z()
    };
    let b = if r2 > 1e-12 {
        p2.coords / r2
    } else {
        Vector3::z()
    };

    let theta = a.dot(&b).clamp(-1.0, 1.0).acos();

    if theta <= 1e-8 {
        let mut curve =
            Curve::with_length("sphere_great_circle", 0.0, vec![Point3::from(a * r); n]);
        pin_endpoints(&mut curve.points, p1, p2);
        return curve;
    }

    let mut points = Vec::with_capacity(n);
    let length;
    if PI - theta <= 1e-5 {
        // Antipodal: rotate half a turn through a fixed perpendicular.
        let axis = orthogonal_to(&a);
        for i in 0..n {
            let ang = PI * i as f64 / (n - 1) as f64;
            points.push(Point3::from((a * ang.cos() + axis * ang.sin()) * r));
        }
        length = PI * r;
    } else {
        let sin_theta = theta.sin();
        for i in 0..n {
            let t = i as f64 / (n - 1) as f64;
            // Guard the SLERP weights when sin θ underflows just above
            // the coincident threshold.
            let dir = if sin_theta <= 1e-6 || !sin_theta.is_finite() {
                a.lerp(&b, t).normalize()
            } else {
                let w1 = (((1.0 - t) * theta).sin()) / sin_theta;
                let w2 = ((t * theta).sin()) / sin_theta;
                a * w1 + b * w2
            };
            points.push(Point3::from(dir * r));
        }
        length = r * theta;
    }

    pin_endpoints(&mut points, p1, p2);
    Curve::with_length("sphere_great_circle", length, points)
}

/// First unit vector orthogonal to `a` from the reference ladder
/// `(1,0,0)`, `(0,1,0)`, `(0,0,1)`.
fn orthogonal_to(a: &Vector3<f64>) -> Vector3<f64> {
    for reference in [Vector3::x(), Vector3::y(), Vector3::z()] {
        let c = a.cross(&reference);
        if c.norm() > 1e-8 {
            return c.normalize();
        }
    }
    // Unreachable for a unit vector; keep the curve well-formed anyway.
    Vector3::x()
}

/// Geodesic on an inferred torus between two surface points.
///
/// The target parameters are wrapped onto the branch nearest the start
/// so the shooting problem begins on the short way around.
pub fn torus_geodesic(
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    torus: &Torus,
    samples: usize,
) -> Curve {
    let (u1, v1) = torus.to_uv(p1);
    let (u2_raw, v2_raw) = torus.to_uv(p2);
    let u2 = wrap_near(u1, u2_raw);
    let v2 = wrap_near(v1, v2_raw);

    let points = shoot_curve(torus, (u1, v1), (u2, v2), samples, "torus");
    finish_surface_curve("torus_geodesic", points, p1, p2)
}

/// Geodesic on a fitted saddle between two surface points.
pub fn saddle_geodesic(
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    saddle: &Saddle,
    samples: usize,
) -> Curve {
    let uv1 = saddle.to_uv(p1);
    let uv2 = saddle.to_uv(p2);

    let points = shoot_curve(saddle, uv1, uv2, samples, "saddle");
    finish_surface_curve("saddle_geodesic", points, p1, p2)
}

/// Move `b` onto the representative nearest `a` modulo 2π.
fn wrap_near(a: f64, b: f64) -> f64 {
    let delta = b - a;
    a + (delta - (delta / (2.0 * PI)).round() * 2.0 * PI)
}

/// Shoot a geodesic between two parameter points and sample it.
///
/// Falls back to straight parameter-space interpolation when the
/// boundary-value solve does not converge.
fn shoot_curve<S: ParametricSurface>(
    surf: &S,
    start: (f64, f64),
    target: (f64, f64),
    samples: usize,
    label: &str,
) -> Vec<Point3<f64>> {
    let n = samples.max(2);
    let steps = n - 1;
    let outcome = solve_shooting(surf, start, target, steps);

    if outcome.converged {
        let s0 = GeodesicState {
            u: start.0,
            v: start.1,
            du: outcome.du0,
            dv: outcome.dv0,
        };
        integrate(surf, s0, steps)
            .iter()
            .map(|s| surf.eval(s.u, s.v))
            .collect()
    } else {
        tracing::debug!(surface = label, "shooting failed, sampling parameter line");
        (0..n)
            .map(|i| {
                let t = i as f64 / (n - 1) as f64;
                surf.eval(
                    start.0 + (target.0 - start.0) * t,
                    start.1 + (target.1 - start.1) * t,
                )
            })
            .collect()
    }
}

fn finish_surface_curve(
    name: &str,
    mut points: Vec<Point3<f64>>,
    p1: &Point3<f64>,
    p2: &Point3<f64>,
) -> Curve {
    pin_endpoints(&mut points, p1, p2);
    let length = chord_length(&points);
    Curve::with_length(name, length, points)
}

fn pin_endpoints(points: &mut [Point3<f64>], p1: &Point3<f64>, p2: &Point3<f64>) {
    if let Some(first) = points.first_mut() {
        *first = *p1;
    }
    if let Some(last) = points.last_mut() {
        *last = *p2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_plane_segment() {
        let p1 = Point3::new(0.0, 0.0, 0.0);
        let p2 = Point3::new(1.0, 1.0, 0.0);
        let c = plane_segment(&p1, &p2, PLANE_SAMPLES);

        assert_eq!(c.name, "plane_straight_line");
        assert_eq!(c.points.len(), 64);
        assert_eq!(c.points[0], p1);
        assert_eq!(*c.points.last().unwrap(), p2);
        assert!((c.length - 2.0_f64.sqrt()).abs() < 1e-15);
    }

    #[test]
    fn test_great_circle_quarter_arc() {
        let p1 = Point3::new(0.0, 0.0, 1.0);
        let p2 = Point3::new(1.0, 0.0, 0.0);
        let c = great_circle(&p1, &p2, SPHERE_SAMPLES);

        assert_eq!(c.name, "sphere_great_circle");
        assert_eq!(c.points.len(), 128);
        assert_eq!(c.points[0], p1);
        assert_eq!(*c.points.last().unwrap(), p2);
        assert!((c.length - FRAC_PI_2).abs() < 0.01 * FRAC_PI_2);

        // Every sample stays on the unit sphere and the middle of the arc
        // passes near (√2/2, 0, √2/2).
        for p in &c.points {
            assert!((p.coords.norm() - 1.0).abs() < 1e-9);
        }
        let mid = c.points[c.points.len() / 2];
        let target = Point3::new(1.0 / 2.0_f64.sqrt(), 0.0, 1.0 / 2.0_f64.sqrt());
        assert!((mid - target).norm() < 0.01);
    }

    #[test]
    fn test_great_circle_antipodal() {
        let p1 = Point3::new(0.0, 0.0, 1.0);
        let p2 = Point3::new(0.0, 0.0, -1.0);
        let c = great_circle(&p1, &p2, SPHERE_SAMPLES);

        assert!((c.length - PI).abs() < 0.01 * PI);
        for p in &c.points {
            assert!((p.coords.norm() - 1.0).abs() < 0.01);
        }
        assert_eq!(c.points[0], p1);
        assert_eq!(*c.points.last().unwrap(), p2);
    }

    #[test]
    fn test_great_circle_coincident() {
        let p = Point3::new(0.0, 1.0, 0.0);
        let c = great_circle(&p, &p, SPHERE_SAMPLES);
        assert_eq!(c.length, 0.0);
        assert_eq!(c.points.len(), 128);
        for q in &c.points {
            assert!((q - p).norm() < 1e-12);
        }
    }

    #[test]
    fn test_orthogonal_reference_ladder() {
        // x axis input must skip the parallel (1,0,0) reference.
        let u = orthogonal_to(&Vector3::x());
        assert!(u.dot(&Vector3::x()).abs() < 1e-12);
        assert!((u.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_wrap_near() {
        assert!((wrap_near(0.1, 2.0 * PI - 0.1) - (-0.1)).abs() < 1e-12);
        assert!((wrap_near(3.0, 3.2) - 3.2).abs() < 1e-12);
        assert!((wrap_near(-3.0, 3.1) - (-3.0 - (2.0 * PI - 6.1))).abs() < 1e-9);
    }

    #[test]
    fn test_torus_geodesic_pins_endpoints() {
        let torus = Torus {
            center: Point3::origin(),
            major_radius: 1.0,
            minor_radius: 0.25,
        };
        let p1 = torus.eval(0.0, 0.0);
        let p2 = torus.eval(1.2, 0.9);
        let c = torus_geodesic(&p1, &p2, &torus, SURFACE_SAMPLES);

        assert_eq!(c.name, "torus_geodesic");
        assert_eq!(c.points.len(), 160);
        assert_eq!(c.points[0], p1);
        assert_eq!(*c.points.last().unwrap(), p2);
        assert!(c.length > 0.0);
        // Chord sum never exceeds the recorded length by construction.
        assert!((chord_length(&c.points) - c.length).abs() < 1e-12);
    }

    #[test]
    fn test_saddle_geodesic_close_to_straight_when_flat() {
        let saddle = Saddle {
            center: Point3::origin(),
            a: 0.0,
        };
        let p1 = Point3::new(-0.5, -0.5, 0.0);
        let p2 = Point3::new(0.5, 0.5, 0.0);
        let c = saddle_geodesic(&p1, &p2, &saddle, SURFACE_SAMPLES);

        assert_eq!(c.points.len(), 160);
        assert_eq!(c.points[0], p1);
        assert_eq!(*c.points.last().unwrap(), p2);
        // A flat saddle degenerates to the plane case.
        assert!((c.length - (p2 - p1).norm()).abs() < 1e-3);
    }
}

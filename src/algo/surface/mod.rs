//! Parametric surface framework: metric, Christoffel symbols, RK4
//! geodesic integration, and a shooting boundary-value solver.
//!
//! A surface is anything that maps `(u, v)` parameters to a point in
//! 3-space with continuous first derivatives. The geodesic equation is
//! integrated numerically from finite-difference approximations of the
//! induced metric, so surfaces only have to provide [`eval`]
//! (`ParametricSurface::eval`) — no analytic derivatives required.

mod shapes;

pub use shapes::{Saddle, Torus};

use nalgebra::Point3;

/// Forward-difference step for metric and Christoffel evaluation.
const METRIC_STEP: f64 = 1e-4;

/// Finite-difference perturbation for the shooting Jacobian.
const SHOOTING_EPS: f64 = 1e-3;

/// Acceptance radius for the shooting end-point error in parameter space.
const SHOOTING_TOL: f64 = 1e-3;

/// Maximum Newton iterations for the shooting solver.
const SHOOTING_MAX_ITER: usize = 8;

/// A smooth mapping `r(u, v) → R³`.
pub trait ParametricSurface {
    /// Evaluate the surface at parameters `(u, v)`.
    fn eval(&self, u: f64, v: f64) -> Point3<f64>;
}

/// First fundamental form at a parameter point, with its explicit inverse.
#[derive(Debug, Clone, Copy)]
pub struct Metric2 {
    /// `⟨r_u, r_u⟩`
    pub g00: f64,
    /// `⟨r_u, r_v⟩`
    pub g01: f64,
    /// `⟨r_v, r_v⟩`
    pub g11: f64,
    /// Inverse metric entries; identity when the metric is singular.
    pub inv00: f64,
    /// See `inv00`.
    pub inv01: f64,
    /// See `inv00`.
    pub inv11: f64,
}

impl Default for Metric2 {
    fn default() -> Self {
        Self {
            g00: 1.0,
            g01: 0.0,
            g11: 1.0,
            inv00: 1.0,
            inv01: 0.0,
            inv11: 1.0,
        }
    }
}

/// Compute the metric tensor by forward differencing.
///
/// When `|det g|` falls below `1e-12` the identity inverse is kept so
/// integration can continue through parameterisation singularities.
pub fn metric<S: ParametricSurface + ?Sized>(surf: &S, u: f64, v: f64) -> Metric2 {
    let h = METRIC_STEP;
    let r = surf.eval(u, v);
    let ru = (surf.eval(u + h, v) - r) / h;
    let rv = (surf.eval(u, v + h) - r) / h;

    let mut m = Metric2 {
        g00: ru.dot(&ru),
        g01: ru.dot(&rv),
        g11: rv.dot(&rv),
        ..Metric2::default()
    };
    let det = m.g00 * m.g11 - m.g01 * m.g01;
    if det.abs() > 1e-12 {
        m.inv00 = m.g11 / det;
        m.inv01 = -m.g01 / det;
        m.inv11 = m.g00 / det;
    }
    m
}

/// Christoffel symbols of the second kind at a parameter point.
#[derive(Debug, Clone, Copy, Default)]
pub struct Christoffel2 {
    /// `Γ^u_{uu}`
    pub gu_uu: f64,
    /// `Γ^u_{uv}`
    pub gu_uv: f64,
    /// `Γ^u_{vv}`
    pub gu_vv: f64,
    /// `Γ^v_{uu}`
    pub gv_uu: f64,
    /// `Γ^v_{uv}`
    pub gv_uv: f64,
    /// `Γ^v_{vv}`
    pub gv_vv: f64,
}

/// Compute Christoffel symbols from first differences of the metric,
/// using `Γ^k_{ij} = ½ g^{kl} (∂_i g_{jl} + ∂_j g_{il} − ∂_l g_{ij})`.
pub fn christoffel<S: ParametricSurface + ?Sized>(surf: &S, u: f64, v: f64) -> Christoffel2 {
    let h = METRIC_STEP;
    let m = metric(surf, u, v);
    let mu = metric(surf, u + h, v);
    let mv = metric(surf, u, v + h);

    let g00_u = (mu.g00 - m.g00) / h;
    let g01_u = (mu.g01 - m.g01) / h;
    let g11_u = (mu.g11 - m.g11) / h;
    let g00_v = (mv.g00 - m.g00) / h;
    let g01_v = (mv.g01 - m.g01) / h;
    let g11_v = (mv.g11 - m.g11) / h;

    Christoffel2 {
        gu_uu: 0.5 * (m.inv00 * g00_u + m.inv01 * (2.0 * g01_u - g00_v)),
        gu_uv: 0.5 * (m.inv00 * g00_v + m.inv01 * g11_u),
        gu_vv: 0.5 * (m.inv00 * (2.0 * g01_v - g11_u) + m.inv01 * g11_v),
        gv_uu: 0.5 * (m.inv01 * g00_u + m.inv11 * (2.0 * g01_u - g00_v)),
        gv_uv: 0.5 * (m.inv01 * g00_v + m.inv11 * g11_u),
        gv_vv: 0.5 * (m.inv01 * (2.0 * g01_v - g11_u) + m.inv11 * g11_v),
    }
}

/// State of the geodesic ODE: parameter position and velocity.
#[derive(Debug, Clone, Copy)]
pub struct GeodesicState {
    /// Parameter `u`.
    pub u: f64,
    /// Parameter `v`.
    pub v: f64,
    /// Velocity `du/dt`.
    pub du: f64,
    /// Velocity `dv/dt`.
    pub dv: f64,
}

/// Right-hand side of the geodesic equation
/// `ẍ^k = −Γ^k_{ij} ẋ^i ẋ^j`.
fn geodesic_rhs<S: ParametricSurface + ?Sized>(surf: &S, s: &GeodesicState) -> GeodesicState {
    let c = christoffel(surf, s.u, s.v);
    GeodesicState {
        u: s.du,
        v: s.dv,
        du: -(c.gu_uu * s.du * s.du + 2.0 * c.gu_uv * s.du * s.dv + c.gu_vv * s.dv * s.dv),
        dv: -(c.gv_uu * s.du * s.du + 2.0 * c.gv_uv * s.du * s.dv + c.gv_vv * s.dv * s.dv),
    }
}

fn rk4_step<S: ParametricSurface + ?Sized>(
    surf: &S,
    s: &GeodesicState,
    h: f64,
) -> GeodesicState {
    let advance = |s: &GeodesicState, k: &GeodesicState, f: f64| GeodesicState {
        u: s.u + f * k.u,
        v: s.v + f * k.v,
        du: s.du + f * k.du,
        dv: s.dv + f * k.dv,
    };

    let k1 = geodesic_rhs(surf, s);
    let k2 = geodesic_rhs(surf, &advance(s, &k1, 0.5 * h));
    let k3 = geodesic_rhs(surf, &advance(s, &k2, 0.5 * h));
    let k4 = geodesic_rhs(surf, &advance(s, &k3, h));

    GeodesicState {
        u: s.u + (h / 6.0) * (k1.u + 2.0 * k2.u + 2.0 * k3.u + k4.u),
        v: s.v + (h / 6.0) * (k1.v + 2.0 * k2.v + 2.0 * k3.v + k4.v),
        du: s.du + (h / 6.0) * (k1.du + 2.0 * k2.du + 2.0 * k3.du + k4.du),
        dv: s.dv + (h / 6.0) * (k1.dv + 2.0 * k2.dv + 2.0 * k3.dv + k4.dv),
    }
}

/// Integrate the geodesic ODE for `steps` fixed RK4 steps of size
/// `1/steps`, so one unit of integration time spans the whole geodesic.
/// Returns `steps + 1` states including the start.
pub fn integrate<S: ParametricSurface + ?Sized>(
    surf: &S,
    start: GeodesicState,
    steps: usize,
) -> Vec<GeodesicState> {
    let steps = steps.max(1);
    let h = 1.0 / steps as f64;
    let mut out = Vec::with_capacity(steps + 1);
    let mut s = start;
    out.push(s);
    for _ in 0..steps {
        s = rk4_step(surf, &s, h);
        out.push(s);
    }
    out
}

/// Outcome of the shooting boundary-value solve.
#[derive(Debug, Clone, Copy)]
pub struct ShootingOutcome {
    /// Initial velocity `du/dt` that the iteration settled on.
    pub du0: f64,
    /// Initial velocity `dv/dt` that the iteration settled on.
    pub dv0: f64,
    /// Whether the end point landed within tolerance of the target.
    pub converged: bool,
}

/// Solve the two-point boundary problem by shooting.
///
/// Seeds the initial velocity with the parameter difference, then runs
/// Newton's method on the 2×2 Jacobian of the end position with respect
/// to the initial velocity (finite differences). Aborts on a singular
/// Jacobian. The caller is expected to fall back to parameter-space
/// interpolation when `converged` is false.
pub fn solve_shooting<S: ParametricSurface + ?Sized>(
    surf: &S,
    start: (f64, f64),
    target: (f64, f64),
    steps: usize,
) -> ShootingOutcome {
    let (u0, v0) = start;
    let (u1, v1) = target;
    let mut du0 = u1 - u0;
    let mut dv0 = v1 - v0;

    for _ in 0..SHOOTING_MAX_ITER {
        let end = shoot(surf, u0, v0, du0, dv0, steps);
        let err_u = end.u - u1;
        let err_v = end.v - v1;
        if (err_u * err_u + err_v * err_v).sqrt() < SHOOTING_TOL {
            return ShootingOutcome {
                du0,
                dv0,
                converged: true,
            };
        }

        let end_du = shoot(surf, u0, v0, du0 + SHOOTING_EPS, dv0, steps);
        let end_dv = shoot(surf, u0, v0, du0, dv0 + SHOOTING_EPS, steps);

        let a00 = (end_du.u - end.u) / SHOOTING_EPS;
        let a01 = (end_dv.u - end.u) / SHOOTING_EPS;
        let a10 = (end_du.v - end.v) / SHOOTING_EPS;
        let a11 = (end_dv.v - end.v) / SHOOTING_EPS;

        let det = a00 * a11 - a01 * a10;
        if det.abs() < 1e-10 {
            tracing::debug!(det, "shooting Jacobian singular, aborting");
            break;
        }

        du0 += (-err_u * a11 + err_v * a01) / det;
        dv0 += (err_u * a10 - err_v * a00) / det;
    }

    ShootingOutcome {
        du0,
        dv0,
        converged: false,
    }
}

fn shoot<S: ParametricSurface + ?Sized>(
    surf: &S,
    u0: f64,
    v0: f64,
    du0: f64,
    dv0: f64,
    steps: usize,
) -> GeodesicState {
    let start = GeodesicState {
        u: u0,
        v: v0,
        du: du0,
        dv: dv0,
    };
    integrate(surf, start, steps).pop().unwrap_or(start)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A flat plane through the origin; geodesics are straight lines.
    struct FlatPlane;

    impl ParametricSurface for FlatPlane {
        fn eval(&self, u: f64, v: f64) -> Point3<f64> {
            Point3::new(u, v, 0.0)
        }
    }

    #[test]
    fn test_flat_metric_is_identity() {
        let m = metric(&FlatPlane, 0.3, -0.7);
        assert!((m.g00 - 1.0).abs() < 1e-6);
        assert!(m.g01.abs() < 1e-6);
        assert!((m.g11 - 1.0).abs() < 1e-6);
        assert!((m.inv00 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_flat_christoffel_vanishes() {
        let c = christoffel(&FlatPlane, 0.1, 0.2);
        for g in [c.gu_uu, c.gu_uv, c.gu_vv, c.gv_uu, c.gv_uv, c.gv_vv] {
            assert!(g.abs() < 1e-6);
        }
    }

    #[test]
    fn test_flat_geodesic_is_straight() {
        let start = GeodesicState {
            u: 0.0,
            v: 0.0,
            du: 1.0,
            dv: 2.0,
        };
        let states = integrate(&FlatPlane, start, 32);
        assert_eq!(states.len(), 33);
        let end = states.last().unwrap();
        assert!((end.u - 1.0).abs() < 1e-6);
        assert!((end.v - 2.0).abs() < 1e-6);
        // Midpoint sits on the chord.
        let mid = states[16];
        assert!((mid.u - 0.5).abs() < 1e-6);
        assert!((mid.v - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_shooting_on_flat_plane_converges_immediately() {
        let out = solve_shooting(&FlatPlane, (0.0, 0.0), (1.0, -0.5), 32);
        assert!(out.converged);
        assert!((out.du0 - 1.0).abs() < 1e-3);
        assert!((out.dv0 + 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_shooting_on_curved_surface() {
        let torus = Torus {
            center: Point3::origin(),
            major_radius: 1.0,
            minor_radius: 0.25,
        };
        let out = solve_shooting(&torus, (0.0, 0.0), (1.0, 0.8), 159);
        assert!(out.converged);
        let end = shoot(&torus, 0.0, 0.0, out.du0, out.dv0, 159);
        let err = ((end.u - 1.0).powi(2) + (end.v - 0.8).powi(2)).sqrt();
        assert!(err < 1e-3);
    }
}

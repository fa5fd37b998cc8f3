//! Heat-method geodesics (Crane et al. 2013) with path recovery.
//!
//! One backward-Euler heat diffusion step from the source, a normalised
//! negative gradient field, and a Poisson solve give a smooth geodesic
//! distance field; a greedy descent from the target through that field
//! recovers a vertex polyline. Both linear systems are solved matrix-free
//! with conjugate gradient, and non-convergence is tolerated: the walk
//! falls back to Dijkstra on the same neighbour graph if the field is not
//! descendable.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use nalgebra::{Point3, Vector3};

use super::linear::{conjugate_gradient, CgOutcome};
use crate::error::{EngineError, Result};

/// Options for the heat-method solve.
#[derive(Debug, Clone)]
pub struct HeatMethodOptions {
    /// Maximum CG iterations for the heat diffusion system.
    pub heat_max_iterations: usize,
    /// Maximum CG iterations for the Poisson system.
    pub poisson_max_iterations: usize,
    /// Absolute residual tolerance for both CG solves.
    pub cg_tolerance: f64,
}

impl Default for HeatMethodOptions {
    fn default() -> Self {
        Self {
            heat_max_iterations: 600,
            poisson_max_iterations: 1000,
            cg_tolerance: 1e-6,
        }
    }
}

impl HeatMethodOptions {
    /// Set the heat-system iteration cap.
    pub fn with_heat_max_iterations(mut self, max_iter: usize) -> Self {
        self.heat_max_iterations = max_iter;
        self
    }

    /// Set the Poisson-system iteration cap.
    pub fn with_poisson_max_iterations(mut self, max_iter: usize) -> Self {
        self.poisson_max_iterations = max_iter;
        self
    }

    /// Set the CG residual tolerance.
    pub fn with_cg_tolerance(mut self, tol: f64) -> Self {
        self.cg_tolerance = tol;
        self
    }
}

/// Cotangent of the angle at `a` in triangle `(a, b, c)`.
fn cotangent(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> f64 {
    let u = b - a;
    let v = c - a;
    let denom = u.cross(&v).norm();
    if denom <= 1e-12 {
        0.0
    } else {
        u.dot(&v) / denom
    }
}

/// Lumped mass, cotangent weights, and edge statistics for one mesh.
struct Operators {
    mass: Vec<f64>,
    /// Per-vertex `(neighbour, weight)` pairs, sorted by neighbour id.
    weights: Vec<Vec<(usize, f64)>>,
    /// Per-vertex neighbour ids (the keys of `weights`).
    neighbors: Vec<Vec<usize>>,
    /// Mean edge length over triangle-edge incidences.
    mean_edge: f64,
}

fn assemble(vertices: &[Point3<f64>], faces: &[[usize; 3]]) -> Operators {
    let n = vertices.len();
    let mut mass = vec![0.0; n];
    let mut weight_maps: Vec<HashMap<usize, f64>> = vec![HashMap::new(); n];
    let mut edge_sum = 0.0;
    let mut edge_count = 0usize;

    for face in faces {
        let [i, j, k] = *face;
        if i >= n || j >= n || k >= n {
            continue;
        }
        let (pi, pj, pk) = (vertices[i], vertices[j], vertices[k]);

        let area = 0.5 * (pj - pi).cross(&(pk - pi)).norm();
        if !area.is_finite() || area <= 1e-12 {
            continue;
        }
        mass[i] += area / 3.0;
        mass[j] += area / 3.0;
        mass[k] += area / 3.0;

        let cot_i = cotangent(&pi, &pj, &pk);
        let cot_j = cotangent(&pj, &pk, &pi);
        let cot_k = cotangent(&pk, &pi, &pj);

        for (a, b, w) in [
            (i, j, 0.5 * cot_k),
            (j, k, 0.5 * cot_i),
            (k, i, 0.5 * cot_j),
        ] {
            *weight_maps[a].entry(b).or_insert(0.0) += w;
            *weight_maps[b].entry(a).or_insert(0.0) += w;
        }

        edge_sum += (pi - pj).norm() + (pj - pk).norm() + (pk - pi).norm();
        edge_count += 3;
    }

    // Flatten to sorted pair lists so applications and walks are
    // deterministic regardless of hash order.
    let mut weights = Vec::with_capacity(n);
    let mut neighbors = Vec::with_capacity(n);
    for map in weight_maps {
        let mut pairs: Vec<(usize, f64)> = map.into_iter().collect();
        pairs.sort_by_key(|&(nb, _)| nb);
        neighbors.push(pairs.iter().map(|&(nb, _)| nb).collect());
        weights.push(pairs);
    }

    let mean_edge = if edge_count > 0 {
        edge_sum / edge_count as f64
    } else {
        1.0
    };

    Operators {
        mass,
        weights,
        neighbors,
        mean_edge,
    }
}

/// `(Lx)_i = Σ_j w_ij (x_i − x_j)`
fn apply_laplacian(weights: &[Vec<(usize, f64)>], x: &[f64], out: &mut [f64]) {
    for (i, row) in weights.iter().enumerate() {
        let mut sum = 0.0;
        for &(j, w) in row {
            sum += w * (x[i] - x[j]);
        }
        out[i] = sum;
    }
}

/// Geodesic distance field from `start` over the normalised mesh.
///
/// Returns the per-vertex field `φ` (shifted so `min φ = 0`) together
/// with the assembled operators, for callers that need the neighbour
/// graph afterwards.
fn distance_field(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
    start: usize,
    options: &HeatMethodOptions,
) -> Result<(Vec<f64>, Operators)> {
    let n = vertices.len();
    let ops = assemble(vertices, faces);

    if ops.mass[start] <= 1e-12 {
        return Err(EngineError::DegenerateSource { vertex: start });
    }

    // Backward-Euler heat step: (M − tL) u = b, b = m_start δ_start.
    let t = ops.mean_edge * ops.mean_edge;
    let mut b = vec![0.0; n];
    b[start] = ops.mass[start];

    let heat = |x: &[f64], out: &mut [f64]| {
        apply_laplacian(&ops.weights, x, out);
        for i in 0..n {
            out[i] = ops.mass[i] * x[i] - t * out[i];
        }
    };
    let CgOutcome {
        x: u,
        converged,
        iterations,
        residual,
    } = conjugate_gradient(heat, &b, options.heat_max_iterations, options.cg_tolerance);
    if !converged {
        tracing::warn!(iterations, residual, "heat diffusion solve did not converge");
    }

    // Integrated divergence of the normalised negative heat gradient.
    let mut div = vec![0.0; n];
    for face in faces {
        let [i, j, k] = *face;
        if i >= n || j >= n || k >= n {
            continue;
        }
        let (pi, pj, pk) = (vertices[i], vertices[j], vertices[k]);

        let normal = (pj - pi).cross(&(pk - pi));
        let double_area = normal.norm();
        if double_area <= 1e-12 {
            continue;
        }
        let unit_normal = normal / double_area;

        // Gradient of the PL interpolant of u on this triangle.
        let grad = (unit_normal.cross(&(pk - pj)) * u[i]
            + unit_normal.cross(&(pi - pk)) * u[j]
            + unit_normal.cross(&(pj - pi)) * u[k])
            / double_area;
        let grad_norm = grad.norm();
        if grad_norm <= 1e-12 {
            continue;
        }
        let x_field: Vector3<f64> = -grad / grad_norm;

        let cot_i = cotangent(&pi, &pj, &pk);
        let cot_j = cotangent(&pj, &pk, &pi);
        let cot_k = cotangent(&pk, &pi, &pj);

        div[i] += 0.5 * (cot_j * (pk - pi).dot(&x_field) + cot_k * (pj - pi).dot(&x_field));
        div[j] += 0.5 * (cot_k * (pi - pj).dot(&x_field) + cot_i * (pk - pj).dot(&x_field));
        div[k] += 0.5 * (cot_i * (pj - pk).dot(&x_field) + cot_j * (pi - pk).dot(&x_field));
    }

    // Poisson solve L φ = div with the source row pinned to φ_start = 0.
    let mut rhs = div;
    rhs[start] = 0.0;
    let poisson = |x: &[f64], out: &mut [f64]| {
        apply_laplacian(&ops.weights, x, out);
        out[start] = x[start];
    };
    let CgOutcome {
        x: mut phi,
        converged,
        iterations,
        residual,
    } = conjugate_gradient(
        poisson,
        &rhs,
        options.poisson_max_iterations,
        options.cg_tolerance,
    );
    if !converged {
        tracing::warn!(iterations, residual, "poisson solve did not converge");
    }

    let min_phi = phi.iter().cloned().fold(f64::INFINITY, f64::min);
    if min_phi.is_finite() {
        for p in &mut phi {
            *p -= min_phi;
        }
    }

    Ok((phi, ops))
}

/// Recover a start→end vertex path through the heat distance field.
///
/// Inputs are the normalised vertex buffer and the triangle array. The
/// walk descends `φ` greedily from `end`; when it stalls it may take one
/// step to an unvisited neighbour within a plateau tolerance, and when it
/// fails outright the path is recomputed with Dijkstra on the cotangent
/// neighbour graph.
///
/// # Errors
///
/// [`EngineError::EmptyMesh`], [`EngineError::InvalidIndex`],
/// [`EngineError::DegenerateTopology`] on malformed input,
/// [`EngineError::DegenerateSource`] when the source has no incident
/// non-degenerate triangle, and [`EngineError::Unreachable`] when start
/// and end lie in different components.
pub fn heat_path(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
    start: usize,
    end: usize,
    options: &HeatMethodOptions,
) -> Result<Vec<usize>> {
    let n = vertices.len();
    if n == 0 {
        return Err(EngineError::EmptyMesh);
    }
    for index in [start, end] {
        if index >= n {
            return Err(EngineError::InvalidIndex { index, len: n });
        }
    }
    if faces.is_empty() {
        return Err(EngineError::DegenerateTopology);
    }

    let (phi, ops) = distance_field(vertices, faces, start, options)?;

    // Greedy descent from the target towards the source.
    let mut path = vec![end];
    let mut visited = vec![false; n];
    let mut current = end;
    visited[current] = true;

    for _ in 0..n * 3 {
        if current == start {
            break;
        }
        let mut best = None;
        let mut best_val = phi[current];
        for &nb in &ops.neighbors[current] {
            if phi[nb] + 1e-9 < best_val {
                best_val = phi[nb];
                best = Some(nb);
            }
        }
        if best.is_none() {
            // Allow one non-descending move to escape a plateau.
            for &nb in &ops.neighbors[current] {
                if !visited[nb] && phi[nb] < best_val + 1e-6 {
                    best_val = phi[nb];
                    best = Some(nb);
                }
            }
        }
        let Some(next) = best else { break };
        path.push(next);
        current = next;
        visited[current] = true;
    }

    if current != start {
        tracing::warn!(start, end, "greedy descent stalled, falling back to Dijkstra");
        path = graph_fallback(vertices, &ops.neighbors, start, end)?;
    } else {
        path.reverse();
    }

    Ok(path)
}

/// Dijkstra over the cotangent neighbour graph with Euclidean weights.
/// Returns the path ordered start→end.
fn graph_fallback(
    vertices: &[Point3<f64>],
    neighbors: &[Vec<usize>],
    start: usize,
    end: usize,
) -> Result<Vec<usize>> {
    #[derive(PartialEq)]
    struct Node(f64, usize);
    impl Eq for Node {}
    impl PartialOrd for Node {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }
    impl Ord for Node {
        fn cmp(&self, other: &Self) -> Ordering {
            other.0.partial_cmp(&self.0).unwrap_or(Ordering::Equal)
        }
    }

    let n = vertices.len();
    let mut dist = vec![f64::INFINITY; n];
    let mut parent: Vec<Option<usize>> = vec![None; n];
    let mut heap = BinaryHeap::new();
    dist[start] = 0.0;
    heap.push(Node(0.0, start));

    while let Some(Node(d, u)) = heap.pop() {
        if d > dist[u] {
            continue;
        }
        if u == end {
            break;
        }
        for &nb in &neighbors[u] {
            let w = (vertices[nb] - vertices[u]).norm();
            if dist[u] + w < dist[nb] {
                dist[nb] = dist[u] + w;
                parent[nb] = Some(u);
                heap.push(Node(dist[nb], nb));
            }
        }
    }

    if parent[end].is_none() && start != end {
        return Err(EngineError::Unreachable { start, end });
    }

    let mut path = vec![end];
    let mut current = end;
    while let Some(p) = parent[current] {
        current = p;
        path.push(current);
    }
    path.reverse();
    Ok(path)
}

//! Single-pair shortest path over the mesh edge graph.
//!
//! Classical Dijkstra with a binary min-heap, Euclidean edge weights in
//! input coordinates, and early termination once the target pops. The
//! resulting polyline is an upper bound on the true surface geodesic.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{EngineError, Result};
use crate::mesh::TriMesh;

/// Result of a single-pair Dijkstra run.
#[derive(Debug, Clone)]
pub struct DijkstraResult {
    /// Shortest distance from start to end; `None` when unreachable.
    pub total_distance: Option<f64>,
    /// Whether a path from start to end exists.
    pub reachable: bool,
    /// Vertex ids from start to end; empty when unreachable.
    pub path: Vec<usize>,
    /// Tentative distance per vertex id; `f64::INFINITY` marks vertices
    /// that were never reached before termination.
    pub all_distances: Vec<f64>,
}

/// Entry in the priority queue.
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    vertex: usize,
    distance: f64,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behaviour on a max-heap.
        other
            .distance
            .partial_cmp(&self.distance)
            .unwrap_or(Ordering::Equal)
    }
}

/// Compute the shortest edge-graph path between two vertices.
///
/// # Errors
///
/// [`EngineError::EmptyMesh`] when the mesh has no vertices,
/// [`EngineError::InvalidIndex`] when either id is out of range.
///
/// # Example
///
/// ```
/// use geolab::algo::dijkstra::shortest_path;
/// use geolab::mesh::TriMesh;
/// use nalgebra::Point3;
///
/// let mesh = TriMesh::from_triangles(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///     ],
///     vec![[0, 1, 2]],
/// );
/// let result = shortest_path(&mesh, 0, 1).unwrap();
/// assert_eq!(result.path, vec![0, 1]);
/// assert_eq!(result.total_distance, Some(1.0));
/// ```
pub fn shortest_path(mesh: &TriMesh, start: usize, end: usize) -> Result<DijkstraResult> {
    let n = mesh.num_vertices();
    if n == 0 {
        return Err(EngineError::EmptyMesh);
    }
    for index in [start, end] {
        if index >= n {
            return Err(EngineError::InvalidIndex { index, len: n });
        }
    }

    let mut dist = vec![f64::INFINITY; n];
    let mut parent: Vec<Option<usize>> = vec![None; n];
    let mut heap = BinaryHeap::new();

    dist[start] = 0.0;
    heap.push(QueueEntry {
        vertex: start,
        distance: 0.0,
    });

    while let Some(entry) = heap.pop() {
        let u = entry.vertex;
        if u == end {
            break;
        }
        // Stale entry: a shorter path to u was already settled.
        if entry.distance > dist[u] {
            continue;
        }
        for edge in mesh.neighbors(u) {
            let candidate = dist[u] + edge.weight;
            if candidate < dist[edge.target] {
                dist[edge.target] = candidate;
                parent[edge.target] = Some(u);
                heap.push(QueueEntry {
                    vertex: edge.target,
                    distance: candidate,
                });
            }
        }
    }

    let reachable = start == end || parent[end].is_some();
    let mut path = Vec::new();
    if reachable {
        let mut current = end;
        path.push(current);
        while let Some(p) = parent[current] {
            current = p;
            path.push(current);
        }
        path.reverse();
    }

    let total_distance = if reachable { Some(dist[end]) } else { None };
    Ok(DijkstraResult {
        total_distance,
        reachable,
        path,
        all_distances: dist,
    })
}

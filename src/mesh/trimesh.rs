//! Face-vertex triangle mesh with an edge adjacency graph.

use nalgebra::Point3;

/// One entry in a vertex's adjacency list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeTo {
    /// Index of the neighbouring vertex.
    pub target: usize,
    /// Euclidean length of the edge in input coordinates.
    pub weight: f64,
}

/// Immutable triangle mesh: vertex array, triangle array, edge adjacency.
///
/// Vertex indices are the vertex ids used throughout the engine; external
/// consumers depend on them matching the OBJ `v`-line order. The adjacency
/// keeps one undirected entry per triangle edge, so an edge shared by two
/// triangles appears twice. Shortest-path solvers treat the duplicates as
/// parallel edges with identical weight.
#[derive(Debug, Clone, Default)]
pub struct TriMesh {
    vertices: Vec<Point3<f64>>,
    faces: Vec<[usize; 3]>,
    adjacency: Vec<Vec<EdgeTo>>,
    num_edges: usize,
}

impl TriMesh {
    /// Build a mesh from vertex positions and triangle faces.
    ///
    /// Triangles that reference a missing vertex or repeat a vertex index
    /// are dropped silently; they would contribute zero-length or dangling
    /// edges to the adjacency.
    pub fn from_triangles(vertices: Vec<Point3<f64>>, faces: Vec<[usize; 3]>) -> Self {
        let n = vertices.len();
        let mut kept = Vec::with_capacity(faces.len());
        let mut adjacency = vec![Vec::new(); n];
        let mut num_edges = 0;

        for face in faces {
            let [a, b, c] = face;
            if a >= n || b >= n || c >= n {
                tracing::debug!(?face, "dropping face with out-of-range vertex");
                continue;
            }
            if a == b || b == c || c == a {
                tracing::debug!(?face, "dropping face with repeated vertex");
                continue;
            }
            for (u, v) in [(a, b), (b, c), (c, a)] {
                let weight = (vertices[v] - vertices[u]).norm();
                adjacency[u].push(EdgeTo { target: v, weight });
                adjacency[v].push(EdgeTo { target: u, weight });
                num_edges += 1;
            }
            kept.push(face);
        }

        Self {
            vertices,
            faces: kept,
            adjacency,
            num_edges,
        }
    }

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Number of undirected edge insertions (duplicates from shared edges
    /// counted per inserting triangle).
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// True if the mesh has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Position of vertex `v`.
    ///
    /// # Panics
    /// Panics if `v` is out of range.
    #[inline]
    pub fn position(&self, v: usize) -> Point3<f64> {
        self.vertices[v]
    }

    /// All vertex positions in id order.
    #[inline]
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// All triangles in insertion order.
    #[inline]
    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    /// Adjacency list of vertex `v`.
    ///
    /// # Panics
    /// Panics if `v` is out of range.
    #[inline]
    pub fn neighbors(&self, v: usize) -> &[EdgeTo] {
        &self.adjacency[v]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_tetrahedron() -> TriMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let faces = vec![[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];
        TriMesh::from_triangles(vertices, faces)
    }

    #[test]
    fn test_counts() {
        let mesh = unit_tetrahedron();
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 4);
        // Four triangles insert three edges each.
        assert_eq!(mesh.num_edges(), 12);
    }

    #[test]
    fn test_shared_edge_appears_per_triangle() {
        let mesh = unit_tetrahedron();
        // Edge (0, 1) is shared by faces (0,1,2) and (0,1,3), so vertex 0's
        // adjacency carries two parallel entries pointing at vertex 1.
        let to_one = mesh
            .neighbors(0)
            .iter()
            .filter(|e| e.target == 1)
            .count();
        assert_eq!(to_one, 2);
    }

    #[test]
    fn test_edge_weights_are_euclidean() {
        let mesh = unit_tetrahedron();
        for e in mesh.neighbors(1) {
            let expected = (mesh.position(e.target) - mesh.position(1)).norm();
            assert!((e.weight - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_degenerate_faces_dropped() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let faces = vec![[0, 0, 1], [0, 1, 7], [0, 1, 2]];
        let mesh = TriMesh::from_triangles(vertices, faces);
        assert_eq!(mesh.num_faces(), 1);
        assert_eq!(mesh.faces()[0], [0, 1, 2]);
        assert_eq!(mesh.num_edges(), 3);
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = TriMesh::from_triangles(Vec::new(), Vec::new());
        assert!(mesh.is_empty());
        assert_eq!(mesh.num_edges(), 0);
    }
}

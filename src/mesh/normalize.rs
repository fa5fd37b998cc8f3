//! Centre/scale normalisation of a vertex cloud.

use nalgebra::Point3;

/// Transform that recentres a mesh on the origin and scales its largest
/// bounding-box extent to 2.
///
/// The analytic and heat solvers run in this normalised frame; reported
/// lengths are rescaled back to input units through [`length_scale`]
/// (`NormalizeTransform::length_scale`), and reported points through
/// [`invert`](NormalizeTransform::invert).
#[derive(Debug, Clone, Copy)]
pub struct NormalizeTransform {
    /// Midpoint of the axis-aligned bounding box.
    pub center: Point3<f64>,
    /// Uniform scale factor, `2 / max_extent` (1 for degenerate meshes).
    pub scale: f64,
}

impl Default for NormalizeTransform {
    fn default() -> Self {
        Self {
            center: Point3::origin(),
            scale: 1.0,
        }
    }
}

impl NormalizeTransform {
    /// Compute the transform for a vertex cloud.
    ///
    /// Non-finite coordinates are ignored per component when computing the
    /// bounding box. An empty or degenerate cloud yields the identity-like
    /// default (`centre = origin`, `scale = 1`).
    pub fn from_vertices(vertices: &[Point3<f64>]) -> Self {
        let mut min = [f64::INFINITY; 3];
        let mut max = [f64::NEG_INFINITY; 3];
        for v in vertices {
            for axis in 0..3 {
                let c = v[axis];
                if c.is_finite() {
                    min[axis] = min[axis].min(c);
                    max[axis] = max[axis].max(c);
                }
            }
        }
        if min.iter().any(|m| !m.is_finite()) || max.iter().any(|m| !m.is_finite()) {
            return Self::default();
        }

        let center = Point3::new(
            0.5 * (min[0] + max[0]),
            0.5 * (min[1] + max[1]),
            0.5 * (min[2] + max[2]),
        );
        let extent = (max[0] - min[0]).max(max[1] - min[1]).max(max[2] - min[2]);
        let scale = if extent > 1e-12 { 2.0 / extent } else { 1.0 };
        Self { center, scale }
    }

    /// Map a point into the normalised frame.
    #[inline]
    pub fn apply(&self, p: &Point3<f64>) -> Point3<f64> {
        Point3::from((p - self.center) * self.scale)
    }

    /// Map a normalised point back into the input frame.
    #[inline]
    pub fn invert(&self, p: &Point3<f64>) -> Point3<f64> {
        self.center + p.coords / self.scale
    }

    /// Factor that converts normalised-frame lengths to input units.
    #[inline]
    pub fn length_scale(&self) -> f64 {
        if self.scale > 1e-12 {
            1.0 / self.scale
        } else {
            1.0
        }
    }

    /// Normalise a whole vertex buffer.
    pub fn apply_all(&self, vertices: &[Point3<f64>]) -> Vec<Point3<f64>> {
        vertices.iter().map(|v| self.apply(v)).collect()
    }
}

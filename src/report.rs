//! Result records and their JSON serialisation.
//!
//! Two schemas leave the engine: the Dijkstra record and the
//! analytics/heat record. Field names are camelCase to match the
//! consumers on the visualiser side. `totalDistance` serialises as
//! `null` when the target is unreachable; `allDistances` carries a large
//! finite sentinel instead, which downstream code treats as unreachable
//! when it exceeds half of `f64::MAX`.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use nalgebra::Point3;
use serde::Serialize;

use crate::algo::dijkstra::DijkstraResult;
use crate::algo::Curve;
use crate::error::Result;

/// Surface family a request resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceType {
    /// Flat plane, closed-form segment.
    Plane,
    /// Sphere, great-circle arc.
    Sphere,
    /// Torus of revolution, shot geodesic.
    Torus,
    /// Saddle `z = a(x² − y²)`, shot geodesic.
    Saddle,
    /// General triangle mesh, heat method.
    Mesh,
    /// No solver available.
    Unsupported,
}

impl SurfaceType {
    /// Lowercase wire name, identical to the serialised form.
    pub fn as_str(&self) -> &'static str {
        match self {
            SurfaceType::Plane => "plane",
            SurfaceType::Sphere => "sphere",
            SurfaceType::Torus => "torus",
            SurfaceType::Saddle => "saddle",
            SurfaceType::Mesh => "mesh",
            SurfaceType::Unsupported => "unsupported",
        }
    }
}

impl std::fmt::Display for SurfaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialisable Dijkstra record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DijkstraReport {
    /// The model path as given on the command line.
    pub input_file_name: String,
    /// Whether the target is reachable from the source.
    pub reachable: bool,
    /// Shortest distance, absent when unreachable.
    pub total_distance: Option<f64>,
    /// Vertex ids from start to end.
    pub path: Vec<usize>,
    /// Distance per vertex; unreachable vertices carry the sentinel.
    pub all_distances: Vec<f64>,
}

impl DijkstraReport {
    /// Build a report from a solver result, replacing non-finite
    /// distances with the large finite sentinel.
    pub fn new(input_file_name: impl Into<String>, result: &DijkstraResult) -> Self {
        let all_distances = result
            .all_distances
            .iter()
            .map(|&d| if d.is_finite() { d } else { f64::MAX })
            .collect();
        Self {
            input_file_name: input_file_name.into(),
            reachable: result.reachable,
            total_distance: result.total_distance.filter(|d| d.is_finite()),
            path: result.path.clone(),
            all_distances,
        }
    }
}

/// One curve of an analytics/heat record.
#[derive(Debug, Clone, Serialize)]
pub struct CurveReport {
    /// Solver-specific curve name.
    pub name: String,
    /// Curve length in input units.
    pub length: f64,
    /// Sampled points as `[x, y, z]` triples.
    pub points: Vec<[f64; 3]>,
}

impl From<&Curve> for CurveReport {
    fn from(curve: &Curve) -> Self {
        Self {
            name: curve.name.clone(),
            length: curve.length,
            points: curve
                .points
                .iter()
                .map(|p: &Point3<f64>| [p.x, p.y, p.z])
                .collect(),
        }
    }
}

/// Serialisable analytics/heat record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    /// The model path as given on the command line.
    pub input_file_name: String,
    /// Source vertex id.
    pub start_id: usize,
    /// Target vertex id.
    pub end_id: usize,
    /// Surface family the dispatcher resolved to.
    pub surface_type: SurfaceType,
    /// Empty on success; the failure description otherwise.
    pub error: String,
    /// Geodesic curves; non-empty exactly when `error` is empty.
    pub curves: Vec<CurveReport>,
}

impl AnalyticsReport {
    /// Successful record with one or more curves.
    pub fn success(
        input_file_name: impl Into<String>,
        start_id: usize,
        end_id: usize,
        surface_type: SurfaceType,
        curves: Vec<CurveReport>,
    ) -> Self {
        Self {
            input_file_name: input_file_name.into(),
            start_id,
            end_id,
            surface_type,
            error: String::new(),
            curves,
        }
    }

    /// Failed record carrying an error description and no curves.
    pub fn failure(
        input_file_name: impl Into<String>,
        start_id: usize,
        end_id: usize,
        surface_type: SurfaceType,
        error: impl Into<String>,
    ) -> Self {
        Self {
            input_file_name: input_file_name.into(),
            start_id,
            end_id,
            surface_type,
            error: error.into(),
            curves: Vec::new(),
        }
    }
}

/// Write a record as compact JSON.
pub fn write_json<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer(BufWriter::new(file), record)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dijkstra_report_field_names() {
        let result = DijkstraResult {
            total_distance: Some(1.5),
            reachable: true,
            path: vec![0, 2],
            all_distances: vec![0.0, f64::INFINITY, 1.5],
        };
        let report = DijkstraReport::new("models/test.obj", &result);
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["inputFileName"], "models/test.obj");
        assert_eq!(value["reachable"], true);
        assert_eq!(value["totalDistance"], 1.5);
        assert_eq!(value["path"], serde_json::json!([0, 2]));
        assert_eq!(value["allDistances"][0], 0.0);
        // Unreachable entries are serialised as a large finite number.
        assert_eq!(value["allDistances"][1], f64::MAX);
    }

    #[test]
    fn test_unreachable_total_distance_is_null() {
        let result = DijkstraResult {
            total_distance: None,
            reachable: false,
            path: Vec::new(),
            all_distances: vec![0.0, f64::INFINITY],
        };
        let report = DijkstraReport::new("m.obj", &result);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"totalDistance\":null"));
        assert!(json.contains("\"path\":[]"));
    }

    #[test]
    fn test_analytics_report_shape() {
        let curve = Curve::with_length(
            "plane_straight_line",
            1.0,
            vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)],
        );
        let report = AnalyticsReport::success(
            "plane.obj",
            0,
            1,
            SurfaceType::Plane,
            vec![CurveReport::from(&curve)],
        );
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["surfaceType"], "plane");
        assert_eq!(value["error"], "");
        assert_eq!(value["curves"][0]["name"], "plane_straight_line");
        assert_eq!(value["curves"][0]["length"], 1.0);
        assert_eq!(value["curves"][0]["points"][1], serde_json::json!([1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_surface_type_names() {
        for (ty, name) in [
            (SurfaceType::Plane, "\"plane\""),
            (SurfaceType::Sphere, "\"sphere\""),
            (SurfaceType::Torus, "\"torus\""),
            (SurfaceType::Saddle, "\"saddle\""),
            (SurfaceType::Mesh, "\"mesh\""),
            (SurfaceType::Unsupported, "\"unsupported\""),
        ] {
            assert_eq!(serde_json::to_string(&ty).unwrap(), name);
        }
    }

    #[test]
    fn test_string_escaping() {
        let report = AnalyticsReport::failure(
            "weird\\name\t\"quoted\".obj",
            0,
            0,
            SurfaceType::Unsupported,
            "line1\nline2",
        );
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("weird\\\\name\\t\\\"quoted\\\".obj"));
        assert!(json.contains("line1\\nline2"));
    }

    #[test]
    fn test_write_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let report = AnalyticsReport::failure("m.obj", 1, 2, SurfaceType::Mesh, "boom");
        write_json(&path, &report).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["startId"], 1);
        assert_eq!(value["endId"], 2);
        assert_eq!(value["error"], "boom");
    }
}

//! Request dispatcher: binds one solver to a loaded mesh and produces a
//! serialisable report.
//!
//! The mode decides the solver family; analytics mode additionally picks
//! the surface by a case-insensitive substring match on the model's
//! basename and falls back to the heat method for any triangulated mesh
//! it does not recognise. Analytic and heat solvers run in the
//! normalised frame, and reported curves are mapped back to input
//! coordinates with endpoint positions pinned to the requested vertices.

use std::path::Path;

use nalgebra::Point3;

use crate::algo::analytic::{
    great_circle, plane_segment, saddle_geodesic, torus_geodesic, PLANE_SAMPLES, SPHERE_SAMPLES,
    SURFACE_SAMPLES,
};
use crate::algo::heat::{heat_path, HeatMethodOptions};
use crate::algo::surface::{Saddle, Torus};
use crate::algo::{dijkstra, Curve};
use crate::error::{EngineError, Result};
use crate::mesh::{NormalizeTransform, TriMesh};
use crate::report::{AnalyticsReport, CurveReport, DijkstraReport, SurfaceType};

/// Directory the engine writes result files into, relative to the
/// project root it is launched from.
pub const OUTPUT_DIR: &str = "./frontend/public";

/// Solver family requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Edge-graph shortest path (the default, empty mode string).
    #[default]
    Dijkstra,
    /// Analytic surface geodesics with heat fallback.
    Analytics,
    /// Heat method regardless of the model name.
    Heat,
}

impl Mode {
    /// Parse the command-line mode string. Unknown strings are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "" => Some(Mode::Dijkstra),
            "analytics" => Some(Mode::Analytics),
            "heat" => Some(Mode::Heat),
            _ => None,
        }
    }

    /// Name of the JSON file this mode writes.
    pub fn output_file_name(&self) -> &'static str {
        match self {
            Mode::Dijkstra => "result.json",
            Mode::Analytics => "analytics.json",
            Mode::Heat => "heat_result.json",
        }
    }
}

/// Report produced by one engine run.
#[derive(Debug, Clone)]
pub enum EngineReport {
    /// Default-mode record.
    Dijkstra(DijkstraReport),
    /// Analytics/heat-mode record.
    Analytics(AnalyticsReport),
}

impl EngineReport {
    /// Error text of the run: empty for Dijkstra records and successful
    /// analytics records.
    pub fn error(&self) -> &str {
        match self {
            EngineReport::Dijkstra(_) => "",
            EngineReport::Analytics(report) => &report.error,
        }
    }

    /// Write the record as JSON into `dir` using the mode's file name.
    /// The directory is created if it does not exist.
    pub fn write(&self, dir: &Path, mode: Mode) -> Result<std::path::PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(mode.output_file_name());
        match self {
            EngineReport::Dijkstra(report) => crate::report::write_json(&path, report)?,
            EngineReport::Analytics(report) => crate::report::write_json(&path, report)?,
        }
        Ok(path)
    }
}

/// Load the model and run the solver selected by `mode`.
///
/// Load failures and, in the default mode, argument failures surface as
/// errors; failures inside an analytics/heat run are captured in the
/// record's `error` field so the caller can pass them through.
pub fn run(start: usize, end: usize, model_path: &Path, mode: Mode) -> Result<EngineReport> {
    let mesh = crate::io::load(model_path)?;
    let input_file_name = model_path.display().to_string();
    tracing::debug!(
        vertices = mesh.num_vertices(),
        faces = mesh.num_faces(),
        ?mode,
        "model loaded"
    );

    match mode {
        Mode::Dijkstra => {
            let result = dijkstra::shortest_path(&mesh, start, end)?;
            Ok(EngineReport::Dijkstra(DijkstraReport::new(
                input_file_name,
                &result,
            )))
        }
        Mode::Analytics => Ok(EngineReport::Analytics(analytics_report(
            &mesh,
            &input_file_name,
            start,
            end,
        ))),
        Mode::Heat => Ok(EngineReport::Analytics(heat_report(
            &mesh,
            &input_file_name,
            start,
            end,
        ))),
    }
}

/// Surface family guessed from the model's basename.
fn surface_from_name(input_file_name: &str) -> Option<SurfaceType> {
    let name = basename(input_file_name).to_ascii_lowercase();
    if name.contains("plane") {
        Some(SurfaceType::Plane)
    } else if name.contains("sphere") {
        Some(SurfaceType::Sphere)
    } else if name.contains("torus") || name.contains("donut") {
        Some(SurfaceType::Torus)
    } else if name.contains("saddle") {
        Some(SurfaceType::Saddle)
    } else {
        None
    }
}

/// Path component after the last separator, tolerating both `/` and `\`.
fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn analytics_report(
    mesh: &TriMesh,
    input_file_name: &str,
    start: usize,
    end: usize,
) -> AnalyticsReport {
    let n = mesh.num_vertices();
    if n == 0 {
        return AnalyticsReport::failure(
            input_file_name,
            start,
            end,
            SurfaceType::Unsupported,
            EngineError::EmptyMesh.to_string(),
        );
    }
    for index in [start, end] {
        if index >= n {
            return AnalyticsReport::failure(
                input_file_name,
                start,
                end,
                SurfaceType::Unsupported,
                EngineError::InvalidIndex { index, len: n }.to_string(),
            );
        }
    }

    let transform = NormalizeTransform::from_vertices(mesh.vertices());
    let normalized = transform.apply_all(mesh.vertices());
    let p1 = normalized[start];
    let p2 = normalized[end];

    let (surface_type, curve) = match surface_from_name(input_file_name) {
        Some(SurfaceType::Plane) => (
            SurfaceType::Plane,
            plane_segment(&p1, &p2, PLANE_SAMPLES),
        ),
        Some(SurfaceType::Sphere) => (
            SurfaceType::Sphere,
            great_circle(&p1, &p2, SPHERE_SAMPLES),
        ),
        Some(SurfaceType::Torus) => {
            let torus = Torus::estimate(&normalized);
            (
                SurfaceType::Torus,
                torus_geodesic(&p1, &p2, &torus, SURFACE_SAMPLES),
            )
        }
        Some(SurfaceType::Saddle) => {
            let saddle = Saddle::estimate(&normalized);
            (
                SurfaceType::Saddle,
                saddle_geodesic(&p1, &p2, &saddle, SURFACE_SAMPLES),
            )
        }
        _ => {
            // Unrecognised name: heat method for any triangulated mesh.
            if mesh.num_faces() > 0 {
                return heat_report(mesh, input_file_name, start, end);
            }
            return AnalyticsReport::failure(
                input_file_name,
                start,
                end,
                SurfaceType::Unsupported,
                EngineError::Unsupported {
                    name: basename(input_file_name).to_string(),
                }
                .to_string(),
            );
        }
    };

    let curve = into_input_frame(curve, &transform, &mesh.position(start), &mesh.position(end));
    AnalyticsReport::success(
        input_file_name,
        start,
        end,
        surface_type,
        vec![CurveReport::from(&curve)],
    )
}

fn heat_report(
    mesh: &TriMesh,
    input_file_name: &str,
    start: usize,
    end: usize,
) -> AnalyticsReport {
    let transform = NormalizeTransform::from_vertices(mesh.vertices());
    let normalized = transform.apply_all(mesh.vertices());

    match heat_path(
        &normalized,
        mesh.faces(),
        start,
        end,
        &HeatMethodOptions::default(),
    ) {
        Ok(path) => {
            // Emit the walk's vertices in input coordinates.
            let points: Vec<Point3<f64>> =
                path.iter().map(|&v| mesh.position(v)).collect();
            let curve = Curve::from_points("heat_geodesic", points);
            AnalyticsReport::success(
                input_file_name,
                start,
                end,
                SurfaceType::Mesh,
                vec![CurveReport::from(&curve)],
            )
        }
        Err(err) => AnalyticsReport::failure(
            input_file_name,
            start,
            end,
            SurfaceType::Mesh,
            err.to_string(),
        ),
    }
}

/// Map a normalised-frame curve back to input coordinates, pinning the
/// endpoints to the requested vertex positions.
fn into_input_frame(
    curve: Curve,
    transform: &NormalizeTransform,
    start: &Point3<f64>,
    end: &Point3<f64>,
) -> Curve {
    let mut points: Vec<Point3<f64>> =
        curve.points.iter().map(|p| transform.invert(p)).collect();
    if let Some(first) = points.first_mut() {
        *first = *start;
    }
    if let Some(last) = points.last_mut() {
        *last = *end;
    }
    Curve::with_length(curve.name, curve.length * transform.length_scale(), points)
}

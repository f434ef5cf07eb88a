//! Spherical Web Mercator (EPSG:3857)
//!
//! Used only for area computation and metric scaling, never for display.
//! Latitude of exactly +/-90 degrees is a singularity (y diverges); callers
//! that need a finite result must reject such vertices beforehand.

use std::f64::consts::FRAC_PI_4;

use crate::geometry::{ProjectedPoint, Vertex};

/// Sphere radius used by Web Mercator, in meters
pub const EARTH_RADIUS_M: f64 = 6378137.0;

/// Geographic degrees -> Mercator meters
pub fn project(vertex: &Vertex) -> ProjectedPoint {
    let x = EARTH_RADIUS_M * vertex.lng.to_radians();
    let y = EARTH_RADIUS_M * (FRAC_PI_4 + vertex.lat.to_radians() / 2.0).tan().ln();
    ProjectedPoint { x, y }
}

/// Mercator meters -> geographic degrees
pub fn unproject(point: &ProjectedPoint) -> Vertex {
    let lng = (point.x / EARTH_RADIUS_M).to_degrees();
    let lat = (2.0 * (point.y / EARTH_RADIUS_M).exp().atan() - 2.0 * FRAC_PI_4).to_degrees();
    Vertex { lat, lng }
}

pub fn project_all(vertices: &[Vertex]) -> Vec<ProjectedPoint> {
    vertices.iter().map(project).collect()
}

//! Target-Area Scaling
//!
//! factor = sqrt(target / current), applied about the centroid.
//! Scaling is total: degenerate rings and invalid targets return the input.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::area::area;
use crate::geometry::{ProjectedPoint, Ring, Vertex};
use crate::projection::{project, unproject};

/// Where the centroid-relative transform is applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleMode {
    /// Scale in Mercator meters and re-project. The resulting area matches
    /// the target exactly (up to floating error).
    #[default]
    Projected,
    /// Scale degree offsets directly with the metric factor. Approximate:
    /// treats degree space as locally linear, so only close for small polygons.
    Geographic,
}

/// Arithmetic mean of the open ring's vertices
pub fn centroid(ring: &Ring) -> Option<Vertex> {
    let open = ring.open_vertices();
    if open.is_empty() {
        return None;
    }
    let n = open.len() as f64;
    let (lat, lng) = open
        .iter()
        .fold((0.0, 0.0), |(lat, lng), v| (lat + v.lat, lng + v.lng));
    Some(Vertex::new(lat / n, lng / n))
}

/// Scale the ring to `target_sq_m` using [`ScaleMode::Projected`]
pub fn scale(ring: &Ring, target_sq_m: f64) -> Ring {
    scale_with_mode(ring, target_sq_m, ScaleMode::default())
}

/// Scale the ring to `target_sq_m`. Output is open, same order and count as
/// the open input.
pub fn scale_with_mode(ring: &Ring, target_sq_m: f64, mode: ScaleMode) -> Ring {
    if !target_sq_m.is_finite() || target_sq_m <= 0.0 {
        warn!(target_sq_m, "scale ignored: target must be a positive finite area");
        return ring.clone();
    }
    let current = area(ring);
    if current == 0.0 || !current.is_finite() {
        warn!(current, "scale ignored: ring has no measurable area");
        return ring.clone();
    }

    let factor = (target_sq_m / current).sqrt();
    debug!(current, target_sq_m, factor, ?mode, "scaling ring");

    let open = ring.open_vertices();
    let vertices = match mode {
        ScaleMode::Projected => scale_projected(open, factor),
        ScaleMode::Geographic => scale_geographic(ring, open, factor),
    };
    Ring::new(vertices)
}

fn scale_projected(open: &[Vertex], factor: f64) -> Vec<Vertex> {
    let points: Vec<ProjectedPoint> = open.iter().map(project).collect();
    let n = points.len() as f64;
    let (sx, sy) = points.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    let (cx, cy) = (sx / n, sy / n);
    points
        .iter()
        .map(|p| {
            unproject(&ProjectedPoint {
                x: cx + factor * (p.x - cx),
                y: cy + factor * (p.y - cy),
            })
        })
        .collect()
}

fn scale_geographic(ring: &Ring, open: &[Vertex], factor: f64) -> Vec<Vertex> {
    let Some(c) = centroid(ring) else {
        return open.to_vec();
    };
    open.iter()
        .map(|v| Vertex {
            lat: c.lat + factor * (v.lat - c.lat),
            lng: c.lng + factor * (v.lng - c.lng),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jakarta_block() -> Ring {
        Ring::new(vec![
            Vertex::new(-6.2000, 106.8000),
            Vertex::new(-6.2000, 106.8020),
            Vertex::new(-6.2015, 106.8025),
            Vertex::new(-6.2020, 106.8005),
        ])
    }

    #[test]
    fn test_scale_hits_target() {
        let ring = jakarta_block();
        for target in [1.0, 5_000.0, 123_456.0, 9.0e7] {
            let a = area(&scale(&ring, target));
            assert!(((a - target) / target).abs() < 1e-6, "target {} got {}", target, a);
        }
    }

    #[test]
    fn test_geographic_mode_is_close_for_small_polygons() {
        let ring = jakarta_block();
        let target = 2.0 * area(&ring);
        let a = area(&scale_with_mode(&ring, target, ScaleMode::Geographic));
        assert!(((a - target) / target).abs() < 1e-3);
    }

    #[test]
    fn test_invalid_targets_are_noops() {
        let ring = jakarta_block();
        assert_eq!(scale(&ring, 0.0), ring);
        assert_eq!(scale(&ring, -10.0), ring);
        assert_eq!(scale(&ring, f64::NAN), ring);
        assert_eq!(scale(&ring, f64::INFINITY), ring);
    }

    #[test]
    fn test_degenerate_ring_is_noop() {
        let two = Ring::new(vec![Vertex::new(0.0, 0.0), Vertex::new(1.0, 1.0)]);
        assert_eq!(scale(&two, 100.0), two);
    }

    #[test]
    fn test_output_is_open_with_same_count() {
        let ring = jakarta_block();
        let mut closed = ring.clone().into_vertices();
        closed.push(closed[0]);
        let scaled = scale(&Ring::new(closed), 10_000.0);
        assert_eq!(scaled.len(), ring.len());
        assert!(!scaled.is_closed());
    }

    #[test]
    fn test_centroid_ignores_closing_vertex() {
        let ring = Ring::new(vec![
            Vertex::new(0.0, 0.0),
            Vertex::new(0.0, 2.0),
            Vertex::new(2.0, 2.0),
            Vertex::new(2.0, 0.0),
            Vertex::new(0.0, 0.0),
        ]);
        assert_eq!(centroid(&ring), Some(Vertex::new(1.0, 1.0)));
    }
}

//! Planar Area - Shoelace over Web Mercator
//!
//! This is the single area definition used for display, scaling and export.
//! Mercator inflates area away from the equator; that is accepted here.

use crate::geometry::{ProjectedPoint, Ring};
use crate::projection::project_all;

/// Area of the ring in projected square meters. Returns 0 below 3 vertices.
pub fn area(ring: &Ring) -> f64 {
    if !ring.is_polygon() {
        return 0.0;
    }
    let mut projected = project_all(ring.vertices());
    close_projected(&mut projected);
    shoelace(&projected)
}

/// Append the first point unless the last already coincides with it exactly
fn close_projected(points: &mut Vec<ProjectedPoint>) {
    if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
        if first != last {
            points.push(first);
        }
    }
}

/// |sum(x_i * y_{i+1} - x_{i+1} * y_i)| / 2 over an already-closed ring.
///
/// Coordinates are taken relative to the first point; the sum is translation
/// invariant and this keeps small polygons far from the origin precise.
fn shoelace(closed: &[ProjectedPoint]) -> f64 {
    if closed.len() < 3 {
        return 0.0;
    }
    let origin = closed[0];
    let twice: f64 = closed
        .windows(2)
        .map(|w| {
            let (x0, y0) = (w[0].x - origin.x, w[0].y - origin.y);
            let (x1, y1) = (w[1].x - origin.x, w[1].y - origin.y);
            x0 * y1 - x1 * y0
        })
        .sum();
    twice.abs() / 2.0
}

/// Human-readable area: km2 from 1e6, hectares from 1e4, else square meters
pub fn format_area(sq_meters: f64) -> String {
    if sq_meters >= 1_000_000.0 {
        format!("{:.2} km²", sq_meters / 1_000_000.0)
    } else if sq_meters >= 10_000.0 {
        format!("{:.2} ha", sq_meters / 10_000.0)
    } else {
        format!("{:.1} m²", sq_meters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vertex;
    use crate::projection::unproject;

    fn metric_square(x0: f64, y0: f64, side: f64) -> Ring {
        let corners = [(0.0, 0.0), (side, 0.0), (side, side), (0.0, side)];
        Ring::new(
            corners
                .iter()
                .map(|(dx, dy)| unproject(&ProjectedPoint { x: x0 + dx, y: y0 + dy }))
                .collect(),
        )
    }

    #[test]
    fn test_unit_square_near_origin() {
        let a = area(&metric_square(0.0, 0.0, 1.0));
        assert!((a - 1.0).abs() < 1e-6, "got {}", a);
    }

    #[test]
    fn test_offset_square() {
        let a = area(&metric_square(11_894_000.0, -692_000.0, 250.0));
        assert!((a - 62_500.0).abs() < 1e-3, "got {}", a);
    }

    #[test]
    fn test_below_three_vertices_is_zero() {
        assert_eq!(area(&Ring::default()), 0.0);
        let two = Ring::new(vec![Vertex::new(0.0, 0.0), Vertex::new(1.0, 1.0)]);
        assert_eq!(area(&two), 0.0);
    }

    #[test]
    fn test_collinear_is_zero() {
        let line = Ring::new(vec![
            Vertex::new(0.0, 0.0),
            Vertex::new(0.0, 1.0),
            Vertex::new(0.0, 2.0),
        ]);
        assert!(area(&line).abs() < 1e-6);
    }

    #[test]
    fn test_winding_does_not_matter() {
        let ring = metric_square(1000.0, 2000.0, 40.0);
        let mut reversed = ring.clone().into_vertices();
        reversed.reverse();
        let a = area(&ring);
        let b = area(&Ring::new(reversed));
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn test_format_area_units() {
        assert_eq!(format_area(12.34), "12.3 m²");
        assert_eq!(format_area(25_000.0), "2.50 ha");
        assert_eq!(format_area(3_500_000.0), "3.50 km²");
    }
}

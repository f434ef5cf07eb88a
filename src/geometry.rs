//! Geometry Types - Vertices, Rings, Bounds
//!
//! Rings are held OPEN. Closure happens only at serialization boundaries.

use serde::{Deserialize, Serialize};

/// A geographic vertex in WGS84 degrees. No altitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub lat: f64,
    pub lng: f64,
}

impl Vertex {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A planar point in Web Mercator meters (x = easting, y = northing)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
}

/// Ordered polygon boundary. Insertion order defines direction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ring {
    vertices: Vec<Vertex>,
}

impl Ring {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn into_vertices(self) -> Vec<Vertex> {
        self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// True once there are enough vertices to enclose an area
    pub fn is_polygon(&self) -> bool {
        self.vertices.len() >= 3
    }

    /// True when the last vertex repeats the first exactly
    pub fn is_closed(&self) -> bool {
        match (self.vertices.first(), self.vertices.last()) {
            (Some(first), Some(last)) => self.vertices.len() > 1 && first == last,
            _ => false,
        }
    }

    /// Vertices without a duplicated closing vertex
    pub fn open_vertices(&self) -> &[Vertex] {
        if self.is_closed() {
            &self.vertices[..self.vertices.len() - 1]
        } else {
            &self.vertices
        }
    }

    /// Vertices with the first repeated at the end (unless already closed).
    /// An empty ring stays empty.
    pub fn closed_vertices(&self) -> Vec<Vertex> {
        let mut out = self.vertices.clone();
        if let Some(first) = self.vertices.first() {
            if !self.is_closed() {
                out.push(*first);
            }
        }
        out
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_vertices(&self.vertices)
    }
}

impl From<Vec<Vertex>> for Ring {
    fn from(vertices: Vec<Vertex>) -> Self {
        Self::new(vertices)
    }
}

/// Axis-aligned bounds. For geographic input x = lng, y = lat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BoundingBox {
    pub fn from_vertices(vertices: &[Vertex]) -> Option<Self> {
        let first = vertices.first()?;
        let seed = Self {
            xmin: first.lng,
            ymin: first.lat,
            xmax: first.lng,
            ymax: first.lat,
        };
        Some(vertices.iter().skip(1).fold(seed, |b, v| Self {
            xmin: b.xmin.min(v.lng),
            ymin: b.ymin.min(v.lat),
            xmax: b.xmax.max(v.lng),
            ymax: b.ymax.max(v.lat),
        }))
    }

    /// `[[south, west], [north, east]]` for fitting a map view
    pub fn to_lat_lng_bounds(&self) -> [[f64; 2]; 2] {
        [[self.ymin, self.xmin], [self.ymax, self.xmax]]
    }
}

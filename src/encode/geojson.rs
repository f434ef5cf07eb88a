//! GeoJSON - single-feature FeatureCollection with one Polygon

use serde::Serialize;

use super::EncodeError;
use crate::area::area;
use crate::geometry::Ring;

#[derive(Debug, Serialize)]
struct FeatureCollection {
    #[serde(rename = "type")]
    kind: &'static str,
    features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
    properties: Properties,
    geometry: Polygon,
}

#[derive(Debug, Serialize)]
struct Properties {
    area_sqm: f64,
}

#[derive(Debug, Serialize)]
struct Polygon {
    #[serde(rename = "type")]
    kind: &'static str,
    coordinates: Vec<Vec<[f64; 2]>>,
}

/// Encode as compact GeoJSON text. The ring is written as `[lng, lat]`
/// pairs with the first position repeated at the end.
pub fn encode_geojson(ring: &Ring) -> Result<String, EncodeError> {
    let outer: Vec<[f64; 2]> = ring
        .closed_vertices()
        .iter()
        .map(|v| [v.lng, v.lat])
        .collect();

    let collection = FeatureCollection {
        kind: "FeatureCollection",
        features: vec![Feature {
            kind: "Feature",
            properties: Properties { area_sqm: area(ring) },
            geometry: Polygon {
                kind: "Polygon",
                coordinates: vec![outer],
            },
        }],
    };
    Ok(serde_json::to_string(&collection)?)
}

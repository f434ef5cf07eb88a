//! KML - one Placemark with a single outer boundary

use crate::area::area;
use crate::geometry::Ring;

pub const PLACEMARK_NAME: &str = "Target Polygon";

/// Encode as a KML 2.2 document. Coordinates are `lng,lat,0` triples,
/// space separated, with the first triple repeated at the end.
pub fn encode_kml(ring: &Ring) -> String {
    let coordinates = ring
        .closed_vertices()
        .iter()
        .map(|v| format!("{},{},0", v.lng, v.lat))
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Placemark>
    <name>{name}</name>
    <description>Area: {area:.2} m2</description>
    <Polygon>
      <outerBoundaryIs>
        <LinearRing>
          <coordinates>
            {coordinates}
          </coordinates>
        </LinearRing>
      </outerBoundaryIs>
    </Polygon>
  </Placemark>
</kml>
"#,
        name = PLACEMARK_NAME,
        area = area(ring),
        coordinates = coordinates,
    )
}

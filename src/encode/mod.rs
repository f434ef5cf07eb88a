//! Format Encoders
//!
//! Each encoder is a pure function of the ring. Text encoders do not guard
//! short rings; the export pipeline validates before calling them.

pub mod geojson;
pub mod kml;
pub mod shapefile;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Polygon needs at least 3 vertices, found {found}")]
    InsufficientVertices { found: usize },

    #[error("Polygon has too many points for a shapefile record: {count}")]
    TooManyPoints { count: usize },

    #[error("Write error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub use self::geojson::encode_geojson;
pub use self::kml::encode_kml;
pub use self::shapefile::{encode_shapefile, ShapefileBundle};

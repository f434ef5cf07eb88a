//! PolyExport Core - Polygon Area and Export Engine
//!
//! # Guarantees
//! 1. One Area Definition (planar Web Mercator shoelace, everywhere)
//! 2. Area And Scale Are Total (no-op instead of error)
//! 3. Export Always Validates
//! 4. Deterministic Output (same ring, same bytes)
//! 5. Rings Stay Open Until Serialized

pub mod geometry;
pub mod projection;
pub mod area;
pub mod scale;
pub mod validation;
pub mod encode;
pub mod archive;
pub mod config;
pub mod hashing;
pub mod export;

pub use geometry::{BoundingBox, ProjectedPoint, Ring, Vertex};
pub use projection::{project, unproject, EARTH_RADIUS_M};
pub use area::{area, format_area};
pub use scale::{centroid, scale, scale_with_mode, ScaleMode};
pub use validation::{RingViolation, ValidationResult, Validator, ViolationSeverity};
pub use encode::{encode_geojson, encode_kml, encode_shapefile, EncodeError, ShapefileBundle};
pub use archive::{build_archive, ArchiveBuilder, ArchiveError, Compression, ShapefileComponent};
pub use config::{ConfigError, ExportSettings};
pub use hashing::sha256_hex;
pub use export::{ExportArtifact, ExportError, ExportFormat, ExportPipeline, ExportRequest};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

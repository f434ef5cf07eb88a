//! Export Pipeline - Single Entry Point
//!
//! CRITICAL: export MUST validate the ring first. No bypass.

use std::fmt;
use std::str::FromStr;

use base64::Engine as _;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use tracing::{debug, info};

use crate::archive::{build_archive, ArchiveError};
use crate::area::area;
use crate::config::ExportSettings;
use crate::encode::shapefile::ShapefileEncoder;
use crate::encode::{encode_geojson, encode_kml, EncodeError};
use crate::geometry::Ring;
use crate::hashing::sha256_hex;
use crate::scale::scale_with_mode;
use crate::validation::{MinVertexCount, RingRule, ValidationResult, Validator};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Polygon needs at least 3 vertices, found {found}")]
    InsufficientVertices { found: usize },

    #[error("Invalid polygon: {0}")]
    InvalidRing(String),

    #[error("Encoding failed: {0}")]
    Encoding(#[from] EncodeError),

    #[error("Archive failed: {0}")]
    Archive(#[from] ArchiveError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    Geojson,
    Kml,
    ShapefileArchive,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Geojson => "geojson",
            Self::Kml => "kml",
            Self::ShapefileArchive => "zip",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Geojson => "application/json",
            Self::Kml => "application/vnd.google-earth.kml+xml",
            Self::ShapefileArchive => "application/zip",
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Geojson => "geojson",
            Self::Kml => "kml",
            Self::ShapefileArchive => "shapefile-archive",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "geojson" | "json" => Ok(Self::Geojson),
            "kml" => Ok(Self::Kml),
            "shp" | "shapefile" | "shapefile-archive" | "zip" => Ok(Self::ShapefileArchive),
            other => Err(format!("unknown export format: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ExportRequest {
    pub format: ExportFormat,
    /// Scale to this area before encoding
    pub target_area_sq_m: Option<f64>,
    /// Last-modified date stamped into the DBF header
    pub modified: NaiveDate,
}

impl ExportRequest {
    pub fn new(format: ExportFormat, modified: NaiveDate) -> Self {
        Self { format, target_area_sq_m: None, modified }
    }

    pub fn with_target(mut self, target_sq_m: f64) -> Self {
        self.target_area_sq_m = Some(target_sq_m);
        self
    }
}

/// Payload plus everything a caller needs to offer it as a download
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub filename: String,
    pub mime_type: String,
    pub area_sq_m: f64,
    pub checksum: String,
    #[serde(rename = "dataBase64", serialize_with = "serialize_base64")]
    pub data: Vec<u8>,
}

fn serialize_base64<S: Serializer>(data: &[u8], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&base64::engine::general_purpose::STANDARD.encode(data))
}

/// The export pipeline - single entry point for area, scale and export
pub struct ExportPipeline {
    settings: ExportSettings,
    validator: Validator,
}

impl ExportPipeline {
    pub fn new(settings: ExportSettings) -> Self {
        Self {
            settings,
            validator: Validator::new(),
        }
    }

    /// Live area display. Total: 0 for rings under 3 vertices.
    pub fn area(&self, ring: &Ring) -> f64 {
        area(ring)
    }

    /// Scale using the configured mode. Total: invalid input returns the ring.
    pub fn scale(&self, ring: &Ring, target_sq_m: f64) -> Ring {
        scale_with_mode(ring, target_sq_m, self.settings.scale_mode)
    }

    pub fn validate(&self, ring: &Ring) -> ValidationResult {
        self.validator.validate(ring)
    }

    /// Export a ring
    ///
    /// CRITICAL: This ALWAYS validates first, and validates again after any
    /// scaling. Nothing is encoded for an invalid ring, so no partial archive
    /// can be produced.
    pub fn export(&self, ring: &Ring, request: &ExportRequest) -> Result<ExportArtifact, ExportError> {
        self.ensure_valid(ring)?;

        let scaled;
        let ring = match request.target_area_sq_m {
            Some(target) => {
                scaled = self.scale(ring, target);
                self.ensure_valid(&scaled)?;
                &scaled
            }
            None => ring,
        };

        let data = self.encode(ring, request)?;
        let artifact = ExportArtifact {
            format: request.format,
            filename: format!("{}.{}", self.settings.filename, request.format.extension()),
            mime_type: request.format.mime_type().to_string(),
            area_sq_m: area(ring),
            checksum: sha256_hex(&data),
            data,
        };
        info!(
            format = %artifact.format,
            filename = %artifact.filename,
            bytes = artifact.data.len(),
            "export artifact ready"
        );
        Ok(artifact)
    }

    fn ensure_valid(&self, ring: &Ring) -> Result<(), ExportError> {
        let validation = self.validate(ring);
        if !validation.has_errors() {
            return Ok(());
        }
        let too_short = validation
            .violations
            .iter()
            .any(|v| v.rule == MinVertexCount.name());
        if too_short {
            return Err(ExportError::InsufficientVertices {
                found: ring.open_vertices().len(),
            });
        }
        Err(ExportError::InvalidRing(validation.summary()))
    }

    fn encode(&self, ring: &Ring, request: &ExportRequest) -> Result<Vec<u8>, ExportError> {
        debug!(format = %request.format, vertices = ring.len(), "encoding ring");
        match request.format {
            ExportFormat::Geojson => Ok(encode_geojson(ring)?.into_bytes()),
            ExportFormat::Kml => Ok(encode_kml(ring).into_bytes()),
            ExportFormat::ShapefileArchive => {
                let bundle = ShapefileEncoder::new(request.modified)
                    .record_id(self.settings.record_id)
                    .encode(ring)?;
                Ok(build_archive(&self.settings.filename, bundle, self.settings.compression)?)
            }
        }
    }
}

impl Default for ExportPipeline {
    fn default() -> Self {
        Self::new(ExportSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vertex;
    use base64::Engine as _;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()
    }

    fn square() -> Ring {
        Ring::new(vec![
            Vertex::new(48.8500, 2.3500),
            Vertex::new(48.8500, 2.3510),
            Vertex::new(48.8510, 2.3510),
            Vertex::new(48.8510, 2.3500),
        ])
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("GeoJSON".parse::<ExportFormat>(), Ok(ExportFormat::Geojson));
        assert_eq!("shp".parse::<ExportFormat>(), Ok(ExportFormat::ShapefileArchive));
        assert!("dxf".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::ShapefileArchive.to_string(), "shapefile-archive");
    }

    #[test]
    fn test_artifact_metadata() {
        let pipeline = ExportPipeline::default();
        let artifact = pipeline
            .export(&square(), &ExportRequest::new(ExportFormat::Kml, date()))
            .unwrap();
        assert_eq!(artifact.filename, "polygon_export.kml");
        assert_eq!(artifact.mime_type, "application/vnd.google-earth.kml+xml");
        assert_eq!(artifact.checksum, sha256_hex(&artifact.data));
    }

    #[test]
    fn test_target_scales_before_encoding() {
        let pipeline = ExportPipeline::default();
        let request = ExportRequest::new(ExportFormat::Geojson, date()).with_target(50_000.0);
        let artifact = pipeline.export(&square(), &request).unwrap();
        assert!(((artifact.area_sq_m - 50_000.0) / 50_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_short_ring_rejected_for_every_format() {
        let pipeline = ExportPipeline::default();
        let ring = Ring::new(vec![Vertex::new(0.0, 0.0), Vertex::new(1.0, 1.0)]);
        for format in [ExportFormat::Geojson, ExportFormat::Kml, ExportFormat::ShapefileArchive] {
            let err = pipeline.export(&ring, &ExportRequest::new(format, date())).unwrap_err();
            assert!(matches!(err, ExportError::InsufficientVertices { found: 2 }));
        }
    }

    #[test]
    fn test_pole_rejected_as_invalid_ring() {
        let pipeline = ExportPipeline::default();
        let ring = Ring::new(vec![
            Vertex::new(90.0, 0.0),
            Vertex::new(80.0, 1.0),
            Vertex::new(80.0, -1.0),
        ]);
        let err = pipeline
            .export(&ring, &ExportRequest::new(ExportFormat::Geojson, date()))
            .unwrap_err();
        assert!(err.to_string().contains("coordinate_range"));
    }

    #[test]
    fn test_scaled_ring_is_validated_before_encoding() {
        let settings = ExportSettings {
            scale_mode: crate::scale::ScaleMode::Geographic,
            ..ExportSettings::default()
        };
        let pipeline = ExportPipeline::new(settings);
        let ring = Ring::new(vec![
            Vertex::new(80.0, 0.0),
            Vertex::new(80.0, 10.0),
            Vertex::new(85.0, 5.0),
        ]);
        // factor 4 in degree space pushes the 85N vertex to 95N
        let request = ExportRequest::new(ExportFormat::Geojson, date())
            .with_target(16.0 * area(&ring));
        let err = pipeline.export(&ring, &request).unwrap_err();
        assert!(matches!(err, ExportError::InvalidRing(_)));
        assert!(err.to_string().contains("coordinate_range"));
    }

    #[test]
    fn test_artifact_json_carries_base64() {
        let pipeline = ExportPipeline::default();
        let artifact = pipeline
            .export(&square(), &ExportRequest::new(ExportFormat::Geojson, date()))
            .unwrap();
        let v = serde_json::to_value(&artifact).unwrap();
        assert_eq!(v["format"], "geojson");
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(v["dataBase64"].as_str().unwrap())
            .unwrap();
        assert_eq!(decoded, artifact.data);
    }
}

//! Shapefile Archive - packs SHP/SHX/DBF/PRJ into one ZIP
//!
//! Entries carry a fixed timestamp so equal inputs give equal archives.

use std::fmt;
use std::io::{Cursor, Write};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::encode::ShapefileBundle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapefileComponent {
    Shp,
    Shx,
    Dbf,
    Prj,
}

impl ShapefileComponent {
    /// Archive order
    pub const ALL: [ShapefileComponent; 4] = [Self::Shp, Self::Shx, Self::Dbf, Self::Prj];

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Shp => "shp",
            Self::Shx => "shx",
            Self::Dbf => "dbf",
            Self::Prj => "prj",
        }
    }
}

impl fmt::Display for ShapefileComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.extension())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    Stored,
    #[default]
    Deflated,
}

impl From<Compression> for CompressionMethod {
    fn from(c: Compression) -> Self {
        match c {
            Compression::Stored => CompressionMethod::Stored,
            Compression::Deflated => CompressionMethod::Deflated,
        }
    }
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Missing shapefile component: {0}")]
    MissingComponent(ShapefileComponent),

    #[error("Archive file name is empty")]
    EmptyFilename,

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Write error: {0}")]
    Io(#[from] std::io::Error),
}

/// Collects the four components, then writes them as `<filename>.<ext>`
#[derive(Debug, Clone, Default)]
pub struct ArchiveBuilder {
    filename: String,
    compression: Compression,
    shp: Option<Vec<u8>>,
    shx: Option<Vec<u8>>,
    dbf: Option<Vec<u8>>,
    prj: Option<Vec<u8>>,
}

impl ArchiveBuilder {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..Self::default()
        }
    }

    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn add(mut self, component: ShapefileComponent, data: Vec<u8>) -> Self {
        let slot = match component {
            ShapefileComponent::Shp => &mut self.shp,
            ShapefileComponent::Shx => &mut self.shx,
            ShapefileComponent::Dbf => &mut self.dbf,
            ShapefileComponent::Prj => &mut self.prj,
        };
        *slot = Some(data);
        self
    }

    pub fn with_bundle(self, bundle: ShapefileBundle) -> Self {
        self.add(ShapefileComponent::Shp, bundle.shp)
            .add(ShapefileComponent::Shx, bundle.shx)
            .add(ShapefileComponent::Dbf, bundle.dbf)
            .add(ShapefileComponent::Prj, bundle.prj)
    }

    fn get(&self, component: ShapefileComponent) -> Option<&[u8]> {
        match component {
            ShapefileComponent::Shp => self.shp.as_deref(),
            ShapefileComponent::Shx => self.shx.as_deref(),
            ShapefileComponent::Dbf => self.dbf.as_deref(),
            ShapefileComponent::Prj => self.prj.as_deref(),
        }
    }

    /// Fails before writing anything if a component is absent
    pub fn build(&self) -> Result<Vec<u8>, ArchiveError> {
        if self.filename.trim().is_empty() {
            return Err(ArchiveError::EmptyFilename);
        }
        let mut entries = Vec::with_capacity(ShapefileComponent::ALL.len());
        for component in ShapefileComponent::ALL {
            let data = self
                .get(component)
                .ok_or(ArchiveError::MissingComponent(component))?;
            entries.push((component, data));
        }

        let options = SimpleFileOptions::default()
            .compression_method(self.compression.into())
            .last_modified_time(DateTime::default());

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (component, data) in entries {
            zip.start_file(format!("{}.{}", self.filename, component.extension()), options)?;
            zip.write_all(data)?;
        }
        let bytes = zip.finish()?.into_inner();
        debug!(filename = %self.filename, bytes = bytes.len(), "built shapefile archive");
        Ok(bytes)
    }
}

/// Pack a complete bundle as `<filename>.shp|.shx|.dbf|.prj`
pub fn build_archive(
    filename: &str,
    bundle: ShapefileBundle,
    compression: Compression,
) -> Result<Vec<u8>, ArchiveError> {
    ArchiveBuilder::new(filename)
        .compression(compression)
        .with_bundle(bundle)
        .build()
}

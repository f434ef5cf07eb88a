//! ESRI Shapefile - SHP/SHX/DBF/PRJ for a single Polygon record
//!
//! Layouts are expressed as record structs that write themselves field by
//! field. Lengths in SHP/SHX headers are 16-bit words. Header integers mix
//! big-endian (file code, lengths, record numbers) and little-endian
//! (version, shape type, coordinates).

use std::io::Write;

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use chrono::{Datelike, NaiveDate};
use tracing::debug;

use super::EncodeError;
use crate::geometry::{BoundingBox, Ring, Vertex};

pub const FILE_CODE: i32 = 9994;
pub const VERSION: i32 = 1000;
pub const SHAPE_TYPE_POLYGON: i32 = 5;
pub const FILE_HEADER_LEN: usize = 100;
pub const RECORD_HEADER_LEN: usize = 8;

/// WGS84 geographic CRS, as written to the `.prj` file
pub const WGS84_PRJ: &str = r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137,298.257223563]],PRIMEM["Greenwich",0],UNIT["Degree",0.017453292519943295]]"#;

const DBF_VERSION: u8 = 0x03;
const DBF_HEADER_LEN: usize = 32;
const DBF_FIELD_LEN: usize = 32;
const DBF_HEADER_TERMINATOR: u8 = 0x0D;
const DBF_EOF: u8 = 0x1A;
const DBF_RECORD_VALID: u8 = b' ';

/// The four sub-files of one shapefile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapefileBundle {
    pub shp: Vec<u8>,
    pub shx: Vec<u8>,
    pub dbf: Vec<u8>,
    pub prj: Vec<u8>,
}

// --- SHP / SHX records ---

/// 100-byte header shared by `.shp` and `.shx`
#[derive(Debug, Clone, Copy)]
struct FileHeader {
    file_length_words: i32,
    shape_type: i32,
    bbox: BoundingBox,
}

impl FileHeader {
    fn write_to<W: Write>(&self, w: &mut W) -> Result<(), EncodeError> {
        w.write_i32::<BigEndian>(FILE_CODE)?;
        w.write_all(&[0u8; 20])?; // unused, bytes 4..24
        w.write_i32::<BigEndian>(self.file_length_words)?;
        w.write_i32::<LittleEndian>(VERSION)?;
        w.write_i32::<LittleEndian>(self.shape_type)?;
        write_bbox(w, &self.bbox)?;
        w.write_all(&[0u8; 32])?; // Z and M ranges, bytes 68..100
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct RecordHeader {
    record_number: i32,
    content_length_words: i32,
}

impl RecordHeader {
    fn write_to<W: Write>(&self, w: &mut W) -> Result<(), EncodeError> {
        w.write_i32::<BigEndian>(self.record_number)?;
        w.write_i32::<BigEndian>(self.content_length_words)?;
        Ok(())
    }
}

/// Polygon record content with a single part
#[derive(Debug)]
struct PolygonRecord<'a> {
    bbox: BoundingBox,
    points: &'a [Vertex],
}

impl PolygonRecord<'_> {
    /// shape type + bbox + num parts + num points + one part index + points
    fn content_len_bytes(&self) -> usize {
        4 + 32 + 4 + 4 + 4 + 16 * self.points.len()
    }

    fn write_to<W: Write>(&self, w: &mut W) -> Result<(), EncodeError> {
        let num_points = i32::try_from(self.points.len())
            .map_err(|_| EncodeError::TooManyPoints { count: self.points.len() })?;
        w.write_i32::<LittleEndian>(SHAPE_TYPE_POLYGON)?;
        write_bbox(w, &self.bbox)?;
        w.write_i32::<LittleEndian>(1)?; // num parts
        w.write_i32::<LittleEndian>(num_points)?;
        w.write_i32::<LittleEndian>(0)?; // part 0 starts at point 0
        for p in self.points {
            w.write_f64::<LittleEndian>(p.lng)?;
            w.write_f64::<LittleEndian>(p.lat)?;
        }
        Ok(())
    }
}

/// `.shx` entry: offset and length of the record in `.shp`, in words
#[derive(Debug, Clone, Copy)]
struct IndexRecord {
    offset_words: i32,
    content_length_words: i32,
}

impl IndexRecord {
    fn write_to<W: Write>(&self, w: &mut W) -> Result<(), EncodeError> {
        w.write_i32::<BigEndian>(self.offset_words)?;
        w.write_i32::<BigEndian>(self.content_length_words)?;
        Ok(())
    }
}

fn write_bbox<W: Write>(w: &mut W, bbox: &BoundingBox) -> Result<(), EncodeError> {
    w.write_f64::<LittleEndian>(bbox.xmin)?;
    w.write_f64::<LittleEndian>(bbox.ymin)?;
    w.write_f64::<LittleEndian>(bbox.xmax)?;
    w.write_f64::<LittleEndian>(bbox.ymax)?;
    Ok(())
}

fn words(bytes: usize, count: usize) -> Result<i32, EncodeError> {
    i32::try_from(bytes / 2).map_err(|_| EncodeError::TooManyPoints { count })
}

// --- DBF ---

#[derive(Debug, Clone, Copy)]
struct DbfHeader {
    modified: NaiveDate,
    record_count: u32,
    header_len: u16,
    record_len: u16,
}

impl DbfHeader {
    fn write_to<W: Write>(&self, w: &mut W) -> Result<(), EncodeError> {
        w.write_u8(DBF_VERSION)?;
        w.write_u8((self.modified.year() - 1900).clamp(0, 255) as u8)?;
        w.write_u8(self.modified.month() as u8)?;
        w.write_u8(self.modified.day() as u8)?;
        w.write_u32::<LittleEndian>(self.record_count)?;
        w.write_u16::<LittleEndian>(self.header_len)?;
        w.write_u16::<LittleEndian>(self.record_len)?;
        w.write_all(&[0u8; 20])?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct DbfField {
    name: &'static str,
    kind: u8,
    length: u8,
    decimals: u8,
}

impl DbfField {
    fn write_to<W: Write>(&self, w: &mut W) -> Result<(), EncodeError> {
        w.write_all(&fixed_width(self.name, 11, 0))?;
        w.write_u8(self.kind)?;
        w.write_all(&[0u8; 4])?;
        w.write_u8(self.length)?;
        w.write_u8(self.decimals)?;
        w.write_all(&[0u8; 14])?;
        Ok(())
    }
}

const ID_FIELD: DbfField = DbfField {
    name: "ID",
    kind: b'N',
    length: 10,
    decimals: 0,
};

/// Truncate or pad `s` to `width` bytes with `pad`
fn fixed_width(s: &str, width: usize, pad: u8) -> Vec<u8> {
    let mut out: Vec<u8> = s.bytes().take(width).collect();
    out.resize(width, pad);
    out
}

/// Numeric fields are right-justified: pad on the left with spaces.
///
/// `1` in a 10-byte field is written as `"         1"` (nine 0x20 bytes, then
/// `1`), not as `"1"` followed by NUL padding. Readers treating the field as
/// dBase numeric parse both the same way; a byte comparison does not.
fn numeric_field(value: u32, width: usize) -> Vec<u8> {
    let digits = value.to_string();
    let digits = &digits.as_bytes()[digits.len().saturating_sub(width)..];
    let mut out = vec![b' '; width - digits.len()];
    out.extend_from_slice(digits);
    out
}

// --- Encoder ---

#[derive(Debug, Clone, Copy)]
pub struct ShapefileEncoder {
    modified: NaiveDate,
    record_id: u32,
}

impl ShapefileEncoder {
    /// `modified` is stamped into the DBF header
    pub fn new(modified: NaiveDate) -> Self {
        Self { modified, record_id: 1 }
    }

    pub fn record_id(mut self, id: u32) -> Self {
        self.record_id = id;
        self
    }

    pub fn encode(&self, ring: &Ring) -> Result<ShapefileBundle, EncodeError> {
        let found = ring.open_vertices().len();
        if found < 3 {
            return Err(EncodeError::InsufficientVertices { found });
        }

        let points = ring.closed_vertices();
        let bbox = BoundingBox::from_vertices(&points)
            .ok_or(EncodeError::InsufficientVertices { found })?;
        let record = PolygonRecord { bbox, points: &points };
        let content_len = record.content_len_bytes();
        let content_words = words(content_len, points.len())?;

        let bundle = ShapefileBundle {
            shp: self.encode_shp(&record, content_words)?,
            shx: self.encode_shx(bbox, content_words, points.len())?,
            dbf: self.encode_dbf()?,
            prj: WGS84_PRJ.as_bytes().to_vec(),
        };
        debug!(
            points = points.len(),
            shp = bundle.shp.len(),
            shx = bundle.shx.len(),
            dbf = bundle.dbf.len(),
            "encoded shapefile"
        );
        Ok(bundle)
    }

    fn encode_shp(&self, record: &PolygonRecord<'_>, content_words: i32) -> Result<Vec<u8>, EncodeError> {
        let total = FILE_HEADER_LEN + RECORD_HEADER_LEN + record.content_len_bytes();
        let mut buf = Vec::with_capacity(total);
        FileHeader {
            file_length_words: words(total, record.points.len())?,
            shape_type: SHAPE_TYPE_POLYGON,
            bbox: record.bbox,
        }
        .write_to(&mut buf)?;
        RecordHeader { record_number: 1, content_length_words: content_words }.write_to(&mut buf)?;
        record.write_to(&mut buf)?;
        Ok(buf)
    }

    fn encode_shx(&self, bbox: BoundingBox, content_words: i32, count: usize) -> Result<Vec<u8>, EncodeError> {
        let total = FILE_HEADER_LEN + RECORD_HEADER_LEN;
        let mut buf = Vec::with_capacity(total);
        FileHeader {
            file_length_words: words(total, count)?,
            shape_type: SHAPE_TYPE_POLYGON,
            bbox,
        }
        .write_to(&mut buf)?;
        IndexRecord {
            offset_words: (FILE_HEADER_LEN / 2) as i32,
            content_length_words: content_words,
        }
        .write_to(&mut buf)?;
        Ok(buf)
    }

    fn encode_dbf(&self) -> Result<Vec<u8>, EncodeError> {
        let header_len = DBF_HEADER_LEN + DBF_FIELD_LEN + 1;
        let record_len = 1 + ID_FIELD.length as usize;
        let mut buf = Vec::with_capacity(header_len + record_len + 1);
        DbfHeader {
            modified: self.modified,
            record_count: 1,
            header_len: header_len as u16,
            record_len: record_len as u16,
        }
        .write_to(&mut buf)?;
        ID_FIELD.write_to(&mut buf)?;
        buf.write_u8(DBF_HEADER_TERMINATOR)?;
        buf.write_u8(DBF_RECORD_VALID)?;
        buf.write_all(&numeric_field(self.record_id, ID_FIELD.length as usize))?;
        buf.write_u8(DBF_EOF)?;
        Ok(buf)
    }
}

/// Encode with record ID 1
pub fn encode_shapefile(ring: &Ring, modified: NaiveDate) -> Result<ShapefileBundle, EncodeError> {
    ShapefileEncoder::new(modified).encode(ring)
}

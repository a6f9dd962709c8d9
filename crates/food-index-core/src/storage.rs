//! Binary catalog file.
//!
//! Flat sequence of fixed-width little-endian records, laid out like a C
//! struct on a 64-bit target (alignment padding included):
//!
//! | offset | size | field |
//! |-------:|-----:|-------|
//! | 0 | 4 | id (`i32`) |
//! | 4 | 100 | description, NUL-padded |
//! | 104 | 8 | moisture (`f64`) |
//! | 112 | 4 | energy_kcal (`i32`) |
//! | 116 | 4 | padding |
//! | 120 | 8 | protein (`f64`) |
//! | 128 | 8 | carbohydrate (`f64`) |
//! | 136 | 50 | category, NUL-padded |
//! | 186 | 6 | padding |

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::catalog::{CategoryCatalog, RemovalStrategy};
use crate::error::{CatalogError, Result};
use crate::food::{truncate_bounded, FoodRecord, MAX_CATEGORY_BYTES, MAX_DESCRIPTION_BYTES};

pub const RECORD_SIZE: usize = 192;

const ID_AT: usize = 0;
const DESCRIPTION_AT: usize = 4;
const DESCRIPTION_WIDTH: usize = 100;
const MOISTURE_AT: usize = 104;
const ENERGY_AT: usize = 112;
const PROTEIN_AT: usize = 120;
const CARBOHYDRATE_AT: usize = 128;
const CATEGORY_AT: usize = 136;
const CATEGORY_WIDTH: usize = 50;

/// Encode one record. Padding and unused string bytes are zero.
pub fn encode_record(record: &FoodRecord) -> [u8; RECORD_SIZE] {
    let mut buf = [0u8; RECORD_SIZE];
    buf[ID_AT..ID_AT + 4].copy_from_slice(&record.id.to_le_bytes());
    put_str(
        &mut buf[DESCRIPTION_AT..DESCRIPTION_AT + DESCRIPTION_WIDTH],
        truncate_bounded(&record.description, MAX_DESCRIPTION_BYTES),
    );
    buf[MOISTURE_AT..MOISTURE_AT + 8].copy_from_slice(&record.moisture.to_le_bytes());
    buf[ENERGY_AT..ENERGY_AT + 4].copy_from_slice(&record.energy_kcal.to_le_bytes());
    buf[PROTEIN_AT..PROTEIN_AT + 8].copy_from_slice(&record.protein.to_le_bytes());
    buf[CARBOHYDRATE_AT..CARBOHYDRATE_AT + 8].copy_from_slice(&record.carbohydrate.to_le_bytes());
    put_str(
        &mut buf[CATEGORY_AT..CATEGORY_AT + CATEGORY_WIDTH],
        truncate_bounded(&record.category, MAX_CATEGORY_BYTES),
    );
    buf
}

/// Decode one record. Strings end at the first NUL; invalid UTF-8 is
/// replaced rather than rejected.
pub fn decode_record(buf: &[u8; RECORD_SIZE]) -> FoodRecord {
    FoodRecord::new(
        i32::from_le_bytes(array_at(buf, ID_AT)),
        &get_str(&buf[DESCRIPTION_AT..DESCRIPTION_AT + DESCRIPTION_WIDTH]),
        f64::from_le_bytes(array_at(buf, MOISTURE_AT)),
        i32::from_le_bytes(array_at(buf, ENERGY_AT)),
        f64::from_le_bytes(array_at(buf, PROTEIN_AT)),
        f64::from_le_bytes(array_at(buf, CARBOHYDRATE_AT)),
        &get_str(&buf[CATEGORY_AT..CATEGORY_AT + CATEGORY_WIDTH]),
    )
}

/// Decode every complete record in `bytes`.
///
/// A trailing partial record is ignored.
pub fn decode_records(bytes: &[u8]) -> Vec<FoodRecord> {
    let chunks = bytes.chunks_exact(RECORD_SIZE);
    let trailing = chunks.remainder().len();
    if trailing > 0 {
        tracing::warn!(
            trailing,
            record_size = RECORD_SIZE,
            "ignoring partial record at end of data file"
        );
    }
    chunks
        .filter_map(|chunk| <&[u8; RECORD_SIZE]>::try_from(chunk).ok())
        .map(decode_record)
        .collect()
}

pub fn encode_records<'a, I>(records: I) -> Vec<u8>
where
    I: IntoIterator<Item = &'a FoodRecord>,
{
    records.into_iter().flat_map(encode_record).collect()
}

/// Read a binary data file into a catalog.
pub fn load_catalog(path: &Path, removal: RemovalStrategy) -> Result<CategoryCatalog> {
    if !path.exists() {
        return Err(CatalogError::DataNotFound {
            path: path.to_path_buf(),
        });
    }
    let bytes = fs::read(path)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "reading data file");
    CategoryCatalog::bulk_load(decode_records(&bytes), removal)
}

/// Write the catalog to `path` in (category, description) order.
pub fn save_catalog(catalog: &CategoryCatalog, path: &Path) -> Result<()> {
    save_records(&catalog.to_records()?, path)
}

/// Write records to `path`, replacing it atomically.
///
/// The bytes go to a uniquely named temporary file beside `path`, which is
/// then renamed over it, so neighbouring files are never touched.
pub fn save_records(records: &[FoodRecord], path: &Path) -> Result<()> {
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent)?;
            parent
        }
        None => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(&encode_records(records))?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| e.error)?;

    tracing::debug!(path = %path.display(), records = records.len(), "data file written");
    Ok(())
}

fn put_str(field: &mut [u8], value: &str) {
    let bytes = value.as_bytes();
    let len = bytes.len().min(field.len() - 1);
    field[..len].copy_from_slice(&bytes[..len]);
}

fn get_str(field: &[u8]) -> String {
    let end = field.iter().position(|b| *b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}

fn array_at<const N: usize>(buf: &[u8; RECORD_SIZE], at: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&buf[at..at + N]);
    out
}

//! On-disk index format and file coordination.
//!
//! The index file is a bincode blob holding the vectors plus, per position, the
//! document id and content hash they were built from. Writers take an
//! exclusive advisory lock on `<index>.lock`, write a temp file in the same
//! directory and rename it over the target; readers take a shared lock.
//! This prevents torn files, not lost updates: two stores that load the same
//! file and then persist will each overwrite the other's additions. Keep a
//! single writer per index path.

use fd_lock::RwLock;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use lexaid_core::error::{Error, Result};

use crate::index::FlatIndex;

const MAGIC: [u8; 4] = *b"LXIX";
const FORMAT_VERSION: u32 = 1;

/// What the index file remembers about the document behind each position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub document_id: String,
    pub content_hash: String,
}

#[derive(Serialize, Deserialize)]
struct IndexFile {
    magic: [u8; 4],
    version: u32,
    dim: u64,
    vectors: Vec<f32>,
    catalog: Vec<CatalogEntry>,
}

pub fn lock_path(index_path: &Path) -> PathBuf {
    let mut name = index_path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".lock");
    index_path.with_file_name(name)
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn open_lock_file(index_path: &Path) -> Result<File> {
    fs::create_dir_all(parent_dir(index_path))?;
    Ok(OpenOptions::new().create(true).truncate(false).read(true).write(true).open(lock_path(index_path))?)
}

/// Reads an existing index, or `None` when no file exists at `path`.
pub fn read_index(path: &Path) -> Result<Option<(FlatIndex, Vec<CatalogEntry>)>> {
    if !path.exists() { return Ok(None); }
    let lock = RwLock::new(open_lock_file(path)?);
    let _guard = lock.read()?;
    let bytes = fs::read(path)?;
    let corrupt = |reason: String| Error::CorruptIndex { path: path.to_path_buf(), reason };
    let file: IndexFile = bincode::deserialize(&bytes).map_err(|e| corrupt(e.to_string()))?;
    if file.magic != MAGIC { return Err(corrupt("bad magic".into())); }
    if file.version != FORMAT_VERSION { return Err(corrupt(format!("unsupported format version {}", file.version))); }
    let index = FlatIndex::from_parts(file.dim as usize, file.vectors).map_err(|e| corrupt(e.to_string()))?;
    if index.len() != file.catalog.len() {
        return Err(corrupt(format!("{} vectors but {} catalog entries", index.len(), file.catalog.len())));
    }
    Ok(Some((index, file.catalog)))
}

/// Atomically replaces the file at `path` with `index` and its catalog.
pub fn write_index(path: &Path, index: &FlatIndex, catalog: &[CatalogEntry]) -> Result<()> {
    if index.len() != catalog.len() {
        return Err(Error::Operation(format!("refusing to persist {} vectors with {} catalog entries", index.len(), catalog.len())));
    }
    let mut lock = RwLock::new(open_lock_file(path)?);
    let _guard = lock.write()?;
    let file = IndexFile {
        magic: MAGIC,
        version: FORMAT_VERSION,
        dim: index.dim() as u64,
        vectors: index.raw().to_vec(),
        catalog: catalog.to_vec(),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(parent_dir(path))?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        bincode::serialize_into(&mut writer, &file).map_err(|e| Error::Operation(format!("encoding index: {}", e)))?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Loads the index at `path`, or creates an empty `dimension`-d index when none exists.
///
/// A persisted dimension that differs from `dimension` is only logged; adds and
/// searches with `dimension`-d vectors will then fail with a dimension mismatch.
pub fn load_or_create(path: &Path, dimension: usize) -> Result<(FlatIndex, Vec<CatalogEntry>)> {
    match read_index(path)? {
        Some((index, catalog)) => {
            if index.dim() != dimension {
                tracing::warn!(path = %path.display(), persisted = index.dim(), configured = dimension, "index dimension differs from configuration");
            }
            tracing::info!(path = %path.display(), vectors = index.len(), "loaded vector index");
            Ok((index, catalog))
        }
        None => {
            tracing::info!(path = %path.display(), dimension, "initialized a new vector index");
            Ok((FlatIndex::new(dimension), Vec::new()))
        }
    }
}

//! Catalog snapshot persistence
//!
//! The whole catalog is written as one JSON document:
//!
//! ```text
//! { "version": 1, "checksum": <crc32 of the encoded tables>, "tables": { name: metadata } }
//! ```
//!
//! Tables are encoded in name order so the checksum is stable.

use crate::catalog::Catalog;
use crate::catalog::error::{CatalogError, CatalogResult};
use crate::table::TableMetadata;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    version: u32,
    checksum: u32,
    tables: BTreeMap<String, TableMetadata>,
}

/// Sibling temp path: `catalog.json` becomes `catalog.json.tmp`
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn tables_checksum(tables: &BTreeMap<String, TableMetadata>) -> CatalogResult<u32> {
    let encoded = serde_json::to_vec(tables)?;
    Ok(crc32fast::hash(&encoded))
}

impl Catalog {
    /// Write the catalog to `path`, replacing any previous snapshot
    ///
    /// The document is written to a sibling temp file, synced, and renamed
    /// into place.
    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> CatalogResult<()> {
        let path = path.as_ref();
        let tables: BTreeMap<String, TableMetadata> = self
            .iter()
            .map(|(name, meta)| (name.clone(), meta.clone()))
            .collect();

        let file = SnapshotFile {
            version: SNAPSHOT_VERSION,
            checksum: tables_checksum(&tables)?,
            tables,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = temp_path(path);
        {
            let mut tmp = File::create(&tmp_path)?;
            tmp.write_all(&serde_json::to_vec_pretty(&file)?)?;
            tmp.sync_all()?;
        }
        fs::rename(&tmp_path, path)?;

        debug!(path = %path.display(), tables = file.tables.len(), "catalog snapshot written");
        Ok(())
    }

    /// Load a catalog previously written by [`Catalog::save_snapshot`]
    ///
    /// Every table is checked with [`TableMetadata::validate`] using
    /// `strict`; the first table that fails is reported as
    /// [`CatalogError::InvalidTable`].
    pub fn load_snapshot(path: impl AsRef<Path>, strict: bool) -> CatalogResult<Self> {
        let path = path.as_ref();
        let content = fs::read(path)?;
        let file: SnapshotFile = serde_json::from_slice(&content)?;

        if file.version != SNAPSHOT_VERSION {
            return Err(CatalogError::UnsupportedVersion(file.version));
        }

        let checksum = tables_checksum(&file.tables)?;
        if checksum != file.checksum {
            return Err(CatalogError::Corrupted(format!(
                "checksum mismatch in {:?}: expected {:#010x}, found {:#010x}",
                path, file.checksum, checksum
            )));
        }

        let mut catalog = Catalog::with_capacity(file.tables.len());
        for (name, meta) in file.tables {
            meta.validate(strict)
                .map_err(|e| CatalogError::InvalidTable {
                    table: name.clone(),
                    reason: e.to_string(),
                })?;
            catalog.insert(&name, meta)?;
        }

        debug!(path = %path.display(), tables = catalog.len(), "catalog snapshot loaded");
        Ok(catalog)
    }
}

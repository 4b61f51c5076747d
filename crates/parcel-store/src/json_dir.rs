use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::entity::EntityType;
use crate::error::{StoreError, StoreResult};
use crate::record::StoredRecord;
use crate::traits::RecordStore;

/// Directory-backed record store: one JSON file per record.
///
/// Layout: `<root>/<EntityType>/<escaped-id>.json`. Each write goes to a
/// temporary file in the same directory and is renamed into place, so a
/// reader never observes a partially written record.
#[derive(Debug, Clone)]
pub struct JsonDirRecordStore {
    root: PathBuf,
}

impl JsonDirRecordStore {
    /// Open (creating if necessary) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entity_dir(&self, entity: EntityType) -> PathBuf {
        self.root.join(entity.as_str())
    }

    fn record_path(&self, entity: EntityType, id: &str) -> PathBuf {
        self.entity_dir(entity).join(format!("{}.json", escape_id(id)))
    }

    fn read_file(path: &Path) -> StoreResult<StoredRecord> {
        let bytes = fs::read(path)?;
        serde_json::from_slice(&bytes).map_err(|e| StoreError::CorruptRecord {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

impl RecordStore for JsonDirRecordStore {
    fn get(&self, entity: EntityType, id: &str) -> StoreResult<Option<StoredRecord>> {
        let path = self.record_path(entity, id);
        if !path.exists() {
            return Ok(None);
        }
        Self::read_file(&path).map(Some)
    }

    fn set(&self, record: StoredRecord) -> StoreResult<()> {
        if record.id.is_empty() {
            return Err(StoreError::EmptyId(record.entity));
        }
        let dir = self.entity_dir(record.entity);
        fs::create_dir_all(&dir)?;
        let path = self.record_path(record.entity, &record.id);

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut tmp, &record)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;

        debug!(entity = %record.entity, id = %record.id, path = %path.display(), "record written");
        Ok(())
    }

    fn list(&self, entity: EntityType) -> StoreResult<Vec<StoredRecord>> {
        let dir = self.entity_dir(entity);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut records = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                records.push(Self::read_file(&path)?);
            }
        }
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }
}

/// Map an id onto a portable file stem.
///
/// ASCII alphanumerics plus `-`, `_` and `.` pass through; every other byte
/// becomes `%XX`. Distinct ids always map to distinct stems.
fn escape_id(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for byte in id.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' => out.push(byte as char),
            b'.' if !out.is_empty() => out.push('.'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

//! [`ResultStore`] backed by a directory of pretty-printed JSON files.
//!
//! Each key maps to `<root>/<slug>.json`; intermediate directories are created
//! on write.
use std::path::PathBuf;

use cos_core::{AnalysisRecord, ResultStore, StoreError, StoreKey};

#[derive(Debug, Clone)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &StoreKey) -> PathBuf {
        let mut path = self.root.clone();
        path.push(format!("{}.json", key.slug()));
        path
    }
}

impl ResultStore for JsonDirStore {
    fn get(&self, key: &StoreKey) -> Result<Option<AnalysisRecord>, StoreError> {
        let path = self.path_for(key);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    key: key.slug(),
                    source,
                });
            }
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                key: key.slug(),
                source,
            })
    }

    fn put(&mut self, key: &StoreKey, record: &AnalysisRecord) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let text = serde_json::to_string_pretty(record).map_err(|source| StoreError::Corrupt {
            key: key.slug(),
            source,
        })?;
        let io_err = |source| StoreError::Io {
            key: key.slug(),
            source,
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(io_err)?;
        }
        std::fs::write(&path, text).map_err(io_err)?;
        log::debug!("stored {} at {}", key.slug(), path.display());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use cos_core::SkipReason;

    use super::*;

    fn key(path: &[&str]) -> StoreKey {
        StoreKey {
            league: "Mini Football League".to_owned(),
            season: Some("2023".to_owned()),
            group_path: path.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    #[test]
    fn missing_record_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonDirStore::new(dir.path());
        assert_eq!(store.get(&key(&["East"])).expect("get"), None);
    }

    #[test]
    fn put_then_get_through_nested_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = JsonDirStore::new(dir.path());
        let k = key(&["East Conference", "North"]);
        let record = AnalysisRecord::Skipped {
            reason: SkipReason::BudgetExhausted { steps: 12 },
        };
        store.put(&k, &record).expect("put");

        let file = dir
            .path()
            .join("mini_football_league/2023/east_conference/north.json");
        assert!(file.is_file(), "expected {}", file.display());
        assert_eq!(store.get(&k).expect("get"), Some(record));
    }

    #[test]
    fn put_replaces_existing_record() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = JsonDirStore::new(dir.path());
        let k = key(&[]);
        store.put(&k, &AnalysisRecord::NoCircle).expect("put");
        let record = AnalysisRecord::Skipped {
            reason: SkipReason::TooLarge { teams: 70, max: 64 },
        };
        store.put(&k, &record).expect("put again");
        assert_eq!(store.get(&k).expect("get"), Some(record));
    }

    #[test]
    fn dotted_group_names_keep_their_full_file_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = JsonDirStore::new(dir.path());
        store
            .put(&key(&["St. Louis"]), &AnalysisRecord::NoCircle)
            .expect("put");
        assert!(
            dir.path()
                .join("mini_football_league/2023/st._louis.json")
                .is_file()
        );
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonDirStore::new(dir.path());
        let k = key(&["West"]);
        let path = store.path_for(&k);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(&path, "{not json").expect("write");
        assert!(matches!(store.get(&k), Err(StoreError::Corrupt { .. })));
    }
}

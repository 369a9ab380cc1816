//! Key-value contract for persisting analysis results.
//!
//! Recomputing a confirmed circle is wasted work: once every link is a
//! finished game, the circle can never disappear. This module defines the
//! [`ResultStore`] trait that [`crate::analysis::analyze_group_cached`]
//! receives as an injected dependency, keeping `cos-core` free of filesystem
//! access. The CLI wires in a directory of JSON files; [`MemoryStore`] serves
//! tests and embedders.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::SkipReason;
use crate::assembler::CircleSummary;
use crate::league::{League, NodeIdx};

/// Errors reported by a [`ResultStore`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing medium failed.
    #[error("result store I/O failed for {key}: {source}")]
    Io {
        /// Slug of the key being accessed.
        key: String,
        #[source]
        source: std::io::Error,
    },
    /// A stored record could not be encoded or decoded.
    #[error("result store record for {key} is corrupt: {source}")]
    Corrupt {
        /// Slug of the key being accessed.
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Identifies one group's results within one season.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoreKey {
    pub league: String,
    #[serde(default)]
    pub season: Option<String>,
    /// Group names below the league root; empty for the root itself.
    #[serde(default)]
    pub group_path: Vec<String>,
}

impl StoreKey {
    /// Key for `group`, named by its path from the league root.
    pub fn for_group(league: &League, season: Option<&str>, group: NodeIdx) -> Self {
        let mut path = league.group_path(group).into_iter();
        let root = path.next().unwrap_or_default().to_owned();
        Self {
            league: root,
            season: season.map(str::to_owned),
            group_path: path.map(str::to_owned).collect(),
        }
    }

    /// Filesystem-safe relative path: each segment lowercased with spaces
    /// turned into underscores, segments joined by `/`.
    pub fn slug(&self) -> String {
        std::iter::once(self.league.as_str())
            .chain(self.season.as_deref())
            .chain(self.group_path.iter().map(String::as_str))
            .map(slug_segment)
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn slug_segment(segment: &str) -> String {
    let s: String = segment
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .flat_map(char::to_lowercase)
        .collect();
    if matches!(s.as_str(), "" | "." | "..") {
        "_".to_owned()
    } else {
        s
    }
}

/// Persisted outcome of analyzing one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisRecord {
    /// A confirmed circle.
    Circle { circle: CircleSummary },
    /// Circles that could still form, possibly truncated for reporting.
    Potential {
        circles: Vec<CircleSummary>,
        /// Number of potential circles found before truncation.
        total: usize,
    },
    NoCircle,
    /// The group was not searched to completion.
    Skipped { reason: SkipReason },
}

impl AnalysisRecord {
    /// Returns `true` for a confirmed circle, the only outcome worth caching.
    pub fn is_circle(&self) -> bool {
        matches!(self, Self::Circle { .. })
    }
}

/// Storage for [`AnalysisRecord`]s.
///
/// Implementations decide the medium. The analysis driver never relies on a
/// record surviving between runs; a store that forgets everything is valid.
pub trait ResultStore {
    /// Look up a previously stored record.
    fn get(&self, key: &StoreKey) -> Result<Option<AnalysisRecord>, StoreError>;

    /// Store `record`, replacing anything under the same key.
    fn put(&mut self, key: &StoreKey, record: &AnalysisRecord) -> Result<(), StoreError>;
}

/// In-memory [`ResultStore`] keyed by slug.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<String, AnalysisRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ResultStore for MemoryStore {
    fn get(&self, key: &StoreKey) -> Result<Option<AnalysisRecord>, StoreError> {
        Ok(self.records.get(&key.slug()).cloned())
    }

    fn put(&mut self, key: &StoreKey, record: &AnalysisRecord) -> Result<(), StoreError> {
        self.records.insert(key.slug(), record.clone());
        Ok(())
    }
}

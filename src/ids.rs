//! Persisted integer-ID allocation for tags, categories, and blog posts.
//!
//! Published URLs embed these IDs, so the allocation rules are a frozen
//! contract:
//!
//! - A key, once assigned an ID, keeps it for the lifetime of the data file.
//!   IDs are never renumbered or recycled, even after the content is deleted.
//! - Positive IDs are handed out in first-seen order during a sorted batch
//!   pass (see [`crate::generate`]), which makes assignment deterministic for
//!   a fixed content set. Changing the batch order would renumber everything.
//! - Blog slugs matching a test-content marker draw from a separate negative
//!   counter (-1, -2, ...) so experimental posts stay out of production ID
//!   ranges. Classification happens once, at first registration.
//!
//! ## Storage
//!
//! One JSON record per domain (`tag-ids.json`, `category-ids.json`,
//! `blog-ids.json`) in the data directory:
//!
//! ```json
//! {
//!   "nextId": 5,
//!   "nextTestId": -2,
//!   "mappings": { "hello-world": 1, "test-my-experiment": -1 },
//!   "lastUpdated": "2026-08-07T12:00:00+09:00",
//!   "note": "positive: published posts, negative: test/experimental posts"
//! }
//! ```
//!
//! `nextTestId` appears only in the blog record. A record that fails to parse
//! is recovered as an empty mapping — allocation must never be blocked by a
//! corrupt file — but the caller sees [`LoadOutcome::RecoveredEmpty`] and is
//! expected to surface it: previously issued IDs are gone, which is a
//! data-loss event, not a routine condition.
//!
//! ## Allocators vs. indexes
//!
//! [`IdMapper`]/[`BlogIdMapper`] are the write side, used by the
//! `generate-ids` batch pass. [`IdIndex`]/[`BlogIdIndex`] are the read side
//! the site consumes during static generation: they refuse to load when the
//! record is missing (generation hasn't run) and treat "get ID for name" as
//! a must-exist lookup.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Slug markers that classify a blog post as test/experimental content.
///
/// The match is `contains` as well as `starts_with`, exactly as published:
/// a slug like `contest-results` (which contains `test-`) classifies as test
/// content. Stricter matching would renumber existing content.
pub const TEST_SLUG_MARKERS: &[&str] = &["test-", "sample-", "demo-", "experiment-"];

/// Whether a slug is test/experimental content per [`TEST_SLUG_MARKERS`].
pub fn is_test_slug(slug: &str) -> bool {
    TEST_SLUG_MARKERS
        .iter()
        .any(|marker| slug.contains(marker) || slug.starts_with(marker))
}

#[derive(Error, Debug)]
pub enum IdStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("ID mapping file not found: {path} — run `mdx-keeper generate-ids` first")]
    MappingFileMissing { path: PathBuf },
    #[error("no ID registered for {key:?} — run `mdx-keeper generate-ids` to assign one")]
    UnknownKey { key: String },
}

/// How a persisted record made it into memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file existed and parsed.
    Loaded,
    /// No file yet — a first run, counters at their initial values.
    Missing,
    /// The file existed but could not be parsed. The mapper starts empty;
    /// every previously issued ID is lost and needs investigating.
    RecoveredEmpty,
}

/// On-disk shape of an ID record. Field names match the published JSON.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdRecord {
    next_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_test_id: Option<i64>,
    mappings: BTreeMap<String, i64>,
    last_updated: String,
    note: String,
}

/// Incrementally-assigned positive ID allocator for one domain.
#[derive(Debug)]
pub struct IdMapper {
    path: PathBuf,
    note: String,
    mappings: BTreeMap<String, i64>,
    next_id: i64,
    newly_assigned: usize,
}

impl IdMapper {
    /// Load a record from `path`, or start fresh if it doesn't exist.
    ///
    /// Corrupt JSON recovers to an empty mapping rather than failing — the
    /// outcome tag tells the caller which of the three cases happened. Only
    /// real IO errors (permissions, etc.) are returned as errors.
    pub fn load(path: &Path, note: &str) -> Result<(Self, LoadOutcome), IdStoreError> {
        let (record, outcome) = read_record(path)?;
        let mut mapper = Self {
            path: path.to_path_buf(),
            note: note.to_string(),
            mappings: BTreeMap::new(),
            next_id: 1,
            newly_assigned: 0,
        };
        if let Some(record) = record {
            mapper.mappings = record.mappings;
            // Clamp so a hand-edited or partially-written counter can never
            // re-issue an already-assigned ID.
            let floor = mapper.mappings.values().copied().max().unwrap_or(0) + 1;
            mapper.next_id = record.next_id.max(floor).max(1);
        }
        Ok((mapper, outcome))
    }

    /// Return the ID for `key`, assigning the next positive ID if new.
    ///
    /// Idempotent: a known key returns its existing ID and the counter does
    /// not move.
    pub fn register(&mut self, key: &str) -> i64 {
        if let Some(&id) = self.mappings.get(key) {
            return id;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.newly_assigned += 1;
        self.mappings.insert(key.to_string(), id);
        id
    }

    /// Write the full record back as a single write.
    pub fn save(&self, timestamp: &str) -> Result<(), IdStoreError> {
        let record = IdRecord {
            next_id: self.next_id,
            next_test_id: None,
            mappings: self.mappings.clone(),
            last_updated: timestamp.to_string(),
            note: self.note.clone(),
        };
        write_record(&self.path, &record)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Count of IDs assigned since load.
    pub fn newly_assigned(&self) -> usize {
        self.newly_assigned
    }
}

/// ID allocator for blog posts: positive IDs for published content, negative
/// IDs for test/experimental slugs.
#[derive(Debug)]
pub struct BlogIdMapper {
    path: PathBuf,
    note: String,
    mappings: BTreeMap<String, i64>,
    next_id: i64,
    next_test_id: i64,
    newly_assigned: usize,
}

impl BlogIdMapper {
    /// Load a record from `path`, or start fresh. See [`IdMapper::load`].
    pub fn load(path: &Path, note: &str) -> Result<(Self, LoadOutcome), IdStoreError> {
        let (record, outcome) = read_record(path)?;
        let mut mapper = Self {
            path: path.to_path_buf(),
            note: note.to_string(),
            mappings: BTreeMap::new(),
            next_id: 1,
            next_test_id: -1,
            newly_assigned: 0,
        };
        if let Some(record) = record {
            mapper.mappings = record.mappings;
            let pos_floor = mapper
                .mappings
                .values()
                .copied()
                .filter(|&id| id > 0)
                .max()
                .unwrap_or(0)
                + 1;
            let neg_ceil = mapper
                .mappings
                .values()
                .copied()
                .filter(|&id| id < 0)
                .min()
                .unwrap_or(0)
                - 1;
            mapper.next_id = record.next_id.max(pos_floor).max(1);
            mapper.next_test_id = record.next_test_id.unwrap_or(-1).min(neg_ceil).min(-1);
        }
        Ok((mapper, outcome))
    }

    /// Return the ID for `slug`, assigning from the counter its
    /// classification selects if new.
    pub fn register(&mut self, slug: &str) -> i64 {
        if let Some(&id) = self.mappings.get(slug) {
            return id;
        }
        let id = if is_test_slug(slug) {
            let id = self.next_test_id;
            self.next_test_id -= 1;
            id
        } else {
            let id = self.next_id;
            self.next_id += 1;
            id
        };
        self.newly_assigned += 1;
        self.mappings.insert(slug.to_string(), id);
        id
    }

    /// Write the full record back as a single write.
    pub fn save(&self, timestamp: &str) -> Result<(), IdStoreError> {
        let record = IdRecord {
            next_id: self.next_id,
            next_test_id: Some(self.next_test_id),
            mappings: self.mappings.clone(),
            last_updated: timestamp.to_string(),
            note: self.note.clone(),
        };
        write_record(&self.path, &record)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn newly_assigned(&self) -> usize {
        self.newly_assigned
    }

    /// Count of published (positive-ID) posts.
    pub fn regular_count(&self) -> usize {
        self.mappings.values().filter(|&&id| id > 0).count()
    }

    /// Count of test/experimental (negative-ID) posts.
    pub fn test_count(&self) -> usize {
        self.mappings.values().filter(|&&id| id < 0).count()
    }
}

fn read_record(path: &Path) -> Result<(Option<IdRecord>, LoadOutcome), IdStoreError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok((None, LoadOutcome::Missing));
        }
        Err(e) => return Err(e.into()),
    };
    match serde_json::from_str::<IdRecord>(&content) {
        Ok(record) => Ok((Some(record), LoadOutcome::Loaded)),
        Err(_) => Ok((None, LoadOutcome::RecoveredEmpty)),
    }
}

fn write_record(path: &Path, record: &IdRecord) -> Result<(), IdStoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(record)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Read-only bidirectional view of a persisted ID record.
///
/// This is what the site uses at static-generation time, after
/// `generate-ids` has run. Loading fails loudly when the record is missing;
/// [`IdIndex::get_id`] treats lookups as must-exist, because route generation
/// relies on every known name having an ID.
#[derive(Debug)]
pub struct IdIndex {
    name_to_id: HashMap<String, i64>,
    id_to_name: HashMap<i64, String>,
}

impl IdIndex {
    /// Load an index from a persisted record.
    pub fn load(path: &Path) -> Result<Self, IdStoreError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(IdStoreError::MappingFileMissing {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        let record: IdRecord = serde_json::from_str(&content)?;
        let mut index = Self {
            name_to_id: HashMap::with_capacity(record.mappings.len()),
            id_to_name: HashMap::with_capacity(record.mappings.len()),
        };
        for (name, id) in record.mappings {
            index.id_to_name.insert(id, name.clone());
            index.name_to_id.insert(name, id);
        }
        Ok(index)
    }

    /// ID for a name. Must exist — callers run after `generate-ids`.
    pub fn get_id(&self, name: &str) -> Result<i64, IdStoreError> {
        self.name_to_id
            .get(name)
            .copied()
            .ok_or_else(|| IdStoreError::UnknownKey {
                key: name.to_string(),
            })
    }

    /// Name for an ID, if one was ever assigned.
    pub fn name_by_id(&self, id: i64) -> Option<&str> {
        self.id_to_name.get(&id).map(String::as_str)
    }

    /// ID for a name as an absent-value lookup.
    pub fn id_by_name(&self, name: &str) -> Option<i64> {
        self.name_to_id.get(name).copied()
    }

    /// All IDs in ascending numeric order.
    pub fn all_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.id_to_name.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// All names in lexicographic order.
    pub fn all_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.name_to_id.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.name_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name_to_id.is_empty()
    }
}

/// Read-only view of the blog record, with the positive/negative split the
/// listing pages use to separate published posts from test content.
#[derive(Debug)]
pub struct BlogIdIndex {
    inner: IdIndex,
}

impl BlogIdIndex {
    pub fn load(path: &Path) -> Result<Self, IdStoreError> {
        Ok(Self {
            inner: IdIndex::load(path)?,
        })
    }

    /// ID for a slug. Must exist — see [`IdIndex::get_id`].
    pub fn get_id(&self, slug: &str) -> Result<i64, IdStoreError> {
        self.inner.get_id(slug)
    }

    pub fn slug_by_id(&self, id: i64) -> Option<&str> {
        self.inner.name_by_id(id)
    }

    pub fn id_by_slug(&self, slug: &str) -> Option<i64> {
        self.inner.id_by_name(slug)
    }

    pub fn all_ids(&self) -> Vec<i64> {
        self.inner.all_ids()
    }

    pub fn all_slugs(&self) -> Vec<&str> {
        self.inner.all_names()
    }

    /// Published post IDs, ascending (1, 2, ...).
    pub fn regular_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self
            .inner
            .id_to_name
            .keys()
            .copied()
            .filter(|&id| id > 0)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Test-content IDs, descending (-1, -2, ...).
    pub fn test_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self
            .inner
            .id_to_name
            .keys()
            .copied()
            .filter(|&id| id < 0)
            .collect();
        ids.sort_unstable_by(|a, b| b.cmp(a));
        ids
    }
}

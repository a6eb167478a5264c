//! In-memory name search index with fuzzy matching.
//!
//! Holds a projection of every searchable entity name and its identifier so
//! that typeahead-style search never hits the database. The index is loaded
//! in bulk at startup and kept in sync by write services, which call
//! [`NameSearchIndex::add`] / [`NameSearchIndex::remove`] after their own
//! database writes commit.
//!
//! # Concurrency
//!
//! The backing container is an `Arc<DashMap>` behind an `RwLock`. Point
//! mutations (`add`, `remove`) clone the `Arc` under the read lock and go
//! through the DashMap's own thread-safe primitives, so they are
//! linearizable with respect to each other. A bulk reload builds a fresh
//! map off to the side and swaps the `Arc` under the write lock in one
//! step: readers observe either the fully-old or the fully-new index, never
//! a mix. An `add`/`remove` racing an in-flight reload may land on the
//! container being replaced and be lost; callers needing strict consistency
//! across a reload must serialize reloads against writes themselves.

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Queries shorter than this (after trimming) return no results.
pub const MIN_QUERY_LEN: usize = 3;

/// Default similarity cutoff for fuzzy matches, on a 0.0..=1.0 scale.
pub const DEFAULT_SCORE_CUTOFF: f64 = 0.6;

/// A searchable name and the identifier of the entity it belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameEntry {
    /// Display name, unique case-insensitively within the index.
    pub name: String,
    /// Identifier of the underlying entity.
    pub id: Uuid,
}

impl NameEntry {
    /// Create a new entry.
    pub fn new(name: impl Into<String>, id: Uuid) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }
}

/// Similarity scoring strategy for fuzzy search.
///
/// Implementations return a similarity in `0.0..=1.0`, where 1.0 is an
/// exact match. Scoring must be case-insensitive.
pub trait NameScorer: Send + Sync {
    fn score(&self, query: &str, candidate: &str) -> f64;
}

/// Levenshtein-based scorer: `1 - distance / max_len`, case-folded.
///
/// Tolerates minor misspellings and transpositions; unrelated strings score
/// near zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct NormalizedLevenshtein;

impl NameScorer for NormalizedLevenshtein {
    fn score(&self, query: &str, candidate: &str) -> f64 {
        strsim::normalized_levenshtein(&query.to_lowercase(), &candidate.to_lowercase())
    }
}

/// Bulk source of name entries, typically backed by the metadata store.
#[async_trait]
pub trait NameSource: Send + Sync {
    /// Fetch every (name, id) pair, ordered by name.
    async fn fetch_names(&self) -> crate::Result<Vec<NameEntry>>;
}

/// Thread-safe read-through index over entity names.
pub struct NameSearchIndex {
    entries: RwLock<Arc<DashMap<String, NameEntry>>>,
    scorer: Box<dyn NameScorer>,
    score_cutoff: f64,
}

impl NameSearchIndex {
    /// Create an empty index with the default Levenshtein scorer.
    pub fn new(score_cutoff: f64) -> Self {
        Self::with_scorer(Box::new(NormalizedLevenshtein), score_cutoff)
    }

    /// Create an empty index with a custom scoring strategy.
    pub fn with_scorer(scorer: Box<dyn NameScorer>, score_cutoff: f64) -> Self {
        Self {
            entries: RwLock::new(Arc::new(DashMap::new())),
            scorer,
            score_cutoff,
        }
    }

    /// Clone the currently published container.
    fn current(&self) -> Arc<DashMap<String, NameEntry>> {
        let guard = self.entries.read().unwrap_or_else(|poisoned| {
            tracing::warn!("name index RwLock was poisoned, recovering with into_inner()");
            poisoned.into_inner()
        });
        Arc::clone(&guard)
    }

    /// Publish a new container, replacing the old one atomically.
    fn publish(&self, map: DashMap<String, NameEntry>) {
        let mut guard = self.entries.write().unwrap_or_else(|poisoned| {
            tracing::warn!("name index RwLock was poisoned, recovering with into_inner()");
            poisoned.into_inner()
        });
        *guard = Arc::new(map);
    }

    /// Reload the index from a bulk source, atomically replacing all entries.
    ///
    /// On source failure the previously published index is left untouched.
    /// The same holds if the future is dropped mid-fetch: the swap only
    /// happens after the read completes.
    pub async fn load_from_source(&self, source: &dyn NameSource) -> crate::Result<()> {
        let rows = source.fetch_names().await?;
        let count = rows.len();

        let fresh = DashMap::with_capacity(count);
        for entry in rows {
            fresh.insert(entry.name.to_lowercase(), entry);
        }
        self.publish(fresh);

        tracing::info!(entries = count, "name index reloaded");
        Ok(())
    }

    /// Insert an entry unless the name is already present (case-insensitive).
    ///
    /// First writer wins: an existing identifier for a name is never
    /// overwritten.
    pub fn add(&self, name: &str, id: Uuid) {
        let map = self.current();
        map.entry(name.to_lowercase())
            .or_insert_with(|| NameEntry::new(name, id));
    }

    /// Remove the entry for a name, if present.
    pub fn remove(&self, name: &str) {
        let map = self.current();
        map.remove(&name.to_lowercase());
    }

    /// Snapshot of every entry, ordered by name (case-insensitive).
    pub fn get_all(&self) -> Vec<NameEntry> {
        let map = self.current();
        let mut entries: Vec<NameEntry> = map.iter().map(|kv| kv.value().clone()).collect();
        entries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        entries
    }

    /// Case-insensitive exact lookup.
    pub fn try_get(&self, name: &str) -> Option<NameEntry> {
        let map = self.current();
        map.get(&name.to_lowercase()).map(|kv| kv.value().clone())
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.current().len()
    }

    /// Whether the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.current().is_empty()
    }

    /// Fuzzy search, best match first.
    ///
    /// Trimmed queries shorter than [`MIN_QUERY_LEN`] return nothing.
    /// Candidates are scored in case-insensitive alphabetical order and
    /// ranked with a stable sort, so equal scores keep that order; an exact
    /// case-insensitive match always comes first.
    pub fn search(&self, query: &str) -> Vec<NameEntry> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }
        let query_lower = query.to_lowercase();

        let mut scored: Vec<(bool, f64, NameEntry)> = self
            .get_all()
            .into_iter()
            .filter_map(|entry| {
                let exact = entry.name.to_lowercase() == query_lower;
                let score = self.scorer.score(query, &entry.name);
                if exact || score >= self.score_cutoff {
                    Some((exact, score, entry))
                } else {
                    None
                }
            })
            .collect();

        // Stable sort: exact matches first, then by score descending, with
        // the alphabetical candidate order breaking remaining ties.
        scored.sort_by(|a, b| {
            b.0.cmp(&a.0)
                .then_with(|| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal))
        });

        scored.into_iter().map(|(_, _, entry)| entry).collect()
    }
}

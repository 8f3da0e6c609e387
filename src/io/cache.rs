//! Content-addressed parse cache.
//!
//! Parsed captures are memoized by the SHA-256 of the file bytes, not the
//! path, so re-analyzing the same file (or a copy of it) never re-parses.
//! Cached values are shared via `Arc` so callers can hold results across
//! cache mutations.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::error::AppError;
use crate::io::hash::{FileDigest, hash_file};
use crate::io::ingest::{IngestedTrajectory, load_trajectory};

/// One cache lookup's outcome.
#[derive(Debug, Clone)]
pub struct CachedParse {
    pub digest: FileDigest,
    pub ingest: Arc<IngestedTrajectory>,
    /// Whether this lookup was served from the cache.
    pub hit: bool,
}

/// In-memory parse cache for one run.
#[derive(Debug, Default)]
pub struct ParseCache {
    entries: HashMap<FileDigest, Arc<IngestedTrajectory>>,
    hits: usize,
    misses: usize,
}

impl ParseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash `path` and return its parsed trajectory, parsing at most once per
    /// distinct content.
    pub fn get_or_load(&mut self, path: &Path) -> Result<CachedParse, AppError> {
        let digest = hash_file(path)?;

        if let Some(ingest) = self.entries.get(&digest) {
            self.hits += 1;
            return Ok(CachedParse {
                digest,
                ingest: Arc::clone(ingest),
                hit: true,
            });
        }

        let ingest = Arc::new(load_trajectory(path)?);
        self.entries.insert(digest.clone(), Arc::clone(&ingest));
        self.misses += 1;

        Ok(CachedParse {
            digest,
            ingest,
            hit: false,
        })
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

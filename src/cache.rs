//! On-disk cache of search result pages
//!
//! Each entry is one JSON file named `cache_<md5(term)>_<retstart>.json`
//! holding the parsed records of a page plus the esearch metadata needed to
//! answer the same request again without touching the network.
//!
//! Staleness is judged from the file's modification time. A file whose mtime
//! cannot be read is treated as fresh. Read failures of any kind degrade to
//! a miss; write failures are reported as [`PubMedError::CacheWriteError`].

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::config::CacheConfig;
use crate::error::{PubMedError, Result};
use crate::pubmed::models::ArticleRecord;
use crate::pubmed::query::SearchTerm;

const FILE_PREFIX: &str = "cache_";
const FILE_SUFFIX: &str = ".json";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Address of a cache entry: the term's content hash plus the page offset
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    term_hash: String,
    retstart: usize,
}

impl CacheKey {
    pub fn new(term: &SearchTerm, retstart: usize) -> Self {
        Self {
            term_hash: term.content_hash(),
            retstart,
        }
    }

    pub fn term_hash(&self) -> &str {
        &self.term_hash
    }

    pub fn retstart(&self) -> usize {
        self.retstart
    }

    /// `cache_<md5>_<retstart>.json`
    pub fn file_name(&self) -> String {
        format!(
            "{FILE_PREFIX}{}_{}{FILE_SUFFIX}",
            self.term_hash, self.retstart
        )
    }
}

/// Persisted form of one result page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub results: Vec<ArticleRecord>,
    pub term: String,
    pub count: usize,
    pub retstart: usize,
}

/// Outcome of a cache lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    /// Entry exists and is within its time to live
    Hit(T),
    /// No usable entry (absent or unreadable)
    Miss,
    /// Entry exists but is older than its time to live
    Expired,
}

/// File-backed page cache rooted at a single directory
#[derive(Debug, Clone)]
pub struct ResultCache {
    directory: PathBuf,
    time_to_live: Duration,
}

impl ResultCache {
    pub fn new<P: Into<PathBuf>>(directory: P, time_to_live: Duration) -> Self {
        Self {
            directory: directory.into(),
            time_to_live,
        }
    }

    /// Build a cache from configuration; `None` when caching is disabled
    /// or no directory is configured.
    pub fn from_config(config: &CacheConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        config
            .directory
            .as_ref()
            .map(|dir| Self::new(dir.clone(), config.time_to_live))
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn time_to_live(&self) -> Duration {
        self.time_to_live
    }

    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.directory.join(key.file_name())
    }

    /// Look up an entry, distinguishing expired entries from plain misses
    pub async fn lookup(&self, key: &CacheKey) -> CacheResult<CacheEntry> {
        let path = self.path_for(key);

        let metadata = match fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "Cache MISS");
                return CacheResult::Miss;
            }
            Err(e) => {
                let error = PubMedError::CacheReadError {
                    path: path.clone(),
                    message: e.to_string(),
                };
                warn!(error = %error, "Treating unreadable cache entry as a miss");
                return CacheResult::Miss;
            }
        };

        if self.is_expired(metadata.modified().ok()) {
            debug!(path = %path.display(), "Cache entry expired");
            return CacheResult::Expired;
        }

        match read_entry(&path).await {
            Ok(entry) => {
                debug!(path = %path.display(), records = entry.results.len(), "Cache HIT");
                CacheResult::Hit(entry)
            }
            Err(error) => {
                warn!(error = %error, "Treating unreadable cache entry as a miss");
                CacheResult::Miss
            }
        }
    }

    /// Fresh entry for `key`, if any
    pub async fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        match self.lookup(key).await {
            CacheResult::Hit(entry) => Some(entry),
            CacheResult::Miss | CacheResult::Expired => None,
        }
    }

    /// Store `entry` under `key`, replacing any existing file atomically.
    ///
    /// Returns the path written.
    pub async fn put(&self, key: &CacheKey, entry: &CacheEntry) -> Result<PathBuf> {
        let path = self.path_for(key);
        let write_error = |message: String| PubMedError::CacheWriteError {
            path: path.clone(),
            message,
        };

        fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| write_error(e.to_string()))?;

        let body = serde_json::to_vec(entry).map_err(|e| write_error(e.to_string()))?;

        let temp_path = self.directory.join(format!(
            ".{}.{}.{}.tmp",
            key.file_name(),
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        let written = async {
            fs::write(&temp_path, &body).await?;
            fs::rename(&temp_path, &path).await
        }
        .await;
        if let Err(e) = written {
            // Partial writes and failed renames both leave the temp file behind
            let _ = fs::remove_file(&temp_path).await;
            return Err(write_error(e.to_string()));
        }

        debug!(path = %path.display(), bytes = body.len(), "Cached result page");
        Ok(path)
    }

    /// Remove every cache file in the directory; returns how many were removed
    pub async fn clear(&self) -> Result<usize> {
        let files = self.cache_files().await?;
        let mut removed = 0;
        for file in files {
            match fs::remove_file(&file).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(PubMedError::CacheWriteError {
                        path: file,
                        message: e.to_string(),
                    });
                }
            }
        }
        info!(directory = %self.directory.display(), removed, "Cleared result cache");
        Ok(removed)
    }

    /// Number of cache files currently on disk, expired ones included
    pub async fn entry_count(&self) -> Result<usize> {
        Ok(self.cache_files().await?.len())
    }

    fn is_expired(&self, modified: Option<SystemTime>) -> bool {
        let Some(modified) = modified else {
            return false;
        };
        match SystemTime::now().duration_since(modified) {
            Ok(age) => age > self.time_to_live,
            // mtime in the future
            Err(_) => false,
        }
    }

    async fn cache_files(&self) -> Result<Vec<PathBuf>> {
        let read_error = |e: std::io::Error| PubMedError::CacheReadError {
            path: self.directory.clone(),
            message: e.to_string(),
        };

        let mut entries = match fs::read_dir(&self.directory).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(read_error(e)),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(read_error)? {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(FILE_PREFIX) && name.ends_with(FILE_SUFFIX) {
                files.push(entry.path());
            }
        }
        Ok(files)
    }
}

async fn read_entry(path: &Path) -> Result<CacheEntry> {
    let read_error = |message: String| PubMedError::CacheReadError {
        path: path.to_path_buf(),
        message,
    };
    let bytes = fs::read(path).await.map_err(|e| read_error(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| read_error(e.to_string()))
}

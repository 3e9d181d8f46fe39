//! Client configuration
//!
//! [`ClientConfig`] replaces option-bag construction with named, typed fields.
//! Every field has a default, and [`ClientConfig::validate`] is run whenever a
//! client is built from a configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{PubMedError, Result};

/// Default E-utilities base URL
pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Default timeout for a single HTTP call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Largest page size esearch accepts for XML output
pub const MAX_RETMAX: usize = 10_000;

/// What to do when query, author and exclusions are all absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyTermPolicy {
    /// Fail with [`PubMedError::InvalidQuery`] before any request is made
    #[default]
    Reject,
    /// Send the empty term, which esearch treats as an unconstrained search
    Allow,
}

/// Configuration for the on-disk result cache
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Whether search results are read from and written to the cache
    pub enabled: bool,
    /// Directory holding `cache_<md5>_<retstart>.json` files
    pub directory: Option<PathBuf>,
    /// Maximum age of a cache file, measured from its modification time
    pub time_to_live: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: None,
            time_to_live: Duration::from_secs(7 * 24 * 60 * 60), // 7 days
        }
    }
}

/// Configuration for [`PubMedClient`](crate::PubMedClient) and
/// [`EutilsClient`](crate::EutilsClient)
///
/// # Example
///
/// ```
/// use pubmed_eutils::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new()
///     .with_retmax(25)
///     .with_exact_match(true)
///     .with_cache_dir("/tmp/pubmed-cache")
///     .with_cache_life(Duration::from_secs(3600));
///
/// assert!(config.validate().is_ok());
/// assert!(config.cache.enabled);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL the three endpoint names are appended to
    pub base_url: Option<String>,
    /// Timeout applied to every HTTP call
    pub timeout: Duration,
    /// User agent sent when the caller does not pass one through
    pub user_agent: Option<String>,
    /// Referer header value, if any
    pub referer: Option<String>,
    /// Entrez database (`db` / `dbfrom`)
    pub db: String,
    /// efetch `retmode`
    pub retmode: String,
    /// Page size (`retmax`)
    pub retmax: usize,
    /// Wrap the whole term in quotes instead of trimming it
    pub exact_match: bool,
    /// Handling of an empty search term
    pub empty_term: EmptyTermPolicy,
    /// Result cache settings
    pub cache: CacheConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            referer: None,
            db: "pubmed".to_string(),
            retmode: "xml".to_string(),
            retmax: 10,
            exact_match: false,
            empty_term: EmptyTermPolicy::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at a different E-utilities base URL (mock servers, mirrors)
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_referer<S: Into<String>>(mut self, referer: S) -> Self {
        self.referer = Some(referer.into());
        self
    }

    pub fn with_db<S: Into<String>>(mut self, db: S) -> Self {
        self.db = db.into();
        self
    }

    pub fn with_retmode<S: Into<String>>(mut self, retmode: S) -> Self {
        self.retmode = retmode.into();
        self
    }

    pub fn with_retmax(mut self, retmax: usize) -> Self {
        self.retmax = retmax;
        self
    }

    pub fn with_exact_match(mut self, exact_match: bool) -> Self {
        self.exact_match = exact_match;
        self
    }

    pub fn with_empty_term_policy(mut self, policy: EmptyTermPolicy) -> Self {
        self.empty_term = policy;
        self
    }

    /// Enable the result cache, storing files under `directory`
    pub fn with_cache_dir<P: Into<PathBuf>>(mut self, directory: P) -> Self {
        self.cache.enabled = true;
        self.cache.directory = Some(directory.into());
        self
    }

    /// Turn caching on or off without touching the directory
    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache.enabled = enabled;
        self
    }

    pub fn with_cache_life(mut self, time_to_live: Duration) -> Self {
        self.cache.time_to_live = time_to_live;
        self
    }

    /// Base URL with any trailing slash removed
    pub fn effective_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("pubmed-eutils/{}", env!("CARGO_PKG_VERSION")))
    }

    /// Check field ranges and cross-field requirements
    pub fn validate(&self) -> Result<()> {
        if self.db.trim().is_empty() {
            return Err(PubMedError::InvalidConfig("db must not be empty".to_string()));
        }
        if self.retmode.trim().is_empty() {
            return Err(PubMedError::InvalidConfig(
                "retmode must not be empty".to_string(),
            ));
        }
        if self.retmax == 0 || self.retmax > MAX_RETMAX {
            return Err(PubMedError::InvalidConfig(format!(
                "retmax must be between 1 and {MAX_RETMAX}, got {}",
                self.retmax
            )));
        }
        if self.timeout.is_zero() {
            return Err(PubMedError::InvalidConfig(
                "timeout must be greater than zero".to_string(),
            ));
        }
        if self.cache.enabled && self.cache.directory.is_none() {
            return Err(PubMedError::InvalidConfig(
                "cache is enabled but no cache directory is configured".to_string(),
            ));
        }
        Ok(())
    }
}

/// Per-invocation settings forwarded from the caller's own request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Incoming User-Agent to pass through; overrides the configured agent
    pub user_agent: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

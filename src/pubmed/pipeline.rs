//! Search → fetch → parse pipeline with the optional result cache

use std::collections::HashSet;

use tracing::{debug, info, instrument, warn};

use crate::cache::{CacheEntry, CacheKey, ResultCache};
use crate::config::{ClientConfig, EmptyTermPolicy, RequestOptions};
use crate::error::{PubMedError, Result};
use crate::pubmed::client::EutilsClient;
use crate::pubmed::models::{ArticleRecord, LinkRecord, SearchOutcome, SearchResultPage};
use crate::pubmed::parser::{parse_articles, parse_links, parse_search_page};
use crate::pubmed::query::{Exclusions, SearchTerm, TermBuilder};

/// Stages of one search invocation.
///
/// A failing stage ends the invocation with its error; there is no separate
/// failed state to step through.
#[derive(Debug)]
enum PipelineState {
    BuildingTerm {
        term: SearchTerm,
    },
    Searching {
        term: SearchTerm,
        cacheable: bool,
    },
    Fetching {
        term: SearchTerm,
        cacheable: bool,
        page: SearchResultPage,
    },
    Parsing {
        term: SearchTerm,
        cacheable: bool,
        page: SearchResultPage,
        xml: String,
    },
    Caching {
        outcome: SearchOutcome,
    },
    Done(SearchOutcome),
}

impl PipelineState {
    fn name(&self) -> &'static str {
        match self {
            PipelineState::BuildingTerm { .. } => "building_term",
            PipelineState::Searching { .. } => "searching",
            PipelineState::Fetching { .. } => "fetching",
            PipelineState::Parsing { .. } => "parsing",
            PipelineState::Caching { .. } => "caching",
            PipelineState::Done(_) => "done",
        }
    }
}

/// High-level PubMed client
///
/// Builds the search term, resolves a page of PMIDs through esearch (or the
/// result cache), fetches and parses the article records, and stores the
/// page in the cache. Two further entry points fetch records or full-text
/// links for an explicit PMID set.
///
/// # Example
///
/// ```no_run
/// use pubmed_eutils::{ClientConfig, PubMedClient, RequestOptions, TermBuilder};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = PubMedClient::with_config(
///         ClientConfig::new().with_cache_dir("/tmp/pubmed-cache"),
///     )?;
///
///     let term = TermBuilder::new().query("asthma").author("Smith J");
///     let outcome = client.request(&term, 0, &RequestOptions::default()).await?;
///
///     println!("{} matches", outcome.count);
///     for article in &outcome.articles {
///         println!("{}: {}", article.pmid, article.title);
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct PubMedClient {
    eutils: EutilsClient,
    cache: Option<ResultCache>,
    config: ClientConfig,
}

impl PubMedClient {
    /// Create a client with default configuration (no cache)
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::new())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let eutils = EutilsClient::with_config(config.clone())?;
        let cache = ResultCache::from_config(&config.cache);
        Ok(Self {
            eutils,
            cache,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Underlying raw E-utilities client
    pub fn eutils(&self) -> &EutilsClient {
        &self.eutils
    }

    /// Result cache, when enabled
    pub fn cache(&self) -> Option<&ResultCache> {
        self.cache.as_ref()
    }

    /// Search for one page of articles
    ///
    /// `page` is 1-based; 0 is treated as 1. The offset sent to esearch is
    /// `(page - 1) * retmax`.
    pub async fn search_page(
        &self,
        query: Option<&str>,
        author: Option<&str>,
        exclusions: Option<Exclusions>,
        page: usize,
        options: &RequestOptions,
    ) -> Result<SearchOutcome> {
        let mut builder = TermBuilder::new();
        if let Some(query) = query {
            builder = builder.query(query);
        }
        if let Some(author) = author {
            builder = builder.author(author);
        }
        if let Some(exclusions) = exclusions {
            builder = builder.exclusions(exclusions);
        }

        let retstart = page.max(1).saturating_sub(1).saturating_mul(self.config.retmax);
        self.request(&builder, retstart, options).await
    }

    /// Run the full pipeline for the term described by `builder`, starting at
    /// offset `retstart`
    pub async fn request(
        &self,
        builder: &TermBuilder,
        retstart: usize,
        options: &RequestOptions,
    ) -> Result<SearchOutcome> {
        self.run(builder.build(), retstart, options).await
    }

    /// Run the pipeline for an already assembled term
    pub async fn search_term(
        &self,
        term: &SearchTerm,
        retstart: usize,
        options: &RequestOptions,
    ) -> Result<SearchOutcome> {
        self.run(term.clone(), retstart, options).await
    }

    #[instrument(skip(self, term, options), fields(term_len = term.as_str().len()))]
    async fn run(
        &self,
        term: SearchTerm,
        retstart: usize,
        options: &RequestOptions,
    ) -> Result<SearchOutcome> {
        let mut state = PipelineState::BuildingTerm { term };

        loop {
            debug!(stage = state.name(), "Pipeline stage");
            state = match state {
                PipelineState::BuildingTerm { term } => {
                    let cacheable = !term.as_str().trim().is_empty();
                    if !cacheable && self.config.empty_term == EmptyTermPolicy::Reject {
                        return Err(PubMedError::InvalidQuery(
                            "query, author and exclusions are all empty".to_string(),
                        ));
                    }
                    PipelineState::Searching {
                        term: term.normalized(self.config.exact_match),
                        cacheable,
                    }
                }

                PipelineState::Searching { term, cacheable } => {
                    if let Some(entry) = self.cached_page(&term, retstart, cacheable).await {
                        info!(records = entry.results.len(), "Served search page from cache");
                        PipelineState::Done(SearchOutcome {
                            term,
                            count: entry.count,
                            retstart: entry.retstart,
                            articles: entry.results,
                            from_cache: true,
                        })
                    } else {
                        let xml = self
                            .eutils
                            .search(
                                &term.encoded(),
                                &self.config.db,
                                self.config.retmax,
                                retstart,
                                options,
                            )
                            .await
                            .inspect_err(|e| {
                                warn!(stage = "searching", error = %e, "Pipeline failed")
                            })?;
                        let mut page = parse_search_page(&xml, retstart)?;
                        if page.ids.len() > self.config.retmax {
                            warn!(
                                returned = page.ids.len(),
                                retmax = self.config.retmax,
                                "esearch returned more ids than requested; truncating"
                            );
                            page.ids.truncate(self.config.retmax);
                        }
                        info!(
                            total = page.total_count,
                            returned = page.ids.len(),
                            "Search completed"
                        );
                        PipelineState::Fetching {
                            term,
                            cacheable,
                            page,
                        }
                    }
                }

                PipelineState::Fetching {
                    term,
                    cacheable,
                    page,
                } => {
                    if page.ids.is_empty() {
                        debug!("No ids to fetch");
                        PipelineState::Parsing {
                            term,
                            cacheable,
                            page,
                            xml: String::new(),
                        }
                    } else {
                        let xml = self
                            .eutils
                            .fetch(
                                &self.config.db,
                                self.config.retmax,
                                &self.config.retmode,
                                &page.ids,
                                options,
                            )
                            .await
                            .inspect_err(|e| {
                                warn!(stage = "fetching", error = %e, "Pipeline failed")
                            })?;
                        PipelineState::Parsing {
                            term,
                            cacheable,
                            page,
                            xml,
                        }
                    }
                }

                PipelineState::Parsing {
                    term,
                    cacheable,
                    page,
                    xml,
                } => {
                    let articles = if xml.is_empty() {
                        Vec::new()
                    } else {
                        parse_articles(&xml)?
                    };
                    let outcome = SearchOutcome {
                        term,
                        count: page.total_count,
                        retstart: page.offset,
                        articles,
                        from_cache: false,
                    };
                    if cacheable && self.cache.is_some() {
                        PipelineState::Caching { outcome }
                    } else {
                        PipelineState::Done(outcome)
                    }
                }

                PipelineState::Caching { outcome } => {
                    if let Some(cache) = &self.cache {
                        let key = CacheKey::new(&outcome.term, outcome.retstart);
                        let entry = CacheEntry {
                            results: outcome.articles.clone(),
                            term: outcome.term.as_str().to_string(),
                            count: outcome.count,
                            retstart: outcome.retstart,
                        };
                        cache.put(&key, &entry).await?;
                    }
                    PipelineState::Done(outcome)
                }

                PipelineState::Done(outcome) => {
                    info!(
                        count = outcome.count,
                        articles = outcome.articles.len(),
                        from_cache = outcome.from_cache,
                        "Search pipeline completed"
                    );
                    return Ok(outcome);
                }
            };
        }
    }

    async fn cached_page(
        &self,
        term: &SearchTerm,
        retstart: usize,
        cacheable: bool,
    ) -> Option<CacheEntry> {
        let cache = self.cache.as_ref().filter(|_| cacheable)?;
        cache.get(&CacheKey::new(term, retstart)).await
    }

    /// Fetch and parse records for an explicit PMID set, bypassing search
    ///
    /// PMIDs must be all digits; duplicates are dropped keeping the first
    /// occurrence. An empty set returns no records without a request.
    #[instrument(skip(self, pmids, options), fields(pmids_count = pmids.len()))]
    pub async fn fetch_records<S: AsRef<str>>(
        &self,
        pmids: &[S],
        options: &RequestOptions,
    ) -> Result<Vec<ArticleRecord>> {
        let ids = validate_pmids(pmids)?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let retmax = self.config.retmax.max(ids.len());
        let xml = self
            .eutils
            .fetch(&self.config.db, retmax, &self.config.retmode, &ids, options)
            .await?;
        let records = parse_articles(&xml)?;

        info!(
            requested = ids.len(),
            parsed = records.len(),
            "Fetch completed"
        );
        Ok(records)
    }

    /// Outbound full-text links for an explicit PMID set
    #[instrument(skip(self, pmids, options), fields(pmids_count = pmids.len()))]
    pub async fn fetch_links<S: AsRef<str>>(
        &self,
        pmids: &[S],
        options: &RequestOptions,
    ) -> Result<Vec<LinkRecord>> {
        let ids = validate_pmids(pmids)?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let xml = self.eutils.link(&self.config.db, &ids, options).await?;
        let links = parse_links(&xml)?;

        info!(
            requested = ids.len(),
            links = links.len(),
            "Link lookup completed"
        );
        Ok(links)
    }
}

/// Trim, check and de-duplicate PMIDs, preserving first occurrence
fn validate_pmids<S: AsRef<str>>(pmids: &[S]) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut ids = Vec::with_capacity(pmids.len());

    for pmid in pmids {
        let raw = pmid.as_ref();
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PubMedError::InvalidPmid {
                pmid: raw.to_string(),
            });
        }
        if seen.insert(trimmed) {
            ids.push(trimmed.to_string());
        }
    }

    Ok(ids)
}

use serde::{Deserialize, Serialize};

use crate::pubmed::query::SearchTerm;

/// One page of esearch results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultPage {
    /// PMIDs in the order esearch returned them
    pub ids: Vec<String>,
    /// Total number of matches for the term, across all pages
    pub total_count: usize,
    /// Offset of the first id in this page
    pub offset: usize,
}

/// Article metadata parsed from an efetch `PubmedArticle`
///
/// Every field is a string or list; anything missing from the source XML is
/// empty, never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub pmid: String,
    pub volume: String,
    pub issue: String,
    pub year: String,
    pub month: String,
    pub day: String,
    /// `MedlinePgn`, e.g. "270-273"
    pub pages: String,
    pub issn: String,
    #[serde(rename = "journal")]
    pub journal_title: String,
    #[serde(rename = "journalabbrev")]
    pub journal_abbrev: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub affiliation: String,
    /// "LastName Initials" per author, in document order
    pub authors: Vec<String>,
    /// Every `ArticleId` under `PubmedData/ArticleIdList`, comma-joined
    #[serde(rename = "articleid")]
    pub article_ids: String,
    /// MeSH descriptor names, each followed by its qualifier names
    pub keywords: Vec<String>,
}

/// An outbound full-text link from elink `cmd=prlinks`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// PMID the link belongs to
    pub pmid: String,
    pub url: String,
    #[serde(rename = "iconurl")]
    pub icon_url: String,
    #[serde(rename = "provider")]
    pub provider_name: String,
}

/// Result of one search invocation: the records plus paging metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Normalized term that was sent to esearch (or looked up in the cache)
    pub term: SearchTerm,
    /// Total number of matches reported by esearch
    pub count: usize,
    /// Offset of this page
    pub retstart: usize,
    pub articles: Vec<ArticleRecord>,
    /// Whether the page was served from the result cache
    pub from_cache: bool,
}

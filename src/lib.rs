//! # PubMed E-utilities Client
//!
//! A Rust client for the NCBI PubMed E-utilities service. It builds boolean
//! search terms, resolves a page of PMIDs with esearch, fetches and parses the
//! article records with efetch, looks up full-text links with elink, and can
//! keep search result pages in an on-disk cache.
//!
//! ## Features
//!
//! - **Term building**: query, author and PMID exclusions composed into one term
//! - **Typed parsing**: esearch, efetch and elink XML decoded into plain records
//!   where missing elements become empty values, never errors
//! - **Result cache**: JSON files keyed by the MD5 of the term and the page
//!   offset, expired by file age
//! - **Async**: built on tokio and reqwest
//!
//! ## Quick Start
//!
//! ### Searching for Articles
//!
//! ```no_run
//! use pubmed_eutils::{PubMedClient, RequestOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PubMedClient::new()?;
//!
//!     // Second page of "asthma" articles by Smith J, excluding one PMID
//!     let outcome = client
//!         .search_page(
//!             Some("asthma"),
//!             Some("Smith J"),
//!             Some("31978945".into()),
//!             2,
//!             &RequestOptions::default(),
//!         )
//!         .await?;
//!
//!     println!("{} matches, showing from {}", outcome.count, outcome.retstart);
//!     for article in &outcome.articles {
//!         println!("{} ({}) {}", article.pmid, article.year, article.title);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Fetching Known Articles and Their Links
//!
//! ```no_run
//! use pubmed_eutils::{PubMedClient, RequestOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PubMedClient::new()?;
//!     let options = RequestOptions::default();
//!
//!     let records = client.fetch_records(&["31978945", "33515491"], &options).await?;
//!     let links = client.fetch_links(&["31978945"], &options).await?;
//!
//!     for record in &records {
//!         println!("{}: {}", record.pmid, record.authors.join(", "));
//!     }
//!     for link in &links {
//!         println!("{} -> {} ({})", link.pmid, link.url, link.provider_name);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod pubmed;

// Re-export main types for convenience
pub use cache::{CacheEntry, CacheKey, CacheResult, ResultCache};
pub use config::{CacheConfig, ClientConfig, EmptyTermPolicy, RequestOptions};
pub use error::{PubMedError, Result};
pub use pubmed::{
    ArticleRecord, EutilsClient, Exclusions, LinkRecord, PubMedClient, SearchOutcome,
    SearchResultPage, SearchTerm, TermBuilder, build_term,
};

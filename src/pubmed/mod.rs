//! PubMed search, fetch and link retrieval
//!
//! This module provides the term builder, the raw E-utilities client, the
//! XML parsers and the pipeline tying them together.

pub mod client;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod query;

// Re-export public types
pub use client::EutilsClient;
pub use models::{ArticleRecord, LinkRecord, SearchOutcome, SearchResultPage};
pub use pipeline::PubMedClient;
pub use query::{Exclusions, SearchTerm, TermBuilder, build_term};

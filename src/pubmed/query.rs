//! Search term construction
//!
//! [`TermBuilder`] composes the boolean esearch term from a free-text query,
//! an author name and a set of excluded PMIDs. The result is a [`SearchTerm`],
//! which is immutable and identified by the MD5 hash of its content.

use std::fmt;

use serde::{Deserialize, Serialize};

/// PMIDs to exclude from a search: a single id or a list of ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exclusions {
    One(String),
    Many(Vec<String>),
}

impl Exclusions {
    /// Coerce into a list; a single id becomes a one-element list
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Exclusions::One(id) => vec![id],
            Exclusions::Many(ids) => ids,
        }
    }
}

impl From<&str> for Exclusions {
    fn from(id: &str) -> Self {
        Exclusions::One(id.to_string())
    }
}

impl From<String> for Exclusions {
    fn from(id: String) -> Self {
        Exclusions::One(id)
    }
}

impl From<Vec<String>> for Exclusions {
    fn from(ids: Vec<String>) -> Self {
        Exclusions::Many(ids)
    }
}

impl From<Vec<&str>> for Exclusions {
    fn from(ids: Vec<&str>) -> Self {
        Exclusions::Many(ids.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Exclusions {
    fn from(ids: &[&str]) -> Self {
        Exclusions::Many(ids.iter().map(|id| id.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Exclusions {
    fn from(ids: [&str; N]) -> Self {
        Exclusions::Many(ids.iter().map(|id| id.to_string()).collect())
    }
}

/// Builder for PubMed boolean search terms
///
/// # Example
///
/// ```
/// use pubmed_eutils::TermBuilder;
///
/// let term = TermBuilder::new()
///     .query("cancer")
///     .author("Smith J")
///     .exclusions(["123", "456"])
///     .build();
///
/// assert_eq!(
///     term.as_str(),
///     "cancer[All Fields] AND Smith J[Full Author Name] NOT (123[uid] OR 456[uid])"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct TermBuilder {
    query: Option<String>,
    author: Option<String>,
    exclusions: Option<Exclusions>,
}

impl TermBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Free-text query, searched in `[All Fields]`
    pub fn query<S: Into<String>>(mut self, query: S) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Author name, searched in `[Full Author Name]`
    pub fn author<S: Into<String>>(mut self, author: S) -> Self {
        self.author = Some(author.into());
        self
    }

    /// PMIDs that must not appear in the results
    pub fn exclusions<E: Into<Exclusions>>(mut self, exclusions: E) -> Self {
        self.exclusions = Some(exclusions.into());
        self
    }

    /// Assemble the term.
    ///
    /// Order is fixed: query clause, ` AND ` (only when both query and author
    /// are present), author clause, then ` NOT ` followed by the exclusions.
    /// One exclusion is appended bare; several are wrapped in `( … OR … )`.
    /// An empty exclusion list is treated as no exclusions, so no ` NOT ` is
    /// emitted; a bare ` NOT ()` would be rejected by PubMed. Nothing is
    /// trimmed or escaped here.
    pub fn build(&self) -> SearchTerm {
        let mut term = String::new();

        if let Some(query) = &self.query {
            term.push_str(query);
            term.push_str("[All Fields]");

            if self.author.is_some() {
                term.push_str(" AND ");
            }
        }

        if let Some(author) = &self.author {
            term.push_str(author);
            term.push_str("[Full Author Name]");
        }

        let excluded: Vec<String> = self
            .exclusions
            .clone()
            .map(Exclusions::into_vec)
            .unwrap_or_default()
            .into_iter()
            .map(|id| format!("{id}[uid]"))
            .collect();

        match excluded.as_slice() {
            [] => {}
            [single] => {
                term.push_str(" NOT ");
                term.push_str(single);
            }
            many => {
                term.push_str(" NOT (");
                term.push_str(&many.join(" OR "));
                term.push(')');
            }
        }

        SearchTerm(term)
    }
}

/// Build a term from optional parts in one call
pub fn build_term(
    query: Option<&str>,
    author: Option<&str>,
    exclusions: Option<Exclusions>,
) -> SearchTerm {
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
    builder.build()
}

/// An assembled esearch term
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Wrap an already assembled term
    pub fn new<S: Into<String>>(term: S) -> Self {
        Self(term.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Apply the match policy: exact match wraps the whole term in literal
    /// quotes, otherwise surrounding whitespace is trimmed.
    pub fn normalized(&self, exact_match: bool) -> SearchTerm {
        if exact_match {
            SearchTerm(format!("\"{}\"", self.0))
        } else {
            SearchTerm(self.0.trim().to_string())
        }
    }

    /// Percent-encoded form for the `term` query parameter
    pub fn encoded(&self) -> String {
        urlencoding::encode(&self.0).into_owned()
    }

    /// Lowercase hex MD5 of the term, used as its cache identity
    pub fn content_hash(&self) -> String {
        format!("{:x}", md5::compute(self.0.as_bytes()))
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SearchTerm {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

//! E-utilities XML parsers
//!
//! Pure functions turning esearch, efetch and elink responses into the
//! result data model. A document that is not well-formed, or whose root does
//! not deserialize, is a [`PubMedError::MalformedResponseError`]. Missing
//! optional elements are never an error: they become empty strings or lists.
//!
//! # Module Organization
//!
//! - `preprocessing` - inline-markup stripping and well-formedness checks
//! - `xml_types` - typed, all-optional views of the three documents

mod preprocessing;
mod xml_types;

pub use preprocessing::ensure_well_formed;

use quick_xml::de::from_str;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::error::{PubMedError, Result};
use crate::pubmed::models::{ArticleRecord, LinkRecord, SearchResultPage};
use preprocessing::strip_inline_html_tags;
use xml_types::{
    ELinkResult, ELinkSet, ESearchResult, IdUrlSet, MeshHeading, PubmedArticle, PubmedArticleSet,
    Text,
};

fn deserialize<T: DeserializeOwned>(xml: &str, document: &str) -> Result<T> {
    ensure_well_formed(xml)?;
    let cleaned = strip_inline_html_tags(xml);
    from_str(&cleaned).map_err(|e| PubMedError::MalformedResponseError {
        message: format!("failed to deserialize {document} XML: {e}"),
    })
}

fn text(node: Option<&Text>) -> String {
    node.map(|t| t.as_str().to_string()).unwrap_or_default()
}

/// `Count` of an esearch response; missing or non-numeric counts are 0
pub fn parse_count(xml: &str) -> Result<usize> {
    let result: ESearchResult = deserialize(xml, "esearch")?;
    Ok(count_of(&result))
}

/// PMIDs under `IdList`, in document order
pub fn parse_ids(xml: &str) -> Result<Vec<String>> {
    let result: ESearchResult = deserialize(xml, "esearch")?;
    Ok(ids_of(&result))
}

/// Count and ids of an esearch response in a single pass
#[instrument(skip(xml), fields(xml_size = xml.len()))]
pub fn parse_search_page(xml: &str, offset: usize) -> Result<SearchResultPage> {
    let result: ESearchResult = deserialize(xml, "esearch")?;

    if let Some(error) = result.error.as_ref().map(Text::as_str).filter(|e| !e.is_empty()) {
        warn!(error = %error, "esearch reported an error");
    }

    Ok(SearchResultPage {
        ids: ids_of(&result),
        total_count: count_of(&result),
        offset,
    })
}

fn count_of(result: &ESearchResult) -> usize {
    result
        .count
        .as_ref()
        .and_then(|c| c.as_str().parse().ok())
        .unwrap_or(0)
}

fn ids_of(result: &ESearchResult) -> Vec<String> {
    result
        .id_list
        .as_ref()
        .map(|list| {
            list.ids
                .iter()
                .map(|id| id.as_str().to_string())
                .filter(|id| !id.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// One [`ArticleRecord`] per `PubmedArticle`, in document order
#[instrument(skip(xml), fields(xml_size = xml.len()))]
pub fn parse_articles(xml: &str) -> Result<Vec<ArticleRecord>> {
    let article_set: PubmedArticleSet = deserialize(xml, "efetch")?;
    let records: Vec<ArticleRecord> = article_set
        .articles
        .iter()
        .map(article_record)
        .collect();

    debug!(parsed = records.len(), "Parsed efetch articles");
    Ok(records)
}

fn article_record(article: &PubmedArticle) -> ArticleRecord {
    let citation = article.medline_citation.as_ref();
    let body = citation.and_then(|c| c.article.as_ref());
    let journal = body.and_then(|a| a.journal.as_ref());
    let journal_issue = journal.and_then(|j| j.journal_issue.as_ref());
    let pub_date = journal_issue.and_then(|i| i.pub_date.as_ref());
    let authors = body
        .and_then(|a| a.author_list.as_ref())
        .map(|list| list.authors.as_slice())
        .unwrap_or_default();

    let year = match text(pub_date.and_then(|d| d.year.as_ref())) {
        year if !year.is_empty() => year,
        _ => leading_year(&text(pub_date.and_then(|d| d.medline_date.as_ref()))),
    };

    let affiliation = match text(body.and_then(|a| a.affiliation.as_ref())) {
        affiliation if !affiliation.is_empty() => affiliation,
        _ => authors
            .first()
            .and_then(|a| a.affiliation_info.first())
            .map(|info| text(info.affiliation.as_ref()))
            .unwrap_or_default(),
    };

    let abstract_text = body
        .and_then(|a| a.abstract_.as_ref())
        .map(|abs| {
            abs.texts
                .iter()
                .map(Text::as_str)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    let author_names = authors
        .iter()
        .map(|author| match author.last_name.as_ref() {
            Some(last) => format!("{} {}", last.as_str(), text(author.initials.as_ref()))
                .trim_end()
                .to_string(),
            None => text(author.collective_name.as_ref()),
        })
        .collect();

    let keywords = citation
        .and_then(|c| c.mesh_heading_list.as_ref())
        .map(|list| list.headings.iter().flat_map(mesh_keywords).collect())
        .unwrap_or_default();

    let article_ids = article
        .pubmed_data
        .as_ref()
        .and_then(|d| d.article_id_list.as_ref())
        .map(|list| {
            list.ids
                .iter()
                .map(Text::as_str)
                .collect::<Vec<_>>()
                .join(",")
        })
        .unwrap_or_default();

    ArticleRecord {
        pmid: text(citation.and_then(|c| c.pmid.as_ref())),
        volume: text(journal_issue.and_then(|i| i.volume.as_ref())),
        issue: text(journal_issue.and_then(|i| i.issue.as_ref())),
        year,
        month: text(pub_date.and_then(|d| d.month.as_ref())),
        day: text(pub_date.and_then(|d| d.day.as_ref())),
        pages: text(
            body.and_then(|a| a.pagination.as_ref())
                .and_then(|p| p.medline_pgn.as_ref()),
        ),
        issn: text(journal.and_then(|j| j.issn.as_ref())),
        journal_title: text(journal.and_then(|j| j.title.as_ref())),
        journal_abbrev: text(journal.and_then(|j| j.iso_abbreviation.as_ref())),
        title: text(body.and_then(|a| a.title.as_ref())),
        abstract_text,
        affiliation,
        authors: author_names,
        article_ids,
        keywords,
    }
}

/// Descriptor name followed by each of its qualifier names
fn mesh_keywords(heading: &MeshHeading) -> Vec<String> {
    heading
        .descriptor_name
        .iter()
        .chain(heading.qualifier_names.iter())
        .map(|name| name.as_str().to_string())
        .collect()
}

/// First four-digit run of a free-form `MedlineDate` such as "1998 Dec-1999 Jan"
fn leading_year(medline_date: &str) -> String {
    medline_date
        .split(|c: char| !c.is_ascii_digit())
        .find(|run| run.len() == 4)
        .unwrap_or_default()
        .to_string()
}

/// One [`LinkRecord`] per `IdUrlSet`, in document order
#[instrument(skip(xml), fields(xml_size = xml.len()))]
pub fn parse_links(xml: &str) -> Result<Vec<LinkRecord>> {
    let result: ELinkResult = deserialize(xml, "elink")?;

    let mut records = Vec::new();
    for link_set in &result.link_sets {
        collect_links(link_set, &mut records);
    }

    debug!(parsed = records.len(), "Parsed elink url sets");
    Ok(records)
}

fn collect_links(link_set: &ELinkSet, records: &mut Vec<LinkRecord>) {
    let listed = link_set
        .id_url_list
        .iter()
        .flat_map(|list| list.id_url_sets.iter());

    records.extend(listed.chain(link_set.id_url_sets.iter()).map(link_record));

    for nested in &link_set.nested {
        collect_links(nested, records);
    }
}

fn link_record(set: &IdUrlSet) -> LinkRecord {
    let obj_url = set.obj_urls.first();
    LinkRecord {
        pmid: text(set.id.as_ref()),
        url: text(obj_url.and_then(|o| o.url.as_ref())),
        icon_url: text(obj_url.and_then(|o| o.icon_url.as_ref())),
        provider_name: text(
            obj_url
                .and_then(|o| o.provider.as_ref())
                .and_then(|p| p.name.as_ref()),
        ),
    }
}

//! Typed views of the esearch, efetch and elink XML documents
//!
//! Every child element is optional (`Option` or a possibly empty `Vec`), so a
//! document with whole subtrees missing still deserializes. Unknown elements
//! and attributes are ignored.

use std::fmt;
use std::result;

use serde::Deserialize;
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};

/// Text content of an element, with attributes and nested elements ignored.
///
/// Text split around nested elements is concatenated, so mixed content never
/// trips a duplicate-field error.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(super) struct Text(String);

impl Text {
    pub(super) fn as_str(&self) -> &str {
        self.0.trim()
    }
}

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D>(deserializer: D) -> result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TextVisitor;

        impl<'de> Visitor<'de> for TextVisitor {
            type Value = Text;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("element text content")
            }

            fn visit_str<E>(self, value: &str) -> result::Result<Text, E>
            where
                E: de::Error,
            {
                Ok(Text(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> result::Result<Text, E>
            where
                E: de::Error,
            {
                Ok(Text(value))
            }

            fn visit_unit<E>(self) -> result::Result<Text, E>
            where
                E: de::Error,
            {
                Ok(Text::default())
            }

            fn visit_map<M>(self, mut map: M) -> result::Result<Text, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut parts = Vec::new();
                while let Some(key) = map.next_key::<String>()? {
                    if key == "$text" || key == "$value" {
                        parts.push(map.next_value::<String>()?);
                    } else {
                        // attributes and nested elements
                        map.next_value::<IgnoredAny>()?;
                    }
                }
                Ok(Text(parts.join(" ")))
            }
        }

        deserializer.deserialize_any(TextVisitor)
    }
}

// ---------------------------------------------------------------------------
// esearch
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub(super) struct ESearchResult {
    #[serde(rename = "Count", default)]
    pub count: Option<Text>,
    #[serde(rename = "IdList", default)]
    pub id_list: Option<IdList>,
    #[serde(rename = "ERROR", default)]
    pub error: Option<Text>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct IdList {
    #[serde(rename = "Id", default)]
    pub ids: Vec<Text>,
}

// ---------------------------------------------------------------------------
// efetch
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub(super) struct PubmedArticleSet {
    #[serde(rename = "PubmedArticle", default)]
    pub articles: Vec<PubmedArticle>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct PubmedArticle {
    #[serde(rename = "MedlineCitation", default)]
    pub medline_citation: Option<MedlineCitation>,
    #[serde(rename = "PubmedData", default)]
    pub pubmed_data: Option<PubmedData>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct MedlineCitation {
    #[serde(rename = "PMID", default)]
    pub pmid: Option<Text>,
    #[serde(rename = "Article", default)]
    pub article: Option<Article>,
    #[serde(rename = "MeshHeadingList", default)]
    pub mesh_heading_list: Option<MeshHeadingList>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct Article {
    #[serde(rename = "Journal", default)]
    pub journal: Option<Journal>,
    #[serde(rename = "ArticleTitle", default)]
    pub title: Option<Text>,
    #[serde(rename = "Pagination", default)]
    pub pagination: Option<Pagination>,
    #[serde(rename = "Abstract", default)]
    pub abstract_: Option<Abstract>,
    /// Pre-2014 records carry a single affiliation at article level
    #[serde(rename = "Affiliation", default)]
    pub affiliation: Option<Text>,
    #[serde(rename = "AuthorList", default)]
    pub author_list: Option<AuthorList>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct Journal {
    #[serde(rename = "ISSN", default)]
    pub issn: Option<Text>,
    #[serde(rename = "JournalIssue", default)]
    pub journal_issue: Option<JournalIssue>,
    #[serde(rename = "Title", default)]
    pub title: Option<Text>,
    #[serde(rename = "ISOAbbreviation", default)]
    pub iso_abbreviation: Option<Text>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct JournalIssue {
    #[serde(rename = "Volume", default)]
    pub volume: Option<Text>,
    #[serde(rename = "Issue", default)]
    pub issue: Option<Text>,
    #[serde(rename = "PubDate", default)]
    pub pub_date: Option<PubDate>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct PubDate {
    #[serde(rename = "Year", default)]
    pub year: Option<Text>,
    #[serde(rename = "Month", default)]
    pub month: Option<Text>,
    #[serde(rename = "Day", default)]
    pub day: Option<Text>,
    #[serde(rename = "MedlineDate", default)]
    pub medline_date: Option<Text>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct Pagination {
    #[serde(rename = "MedlinePgn", default)]
    pub medline_pgn: Option<Text>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct Abstract {
    #[serde(rename = "AbstractText", default)]
    pub texts: Vec<Text>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct AuthorList {
    #[serde(rename = "Author", default)]
    pub authors: Vec<Author>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct Author {
    #[serde(rename = "LastName", default)]
    pub last_name: Option<Text>,
    #[serde(rename = "Initials", default)]
    pub initials: Option<Text>,
    #[serde(rename = "CollectiveName", default)]
    pub collective_name: Option<Text>,
    #[serde(rename = "AffiliationInfo", default)]
    pub affiliation_info: Vec<AffiliationInfo>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct AffiliationInfo {
    #[serde(rename = "Affiliation", default)]
    pub affiliation: Option<Text>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct MeshHeadingList {
    #[serde(rename = "MeshHeading", default)]
    pub headings: Vec<MeshHeading>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct MeshHeading {
    #[serde(rename = "DescriptorName", default)]
    pub descriptor_name: Option<Text>,
    #[serde(rename = "QualifierName", default)]
    pub qualifier_names: Vec<Text>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct PubmedData {
    #[serde(rename = "ArticleIdList", default)]
    pub article_id_list: Option<ArticleIdList>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ArticleIdList {
    #[serde(rename = "ArticleId", default)]
    pub ids: Vec<Text>,
}

// ---------------------------------------------------------------------------
// elink (cmd=prlinks)
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub(super) struct ELinkResult {
    #[serde(rename = "LinkSet", default)]
    pub link_sets: Vec<ELinkSet>,
}

/// A `LinkSet`; url sets may sit in an `IdUrlList`, directly under the set,
/// or in a nested `LinkSet`
#[derive(Debug, Default, Deserialize)]
pub(super) struct ELinkSet {
    #[serde(rename = "IdUrlList", default)]
    pub id_url_list: Option<IdUrlList>,
    #[serde(rename = "IdUrlSet", default)]
    pub id_url_sets: Vec<IdUrlSet>,
    #[serde(rename = "LinkSet", default)]
    pub nested: Vec<ELinkSet>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct IdUrlList {
    #[serde(rename = "IdUrlSet", default)]
    pub id_url_sets: Vec<IdUrlSet>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct IdUrlSet {
    #[serde(rename = "Id", default)]
    pub id: Option<Text>,
    #[serde(rename = "ObjUrl", default)]
    pub obj_urls: Vec<ObjUrl>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ObjUrl {
    #[serde(rename = "Url", default)]
    pub url: Option<Text>,
    #[serde(rename = "IconUrl", default)]
    pub icon_url: Option<Text>,
    #[serde(rename = "Provider", default)]
    pub provider: Option<Provider>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct Provider {
    #[serde(rename = "Name", default)]
    pub name: Option<Text>,
}

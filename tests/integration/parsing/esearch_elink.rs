//! ESearch and ELink parsing tests

#[path = "../common/mod.rs"]
mod common;

use rstest::rstest;

use pubmed_eutils::pubmed::parser::{parse_count, parse_ids, parse_links, parse_search_page};
use pubmed_eutils::{LinkRecord, PubMedError};

use common::{ELINK_PRLINKS, ESEARCH_ASTHMA, ESEARCH_EMPTY, load_fixture};

#[test]
fn test_esearch_fixture() {
    let xml = load_fixture(ESEARCH_ASTHMA);

    assert_eq!(parse_count(&xml).unwrap(), 2);
    assert_eq!(parse_ids(&xml).unwrap(), vec!["31978945", "25760099"]);

    let page = parse_search_page(&xml, 0).unwrap();
    assert_eq!(page.total_count, 2);
    assert_eq!(page.offset, 0);
    assert_eq!(page.ids.len(), 2);
}

#[test]
fn test_esearch_no_results() {
    let xml = load_fixture(ESEARCH_EMPTY);
    assert_eq!(parse_count(&xml).unwrap(), 0);
    assert!(parse_ids(&xml).unwrap().is_empty());
}

#[rstest]
#[case::no_children("<eSearchResult/>")]
#[case::no_id_list("<eSearchResult><Count>12</Count></eSearchResult>")]
#[case::empty_id_list("<eSearchResult><Count>12</Count><IdList></IdList></eSearchResult>")]
fn test_esearch_missing_ids_is_empty(#[case] xml: &str) {
    assert!(parse_ids(xml).unwrap().is_empty());
}

#[rstest]
#[case::numeric("<eSearchResult><Count>42</Count></eSearchResult>", 0, 42)]
#[case::padded("<eSearchResult><Count> 7 </Count></eSearchResult>", 0, 7)]
#[case::non_numeric("<eSearchResult><Count>many</Count></eSearchResult>", 0, 0)]
#[case::missing("<eSearchResult/>", 0, 0)]
#[case::offset_is_kept("<eSearchResult><Count>100</Count></eSearchResult>", 40, 100)]
fn test_esearch_count_coercion(#[case] xml: &str, #[case] offset: usize, #[case] expected: usize) {
    let page = parse_search_page(xml, offset).unwrap();
    assert_eq!(page.total_count, expected);
    assert_eq!(page.offset, offset);
    assert_eq!(parse_count(xml).unwrap(), expected);
}

#[test]
fn test_elink_fixture() {
    let links = parse_links(&load_fixture(ELINK_PRLINKS)).unwrap();

    assert_eq!(
        links,
        vec![
            LinkRecord {
                pmid: "31978945".to_string(),
                url: "https://www.nejm.org/doi/10.1056/NEJMoa2001017".to_string(),
                icon_url: "https://cdn.ncbi.nlm.nih.gov/corehtml/query/egifs/https:--www.nejm.org-images-nejm_logo.gif".to_string(),
                provider_name: "Atypon".to_string(),
            },
            LinkRecord {
                pmid: "25760099".to_string(),
                ..Default::default()
            },
        ]
    );
}

#[test]
fn test_elink_nested_link_set_layout() {
    let xml = r#"<eLinkResult>
    <LinkSet>
        <LinkSet>
            <IdUrlSet>
                <Id>100</Id>
                <ObjUrl>
                    <Url>https://example.org/a</Url>
                    <IconUrl>https://example.org/a.png</IconUrl>
                    <Provider><Name>Example Press</Name></Provider>
                </ObjUrl>
            </IdUrlSet>
            <IdUrlSet>
                <Id>200</Id>
                <ObjUrl>
                    <Url>https://example.org/b</Url>
                </ObjUrl>
            </IdUrlSet>
        </LinkSet>
    </LinkSet>
</eLinkResult>"#;

    let links = parse_links(xml).unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(links[0].provider_name, "Example Press");
    assert_eq!(links[0].icon_url, "https://example.org/a.png");
    assert_eq!(links[1].pmid, "200");
    assert_eq!(links[1].url, "https://example.org/b");
    assert_eq!(links[1].icon_url, "");
    assert_eq!(links[1].provider_name, "");
}

#[rstest]
#[case::no_link_set("<eLinkResult/>")]
#[case::empty_link_set("<eLinkResult><LinkSet><DbFrom>pubmed</DbFrom></LinkSet></eLinkResult>")]
#[case::empty_url_list("<eLinkResult><LinkSet><IdUrlList/></LinkSet></eLinkResult>")]
fn test_elink_missing_path_is_empty(#[case] xml: &str) {
    assert!(parse_links(xml).unwrap().is_empty());
}

#[test]
fn test_elink_malformed() {
    let result = parse_links("<eLinkResult><LinkSet>");
    assert!(matches!(
        result,
        Err(PubMedError::MalformedResponseError { .. })
    ));
}

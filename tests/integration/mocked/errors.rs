//! Error propagation from the transport and parsing stages

#[path = "../common/mod.rs"]
mod common;

use std::time::Duration;

use rstest::rstest;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pubmed_eutils::{ClientConfig, PubMedClient, PubMedError, RequestOptions, TermBuilder};

use common::{ESEARCH_ASTHMA, create_mock_client, load_fixture, mock_config};

fn asthma() -> TermBuilder {
    TermBuilder::new().query("asthma")
}

#[rstest]
#[case::not_found(404, false)]
#[case::bad_request(400, false)]
#[case::rate_limited(429, true)]
#[case::server_error(500, true)]
#[case::unavailable(503, true)]
#[tokio::test]
async fn test_http_status_maps_to_transport_error(#[case] status: u16, #[case] retryable: bool) {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let err = client
        .request(&asthma(), 0, &RequestOptions::default())
        .await
        .unwrap_err();

    match &err {
        PubMedError::TransportError { status: got, .. } => assert_eq!(*got, Some(status)),
        other => panic!("expected transport error, got {other:?}"),
    }
    assert_eq!(err.kind(), "transport_error");
    assert_eq!(err.is_retryable(), retryable);
}

#[tokio::test]
async fn test_fetch_failure_after_successful_search() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture(ESEARCH_ASTHMA)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let err = client
        .request(&asthma(), 0, &RequestOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PubMedError::TransportError {
            status: Some(502),
            ..
        }
    ));
}

#[rstest]
#[case::html_page("<html><head><title>Oops</title></head><body>Backend down")]
#[case::empty_body("")]
#[case::mismatched_tags("<eSearchResult><Count>1</IdList></eSearchResult>")]
#[tokio::test]
async fn test_malformed_search_body(#[case] body: &'static str) {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let err = client
        .request(&asthma(), 0, &RequestOptions::default())
        .await
        .unwrap_err();

    assert!(
        matches!(err, PubMedError::MalformedResponseError { .. }),
        "expected malformed response, got {err:?}"
    );
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_malformed_fetch_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<PubmedArticleSet><PubmedArticle>"),
        )
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let err = client
        .fetch_records(&["31978945"], &RequestOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "malformed_response_error");
}

#[tokio::test]
async fn test_timeout_is_a_retryable_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(load_fixture(ESEARCH_ASTHMA))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client = PubMedClient::with_config(
        mock_config(&mock_server).with_timeout(Duration::from_millis(200)),
    )
    .unwrap();

    let err = client
        .request(&asthma(), 0, &RequestOptions::default())
        .await
        .unwrap_err();

    match &err {
        PubMedError::TransportError { status, .. } => assert_eq!(*status, None),
        other => panic!("expected transport error, got {other:?}"),
    }
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_connection_refused_is_a_transport_error() {
    // Bind then drop a listener to get a port nobody listens on
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let client = PubMedClient::with_config(
        ClientConfig::new().with_base_url(format!("http://127.0.0.1:{port}")),
    )
    .unwrap();

    let err = client
        .fetch_links(&["31978945"], &RequestOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PubMedError::TransportError { status: None, .. }
    ));
    assert!(err.is_retryable());
}

#[rstest]
#[case::zero_retmax(ClientConfig::new().with_retmax(0))]
#[case::huge_retmax(ClientConfig::new().with_retmax(10_001))]
#[case::empty_db(ClientConfig::new().with_db(""))]
#[case::cache_without_directory(ClientConfig::new().with_cache_enabled(true))]
#[case::zero_timeout(ClientConfig::new().with_timeout(Duration::ZERO))]
fn test_invalid_configuration_is_rejected(#[case] config: ClientConfig) {
    let err = PubMedClient::with_config(config).unwrap_err();
    assert_eq!(err.kind(), "invalid_config");
}

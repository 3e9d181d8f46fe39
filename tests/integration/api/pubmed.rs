//! Real E-utilities API integration tests
//!
//! These tests make actual network calls to NCBI and catch schema drift the
//! recorded fixtures cannot.
//!
//! **IMPORTANT**: These tests are only run when:
//! 1. The `integration-tests` feature is enabled
//! 2. The `PUBMED_REAL_API_TESTS` environment variable is set
//!
//! To run these tests:
//! ```bash
//! PUBMED_REAL_API_TESTS=1 cargo test --features integration-tests --test pubmed_api_tests
//! ```

#[path = "../common/mod.rs"]
mod common;

#[cfg(feature = "integration-tests")]
mod integration_tests {
    use std::time::Duration;

    use tempfile::TempDir;
    use tokio::time::sleep;
    use tracing::info;

    use pubmed_eutils::{ClientConfig, PubMedClient, RequestOptions, TermBuilder};

    use crate::common::integration_test_utils::{
        TEST_PMIDS, create_test_client, init_logging, should_run_real_api_tests,
    };

    // NCBI allows three requests per second without an API key
    async fn pause() {
        sleep(Duration::from_millis(400)).await;
    }

    #[tokio::test]
    async fn test_search_pipeline_real_api() {
        if !should_run_real_api_tests() {
            info!("Skipping real API test - enable with PUBMED_REAL_API_TESTS=1");
            return;
        }

        let client = create_test_client();
        let outcome = client
            .request(
                &TermBuilder::new().query("covid-19"),
                0,
                &RequestOptions::default(),
            )
            .await
            .expect("search should succeed");

        info!(count = outcome.count, returned = outcome.articles.len(), "Search finished");
        assert!(outcome.count > 1000);
        assert_eq!(outcome.articles.len(), 10);
        assert!(outcome.articles.iter().all(|a| !a.pmid.is_empty()));
        pause().await;
    }

    #[tokio::test]
    async fn test_fetch_known_records_real_api() {
        if !should_run_real_api_tests() {
            return;
        }

        let client = create_test_client();
        let records = client
            .fetch_records(TEST_PMIDS, &RequestOptions::default())
            .await
            .expect("fetch should succeed");

        assert_eq!(records.len(), TEST_PMIDS.len());
        let first = &records[0];
        assert_eq!(first.pmid, "31978945");
        assert!(first.title.contains("Coronavirus"));
        assert!(!first.authors.is_empty());
        assert!(first.article_ids.contains("10.1056/NEJMoa2001017"));
        pause().await;
    }

    #[tokio::test]
    async fn test_fetch_links_real_api() {
        if !should_run_real_api_tests() {
            return;
        }

        let client = create_test_client();
        let links = client
            .fetch_links(&["31978945"], &RequestOptions::default())
            .await
            .expect("link lookup should succeed");

        assert!(links.iter().all(|l| l.pmid == "31978945"));
        info!(links = links.len(), "Link lookup finished");
        pause().await;
    }

    #[tokio::test]
    async fn test_cached_second_page_real_api() {
        if !should_run_real_api_tests() {
            return;
        }
        init_logging();

        let cache_dir = TempDir::new().unwrap();
        let client =
            PubMedClient::with_config(ClientConfig::new().with_cache_dir(cache_dir.path()))
                .unwrap();
        let options = RequestOptions::default();

        let fresh = client
            .search_page(Some("asthma"), None, None, 2, &options)
            .await
            .unwrap();
        pause().await;
        let cached = client
            .search_page(Some("asthma"), None, None, 2, &options)
            .await
            .unwrap();

        assert_eq!(fresh.retstart, 10);
        assert!(!fresh.from_cache);
        assert!(cached.from_cache);
        assert_eq!(fresh.articles, cached.articles);
    }
}

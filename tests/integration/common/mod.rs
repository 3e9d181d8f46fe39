//! Shared helpers for integration tests
#![allow(dead_code)]

use std::path::PathBuf;

use wiremock::MockServer;

use pubmed_eutils::{ClientConfig, PubMedClient};

/// Path of a file under `tests/integration/test_data`
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("integration")
        .join("test_data")
        .join(name)
}

/// Read a fixture, panicking with the path when it is missing
pub fn load_fixture(name: &str) -> String {
    let path = fixture_path(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

/// Configuration pointed at a wiremock server
pub fn mock_config(mock_server: &MockServer) -> ClientConfig {
    ClientConfig::new().with_base_url(mock_server.uri())
}

/// Client pointed at a wiremock server, without a cache
pub fn create_mock_client(mock_server: &MockServer) -> PubMedClient {
    PubMedClient::with_config(mock_config(mock_server)).expect("mock config is valid")
}

pub const ESEARCH_ASTHMA: &str = "esearch_asthma.xml";
pub const ESEARCH_EMPTY: &str = "esearch_empty.xml";
pub const EFETCH_TWO_ARTICLES: &str = "efetch_two_articles.xml";
pub const ELINK_PRLINKS: &str = "elink_prlinks.xml";

#[cfg(feature = "integration-tests")]
pub mod integration_test_utils {
    use std::env;
    use std::sync::Once;

    use pubmed_eutils::PubMedClient;

    static INIT: Once = Once::new();

    /// Real API tests run only when `PUBMED_REAL_API_TESTS` is set
    pub fn should_run_real_api_tests() -> bool {
        env::var("PUBMED_REAL_API_TESTS").is_ok()
    }

    /// Install a log subscriber honouring `RUST_LOG` (once per process)
    pub fn init_logging() {
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .with_test_writer()
                .try_init();
        });
    }

    pub fn create_test_client() -> PubMedClient {
        init_logging();
        PubMedClient::new().expect("default config is valid")
    }

    /// Well-known, stable PMIDs
    pub const TEST_PMIDS: &[&str] = &["31978945", "33515491", "25760099"];
}

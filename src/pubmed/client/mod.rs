//! Raw E-utilities HTTP calls
//!
//! [`EutilsClient`] issues exactly one GET per call against `esearch.fcgi`,
//! `efetch.fcgi` or `elink.fcgi` and hands back the XML body. Query strings
//! are assembled in a fixed parameter order so that URLs are reproducible.
//! There are no retries: callers wanting resilience wrap these calls and
//! consult [`PubMedError::is_retryable`].

mod elink;

use reqwest::header::{REFERER, USER_AGENT};
use reqwest::{Client, Response};
use tracing::{debug, info, instrument, warn};

use crate::config::{ClientConfig, RequestOptions};
use crate::error::{PubMedError, Result};
use crate::pubmed::parser::ensure_well_formed;

/// Client for the esearch, efetch and elink endpoints
#[derive(Clone, Debug)]
pub struct EutilsClient {
    client: Client,
    base_url: String,
    config: ClientConfig,
}

impl EutilsClient {
    /// Create a client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::new())
    }

    /// Create a client from a validated configuration
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_eutils::{ClientConfig, EutilsClient};
    /// use std::time::Duration;
    ///
    /// let client = EutilsClient::with_config(
    ///     ClientConfig::new().with_timeout(Duration::from_secs(5)),
    /// )
    /// .unwrap();
    /// assert_eq!(
    ///     client.elink_url("pubmed", &["1".to_string()]),
    ///     "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/elink.fcgi?dbfrom=pubmed&id=1&cmd=prlinks"
    /// );
    /// ```
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .user_agent(config.effective_user_agent())
            .timeout(config.timeout)
            .build()
            .map_err(|e| PubMedError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Self::with_client(client, config)
    }

    /// Use a caller-supplied `reqwest::Client`.
    ///
    /// The configured timeout and user agent are not applied to `client`;
    /// the per-request headers still are.
    pub fn with_client(client: Client, config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let base_url = config.effective_base_url().to_string();
        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `esearch.fcgi?db=..&retmax=..&retstart=..&term=..`
    ///
    /// `encoded_term` must already be percent-encoded.
    pub fn esearch_url(
        &self,
        encoded_term: &str,
        db: &str,
        retmax: usize,
        retstart: usize,
    ) -> String {
        format!(
            "{}/esearch.fcgi?db={}&retmax={}&retstart={}&term={}",
            self.base_url, db, retmax, retstart, encoded_term
        )
    }

    /// `efetch.fcgi?db=..&retmax=..&retmode=..&id=..` with comma-joined ids
    pub fn efetch_url(&self, db: &str, retmax: usize, retmode: &str, ids: &[String]) -> String {
        format!(
            "{}/efetch.fcgi?db={}&retmax={}&retmode={}&id={}",
            self.base_url,
            db,
            retmax,
            retmode,
            ids.join(",")
        )
    }

    /// `elink.fcgi?dbfrom=..&id=..&cmd=prlinks` with comma-joined ids
    pub fn elink_url(&self, db: &str, ids: &[String]) -> String {
        format!(
            "{}/elink.fcgi?dbfrom={}&id={}&cmd=prlinks",
            self.base_url,
            db,
            ids.join(",")
        )
    }

    /// Run esearch and return the raw XML
    #[instrument(skip(self, encoded_term, options), fields(term_len = encoded_term.len()))]
    pub async fn search(
        &self,
        encoded_term: &str,
        db: &str,
        retmax: usize,
        retstart: usize,
        options: &RequestOptions,
    ) -> Result<String> {
        let url = self.esearch_url(encoded_term, db, retmax, retstart);
        let xml = self.get_xml(&url, options).await?;
        info!(bytes = xml.len(), "ESearch completed");
        Ok(xml)
    }

    /// Run efetch for `ids` and return the raw XML
    #[instrument(skip(self, ids, options), fields(ids_count = ids.len()))]
    pub async fn fetch(
        &self,
        db: &str,
        retmax: usize,
        retmode: &str,
        ids: &[String],
        options: &RequestOptions,
    ) -> Result<String> {
        let url = self.efetch_url(db, retmax, retmode, ids);
        let xml = self.get_xml(&url, options).await?;
        info!(bytes = xml.len(), "EFetch completed");
        Ok(xml)
    }

    /// GET `url` and return its body once it is known to be well-formed XML
    pub(crate) async fn get_xml(&self, url: &str, options: &RequestOptions) -> Result<String> {
        let response = self.make_request(url, options).await?;
        let body = response.text().await?;
        ensure_well_formed(&body)?;
        Ok(body)
    }

    async fn make_request(&self, url: &str, options: &RequestOptions) -> Result<Response> {
        debug!("Making API request to: {}", url);

        let mut request = self.client.get(url);
        if let Some(user_agent) = options.user_agent.as_deref() {
            request = request.header(USER_AGENT, user_agent);
        }
        if let Some(referer) = self.config.referer.as_deref() {
            request = request.header(REFERER, referer);
        }

        let response = request.send().await.map_err(PubMedError::from)?;

        if !response.status().is_success() {
            warn!("API request failed with status: {}", response.status());
            return Err(PubMedError::TransportError {
                status: Some(response.status().as_u16()),
                message: response
                    .status()
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
            });
        }

        Ok(response)
    }
}

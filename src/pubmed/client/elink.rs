//! ELink `cmd=prlinks` (outbound full-text provider links)

use tracing::{info, instrument};

use super::EutilsClient;
use crate::config::RequestOptions;
use crate::error::Result;

impl EutilsClient {
    /// Run elink for `ids` and return the raw XML
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pubmed_eutils::{EutilsClient, RequestOptions};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = EutilsClient::new()?;
    ///     let xml = client
    ///         .link("pubmed", &["31978945".to_string()], &RequestOptions::default())
    ///         .await?;
    ///     println!("{xml}");
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self, ids, options), fields(ids_count = ids.len()))]
    pub async fn link(&self, db: &str, ids: &[String], options: &RequestOptions) -> Result<String> {
        let url = self.elink_url(db, ids);
        let xml = self.get_xml(&url, options).await?;
        info!(bytes = xml.len(), "ELink completed");
        Ok(xml)
    }
}

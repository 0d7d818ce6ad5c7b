use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use super::{PackageDescriptor, RemoteCatalog};

/// Catalog implementation that fetches a JSON package index over HTTP.
///
/// The index is expected to be a JSON array of [`PackageDescriptor`]s.
/// Timeouts and proxies are whatever the provided [`Client`] is configured
/// with; this type adds no retry policy of its own.
pub struct HttpCatalog {
    client: Client,
}

impl HttpCatalog {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Default for HttpCatalog {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

#[async_trait]
impl RemoteCatalog for HttpCatalog {
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<Vec<PackageDescriptor>> {
        debug!("Fetching package index from {}...", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?
            .error_for_status()
            .with_context(|| format!("Package index at {} returned an error status", url))?;

        let descriptors: Vec<PackageDescriptor> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse package index from {}", url))?;

        debug!("Fetched {} package descriptors from {}", descriptors.len(), url);
        Ok(descriptors)
    }
}

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, StatusCode, Url};
use tracing::debug;

use super::Store;
use crate::config::CloudflareConfig;

/// Workers KV namespace accessed through the Cloudflare REST API.
pub struct CloudflareKvStore {
    http: reqwest::Client,
    config: CloudflareConfig,
}

impl CloudflareKvStore {
    pub fn new(config: CloudflareConfig) -> Self {
        Self {
            http: crate::client::client(),
            config,
        }
    }

    fn value_url(&self, key: &str) -> anyhow::Result<Url> {
        let mut url = Url::parse(&self.config.api_url)
            .with_context(|| format!("invalid cloudflare api url {}", self.config.api_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::Error::msg("cloudflare api url cannot be a base"))?
            .pop_if_empty()
            .extend([
                "accounts",
                self.config.account_id.as_str(),
                "storage",
                "kv",
                "namespaces",
                self.config.namespace_id.as_str(),
                "values",
                key,
            ]);
        Ok(url)
    }
}

#[async_trait]
impl Store for CloudflareKvStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let url = self.value_url(key)?;
        debug!(%url, "kv read");
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.config.api_token)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let value = response.error_for_status()?.text().await?;
        Ok(Some(value))
    }

    async fn put(&self, key: &str, value: String) -> anyhow::Result<()> {
        let url = self.value_url(key)?;
        debug!(%url, %value, "kv write");
        self.http
            .put(url)
            .bearer_auth(&self.config.api_token)
            .header(CONTENT_TYPE, "text/plain")
            .body(value)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

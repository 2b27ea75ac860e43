//! Client side of the counter, what a page embedding the widget does:
//! count the visit once per session, then show the current total.

use std::{env, fmt};

use serde::Deserialize;
use tracing::warn;

pub const LOCAL_API_URL: &str = "http://localhost:8787";
pub const PRODUCTION_API_URL: &str = "https://visitor-counter.visitorcounter.workers.dev";

/// Local development pages talk to the local worker, anything else to production.
pub fn api_url_for_host(hostname: &str) -> &'static str {
    if hostname == "localhost" {
        LOCAL_API_URL
    } else {
        PRODUCTION_API_URL
    }
}

#[derive(Deserialize)]
struct CountResponse {
    count: Option<u64>,
}

#[derive(Clone)]
pub struct CounterClient {
    http: reqwest::Client,
    base_url: String,
}

impl CounterClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: crate::client::client(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn for_host(hostname: &str) -> Self {
        Self::new(api_url_for_host(hostname))
    }

    /// `COUNTER_API_URL` when set, production otherwise.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::new(env::var("COUNTER_API_URL").unwrap_or(PRODUCTION_API_URL.into()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `None` when the service answered without a count.
    pub async fn get(&self) -> anyhow::Result<Option<u64>> {
        let response = self
            .http
            .get(format!("{}/counts/get", self.base_url))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<CountResponse>().await?.count)
    }

    pub async fn increment(&self) -> anyhow::Result<Option<u64>> {
        let response = self
            .http
            .post(format!("{}/counts/increment", self.base_url))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<CountResponse>().await?.count)
    }
}

/// What the page shows in place of the count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountLabel {
    Count(u64),
    /// Service answered without a count.
    Missing,
    /// Service unreachable or the answer was unreadable.
    Unavailable,
}

impl fmt::Display for CountLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountLabel::Count(n) => write!(f, "{n}"),
            CountLabel::Missing => f.write_str("0"),
            CountLabel::Unavailable => f.write_str("--"),
        }
    }
}

/// One browsing session. The first visit increments, later ones only read.
pub struct Session {
    client: CounterClient,
    visited: bool,
}

impl Session {
    pub fn new(client: CounterClient) -> Self {
        Self {
            client,
            visited: false,
        }
    }

    pub fn visited(&self) -> bool {
        self.visited
    }

    pub async fn visit(&mut self) -> CountLabel {
        if !self.visited {
            // Marked before the outcome is known, a failed increment is not retried.
            self.visited = true;
            if let Err(e) = self.client.increment().await {
                warn!(error = %e, "Error incrementing visitor count");
            }
        }
        self.label().await
    }

    pub async fn label(&self) -> CountLabel {
        match self.client.get().await {
            Ok(Some(count)) => CountLabel::Count(count),
            Ok(None) => CountLabel::Missing,
            Err(e) => {
                warn!(error = %e, "Error fetching visitor count");
                CountLabel::Unavailable
            }
        }
    }
}

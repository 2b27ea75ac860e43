//! Counter settings, read from the environment (and `.env` when present).
//!
//! | Variable | Default |
//! |---|---|
//! | `COUNTER_STORE` | `memory` (`memory`, `cloudflare`, `sqlite` or `none`) |
//! | `COUNTER_KEY` | `count` |
//! | `COUNTER_FALLBACK` | `42` |
//! | `COUNTER_SYNTHETIC_MIN` | `50` |
//! | `COUNTER_SYNTHETIC_MAX` | `150`, exclusive |
//! | `CLOUDFLARE_API_URL` | `https://api.cloudflare.com/client/v4` |
//! | `CLOUDFLARE_ACCOUNT_ID`, `CLOUDFLARE_KV_NAMESPACE_ID`, `CLOUDFLARE_API_TOKEN` | required for `cloudflare` |
//!
//! The `sqlite` store reads `DATABASE_URL` and `DATABASE_MAX_CONNECTIONS` when it opens.

use std::{env, fmt::Debug, str::FromStr};

use anyhow::Context;

use crate::counter::DEFAULT_KEY;
use crate::fallback::{Fallback, DEFAULT_FALLBACK_COUNT, DEFAULT_SYNTHETIC_RANGE};

pub const DEFAULT_CLOUDFLARE_API_URL: &str = "https://api.cloudflare.com/client/v4";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    Cloudflare,
    Sqlite,
    /// No store bound: every answer is a fallback value.
    Disabled,
}

impl FromStr for StoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreKind::Memory),
            "cloudflare" => Ok(StoreKind::Cloudflare),
            "sqlite" => Ok(StoreKind::Sqlite),
            "none" => Ok(StoreKind::Disabled),
            other => Err(anyhow::anyhow!("unknown counter store {other:?}")),
        }
    }
}

#[derive(Clone)]
pub struct CloudflareConfig {
    pub api_url: String,
    pub account_id: String,
    pub namespace_id: String,
    pub api_token: String,
}

impl Debug for CloudflareConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareConfig")
            .field("api_url", &self.api_url)
            .field("account_id", &self.account_id)
            .field("namespace_id", &self.namespace_id)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub struct CounterConfig {
    pub store: StoreKind,
    pub key: String,
    pub fallback: Fallback,
    pub cloudflare: Option<CloudflareConfig>,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            store: StoreKind::Memory,
            key: DEFAULT_KEY.into(),
            fallback: Fallback::default(),
            cloudflare: None,
        }
    }
}

impl CounterConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source, `lookup` returns `None` for unset names.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let store = match lookup("COUNTER_STORE") {
            Some(s) => s.parse()?,
            None => StoreKind::Memory,
        };
        let key = lookup("COUNTER_KEY").unwrap_or_else(|| DEFAULT_KEY.into());
        let fallback = Fallback {
            count: parse_or(&lookup, "COUNTER_FALLBACK", DEFAULT_FALLBACK_COUNT)?,
            synthetic: parse_or(&lookup, "COUNTER_SYNTHETIC_MIN", DEFAULT_SYNTHETIC_RANGE.start)?
                ..parse_or(&lookup, "COUNTER_SYNTHETIC_MAX", DEFAULT_SYNTHETIC_RANGE.end)?,
        };
        let cloudflare = if store == StoreKind::Cloudflare {
            let required = |name: &str| {
                lookup(name).with_context(|| format!("{name} is required for the cloudflare store"))
            };
            Some(CloudflareConfig {
                api_url: lookup("CLOUDFLARE_API_URL")
                    .unwrap_or_else(|| DEFAULT_CLOUDFLARE_API_URL.into()),
                account_id: required("CLOUDFLARE_ACCOUNT_ID")?,
                namespace_id: required("CLOUDFLARE_KV_NAMESPACE_ID")?,
                api_token: required("CLOUDFLARE_API_TOKEN")?,
            })
        } else {
            None
        };
        let config = Self {
            store,
            key,
            fallback,
            cloudflare,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.key.trim().is_empty() {
            anyhow::bail!("COUNTER_KEY must not be empty");
        }
        if self.fallback.synthetic.is_empty() {
            anyhow::bail!(
                "COUNTER_SYNTHETIC_MIN ({}) must be lower than COUNTER_SYNTHETIC_MAX ({})",
                self.fallback.synthetic.start,
                self.fallback.synthetic.end
            );
        }
        Ok(())
    }
}

fn parse_or<T>(lookup: impl Fn(&str) -> Option<String>, name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(s) => s
            .trim()
            .parse::<T>()
            .with_context(|| format!("{name} has an invalid value {s:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults() {
        let config = CounterConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.key, "count");
        assert_eq!(config.fallback, Fallback::default());
        assert!(config.cloudflare.is_none());
    }

    #[test]
    fn fallback_overrides() {
        let config = CounterConfig::from_lookup(lookup(&[
            ("COUNTER_STORE", "none"),
            ("COUNTER_FALLBACK", "7"),
            ("COUNTER_SYNTHETIC_MIN", "1"),
            ("COUNTER_SYNTHETIC_MAX", "3"),
        ]))
        .unwrap();
        assert_eq!(config.store, StoreKind::Disabled);
        assert_eq!(config.fallback.count, 7);
        assert_eq!(config.fallback.synthetic, 1..3);
    }

    #[test]
    fn empty_synthetic_range_is_rejected() {
        let result = CounterConfig::from_lookup(lookup(&[
            ("COUNTER_SYNTHETIC_MIN", "10"),
            ("COUNTER_SYNTHETIC_MAX", "10"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let result = CounterConfig::from_lookup(lookup(&[("COUNTER_FALLBACK", "-1")]));
        assert!(result.is_err());
    }

    #[test]
    fn unknown_store_is_rejected() {
        let result = CounterConfig::from_lookup(lookup(&[("COUNTER_STORE", "redis")]));
        assert!(result.is_err());
    }

    #[test]
    fn cloudflare_requires_credentials() {
        let result = CounterConfig::from_lookup(lookup(&[
            ("COUNTER_STORE", "cloudflare"),
            ("CLOUDFLARE_ACCOUNT_ID", "acc"),
        ]));
        assert!(result.is_err());

        let config = CounterConfig::from_lookup(lookup(&[
            ("COUNTER_STORE", "cloudflare"),
            ("CLOUDFLARE_ACCOUNT_ID", "acc"),
            ("CLOUDFLARE_KV_NAMESPACE_ID", "ns"),
            ("CLOUDFLARE_API_TOKEN", "secret"),
        ]))
        .unwrap();
        let cf = config.cloudflare.unwrap();
        assert_eq!(cf.api_url, DEFAULT_CLOUDFLARE_API_URL);
        assert_eq!(cf.namespace_id, "ns");
        assert!(!format!("{cf:?}").contains("secret"));
    }
}

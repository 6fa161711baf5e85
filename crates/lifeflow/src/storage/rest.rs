//! Donor store backed by a managed Postgres table.
//!
//! Hosted Postgres services expose each table through a PostgREST endpoint at
//! `<project>/rest/v1/<table>`. Filters are query parameters of the form
//! `column=eq.value`, ordering is `order=column.desc`, and the project's API
//! key travels in both the `apikey` and `Authorization` headers.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::config::RemoteConfig;
use crate::donor::{Donor, NewDonor};
use crate::error::{Error, Result};
use crate::search::DonorQuery;

use super::{DonorStore, StoreStats};

/// Donor store reached over a PostgREST interface.
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    endpoint: Url,
}

#[derive(Debug, Deserialize)]
struct CreatedAt {
    created_at: DateTime<Utc>,
}

impl RestStore {
    /// Build a store for the configured project and table.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or API key is malformed, or the HTTP client
    /// cannot be built.
    pub fn new(config: &RemoteConfig, timeout: Duration) -> Result<Self> {
        let endpoint = format!(
            "{}/rest/v1/{}",
            config.url.trim_end_matches('/'),
            config.table
        );
        let endpoint = Url::parse(&endpoint).map_err(|e| Error::ConfigValidation {
            message: format!("invalid remote endpoint {endpoint}: {e}"),
        })?;

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.api_key).map_err(|_| Error::ConfigValidation {
            message: "remote.api_key contains characters not allowed in a header".to_string(),
        })?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key)).map_err(|_| {
            Error::ConfigValidation {
                message: "remote.api_key contains characters not allowed in a header".to_string(),
            }
        })?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, endpoint })
    }

    /// The table endpoint requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn select(&self) -> RequestBuilder {
        self.client.get(self.endpoint.clone())
    }

    /// Equality filters on blood group and district, newest first.
    fn search_request(&self, query: &DonorQuery) -> RequestBuilder {
        self.select().query(&[
            ("select", "*".to_string()),
            ("blood_group", format!("eq.{}", query.blood_group)),
            ("district", format!("eq.{}", query.district)),
            ("order", "created_at.desc".to_string()),
        ])
    }

    async fn send(request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .text()
            .await
            .ok()
            .filter(|body| !body.trim().is_empty())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
        Err(Error::Remote {
            status: status.as_u16(),
            message,
        })
    }
}

/// Total row count from a `Content-Range` header such as `0-0/42` or `*/0`.
fn total_from_content_range(value: &str) -> Option<u64> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}

#[async_trait]
impl DonorStore for RestStore {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn insert(&self, donor: &NewDonor) -> Result<Donor> {
        let request = self
            .client
            .post(self.endpoint.clone())
            .header("Prefer", "return=representation")
            .json(donor);

        let mut rows: Vec<Donor> = Self::send(request).await?.json().await?;
        let stored = rows
            .pop()
            .ok_or_else(|| Error::internal("insert returned no rows"))?;
        debug!("Inserted donor with id {}", stored.id);
        Ok(stored)
    }

    async fn search(&self, query: &DonorQuery) -> Result<Vec<Donor>> {
        let request = self.search_request(query);
        let donors: Vec<Donor> = Self::send(request).await?.json().await?;
        debug!(
            "Found {} donors for {} in {}",
            donors.len(),
            query.blood_group,
            query.district
        );
        Ok(donors)
    }

    async fn get(&self, id: i64) -> Result<Option<Donor>> {
        let request = self
            .select()
            .query(&[("select", "*".to_string()), ("id", format!("eq.{id}"))]);

        let mut donors: Vec<Donor> = Self::send(request).await?.json().await?;
        Ok(donors.pop())
    }

    async fn stats(&self) -> Result<StoreStats> {
        let request = self
            .select()
            .header("Prefer", "count=exact")
            .query(&[
                ("select", "created_at"),
                ("order", "created_at.desc"),
                ("limit", "1"),
            ]);

        let response = Self::send(request).await?;
        let total = response
            .headers()
            .get("content-range")
            .and_then(|value| value.to_str().ok())
            .and_then(total_from_content_range);
        let newest: Vec<CreatedAt> = response.json().await?;

        Ok(StoreStats {
            backend: self.name(),
            location: self.endpoint.to_string(),
            total_donors: total.unwrap_or_else(|| u64::try_from(newest.len()).unwrap_or(0)),
            newest_registration: newest.first().map(|row| row.created_at),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::donor::BloodGroup;

    fn config(url: &str) -> RemoteConfig {
        RemoteConfig {
            url: url.to_string(),
            api_key: "anon-key".to_string(),
            ..RemoteConfig::default()
        }
    }

    #[test]
    fn test_endpoint() {
        let store = RestStore::new(&config("https://example.supabase.co/"), Duration::from_secs(5))
            .unwrap();
        assert_eq!(
            store.endpoint().as_str(),
            "https://example.supabase.co/rest/v1/donors"
        );
    }

    #[test]
    fn test_rejects_bad_url() {
        let result = RestStore::new(&config("no scheme here"), Duration::from_secs(5));
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));
    }

    #[test]
    fn test_rejects_header_unsafe_key() {
        let mut cfg = config("https://example.supabase.co");
        cfg.api_key = "bad\nkey".to_string();
        let result = RestStore::new(&cfg, Duration::from_secs(5));
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));
    }

    #[test]
    fn test_search_request_filters_only_two_columns() {
        let store = RestStore::new(&config("https://example.supabase.co"), Duration::from_secs(5))
            .unwrap();
        let request = store
            .search_request(&DonorQuery::new(BloodGroup::OPositive, "Pune"))
            .build()
            .unwrap();

        let pairs: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("select".to_string(), "*".to_string()),
                ("blood_group".to_string(), "eq.O+".to_string()),
                ("district".to_string(), "eq.Pune".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
            ]
        );

        let filters: Vec<String> = pairs
            .iter()
            .filter(|(_, v)| v.starts_with("eq."))
            .map(|(k, _)| k.clone())
            .collect();
        assert_eq!(filters, ["blood_group", "district"]);
    }

    #[test]
    fn test_total_from_content_range() {
        assert_eq!(total_from_content_range("0-0/42"), Some(42));
        assert_eq!(total_from_content_range("*/0"), Some(0));
        assert_eq!(total_from_content_range("0-9/*"), None);
        assert_eq!(total_from_content_range("garbage"), None);
    }
}

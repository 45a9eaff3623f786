use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use urlencoding::encode;

use crate::error::{Result, StatsError};
use crate::stats::resolver;
use crate::{Author, Publication};

const MAX_RETRIES: u32 = 3;

pub struct RemoteStore {
    client: Client,
    base_url: String,
}

impl RemoteStore {
    pub fn new(base_url: String, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn authors(&self) -> Result<Vec<Author>> {
        self.collection("authors").await
    }

    pub async fn publications(&self) -> Result<Vec<Publication>> {
        self.collection("publications").await
    }

    /// The API filters by email; the case-insensitive match is re-checked
    /// here so a loose server-side filter cannot pick the wrong record.
    pub async fn author_by_email(&self, email: &str) -> Result<Option<Author>> {
        let url = format!("{}/authors?email={}", self.base_url, encode(email.trim()));
        let candidates: Vec<Author> = self.get_json(&url).await?.unwrap_or_default();
        Ok(resolver::find_by_email(&candidates, email).cloned())
    }

    pub async fn author_by_enid(&self, enid: u64) -> Result<Option<Author>> {
        let url = format!("{}/authors/{}", self.base_url, enid);
        self.get_json(&url).await
    }

    async fn collection<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        let url = format!("{}/{}", self.base_url, name);
        self.get_json(&url)
            .await?
            .ok_or_else(|| StatsError::Storage(format!("{} returned 404", url)))
    }

    /// Ok(None) on 404. Rate limits and transport errors are retried with
    /// backoff; any other failure status is a storage fault.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        for attempt in 0..MAX_RETRIES {
            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        debug!("GET {} -> {}", url, status);
                        return Ok(Some(response.json().await?));
                    } else if status == StatusCode::NOT_FOUND {
                        return Ok(None);
                    } else if status == StatusCode::TOO_MANY_REQUESTS && attempt < MAX_RETRIES - 1 {
                        let wait = response
                            .headers()
                            .get("Retry-After")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .unwrap_or(2u64.pow(attempt));
                        warn!("Rate limited, waiting {}s", wait);
                        tokio::time::sleep(Duration::from_secs(wait)).await;
                        continue;
                    } else {
                        return Err(StatsError::Storage(format!("GET {} failed: HTTP {}", url, status)));
                    }
                }
                Err(e) => {
                    if attempt < MAX_RETRIES - 1 {
                        let wait = 2u64.pow(attempt);
                        warn!("Request error, retrying in {}s: {}", wait, e);
                        tokio::time::sleep(Duration::from_secs(wait)).await;
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }

        Err(StatsError::Storage(format!("GET {}: max retries exceeded", url)))
    }
}

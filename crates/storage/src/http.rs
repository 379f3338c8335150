//! Snapshots from an S3-style bucket served over HTTP.

use crate::{RetrievalError, RetrievalResult, SnapshotSource};
use async_trait::async_trait;
use bytes::Bytes;
use lake_common::{DataCategory, SnapshotEntry};
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Public bucket the lake data pipeline publishes to.
pub const DEFAULT_BASE_URL: &str = "https://lake-tahoe-conditions.s3.us-west-2.amazonaws.com/";

/// Upper bound on listing pages, in case a bucket keeps handing back tokens.
const MAX_LIST_PAGES: usize = 100;

/// Configuration for an HTTP snapshot source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSourceConfig {
    /// Bucket URL; keys are appended to it
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// `GET {base}{key}` for files, `ListObjectsV2` for listings.
#[derive(Debug, Clone)]
pub struct HttpSnapshotSource {
    client: Client,
    base: Url,
}

impl HttpSnapshotSource {
    pub fn new(config: &HttpSourceConfig) -> RetrievalResult<Self> {
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base)
            .map_err(|e| RetrievalError::Request(format!("invalid base URL '{}': {}", base, e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Absolute URL of a key. Spaces in snapshot names are percent-encoded.
    pub fn url_for(&self, path: &str) -> RetrievalResult<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| RetrievalError::Request(format!("invalid key '{}': {}", path, e)))
    }

    async fn list_page(&self, prefix: &str, token: Option<&str>) -> RetrievalResult<ListPage> {
        let mut query = vec![("list-type", "2"), ("prefix", prefix)];
        if let Some(token) = token {
            query.push(("continuation-token", token));
        }

        let response = self.client.get(self.base.clone()).query(&query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::Status {
                status: status.as_u16(),
                path: format!("listing {}", prefix),
            });
        }
        let xml = response.text().await?;
        parse_list_objects(&xml)
    }

    /// Follow continuation tokens for at most `max_pages` pages. Also returns
    /// the token still pending when the page limit cut the listing short.
    async fn list_keys(
        &self,
        prefix: &str,
        max_pages: usize,
    ) -> RetrievalResult<(Vec<String>, Option<String>)> {
        let mut keys = Vec::new();
        let mut token: Option<String> = None;

        for _ in 0..max_pages {
            let page = self.list_page(prefix, token.as_deref()).await?;
            keys.extend(page.keys);
            token = page.next_token;
            if token.is_none() {
                break;
            }
        }
        Ok((keys, token))
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshotSource {
    #[instrument(skip(self), fields(base = %self.base))]
    async fn fetch_binary(&self, path: &str) -> RetrievalResult<Bytes> {
        let url = self.url_for(path)?;
        let response = self.client.get(url).send().await?;

        match response.status() {
            status if status.is_success() => {
                let bytes = response.bytes().await?;
                debug!(size = bytes.len(), "Downloaded snapshot");
                Ok(bytes)
            }
            StatusCode::NOT_FOUND => Err(RetrievalError::NotFound(path.to_string())),
            status => Err(RetrievalError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            }),
        }
    }

    #[instrument(skip(self), fields(base = %self.base))]
    async fn list_available(&self, category: DataCategory) -> RetrievalResult<Vec<SnapshotEntry>> {
        let prefix = format!("{}/", category.path_prefix());
        let (keys, pending) = self.list_keys(&prefix, MAX_LIST_PAGES).await?;
        if pending.is_some() {
            warn!(
                %category,
                pages = MAX_LIST_PAGES,
                keys = keys.len(),
                "Listing still truncated after page limit, snapshots may be missing"
            );
        }

        let entries: Vec<SnapshotEntry> = keys
            .iter()
            .filter(|key| key.ends_with(".npy"))
            .filter_map(|key| match SnapshotEntry::from_path(key) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(key = %key, error = %e, "Skipping key with unparseable name");
                    None
                }
            })
            .collect();

        debug!(count = entries.len(), "Listed bucket snapshots");
        Ok(entries)
    }

    fn describe(&self) -> String {
        self.base.to_string()
    }
}

/// One page of a `ListObjectsV2` response.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ListPage {
    pub keys: Vec<String>,
    /// Set when the listing is truncated
    pub next_token: Option<String>,
}

/// Pull object keys and the continuation token out of a `ListObjectsV2`
/// XML body.
pub fn parse_list_objects(xml: &str) -> RetrievalResult<ListPage> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut page = ListPage::default();
    let mut truncated = false;
    let mut token = None;
    let mut current: Option<Vec<u8>> = None;
    let mut in_contents = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.name().as_ref().to_vec();
                if name == b"Contents" {
                    in_contents = true;
                }
                current = Some(name);
            }
            Ok(Event::Text(t)) => {
                let text = t
                    .unescape()
                    .map_err(|e| RetrievalError::Listing(e.to_string()))?
                    .into_owned();
                match current.as_deref() {
                    Some(b"Key") if in_contents => page.keys.push(text),
                    Some(b"IsTruncated") => truncated = text == "true",
                    Some(b"NextContinuationToken") => token = Some(text),
                    _ => {}
                }
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"Contents" {
                    in_contents = false;
                }
                current = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(RetrievalError::Listing(format!(
                    "XML parsing error at position {}: {:?}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    page.next_token = if truncated { token } else { None };
    Ok(page)
}

//! HTTP client for looking up works in OpenAlex by DOI.

use std::time::Duration;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use sdg_core::{Work, normalize_doi};
use thiserror::Error;
use tracing::info;

pub const DEFAULT_BASE_URL: &str = "https://api.openalex.org";

/// Characters escaped when a DOI is placed in the URL path. `/` stays literal,
/// since every DOI has one between prefix and suffix.
const DOI_PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("OpenAlex returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FetchError {
    /// Upstream HTTP status, if OpenAlex answered with a non-2xx response.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// OpenAlex works API client.
pub struct OpenAlexClient {
    client: reqwest::Client,
    base_url: String,
    mailto: Option<String>,
}

impl OpenAlexClient {
    /// Create a client for `base_url` (e.g. `https://api.openalex.org`, no trailing slash).
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            mailto: None,
        }
    }

    /// Create a client whose requests give up after `timeout`.
    pub fn with_timeout(base_url: String, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sdg-classifier/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            mailto: None,
        })
    }

    /// Identify requests with a contact address (OpenAlex "polite pool").
    pub fn with_mailto(mut self, mailto: Option<String>) -> Self {
        self.mailto = mailto.filter(|m| !m.trim().is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/works/doi:{doi}` for an already-normalised DOI.
    pub fn work_url(&self, doi: &str) -> String {
        format!(
            "{}/works/doi:{}",
            self.base_url,
            utf8_percent_encode(doi, DOI_PATH)
        )
    }

    /// Fetch a work by DOI. Resolver prefixes (`https://doi.org/`) are stripped first.
    pub async fn fetch_work(&self, doi: &str) -> Result<Work, FetchError> {
        let url = self.work_url(normalize_doi(doi));

        info!(url = %url, "fetching work from OpenAlex");
        let mut request = self.client.get(&url);
        if let Some(mailto) = &self.mailto {
            request = request.query(&[("mailto", mailto)]);
        }
        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        let work: Work = serde_json::from_slice(&bytes)?;
        info!(
            id = work.id.as_deref().unwrap_or("-"),
            has_abstract = work.abstract_inverted_index.is_some(),
            "fetched work"
        );
        Ok(work)
    }
}

//! HTTP form source.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use tracing::instrument;

use quizmark_core::model::Form;
use quizmark_core::parser::{parse_form_str, FormFormat};
use quizmark_core::traits::QuestionSource;

use crate::error::SourceError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fetches a form document with a GET request.
///
/// The document format comes from the `Content-Type` header, then from the
/// URL's extension, and falls back to JSON.
pub struct HttpSource {
    url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: &str) -> Result<Self, SourceError> {
        Self::with_options(url, &HashMap::new(), DEFAULT_TIMEOUT_SECS)
    }

    /// Build a source that sends `headers` with every request.
    pub fn with_options(
        url: &str,
        headers: &HashMap<String, String>,
        timeout_secs: u64,
    ) -> Result<Self, SourceError> {
        let mut header_map = HeaderMap::new();
        for (name, value) in headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| SourceError::InvalidHeader(name.clone()))?;
            let header_value =
                HeaderValue::from_str(value).map_err(|_| SourceError::InvalidHeader(name.clone()))?;
            header_map.insert(header_name, header_value);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(header_map)
            .build()
            .map_err(|e| SourceError::Io(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: url.to_string(),
            timeout_secs,
            client,
        })
    }

    fn format_for(&self, content_type: Option<&str>) -> FormFormat {
        if let Some(format) = content_type.and_then(FormFormat::from_content_type) {
            return format;
        }
        let path = self
            .url
            .split(['?', '#'])
            .next()
            .unwrap_or(self.url.as_str());
        FormFormat::from_path(Path::new(path)).unwrap_or(FormFormat::Json)
    }
}

#[async_trait]
impl QuestionSource for HttpSource {
    fn name(&self) -> &str {
        &self.url
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn load(&self) -> anyhow::Result<Form> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                SourceError::Io(format!("{} not reachable: {e}", self.url))
            } else {
                SourceError::Io(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status == 404 {
            return Err(SourceError::NotFound(self.url.clone()).into());
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Http {
                url: self.url.clone(),
                status,
                message: body,
            }
            .into());
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let format = self.format_for(content_type.as_deref());

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Io(format!("failed to read response body: {e}")))?;

        tracing::debug!(%format, bytes = body.len(), "fetched form document");
        let form = parse_form_str(&body, format).map_err(SourceError::from)?;
        Ok(form)
    }
}

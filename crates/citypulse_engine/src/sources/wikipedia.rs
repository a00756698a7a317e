use async_trait::async_trait;
use citypulse_core::Summary;
use serde_json::Value;
use url::Url;

use super::{PageSummary, SummaryLookup};
use crate::http::JsonClient;
use crate::{FailureKind, FetchError};

pub const WIKIPEDIA_REST_URL: &str = "https://en.wikipedia.org/api/rest_v1/";

#[derive(Debug, Clone)]
pub struct WikipediaClient {
    client: JsonClient,
    base: Url,
}

impl WikipediaClient {
    /// `base` is the REST root, ending in a slash.
    pub fn new(client: JsonClient, base: Url) -> Self {
        Self { client, base }
    }

    fn summary_url(&self, title: &str) -> Result<Url, FetchError> {
        let mut url = self
            .base
            .join("page/summary/")
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::new(FailureKind::InvalidUrl, "base cannot hold a path"))?
            .pop_if_empty()
            .push(&title.replace(' ', "_"));
        Ok(url)
    }
}

#[async_trait]
impl SummaryLookup for WikipediaClient {
    async fn summarize(&self, title: &str) -> Result<PageSummary, FetchError> {
        let url = self.summary_url(title)?;
        let body = self.client.get_json(url).await?;
        parse_summary(&body)
    }
}

fn parse_summary(body: &Value) -> Result<PageSummary, FetchError> {
    let kind = body
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| FetchError::new(FailureKind::Decode, "summary without type"))?;
    if kind != "standard" {
        return Ok(PageSummary::Other {
            kind: kind.to_string(),
        });
    }

    let html = body.get("extract_html").and_then(Value::as_str);
    let link = body
        .pointer("/content_urls/desktop/page")
        .and_then(Value::as_str);
    match (html, link) {
        (Some(html), Some(link)) => Ok(PageSummary::Standard(Summary {
            html: html.to_string(),
            link: link.to_string(),
        })),
        _ => Err(FetchError::new(
            FailureKind::Decode,
            "standard summary without extract_html or page link",
        )),
    }
}

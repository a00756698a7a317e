use async_trait::async_trait;
use citypulse_core::GeocodeHit;
use serde_json::Value;
use url::Url;

use super::Geocoder;
use crate::http::JsonClient;
use crate::{FailureKind, FetchError};

pub const GEONAMES_SEARCH_URL: &str = "http://api.geonames.org/searchJSON";

/// GeoNames full-text search, keeping the best match only.
#[derive(Debug, Clone)]
pub struct GeoNamesClient {
    client: JsonClient,
    base: Url,
    username: String,
}

impl GeoNamesClient {
    pub fn new(client: JsonClient, base: Url, username: impl Into<String>) -> Self {
        Self {
            client,
            base,
            username: username.into(),
        }
    }
}

#[async_trait]
impl Geocoder for GeoNamesClient {
    async fn geocode(&self, query: &str) -> Result<Option<GeocodeHit>, FetchError> {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("maxRows", "1")
            .append_pair("username", &self.username);

        let body = self.client.get_json(url).await?;
        parse_search(body)
    }
}

fn parse_search(body: Value) -> Result<Option<GeocodeHit>, FetchError> {
    // Errors such as an exhausted credit quota arrive with a 200 status.
    if let Some(status) = body.get("status") {
        let message = status
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        let code = status.get("value").and_then(Value::as_i64);
        return Err(FetchError::new(FailureKind::Provider { code }, message));
    }

    let Some(first) = body
        .get("geonames")
        .and_then(Value::as_array)
        .and_then(|matches| matches.first())
    else {
        return Ok(None);
    };

    let id = match first.get("geonameId") {
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::String(text)) => text.clone(),
        _ => {
            return Err(FetchError::new(
                FailureKind::Decode,
                "match without geonameId",
            ))
        }
    };
    Ok(Some(GeocodeHit {
        id,
        raw: first.to_string(),
    }))
}

use async_trait::async_trait;
use citypulse_core::{Cursor, RawRecord};
use serde_json::Value;
use url::Url;

use super::CommentSource;
use crate::http::JsonClient;
use crate::{FailureKind, FetchError};

pub const PUSHSHIFT_COMMENT_SEARCH_URL: &str = "https://api.pushshift.io/reddit/search/comment";
pub const DEFAULT_SUBREDDIT: &str = "digitalnomad";

/// Comment search API for one subreddit, paged backwards by `created_utc`.
#[derive(Debug, Clone)]
pub struct PushshiftSource {
    client: JsonClient,
    base: Url,
    subreddit: String,
}

impl PushshiftSource {
    pub fn new(client: JsonClient, base: Url, subreddit: impl Into<String>) -> Self {
        Self {
            client,
            base,
            subreddit: subreddit.into(),
        }
    }

    fn url(&self, before: Option<Cursor>, extra: &[(&str, &str)]) -> Url {
        let mut url = self.base.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("subreddit", &self.subreddit);
            if let Some(cursor) = before {
                query.append_pair("before", &cursor.exclusive_before().to_string());
            }
            for (key, value) in extra {
                query.append_pair(key, value);
            }
        }
        url
    }
}

#[async_trait]
impl CommentSource for PushshiftSource {
    async fn fetch_page(
        &self,
        before: Option<Cursor>,
        size: usize,
    ) -> Result<Vec<RawRecord>, FetchError> {
        let size = size.to_string();
        let url = self.url(before, &[("size", size.as_str()), ("sort", "desc")]);
        let body = self.client.get_json(url).await?;
        parse_page(body)
    }

    async fn count_before(&self, before: Option<Cursor>) -> Result<u64, FetchError> {
        let url = self.url(before, &[("metadata", "true"), ("size", "0")]);
        let body = self.client.get_json(url).await?;
        body.pointer("/metadata/total_results")
            .and_then(Value::as_u64)
            .ok_or_else(|| decode_error("missing metadata.total_results"))
    }
}

fn parse_page(body: Value) -> Result<Vec<RawRecord>, FetchError> {
    let Value::Object(mut fields) = body else {
        return Err(decode_error("page is not an object"));
    };
    if fields.len() != 1 {
        let keys: Vec<_> = fields.keys().cloned().collect();
        return Err(decode_error(format!("unexpected page keys {keys:?}")));
    }
    let Some(Value::Array(comments)) = fields.remove("data") else {
        return Err(decode_error("page has no data array"));
    };

    let mut records = comments
        .into_iter()
        .map(parse_comment)
        .collect::<Result<Vec<_>, _>>()?;
    records.sort_by(|a, b| b.sort_key.cmp(&a.sort_key).then_with(|| a.id.cmp(&b.id)));
    Ok(records)
}

fn parse_comment(comment: Value) -> Result<RawRecord, FetchError> {
    let id = comment
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| decode_error("comment without id"))?
        .to_string();
    let created = comment
        .get("created_utc")
        .and_then(|value| value.as_i64().or_else(|| value.as_f64().map(|f| f as i64)))
        .ok_or_else(|| decode_error(format!("comment {id} without created_utc")))?;
    Ok(RawRecord::new(id, created, comment.to_string()))
}

fn decode_error(message: impl Into<String>) -> FetchError {
    FetchError::new(FailureKind::Decode, message)
}

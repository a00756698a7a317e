//! Settings read from the environment, optionally seeded from a `.env` file.
use std::collections::HashMap;

use citypulse_engine::{
    parse_base_url, FetchError, HttpSettings, DEFAULT_SUBREDDIT, GEONAMES_SEARCH_URL,
    PUSHSHIFT_COMMENT_SEARCH_URL, WIKIPEDIA_REST_URL,
};
use thiserror::Error;
use url::Url;

pub const GEONAMES_USERNAME: &str = "GEONAMES_USERNAME";
pub const USER_AGENT: &str = "USER_AGENT";
pub const NER_COMMAND: &str = "NER_COMMAND";
pub const PUSHSHIFT_URL: &str = "PUSHSHIFT_URL";
pub const PUSHSHIFT_SUBREDDIT: &str = "PUSHSHIFT_SUBREDDIT";
pub const GEONAMES_URL: &str = "GEONAMES_URL";
pub const WIKIPEDIA_URL: &str = "WIKIPEDIA_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is not set; export it or add it to .env")]
    Missing { name: &'static str },
    #[error("{name} is not a valid URL: {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: FetchError,
    },
}

/// Snapshot of the variables relevant to citypulse; empty values count as unset.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    pub fn from_process() -> Self {
        Self::from_pairs(std::env::vars())
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = pairs
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .filter(|(_, value)| !value.trim().is_empty())
            .collect();
        Self { vars }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn require(&self, name: &'static str) -> Result<&str, ConfigError> {
        self.get(name).ok_or(ConfigError::Missing { name })
    }

    /// HTTP settings, identifying requests with `USER_AGENT` when set.
    pub fn http_settings(&self) -> HttpSettings {
        let mut settings = HttpSettings::default();
        if let Some(agent) = self.get(USER_AGENT) {
            settings.user_agent = agent.to_string();
        }
        settings
    }

    /// Like [`http_settings`](Self::http_settings), for providers that require
    /// an identifying agent.
    pub fn identified_http_settings(&self) -> Result<HttpSettings, ConfigError> {
        self.require(USER_AGENT)?;
        Ok(self.http_settings())
    }

    pub fn pushshift_url(&self) -> Result<Url, ConfigError> {
        self.url(PUSHSHIFT_URL, PUSHSHIFT_COMMENT_SEARCH_URL)
    }

    pub fn subreddit(&self) -> &str {
        self.get(PUSHSHIFT_SUBREDDIT).unwrap_or(DEFAULT_SUBREDDIT)
    }

    pub fn geonames_url(&self) -> Result<Url, ConfigError> {
        self.url(GEONAMES_URL, GEONAMES_SEARCH_URL)
    }

    pub fn wikipedia_url(&self) -> Result<Url, ConfigError> {
        self.url(WIKIPEDIA_URL, WIKIPEDIA_REST_URL)
    }

    /// Recognizer command line: `NER_COMMAND` split on whitespace, then
    /// `--model <model>`.
    pub fn ner_command(&self, model: &str) -> Result<Vec<String>, ConfigError> {
        let mut command: Vec<String> = self
            .require(NER_COMMAND)?
            .split_whitespace()
            .map(str::to_string)
            .collect();
        command.push("--model".to_string());
        command.push(model.to_string());
        Ok(command)
    }

    fn url(&self, name: &'static str, default: &str) -> Result<Url, ConfigError> {
        let raw = self.get(name).unwrap_or(default);
        parse_base_url(raw).map_err(|source| ConfigError::InvalidUrl { name, source })
    }
}

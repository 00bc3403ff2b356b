use crate::config::Settings;
use crate::ingest::provider::NewsSource;
use anyhow::{Context, Result};

const DEFAULT_BASE_URL: &str = "https://news.google.com";
const SEARCH_PATH: &str = "/rss/search";
const QUERY_SUFFIX: &str = "stock india";

/// Google News RSS search.
#[derive(Debug, Clone)]
pub struct GoogleNewsClient {
    http: reqwest::Client,
    base_url: String,
}

impl GoogleNewsClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings
            .news_feed_base_url
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("failed to build news http client")?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), SEARCH_PATH)
    }
}

pub fn search_query(stock_name: &str) -> String {
    format!("{} {QUERY_SUFFIX}", stock_name.trim())
}

/// Entry titles in feed order, at most `limit`. A body that is not RSS has no entries.
pub fn parse_feed_titles(xml: &str, limit: usize) -> Vec<String> {
    let channel = match rss::Channel::read_from(xml.as_bytes()) {
        Ok(channel) => channel,
        Err(err) => {
            tracing::warn!(error = %err, "news feed is not valid RSS; treating as empty");
            return Vec::new();
        }
    };
    channel
        .items()
        .iter()
        .filter_map(|item| item.title())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .take(limit)
        .collect()
}

#[async_trait::async_trait]
impl NewsSource for GoogleNewsClient {
    fn provider_name(&self) -> &'static str {
        "google_news_rss"
    }

    async fn fetch_headlines(&self, stock_name: &str, limit: usize) -> Result<Vec<String>> {
        let res = self
            .http
            .get(self.url())
            .query(&[("q", search_query(stock_name))])
            .send()
            .await
            .context("news feed request failed")?;

        // Error statuses still carry a body; it is parsed like any other and usually has no entries.
        let status = res.status();
        if !status.is_success() {
            tracing::warn!(http_status = %status, "news feed returned non-success status");
        }
        let text = res.text().await.context("failed to read news feed")?;

        Ok(parse_feed_titles(&text, limit))
    }
}

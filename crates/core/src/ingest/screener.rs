use crate::config::Settings;
use crate::ingest::provider::FinancialsSource;
use anyhow::{Context, Result};
use scraper::{Html, Selector};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://www.screener.in";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "Mozilla/5.0";
const PE_MARKER: &str = "P/E";

/// Company pages on the financial-data site: consolidated financial tables for the
/// dashboard and the headline ratios for the P/E refresh job.
#[derive(Debug, Clone)]
pub struct ScreenerClient {
    http: reqwest::Client,
    base_url: String,
}

impl ScreenerClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings
            .screener_base_url
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = std::env::var("SCREENER_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self::new(base_url, Duration::from_secs(timeout_secs))
    }

    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build screener http client")?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn consolidated_url(&self, ticker: &str) -> String {
        format!(
            "{}/company/{}/consolidated/",
            self.base_url.trim_end_matches('/'),
            company_symbol(ticker)
        )
    }

    pub fn company_url(&self, symbol: &str) -> String {
        format!(
            "{}/company/{}/",
            self.base_url.trim_end_matches('/'),
            symbol.trim()
        )
    }

    /// The site answers unknown companies with an error page that simply lacks the
    /// tables we look for, so the body is returned whatever the status.
    async fn get_page(&self, url: String) -> Result<String> {
        let res = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("screener request failed: {url}"))?;

        let status = res.status();
        if !status.is_success() {
            tracing::warn!(%url, http_status = %status, "screener returned non-success status");
        }
        res.text().await.context("failed to read screener page")
    }

    /// Headline P/E for a company, `None` when the page shows none.
    pub async fn fetch_stock_pe(&self, symbol: &str) -> Result<Option<String>> {
        let html = self.get_page(self.company_url(symbol)).await?;
        Ok(parse_top_ratio_pe(&html))
    }
}

#[async_trait::async_trait]
impl FinancialsSource for ScreenerClient {
    fn provider_name(&self) -> &'static str {
        "screener"
    }

    async fn fetch_financials_page(&self, ticker: &str) -> Result<String> {
        self.get_page(self.consolidated_url(ticker)).await
    }
}

/// Exchange ticker to the site's company slug: `reliance.ns` -> `RELIANCE`.
pub fn company_symbol(ticker: &str) -> String {
    ticker.trim().to_uppercase().replace(".NS", "")
}

pub fn parse_top_ratio_pe(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let items = Selector::parse("ul#top-ratios li").ok()?;
    let number = Selector::parse("span.number").ok()?;

    doc.select(&items)
        .filter(|li| li.text().collect::<String>().contains(PE_MARKER))
        .find_map(|li| {
            li.select(&number)
                .next()
                .map(|span| span.text().collect::<String>().trim().to_string())
        })
}

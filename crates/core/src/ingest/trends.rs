use crate::config::Settings;
use crate::ingest::error::SourceError;
use crate::ingest::provider::InterestSource;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};

const DEFAULT_BASE_URL: &str = "https://trends.google.com";
const HOST_LANGUAGE: &str = "en-US";
// Minutes east of UTC (IST).
const TZ_OFFSET: &str = "330";
const GEO: &str = "IN";
const TIMEFRAME: &str = "now 7-d";
const TIMESERIES_WIDGET: &str = "TIMESERIES";

/// Google Trends interest-over-time for a single keyword.
///
/// A request is a three-step exchange: a landing-page hit to pick up session cookies, the
/// explore call that hands out a token for the time-series widget, and the widget data call.
#[derive(Debug, Clone)]
pub struct GoogleTrendsClient {
    http: reqwest::Client,
    base_url: String,
}

impl GoogleTrendsClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings
            .trends_base_url
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .context("failed to build trends http client")?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn get_text(&self, url: String, params: &[(&str, String)]) -> Result<String> {
        let res = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .context("trends request failed")?;

        let status = res.status();
        let text = res.text().await.context("failed to read trends response")?;
        if !status.is_success() {
            return Err(SourceError::http(self.provider_name(), status, text).into());
        }
        Ok(text)
    }

    async fn warm_session(&self) {
        let res = self
            .http
            .get(self.url("/"))
            .query(&[("geo", GEO)])
            .send()
            .await;
        if let Err(err) = res {
            tracing::debug!(error = %err, "trends landing page request failed");
        }
    }

    async fn explore(&self, query: &str) -> Result<ExploreWidget> {
        let req = json!({
            "comparisonItem": [{"keyword": query, "time": TIMEFRAME, "geo": GEO}],
            "category": 0,
            "property": "",
        });
        let params = [
            ("hl", HOST_LANGUAGE.to_string()),
            ("tz", TZ_OFFSET.to_string()),
            ("req", req.to_string()),
        ];
        let text = self.get_text(self.url("/trends/api/explore"), &params).await?;
        let body: ExploreResponse = parse_guarded_json(&text).context("explore response")?;

        body.widgets
            .into_iter()
            .find(|w| w.id == TIMESERIES_WIDGET)
            .ok_or_else(|| {
                SourceError {
                    provider: "google_trends",
                    stage: "explore",
                    detail: "no TIMESERIES widget in explore response".to_string(),
                    body: Some(text.clone()),
                }
                .into()
            })
    }

    async fn multiline(&self, widget: &ExploreWidget) -> Result<Vec<Option<f64>>> {
        let params = [
            ("hl", HOST_LANGUAGE.to_string()),
            ("tz", TZ_OFFSET.to_string()),
            ("req", widget.request.to_string()),
            ("token", widget.token.clone()),
        ];
        let text = self
            .get_text(self.url("/trends/api/widgetdata/multiline"), &params)
            .await?;
        let body: MultilineResponse = parse_guarded_json(&text).context("multiline response")?;
        Ok(body.samples())
    }
}

#[async_trait::async_trait]
impl InterestSource for GoogleTrendsClient {
    fn provider_name(&self) -> &'static str {
        "google_trends"
    }

    async fn fetch_interest(&self, query: &str) -> Result<Vec<Option<f64>>> {
        self.warm_session().await;
        let widget = self.explore(query).await?;
        self.multiline(&widget).await
    }
}

/// Parses a JSON body that may be preceded by an anti-hijacking prefix such as `)]}'`.
pub fn parse_guarded_json<T: serde::de::DeserializeOwned>(text: &str) -> Result<T> {
    let start = text
        .find(['{', '['])
        .context("response contains no JSON payload")?;
    let payload = &text[start..];
    serde_json::from_str(payload)
        .with_context(|| format!("invalid trends JSON: {}", truncate(payload, 200)))
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ExploreResponse {
    #[serde(default)]
    widgets: Vec<ExploreWidget>,
}

#[derive(Debug, Clone, Deserialize)]
struct ExploreWidget {
    #[serde(default)]
    id: String,
    #[serde(default)]
    token: String,
    #[serde(default)]
    request: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MultilineResponse {
    default: MultilineDefault,
}

#[derive(Debug, Clone, Deserialize)]
struct MultilineDefault {
    #[serde(rename = "timelineData", default)]
    timeline_data: Vec<TimelinePoint>,
}

#[derive(Debug, Clone, Deserialize)]
struct TimelinePoint {
    #[serde(default)]
    value: Vec<Option<f64>>,
}

impl MultilineResponse {
    /// First keyword's value per point; points without a value are missing samples.
    pub fn samples(&self) -> Vec<Option<f64>> {
        self.default
            .timeline_data
            .iter()
            .map(|p| p.value.first().copied().flatten())
            .collect()
    }
}

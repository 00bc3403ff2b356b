use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use tickerlens_core::dashboard::Dashboard;
use tickerlens_core::domain::dashboard::{DashboardOutcome, DashboardResult, SOMETHING_WENT_WRONG};

#[derive(Clone)]
pub struct AppState {
    dashboard: Dashboard,
    stock_names: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(dashboard: Dashboard) -> Self {
        let stock_names = dashboard
            .store()
            .stocks()
            .iter()
            .map(|s| s.name.clone())
            .collect();
        Self {
            dashboard,
            stock_names: Arc::new(stock_names),
        }
    }
}

#[derive(Template)]
#[template(path = "search.html")]
pub struct SearchPage<'a> {
    pub stock_names: &'a [String],
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage<'a> {
    pub result: Option<&'a DashboardResult>,
    pub error: Option<&'a str>,
}

fn render_template<T: Template>(template: &T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "template render failed");
            sentry_anyhow::capture_anyhow(&anyhow::Error::new(e));
            let fallback = DashboardPage {
                result: None,
                error: Some(SOMETHING_WENT_WRONG),
            };
            match fallback.render() {
                Ok(html) => (StatusCode::INTERNAL_SERVER_ERROR, Html(html)).into_response(),
                Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, SOMETHING_WENT_WRONG).into_response(),
            }
        }
    }
}

/// GET /
pub async fn search(State(state): State<AppState>) -> Response {
    render_template(&SearchPage {
        stock_names: &state.stock_names,
    })
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub ticker: String,
}

/// GET /dashboard?ticker=<name or ticker>
pub async fn dashboard_view(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let outcome = state.dashboard.build(&query.ticker).await;
    let page = match &outcome {
        DashboardOutcome::Ready(result) => DashboardPage {
            result: Some(result.as_ref()),
            error: None,
        },
        other => DashboardPage {
            result: None,
            error: other.error_message(),
        },
    };
    render_template(&page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickerlens_core::domain::dashboard::{Sentiment, Valuation, STOCK_NOT_FOUND};

    fn sample() -> DashboardResult {
        DashboardResult {
            name: "Reliance Industries".to_string(),
            ticker: "RELIANCE.NS".to_string(),
            pe_ratio: "24.1".to_string(),
            valuation: Valuation::Fair,
            sentiment: Sentiment::Positive,
            score: 8.5,
            momentum: "Unavailable".to_string(),
            revenue_growth: "+20.0% QoQ (Jun 2024)".to_string(),
            profit_growth: "Insufficient Data".to_string(),
            sector_name: "Oil".to_string(),
            sector_pe: "22.0".to_string(),
            headlines: vec!["Reliance <b>beats</b> estimates".to_string()],
            last_updated: "05 Mar, 02:07 PM".to_string(),
        }
    }

    #[test]
    fn dashboard_page_renders_result() {
        let result = sample();
        let html = DashboardPage {
            result: Some(&result),
            error: None,
        }
        .render()
        .unwrap();
        assert!(html.contains("Reliance Industries"));
        assert!(html.contains("8.5/10"));
        assert!(html.contains("+20.0% QoQ (Jun 2024)"));
        assert!(html.contains("Oil"));
        assert!(html.contains("&lt;b&gt;beats"));
    }

    #[test]
    fn dashboard_page_renders_error_state() {
        let html = DashboardPage {
            result: None,
            error: Some(STOCK_NOT_FOUND),
        }
        .render()
        .unwrap();
        assert!(html.contains("Stock not found."));
        assert!(!html.contains("QoQ"));
    }

    #[test]
    fn search_page_lists_names_for_autocomplete() {
        let names = vec!["Asian Paints".to_string(), "Tata Motors".to_string()];
        let html = SearchPage {
            stock_names: &names,
        }
        .render()
        .unwrap();
        assert!(html.contains(r#"<option value="Asian Paints">"#));
        assert!(html.contains(r#"action="/dashboard""#));
    }
}

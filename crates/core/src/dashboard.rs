//! Per-request aggregation: resolve the stock, then consult each data source in turn.

use crate::analysis::{sector, sentiment, valuation};
use crate::config::Settings;
use crate::domain::dashboard::{DashboardOutcome, DashboardResult};
use crate::domain::stock::StockRecord;
use crate::ingest::news::GoogleNewsClient;
use crate::ingest::provider::{self, FinancialsSource, InterestSource, NewsSource};
use crate::ingest::screener::ScreenerClient;
use crate::ingest::trends::GoogleTrendsClient;
use crate::reference::ReferenceStore;
use crate::resolve;
use anyhow::{ensure, Result};
use std::sync::Arc;

pub const TIMESTAMP_FORMAT: &str = "%d %b, %I:%M %p";

#[derive(Clone)]
pub struct Dashboard {
    store: Arc<ReferenceStore>,
    news: Arc<dyn NewsSource>,
    interest: Arc<dyn InterestSource>,
    financials: Arc<dyn FinancialsSource>,
    scorer: Arc<dyn sentiment::PolarityScorer>,
}

impl Dashboard {
    pub fn new(
        store: Arc<ReferenceStore>,
        news: Arc<dyn NewsSource>,
        interest: Arc<dyn InterestSource>,
        financials: Arc<dyn FinancialsSource>,
        scorer: Arc<dyn sentiment::PolarityScorer>,
    ) -> Self {
        Self {
            store,
            news,
            interest,
            financials,
            scorer,
        }
    }

    pub fn from_settings(settings: &Settings, store: Arc<ReferenceStore>) -> Result<Self> {
        Ok(Self::new(
            store,
            Arc::new(GoogleNewsClient::from_settings(settings)?),
            Arc::new(GoogleTrendsClient::from_settings(settings)?),
            Arc::new(ScreenerClient::from_settings(settings)?),
            Arc::new(sentiment::LexiconScorer),
        ))
    }

    pub fn store(&self) -> &ReferenceStore {
        &self.store
    }

    pub async fn build(&self, input: &str) -> DashboardOutcome {
        let Some(record) = resolve::resolve(&self.store, input) else {
            tracing::info!(input = %input.trim(), "stock not found");
            return DashboardOutcome::NotFound;
        };

        match self.assemble(record).await {
            Ok(result) => DashboardOutcome::Ready(Box::new(result)),
            Err(err) => {
                tracing::error!(stock = %record.name, error = %err, "dashboard assembly failed");
                DashboardOutcome::Failed
            }
        }
    }

    async fn assemble(&self, record: &StockRecord) -> Result<DashboardResult> {
        ensure!(
            !record.ticker.is_empty(),
            "reference row for {:?} has no ticker",
            record.name
        );

        let valuation = valuation::classify(record.pe);

        let headlines = provider::headlines(self.news.as_ref(), &record.name).await;
        let sentiment = sentiment::analyze(self.scorer.as_ref(), headlines.titles());
        let score = sentiment::score(sentiment);

        let momentum = provider::trend_momentum(self.interest.as_ref(), &record.name).await;

        let (revenue_growth, profit_growth) =
            provider::financials_growth(self.financials.as_ref(), &record.ticker)
                .await
                .display_pair();

        let sector = sector::lookup(&self.store, &record.ticker);

        let result = DashboardResult {
            name: record.name.clone(),
            ticker: record.ticker.clone(),
            pe_ratio: record.pe_display().to_string(),
            valuation,
            sentiment,
            score,
            momentum: momentum.label().to_string(),
            revenue_growth,
            profit_growth,
            sector_name: sector.name,
            sector_pe: sector.pe,
            headlines: headlines.into_display(),
            last_updated: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
        };

        tracing::info!(
            stock = %result.name,
            ticker = %result.ticker,
            valuation = %result.valuation,
            sentiment = %result.sentiment,
            momentum = %result.momentum,
            "dashboard assembled"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    #[test]
    fn timestamp_format_matches_display() {
        let dt: NaiveDateTime = NaiveDate::from_ymd_opt(2026, 3, 5)
            .unwrap()
            .and_hms_opt(14, 7, 0)
            .unwrap();
        assert_eq!(dt.format(super::TIMESTAMP_FORMAT).to_string(), "05 Mar, 02:07 PM");
    }
}

use crate::analysis::{growth, momentum};
use crate::domain::outcome::{GrowthOutcome, HeadlineOutcome, MomentumOutcome};
use anyhow::Result;

pub const MAX_HEADLINES: usize = 4;

#[async_trait::async_trait]
pub trait NewsSource: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Up to `limit` headline titles, in feed order.
    async fn fetch_headlines(&self, stock_name: &str, limit: usize) -> Result<Vec<String>>;
}

#[async_trait::async_trait]
pub trait InterestSource: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Seven-day search-interest samples for an already normalized query. An empty vector
    /// means the source has no series for the query.
    async fn fetch_interest(&self, query: &str) -> Result<Vec<Option<f64>>>;
}

#[async_trait::async_trait]
pub trait FinancialsSource: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Raw HTML of the consolidated financials page for a ticker.
    async fn fetch_financials_page(&self, ticker: &str) -> Result<String>;
}

pub async fn headlines(source: &dyn NewsSource, stock_name: &str) -> HeadlineOutcome {
    match source.fetch_headlines(stock_name, MAX_HEADLINES).await {
        Ok(mut titles) => {
            titles.truncate(MAX_HEADLINES);
            if titles.is_empty() {
                HeadlineOutcome::Empty
            } else {
                HeadlineOutcome::Headlines(titles)
            }
        }
        Err(err) => {
            tracing::warn!(
                provider = source.provider_name(),
                stock = %stock_name,
                error = %err,
                "news fetch failed"
            );
            HeadlineOutcome::Unavailable
        }
    }
}

pub async fn trend_momentum(source: &dyn InterestSource, stock_name: &str) -> MomentumOutcome {
    let query = momentum::normalize_query(stock_name);
    let samples = match source.fetch_interest(&query).await {
        Ok(s) => s,
        Err(err) => {
            tracing::warn!(
                provider = source.provider_name(),
                %query,
                error = %err,
                "search interest fetch failed"
            );
            return MomentumOutcome::Unavailable;
        }
    };

    match momentum::TrendStats::from_samples(&samples) {
        Some(stats) => MomentumOutcome::Trend(momentum::classify_stats(stats)),
        None => {
            tracing::info!(%query, "no search interest samples");
            MomentumOutcome::Unavailable
        }
    }
}

pub async fn financials_growth(source: &dyn FinancialsSource, ticker: &str) -> GrowthOutcome {
    match source.fetch_financials_page(ticker).await {
        Ok(html) => growth::growth_from_html(&html),
        Err(err) => {
            tracing::warn!(
                provider = source.provider_name(),
                %ticker,
                error = %err,
                "financials fetch failed"
            );
            GrowthOutcome::Unavailable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dashboard::Momentum;

    struct StaticNews(Result<Vec<String>, &'static str>);

    #[async_trait::async_trait]
    impl NewsSource for StaticNews {
        fn provider_name(&self) -> &'static str {
            "static"
        }

        async fn fetch_headlines(&self, _stock_name: &str, _limit: usize) -> Result<Vec<String>> {
            self.0.clone().map_err(|e| anyhow::anyhow!(e))
        }
    }

    struct StaticInterest(Vec<Option<f64>>);

    #[async_trait::async_trait]
    impl InterestSource for StaticInterest {
        fn provider_name(&self) -> &'static str {
            "static"
        }

        async fn fetch_interest(&self, query: &str) -> Result<Vec<Option<f64>>> {
            assert_eq!(query, "larsen+and+toubro");
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn headlines_are_capped_and_degrade() {
        let many: Vec<String> = (1..=6).map(|i| format!("headline {i}")).collect();
        let out = headlines(&StaticNews(Ok(many)), "Foo").await;
        assert_eq!(out.titles().len(), 4);

        assert_eq!(headlines(&StaticNews(Ok(vec![])), "Foo").await, HeadlineOutcome::Empty);
        assert_eq!(
            headlines(&StaticNews(Err("timeout")), "Foo").await,
            HeadlineOutcome::Unavailable
        );
    }

    #[tokio::test]
    async fn momentum_uses_normalized_query() {
        let samples = vec![Some(90.0), Some(60.0), Some(60.0), Some(80.0), Some(95.0), Some(100.0), Some(100.0)];
        let out = trend_momentum(&StaticInterest(samples), "Larsen & Toubro").await;
        assert_eq!(out, MomentumOutcome::Trend(Momentum::StrongUptrend));

        let out = trend_momentum(&StaticInterest(vec![]), "Larsen & Toubro").await;
        assert_eq!(out, MomentumOutcome::Unavailable);
    }
}

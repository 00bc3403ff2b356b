use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Valuation {
    Undervalued,
    Fair,
    Overvalued,
    NotAvailable,
}

impl Valuation {
    pub fn label(self) -> &'static str {
        match self {
            Self::Undervalued => "Undervalued",
            Self::Fair => "Fair",
            Self::Overvalued => "Overvalued",
            Self::NotAvailable => "N/A",
        }
    }
}

impl fmt::Display for Valuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn label(self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Momentum {
    StrongUptrend,
    CoolingOff,
    Steady,
    LowInterest,
    Flat,
}

impl Momentum {
    pub fn label(self) -> &'static str {
        match self {
            Self::StrongUptrend => "📈 Strong Uptrend — Retail Interest Surging",
            Self::CoolingOff => "⚠️ Recent Peak — Trend Cooling Off",
            Self::Steady => "🔁 Steady Public Attention — No Strong Moves",
            Self::LowInterest => "💤 Very Low Interest — Off Radar",
            Self::Flat => "🪨 Flat — No Buzz, No Moves",
        }
    }
}

impl fmt::Display for Momentum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything the dashboard page shows for one stock. Built per request, never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardResult {
    pub name: String,
    pub ticker: String,
    pub pe_ratio: String,
    pub valuation: Valuation,
    pub sentiment: Sentiment,
    pub score: f64,
    pub momentum: String,
    pub revenue_growth: String,
    pub profit_growth: String,
    pub sector_name: String,
    pub sector_pe: String,
    pub headlines: Vec<String>,
    pub last_updated: String,
}

impl DashboardResult {
    /// `"8.5/10"`.
    pub fn score_display(&self) -> String {
        format!("{:.1}/10", self.score)
    }
}

pub const STOCK_NOT_FOUND: &str = "Stock not found.";
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong.";

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardOutcome {
    Ready(Box<DashboardResult>),
    NotFound,
    Failed,
}

impl DashboardOutcome {
    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            Self::Ready(_) => None,
            Self::NotFound => Some(STOCK_NOT_FOUND),
            Self::Failed => Some(SOMETHING_WENT_WRONG),
        }
    }
}

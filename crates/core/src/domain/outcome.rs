use crate::domain::dashboard::Momentum;

pub const NO_NEWS_PLACEHOLDER: &str = "No news found.";
pub const NEWS_UNAVAILABLE_PLACEHOLDER: &str = "News unavailable.";
pub const UNAVAILABLE: &str = "Unavailable";
pub const DATA_UNAVAILABLE: &str = "Data Unavailable";
pub const INSUFFICIENT_DATA: &str = "Insufficient Data";

/// Result of a headline fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum HeadlineOutcome {
    Headlines(Vec<String>),
    /// The feed answered but had no entries.
    Empty,
    /// The feed could not be fetched or parsed.
    Unavailable,
}

impl HeadlineOutcome {
    /// Real headlines only; placeholders are not scored.
    pub fn titles(&self) -> &[String] {
        match self {
            Self::Headlines(v) => v,
            Self::Empty | Self::Unavailable => &[],
        }
    }

    pub fn into_display(self) -> Vec<String> {
        match self {
            Self::Headlines(v) => v,
            Self::Empty => vec![NO_NEWS_PLACEHOLDER.to_string()],
            Self::Unavailable => vec![NEWS_UNAVAILABLE_PLACEHOLDER.to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MomentumOutcome {
    Trend(Momentum),
    Unavailable,
}

impl MomentumOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Trend(m) => m.label(),
            Self::Unavailable => UNAVAILABLE,
        }
    }
}

/// Quarter-over-quarter growth figures scraped from the financial-data site.
#[derive(Debug, Clone, PartialEq)]
pub enum GrowthOutcome {
    Figures { revenue: String, profit: String },
    /// No income table on the page.
    TableMissing,
    /// The income table lacks two periods to compare.
    InsufficientData,
    /// Network or parse failure.
    Unavailable,
}

impl GrowthOutcome {
    /// `(revenue, profit)` display strings.
    pub fn display_pair(&self) -> (String, String) {
        match self {
            Self::Figures { revenue, profit } => (revenue.clone(), profit.clone()),
            Self::TableMissing => (DATA_UNAVAILABLE.to_string(), DATA_UNAVAILABLE.to_string()),
            Self::InsufficientData => {
                (INSUFFICIENT_DATA.to_string(), INSUFFICIENT_DATA.to_string())
            }
            Self::Unavailable => (UNAVAILABLE.to_string(), UNAVAILABLE.to_string()),
        }
    }
}

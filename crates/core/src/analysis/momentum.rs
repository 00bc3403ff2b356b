use crate::domain::dashboard::Momentum;

const EDGE_WINDOW: usize = 3;

/// Summary of a search-interest series: overall mean and the means of its first and last
/// three samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendStats {
    pub avg: f64,
    pub start: f64,
    pub end: f64,
}

impl TrendStats {
    /// Missing samples are dropped first. `None` when nothing is left.
    pub fn from_samples(samples: &[Option<f64>]) -> Option<Self> {
        let values: Vec<f64> = samples
            .iter()
            .filter_map(|s| *s)
            .filter(|v| !v.is_nan())
            .collect();
        if values.is_empty() {
            return None;
        }

        let head = &values[..EDGE_WINDOW.min(values.len())];
        let tail = &values[values.len().saturating_sub(EDGE_WINDOW)..];
        Some(Self {
            avg: mean(&values),
            start: mean(head),
            end: mean(tail),
        })
    }
}

fn mean(v: &[f64]) -> f64 {
    v.iter().sum::<f64>() / v.len() as f64
}

pub fn classify(avg: f64, start: f64, end: f64) -> Momentum {
    if avg > 70.0 && end > start * 1.2 {
        Momentum::StrongUptrend
    } else if avg > 70.0 && end < start * 0.8 {
        Momentum::CoolingOff
    } else if avg > 40.0 {
        Momentum::Steady
    } else if avg < 30.0 && end < start {
        Momentum::LowInterest
    } else {
        Momentum::Flat
    }
}

pub fn classify_stats(stats: TrendStats) -> Momentum {
    classify(stats.avg, stats.start, stats.end)
}

/// Search-interest query form of a company name: lowercase, `&` spelled out, spaces as `+`.
pub fn normalize_query(name: &str) -> String {
    name.to_lowercase().replace('&', "and").replace(' ', "+")
}

use crate::domain::dashboard::Sentiment;

pub const POSITIVE_THRESHOLD: f64 = 0.3;
pub const NEGATIVE_THRESHOLD: f64 = -0.3;

/// Scores a single piece of text in roughly `[-1, 1]`.
pub trait PolarityScorer: Send + Sync {
    fn polarity(&self, text: &str) -> anyhow::Result<f64>;
}

/// Sums headline polarity and buckets the total. A scorer failure yields `Neutral`.
pub fn analyze(scorer: &dyn PolarityScorer, headlines: &[String]) -> Sentiment {
    let mut total = 0.0;
    for headline in headlines {
        match scorer.polarity(headline) {
            Ok(p) => total += p,
            Err(err) => {
                tracing::warn!(error = %err, "sentiment scoring failed; defaulting to neutral");
                return Sentiment::Neutral;
            }
        }
    }
    label_for_sum(total)
}

pub fn label_for_sum(total: f64) -> Sentiment {
    if total > POSITIVE_THRESHOLD {
        Sentiment::Positive
    } else if total < NEGATIVE_THRESHOLD {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

pub fn score(sentiment: Sentiment) -> f64 {
    match sentiment {
        Sentiment::Positive => 8.5,
        Sentiment::Neutral => 6.0,
        Sentiment::Negative => 3.0,
    }
}

/// Word-lexicon scorer tuned for market headlines.
///
/// Each known word contributes its polarity, scaled by an intensifier and flipped by a
/// negation among the two preceding tokens. The headline score is the mean over known words.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconScorer;

impl PolarityScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> anyhow::Result<f64> {
        Ok(lexicon_polarity(text))
    }
}

const NEGATION_FACTOR: f64 = -0.5;

pub fn lexicon_polarity(text: &str) -> f64 {
    let lower = text.to_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|t| !t.is_empty())
        .collect();

    let mut total = 0.0;
    let mut known = 0usize;
    for (i, tok) in tokens.iter().enumerate() {
        let Some(mut value) = word_polarity(tok) else {
            continue;
        };
        for prev in &tokens[i.saturating_sub(2)..i] {
            if let Some(factor) = intensity(prev) {
                value *= factor;
            } else if is_negation(prev) {
                value *= NEGATION_FACTOR;
            }
        }
        total += value.clamp(-1.0, 1.0);
        known += 1;
    }

    if known == 0 {
        return 0.0;
    }
    (total / known as f64).clamp(-1.0, 1.0)
}

fn is_negation(tok: &str) -> bool {
    matches!(tok, "not" | "no" | "never" | "without" | "nor") || tok.ends_with("n't")
}

fn intensity(tok: &str) -> Option<f64> {
    let f = match tok {
        "very" | "highly" | "sharply" | "strongly" => 1.3,
        "extremely" | "massive" | "huge" => 1.5,
        "slightly" | "marginally" | "somewhat" => 0.5,
        _ => return None,
    };
    Some(f)
}

fn word_polarity(tok: &str) -> Option<f64> {
    let p = match tok {
        "best" | "stellar" => 1.0,
        "great" | "outstanding" => 0.8,
        "good" | "soar" | "soars" | "soaring" | "successful" => 0.7,
        "surge" | "surges" | "surging" | "bullish" | "win" | "wins" | "success" | "upbeat" => 0.6,
        "rally" | "rallies" | "robust" | "strong" | "stronger" | "upgrade" | "upgraded"
        | "upgrades" | "outperform" | "outperforms" | "boost" | "boosts" | "top" | "better"
        | "optimistic" => 0.5,
        "jump" | "jumps" | "gain" | "gains" | "growth" | "beat" | "beats" | "recovery"
        | "rebound" | "rebounds" => 0.4,
        "rise" | "rises" | "rising" | "record" | "profit" | "profits" | "expansion"
        | "expands" | "approval" | "approves" => 0.3,
        "positive" | "buy" | "dividend" | "high" | "higher" => 0.2,
        "lower" | "debt" | "sell" => -0.2,
        "miss" | "misses" | "cut" | "cuts" | "probe" | "concern" | "concerns" | "risk"
        | "risks" | "volatile" | "resigns" | "negative" => -0.3,
        "fall" | "falls" | "fell" | "drop" | "drops" | "decline" | "declines" | "slide"
        | "slides" | "poor" | "warning" | "warns" | "uncertainty" | "slowdown" => -0.4,
        "loss" | "losses" | "weak" | "weaker" | "downgrade" | "downgraded" | "downgrades"
        | "penalty" | "lawsuit" | "default" | "sink" | "sinks" | "layoffs" => -0.5,
        "slump" | "slumps" | "bearish" | "selloff" | "tumble" | "tumbles" => -0.6,
        "plunge" | "plunges" | "bad" | "crisis" => -0.7,
        "crash" | "crashes" => -0.8,
        "fraud" | "scam" => -0.9,
        "worst" => -1.0,
        _ => return None,
    };
    Some(p)
}

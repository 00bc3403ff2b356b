pub mod matcher;

use crate::domain::stock::StockRecord;
use crate::reference::ReferenceStore;

pub const MATCH_CUTOFF: f64 = 0.6;

/// Resolves free text to a stock by approximate name match.
///
/// The input is lowercased and trimmed, then compared against every lowercased stock name.
/// The single best candidate at or above [`MATCH_CUTOFF`] wins, and the first row carrying
/// that name is returned.
pub fn resolve<'a>(store: &'a ReferenceStore, input: &str) -> Option<&'a StockRecord> {
    let query = input.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }

    let names: Vec<String> = store.stocks().iter().map(|s| s.name.to_lowercase()).collect();
    let best = matcher::close_matches(&query, names.iter().map(String::as_str), 1, MATCH_CUTOFF)
        .into_iter()
        .next()?;

    store
        .stocks()
        .iter()
        .find(|s| s.name.to_lowercase() == best)
}

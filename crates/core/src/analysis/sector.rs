use crate::domain::stock::{normalize_sector, CATCH_ALL_SECTOR};
use crate::reference::ReferenceStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorInfo {
    pub name: String,
    pub pe: String,
}

/// Sector name and benchmark P/E for a ticker.
///
/// Sectors missing from the benchmark table get the catch-all P/E but keep their own name.
/// A ticker absent from the reference table reports `("Others", catch-all)`.
pub fn lookup(store: &ReferenceStore, ticker: &str) -> SectorInfo {
    let benchmarks = store.sectors();
    let Some(record) = store.find_by_ticker(ticker) else {
        tracing::warn!(%ticker, "ticker not in reference table; using catch-all sector");
        return SectorInfo {
            name: title_case(CATCH_ALL_SECTOR),
            pe: format_pe(benchmarks.catch_all()),
        };
    };

    let mut sector = normalize_sector(&record.sector);
    if sector.is_empty() {
        sector = CATCH_ALL_SECTOR.to_string();
    }
    let pe = benchmarks
        .get(&sector)
        .unwrap_or_else(|| benchmarks.catch_all());

    SectorInfo {
        name: title_case(&sector),
        pe: format_pe(pe),
    }
}

/// Uppercases the first letter of every alphabetic run and lowercases the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

/// Whole numbers keep one decimal place: `34.0`, `18.2`.
pub fn format_pe(pe: f64) -> String {
    if pe.fract() == 0.0 && pe.abs() < 1e15 {
        format!("{pe:.1}")
    } else {
        format!("{pe}")
    }
}

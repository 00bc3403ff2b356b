use serde::Serialize;
use std::collections::BTreeMap;

/// One row of the stock-list reference table.
///
/// The P/E cell is kept verbatim for display and parsed once at load time; rows with a
/// blank or non-numeric cell carry `pe: None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockRecord {
    pub name: String,
    pub ticker: String,
    pub pe_raw: String,
    pub pe: Option<f64>,
    pub sector: String,
}

impl StockRecord {
    pub fn new(
        name: impl Into<String>,
        ticker: impl Into<String>,
        pe_raw: impl Into<String>,
        sector: impl Into<String>,
    ) -> Self {
        let pe_raw = pe_raw.into().trim().to_string();
        let pe = parse_pe(&pe_raw);
        Self {
            name: name.into().trim().to_string(),
            ticker: ticker.into().trim().to_string(),
            pe_raw,
            pe,
            sector: sector.into().trim().to_string(),
        }
    }

    pub fn pe_display(&self) -> &str {
        if self.pe_raw.is_empty() {
            "N/A"
        } else {
            &self.pe_raw
        }
    }
}

/// Parses a P/E cell. Thousands separators are tolerated; NaN and infinities are not numbers
/// for our purposes.
pub fn parse_pe(s: &str) -> Option<f64> {
    let t = s.trim().replace(',', "");
    if t.is_empty() {
        return None;
    }
    t.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub const CATCH_ALL_SECTOR: &str = "others";
pub const CATCH_ALL_PE: f64 = 22.0;

// Keys are stored verbatim. Lookups normalize the sector first, so "oil ", "Pharma" and
// "Fmcg" never match and those sectors report the catch-all P/E.
const STATIC_SECTOR_PE: [(&str, f64); 14] = [
    ("banking", 18.2),
    ("information technology", 26.4),
    ("oil ", 12.9),
    ("Pharma", 28.1),
    ("auto", 22.5),
    ("metals & mining", 9.7),
    ("Fmcg", 41.1),
    ("paints", 52.3),
    ("cement", 34.0),
    ("real estate", 19.5),
    ("insurance", 42.2),
    ("financial services", 33.0),
    ("chemicals", 31.2),
    (CATCH_ALL_SECTOR, CATCH_ALL_PE),
];

/// Sector name to benchmark P/E. CSV overrides are stored under normalized keys.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorBenchmarks {
    table: BTreeMap<String, f64>,
}

impl Default for SectorBenchmarks {
    fn default() -> Self {
        let table = STATIC_SECTOR_PE
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect();
        Self { table }
    }
}

impl SectorBenchmarks {
    /// Static table with the given rows layered on top.
    pub fn with_overrides<I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut out = Self::default();
        for (sector, pe) in overrides {
            let key = normalize_sector(&sector);
            if key.is_empty() || !pe.is_finite() {
                continue;
            }
            out.table.insert(key, pe);
        }
        out
    }

    pub fn get(&self, sector: &str) -> Option<f64> {
        self.table.get(&normalize_sector(sector)).copied()
    }

    pub fn catch_all(&self) -> f64 {
        self.table
            .get(CATCH_ALL_SECTOR)
            .copied()
            .unwrap_or(CATCH_ALL_PE)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

pub fn normalize_sector(s: &str) -> String {
    s.trim().to_lowercase()
}

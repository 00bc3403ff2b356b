//! Reference tables loaded once at startup and shared read-only afterwards.

use crate::config::Settings;
use crate::domain::stock::{SectorBenchmarks, StockRecord};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const COL_NAME: &str = "name";
pub const COL_TICKER: &str = "ticker";
pub const COL_PE_RATIO: &str = "pe ratio";
pub const COL_SECTOR: &str = "sector";

const SECTOR_PE_COLUMNS: [&str; 3] = ["pe", "sector pe", "pe ratio"];

#[derive(Debug, Clone)]
pub struct ReferenceStore {
    stocks: Vec<StockRecord>,
    sectors: SectorBenchmarks,
}

impl ReferenceStore {
    pub fn new(stocks: Vec<StockRecord>, sectors: SectorBenchmarks) -> Self {
        Self { stocks, sectors }
    }

    pub fn load(settings: &Settings) -> Result<Self> {
        let stock_list = settings.resolve_stock_list_path()?;
        let sector_pe = settings.resolve_sector_pe_path()?;
        Self::from_paths(&stock_list, &sector_pe)
    }

    pub fn from_paths(stock_list: &Path, sector_pe: &Path) -> Result<Self> {
        let stocks = read_stock_list(stock_list)?;

        let sectors = if sector_pe.is_file() {
            read_sector_table(sector_pe)?
        } else {
            tracing::warn!(
                path = %sector_pe.display(),
                "sector table missing; using built-in sector benchmarks"
            );
            SectorBenchmarks::default()
        };

        tracing::info!(
            stocks = stocks.len(),
            sectors = sectors.len(),
            path = %stock_list.display(),
            "reference tables loaded"
        );

        Ok(Self::new(stocks, sectors))
    }

    pub fn stocks(&self) -> &[StockRecord] {
        &self.stocks
    }

    pub fn sectors(&self) -> &SectorBenchmarks {
        &self.sectors
    }

    /// Case-insensitive ticker lookup; first row wins.
    pub fn find_by_ticker(&self, ticker: &str) -> Option<&StockRecord> {
        let needle = ticker.trim().to_lowercase();
        self.stocks
            .iter()
            .find(|s| s.ticker.to_lowercase() == needle)
    }
}

pub fn read_stock_list(path: &Path) -> Result<Vec<StockRecord>> {
    let file =
        File::open(path).with_context(|| format!("failed to open stock list {}", path.display()))?;
    parse_stock_list(file).with_context(|| format!("failed to parse stock list {}", path.display()))
}

pub fn parse_stock_list<R: Read>(input: R) -> Result<Vec<StockRecord>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let headers = reader.headers().context("missing header row")?.clone();

    let name_idx = column_index(&headers, COL_NAME).context("stock list has no 'name' column")?;
    let ticker_idx =
        column_index(&headers, COL_TICKER).context("stock list has no 'ticker' column")?;
    let pe_idx = column_index(&headers, COL_PE_RATIO);
    let sector_idx = column_index(&headers, COL_SECTOR);

    let mut out = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("bad stock list row {}", line + 2))?;
        let name = record.get(name_idx).unwrap_or("").trim();
        if name.is_empty() {
            continue;
        }
        let cell = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("");

        out.push(StockRecord::new(
            name,
            record.get(ticker_idx).unwrap_or(""),
            cell(pe_idx),
            cell(sector_idx),
        ));
    }
    Ok(out)
}

pub fn read_sector_table(path: &Path) -> Result<SectorBenchmarks> {
    let file = File::open(path)
        .with_context(|| format!("failed to open sector table {}", path.display()))?;
    parse_sector_table(file)
        .with_context(|| format!("failed to parse sector table {}", path.display()))
}

/// Sector rows with a numeric P/E column override the built-in benchmarks. A table with
/// only a `sector` column leaves the built-ins untouched.
pub fn parse_sector_table<R: Read>(input: R) -> Result<SectorBenchmarks> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let headers = reader.headers().context("missing header row")?.clone();

    let sector_idx =
        column_index(&headers, COL_SECTOR).context("sector table has no 'sector' column")?;
    let pe_idx = SECTOR_PE_COLUMNS
        .iter()
        .find_map(|c| column_index(&headers, c));

    let mut overrides = Vec::new();
    for record in reader.records() {
        let record = record?;
        let sector = record.get(sector_idx).unwrap_or("").trim().to_lowercase();
        let Some(pe) = pe_idx
            .and_then(|i| record.get(i))
            .and_then(crate::domain::stock::parse_pe)
        else {
            continue;
        };
        overrides.push((sector, pe));
    }

    Ok(SectorBenchmarks::with_overrides(overrides))
}

pub fn normalize_header(h: &str) -> String {
    h.trim_start_matches('\u{feff}').trim().to_lowercase()
}

pub fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| normalize_header(h) == name)
}

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tickerlens_core::ingest::screener::{company_symbol, ScreenerClient};
use tickerlens_core::reference::{column_index, COL_PE_RATIO, COL_TICKER};

const NOT_AVAILABLE: &str = "N/A";
const DEFAULT_DELAY_MS: u64 = 1200;
const DEFAULT_PROGRESS_EVERY: usize = 25;

#[async_trait::async_trait]
pub trait PeSource: Send + Sync {
    async fn fetch_pe(&self, symbol: &str) -> Result<Option<String>>;
}

#[async_trait::async_trait]
impl PeSource for ScreenerClient {
    async fn fetch_pe(&self, symbol: &str) -> Result<Option<String>> {
        self.fetch_stock_pe(symbol).await
    }
}

#[derive(Debug, Clone)]
pub struct RefreshOptions {
    /// Pause between consecutive site requests.
    pub delay: Duration,

    /// Only refresh the first `limit` rows; the rest are written back untouched.
    pub limit: Option<usize>,

    pub dry_run: bool,

    pub progress_every: usize,
}

impl Default for RefreshOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            limit: None,
            dry_run: false,
            progress_every: DEFAULT_PROGRESS_EVERY,
        }
    }
}

impl RefreshOptions {
    pub fn from_env() -> Self {
        let mut out = Self::default();

        if let Ok(s) = std::env::var("PE_REFRESH_DELAY_MS") {
            if let Ok(n) = s.parse::<u64>() {
                out.delay = Duration::from_millis(n);
            }
        }

        if let Ok(s) = std::env::var("PE_REFRESH_PROGRESS_EVERY") {
            if let Ok(n) = s.parse::<usize>() {
                out.progress_every = n;
            }
        }

        out
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub processed: usize,
    pub updated: usize,
    pub failures: usize,
}

/// The stock list held as raw cells so untouched columns round-trip verbatim.
#[derive(Debug, Clone)]
struct StockTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    ticker_idx: usize,
    pe_idx: usize,
}

impl StockTable {
    fn read(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("failed to open stock list {}", path.display()))?;

        let header_record = reader.headers().context("missing header row")?.clone();
        let ticker_idx = column_index(&header_record, COL_TICKER)
            .context("stock list has no 'ticker' column")?;
        let mut headers: Vec<String> = header_record.iter().map(str::to_string).collect();

        let pe_idx = match column_index(&header_record, COL_PE_RATIO) {
            Some(i) => i,
            None => {
                headers.push(COL_PE_RATIO.to_string());
                headers.len() - 1
            }
        };

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.context("bad stock list row")?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            if row.len() < headers.len() {
                row.resize(headers.len(), String::new());
            }
            rows.push(row);
        }

        Ok(Self {
            headers,
            rows,
            ticker_idx,
            pe_idx,
        })
    }

    fn ticker(&self, row: usize) -> &str {
        self.rows[row][self.ticker_idx].trim()
    }

    fn set_pe(&mut self, row: usize, value: String) {
        self.rows[row][self.pe_idx] = value;
    }

    /// Writes next to the target, then renames over it. The temp file is removed on failure.
    fn write(&self, path: &Path) -> Result<()> {
        let tmp = tmp_path(path);
        let result = self
            .write_rows(&tmp)
            .and_then(|()| {
                std::fs::rename(&tmp, path)
                    .with_context(|| format!("failed to replace {}", path.display()))
            });
        if result.is_err() {
            let _ = std::fs::remove_file(&tmp);
        }
        result
    }

    fn write_rows(&self, tmp: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(tmp)
            .with_context(|| format!("failed to create {}", tmp.display()))?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush().context("failed to flush stock list")?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

pub async fn refresh_pe_file(
    source: &dyn PeSource,
    path: &Path,
    opts: &RefreshOptions,
) -> Result<RefreshSummary> {
    let mut table = StockTable::read(path)?;
    let total = opts
        .limit
        .map_or(table.rows.len(), |n| n.min(table.rows.len()));

    let mut summary = RefreshSummary::default();
    for idx in 0..total {
        let ticker = table.ticker(idx).to_string();
        if ticker.is_empty() {
            tracing::warn!(row = idx + 2, "row has no ticker; leaving P/E untouched");
            continue;
        }

        if summary.processed != 0 {
            tokio::time::sleep(opts.delay).await;
        }

        // Company pages are keyed by exchange symbol, not the display name.
        let symbol = company_symbol(&ticker);
        let pe = match source.fetch_pe(&symbol).await {
            Ok(Some(pe)) => {
                summary.updated += 1;
                pe
            }
            Ok(None) => {
                tracing::info!(%symbol, "no P/E on company page");
                NOT_AVAILABLE.to_string()
            }
            Err(err) => {
                summary.failures += 1;
                tracing::warn!(%symbol, error = %err, "P/E fetch failed");
                NOT_AVAILABLE.to_string()
            }
        };
        table.set_pe(idx, pe);
        summary.processed += 1;

        if opts.progress_every != 0 {
            let n = idx + 1;
            if n == 1 || n == total || n % opts.progress_every == 0 {
                tracing::info!(
                    processed = n,
                    total,
                    updated = summary.updated,
                    failures = summary.failures,
                    "P/E refresh progress"
                );
            }
        }
    }

    if opts.dry_run {
        tracing::info!(path = %path.display(), "dry run; stock list not rewritten");
    } else {
        table.write(path)?;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct CannedPe {
        values: HashMap<&'static str, Option<&'static str>>,
        seen: Mutex<Vec<String>>,
    }

    impl CannedPe {
        fn new(values: &[(&'static str, Option<&'static str>)]) -> Self {
            Self {
                values: values.iter().copied().collect(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl PeSource for CannedPe {
        async fn fetch_pe(&self, symbol: &str) -> Result<Option<String>> {
            self.seen.lock().unwrap().push(symbol.to_string());
            match self.values.get(symbol) {
                Some(v) => Ok(v.map(str::to_string)),
                None => anyhow::bail!("connection refused"),
            }
        }
    }

    fn opts() -> RefreshOptions {
        RefreshOptions {
            delay: Duration::ZERO,
            ..RefreshOptions::default()
        }
    }

    fn write_csv(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("nse_stock_list.csv");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[tokio::test]
    async fn rewrites_pe_column_and_keeps_other_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "name,ticker,pe ratio,sector\n\
             Reliance Industries,RELIANCE.NS,20.0,Oil\n\
             Tata Motors,TATAMOTORS.NS,8.0,Auto\n\
             Delisted Co,GONE.NS,5.0,Others\n\
             Unlisted Co,,1.0,Others\n",
        );
        let source = CannedPe::new(&[("RELIANCE", Some("24.7")), ("TATAMOTORS", None)]);

        let summary = refresh_pe_file(&source, &path, &opts()).await.unwrap();
        assert_eq!(
            summary,
            RefreshSummary {
                processed: 3,
                updated: 1,
                failures: 1
            }
        );
        assert_eq!(
            *source.seen.lock().unwrap(),
            vec!["RELIANCE", "TATAMOTORS", "GONE"]
        );

        let out = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            out,
            "name,ticker,pe ratio,sector\n\
             Reliance Industries,RELIANCE.NS,24.7,Oil\n\
             Tata Motors,TATAMOTORS.NS,N/A,Auto\n\
             Delisted Co,GONE.NS,N/A,Others\n\
             Unlisted Co,,1.0,Others\n"
        );
    }

    #[tokio::test]
    async fn appends_pe_column_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "Name,Ticker\nInfosys,INFY.NS\n");
        let source = CannedPe::new(&[("INFY", Some("27.3"))]);

        refresh_pe_file(&source, &path, &opts()).await.unwrap();
        let out = std::fs::read_to_string(&path).unwrap();
        assert_eq!(out, "Name,Ticker,pe ratio\nInfosys,INFY.NS,27.3\n");
    }

    #[tokio::test]
    async fn dry_run_and_limit_leave_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let body = "name,ticker,pe ratio\nA,A.NS,1\nB,B.NS,2\n";
        let path = write_csv(&dir, body);
        let source = CannedPe::new(&[("A", Some("10")), ("B", Some("20"))]);

        let summary = refresh_pe_file(
            &source,
            &path,
            &RefreshOptions {
                limit: Some(1),
                dry_run: true,
                ..opts()
            },
        )
        .await
        .unwrap();

        assert_eq!(summary.processed, 1);
        assert_eq!(*source.seen.lock().unwrap(), vec!["A"]);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), body);
    }

    #[test]
    fn failed_rename_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "name,ticker,pe ratio\nA,A.NS,1\n");
        let table = StockTable::read(&path).unwrap();

        // Renaming a file over a non-empty directory fails on every platform.
        let target = dir.path().join("occupied");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep"), "x").unwrap();

        assert!(table.write(&target).is_err());
        assert!(!tmp_path(&target).exists());
    }
}

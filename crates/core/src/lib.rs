pub mod analysis;
pub mod dashboard;
pub mod domain;
pub mod ingest;
pub mod reference;
pub mod resolve;

pub mod config {
    use anyhow::Context;
    use std::path::{Path, PathBuf};

    pub const DEFAULT_STOCK_LIST_FILE: &str = "nse_stock_list.csv";
    pub const DEFAULT_SECTOR_PE_FILE: &str = "sector_pe_data.csv";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub data_dir: Option<String>,
        pub stock_list_path: Option<String>,
        pub sector_pe_path: Option<String>,
        pub news_feed_base_url: Option<String>,
        pub trends_base_url: Option<String>,
        pub screener_base_url: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                data_dir: std::env::var("TICKERLENS_DATA_DIR").ok(),
                stock_list_path: std::env::var("STOCK_LIST_PATH").ok(),
                sector_pe_path: std::env::var("SECTOR_PE_PATH").ok(),
                news_feed_base_url: std::env::var("NEWS_FEED_BASE_URL").ok(),
                trends_base_url: std::env::var("TRENDS_BASE_URL").ok(),
                screener_base_url: std::env::var("SCREENER_BASE_URL").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        /// Base directory for relative data paths.
        ///
        /// An explicit `TICKERLENS_DATA_DIR` wins. Otherwise the directory of the running
        /// executable is used when it ships the stock list next to it (packaged installs),
        /// falling back to the current working directory.
        pub fn base_dir(&self) -> anyhow::Result<PathBuf> {
            if let Some(dir) = self.data_dir.as_deref().filter(|s| !s.trim().is_empty()) {
                return Ok(PathBuf::from(dir));
            }

            if let Some(exe_dir) = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(Path::to_path_buf))
            {
                if exe_dir.join(DEFAULT_STOCK_LIST_FILE).is_file() {
                    return Ok(exe_dir);
                }
            }

            std::env::current_dir().context("failed to resolve current directory")
        }

        pub fn resolve_stock_list_path(&self) -> anyhow::Result<PathBuf> {
            self.resolve_data_path(self.stock_list_path.as_deref(), DEFAULT_STOCK_LIST_FILE)
        }

        pub fn resolve_sector_pe_path(&self) -> anyhow::Result<PathBuf> {
            self.resolve_data_path(self.sector_pe_path.as_deref(), DEFAULT_SECTOR_PE_FILE)
        }

        fn resolve_data_path(&self, configured: Option<&str>, default: &str) -> anyhow::Result<PathBuf> {
            let rel = configured
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(default);
            let path = PathBuf::from(rel);
            if path.is_absolute() {
                return Ok(path);
            }
            Ok(self.base_dir()?.join(path))
        }
    }

}

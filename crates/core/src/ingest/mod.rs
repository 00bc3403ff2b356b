pub mod error;
pub mod news;
pub mod provider;
pub mod screener;
pub mod trends;

pub mod growth;
pub mod momentum;
pub mod sector;
pub mod sentiment;
pub mod valuation;

pub mod dashboard;
pub mod outcome;
pub mod stock;

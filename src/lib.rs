// src/lib.rs
//! Locates a company's 10-K on SEC EDGAR, pulls its income statement figures
//! either from XBRL company facts or from the filing's statement table via a
//! language model, and reports profitability margins.

pub mod edgar;
pub mod extractors;
pub mod financials;
pub mod llm;
pub mod report;
pub mod storage;
pub mod utils;
pub mod xbrl;

pub use utils::AppError;

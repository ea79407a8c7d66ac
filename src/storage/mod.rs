// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::edgar::locator::LocatedFiling;
use crate::extractors::IncomeStatementTable;
use crate::financials::{ExtractedFinancials, Margins};
use crate::utils::error::StorageError;

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_dir: base_path })
    }

    /// /base_dir/TICKER/report_date/, created on demand
    fn filing_dir(&self, located: &LocatedFiling) -> Result<PathBuf, StorageError> {
        let dir = self
            .base_dir
            .join(located.ticker.to_uppercase())
            .join(&located.filing.report_date);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Path for a debug artifact under /base_dir/TICKER/report_date/debug/
    pub fn debug_path(&self, located: &LocatedFiling, file_name: &str) -> Result<PathBuf, StorageError> {
        let dir = self.filing_dir(located)?.join("debug");
        fs::create_dir_all(&dir)?;
        Ok(dir.join(file_name))
    }

    /// Saves the flattened income statement table that is sent to the model.
    pub fn save_table(&self, located: &LocatedFiling, table: &IncomeStatementTable) -> Result<PathBuf, StorageError> {
        let file_path = self.filing_dir(located)?.join("income_table.tsv");
        fs::write(&file_path, &table.text)?;
        tracing::info!("Saved candidate income statement table to {}", file_path.display());
        Ok(file_path)
    }

    /// Saves the raw filing HTML for debugging.
    pub fn save_raw_filing(&self, located: &LocatedFiling, html: &str) -> Result<PathBuf, StorageError> {
        let file_path = self.debug_path(located, "raw_filing.html")?;
        fs::write(&file_path, html)?;
        tracing::info!("Saved raw filing to {}", file_path.display());
        Ok(file_path)
    }

    /// Saves the selected `<table>` element as HTML for debugging.
    pub fn save_debug_table(&self, located: &LocatedFiling, table: &IncomeStatementTable) -> Result<PathBuf, StorageError> {
        let file_path = self.debug_path(located, "income_table.html")?;
        fs::write(&file_path, &table.html)?;
        tracing::info!("Saved selected table HTML to {}", file_path.display());
        Ok(file_path)
    }

    /// Saves filing metadata, extracted figures and margins as JSON.
    pub fn save_report(
        &self,
        located: &LocatedFiling,
        method: &str,
        financials: &ExtractedFinancials,
        margins: &Margins,
    ) -> Result<PathBuf, StorageError> {
        let file_path = self.filing_dir(located)?.join(format!("margins_{}.json", method));

        let report = serde_json::json!({
            "ticker": located.ticker,
            "company_name": located.company_name,
            "filing": located.filing,
            "method": method,
            "financials": financials,
            "margins": margins,
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let report_str = serde_json::to_string_pretty(&report)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&file_path, report_str)?;

        tracing::info!("Saved report to {}", file_path.display());
        Ok(file_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edgar::models::Filing;
    use crate::financials::{margins, LineItem, Provenance};

    fn located() -> LocatedFiling {
        LocatedFiling {
            ticker: "tst".to_string(),
            company_name: "TestCo".to_string(),
            filing: Filing {
                cik: 1,
                accession_number: "0000000001-24-000001".to_string(),
                primary_document: "tst-20231231.htm".to_string(),
                report_date: "2023-12-31".to_string(),
                form_type: "10-K".to_string(),
                filing_date: "2024-02-01".to_string(),
            },
        }
    }

    #[test]
    fn report_lands_under_ticker_and_period() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path().join("out")).unwrap();

        let mut fin = ExtractedFinancials::default();
        fin.set(LineItem::NetSales, Some(1000.0), Provenance::Concept("Revenues".into()));
        fin.set(LineItem::NetIncome, Some(100.0), Provenance::Concept("NetIncomeLoss".into()));
        let path = storage.save_report(&located(), "xbrl", &fin, &margins(&fin)).unwrap();

        assert_eq!(path, dir.path().join("out/TST/2023-12-31/margins_xbrl.json"));
        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["filing"]["accession_number"], "0000000001-24-000001");
        assert_eq!(json["financials"]["net_sales"]["source"], "Revenues");
        assert_eq!(json["margins"]["net_sales_margin"], 0.1);
        assert!(json["margins"]["gross_margin"].is_null());
        assert!(json["extraction_timestamp"].is_string());
    }

    #[test]
    fn table_and_debug_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path()).unwrap();
        let table = IncomeStatementTable {
            heading: None,
            html: "<table></table>".to_string(),
            text: "Net sales\t1".to_string(),
            rows: 1,
        };

        let tsv = storage.save_table(&located(), &table).unwrap();
        assert_eq!(fs::read_to_string(tsv).unwrap(), "Net sales\t1");

        let raw = storage.save_raw_filing(&located(), "<html/>").unwrap();
        assert!(raw.ends_with("TST/2023-12-31/debug/raw_filing.html"));

        let html = storage.save_debug_table(&located(), &table).unwrap();
        assert!(html.ends_with("TST/2023-12-31/debug/income_table.html"));
        assert_eq!(fs::read_to_string(html).unwrap(), "<table></table>");
    }
}

// src/edgar/models.rs
#![allow(non_snake_case)]
use serde::{Deserialize, Serialize};

/// One entry of https://www.sec.gov/files/company_tickers.json
/// Format: { "0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."}, ...}
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct TickerEntry {
    pub cik_str: u64,
    pub ticker: String,
    #[serde(default)]
    pub title: String,
}

/// Structure representing the EDGAR company submission index.
/// Only the fields this tool reads are modeled.
/// Example: https://data.sec.gov/submissions/CIK0000320193.json
#[derive(Debug, Deserialize)]
pub struct CompanySubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fiscalYearEnd: Option<String>,
    pub filings: Filings,
}

#[derive(Debug, Deserialize)]
pub struct Filings {
    pub recent: FilingsList,
}

/// Parallel arrays, one slot per filing, joined by index.
#[derive(Debug, Default, Deserialize)]
pub struct FilingsList {
    #[serde(default)]
    pub accessionNumber: Vec<String>,
    #[serde(default)]
    pub filingDate: Vec<String>,
    #[serde(default)]
    pub reportDate: Vec<String>,
    #[serde(default)]
    pub form: Vec<String>,
    #[serde(default)]
    pub primaryDocument: Vec<String>,
}

/// A specific filing selected from a company's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filing {
    pub cik: u64,
    pub accession_number: String,
    pub primary_document: String,
    /// Period end the filing reports on (fiscal year end for a 10-K).
    pub report_date: String,
    pub form_type: String,
    pub filing_date: String,
}

impl Filing {
    /// Calendar year of the report date, if the date is well formed.
    pub fn report_year(&self) -> Option<i32> {
        year_of(&self.report_date)
    }

    /// Constructs the URL to access the primary document of this filing
    pub fn primary_doc_url(&self) -> String {
        let acc_no_dashes = self.accession_number.replace('-', "");
        format!(
            "https://www.sec.gov/Archives/edgar/data/{}/{}/{}",
            self.cik, acc_no_dashes, self.primary_document
        )
    }
}

/// Leading four-digit year of a `YYYY-MM-DD` date.
pub fn year_of(date: &str) -> Option<i32> {
    date.get(0..4)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filing() -> Filing {
        Filing {
            cik: 320193,
            accession_number: "0000320193-23-000106".to_string(),
            primary_document: "aapl-20230930.htm".to_string(),
            report_date: "2023-09-30".to_string(),
            form_type: "10-K".to_string(),
            filing_date: "2023-11-03".to_string(),
        }
    }

    #[test]
    fn primary_doc_url_strips_accession_dashes() {
        assert_eq!(
            filing().primary_doc_url(),
            "https://www.sec.gov/Archives/edgar/data/320193/000032019323000106/aapl-20230930.htm"
        );
    }

    #[test]
    fn report_year_reads_leading_digits() {
        assert_eq!(filing().report_year(), Some(2023));
        assert_eq!(year_of(""), None);
        assert_eq!(year_of("20x1-01-01"), None);
    }

    #[test]
    fn submission_tolerates_missing_arrays() {
        let json = r#"{
            "cik": "0000320193",
            "name": "Apple Inc.",
            "fiscalYearEnd": "0930",
            "filings": {
                "recent": {
                    "accessionNumber": ["0000320193-23-000106"],
                    "form": ["10-K"],
                    "primaryDocument": ["aapl-20230930.htm"],
                    "filingDate": ["2023-11-03"]
                },
                "files": []
            }
        }"#;
        let submission: CompanySubmission = serde_json::from_str(json).unwrap();
        assert_eq!(submission.name, "Apple Inc.");
        assert_eq!(submission.fiscalYearEnd.as_deref(), Some("0930"));
        assert!(submission.filings.recent.reportDate.is_empty());
        assert_eq!(submission.filings.recent.form, vec!["10-K"]);
    }
}

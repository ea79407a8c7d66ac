// src/report/mod.rs
//! Console output for a run. Logging goes to stderr; this goes to stdout.

use crate::edgar::locator::LocatedFiling;
use crate::financials::{ExtractedFinancials, Margins};

pub fn print_request(ticker: &str, year: Option<i32>, method: &str) {
    let year = year.map_or_else(|| "most recent".to_string(), |y| y.to_string());
    println!("Ticker: {}  Fiscal year: {}  Method: {}", ticker.to_uppercase(), year, method);
}

pub fn print_filing(located: &LocatedFiling) {
    let filing = &located.filing;
    println!("Company: {} (CIK {})", located.company_name, filing.cik);
    println!("  Form:             {}", filing.form_type);
    println!("  Accession:        {}", filing.accession_number);
    println!("  Primary document: {}", filing.primary_document);
    println!("  Report date:      {}", filing.report_date);
    println!("  Filed:            {}", filing.filing_date);
}

pub fn progress(message: &str) {
    println!("-> {}", message);
}

/// Pretty JSON of the extracted figures.
pub fn format_financials(fin: &ExtractedFinancials) -> String {
    serde_json::to_string_pretty(fin).unwrap_or_else(|e| format!("<unserializable financials: {}>", e))
}

pub fn format_margin(name: &str, value: Option<f64>) -> String {
    match value {
        Some(v) => format!("  {}: {:.4} ({:.2}%)", name, v, v * 100.0),
        None => format!("  {}: N/A", name),
    }
}

pub fn print_financials(fin: &ExtractedFinancials) {
    println!("\nExtracted financials:");
    println!("{}", format_financials(fin));
}

pub fn print_margins(margins: &Margins) {
    println!("\nMargins:");
    for (name, value) in margins.entries() {
        println!("{}", format_margin(name, value));
    }
}

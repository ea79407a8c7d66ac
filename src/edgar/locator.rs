// src/edgar/locator.rs
//! Ticker + fiscal year -> the one annual filing to work from.

use serde::Serialize;

use crate::edgar::client::EdgarClient;
use crate::edgar::models::{CompanySubmission, Filing};
use crate::utils::error::EdgarError;

pub const FORM_10K: &str = "10-K";

/// The filing chosen for a run, plus the company context it was found under.
#[derive(Debug, Clone, Serialize)]
pub struct LocatedFiling {
    pub ticker: String,
    pub company_name: String,
    pub filing: Filing,
}

/// Resolves `ticker` to a CIK, pulls its filing history and picks the
/// `form_type` filing for `target_year` (or the most recent one).
pub async fn locate(
    client: &EdgarClient,
    ticker: &str,
    form_type: &str,
    target_year: Option<i32>,
) -> Result<LocatedFiling, EdgarError> {
    let cik = client.lookup_cik(ticker).await?;
    tracing::info!("Resolved ticker {} to CIK {}", ticker.to_uppercase(), cik);

    let submission = client.get_company_submissions(cik).await?;
    tracing::debug!(
        "Submissions for {} (fiscal year end {:?}): {} recent filings",
        submission.name,
        submission.fiscalYearEnd,
        submission.filings.recent.accessionNumber.len()
    );

    let candidates = candidate_filings(&submission, cik, form_type)?;
    tracing::info!("Found {} {} filings with a report date", candidates.len(), form_type);

    let filing = select_filing(&candidates, target_year)
        .cloned()
        .ok_or_else(|| EdgarError::NoFilingsFound {
            form: form_type.to_string(),
            cik,
        })?;

    Ok(LocatedFiling {
        ticker: ticker.to_uppercase(),
        company_name: submission.name,
        filing,
    })
}

/// Joins the submission's parallel arrays by index and keeps the entries of
/// `form_type` (exact match) that carry a report date.
pub fn candidate_filings(
    submission: &CompanySubmission,
    cik: u64,
    form_type: &str,
) -> Result<Vec<Filing>, EdgarError> {
    let recent = &submission.filings.recent;
    let len = recent.accessionNumber.len();
    let lengths = [
        ("form", recent.form.len()),
        ("primaryDocument", recent.primaryDocument.len()),
        ("reportDate", recent.reportDate.len()),
        ("filingDate", recent.filingDate.len()),
    ];
    if let Some((name, other)) = lengths.iter().find(|(_, l)| *l != len) {
        return Err(EdgarError::Parse(format!(
            "filings.recent.{} has {} entries but accessionNumber has {}",
            name, other, len
        )));
    }

    let filings = (0..len)
        .filter(|&i| recent.form[i] == form_type && !recent.reportDate[i].trim().is_empty())
        .map(|i| Filing {
            cik,
            accession_number: recent.accessionNumber[i].clone(),
            primary_document: recent.primaryDocument[i].clone(),
            report_date: recent.reportDate[i].trim().to_string(),
            form_type: recent.form[i].clone(),
            filing_date: recent.filingDate[i].clone(),
        })
        .collect();
    Ok(filings)
}

/// Selection policy:
/// 1. no target year: latest report date overall;
/// 2. latest report date within the target year;
/// 3. latest report date in a year before the target;
/// 4. latest report date overall.
///
/// Returns `None` only for an empty candidate list.
pub fn select_filing(candidates: &[Filing], target_year: Option<i32>) -> Option<&Filing> {
    if candidates.is_empty() {
        return None;
    }
    let Some(year) = target_year else {
        return most_recent(candidates.iter());
    };

    most_recent(candidates.iter().filter(|f| f.report_year() == Some(year)))
        .or_else(|| {
            let prior = most_recent(
                candidates
                    .iter()
                    .filter(|f| f.report_year().is_some_and(|y| y <= year)),
            );
            if let Some(f) = prior {
                tracing::warn!(
                    "No {} filing for fiscal year {}; using nearest prior year ({})",
                    f.form_type, year, f.report_date
                );
            }
            prior
        })
        .or_else(|| {
            tracing::warn!("No filing at or before {}; falling back to the most recent", year);
            most_recent(candidates.iter())
        })
}

// Greatest report date wins; on equal dates the first one seen is kept.
fn most_recent<'a>(filings: impl Iterator<Item = &'a Filing>) -> Option<&'a Filing> {
    filings.fold(None::<&'a Filing>, |best, f| match best {
        Some(b) if b.report_date >= f.report_date => Some(b),
        _ => Some(f),
    })
}

// src/edgar/client.rs
use std::collections::HashMap;
use std::time::Duration;

use reqwest::header;
use serde::de::DeserializeOwned;

use crate::edgar::models::{CompanySubmission, Filing, TickerEntry};
use crate::utils::config::EdgarSettings;
use crate::utils::error::EdgarError;
use crate::xbrl::facts::CompanyFactsPayload;

const TICKER_MAP_URL: &str = "https://www.sec.gov/files/company_tickers.json";
const SEC_DATA_BASE: &str = "https://data.sec.gov";

/// Thin EDGAR client. Every request carries the configured User-Agent and
/// waits `request_delay` first; calls are made one at a time.
#[derive(Debug, Clone)]
pub struct EdgarClient {
    http: reqwest::Client,
    request_delay: Duration,
}

impl EdgarClient {
    pub fn new(settings: &EdgarSettings) -> Result<Self, EdgarError> {
        let http = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str()) // Set the required User-Agent
            .build()?;
        if settings.uses_placeholder_contact() {
            tracing::warn!(
                "SEC_USER_AGENT is not set; sending placeholder contact '{}'. Set SEC_USER_AGENT or pass --user-agent with your own name and email.",
                settings.user_agent
            );
        } else {
            tracing::debug!("Using User-Agent: {}", settings.user_agent);
        }
        Ok(Self {
            http,
            request_delay: settings.request_delay,
        })
    }

    /// Issues a GET and maps non-2xx statuses onto `EdgarError`.
    async fn get(&self, url: &str, accept: &str) -> Result<reqwest::Response, EdgarError> {
        // --- Basic Rate Limiting ---
        tokio::time::sleep(self.request_delay).await;

        tracing::debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .header(header::ACCEPT, accept)
            .send()
            .await?; // Propagates reqwest::Error as EdgarError::Network

        let status = response.status();
        if !status.is_success() {
            tracing::error!("HTTP error status: {} for URL: {}", status, url);
            return Err(status_error(status, url));
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, EdgarError> {
        let body = self.get(url, "application/json").await?.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| EdgarError::Parse(format!("Invalid JSON from {}: {}", url, e)))
    }

    /// Downloads the official ticker -> CIK mapping, keyed by upper-case ticker.
    pub async fn fetch_ticker_map(&self) -> Result<HashMap<String, u64>, EdgarError> {
        let raw: HashMap<String, TickerEntry> = self.get_json(TICKER_MAP_URL).await?;
        let mapping = build_ticker_map(raw);
        tracing::debug!("Loaded {} tickers from SEC ticker map", mapping.len());
        Ok(mapping)
    }

    /// Gets the CIK (Central Index Key) for a ticker symbol
    pub async fn lookup_cik(&self, ticker: &str) -> Result<u64, EdgarError> {
        let mapping = self.fetch_ticker_map().await?;
        cik_for_ticker(&mapping, ticker)
    }

    /// Fetches the company submission data for a given CIK
    pub async fn get_company_submissions(&self, cik: u64) -> Result<CompanySubmission, EdgarError> {
        let url = format!("{}/submissions/CIK{:010}.json", SEC_DATA_BASE, cik);
        self.get_json(&url).await
    }

    /// Fetches the full XBRL companyfacts payload for a given CIK
    pub async fn get_company_facts(&self, cik: u64) -> Result<CompanyFactsPayload, EdgarError> {
        let url = format!("{}/api/xbrl/companyfacts/CIK{:010}.json", SEC_DATA_BASE, cik);
        self.get_json(&url).await
    }

    /// Downloads the primary (rendered HTML) document of a filing.
    pub async fn download_filing_doc(&self, filing: &Filing) -> Result<String, EdgarError> {
        let url = filing.primary_doc_url();
        tracing::info!("Downloading document from: {}", url);

        // SEC uses various content types, but often text/html for filings
        let body = self
            .get(&url, "application/xml,text/html,text/plain,*/*")
            .await
            .map_err(document_error)?
            .text()
            .await?;
        tracing::debug!("Successfully downloaded {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

/// Maps a non-2xx status onto `EdgarError`.
fn status_error(status: reqwest::StatusCode, url: &str) -> EdgarError {
    match status {
        reqwest::StatusCode::FORBIDDEN => {
            tracing::warn!("Received 403 Forbidden - check User-Agent and rate limits.");
            EdgarError::RateLimited
        }
        reqwest::StatusCode::NOT_FOUND => EdgarError::NotFound(url.to_string()),
        _ => EdgarError::Http(status),
    }
}

// A missing archive document is a missing filing, not missing company data.
fn document_error(err: EdgarError) -> EdgarError {
    match err {
        EdgarError::NotFound(url) => EdgarError::FilingDocNotFound(url),
        other => other,
    }
}

/// Re-keys the SEC payload by upper-case ticker. Payload keys are row
/// numbers; rows are applied in numeric order, so for a ticker listed twice
/// the later row wins.
pub fn build_ticker_map(raw: HashMap<String, TickerEntry>) -> HashMap<String, u64> {
    let mut rows: Vec<(String, TickerEntry)> = raw.into_iter().collect();
    rows.sort_by_cached_key(|(key, _)| (key.parse::<u64>().unwrap_or(u64::MAX), key.clone()));

    rows.into_iter()
        .map(|(_, entry)| (entry.ticker.to_uppercase(), entry.cik_str))
        .collect()
}

/// Case-insensitive exact ticker lookup.
pub fn cik_for_ticker(mapping: &HashMap<String, u64>, ticker: &str) -> Result<u64, EdgarError> {
    mapping
        .get(&ticker.trim().to_uppercase())
        .copied()
        .ok_or_else(|| EdgarError::TickerNotFound(ticker.to_string()))
}

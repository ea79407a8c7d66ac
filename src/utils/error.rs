// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum EdgarError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // e.g., 404 Not Found, 403 Forbidden

    #[error("SEC Rate limit likely exceeded")]
    RateLimited,

    #[error("Ticker {0} not found in SEC ticker list")]
    TickerNotFound(String),

    #[error("No {form} filings found for CIK {cik}")]
    NoFilingsFound { form: String, cik: u64 },

    #[error("EDGAR has no data at {0}")]
    NotFound(String),

    #[error("Could not find specified filing: {0}")]
    FilingDocNotFound(String),

    #[error("Failed to parse EDGAR response: {0}")]
    Parse(String),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Income statement table not found: {0}")]
    TableNotFound(String),
}

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("DEEPSEEK_API_KEY not set in environment")]
    MissingApiKey,

    #[error("Language model request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Language model returned HTTP {status}: {body}")]
    Http { status: reqwest::StatusCode, body: String },

    #[error("Language model API error: {0}")]
    Api(String),

    #[error("Unexpected language model response structure: {0}")]
    UnexpectedResponse(String),

    #[error("Empty content from language model. Full response: {0}")]
    EmptyContent(String),

    #[error("Could not find a JSON object in language model response: {raw}")]
    NoJsonObject { raw: String },

    #[error("Failed to parse JSON recovered from language model response ({source}): {raw}")]
    InvalidJson {
        raw: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("EDGAR interaction failed: {0}")]
    Edgar(#[from] EdgarError), // Automatically convert Edgar errors

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("LLM extraction failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("No usable income statement data found for {0}")]
    NoUsableData(String),
}

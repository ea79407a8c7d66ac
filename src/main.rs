// src/main.rs
use clap::{Parser, ValueEnum};

use tenk_margins::edgar::locator::{self, LocatedFiling, FORM_10K};
use tenk_margins::edgar::EdgarClient;
use tenk_margins::extractors::IncomeStatementExtractor;
use tenk_margins::financials::{usable_margins, ExtractedFinancials};
use tenk_margins::llm::{DeepSeekClient, TableExtractionOracle};
use tenk_margins::storage::StorageManager;
use tenk_margins::utils::config::Settings;
use tenk_margins::utils::{html_debug, logging};
use tenk_margins::xbrl::{income_statement, FactStore};
use tenk_margins::{report, AppError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Method {
    /// Tagged figures from the SEC company-facts API
    Xbrl,
    /// Income statement table from the filing, read by a language model
    Llm,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Method::Xbrl => "xbrl",
            Method::Llm => "llm",
        }
    }
}

/// Profitability margins from a company's 10-K filing
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Ticker symbol of the company
    ticker: String,

    /// Fiscal year of the 10-K (defaults to the most recent filing)
    year: Option<i32>,

    /// How to obtain the income statement figures
    #[arg(short, long, value_enum, default_value_t = Method::Xbrl)]
    method: Method,

    /// Output directory for the extracted table and report
    #[arg(short, long, default_value = "./output")]
    output_dir: String,

    /// Contact string sent as the SEC User-Agent (overrides SEC_USER_AGENT)
    #[arg(long)]
    user_agent: Option<String>,

    /// Debug mode - verbose logs and annotated HTML files for debugging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    // .env first so RUST_LOG from it is honored
    let dotenv = dotenvy::dotenv();
    let args = Args::parse();
    logging::setup_logging(args.debug);
    match dotenv {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) => tracing::debug!("No .env loaded: {}", e),
    }
    tracing::info!("Starting processing for args: {:?}", args);

    let result = run(&args).await;
    if let Err(e) = &result {
        tracing::error!("{}", e);
    }
    result
}

async fn run(args: &Args) -> Result<(), AppError> {
    report::print_request(&args.ticker, args.year, args.method.as_str());

    let settings = Settings::from_env(args.user_agent.clone())?;
    tracing::debug!("Settings: {:?}", settings);

    let storage = StorageManager::new(&args.output_dir)?;
    let client = EdgarClient::new(&settings.edgar)?;

    report::progress("Locating 10-K filing on EDGAR");
    let located = locator::locate(&client, &args.ticker, FORM_10K, args.year).await?;
    report::print_filing(&located);

    let financials = match args.method {
        Method::Xbrl => extract_via_xbrl(&client, &located).await?,
        Method::Llm => extract_via_llm(&client, &storage, &located, &settings, args.debug).await?,
    };
    report::print_financials(&financials);

    let subject = format!("{} ({})", located.ticker, located.filing.accession_number);
    let margins = usable_margins(&financials, &subject)?;
    report::print_margins(&margins);

    let path = storage.save_report(&located, args.method.as_str(), &financials, &margins)?;
    report::progress(&format!("Report written to {}", path.display()));
    Ok(())
}

async fn extract_via_xbrl(client: &EdgarClient, located: &LocatedFiling) -> Result<ExtractedFinancials, AppError> {
    report::progress("Fetching XBRL company facts");
    let payload = client.get_company_facts(located.filing.cik).await?;
    let store = FactStore::from_payload(payload);
    if store.is_empty() {
        tracing::warn!("Company facts for CIK {} carry no XBRL facts", located.filing.cik);
    } else {
        tracing::info!("Loaded {} facts for {}", store.len(), store.entity_name());
    }

    Ok(income_statement(&store, &located.filing.report_date))
}

async fn extract_via_llm(
    client: &EdgarClient,
    storage: &StorageManager,
    located: &LocatedFiling,
    settings: &Settings,
    debug: bool,
) -> Result<ExtractedFinancials, AppError> {
    // Fail on a missing key before downloading anything
    let oracle = TableExtractionOracle::new(DeepSeekClient::new(&settings.llm)?);

    report::progress("Downloading primary document");
    let content = client.download_filing_doc(&located.filing).await?;
    tracing::info!("Successfully downloaded document ({} bytes)", content.len());

    if debug {
        if let Err(e) = storage.save_raw_filing(located, &content) {
            tracing::warn!("Failed to save raw filing: {}", e);
        }
        match storage.debug_path(located, "filing_annotated.html") {
            Ok(path) => {
                if let Err(e) = html_debug::write_annotated_filing(&content, &path) {
                    tracing::warn!("Failed to create debug HTML: {}", e);
                }
            }
            Err(e) => tracing::warn!("Failed to create debug directory: {}", e),
        }
    }

    report::progress("Locating income statement table");
    let table = IncomeStatementExtractor::new().extract(&content)?;
    tracing::info!(
        "Selected table with {} rows (heading: {:?})",
        table.rows,
        table.heading
    );

    if let Err(e) = storage.save_table(located, &table) {
        tracing::error!("Failed to save table text: {}", e);
    }
    if debug {
        if let Err(e) = storage.save_debug_table(located, &table) {
            tracing::warn!("Failed to save table HTML: {}", e);
        }
    }

    report::progress("Asking the language model for figures");
    Ok(oracle.extract(&table.text).await?)
}

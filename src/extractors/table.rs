// src/extractors/table.rs

// --- Imports ---
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{node::Node, ElementRef, Html, Selector};

// --- CSS Selectors (Lazy Static) ---
static TABLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("Failed to compile TABLE_SELECTOR"));

static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("Failed to compile ROW_SELECTOR"));

static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td, th").expect("Failed to compile CELL_SELECTOR"));

// Selectors for potential ToC containers
static TOC_CONTAINER_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div[class*='toc'], nav[class*='toc'], div[id*='toc'], nav[id*='toc']")
        .expect("Failed to compile TOC_CONTAINER_SELECTOR")
});

// --- Regex Patterns for Heading Text (Lazy Static) ---
// Matched against a single whitespace-collapsed text node.
pub static STATEMENT_HEADING_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\bCONSOLIDATED\s+STATEMENTS?\s+OF\s+(?:OPERATIONS|INCOME|EARNINGS)\b",
        r"(?i)\bSTATEMENTS?\s+OF\s+(?:OPERATIONS|INCOME)\b",
    ]
    .iter()
    .filter_map(|pat| Regex::new(pat).ok())
    .collect()
});

// --- Data Structures ---
#[derive(Debug, Clone)]
pub struct IncomeStatementTable {
    /// Heading text the table was found under; `None` for the largest-table fallback.
    pub heading: Option<String>,
    /// Raw HTML of the `<table>` element.
    pub html: String,
    /// Tab-separated cells, one line per non-empty row.
    pub text: String,
    pub rows: usize,
}

/// Locates the income statement table in a rendered 10-K.
#[derive(Debug, Default)]
pub struct IncomeStatementExtractor;

impl IncomeStatementExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Takes the first table that follows an income statement heading (outside
    /// the table of contents), or failing that the table with the most text.
    pub fn extract(&self, html_content: &str) -> Result<IncomeStatementTable, ExtractError> {
        let document = Html::parse_document(html_content);

        let (heading, table) = match self.find_table_after_heading(&document) {
            Some((heading, table)) => {
                tracing::info!("Found income statement table under heading '{}'", heading);
                (Some(heading), table)
            }
            None => {
                tracing::warn!("No income statement heading found; falling back to the largest table");
                let table = largest_table(&document).ok_or_else(|| {
                    ExtractError::TableNotFound("document contains no <table> elements".to_string())
                })?;
                (None, table)
            }
        };

        let rows = table_rows(table);
        if rows.is_empty() {
            return Err(ExtractError::TableNotFound(
                "selected table has no non-empty rows".to_string(),
            ));
        }
        tracing::debug!("Income statement table has {} non-empty rows", rows.len());

        Ok(IncomeStatementTable {
            heading,
            html: table.html(),
            text: rows.join("\n"),
            rows: rows.len(),
        })
    }

    /// Walks the document in order; after a qualifying heading, the next
    /// `<table>` encountered is the statement.
    fn find_table_after_heading<'a>(&self, document: &'a Html) -> Option<(String, ElementRef<'a>)> {
        let mut heading: Option<String> = None;

        for node in document.tree.root().descendants() {
            match node.value() {
                Node::Text(text) if heading.is_none() => {
                    let cleaned = collapse_whitespace(&text.text);
                    if cleaned.is_empty() || !STATEMENT_HEADING_RE.iter().any(|re| re.is_match(&cleaned)) {
                        continue;
                    }
                    if node.parent().and_then(ElementRef::wrap).is_some_and(is_in_toc) {
                        tracing::debug!("Skipping heading in table of contents: '{}'", cleaned);
                        continue;
                    }
                    tracing::trace!("Candidate heading: '{}'", cleaned);
                    heading = Some(cleaned);
                }
                Node::Element(element) if heading.is_some() && element.name() == "table" => {
                    let table = ElementRef::wrap(node)?;
                    return heading.take().map(|h| (h, table));
                }
                _ => {}
            }
        }

        None
    }
}

/// Checks if an element sits inside a Table of Contents: a link, or a
/// container whose class/id mentions 'toc'.
fn is_in_toc(element: ElementRef<'_>) -> bool {
    if element.value().name() == "a" && element.value().attr("href").is_some() {
        return true;
    }

    for ancestor in element.ancestors().filter_map(ElementRef::wrap) {
        let name = ancestor.value().name();
        if TOC_CONTAINER_SELECTOR.matches(&ancestor) {
            return true;
        }
        if name == "a" && ancestor.value().attr("href").is_some() {
            return true;
        }
        if name == "body" {
            break;
        }
    }
    false
}

fn largest_table(document: &Html) -> Option<ElementRef<'_>> {
    let mut best: Option<(usize, ElementRef<'_>)> = None;
    for table in document.select(&TABLE_SELECTOR) {
        let len = collapse_whitespace(&table.text().collect::<Vec<_>>().join(" ")).len();
        // Strictly greater: the earliest of equally large tables wins.
        if best.map_or(true, |(best_len, _)| len > best_len) {
            best = Some((len, table));
        }
    }
    best.map(|(_, table)| table)
}

fn table_rows(table: ElementRef<'_>) -> Vec<String> {
    table
        .select(&ROW_SELECTOR)
        .filter_map(|tr| {
            let cells: Vec<String> = tr
                .select(&CELL_SELECTOR)
                .map(|cell| collapse_whitespace(&cell.text().collect::<Vec<_>>().join(" ")))
                .collect();
            cells.iter().any(|c| !c.is_empty()).then(|| cells.join("\t"))
        })
        .collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

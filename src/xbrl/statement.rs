// src/xbrl/statement.rs
use crate::financials::{ExtractedFinancials, LineItem, Provenance};
use crate::xbrl::concepts;
use crate::xbrl::facts::FactStore;
use crate::xbrl::resolver::resolve;

/// Builds the income statement for the fiscal year ending `report_date`,
/// one independent resolution per line item, then fills derivable gaps.
pub fn income_statement(store: &FactStore, report_date: &str) -> ExtractedFinancials {
    let mut fin = ExtractedFinancials {
        fiscal_year_label: Some(report_date.to_string()),
        ..Default::default()
    };

    for item in LineItem::ALL {
        match resolve(store, concepts::candidates(item), Some(report_date)) {
            Some(res) => {
                tracing::info!("{}: {} via {} ({})", item.field_name(), res.value, res.concept, res.stage);
                if item == LineItem::NetSales {
                    fin.currency = Some(res.unit.clone());
                }
                fin.set(item, Some(res.value), Provenance::Concept(res.concept));
            }
            None => tracing::info!("{}: unavailable", item.field_name()),
        }
    }

    // companyfacts monetary values are reported in USD
    fin.currency.get_or_insert_with(|| "USD".to_string());
    fin.derive_missing();
    fin
}

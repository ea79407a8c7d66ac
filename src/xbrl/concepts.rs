// src/xbrl/concepts.rs
//! us-gaap concept names accepted for each income statement line item,
//! most preferred first. Add new taxonomy synonyms here.

use crate::financials::LineItem;

pub const NET_SALES_CONCEPTS: &[&str] = &[
    "Revenues",
    "RevenueFromContractWithCustomerExcludingAssessedTax",
    "SalesRevenueNet",
    "SalesRevenueGoodsNet",
    "SalesRevenueServicesNet",
    "PremiumsEarnedNet", // insurers
    "TotalRevenuesAndOtherIncome",
];

pub const COST_OF_REVENUE_CONCEPTS: &[&str] = &[
    "CostOfRevenue",
    "CostOfGoodsAndServicesSold",
    "CostOfGoodsSold",
    "CostOfGoodsSoldExcludingDepreciationDepletionAndAmortization",
    "CostOfServices",
];

pub const GROSS_PROFIT_CONCEPTS: &[&str] = &[
    "GrossProfit",
    "GrossProfitExcludingDepreciationDepletionAndAmortization",
];

pub const OPERATING_INCOME_CONCEPTS: &[&str] = &[
    "OperatingIncomeLoss",
    "IncomeLossFromContinuingOperationsBeforeIncomeTaxesExtraordinaryItemsNoncontrollingInterest",
    "IncomeLossFromContinuingOperationsBeforeIncomeTaxesMinorityInterestAndIncomeLossFromEquityMethodInvestments",
];

pub const NET_INCOME_CONCEPTS: &[&str] = &[
    "NetIncomeLoss",
    "ProfitLoss",
    "NetIncomeLossAvailableToCommonStockholdersBasic",
    "NetIncomeLossAvailableToCommonStockholdersDiluted",
];

pub const DEPR_AMORT_CONCEPTS: &[&str] = &[
    "DepreciationAndAmortization",
    "DepreciationDepletionAndAmortization",
    "Depreciation",
    "AmortizationOfIntangibleAssets",
];

pub const EBITDA_CONCEPTS: &[&str] = &[
    "EarningsBeforeInterestTaxesDepreciationAndAmortization",
    "EarningsBeforeInterestTaxesDepreciationAndAmortizationEBITDA",
];

/// Candidate concept list for a line item.
pub fn candidates(item: LineItem) -> &'static [&'static str] {
    match item {
        LineItem::NetSales => NET_SALES_CONCEPTS,
        LineItem::CostOfRevenue => COST_OF_REVENUE_CONCEPTS,
        LineItem::GrossProfit => GROSS_PROFIT_CONCEPTS,
        LineItem::OperatingIncome => OPERATING_INCOME_CONCEPTS,
        LineItem::NetIncome => NET_INCOME_CONCEPTS,
        LineItem::DepreciationAndAmortization => DEPR_AMORT_CONCEPTS,
        LineItem::Ebitda => EBITDA_CONCEPTS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_line_item_has_candidates() {
        for item in LineItem::ALL {
            assert!(!candidates(item).is_empty(), "{:?} has no concepts", item);
        }
    }

    #[test]
    fn most_common_tag_comes_first() {
        assert_eq!(candidates(LineItem::NetIncome)[0], "NetIncomeLoss");
        assert_eq!(candidates(LineItem::NetSales)[0], "Revenues");
    }
}

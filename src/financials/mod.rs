// src/financials/mod.rs
//! Income statement figures as extracted from a filing, each paired with
//! where it came from.

pub mod margins;

use std::fmt;

use serde::{Serialize, Serializer};

pub use margins::{margins, usable_margins, Margins};

/// The income statement lines this tool extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineItem {
    NetSales,
    CostOfRevenue,
    GrossProfit,
    OperatingIncome,
    NetIncome,
    DepreciationAndAmortization,
    Ebitda,
}

impl LineItem {
    /// Resolution order; derivations read earlier items.
    pub const ALL: [LineItem; 7] = [
        LineItem::NetSales,
        LineItem::CostOfRevenue,
        LineItem::GrossProfit,
        LineItem::OperatingIncome,
        LineItem::NetIncome,
        LineItem::DepreciationAndAmortization,
        LineItem::Ebitda,
    ];

    pub fn field_name(self) -> &'static str {
        match self {
            LineItem::NetSales => "net_sales",
            LineItem::CostOfRevenue => "cost_of_revenue",
            LineItem::GrossProfit => "gross_profit",
            LineItem::OperatingIncome => "operating_income",
            LineItem::NetIncome => "net_income",
            LineItem::DepreciationAndAmortization => "depreciation_and_amortization",
            LineItem::Ebitda => "ebitda",
        }
    }
}

/// Where a figure came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// Tagged XBRL concept that supplied the value.
    Concept(String),
    /// Computed from other figures; holds the formula.
    Derived(&'static str),
    /// Read off the statement table by the language model.
    Model,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Concept(name) => f.write_str(name),
            Provenance::Derived(formula) => write!(f, "derived: {}", formula),
            Provenance::Model => f.write_str("model"),
        }
    }
}

impl Serialize for Provenance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineValue {
    pub value: f64,
    pub source: Provenance,
}

/// A figure computed from two others when it was not reported directly.
struct Derivation {
    target: LineItem,
    formula: &'static str,
    lhs: LineItem,
    rhs: LineItem,
    combine: fn(f64, f64) -> f64,
}

const DERIVATIONS: [Derivation; 2] = [
    Derivation {
        target: LineItem::GrossProfit,
        formula: "net_sales - cost_of_revenue",
        lhs: LineItem::NetSales,
        rhs: LineItem::CostOfRevenue,
        combine: |a, b| a - b,
    },
    Derivation {
        target: LineItem::Ebitda,
        formula: "operating_income + depreciation_and_amortization",
        lhs: LineItem::OperatingIncome,
        rhs: LineItem::DepreciationAndAmortization,
        combine: |a, b| a + b,
    },
];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractedFinancials {
    pub fiscal_year_label: Option<String>,
    pub net_sales: Option<LineValue>,
    pub cost_of_revenue: Option<LineValue>,
    pub gross_profit: Option<LineValue>,
    pub operating_income: Option<LineValue>,
    pub net_income: Option<LineValue>,
    pub depreciation_and_amortization: Option<LineValue>,
    pub ebitda: Option<LineValue>,
    pub currency: Option<String>,
    pub units_note: Option<String>,
}

impl ExtractedFinancials {
    pub fn get(&self, item: LineItem) -> Option<&LineValue> {
        match item {
            LineItem::NetSales => self.net_sales.as_ref(),
            LineItem::CostOfRevenue => self.cost_of_revenue.as_ref(),
            LineItem::GrossProfit => self.gross_profit.as_ref(),
            LineItem::OperatingIncome => self.operating_income.as_ref(),
            LineItem::NetIncome => self.net_income.as_ref(),
            LineItem::DepreciationAndAmortization => self.depreciation_and_amortization.as_ref(),
            LineItem::Ebitda => self.ebitda.as_ref(),
        }
    }

    pub fn value(&self, item: LineItem) -> Option<f64> {
        self.get(item).map(|v| v.value)
    }

    fn slot_mut(&mut self, item: LineItem) -> &mut Option<LineValue> {
        match item {
            LineItem::NetSales => &mut self.net_sales,
            LineItem::CostOfRevenue => &mut self.cost_of_revenue,
            LineItem::GrossProfit => &mut self.gross_profit,
            LineItem::OperatingIncome => &mut self.operating_income,
            LineItem::NetIncome => &mut self.net_income,
            LineItem::DepreciationAndAmortization => &mut self.depreciation_and_amortization,
            LineItem::Ebitda => &mut self.ebitda,
        }
    }

    /// Records a reported figure. `None` leaves the field unavailable.
    pub fn set(&mut self, item: LineItem, value: Option<f64>, source: Provenance) {
        *self.slot_mut(item) = value.map(|value| LineValue { value, source });
    }

    /// Fills gross profit and EBITDA from their components where they are
    /// missing. Fields that already hold a value are never touched.
    pub fn derive_missing(&mut self) {
        for d in &DERIVATIONS {
            if self.get(d.target).is_some() {
                continue;
            }
            if let (Some(a), Some(b)) = (self.value(d.lhs), self.value(d.rhs)) {
                let value = (d.combine)(a, b);
                tracing::debug!("Derived {} = {} ({})", d.target.field_name(), value, d.formula);
                *self.slot_mut(d.target) = Some(LineValue {
                    value,
                    source: Provenance::Derived(d.formula),
                });
            }
        }
    }

    /// True when at least one line item resolved.
    pub fn has_any_figure(&self) -> bool {
        LineItem::ALL.iter().any(|&item| self.get(item).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concept(name: &str) -> Provenance {
        Provenance::Concept(name.to_string())
    }

    #[test]
    fn tagged_gross_profit_is_never_replaced() {
        let mut fin = ExtractedFinancials::default();
        fin.set(LineItem::NetSales, Some(1000.0), concept("Revenues"));
        fin.set(LineItem::CostOfRevenue, Some(700.0), concept("CostOfRevenue"));
        fin.set(LineItem::GrossProfit, Some(310.0), concept("GrossProfit"));

        fin.derive_missing();

        let gp = fin.gross_profit.as_ref().unwrap();
        assert_eq!(gp.value, 310.0);
        assert_eq!(gp.source, concept("GrossProfit"));
    }

    #[test]
    fn missing_gross_profit_and_ebitda_are_derived() {
        let mut fin = ExtractedFinancials::default();
        fin.set(LineItem::NetSales, Some(1000.0), concept("Revenues"));
        fin.set(LineItem::CostOfRevenue, Some(600.0), concept("CostOfRevenue"));
        fin.set(LineItem::OperatingIncome, Some(200.0), concept("OperatingIncomeLoss"));
        fin.set(LineItem::DepreciationAndAmortization, Some(50.0), concept("DepreciationAndAmortization"));

        fin.derive_missing();

        assert_eq!(fin.value(LineItem::GrossProfit), Some(400.0));
        assert_eq!(
            fin.gross_profit.as_ref().unwrap().source.to_string(),
            "derived: net_sales - cost_of_revenue"
        );
        assert_eq!(fin.value(LineItem::Ebitda), Some(250.0));
        assert_eq!(
            fin.ebitda.as_ref().unwrap().source,
            Provenance::Derived("operating_income + depreciation_and_amortization")
        );
    }

    #[test]
    fn derivation_needs_both_inputs() {
        let mut fin = ExtractedFinancials::default();
        fin.set(LineItem::NetSales, Some(1000.0), concept("Revenues"));
        fin.set(LineItem::OperatingIncome, Some(200.0), concept("OperatingIncomeLoss"));
        fin.derive_missing();
        assert!(fin.gross_profit.is_none());
        assert!(fin.ebitda.is_none());
    }

    #[test]
    fn serializes_provenance_as_text() {
        let mut fin = ExtractedFinancials::default();
        fin.set(LineItem::NetIncome, Some(5.0), Provenance::Model);
        let json = serde_json::to_value(&fin).unwrap();
        assert_eq!(json["net_income"]["value"], 5.0);
        assert_eq!(json["net_income"]["source"], "model");
        assert!(json["net_sales"].is_null());
    }

    #[test]
    fn empty_financials_have_no_figures() {
        let mut fin = ExtractedFinancials::default();
        assert!(!fin.has_any_figure());
        fin.set(LineItem::Ebitda, Some(1.0), Provenance::Model);
        assert!(fin.has_any_figure());
    }
}

// src/financials/margins.rs
use serde::Serialize;

use crate::financials::{ExtractedFinancials, LineItem};
use crate::utils::error::AppError;

/// Profitability ratios as fractions of net sales (0.25 = 25%).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Margins {
    pub net_sales_margin: Option<f64>,
    pub gross_margin: Option<f64>,
    pub operating_margin: Option<f64>,
    pub ebitda_margin: Option<f64>,
}

impl Margins {
    /// Name/value pairs in report order.
    pub fn entries(&self) -> [(&'static str, Option<f64>); 4] {
        [
            ("net_sales_margin", self.net_sales_margin),
            ("gross_margin", self.gross_margin),
            ("operating_margin", self.operating_margin),
            ("ebitda_margin", self.ebitda_margin),
        ]
    }
}

/// Computes margins from already-extracted figures. Never fails: a missing
/// figure or a zero denominator gives `None` for that ratio.
pub fn margins(fin: &ExtractedFinancials) -> Margins {
    let net_sales = fin.value(LineItem::NetSales);
    let ratio = |item| safe_div(fin.value(item), net_sales);

    Margins {
        net_sales_margin: ratio(LineItem::NetIncome),
        gross_margin: ratio(LineItem::GrossProfit),
        operating_margin: ratio(LineItem::OperatingIncome),
        ebitda_margin: ratio(LineItem::Ebitda),
    }
}

/// Margins for a run that must have produced at least one figure.
/// `subject` names the filing in the error when nothing resolved.
pub fn usable_margins(fin: &ExtractedFinancials, subject: &str) -> Result<Margins, AppError> {
    if !fin.has_any_figure() {
        return Err(AppError::NoUsableData(subject.to_string()));
    }
    Ok(margins(fin))
}

fn safe_div(num: Option<f64>, den: Option<f64>) -> Option<f64> {
    let (num, den) = (num?, den?);
    if den == 0.0 {
        return None;
    }
    Some(num / den).filter(|r| r.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::financials::Provenance;
    use approx::assert_relative_eq;

    fn financials(values: &[(LineItem, f64)]) -> ExtractedFinancials {
        let mut fin = ExtractedFinancials::default();
        for &(item, value) in values {
            fin.set(item, Some(value), Provenance::Model);
        }
        fin
    }

    #[test]
    fn standard_margins() {
        let fin = financials(&[
            (LineItem::NetSales, 1000.0),
            (LineItem::GrossProfit, 400.0),
            (LineItem::OperatingIncome, 200.0),
            (LineItem::NetIncome, 100.0),
            (LineItem::Ebitda, 250.0),
        ]);
        let m = margins(&fin);
        assert_relative_eq!(m.net_sales_margin.unwrap(), 0.10);
        assert_relative_eq!(m.gross_margin.unwrap(), 0.40);
        assert_relative_eq!(m.operating_margin.unwrap(), 0.20);
        assert_relative_eq!(m.ebitda_margin.unwrap(), 0.25);
    }

    #[test]
    fn missing_net_sales_nulls_everything() {
        let fin = financials(&[(LineItem::NetIncome, 10.0)]);
        assert_eq!(margins(&fin), Margins::default());
    }

    #[test]
    fn zero_net_sales_is_not_infinity() {
        let fin = financials(&[(LineItem::NetSales, 0.0), (LineItem::NetIncome, 5.0)]);
        let m = margins(&fin);
        assert_eq!(m.net_sales_margin, None);
        assert_eq!(m.gross_margin, None);
    }

    #[test]
    fn missing_numerator_only_nulls_its_ratio() {
        let fin = financials(&[(LineItem::NetSales, 200.0), (LineItem::NetIncome, -50.0)]);
        let m = margins(&fin);
        assert_relative_eq!(m.net_sales_margin.unwrap(), -0.25);
        assert_eq!(m.gross_margin, None);
        assert_eq!(m.operating_margin, None);
        assert_eq!(m.ebitda_margin, None);
    }

    #[test]
    fn derived_figures_feed_margins_like_tagged_ones() {
        let mut fin = financials(&[(LineItem::NetSales, 500.0), (LineItem::CostOfRevenue, 300.0)]);
        fin.derive_missing();
        assert_relative_eq!(margins(&fin).gross_margin.unwrap(), 0.40);
    }

    #[test]
    fn entries_follow_report_order() {
        let names: Vec<_> = Margins::default().entries().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, ["net_sales_margin", "gross_margin", "operating_margin", "ebitda_margin"]);
    }

    #[test]
    fn empty_financials_are_not_usable() {
        let err = usable_margins(&ExtractedFinancials::default(), "TST (0000000001-24-000001)").unwrap_err();
        assert!(matches!(err, AppError::NoUsableData(s) if s == "TST (0000000001-24-000001)"));
    }

    #[test]
    fn partial_financials_still_report() {
        let fin = financials(&[(LineItem::NetIncome, 5.0)]);
        let m = usable_margins(&fin, "TST").unwrap();
        assert_eq!(m, Margins::default());
    }
}

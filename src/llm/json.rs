// src/llm/json.rs
//! Getting one JSON object out of free-form model output.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::financials::{ExtractedFinancials, LineItem, Provenance};
use crate::utils::error::LlmError;

/// Parses `content` as a JSON object, or else the first balanced `{...}`
/// block inside it (prose, markdown fences and trailing chatter are ignored).
pub fn recover_json_object(content: &str) -> Result<Value, LlmError> {
    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(content.trim()) {
        return Ok(value);
    }

    let block = first_balanced_object(content).ok_or_else(|| LlmError::NoJsonObject {
        raw: content.to_string(),
    })?;
    tracing::debug!("Recovered JSON block of {} bytes from model output", block.len());

    serde_json::from_str(block).map_err(|source| LlmError::InvalidJson {
        raw: block.to_string(),
        source,
    })
}

/// The object opened by the first `{`, honouring braces inside string
/// literals. An unterminated outer object yields `None`, never an inner one.
fn first_balanced_object(s: &str) -> Option<&str> {
    let start = s.find('{')?;
    balanced_from(s, start)
}

fn balanced_from(s: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in s[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&s[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

/// The object the model is asked to return. Every field is optional and
/// numbers may come back as numbers, numeric strings or null.
#[derive(Debug, Default, Deserialize)]
pub struct ModelFinancials {
    #[serde(default, deserialize_with = "lenient_text")]
    pub fiscal_year_label: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub net_sales: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub cost_of_revenue: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub gross_profit: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub operating_income: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub net_income: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub depreciation_and_amortization: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub ebitda: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub units_note: Option<String>,
}

impl ModelFinancials {
    pub fn into_financials(self) -> ExtractedFinancials {
        let mut fin = ExtractedFinancials {
            fiscal_year_label: self.fiscal_year_label,
            currency: self.currency,
            units_note: self.units_note,
            ..Default::default()
        };
        let values = [
            (LineItem::NetSales, self.net_sales),
            (LineItem::CostOfRevenue, self.cost_of_revenue),
            (LineItem::GrossProfit, self.gross_profit),
            (LineItem::OperatingIncome, self.operating_income),
            (LineItem::NetIncome, self.net_income),
            (LineItem::DepreciationAndAmortization, self.depreciation_and_amortization),
            (LineItem::Ebitda, self.ebitda),
        ];
        for (item, value) in values {
            fin.set(item, value, Provenance::Model);
        }
        fin
    }
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_amount(&s),
        _ => None,
    })
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// "$1,234.5" -> 1234.5, "(56)" -> -56. Anything else non-numeric is `None`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let (negative, body) = match trimmed.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, trimmed),
    };
    let cleaned: String = body
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' ' | '\u{a0}'))
        .collect();
    let value = cleaned.parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_object_after_leading_prose() {
        let value = recover_json_object("Sure! {\"net_sales\": 500}").unwrap();
        let fin: ModelFinancials = serde_json::from_value(value).unwrap();
        assert_eq!(fin.net_sales, Some(500.0));
    }

    #[test]
    fn pure_json_passes_straight_through() {
        let value = recover_json_object("  {\"net_income\": null}\n").unwrap();
        assert!(value["net_income"].is_null());
    }

    #[test]
    fn fenced_block_with_nested_braces_and_trailing_text() {
        let content = "```json\n{\"units_note\": \"in {millions}\", \"extra\": {\"a\": 1}}\n```\nLet me know!";
        let value = recover_json_object(content).unwrap();
        assert_eq!(value["units_note"], "in {millions}");
        assert_eq!(value["extra"]["a"], 1);
    }

    #[test]
    fn escaped_quotes_do_not_end_strings() {
        let content = r#"Result: {"fiscal_year_label": "FY \"2023\" }", "net_sales": 1} done"#;
        let value = recover_json_object(content).unwrap();
        assert_eq!(value["net_sales"], 1);
    }

    #[test]
    fn prose_without_object_is_a_format_error() {
        let err = recover_json_object("I could not find an income statement.").unwrap_err();
        match err {
            LlmError::NoJsonObject { raw } => assert!(raw.contains("could not find")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unterminated_object_is_a_format_error() {
        assert!(matches!(
            recover_json_object("{\"net_sales\": 5"),
            Err(LlmError::NoJsonObject { .. })
        ));
    }

    #[test]
    fn truncated_reply_does_not_yield_an_inner_object() {
        let content = r#"Sure! {"net_sales": 500, "meta": {"a": 1}, "net_income": 5"#;
        match recover_json_object(content).unwrap_err() {
            LlmError::NoJsonObject { raw } => assert_eq!(raw, content),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn balanced_but_invalid_json_keeps_the_block() {
        match recover_json_object("x {net_sales: 5} y").unwrap_err() {
            LlmError::InvalidJson { raw, .. } => assert_eq!(raw, "{net_sales: 5}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn lenient_fields_accept_strings_and_numbers() {
        let fin: ModelFinancials = serde_json::from_str(
            r#"{"fiscal_year_label": 2023, "net_sales": "$383,285", "operating_income": "(1,200)",
                "net_income": "n/a", "ebitda": 12.5, "currency": "USD", "units_note": "", "extra": true}"#,
        )
        .unwrap();
        assert_eq!(fin.fiscal_year_label.as_deref(), Some("2023"));
        assert_eq!(fin.net_sales, Some(383_285.0));
        assert_eq!(fin.operating_income, Some(-1_200.0));
        assert_eq!(fin.net_income, None);
        assert_eq!(fin.ebitda, Some(12.5));
        assert_eq!(fin.currency.as_deref(), Some("USD"));
        assert_eq!(fin.units_note, None);
    }

    #[test]
    fn model_values_carry_model_provenance() {
        let fin = ModelFinancials {
            net_sales: Some(10.0),
            ..Default::default()
        }
        .into_financials();
        assert_eq!(fin.net_sales.as_ref().unwrap().source, Provenance::Model);
        assert!(fin.net_income.is_none());
    }
}

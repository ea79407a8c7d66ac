// src/xbrl/facts.rs
//! In-memory view of the SEC `companyfacts` payload.
//!
//! Payload shape: `{facts: {namespace: {concept: {units: {unit: [fact, ...]}}}}}`
//! Example: https://data.sec.gov/api/xbrl/companyfacts/CIK0000320193.json

use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyFactsPayload {
    #[serde(default)]
    pub entity_name: String,
    #[serde(default)]
    pub facts: HashMap<String, HashMap<String, RawConcept>>,
}

#[derive(Debug, Deserialize)]
pub struct RawConcept {
    /// Unit buckets in payload order; ties between units go to the one listed first.
    #[serde(default, deserialize_with = "units_in_payload_order")]
    pub units: Vec<(String, Vec<RawFact>)>,
}

fn units_in_payload_order<'de, D>(deserializer: D) -> Result<Vec<(String, Vec<RawFact>)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct UnitsVisitor;

    impl<'de> Visitor<'de> for UnitsVisitor {
        type Value = Vec<(String, Vec<RawFact>)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of unit name to fact list")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut units = Vec::with_capacity(map.size_hint().unwrap_or(1));
            while let Some((unit, facts)) = map.next_entry::<String, Vec<RawFact>>()? {
                units.push((unit, facts));
            }
            Ok(units)
        }
    }

    deserializer.deserialize_map(UnitsVisitor)
}

#[derive(Debug, Deserialize)]
pub struct RawFact {
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub val: Option<Value>,
    #[serde(default)]
    pub accn: Option<String>,
    #[serde(default)]
    pub fy: Option<i32>,
    #[serde(default)]
    pub fp: Option<String>,
    #[serde(default)]
    pub form: Option<String>,
    #[serde(default)]
    pub filed: Option<String>,
}

/// One reported observation for a concept, flattened out of its unit bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct Fact {
    pub concept: String,
    pub namespace: String,
    /// `None` when the payload value is missing or not a finite number.
    pub value: Option<f64>,
    pub unit: String,
    pub period_end: String,
    pub period_start: Option<String>,
    pub form: Option<String>,
    pub fiscal_period: Option<String>,
    pub fiscal_year: Option<i32>,
    pub filed: Option<String>,
    pub accession: Option<String>,
}

impl Fact {
    /// 10-K, 10-K/A, 10-KT, 10-K405 ...
    pub fn is_annual_form(&self) -> bool {
        self.form.as_deref().is_some_and(|f| f.contains("10-K"))
    }

    /// Full-year fiscal period, or no period tag at all.
    pub fn is_full_year(&self) -> bool {
        matches!(self.fiscal_period.as_deref(), None | Some("FY") | Some("Y"))
    }
}

/// All facts of one company, grouped by namespace and concept.
#[derive(Debug, Default)]
pub struct FactStore {
    entity_name: String,
    concepts: HashMap<String, HashMap<String, Vec<Fact>>>,
}

impl FactStore {
    pub fn from_payload(payload: CompanyFactsPayload) -> Self {
        let mut concepts: HashMap<String, HashMap<String, Vec<Fact>>> = HashMap::new();

        for (namespace, namespace_facts) in payload.facts {
            let by_concept = concepts.entry(namespace.clone()).or_default();
            for (concept, raw) in namespace_facts {
                let flat = flatten_units(&namespace, &concept, raw);
                by_concept.insert(concept, flat);
            }
        }

        let store = Self {
            entity_name: payload.entity_name,
            concepts,
        };
        tracing::debug!("Loaded {} facts for {}", store.len(), store.entity_name);
        store
    }

    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    /// Every fact tagged with `concept` in `namespace`, across all units.
    pub fn concept(&self, namespace: &str, concept: &str) -> &[Fact] {
        self.concepts
            .get(namespace)
            .and_then(|by_concept| by_concept.get(concept))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.concepts
            .values()
            .flat_map(|by_concept| by_concept.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn flatten_units(namespace: &str, concept: &str, raw: RawConcept) -> Vec<Fact> {
    raw.units
        .into_iter()
        .flat_map(|(unit, facts)| {
            facts.into_iter().map(move |f| Fact {
                concept: concept.to_string(),
                namespace: namespace.to_string(),
                value: f.val.as_ref().and_then(numeric_value),
                unit: unit.clone(),
                period_end: f.end.unwrap_or_default(),
                period_start: f.start,
                form: f.form,
                fiscal_period: f.fp,
                fiscal_year: f.fy,
                filed: f.filed,
                accession: f.accn,
            })
        })
        .collect()
}

fn numeric_value(val: &Value) -> Option<f64> {
    let parsed = match val {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "cik": 320193,
        "entityName": "Apple Inc.",
        "facts": {
            "dei": {
                "EntityCommonStockSharesOutstanding": {
                    "units": {"shares": [{"end": "2023-10-20", "val": 15552752000, "form": "10-K", "filed": "2023-11-03"}]}
                }
            },
            "us-gaap": {
                "Revenues": {
                    "label": "Revenues",
                    "units": {
                        "USD": [
                            {"start": "2022-09-25", "end": "2023-09-30", "val": 383285000000, "accn": "0000320193-23-000106",
                             "fy": 2023, "fp": "FY", "form": "10-K", "filed": "2023-11-03", "frame": "CY2023"},
                            {"end": "2023-07-01", "val": "81797000000", "fy": 2023, "fp": "Q3", "form": "10-Q", "filed": "2023-08-04"}
                        ],
                        "EUR": [
                            {"end": "2023-09-30", "val": null, "form": "10-K", "filed": "2023-11-03"}
                        ]
                    }
                }
            }
        }
    }"#;

    fn store() -> FactStore {
        FactStore::from_payload(serde_json::from_str(PAYLOAD).unwrap())
    }

    #[test]
    fn flattens_every_unit_into_one_list() {
        let store = store();
        let facts = store.concept("us-gaap", "Revenues");
        assert_eq!(facts.len(), 3);
        // Units keep payload order: USD is listed before EUR.
        assert_eq!(facts[0].unit, "USD");
        assert_eq!(facts[1].unit, "USD");
        assert_eq!(facts[2].unit, "EUR");
        assert_eq!(facts[0].value, Some(383_285_000_000.0));
        assert_eq!(facts[0].period_start.as_deref(), Some("2022-09-25"));
        assert_eq!(facts[0].accession.as_deref(), Some("0000320193-23-000106"));
        assert_eq!(facts[0].fiscal_year, Some(2023));
        assert_eq!(store.entity_name(), "Apple Inc.");
        assert_eq!(store.len(), 4);
        assert!(!store.is_empty());
        assert!(FactStore::default().is_empty());
    }

    #[test]
    fn numeric_strings_parse_and_nulls_do_not() {
        let store = store();
        let facts = store.concept("us-gaap", "Revenues");
        assert_eq!(facts[2].value, None);
        assert_eq!(facts[1].value, Some(81_797_000_000.0));
        assert_eq!(numeric_value(&Value::String("NaN".into())), None);
    }

    #[test]
    fn unit_order_is_not_alphabetical() {
        let payload: CompanyFactsPayload = serde_json::from_str(
            r#"{"facts": {"us-gaap": {"NetIncomeLoss": {"units": {
                "USD": [{"end": "2023-12-31", "val": 100, "form": "10-K", "filed": "2024-02-01"}],
                "CNY": [{"end": "2023-12-31", "val": 700, "form": "10-K", "filed": "2024-02-01"}]
            }}}}}"#,
        )
        .unwrap();
        let store = FactStore::from_payload(payload);
        let units: Vec<&str> = store
            .concept("us-gaap", "NetIncomeLoss")
            .iter()
            .map(|f| f.unit.as_str())
            .collect();
        assert_eq!(units, ["USD", "CNY"]);
    }

    #[test]
    fn unknown_concepts_are_empty() {
        let store = store();
        assert!(store.concept("us-gaap", "GrossProfit").is_empty());
        assert!(store.concept("ifrs-full", "Revenue").is_empty());
    }

    #[test]
    fn form_and_period_predicates() {
        let store = store();
        let facts = store.concept("us-gaap", "Revenues");
        assert!(facts[0].is_annual_form() && facts[0].is_full_year());
        assert!(!facts[1].is_annual_form() && !facts[1].is_full_year());
        // No fp tag counts as full year.
        assert!(facts[2].is_full_year());
    }
}

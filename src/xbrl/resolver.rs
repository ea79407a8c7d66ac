// src/xbrl/resolver.rs
//! Picks the single value to report for a line item.
//!
//! Concept names are tried in preference order. For each one the facts are run
//! through progressively looser stages until a stage admits something, and the
//! most recently filed survivor wins (so amendments beat original filings).
//! A concept whose chosen fact has no usable value hands over to the next name.

use crate::edgar::models::year_of;
use crate::xbrl::facts::{Fact, FactStore};

pub const US_GAAP: &str = "us-gaap";

/// Which period-end constraint a stage applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PeriodFilter {
    /// period end == target
    Exact,
    /// unconstrained
    Any,
    /// period end falls in the target's calendar year
    SameYear,
}

#[derive(Debug, Clone, Copy)]
pub struct Stage {
    pub label: &'static str,
    period: PeriodFilter,
    annual_form: bool,
    full_year: bool,
}

static STAGES: [Stage; 5] = [
    Stage { label: "A: target period, annual form, full year", period: PeriodFilter::Exact, annual_form: true, full_year: true },
    Stage { label: "B: target period, annual form", period: PeriodFilter::Exact, annual_form: true, full_year: false },
    Stage { label: "C: any period, annual form, full year", period: PeriodFilter::Any, annual_form: true, full_year: true },
    Stage { label: "D: any period, annual form", period: PeriodFilter::Any, annual_form: true, full_year: false },
    // Ignores form and fiscal period entirely: same-year data beats no data.
    Stage { label: "E: same calendar year, any form", period: PeriodFilter::SameYear, annual_form: false, full_year: false },
];

/// Target period end, with its year pre-parsed for stage E.
#[derive(Debug, Clone, Copy)]
struct Target<'a> {
    end: &'a str,
    year: Option<i32>,
}

impl Stage {
    fn admits(&self, fact: &Fact, target: Option<Target<'_>>) -> bool {
        let period_ok = match (self.period, target) {
            (PeriodFilter::Any, _) => true,
            (PeriodFilter::Exact, Some(t)) => fact.period_end == t.end,
            (PeriodFilter::SameYear, Some(t)) => {
                t.year.is_some() && year_of(&fact.period_end) == t.year
            }
            // Target-bound stages are skipped without a target.
            (_, None) => false,
        };
        period_ok
            && (!self.annual_form || fact.is_annual_form())
            && (!self.full_year || fact.is_full_year())
    }
}

/// A resolved line item: its value, the concept that supplied it, and how.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub value: f64,
    pub concept: String,
    pub unit: String,
    pub stage: &'static str,
    pub filed: Option<String>,
}

/// Resolves the first concept in `candidates` that yields a usable value for
/// `target_end` (a `YYYY-MM-DD` period end). `None` means unavailable.
pub fn resolve(store: &FactStore, candidates: &[&str], target_end: Option<&str>) -> Option<Resolution> {
    let target = target_end.map(|end| Target {
        end,
        year: year_of(end),
    });

    for &concept in candidates {
        let facts = store.concept(US_GAAP, concept);
        if facts.is_empty() {
            continue;
        }

        let Some((stage, chosen)) = select_fact(facts, target) else {
            tracing::trace!("{}: {} facts, none admitted by any stage", concept, facts.len());
            continue;
        };

        match chosen.value {
            Some(value) => {
                tracing::debug!(
                    "{} = {} {} (stage {}, filed {:?}, end {})",
                    concept, value, chosen.unit, stage.label, chosen.filed, chosen.period_end
                );
                return Some(Resolution {
                    value,
                    concept: concept.to_string(),
                    unit: chosen.unit.clone(),
                    stage: stage.label,
                    filed: chosen.filed.clone(),
                });
            }
            None => {
                tracing::debug!("{}: chosen fact has no usable value, trying next concept", concept);
            }
        }
    }

    None
}

/// First stage that admits anything, and the latest-filed fact it admits.
fn select_fact<'a>(facts: &'a [Fact], target: Option<Target<'_>>) -> Option<(&'static Stage, &'a Fact)> {
    STAGES.iter().find_map(|stage| {
        most_recently_filed(facts.iter().filter(|f| stage.admits(f, target))).map(|f| (stage, f))
    })
}

// Missing filed dates sort lowest; ties keep the first fact seen.
fn most_recently_filed<'a>(facts: impl Iterator<Item = &'a Fact>) -> Option<&'a Fact> {
    facts.fold(None::<&'a Fact>, |best, f| match best {
        Some(b) if b.filed.as_deref().unwrap_or("") >= f.filed.as_deref().unwrap_or("") => Some(b),
        _ => Some(f),
    })
}

//! Additive stat totals keyed by kind. BTreeMap keeps iteration order stable so
//! summaries and serialized output are deterministic.

use std::collections::BTreeMap;

use crate::model::StatKind;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatTotals {
    totals: BTreeMap<StatKind, f64>,
}

impl StatTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: StatKind, value: f64) {
        *self.totals.entry(kind).or_default() += value;
    }

    pub fn add_many<I>(&mut self, contributions: I)
    where
        I: IntoIterator<Item = (StatKind, f64)>,
    {
        for (kind, value) in contributions {
            self.add(kind, value);
        }
    }

    /// Total for a kind; kinds with no contribution read as zero.
    pub fn get(&self, kind: StatKind) -> f64 {
        self.totals.get(&kind).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKind, f64)> + '_ {
        self.totals.iter().map(|(kind, value)| (*kind, *value))
    }
}

impl FromIterator<(StatKind, f64)> for StatTotals {
    fn from_iter<I: IntoIterator<Item = (StatKind, f64)>>(iter: I) -> Self {
        let mut totals = Self::new();
        totals.add_many(iter);
        totals
    }
}

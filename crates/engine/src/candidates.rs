//! Mechanism grouping and candidate enumeration.

use pestmix_catalog::ProductRecord;
use std::collections::{BTreeMap, BTreeSet};

/// Products sharing one exact mechanism signature
#[derive(Debug, Clone)]
pub struct MechanismGroup<'a> {
    /// Raw mechanism code shared by every record, e.g. `"3+7"`
    pub signature: &'a str,

    /// Member records, sorted
    pub records: Vec<&'a ProductRecord>,

    /// Distinct trade names in the group
    pub trade_names: BTreeSet<&'a str>,

    /// Every pest or disease some member is registered for
    pub covered: BTreeSet<&'a str>,
}

impl<'a> MechanismGroup<'a> {
    fn new(signature: &'a str) -> Self {
        Self {
            signature,
            records: Vec::new(),
            trade_names: BTreeSet::new(),
            covered: BTreeSet::new(),
        }
    }

    fn push(&mut self, record: &'a ProductRecord) {
        self.trade_names.insert(record.trade_name.as_str());
        if let Some(target) = record.target() {
            self.covered.insert(target);
        }
        self.records.push(record);
    }

    /// Record whose formulation, ingredient and date stand for the group
    #[must_use]
    pub fn representative(&self) -> Option<&'a ProductRecord> {
        self.records.first().copied()
    }

    /// Whether every requested pest is covered by this group alone
    #[must_use]
    pub fn covers_all(&self, pests: &BTreeSet<String>) -> bool {
        pests.iter().all(|p| self.covered.contains(p.as_str()))
    }

    /// Whether at least one requested pest is covered
    #[must_use]
    pub fn covers_any(&self, pests: &BTreeSet<String>) -> bool {
        pests.iter().any(|p| self.covered.contains(p.as_str()))
    }

    /// Requested pests this group covers, sorted
    #[must_use]
    pub fn covered_of(&self, pests: &BTreeSet<String>) -> Vec<String> {
        pests
            .iter()
            .filter(|p| self.covered.contains(p.as_str()))
            .cloned()
            .collect()
    }

    /// Whether any member's trade name is in `owned`
    #[must_use]
    pub fn owned_by(&self, owned: &BTreeSet<String>) -> bool {
        self.trade_names.iter().any(|name| owned.contains(*name))
    }
}

/// Group records by raw mechanism signature.
///
/// Groups come back in lexicographic signature order, and records within a
/// group are sorted, so input order never shows in the output.
pub fn group_by_signature<'a, I>(records: I) -> Vec<MechanismGroup<'a>>
where
    I: IntoIterator<Item = &'a ProductRecord>,
{
    let mut groups: BTreeMap<&'a str, MechanismGroup<'a>> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.mechanism.as_str())
            .or_insert_with(|| MechanismGroup::new(record.mechanism.as_str()))
            .push(record);
    }

    groups
        .into_values()
        .map(|mut group| {
            group.records.sort();
            group
        })
        .collect()
}

/// Index-based candidate over a slice of groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate {
    Single(usize),
    Pair(usize, usize),
}

/// Every single candidate, then every unordered pair `(i, j)` with `i < j`.
pub fn enumerate(group_count: usize) -> impl Iterator<Item = Candidate> {
    let singles = (0..group_count).map(Candidate::Single);
    let pairs = (0..group_count)
        .flat_map(move |i| (i + 1..group_count).map(move |j| Candidate::Pair(i, j)));
    singles.chain(pairs)
}

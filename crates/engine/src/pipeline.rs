//! Constraint filters.
//!
//! Stages 1-3 narrow the product pool before grouping; the acceptance checks
//! judge generated candidates. Rejection is never an error, a rejected
//! candidate is simply left out.

use crate::candidates::MechanismGroup;
use crate::query::RecommendQuery;
use pestmix_catalog::{mechanism, MechanismIndex, ProductCatalog, ProductRecord};
use std::collections::BTreeSet;

/// Why a candidate was left out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// Single group does not cover every requested pest
    Uncovered,
    /// Two groups share a mechanism base family
    SameFamily,
    /// Two groups contain a forbidden mechanism pair
    Forbidden,
    /// One member of a pair covers none of the requested pests
    DeadWeight,
    /// Ownership preference given but no member is owned
    NotOwned,
}

/// Stage 1: exact crop match and a registered target
pub fn scope_to_crop<'a>(
    catalog: &'a ProductCatalog,
    crop: &'a str,
) -> impl Iterator<Item = &'a ProductRecord> + 'a {
    catalog.for_crop(crop).filter(|r| r.target().is_some())
}

/// Stage 2: keep a record only if none of its atoms was already used
#[must_use]
pub fn excludes_used(record: &ProductRecord, excluded: &BTreeSet<String>) -> bool {
    record.atoms().all(|atom| !excluded.contains(atom))
}

/// Stage 3: categories seen among records that target a requested pest
#[must_use]
pub fn relevant_categories<'a>(
    records: &[&'a ProductRecord],
    pests: &BTreeSet<String>,
) -> BTreeSet<&'a str> {
    records
        .iter()
        .copied()
        .filter(|r| r.target().is_some_and(|t| pests.contains(t)))
        .filter_map(|r| r.category.as_deref())
        .collect()
}

/// Run stages 1-3 and return the surviving pool
pub fn narrow<'a>(catalog: &'a ProductCatalog, query: &'a RecommendQuery) -> Vec<&'a ProductRecord> {
    let scoped: Vec<&ProductRecord> = scope_to_crop(catalog, &query.crop).collect();
    let scoped_count = scoped.len();

    let unused: Vec<&ProductRecord> = scoped
        .into_iter()
        .filter(|r| excludes_used(r, &query.excluded_mechanisms))
        .collect();
    let unused_count = unused.len();

    let categories = relevant_categories(&unused, &query.target_pests);
    let pool: Vec<&ProductRecord> = unused
        .into_iter()
        .filter(|r| {
            r.category
                .as_deref()
                .is_some_and(|c| categories.contains(c))
        })
        .collect();

    log::debug!(
        "crop '{}': {scoped_count} scoped, {unused_count} after exclusion, {} after category filter {:?}",
        query.crop,
        pool.len(),
        categories
    );
    pool
}

/// Stage 5: single-candidate acceptance
#[must_use]
pub fn check_single(group: &MechanismGroup<'_>, query: &RecommendQuery) -> Option<Rejection> {
    if !group.covers_all(&query.target_pests) {
        return Some(Rejection::Uncovered);
    }
    if query.has_ownership_preference() && !group.owned_by(&query.owned_products) {
        return Some(Rejection::NotOwned);
    }
    None
}

/// Stage 6: pair-candidate acceptance, checks in order a-e
#[must_use]
pub fn check_pair(
    first: &MechanismGroup<'_>,
    second: &MechanismGroup<'_>,
    query: &RecommendQuery,
    mechanisms: &MechanismIndex,
) -> Option<Rejection> {
    if shares_family(first.signature, second.signature) {
        return Some(Rejection::SameFamily);
    }
    if mechanisms.is_forbidden_combination(first.signature, second.signature) {
        return Some(Rejection::Forbidden);
    }
    let pests = &query.target_pests;
    if !first.covers_any(pests) || !second.covers_any(pests) {
        return Some(Rejection::DeadWeight);
    }
    let covered = pests
        .iter()
        .all(|p| first.covered.contains(p.as_str()) || second.covered.contains(p.as_str()));
    if !covered {
        return Some(Rejection::Uncovered);
    }
    let owned = &query.owned_products;
    if query.has_ownership_preference() && !first.owned_by(owned) && !second.owned_by(owned) {
        return Some(Rejection::NotOwned);
    }
    None
}

/// Whether any atom of `left` shares a non-empty base family with any atom of `right`
#[must_use]
pub fn shares_family(left: &str, right: &str) -> bool {
    mechanism::atoms(left)
        .any(|a| mechanism::atoms(right).any(|b| mechanism::same_family(a, b)))
}

use crate::candidates::MechanismGroup;
use pestmix_catalog::{mechanism, MechanismIndex, MechanismMetadata, ProductRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Separator between per-atom metadata values of a composite mechanism
pub const METADATA_SEPARATOR: &str = " + ";

/// Separator between trade names in the display string
pub const NAME_SEPARATOR: &str = ", ";

/// Mechanism metadata merged across the atoms of a signature
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MechanismSummary {
    pub name: String,
    pub mode_of_action: String,
    pub site_of_action: String,
    pub ingredient: String,
}

impl MechanismSummary {
    /// Merge metadata of every atom of `signature`, in written order.
    ///
    /// Atoms without metadata and empty fields are skipped; a signature with
    /// no known atom yields empty strings.
    pub fn merge(signature: &str, index: &MechanismIndex) -> Self {
        let mut seen = BTreeSet::new();
        let found: Vec<&MechanismMetadata> = mechanism::atoms(signature)
            .filter(|atom| seen.insert(*atom))
            .filter_map(|atom| index.lookup(atom))
            .collect();

        let join = |field: fn(&MechanismMetadata) -> &str| {
            found
                .iter()
                .map(|m| field(*m).trim())
                .filter(|v| !v.is_empty())
                .collect::<Vec<_>>()
                .join(METADATA_SEPARATOR)
        };

        Self {
            name: join(|m| m.name.as_str()),
            mode_of_action: join(|m| m.mode_of_action.as_str()),
            site_of_action: join(|m| m.site_of_action.as_str()),
            ingredient: join(|m| m.ingredient.as_str()),
        }
    }
}

/// One product group inside a recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecommendation {
    /// Distinct trade names, sorted
    pub trade_names: Vec<String>,

    /// Trade names joined for display
    pub product: String,

    /// Mechanism signature shared by the group
    pub mechanism: String,

    pub metadata: MechanismSummary,

    /// Formulation of the representative record
    pub formulation: String,

    /// Item name of the representative record
    pub ingredient: String,

    /// Registration date of the representative record
    pub registered_on: String,

    /// Requested pests this group covers, sorted
    pub covered_pests: Vec<String>,
}

impl GroupRecommendation {
    pub fn build(
        group: &MechanismGroup<'_>,
        pests: &BTreeSet<String>,
        index: &MechanismIndex,
    ) -> Self {
        let trade_names: Vec<String> = group.trade_names.iter().map(|s| s.to_string()).collect();
        let representative = group.representative();
        let field = |get: fn(&ProductRecord) -> &str| {
            representative.map(get).unwrap_or_default().to_string()
        };

        Self {
            product: trade_names.join(NAME_SEPARATOR),
            trade_names,
            mechanism: group.signature.to_string(),
            metadata: MechanismSummary::merge(group.signature, index),
            formulation: field(|r| r.formulation.as_str()),
            ingredient: field(|r| r.ingredient.as_str()),
            registered_on: field(|r| r.registered_on.as_str()),
            covered_pests: group.covered_of(pests),
        }
    }
}

/// A single product group or an ordered pair of groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecommendationEntry {
    pub groups: Vec<GroupRecommendation>,
}

impl RecommendationEntry {
    pub fn single(group: GroupRecommendation) -> Self {
        Self {
            groups: vec![group],
        }
    }

    pub fn pair(first: GroupRecommendation, second: GroupRecommendation) -> Self {
        Self {
            groups: vec![first, second],
        }
    }

    #[must_use]
    pub fn is_pair(&self) -> bool {
        self.groups.len() == 2
    }

    /// Mechanism signatures in entry order
    pub fn mechanisms(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.mechanism.as_str())
    }
}

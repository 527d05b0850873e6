use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One recommendation request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendQuery {
    /// Crop name, matched exactly
    pub crop: String,

    /// Pests and diseases every recommendation must cover
    pub target_pests: BTreeSet<String>,

    /// Atomic mechanism codes already used this season
    pub excluded_mechanisms: BTreeSet<String>,

    /// Trade names on hand; empty means no ownership preference
    pub owned_products: BTreeSet<String>,
}

impl RecommendQuery {
    pub fn new(crop: impl Into<String>) -> Self {
        Self {
            crop: crop.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn pests<I, S>(mut self, pests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_pests.extend(pests.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn excluding<I, S>(mut self, mechanisms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_mechanisms
            .extend(mechanisms.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn owning<I, S>(mut self, products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.owned_products.extend(products.into_iter().map(Into::into));
        self
    }

    /// Whether an ownership preference was given
    #[must_use]
    pub fn has_ownership_preference(&self) -> bool {
        !self.owned_products.is_empty()
    }
}

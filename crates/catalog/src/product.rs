use crate::mechanism;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One registered product-mechanism entry
///
/// A trade name may appear many times, once per (mechanism, target) it is
/// registered for.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Trade name as sold
    pub trade_name: String,

    /// Crop the registration applies to
    pub crop: String,

    /// Pest or disease the registration covers, if any
    pub target: Option<String>,

    /// Mechanism code, possibly composite (`"3+7"`)
    pub mechanism: String,

    /// Product class (fungicide, insecticide, ...)
    pub category: Option<String>,

    /// Formulation type
    pub formulation: String,

    /// Registration date as written in the source
    pub registered_on: String,

    /// Item (active ingredient) name
    pub ingredient: String,
}

impl ProductRecord {
    /// Minimal record; optional fields left empty
    pub fn new(
        trade_name: impl Into<String>,
        crop: impl Into<String>,
        target: impl Into<String>,
        mechanism: impl Into<String>,
    ) -> Self {
        let target = target.into();
        Self {
            trade_name: trade_name.into(),
            crop: crop.into(),
            target: (!target.is_empty()).then_some(target),
            mechanism: mechanism.into(),
            category: None,
            formulation: String::new(),
            registered_on: String::new(),
            ingredient: String::new(),
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_formulation(mut self, formulation: impl Into<String>) -> Self {
        self.formulation = formulation.into();
        self
    }

    #[must_use]
    pub fn with_ingredient(mut self, ingredient: impl Into<String>) -> Self {
        self.ingredient = ingredient.into();
        self
    }

    #[must_use]
    pub fn with_registered_on(mut self, registered_on: impl Into<String>) -> Self {
        self.registered_on = registered_on.into();
        self
    }

    /// Target name when present and non-empty
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref().filter(|t| !t.is_empty())
    }

    /// Atomic codes of this record's mechanism
    pub fn atoms(&self) -> impl Iterator<Item = &str> + Clone {
        mechanism::atoms(&self.mechanism)
    }
}

/// In-memory product collection
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    records: Vec<ProductRecord>,
}

impl ProductCatalog {
    pub fn new(records: Vec<ProductRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    /// Records registered for exactly this crop
    pub fn for_crop<'a>(&'a self, crop: &'a str) -> impl Iterator<Item = &'a ProductRecord> + 'a {
        self.records.iter().filter(move |r| r.crop == crop)
    }

    #[must_use]
    pub fn has_crop(&self, crop: &str) -> bool {
        self.records.iter().any(|r| r.crop == crop)
    }

    /// Sorted distinct crop names
    #[must_use]
    pub fn crops(&self) -> Vec<String> {
        sorted_distinct(self.records.iter().map(|r| r.crop.as_str()))
    }

    /// Sorted distinct pests and diseases registered for `crop`
    #[must_use]
    pub fn pests_for(&self, crop: &str) -> Vec<String> {
        sorted_distinct(self.for_crop(crop).filter_map(ProductRecord::target))
    }

    /// Sorted distinct atomic mechanism codes across every product
    #[must_use]
    pub fn mechanisms(&self) -> Vec<String> {
        sorted_distinct(self.records.iter().flat_map(ProductRecord::atoms))
    }

    /// Sorted distinct trade names
    #[must_use]
    pub fn trade_names(&self) -> Vec<String> {
        sorted_distinct(self.records.iter().map(|r| r.trade_name.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn sorted_distinct<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    items
        .filter(|s| !s.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

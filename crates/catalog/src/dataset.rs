use crate::config::LoaderConfig;
use crate::error::Result;
use crate::loader;
use crate::metadata::MechanismIndex;
use crate::product::{ProductCatalog, ProductRecord};
use crate::{ForbiddenPairSet, MechanismMetadata};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Locations of the three spreadsheet exports
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    pub products: PathBuf,
    pub mechanisms: PathBuf,
    pub compatibility: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            products: PathBuf::from("data/products.csv"),
            mechanisms: PathBuf::from("data/mechanisms.csv"),
            compatibility: PathBuf::from("data/compatibility.csv"),
        }
    }
}

/// Everything a recommendation needs, loaded once and never mutated
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub products: ProductCatalog,
    pub mechanisms: MechanismIndex,
}

impl Dataset {
    pub fn new(
        products: Vec<ProductRecord>,
        metadata: HashMap<String, MechanismMetadata>,
        forbidden: ForbiddenPairSet,
    ) -> Self {
        Self {
            products: ProductCatalog::new(products),
            mechanisms: MechanismIndex::new(metadata, forbidden),
        }
    }

    /// Load all three exports. Fails on the first unreadable source.
    pub fn load(paths: &DataPaths, config: &LoaderConfig) -> Result<Self> {
        config.validate()?;

        let products = loader::load_products_from_path(&paths.products, config)?;
        let metadata = loader::load_mechanisms_from_path(&paths.mechanisms, config)?;
        let forbidden =
            loader::load_forbidden_pairs_from_path(&paths.compatibility, &config.forbidden_marker)?;

        let dataset = Self::new(products, metadata, forbidden);
        dataset.report_unknown_mechanisms();
        Ok(dataset)
    }

    /// Log mechanism codes that products use but metadata lacks
    fn report_unknown_mechanisms(&self) {
        let missing: Vec<String> = self
            .products
            .mechanisms()
            .into_iter()
            .filter(|code| self.mechanisms.lookup(code).is_none())
            .collect();
        if !missing.is_empty() {
            log::warn!(
                "{} mechanism codes have no metadata: {}",
                missing.len(),
                missing.join(", ")
            );
        }
    }
}

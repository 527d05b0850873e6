//! # Pestmix Catalog
//!
//! The immutable dataset behind pesticide recommendations: registered products,
//! mechanism-of-action metadata and the table of mechanism pairs that must never
//! be mixed.
//!
//! ## Architecture
//!
//! ```text
//! CSV exports (products, mechanisms, compatibility table)
//!     │
//!     ├──> Loaders (column mapping, lenient/strict validation)
//!     │
//!     ├──> ProductCatalog
//!     │      ├─ crop / pest / mechanism / trade-name listings
//!     │      └─ crop-scoped record iteration
//!     │
//!     └──> MechanismIndex
//!            ├─ atomic code → MechanismMetadata
//!            └─ ForbiddenPairSet (symmetric relation)
//! ```
//!
//! Everything is built once and then shared read-only; nothing in this crate
//! mutates a loaded [`Dataset`].
//!
//! ## Example
//!
//! ```rust
//! use pestmix_catalog::{mechanism, ForbiddenPairSet};
//!
//! assert_eq!(mechanism::base_family("7A"), "7");
//!
//! let mut forbidden = ForbiddenPairSet::new();
//! forbidden.insert("M3", "4");
//! assert!(forbidden.contains("4", "M3"));
//! ```

mod config;
mod dataset;
mod error;
mod forbidden;
mod loader;
pub mod mechanism;
mod metadata;
mod product;

pub use config::{LoaderConfig, MechanismColumns, ProductColumns};
pub use dataset::{DataPaths, Dataset};
pub use error::{CatalogError, Result};
pub use forbidden::ForbiddenPairSet;
pub use loader::{
    load_forbidden_pairs, load_forbidden_pairs_from_path, load_mechanisms,
    load_mechanisms_from_path, load_products, load_products_from_path,
};
pub use metadata::{MechanismIndex, MechanismMetadata};
pub use product::{ProductCatalog, ProductRecord};

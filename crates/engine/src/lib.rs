//! # Pestmix Engine
//!
//! Recommends single products and two-product combinations for a crop and a
//! set of target pests, honoring resistance management (already-used
//! mechanisms), forbidden mechanism pairings and an optional preference for
//! products already owned.
//!
//! ## Pipeline
//!
//! ```text
//! ProductCatalog
//!     │
//!     ├──> narrow: crop + target present → unused mechanisms → relevant categories
//!     │
//!     ├──> group_by_signature (lexicographic signature order)
//!     │
//!     ├──> enumerate: singles, then pairs (i < j)
//!     │
//!     ├──> check_single / check_pair
//!     │      ├─ coverage, dead-weight partner
//!     │      ├─ same base family, forbidden pair
//!     │      └─ ownership preference
//!     │
//!     └──> GroupRecommendation::build → RecommendationEntry[]
//! ```
//!
//! The computation is synchronous and side-effect free; a [`Dataset`] can be
//! shared across threads and queried concurrently.
//!
//! [`Dataset`]: pestmix_catalog::Dataset

mod builder;
mod candidates;
mod engine;
mod pipeline;
mod query;

pub use builder::{
    GroupRecommendation, MechanismSummary, RecommendationEntry, METADATA_SEPARATOR, NAME_SEPARATOR,
};
pub use candidates::{enumerate, group_by_signature, Candidate, MechanismGroup};
pub use engine::{recommend, Recommender};
pub use pipeline::{check_pair, check_single, narrow, shares_family, Rejection};
pub use query::RecommendQuery;

use crate::forbidden::ForbiddenPairSet;
use crate::mechanism;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Descriptive info for one atomic mechanism code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MechanismMetadata {
    /// Display name of the mechanism group
    pub name: String,

    /// How the mechanism acts on the target organism
    pub mode_of_action: String,

    /// Biochemical site the mechanism acts on
    pub site_of_action: String,

    /// Example active ingredient for this mechanism
    pub ingredient: String,
}

/// Lookup from atomic mechanism code to metadata, plus the forbidden pairs
#[derive(Debug, Clone, Default)]
pub struct MechanismIndex {
    metadata: HashMap<String, MechanismMetadata>,
    forbidden: ForbiddenPairSet,
}

impl MechanismIndex {
    pub fn new(metadata: HashMap<String, MechanismMetadata>, forbidden: ForbiddenPairSet) -> Self {
        Self {
            metadata,
            forbidden,
        }
    }

    /// Metadata for an atomic code. Composite codes are not keys.
    #[must_use]
    pub fn lookup(&self, atomic: &str) -> Option<&MechanismMetadata> {
        self.metadata.get(atomic)
    }

    /// True iff `{a, b}` was marked incompatible
    #[must_use]
    pub fn is_forbidden_pair(&self, a: &str, b: &str) -> bool {
        self.forbidden.contains(a, b)
    }

    /// Whether any atom of `left` is forbidden with any atom of `right`
    #[must_use]
    pub fn is_forbidden_combination(&self, left: &str, right: &str) -> bool {
        self.forbidden
            .any_between(mechanism::atoms(left), mechanism::atoms(right))
    }

    pub fn forbidden(&self) -> &ForbiddenPairSet {
        &self.forbidden
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.metadata.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }
}

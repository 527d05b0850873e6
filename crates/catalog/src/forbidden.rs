use std::collections::BTreeSet;

/// Unordered pairs of atomic mechanism codes that must never be combined.
///
/// Pairs are stored with their members sorted, so membership is symmetric.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForbiddenPairSet {
    pairs: BTreeSet<(String, String)>,
    known: BTreeSet<String>,
}

impl ForbiddenPairSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `{a, b}` as forbidden. Both codes become known.
    pub fn insert(&mut self, a: &str, b: &str) -> bool {
        self.register(a);
        self.register(b);
        self.pairs.insert(ordered(a, b))
    }

    /// Add a code to the universe of codes the table talks about.
    pub fn register(&mut self, code: &str) {
        self.known.insert(code.to_string());
    }

    /// True iff the unordered pair `{a, b}` is forbidden
    #[must_use]
    pub fn contains(&self, a: &str, b: &str) -> bool {
        self.pairs.contains(&ordered(a, b))
    }

    /// True when any atom of `left` is forbidden with any atom of `right`
    pub fn any_between<'a, L, R>(&self, left: L, right: R) -> bool
    where
        L: IntoIterator<Item = &'a str>,
        R: IntoIterator<Item = &'a str> + Clone,
    {
        left.into_iter()
            .any(|a| right.clone().into_iter().any(|b| self.contains(a, b)))
    }

    /// Whether the code appeared as a row or column header
    #[must_use]
    pub fn knows(&self, code: &str) -> bool {
        self.known.contains(code)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn ordered(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn membership_is_symmetric() {
        let mut set = ForbiddenPairSet::new();
        assert!(set.insert("4A", "M3"));
        assert!(!set.insert("M3", "4A"));

        assert_eq!(set.len(), 1);
        assert!(set.contains("4A", "M3"));
        assert!(set.contains("M3", "4A"));
        assert!(!set.contains("4A", "4A"));
        assert!(!set.contains("M3", "4B"));
    }

    #[test]
    fn prefix_codes_are_not_confused() {
        let mut set = ForbiddenPairSet::new();
        set.insert("1", "22");
        assert!(!set.contains("1", "2"));
        assert!(!set.contains("11", "22"));
    }

    #[test]
    fn any_between_checks_cross_product() {
        let mut set = ForbiddenPairSet::new();
        set.insert("3", "M5");
        let left = ["1A", "3"];
        let right = ["M5"];
        assert!(set.any_between(left, right));
        assert!(!set.any_between(["1A"], right));
    }

    #[test]
    fn registered_codes_are_known_without_pairs() {
        let mut set = ForbiddenPairSet::new();
        set.register("7");
        set.register("7");
        assert!(set.knows("7"));
        assert!(!set.knows("8"));
        assert!(set.is_empty());
    }

    proptest! {
        #[test]
        fn proptest_insert_then_contains_either_order(a in "[0-9A-Z]{1,3}", b in "[0-9A-Z]{1,3}") {
            let mut set = ForbiddenPairSet::new();
            set.insert(&a, &b);
            prop_assert!(set.contains(&a, &b));
            prop_assert!(set.contains(&b, &a));
        }
    }
}

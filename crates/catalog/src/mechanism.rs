//! Mechanism code parsing.
//!
//! A product's mechanism code is either atomic (`"1A"`, `"M3"`) or a
//! composite of atomic codes joined with `+` (`"3 + 7"`). Parsing is
//! permissive: nothing here can fail, malformed fragments are kept as
//! literal atomic codes.

use std::collections::BTreeSet;

/// Delimiter between atomic codes in a composite mechanism code
pub const COMPOSITE_DELIMITER: char = '+';

/// Split a possibly composite code into its atomic codes.
///
/// Parts are trimmed and empty parts dropped, so `""` and `" + "` both yield
/// an empty set.
#[must_use]
pub fn split(code: &str) -> BTreeSet<String> {
    atoms(code).map(str::to_string).collect()
}

/// Iterate the atomic codes of `code` in their written order.
pub fn atoms(code: &str) -> impl Iterator<Item = &str> + Clone {
    code.split(COMPOSITE_DELIMITER)
        .map(str::trim)
        .filter(|part| !part.is_empty())
}

/// Numeric family of an atomic code: every non-digit character stripped.
///
/// `"7A"` → `"7"`, `"M3"` → `"3"`, `"UN"` → `""`.
#[must_use]
pub fn base_family(atomic: &str) -> String {
    atomic.chars().filter(char::is_ascii_digit).collect()
}

/// True when both codes have the same non-empty base family.
#[must_use]
pub fn same_family(a: &str, b: &str) -> bool {
    let family = base_family(a);
    !family.is_empty() && family == base_family(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn splits_composite_codes_and_trims() {
        assert_eq!(split("3 + 7"), set(&["3", "7"]));
        assert_eq!(split("1A"), set(&["1A"]));
    }

    #[test]
    fn empty_and_stray_delimiters_are_tolerated() {
        assert!(split("").is_empty());
        assert!(split("   ").is_empty());
        assert_eq!(split("+4A+"), set(&["4A"]));
        assert_eq!(split("4A ++ 4A"), set(&["4A"]));
    }

    #[test]
    fn base_family_strips_letters() {
        assert_eq!(base_family("7A"), "7");
        assert_eq!(base_family("M3"), "3");
        assert_eq!(base_family("11"), "11");
        assert_eq!(base_family("UN"), "");
    }

    #[test]
    fn letter_only_codes_never_share_a_family() {
        assert!(!same_family("UN", "BM"));
        assert!(!same_family("UN", "UN"));
        assert!(same_family("1A", "1B"));
        assert!(!same_family("1A", "2A"));
    }

    proptest! {
        #[test]
        fn proptest_split_never_yields_blank_atoms(code in "[ 0-9A-Z+]{0,24}") {
            for atom in split(&code) {
                prop_assert!(!atom.is_empty());
                prop_assert_eq!(atom.trim(), atom.as_str());
                prop_assert!(!atom.contains(COMPOSITE_DELIMITER));
            }
        }

        #[test]
        fn proptest_base_family_is_digits_only(code in "[0-9A-Za-z]{0,8}") {
            prop_assert!(base_family(&code).chars().all(|c| c.is_ascii_digit()));
        }
    }
}

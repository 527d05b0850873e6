use pestmix_catalog::{Dataset, ForbiddenPairSet, MechanismMetadata, ProductRecord};
use pestmix_engine::{recommend, RecommendQuery};
use pretty_assertions::assert_eq;
use std::collections::HashMap;

fn insecticide(name: &str, target: &str, mechanism: &str) -> ProductRecord {
    ProductRecord::new(name, "Tomato", target, mechanism)
        .with_category("insecticide")
        .with_formulation("EC")
}

fn dataset(records: Vec<ProductRecord>, forbidden: ForbiddenPairSet) -> Dataset {
    let mut metadata = HashMap::new();
    metadata.insert(
        "1A".to_string(),
        MechanismMetadata {
            name: "Carbamates".to_string(),
            mode_of_action: "AChE inhibitor".to_string(),
            site_of_action: "nerve".to_string(),
            ingredient: "carbaryl".to_string(),
        },
    );
    Dataset::new(records, metadata, forbidden)
}

fn two_pest_dataset(beta_mechanism: &str, forbidden: ForbiddenPairSet) -> Dataset {
    dataset(
        vec![
            insecticide("Alpha", "Aphid", "1A"),
            insecticide("Beta", "Mite", beta_mechanism),
        ],
        forbidden,
    )
}

fn summary(entries: &[pestmix_engine::RecommendationEntry]) -> Vec<Vec<(String, String)>> {
    entries
        .iter()
        .map(|e| {
            e.groups
                .iter()
                .map(|g| (g.product.clone(), g.mechanism.clone()))
                .collect()
        })
        .collect()
}

fn pair(a: (&str, &str), b: (&str, &str)) -> Vec<(String, String)> {
    vec![
        (a.0.to_string(), a.1.to_string()),
        (b.0.to_string(), b.1.to_string()),
    ]
}

#[test]
fn single_product_covering_the_only_pest() {
    let dataset = dataset(vec![insecticide("Alpha", "Aphid", "1A")], ForbiddenPairSet::new());
    let query = RecommendQuery::new("Tomato").pests(["Aphid"]);

    let result = recommend(&dataset, &query);

    assert_eq!(result.len(), 1);
    let group = &result[0].groups[0];
    assert_eq!(group.product, "Alpha");
    assert_eq!(group.mechanism, "1A");
    assert_eq!(group.metadata.name, "Carbamates");
    assert_eq!(group.covered_pests, vec!["Aphid".to_string()]);
}

#[test]
fn excluded_mechanism_removes_product_before_grouping() {
    let dataset = dataset(vec![insecticide("Alpha", "Aphid", "1A")], ForbiddenPairSet::new());
    let query = RecommendQuery::new("Tomato")
        .pests(["Aphid"])
        .excluding(["1A"]);

    assert!(recommend(&dataset, &query).is_empty());
}

#[test]
fn two_products_pair_up_to_cover_two_pests() {
    let dataset = two_pest_dataset("2B", ForbiddenPairSet::new());
    let query = RecommendQuery::new("Tomato").pests(["Aphid", "Mite"]);

    let result = recommend(&dataset, &query);

    assert_eq!(summary(&result), vec![pair(("Alpha", "1A"), ("Beta", "2B"))]);
    assert!(result[0].is_pair());
    assert_eq!(result[0].groups[1].metadata.name, "", "missing metadata degrades to empty");
}

#[test]
fn same_base_family_pair_is_rejected() {
    let dataset = two_pest_dataset("1B", ForbiddenPairSet::new());
    let query = RecommendQuery::new("Tomato").pests(["Aphid", "Mite"]);

    assert!(recommend(&dataset, &query).is_empty());
}

#[test]
fn forbidden_pair_is_rejected() {
    let mut forbidden = ForbiddenPairSet::new();
    forbidden.insert("2B", "1A");
    let dataset = two_pest_dataset("2B", forbidden);
    let query = RecommendQuery::new("Tomato").pests(["Aphid", "Mite"]);

    assert!(recommend(&dataset, &query).is_empty());
}

#[test]
fn unmet_ownership_preference_rejects_pair() {
    let dataset = two_pest_dataset("2B", ForbiddenPairSet::new());
    let query = RecommendQuery::new("Tomato")
        .pests(["Aphid", "Mite"])
        .owning(["Gamma"]);

    assert!(recommend(&dataset, &query).is_empty());
}

#[test]
fn one_owned_member_is_enough_for_a_pair() {
    let dataset = two_pest_dataset("2B", ForbiddenPairSet::new());
    let query = RecommendQuery::new("Tomato")
        .pests(["Aphid", "Mite"])
        .owning(["Beta"]);

    assert_eq!(recommend(&dataset, &query).len(), 1);
}

#[test]
fn unknown_crop_yields_empty_result() {
    let dataset = two_pest_dataset("2B", ForbiddenPairSet::new());
    let query = RecommendQuery::new("tomato").pests(["Aphid"]);

    assert!(recommend(&dataset, &query).is_empty());
}

#[test]
fn singles_come_before_pairs_in_signature_order() {
    let dataset = dataset(
        vec![
            insecticide("Zed", "Aphid", "9"),
            insecticide("Zed", "Mite", "9"),
            insecticide("Alpha", "Aphid", "1A"),
            insecticide("Beta", "Mite", "2B"),
            insecticide("Combo", "Aphid", "3+4A"),
            insecticide("Combo", "Mite", "3+4A"),
        ],
        ForbiddenPairSet::new(),
    );
    let query = RecommendQuery::new("Tomato").pests(["Aphid", "Mite"]);

    let result = recommend(&dataset, &query);
    let mechanisms: Vec<Vec<&str>> = result.iter().map(|e| e.mechanisms().collect()).collect();

    assert_eq!(
        mechanisms,
        vec![
            vec!["3+4A"],
            vec!["9"],
            vec!["1A", "2B"],
            vec!["1A", "3+4A"],
            vec!["1A", "9"],
            vec!["2B", "3+4A"],
            vec!["2B", "9"],
            vec!["3+4A", "9"],
        ]
    );
}

#[test]
fn composite_mechanism_with_used_atom_is_excluded() {
    let dataset = dataset(
        vec![
            insecticide("Combo", "Aphid", "3+4A"),
            insecticide("Solo", "Aphid", "6"),
        ],
        ForbiddenPairSet::new(),
    );
    let query = RecommendQuery::new("Tomato")
        .pests(["Aphid"])
        .excluding(["4A"]);

    let result = recommend(&dataset, &query);
    assert_eq!(summary(&result), vec![vec![("Solo".to_string(), "6".to_string())]]);
}

#[test]
fn cross_category_products_stay_out() {
    let dataset = dataset(
        vec![
            insecticide("Alpha", "Aphid", "1A"),
            ProductRecord::new("Fungo", "Tomato", "Mildew", "M3").with_category("fungicide"),
        ],
        ForbiddenPairSet::new(),
    );
    let query = RecommendQuery::new("Tomato").pests(["Aphid"]);

    let result = recommend(&dataset, &query);
    assert_eq!(summary(&result), vec![vec![("Alpha".to_string(), "1A".to_string())]]);
}

#[test]
fn products_sharing_a_signature_merge_into_one_group() {
    let dataset = dataset(
        vec![
            insecticide("Beta", "Aphid", "1A"),
            insecticide("Alpha", "Aphid", "1A"),
            insecticide("Alpha", "Mite", "1A"),
        ],
        ForbiddenPairSet::new(),
    );
    let query = RecommendQuery::new("Tomato").pests(["Aphid"]);

    let result = recommend(&dataset, &query);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].groups[0].product, "Alpha, Beta");
    assert_eq!(result[0].groups[0].trade_names, vec!["Alpha", "Beta"]);
}

#[test]
fn dead_weight_partner_is_rejected_even_if_union_covers() {
    let dataset = dataset(
        vec![
            insecticide("Both", "Aphid", "1A"),
            insecticide("Both", "Mite", "1A"),
            insecticide("Other", "Thrips", "5"),
        ],
        ForbiddenPairSet::new(),
    );
    let query = RecommendQuery::new("Tomato").pests(["Aphid", "Mite"]);

    let result = recommend(&dataset, &query);
    assert_eq!(summary(&result), vec![vec![("Both".to_string(), "1A".to_string())]]);
}

use anyhow::Result;
use pestmix_engine::{GroupRecommendation, RecommendQuery, RecommendationEntry};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const API_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
    pub hint: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            hint: None,
        }
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Body of `POST /recommend`
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema)]
pub struct RecommendRequest {
    pub crop: String,
    #[serde(default)]
    pub pests_or_diseases: Vec<String>,
    #[serde(default)]
    pub used_mechanisms: Vec<String>,
    #[serde(default)]
    pub owned_products: Vec<String>,
}

impl RecommendRequest {
    /// Duplicates collapse; blank entries are dropped
    pub fn to_query(&self) -> RecommendQuery {
        RecommendQuery::new(self.crop.clone())
            .pests(non_blank(&self.pests_or_diseases))
            .excluding(non_blank(&self.used_mechanisms))
            .owning(non_blank(&self.owned_products))
    }
}

fn non_blank(items: &[String]) -> impl Iterator<Item = &str> {
    items.iter().map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// One product group of a recommendation, as sent over the wire
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct RecommendedProduct {
    /// Trade names joined for display
    pub product: String,
    pub products: Vec<String>,
    pub mechanism: String,
    pub ingredient: String,
    /// Registration date
    pub date: String,
    /// Formulation type
    #[serde(rename = "type")]
    pub formulation: String,
    /// Mechanism display name
    pub explanation: String,
    pub mode_of_action: String,
    pub site_of_action: String,
    pub representative_ingredient: String,
    pub covered_pests: Vec<String>,
}

impl From<&GroupRecommendation> for RecommendedProduct {
    fn from(group: &GroupRecommendation) -> Self {
        Self {
            product: group.product.clone(),
            products: group.trade_names.clone(),
            mechanism: group.mechanism.clone(),
            ingredient: group.ingredient.clone(),
            date: group.registered_on.clone(),
            formulation: group.formulation.clone(),
            explanation: group.metadata.name.clone(),
            mode_of_action: group.metadata.mode_of_action.clone(),
            site_of_action: group.metadata.site_of_action.clone(),
            representative_ingredient: group.metadata.ingredient.clone(),
            covered_pests: group.covered_pests.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema)]
pub struct RecommendResponse {
    pub recommendations: Vec<Vec<RecommendedProduct>>,
}

impl From<&[RecommendationEntry]> for RecommendResponse {
    fn from(entries: &[RecommendationEntry]) -> Self {
        Self {
            recommendations: entries
                .iter()
                .map(|entry| entry.groups.iter().map(RecommendedProduct::from).collect())
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, JsonSchema)]
pub struct CropsResponse {
    pub crops: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, JsonSchema)]
pub struct PestsResponse {
    pub pests: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, JsonSchema)]
pub struct MechanismsResponse {
    pub mechanisms: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, JsonSchema)]
pub struct ProductsResponse {
    pub products: Vec<String>,
}

/// Query string of `GET /pests`
#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct PestsQuery {
    pub crop: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct HealthReport {
    pub schema_version: u32,
    pub status: String,
    pub products: usize,
    pub crops: usize,
    pub mechanisms: usize,
    pub forbidden_pairs: usize,
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pestmix_engine::MechanismSummary;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_lists_default_to_empty() {
        let request: RecommendRequest =
            serde_json::from_str(r#"{"crop":"Tomato","pests_or_diseases":["Aphid"]}"#)
                .expect("parse");
        let query = request.to_query();
        assert_eq!(query.crop, "Tomato");
        assert!(query.excluded_mechanisms.is_empty());
        assert!(!query.has_ownership_preference());
    }

    #[test]
    fn blank_owned_entries_do_not_enable_ownership() {
        let request = RecommendRequest {
            crop: "Tomato".to_string(),
            owned_products: vec!["  ".to_string(), String::new()],
            ..Default::default()
        };
        assert!(!request.to_query().has_ownership_preference());
    }

    #[test]
    fn request_schema_names_wire_fields() {
        let schema = serde_json::to_value(schemars::schema_for!(RecommendRequest)).expect("schema");
        let properties = &schema["properties"];
        for field in ["crop", "pests_or_diseases", "used_mechanisms", "owned_products"] {
            assert!(properties.get(field).is_some(), "missing {field}");
        }
        assert_eq!(schema["required"], serde_json::json!(["crop"]));
    }

    #[test]
    fn group_serializes_with_wire_names() {
        let group = GroupRecommendation {
            trade_names: vec!["Alpha".to_string()],
            product: "Alpha".to_string(),
            mechanism: "1A".to_string(),
            metadata: MechanismSummary {
                name: "Carbamates".to_string(),
                ..Default::default()
            },
            formulation: "EC".to_string(),
            ingredient: "carbaryl".to_string(),
            registered_on: "2021-03-01".to_string(),
            covered_pests: vec!["Aphid".to_string()],
        };
        let entries = vec![RecommendationEntry::single(group)];
        let response = RecommendResponse::from(entries.as_slice());

        let value = serde_json::to_value(&response).expect("json");
        let first = &value["recommendations"][0][0];
        assert_eq!(first["type"], "EC");
        assert_eq!(first["date"], "2021-03-01");
        assert_eq!(first["explanation"], "Carbamates");
        assert_eq!(first["product"], "Alpha");
    }
}

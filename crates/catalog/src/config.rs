use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for dataset loading
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Reject rows and headers with missing values instead of skipping them
    pub strict: bool,

    /// Cell value marking an incompatible pair (compared case-insensitively)
    pub forbidden_marker: String,

    /// Header names in the product export
    pub product_columns: ProductColumns,

    /// Header names in the mechanism metadata export
    pub mechanism_columns: MechanismColumns,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            strict: false,
            forbidden_marker: "X".to_string(),
            product_columns: ProductColumns::default(),
            mechanism_columns: MechanismColumns::default(),
        }
    }
}

impl LoaderConfig {
    /// Column names of the Korean pesticide registry exports.
    ///
    /// The registry sheets carry no site-of-action column, so that field is
    /// left unmapped and reads as empty.
    pub fn korean() -> Self {
        Self {
            product_columns: ProductColumns {
                trade_name: "상표명".to_string(),
                crop: "작물명".to_string(),
                target: "적용병해충".to_string(),
                mechanism: "작용기작".to_string(),
                category: "구분".to_string(),
                formulation: "제형".to_string(),
                registered_on: "등록일".to_string(),
                ingredient: "품목명".to_string(),
            },
            mechanism_columns: MechanismColumns {
                code: "작용기작".to_string(),
                name: "기작명".to_string(),
                mode_of_action: "해충에 대한 작용 원리".to_string(),
                site_of_action: None,
                ingredient: "대표성분".to_string(),
            },
            ..Default::default()
        }
    }

    /// Same mapping, strict validation
    pub fn strict(self) -> Self {
        Self {
            strict: true,
            ..self
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.forbidden_marker.trim().is_empty() {
            return Err(CatalogError::invalid_config(
                "forbidden_marker must not be empty",
            ));
        }

        let p = &self.product_columns;
        let m = &self.mechanism_columns;
        let named = [
            ("product_columns.trade_name", &p.trade_name),
            ("product_columns.crop", &p.crop),
            ("product_columns.target", &p.target),
            ("product_columns.mechanism", &p.mechanism),
            ("product_columns.category", &p.category),
            ("product_columns.formulation", &p.formulation),
            ("product_columns.registered_on", &p.registered_on),
            ("product_columns.ingredient", &p.ingredient),
            ("mechanism_columns.code", &m.code),
            ("mechanism_columns.name", &m.name),
            ("mechanism_columns.mode_of_action", &m.mode_of_action),
            ("mechanism_columns.ingredient", &m.ingredient),
        ];
        let site = m
            .site_of_action
            .as_ref()
            .map(|column| ("mechanism_columns.site_of_action", column));
        for (key, value) in named.into_iter().chain(site) {
            if value.trim().is_empty() {
                return Err(CatalogError::invalid_config(format!(
                    "{key} must not be empty"
                )));
            }
        }

        Ok(())
    }
}

/// Header names of the product export
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductColumns {
    pub trade_name: String,
    pub crop: String,
    pub target: String,
    pub mechanism: String,
    pub category: String,
    pub formulation: String,
    pub registered_on: String,
    pub ingredient: String,
}

impl Default for ProductColumns {
    fn default() -> Self {
        Self {
            trade_name: "trade_name".to_string(),
            crop: "crop".to_string(),
            target: "target".to_string(),
            mechanism: "mechanism".to_string(),
            category: "category".to_string(),
            formulation: "formulation".to_string(),
            registered_on: "registered_on".to_string(),
            ingredient: "ingredient".to_string(),
        }
    }
}

/// Header names of the mechanism metadata export
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MechanismColumns {
    pub code: String,
    pub name: String,
    pub mode_of_action: String,
    /// `None` when the export has no such column
    pub site_of_action: Option<String>,
    pub ingredient: String,
}

impl Default for MechanismColumns {
    fn default() -> Self {
        Self {
            code: "code".to_string(),
            name: "name".to_string(),
            mode_of_action: "mode_of_action".to_string(),
            site_of_action: Some("site_of_action".to_string()),
            ingredient: "ingredient".to_string(),
        }
    }
}

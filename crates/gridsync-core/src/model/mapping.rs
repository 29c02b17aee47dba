// ── EA mapping rules ──
//
// Declarative tag → extended-attribute rules, loaded from a JSON document
// at runtime. Rules are data, not code: the engine in `crate::mapping`
// interprets them in declared order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Case transform applied to a resolved tag value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Transform {
    #[default]
    None,
    Uppercase,
    Lowercase,
    Titlecase,
}

impl Transform {
    /// Apply the transform to a value.
    pub fn apply(self, value: &str) -> String {
        match self {
            Self::None => value.into(),
            Self::Uppercase => value.to_uppercase(),
            Self::Lowercase => value.to_lowercase(),
            Self::Titlecase => titlecase(value),
        }
    }
}

/// Uppercase the first letter of each whitespace-separated word, lowercase
/// the rest. `PROD east` becomes `Prod East`.
fn titlecase(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extended-attribute value type, matching the grid's EA definition
/// vocabulary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum EaType {
    #[default]
    String,
    Integer,
    Enum,
    Email,
    Url,
    Date,
}

/// One declarative mapping rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EaMappingRule {
    /// Tag key to read from the canonical record.
    pub source_tag: String,
    /// Extended-attribute name to write. Later rules targeting the same
    /// attribute overwrite earlier ones.
    #[serde(alias = "target_ea")]
    pub target_attribute: String,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub ea_type: EaType,
    /// Used when `source_tag` is absent, and as the ENUM fallback.
    #[serde(default)]
    pub default_value: Option<String>,
    /// Allowed values; enforced only when `ea_type` is ENUM.
    #[serde(default)]
    pub list_values: Vec<String>,
    /// Whether the apply step should provision the EA definition on the
    /// grid if it does not exist. An output flag -- the mapping engine
    /// itself never talks to the grid.
    #[serde(default = "default_create_if_missing")]
    pub create_if_missing: bool,
}

fn default_create_if_missing() -> bool {
    true
}

impl EaMappingRule {
    /// A plain pass-through rule: tag copied to an attribute of the same
    /// name, STRING type, no transform.
    pub fn passthrough(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        Self {
            source_tag: tag.clone(),
            target_attribute: tag,
            transform: Transform::None,
            ea_type: EaType::String,
            default_value: None,
            list_values: Vec::new(),
            create_if_missing: true,
        }
    }
}

/// The on-disk mapping document: `{ "description": ..., "mappings": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingDocument {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub mappings: Vec<EaMappingRule>,
}

/// A non-fatal issue raised while applying one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingWarning {
    /// The attribute the offending rule targets.
    pub attribute: String,
    pub message: String,
}

impl std::fmt::Display for MappingWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.attribute, self.message)
    }
}

/// Output of the mapping engine for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingResult {
    pub extended_attributes: IndexMap<String, String>,
    pub warnings: Vec<MappingWarning>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn transform_casing() {
        assert_eq!(Transform::None.apply("MiXeD"), "MiXeD");
        assert_eq!(Transform::Uppercase.apply("prod"), "PROD");
        assert_eq!(Transform::Lowercase.apply("PROD"), "prod");
        assert_eq!(Transform::Titlecase.apply("data center WEST"), "Data Center West");
    }

    #[test]
    fn rule_deserializes_with_defaults() {
        let rule: EaMappingRule = serde_json::from_str(
            r#"{"source_tag": "Env", "target_attribute": "Environment"}"#,
        )
        .unwrap();
        assert_eq!(rule.transform, Transform::None);
        assert_eq!(rule.ea_type, EaType::String);
        assert!(rule.create_if_missing);
        assert!(rule.list_values.is_empty());
    }

    #[test]
    fn rule_accepts_target_ea_alias() {
        let rule: EaMappingRule =
            serde_json::from_str(r#"{"source_tag": "Env", "target_ea": "Environment"}"#).unwrap();
        assert_eq!(rule.target_attribute, "Environment");
    }

    #[test]
    fn ea_type_uses_grid_vocabulary() {
        let t: EaType = serde_json::from_str(r#""ENUM""#).unwrap();
        assert_eq!(t, EaType::Enum);
        assert_eq!(EaType::String.to_string(), "STRING");
    }

    #[test]
    fn document_tolerates_missing_description() {
        let doc: MappingDocument = serde_json::from_str(r#"{"mappings": []}"#).unwrap();
        assert!(doc.description.is_empty());
        assert!(doc.mappings.is_empty());
    }
}

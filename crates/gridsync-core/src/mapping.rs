//! The EA mapping engine: declarative tag → extended-attribute rules.
//!
//! Mapping never fails a record -- at worst it yields warnings. That
//! property keeps the "always produce a preview" guarantee intact even
//! with a malformed mapping document: callers fall back to
//! [`identity_rules`] (an empty set, which copies tags verbatim).

use std::path::Path;

use tracing::warn;

use crate::error::CoreError;
use crate::model::{
    CanonicalNetwork, EaMappingRule, EaType, MappingDocument, MappingResult, MappingWarning,
};

/// Apply a rule set to one record, in declared order.
///
/// Per rule: resolve `tags[source_tag]` (falling back to the rule's
/// default, else skipping silently), apply the case transform, validate
/// ENUM values, and write the target attribute. Later rules targeting the
/// same attribute overwrite earlier ones. An empty rule set is the
/// identity: tags copied to attributes unchanged.
pub fn apply(network: &CanonicalNetwork, rules: &[EaMappingRule]) -> MappingResult {
    if rules.is_empty() {
        return MappingResult {
            extended_attributes: network.tags.clone(),
            warnings: Vec::new(),
        };
    }

    let mut result = MappingResult::default();
    for rule in rules {
        let resolved = network
            .tags
            .get(&rule.source_tag)
            .cloned()
            .or_else(|| rule.default_value.clone());
        let Some(raw) = resolved else {
            // Tag absent and no default: omit the attribute entirely.
            continue;
        };

        let mut value = rule.transform.apply(&raw);

        if rule.ea_type == EaType::Enum
            && !rule.list_values.is_empty()
            && !rule.list_values.contains(&value)
        {
            match &rule.default_value {
                Some(default) => {
                    result.warnings.push(MappingWarning {
                        attribute: rule.target_attribute.clone(),
                        message: format!(
                            "{value:?} is not an allowed value, substituted default {default:?}"
                        ),
                    });
                    value = default.clone();
                }
                None => {
                    result.warnings.push(MappingWarning {
                        attribute: rule.target_attribute.clone(),
                        message: format!(
                            "{value:?} is not an allowed value (allowed: {:?})",
                            rule.list_values
                        ),
                    });
                }
            }
        }

        result
            .extended_attributes
            .insert(rule.target_attribute.clone(), value);
    }

    result
}

/// The identity rule set: no rules, so [`apply`] copies tags verbatim.
pub fn identity_rules() -> Vec<EaMappingRule> {
    Vec::new()
}

/// Load and shape-validate a mapping document.
///
/// Structurally malformed documents fail eagerly here; semantically odd
/// but legal rules do not. Callers that want the always-preview guarantee
/// use [`load_rules_or_identity`] instead.
pub fn load_document(path: &Path) -> Result<MappingDocument, CoreError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CoreError::MappingDocument {
        message: e.to_string(),
    })
}

/// Load a mapping document, degrading to the identity pass-through when
/// the file is absent or malformed. Never a hard failure.
pub fn load_rules_or_identity(path: Option<&Path>) -> Vec<EaMappingRule> {
    let Some(path) = path else {
        return identity_rules();
    };
    match load_document(path) {
        Ok(document) => document.mappings,
        Err(error) => {
            warn!(path = %path.display(), %error, "mapping document unusable, tags pass through unchanged");
            identity_rules()
        }
    }
}

//! Preview assembly: shaping reconciliation output for callers.
//!
//! The CLI renders an [`ImportPreview`] as tables; `--output json` and
//! any web consumer serialize it whole. Row errors and mapping warnings
//! travel alongside successful classifications in the same structure --
//! never as a separate failure path.

use serde::{Deserialize, Serialize};

use crate::model::{EaMappingRule, PreviewResult, RowError, SourceKind};

/// Per-bucket counts for the summary table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub new: usize,
    pub updated: usize,
    pub overlapping: usize,
    pub unchanged: usize,
    pub errors: usize,
    pub total: usize,
}

impl Summary {
    pub fn of(preview: &PreviewResult) -> Self {
        Self {
            new: preview.new_networks.len(),
            updated: preview.updated_networks.len(),
            overlapping: preview.overlapping_networks.len(),
            unchanged: preview.unchanged_networks.len(),
            errors: preview.errors.len(),
            total: preview.total(),
        }
    }
}

/// Everything one preview run produced, ready for rendering or applying.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportPreview {
    pub source: SourceKind,
    pub network_view: String,
    pub summary: Summary,
    pub preview: PreviewResult,
    /// The rule set used, kept so the apply step can provision EA
    /// definitions with the right types.
    pub rules: Vec<EaMappingRule>,
}

/// Merge reconciliation output with the parse stage's row errors and
/// compute the summary. The invariant "every input row is in exactly one
/// bucket" holds by construction: parse errors fill `errors`, everything
/// else was classified.
pub fn assemble(
    mut preview: PreviewResult,
    parse_outcome_errors: Vec<RowError>,
    source: SourceKind,
    network_view: String,
    rules: Vec<EaMappingRule>,
) -> ImportPreview {
    preview.errors = parse_outcome_errors;
    ImportPreview {
        source,
        network_view,
        summary: Summary::of(&preview),
        preview,
        rules,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{CanonicalNetwork, MappingResult};
    use crate::reconcile::reconcile;

    #[test]
    fn summary_counts_match_buckets_and_errors() {
        let candidates = vec![
            (
                CanonicalNetwork::new("10.0.0.0/24".parse().unwrap(), "default", SourceKind::Custom),
                MappingResult::default(),
            ),
            (
                CanonicalNetwork::new("10.1.0.0/24".parse().unwrap(), "default", SourceKind::Custom),
                MappingResult::default(),
            ),
        ];
        let reconciled = reconcile(candidates, &[], "default");
        let errors = vec![RowError {
            row_index: 2,
            raw_value: "bogus".into(),
            message: "invalid CIDR address".into(),
        }];

        let assembled = assemble(reconciled, errors, SourceKind::Custom, "default".into(), Vec::new());

        assert_eq!(assembled.summary.new, 2);
        assert_eq!(assembled.summary.errors, 1);
        assert_eq!(assembled.summary.total, 3);
        assert_eq!(assembled.preview.total(), 3);
    }

    #[test]
    fn preview_serializes_for_structured_output() {
        let assembled = assemble(
            PreviewResult::default(),
            Vec::new(),
            SourceKind::Aws,
            "default".into(),
            Vec::new(),
        );
        let json = serde_json::to_string(&assembled).unwrap();
        assert!(json.contains(r#""source":"aws""#));
        assert!(json.contains(r#""new_networks":[]"#));
    }
}

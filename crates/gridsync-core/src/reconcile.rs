//! The reconciliation/diff engine.
//!
//! A pure function of its inputs: candidates on one side, the grid's
//! existing-network snapshot on the other. No network calls, no clock,
//! no side effects -- identical inputs produce byte-identical output, so
//! a preview re-derived at execute time agrees with itself.
//!
//! Classification per candidate, in input order:
//! - exact address match in the requested view → `Update` when the
//!   attribute delta is non-empty, else `Skip` ("no changes"). An exact
//!   match is never treated as an overlap.
//! - otherwise, the first existing in-view range that intersects the
//!   candidate (snapshot order, deterministic tie-break) → `Skip`
//!   ("overlaps with ...").
//! - otherwise → `Create`.

use std::collections::HashMap;

use indexmap::IndexMap;
use ipnet::IpNet;

use crate::cidr;
use crate::model::{
    Action, CanonicalNetwork, ExistingNetwork, MappingResult, PreviewResult, ReconciliationItem,
};

/// Pseudo-attribute key used to carry comment changes in the delta.
pub const COMMENT_KEY: &str = "comment";

/// Classify every candidate against the snapshot for one view.
///
/// Snapshot entries outside `view` are ignored entirely; candidates are
/// assumed to target `view`. Row errors from parsing are attached later
/// by the preview assembler -- this engine raises no errors of its own.
pub fn reconcile(
    candidates: Vec<(CanonicalNetwork, MappingResult)>,
    existing: &[ExistingNetwork],
    view: &str,
) -> PreviewResult {
    let in_view: Vec<&ExistingNetwork> = existing
        .iter()
        .filter(|entry| entry.network_view == view)
        .collect();

    // First occurrence wins, matching the snapshot's own iteration order.
    let mut by_address: HashMap<IpNet, &ExistingNetwork> = HashMap::new();
    for entry in &in_view {
        by_address.entry(entry.address).or_insert(*entry);
    }

    let mut preview = PreviewResult::default();

    for (network, mapping) in candidates {
        if let Some(entry) = by_address.get(&network.address) {
            let delta = attribute_delta(&network, &mapping, entry);
            if delta.is_empty() {
                preview.unchanged_networks.push(ReconciliationItem {
                    network,
                    mapping,
                    action: Action::Skip,
                    reason: "no changes".into(),
                    attribute_delta: IndexMap::new(),
                    existing_reference: Some(entry.reference.clone()),
                    conflicts_with: None,
                });
            } else {
                preview.updated_networks.push(ReconciliationItem {
                    network,
                    mapping,
                    action: Action::Update,
                    reason: format!("{} attribute(s) differ", delta.len()),
                    attribute_delta: delta,
                    existing_reference: Some(entry.reference.clone()),
                    conflicts_with: None,
                });
            }
            continue;
        }

        // Not an exact match anywhere in the view; the first intersecting
        // range in snapshot order is the reported conflict.
        let conflict = in_view
            .iter()
            .find(|entry| cidr::overlaps(&entry.address, &network.address));
        if let Some(entry) = conflict {
            preview.overlapping_networks.push(ReconciliationItem {
                network,
                mapping,
                action: Action::Skip,
                reason: format!("overlaps with {}", entry.address),
                attribute_delta: IndexMap::new(),
                existing_reference: Some(entry.reference.clone()),
                conflicts_with: Some(entry.address),
            });
            continue;
        }

        preview.new_networks.push(ReconciliationItem {
            network,
            mapping,
            action: Action::Create,
            reason: "not present in view".into(),
            attribute_delta: IndexMap::new(),
            existing_reference: None,
            conflicts_with: None,
        });
    }

    preview
}

/// Changed keys only: candidate attributes that differ in value or are
/// absent from the existing entry, plus the comment pseudo-key.
///
/// Attributes present on the grid but absent from the candidate are NOT
/// deltas -- imports add and refresh metadata, they never strip it.
fn attribute_delta(
    network: &CanonicalNetwork,
    mapping: &MappingResult,
    existing: &ExistingNetwork,
) -> IndexMap<String, String> {
    let mut delta = IndexMap::new();

    for (key, value) in &mapping.extended_attributes {
        if existing.extended_attributes.get(key) != Some(value) {
            delta.insert(key.clone(), value.clone());
        }
    }

    if network.comment != existing.comment {
        delta.insert(COMMENT_KEY.into(), network.comment.clone());
    }

    delta
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::SourceKind;
    use pretty_assertions::assert_eq;

    fn candidate(address: &str) -> (CanonicalNetwork, MappingResult) {
        let network = CanonicalNetwork::new(
            address.parse().unwrap(),
            "default",
            SourceKind::Properties,
        );
        let mapping = MappingResult::default();
        (network, mapping)
    }

    fn candidate_with_attrs(
        address: &str,
        comment: &str,
        attrs: &[(&str, &str)],
    ) -> (CanonicalNetwork, MappingResult) {
        let (mut network, mut mapping) = candidate(address);
        network.comment = comment.into();
        mapping.extended_attributes = attrs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        (network, mapping)
    }

    fn existing(address: &str, view: &str, comment: &str, attrs: &[(&str, &str)]) -> ExistingNetwork {
        ExistingNetwork {
            address: address.parse().unwrap(),
            network_view: view.into(),
            comment: comment.into(),
            extended_attributes: attrs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            reference: format!("network/ref:{address}/{view}"),
        }
    }

    #[test]
    fn empty_grid_means_everything_creates() {
        let preview = reconcile(vec![candidate("10.0.0.0/16")], &[], "default");
        assert_eq!(preview.new_networks.len(), 1);
        assert_eq!(preview.new_networks[0].action, Action::Create);
        assert_eq!(preview.total(), 1);
    }

    #[test]
    fn identical_existing_network_skips_with_no_changes() {
        let snapshot = [existing("10.0.0.0/16", "default", "corp", &[("Env", "prod")])];
        let preview = reconcile(
            vec![candidate_with_attrs("10.0.0.0/16", "corp", &[("Env", "prod")])],
            &snapshot,
            "default",
        );

        assert_eq!(preview.unchanged_networks.len(), 1);
        let item = &preview.unchanged_networks[0];
        assert_eq!(item.action, Action::Skip);
        assert_eq!(item.reason, "no changes");
        assert!(item.attribute_delta.is_empty());
    }

    #[test]
    fn changed_attribute_flips_to_update_with_that_key_in_delta() {
        let snapshot = [existing("10.0.0.0/16", "default", "corp", &[("Env", "prod")])];
        let preview = reconcile(
            vec![candidate_with_attrs("10.0.0.0/16", "corp", &[("Env", "staging")])],
            &snapshot,
            "default",
        );

        assert_eq!(preview.updated_networks.len(), 1);
        let item = &preview.updated_networks[0];
        assert_eq!(item.action, Action::Update);
        assert_eq!(item.attribute_delta.get("Env").unwrap(), "staging");
        assert_eq!(item.attribute_delta.len(), 1);
        assert_eq!(
            item.existing_reference.as_deref(),
            Some("network/ref:10.0.0.0/16/default")
        );
    }

    #[test]
    fn attribute_missing_from_grid_is_a_delta() {
        let snapshot = [existing("10.0.0.0/16", "default", "corp", &[])];
        let preview = reconcile(
            vec![candidate_with_attrs("10.0.0.0/16", "corp", &[("Owner", "netops")])],
            &snapshot,
            "default",
        );
        assert_eq!(
            preview.updated_networks[0].attribute_delta.get("Owner").unwrap(),
            "netops"
        );
    }

    #[test]
    fn grid_only_attributes_are_not_deltas() {
        let snapshot = [existing(
            "10.0.0.0/16",
            "default",
            "corp",
            &[("Legacy", "keep-me"), ("Env", "prod")],
        )];
        let preview = reconcile(
            vec![candidate_with_attrs("10.0.0.0/16", "corp", &[("Env", "prod")])],
            &snapshot,
            "default",
        );
        assert_eq!(preview.unchanged_networks.len(), 1);
    }

    #[test]
    fn comment_change_rides_the_delta() {
        let snapshot = [existing("10.0.0.0/16", "default", "old comment", &[])];
        let preview = reconcile(
            vec![candidate_with_attrs("10.0.0.0/16", "new comment", &[])],
            &snapshot,
            "default",
        );
        assert_eq!(
            preview.updated_networks[0].attribute_delta.get(COMMENT_KEY).unwrap(),
            "new comment"
        );
    }

    #[test]
    fn subset_of_existing_range_is_an_overlap_skip() {
        let snapshot = [existing("10.0.0.0/16", "default", "", &[])];
        let preview = reconcile(vec![candidate("10.0.1.0/24")], &snapshot, "default");

        assert_eq!(preview.overlapping_networks.len(), 1);
        let item = &preview.overlapping_networks[0];
        assert_eq!(item.action, Action::Skip);
        assert_eq!(item.reason, "overlaps with 10.0.0.0/16");
        assert_eq!(item.conflicts_with.unwrap().to_string(), "10.0.0.0/16");
    }

    #[test]
    fn superset_of_existing_range_is_also_an_overlap() {
        let snapshot = [existing("10.0.1.0/24", "default", "", &[])];
        let preview = reconcile(vec![candidate("10.0.0.0/16")], &snapshot, "default");
        assert_eq!(preview.overlapping_networks.len(), 1);
    }

    #[test]
    fn exact_match_is_never_an_overlap_regardless_of_other_ranges() {
        // 10.0.0.0/16 exists AND a wider 10.0.0.0/8 covers it; the exact
        // match wins and classifies as unchanged, not overlapping.
        let snapshot = [
            existing("10.0.0.0/8", "default", "", &[]),
            existing("10.0.0.0/16", "default", "", &[]),
        ];
        let preview = reconcile(
            vec![candidate_with_attrs("10.0.0.0/16", "", &[])],
            &snapshot,
            "default",
        );

        assert!(preview.overlapping_networks.is_empty());
        assert_eq!(preview.unchanged_networks.len(), 1);
    }

    #[test]
    fn overlap_tie_break_reports_first_in_snapshot_order() {
        let snapshot = [
            existing("10.0.0.0/8", "default", "", &[]),
            existing("10.0.0.0/16", "default", "", &[]),
        ];
        let preview = reconcile(vec![candidate("10.0.5.0/24")], &snapshot, "default");
        assert_eq!(
            preview.overlapping_networks[0].reason,
            "overlaps with 10.0.0.0/8"
        );
    }

    #[test]
    fn entries_outside_the_view_are_invisible() {
        let snapshot = [
            existing("10.0.0.0/16", "lab", "", &[]),
            existing("10.0.1.0/24", "lab", "", &[]),
        ];
        let preview = reconcile(vec![candidate("10.0.0.0/16")], &snapshot, "default");
        assert_eq!(preview.new_networks.len(), 1);
    }

    #[test]
    fn duplicate_candidates_both_classify() {
        let preview = reconcile(
            vec![candidate("10.0.0.0/24"), candidate("10.0.0.0/24")],
            &[],
            "default",
        );
        assert_eq!(preview.new_networks.len(), 2);
    }

    #[test]
    fn determinism_byte_identical_output() {
        let snapshot = [
            existing("10.0.0.0/8", "default", "c", &[("Env", "prod")]),
            existing("192.168.0.0/16", "default", "", &[]),
        ];
        let candidates = || {
            vec![
                candidate_with_attrs("10.0.0.0/8", "c", &[("Env", "staging")]),
                candidate("10.1.0.0/24"),
                candidate("172.16.0.0/12"),
            ]
        };
        let a = reconcile(candidates(), &snapshot, "default");
        let b = reconcile(candidates(), &snapshot, "default");
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn every_candidate_lands_in_exactly_one_bucket() {
        let snapshot = [
            existing("10.0.0.0/16", "default", "", &[]),
            existing("172.16.0.0/12", "default", "", &[]),
        ];
        let preview = reconcile(
            vec![
                candidate_with_attrs("10.0.0.0/16", "", &[]), // unchanged
                candidate_with_attrs("10.0.0.0/16", "x", &[]), // update
                candidate("172.16.5.0/24"),                   // overlap
                candidate("192.168.0.0/24"),                  // create
            ],
            &snapshot,
            "default",
        );
        assert_eq!(preview.total(), 4);
        assert_eq!(preview.new_networks.len(), 1);
        assert_eq!(preview.updated_networks.len(), 1);
        assert_eq!(preview.overlapping_networks.len(), 1);
        assert_eq!(preview.unchanged_networks.len(), 1);
    }
}

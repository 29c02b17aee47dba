// ── Reconciliation output ──
//
// Every input row lands in exactly one of the four buckets below. The
// buckets keep input order, so previews are stable across identical runs.

use indexmap::IndexMap;
use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use strum::Display;

use super::mapping::MappingResult;
use super::network::CanonicalNetwork;

/// The decision for one accepted candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Action {
    Create,
    Update,
    Skip,
}

/// One row's recoverable failure: the row is excluded from the canonical
/// sequence but never from error accounting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// Zero-based data-row index (header row excluded).
    pub row_index: usize,
    /// The offending cell as it appeared in the file.
    pub raw_value: String,
    pub message: String,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}: {} ({:?})", self.row_index, self.message, self.raw_value)
    }
}

/// A classified candidate plus everything the apply step needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationItem {
    pub network: CanonicalNetwork,
    pub mapping: MappingResult,
    pub action: Action,
    pub reason: String,
    /// Changed keys only; `comment` rides along as a pseudo-key.
    pub attribute_delta: IndexMap<String, String>,
    /// Reference of the matching grid object (updates and no-change skips).
    pub existing_reference: Option<String>,
    /// The existing range this candidate collides with (overlap skips).
    pub conflicts_with: Option<IpNet>,
}

/// The complete classification of one import batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreviewResult {
    pub new_networks: Vec<ReconciliationItem>,
    pub updated_networks: Vec<ReconciliationItem>,
    /// Overlap skips. No-change skips are in `unchanged_networks`.
    pub overlapping_networks: Vec<ReconciliationItem>,
    /// Exact matches with nothing to change.
    pub unchanged_networks: Vec<ReconciliationItem>,
    pub errors: Vec<RowError>,
}

impl PreviewResult {
    /// Total rows accounted for across every bucket.
    pub fn total(&self) -> usize {
        self.new_networks.len()
            + self.updated_networks.len()
            + self.overlapping_networks.len()
            + self.unchanged_networks.len()
            + self.errors.len()
    }

    /// True when applying would do nothing.
    pub fn has_changes(&self) -> bool {
        !self.new_networks.is_empty() || !self.updated_networks.is_empty()
    }

    /// Every mapping warning across all classified candidates, paired
    /// with the candidate's address.
    pub fn mapping_warnings(&self) -> Vec<(IpNet, super::mapping::MappingWarning)> {
        self.new_networks
            .iter()
            .chain(&self.updated_networks)
            .chain(&self.overlapping_networks)
            .chain(&self.unchanged_networks)
            .flat_map(|item| {
                item.mapping
                    .warnings
                    .iter()
                    .map(|w| (item.network.address, w.clone()))
            })
            .collect()
    }
}

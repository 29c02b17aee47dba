// ── Existing-network snapshot ──
//
// Read-only input to reconciliation: what the grid holds right now for
// one view. Fetched fresh per run and never cached -- grid state moves
// between runs.

use indexmap::IndexMap;
use ipnet::IpNet;
use serde::{Deserialize, Serialize};

/// One network currently present in the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingNetwork {
    pub address: IpNet,
    pub network_view: String,
    pub comment: String,
    /// EA name → value, flattened out of the WAPI envelope.
    pub extended_attributes: IndexMap<String, String>,
    /// WAPI object reference, needed for updates.
    pub reference: String,
}

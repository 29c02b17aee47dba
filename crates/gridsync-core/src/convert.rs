//! WAPI wire types → domain types.
//!
//! The one place transport shapes cross into the pipeline. A grid entry
//! whose address does not parse is dropped with a warning -- a corrupt
//! remote record must not poison a whole import run.

use tracing::warn;

use crate::model::ExistingNetwork;
use gridsync_wapi::WapiNetwork;

/// Flatten a WAPI network list into the reconciliation snapshot,
/// preserving the grid's iteration order.
pub fn snapshot_from_wapi(networks: Vec<WapiNetwork>) -> Vec<ExistingNetwork> {
    networks
        .into_iter()
        .filter_map(|net| match crate::cidr::parse(&net.network) {
            Ok(address) => Some(ExistingNetwork {
                address,
                network_view: net.network_view,
                comment: net.comment.unwrap_or_default(),
                extended_attributes: net
                    .extattrs
                    .iter()
                    .map(|(name, attr)| (name.clone(), attr.value_string()))
                    .collect(),
                reference: net.reference,
            }),
            Err(_) => {
                warn!(network = %net.network, reference = %net.reference,
                      "grid entry has unparsable address, excluded from snapshot");
                None
            }
        })
        .collect()
}

// GCP subnetwork export parser.
//
// gcloud CSV exports use camelCase headers (`ipCidrRange`); labels come
// as a `key=value` list.

use tracing::warn;

use super::tags::parse_kv_pairs;
use super::{ParseOutcome, field, parse_address};
use crate::model::{CanonicalNetwork, SourceKind};
use crate::table::RawTable;

pub fn parse(table: &RawTable, default_view: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    for (row_index, row) in table.rows().iter().enumerate() {
        let address = match parse_address(row, &["ipCidrRange", "IpCidrRange"], row_index) {
            Ok(address) => address,
            Err(error) => {
                outcome.errors.push(error);
                continue;
            }
        };

        let tags = match parse_kv_pairs(field(row, &["labels", "Labels"]).unwrap_or("")) {
            Ok(tags) => tags,
            Err(reason) => {
                warn!(row_index, %address, reason, "malformed labels cell, continuing without labels");
                indexmap::IndexMap::new()
            }
        };

        let parent_network = field(row, &["network", "Network"]).unwrap_or("");
        let region = field(row, &["region", "Region"]).unwrap_or("");

        let mut network = CanonicalNetwork::new(address, default_view, SourceKind::Gcp);
        network.name = field(row, &["name", "Name"]).unwrap_or("").into();
        network.comment = if parent_network.is_empty() {
            "GCP Subnetwork".into()
        } else {
            format!("GCP Subnetwork - {parent_network}")
        };
        network.tags = tags;
        if !parent_network.is_empty() {
            network
                .source_metadata
                .insert("network".into(), parent_network.into());
        }
        if !region.is_empty() {
            network.source_metadata.insert("region".into(), region.into());
        }

        outcome.networks.push(network);
    }

    outcome
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn maps_gcloud_columns() {
        let table = RawTable::from_rows(
            &["name", "ipCidrRange", "network", "region", "labels"],
            &[&["subnet-a", "10.128.0.0/20", "default", "us-central1", "team=platform"]],
        );
        let outcome = parse(&table, "default");

        let net = &outcome.networks[0];
        assert_eq!(net.name, "subnet-a");
        assert_eq!(net.address.to_string(), "10.128.0.0/20");
        assert_eq!(net.tags.get("team").unwrap(), "platform");
        assert_eq!(net.source_metadata.get("region").unwrap(), "us-central1");
    }

    #[test]
    fn missing_cidr_column_fails_rows_individually() {
        let table = RawTable::from_rows(&["name"], &[&["subnet-a"]]);
        let outcome = parse(&table, "default");
        assert!(outcome.networks.is_empty());
        assert_eq!(outcome.errors.len(), 1);
    }
}

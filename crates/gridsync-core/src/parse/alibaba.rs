// Alibaba Cloud VPC export parser.
//
// Same CidrBlock/Tags conventions as AWS, with Alibaba's VpcName/RegionId
// column names.

use tracing::warn;

use super::tags::parse_tag_cell;
use super::{ParseOutcome, field, parse_address};
use crate::model::{CanonicalNetwork, SourceKind};
use crate::table::RawTable;

pub fn parse(table: &RawTable, default_view: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    for (row_index, row) in table.rows().iter().enumerate() {
        let address = match parse_address(row, &["CidrBlock"], row_index) {
            Ok(address) => address,
            Err(error) => {
                outcome.errors.push(error);
                continue;
            }
        };

        let tags = match parse_tag_cell(field(row, &["Tags"]).unwrap_or("")) {
            Ok(tags) => tags,
            Err(reason) => {
                warn!(row_index, %address, reason, "malformed Tags cell, continuing without tags");
                indexmap::IndexMap::new()
            }
        };

        let vpc = field(row, &["VpcId"]).unwrap_or("");
        let region = field(row, &["RegionId", "Region"]).unwrap_or("");
        let status = field(row, &["Status", "State"]).unwrap_or("");

        let mut network = CanonicalNetwork::new(address, default_view, SourceKind::Alibaba);
        network.name = field(row, &["VpcName", "Name"]).unwrap_or("").into();
        network.comment = if vpc.is_empty() {
            "Alibaba VPC".into()
        } else {
            format!("Alibaba VPC: {vpc}")
        };
        network.tags = tags;
        for (key, value) in [("vpc_id", vpc), ("region", region), ("status", status)] {
            if !value.is_empty() {
                network.source_metadata.insert(key.into(), value.into());
            }
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
    fn maps_alibaba_columns() {
        let table = RawTable::from_rows(
            &["VpcId", "VpcName", "CidrBlock", "RegionId", "Status", "Tags"],
            &[&["vpc-bp1", "hangzhou-core", "172.16.0.0/12", "cn-hangzhou", "Available", "team=infra"]],
        );
        let outcome = parse(&table, "default");

        let net = &outcome.networks[0];
        assert_eq!(net.name, "hangzhou-core");
        assert_eq!(net.comment, "Alibaba VPC: vpc-bp1");
        assert_eq!(net.source_metadata.get("region").unwrap(), "cn-hangzhou");
        assert_eq!(net.tags.get("team").unwrap(), "infra");
    }
}

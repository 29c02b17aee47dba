// AWS VPC export parser.
//
// Expected columns: AccountId, Region, VpcId, Name, CidrBlock, IsDefault,
// State, Tags. The Tags cell is either a JSON array of {Key, Value}
// objects or a key=value list; malformed tag content degrades to an empty
// tag set with a warning and the row survives.

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

        let mut tags = match parse_tag_cell(field(row, &["Tags"]).unwrap_or("")) {
            Ok(tags) => tags,
            Err(reason) => {
                warn!(row_index, %address, reason, "malformed Tags cell, continuing without tags");
                indexmap::IndexMap::new()
            }
        };

        let account = field(row, &["AccountId"]).unwrap_or("");
        let region = field(row, &["Region"]).unwrap_or("");
        let vpc = field(row, &["VpcId"]).unwrap_or("");
        let state = field(row, &["State"]).unwrap_or("");

        // Provider identifiers double as tags so EA mapping rules can
        // target them directly.
        if !account.is_empty() {
            tags.insert("AWS_AccountId".into(), account.into());
        }
        if !region.is_empty() {
            tags.insert("AWS_Region".into(), region.into());
        }
        if !vpc.is_empty() {
            tags.insert("AWS_VpcId".into(), vpc.into());
        }
        if !state.is_empty() {
            tags.insert("AWS_State".into(), state.into());
        }

        let name = field(row, &["Name"])
            .map(String::from)
            .or_else(|| tags.get("Name").cloned())
            .unwrap_or_else(|| {
                format!("aws-{vpc}-{}", address.to_string().replace('/', "-"))
            });

        let mut comment_parts = vec![format!("AWS VPC: {vpc}")];
        if !region.is_empty() {
            comment_parts.push(format!("Region: {region}"));
        }
        if !state.is_empty() {
            comment_parts.push(format!("State: {state}"));
        }

        let mut network = CanonicalNetwork::new(address, default_view, SourceKind::Aws);
        network.name = name;
        network.comment = comment_parts.join(" | ");
        network.tags = tags;
        for (key, column) in [
            ("account_id", account),
            ("region", region),
            ("vpc_id", vpc),
            ("state", state),
        ] {
            if !column.is_empty() {
                network.source_metadata.insert(key.into(), column.into());
            }
        }
        if let Some(is_default) = field(row, &["IsDefault"]) {
            network
                .source_metadata
                .insert("is_default".into(), is_default.to_lowercase());
        }

        outcome.networks.push(network);
    }

    outcome
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const HEADERS: [&str; 8] = [
        "AccountId", "Region", "VpcId", "Name", "CidrBlock", "IsDefault", "State", "Tags",
    ];

    #[test]
    fn maps_columns_into_canonical_record() {
        let table = RawTable::from_rows(
            &HEADERS,
            &[&[
                "123456789012",
                "us-east-1",
                "vpc-0a1b",
                "core-vpc",
                "10.0.0.0/16",
                "FALSE",
                "available",
                r#"[{"Key": "Environment", "Value": "prod"}]"#,
            ]],
        );
        let outcome = parse(&table, "default");

        assert!(outcome.errors.is_empty());
        let net = &outcome.networks[0];
        assert_eq!(net.address.to_string(), "10.0.0.0/16");
        assert_eq!(net.name, "core-vpc");
        assert_eq!(net.comment, "AWS VPC: vpc-0a1b | Region: us-east-1 | State: available");
        assert_eq!(net.tags.get("Environment").unwrap(), "prod");
        assert_eq!(net.tags.get("AWS_Region").unwrap(), "us-east-1");
        assert_eq!(net.source_metadata.get("vpc_id").unwrap(), "vpc-0a1b");
        assert_eq!(net.source_metadata.get("is_default").unwrap(), "false");
        assert_eq!(net.source, SourceKind::Aws);
    }

    #[test]
    fn name_falls_back_to_tag_then_synthetic() {
        let table = RawTable::from_rows(
            &HEADERS,
            &[
                &["1", "us-east-1", "vpc-1", "", "10.0.0.0/16", "", "", r#"[{"Key":"Name","Value":"tagged"}]"#],
                &["1", "us-east-1", "vpc-2", "", "10.1.0.0/16", "", "", ""],
            ],
        );
        let outcome = parse(&table, "default");

        assert_eq!(outcome.networks[0].name, "tagged");
        assert_eq!(outcome.networks[1].name, "aws-vpc-2-10.1.0.0-16");
    }

    #[test]
    fn kv_tag_cell_is_accepted() {
        let table = RawTable::from_rows(
            &HEADERS,
            &[&["1", "r", "v", "n", "10.0.0.0/16", "", "", "Env=prod;Owner=netops"]],
        );
        let outcome = parse(&table, "default");
        assert_eq!(outcome.networks[0].tags.get("Owner").unwrap(), "netops");
    }

    #[test]
    fn malformed_tags_degrade_without_failing_the_row() {
        let table = RawTable::from_rows(
            &HEADERS,
            &[&["1", "r", "v", "n", "10.0.0.0/16", "", "", "{{{not json"]],
        );
        let outcome = parse(&table, "default");

        assert!(outcome.errors.is_empty());
        let net = &outcome.networks[0];
        // Provider identifiers still land even when the tag cell is junk.
        assert_eq!(net.tags.get("AWS_VpcId").unwrap(), "v");
        assert!(!net.tags.contains_key("Env"));
    }

    #[test]
    fn bad_cidr_becomes_a_row_error() {
        let table = RawTable::from_rows(
            &HEADERS,
            &[&["1", "r", "v", "n", "10.0.0.0/99", "", "", ""]],
        );
        let outcome = parse(&table, "default");

        assert!(outcome.networks.is_empty());
        assert_eq!(outcome.errors[0].raw_value, "10.0.0.0/99");
    }
}

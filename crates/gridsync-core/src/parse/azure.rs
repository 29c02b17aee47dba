// Azure VNet export parser.
//
// Azure portal exports use camelCase headers; ad-hoc exports often
// re-capitalize them, so both spellings are accepted. Tags arrive as a
// JSON object; a malformed cell degrades to a single `raw_tags`
// passthrough entry rather than failing the row.

use tracing::warn;

use super::tags::parse_tag_cell;
use super::{ParseOutcome, field, parse_address};
use crate::model::{CanonicalNetwork, SourceKind};
use crate::table::RawTable;

pub fn parse(table: &RawTable, default_view: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    for (row_index, row) in table.rows().iter().enumerate() {
        let address =
            match parse_address(row, &["addressSpace", "AddressSpace", "AddressPrefix"], row_index)
            {
                Ok(address) => address,
                Err(error) => {
                    outcome.errors.push(error);
                    continue;
                }
            };

        let raw_tags = field(row, &["tags", "Tags"]).unwrap_or("");
        let tags = match parse_tag_cell(raw_tags) {
            Ok(tags) => tags,
            Err(reason) => {
                warn!(row_index, %address, reason, "unparsable tags cell, keeping raw value");
                std::iter::once(("raw_tags".to_string(), raw_tags.to_string())).collect()
            }
        };

        let resource_group = field(row, &["resourceGroup", "ResourceGroup"]).unwrap_or("");
        let location = field(row, &["location", "Location"]).unwrap_or("");

        let mut network = CanonicalNetwork::new(address, default_view, SourceKind::Azure);
        network.name = field(row, &["name", "Name"])
            .map(String::from)
            .unwrap_or_else(|| format!("azure-network-{row_index}"));
        network.comment = if resource_group.is_empty() {
            "Azure Network".into()
        } else {
            format!("Azure Network - {resource_group}")
        };
        network.tags = tags;
        if !resource_group.is_empty() {
            network
                .source_metadata
                .insert("resource_group".into(), resource_group.into());
        }
        if !location.is_empty() {
            network.source_metadata.insert("location".into(), location.into());
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
    fn maps_camel_case_columns() {
        let table = RawTable::from_rows(
            &["name", "addressSpace", "resourceGroup", "location", "tags"],
            &[&["hub-vnet", "10.10.0.0/16", "rg-network", "westeurope", r#"{"env": "prod"}"#]],
        );
        let outcome = parse(&table, "default");

        let net = &outcome.networks[0];
        assert_eq!(net.name, "hub-vnet");
        assert_eq!(net.comment, "Azure Network - rg-network");
        assert_eq!(net.tags.get("env").unwrap(), "prod");
        assert_eq!(net.source_metadata.get("location").unwrap(), "westeurope");
    }

    #[test]
    fn missing_name_gets_row_indexed_fallback() {
        let table = RawTable::from_rows(&["AddressPrefix"], &[&["10.0.0.0/24"], &["10.1.0.0/24"]]);
        let outcome = parse(&table, "default");
        assert_eq!(outcome.networks[0].name, "azure-network-0");
        assert_eq!(outcome.networks[1].name, "azure-network-1");
    }

    #[test]
    fn malformed_tag_object_keeps_raw_value() {
        let table = RawTable::from_rows(
            &["name", "addressSpace", "tags"],
            &[&["vnet", "10.0.0.0/16", "{broken"]],
        );
        let outcome = parse(&table, "default");
        assert_eq!(outcome.networks[0].tags.get("raw_tags").unwrap(), "{broken");
    }
}

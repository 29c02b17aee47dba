// Properties-spreadsheet parser.
//
// The hand-maintained format: a Network (or CIDR) column, a name column,
// and every remaining column verbatim as a tag. Empty cells produce no
// tag.

use super::{ParseOutcome, field, parse_address};
use crate::model::{CanonicalNetwork, SourceKind};
use crate::table::RawTable;

const ADDRESS_COLUMNS: [&str; 4] = ["Network", "CIDR", "network", "cidr"];
const NAME_COLUMNS: [&str; 4] = ["Property_Name", "Name", "property_name", "name"];

pub fn parse(table: &RawTable, default_view: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    for (row_index, row) in table.rows().iter().enumerate() {
        let address = match parse_address(row, &ADDRESS_COLUMNS, row_index) {
            Ok(address) => address,
            Err(error) => {
                outcome.errors.push(error);
                continue;
            }
        };

        let mut network = CanonicalNetwork::new(address, default_view, SourceKind::Properties);
        network.name = field(row, &NAME_COLUMNS).unwrap_or("").into();
        network.comment = if network.name.is_empty() {
            String::new()
        } else {
            format!("Property: {}", network.name)
        };

        for (column, value) in row {
            if ADDRESS_COLUMNS.contains(&column.as_str())
                || NAME_COLUMNS.contains(&column.as_str())
                || value.is_empty()
            {
                continue;
            }
            network.tags.insert(column.clone(), value.clone());
        }

        outcome.networks.push(network);
    }

    outcome
}

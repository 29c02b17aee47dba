// Generic CSV parser with address-column auto-detection.
//
// Detection runs in two passes: header names containing a CIDR-ish token
// (`network`, `cidr`, `subnet`), then a sample of the first non-empty
// data row for a cell that parses as a CIDR. If neither pass finds a
// column the whole batch fails with FormatError -- there is nothing to
// recover row-by-row when the column model itself is unknown.

use tracing::debug;

use super::{ParseOutcome, field, parse_address};
use crate::error::CoreError;
use crate::model::{CanonicalNetwork, SourceKind};
use crate::table::RawTable;

const ADDRESS_TOKENS: [&str; 3] = ["network", "cidr", "subnet"];
const NAME_COLUMNS: [&str; 2] = ["Name", "name"];

pub fn parse(table: &RawTable, default_view: &str) -> Result<ParseOutcome, CoreError> {
    let address_column = detect_address_column(table)?;
    debug!(column = %address_column, "auto-detected address column");

    let mut outcome = ParseOutcome::default();
    for (row_index, row) in table.rows().iter().enumerate() {
        let address = match parse_address(row, &[address_column.as_str()], row_index) {
            Ok(address) => address,
            Err(error) => {
                outcome.errors.push(error);
                continue;
            }
        };

        let mut network = CanonicalNetwork::new(address, default_view, SourceKind::Custom);
        network.name = field(row, &NAME_COLUMNS).unwrap_or("").into();

        for (column, value) in row {
            if column == &address_column
                || NAME_COLUMNS.contains(&column.as_str())
                || value.is_empty()
            {
                continue;
            }
            network.tags.insert(column.clone(), value.clone());
        }

        outcome.networks.push(network);
    }

    Ok(outcome)
}

/// Find the address column, by header token first, data sampling second.
fn detect_address_column(table: &RawTable) -> Result<String, CoreError> {
    if let Some(header) = table.headers().iter().find(|h| {
        let lowered = h.to_lowercase();
        ADDRESS_TOKENS.iter().any(|token| lowered.contains(token))
    }) {
        return Ok(header.clone());
    }

    // No tell-tale header; sample the first non-empty data row.
    if let Some(row) = table.rows().first() {
        for (column, value) in row {
            if !value.is_empty() && crate::cidr::parse(value).is_ok() {
                return Ok(column.clone());
            }
        }
    }

    Err(CoreError::FormatError {
        message: format!(
            "no address column found among headers {:?} and no cell in the first row parses as a CIDR",
            table.headers()
        ),
    })
}

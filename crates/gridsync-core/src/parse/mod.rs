//! Source-format parsers.
//!
//! One module per input format, all behind the same contract: consume a
//! [`RawTable`] row-by-row and produce canonical records plus per-row
//! errors. One malformed row never aborts a batch; a file whose column
//! model cannot be determined at all fails with
//! [`CoreError::FormatError`] before any rows are attempted.

mod alibaba;
mod aws;
mod azure;
mod custom;
mod gcp;
mod properties;
mod tags;

use ipnet::IpNet;

use crate::error::CoreError;
use crate::model::{CanonicalNetwork, RowError, SourceKind};
use crate::table::{RawTable, Row};

/// What a parser produced: the good rows and the accounted-for bad ones.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub networks: Vec<CanonicalNetwork>,
    pub errors: Vec<RowError>,
}

impl ParseOutcome {
    /// Rows accounted for, good and bad.
    pub fn total(&self) -> usize {
        self.networks.len() + self.errors.len()
    }
}

/// Parse a table with the parser for `source`.
///
/// `default_view` seeds every record's `network_view`.
pub fn parse_table(
    table: &RawTable,
    source: SourceKind,
    default_view: &str,
) -> Result<ParseOutcome, CoreError> {
    match source {
        SourceKind::Aws => Ok(aws::parse(table, default_view)),
        SourceKind::Azure => Ok(azure::parse(table, default_view)),
        SourceKind::Gcp => Ok(gcp::parse(table, default_view)),
        SourceKind::Alibaba => Ok(alibaba::parse(table, default_view)),
        SourceKind::Properties => Ok(properties::parse(table, default_view)),
        SourceKind::Custom => custom::parse(table, default_view),
    }
}

// ── Shared row helpers ──────────────────────────────────────────────

/// First non-empty cell among the candidate column names (exact match).
fn field<'a>(row: &'a Row, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .find_map(|name| row.get(*name))
        .map(String::as_str)
        .filter(|s| !s.is_empty())
}

/// Parse a row's address cell, producing the standard [`RowError`] on
/// failure.
fn parse_address(
    row: &Row,
    names: &[&str],
    row_index: usize,
) -> Result<IpNet, RowError> {
    let raw = field(row, names).unwrap_or("");
    crate::cidr::parse(raw).map_err(|_| RowError {
        row_index,
        raw_value: raw.into(),
        message: if raw.is_empty() {
            format!("missing address column (expected one of {names:?})")
        } else {
            "invalid CIDR address".into()
        },
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bad_rows_never_abort_the_batch() {
        let table = RawTable::from_rows(
            &["CidrBlock", "Region", "VpcId", "AccountId"],
            &[
                &["10.0.0.0/16", "us-east-1", "vpc-1", "111"],
                &["not-a-cidr", "us-east-1", "vpc-2", "111"],
                &["10.2.0.0/16", "eu-west-1", "vpc-3", "222"],
            ],
        );
        let outcome = parse_table(&table, SourceKind::Aws, "default").unwrap();

        assert_eq!(outcome.networks.len(), 2);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.total(), 3);
        assert_eq!(outcome.errors[0].row_index, 1);
        assert_eq!(outcome.errors[0].raw_value, "not-a-cidr");
    }

    #[test]
    fn duplicate_addresses_stay_separate_candidates() {
        let table = RawTable::from_rows(
            &["Network", "Name"],
            &[&["10.0.0.0/24", "first"], &["10.0.0.0/24", "second"]],
        );
        let outcome = parse_table(&table, SourceKind::Properties, "default").unwrap();

        assert_eq!(outcome.networks.len(), 2);
        assert_eq!(outcome.networks[0].name, "first");
        assert_eq!(outcome.networks[1].name, "second");
        assert_eq!(outcome.networks[0].address, outcome.networks[1].address);
    }

    #[test]
    fn records_carry_the_default_view() {
        let table = RawTable::from_rows(&["Network"], &[&["10.0.0.0/24"]]);
        let outcome = parse_table(&table, SourceKind::Properties, "lab").unwrap();
        assert_eq!(outcome.networks[0].network_view, "lab");
    }
}

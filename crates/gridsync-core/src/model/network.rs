// ── Canonical network record ──
//
// Every source format parses into this one shape; mapping and
// reconciliation never see provider-specific columns again.

use indexmap::IndexMap;
use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The input formats gridsync understands. A closed set selected at the
/// call boundary; each variant has its own parser behind the same
/// contract.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SourceKind {
    Aws,
    Azure,
    Gcp,
    Alibaba,
    Properties,
    Custom,
}

/// A normalized network record, produced fresh for every import run.
///
/// `address` is always the truncated network address with its prefix --
/// parsers run raw cells through [`crate::cidr::parse`] before anything
/// else sees them. Duplicate addresses within one batch are allowed and
/// stay separate candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalNetwork {
    pub address: IpNet,
    /// Display name; may be empty.
    pub name: String,
    /// Free-text comment pushed to the grid alongside the record.
    pub comment: String,
    /// Source-provider tag vocabulary, in column order.
    pub tags: IndexMap<String, String>,
    /// Provider identifiers (account, region, VPC, ...) that are not
    /// tags but worth keeping with the record.
    pub source_metadata: IndexMap<String, String>,
    /// Target network view.
    pub network_view: String,
    /// Which parser produced this record.
    pub source: SourceKind,
}

impl CanonicalNetwork {
    /// A bare record with the given address; parsers fill in the rest.
    pub fn new(address: IpNet, network_view: impl Into<String>, source: SourceKind) -> Self {
        Self {
            address,
            name: String::new(),
            comment: String::new(),
            tags: IndexMap::new(),
            source_metadata: IndexMap::new(),
            network_view: network_view.into(),
            source,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn source_kind_round_trips_through_strings() {
        let kind: SourceKind = "aws".parse().unwrap();
        assert_eq!(kind, SourceKind::Aws);
        assert_eq!(SourceKind::Properties.to_string(), "properties");
    }

    #[test]
    fn source_kind_serde_uses_lowercase() {
        let json = serde_json::to_string(&SourceKind::Alibaba).unwrap();
        assert_eq!(json, r#""alibaba""#);
    }
}

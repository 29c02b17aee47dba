// ── WAPI wire types ──
//
// Shapes match the WAPI JSON faithfully; renames hide the underscore
// field conventions (`_ref`) from Rust callers. Extended attributes ride
// in a `{"Name": {"value": ...}}` envelope on every object.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One extended-attribute value in its WAPI envelope.
///
/// The grid stores typed values (string, integer, timestamp); everything
/// gridsync writes is a string, but reads tolerate any scalar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtAttr {
    pub value: serde_json::Value,
}

impl ExtAttr {
    /// Wrap a string value for an outgoing payload.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: serde_json::Value::String(value.into()),
        }
    }

    /// The value rendered as a plain string (numbers lose no precision,
    /// strings lose their quotes).
    pub fn value_string(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// A network object as returned by `GET network`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WapiNetwork {
    #[serde(rename = "_ref")]
    pub reference: String,
    pub network: String,
    #[serde(default = "default_view")]
    pub network_view: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub extattrs: IndexMap<String, ExtAttr>,
}

fn default_view() -> String {
    "default".into()
}

/// Payload for `POST network`.
#[derive(Debug, Clone, Serialize)]
pub struct NewNetwork {
    pub network: String,
    pub network_view: String,
    pub comment: String,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub extattrs: IndexMap<String, ExtAttr>,
}

/// Payload for `PUT <network ref>`. Only the fields present are changed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NetworkPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extattrs: Option<IndexMap<String, ExtAttr>>,
}

/// One allowed value of an ENUM extended-attribute definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EaListValue {
    pub value: String,
}

/// An extended-attribute definition (`extensibleattributedef`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EaDefinition {
    #[serde(rename = "_ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub attr_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_values: Option<Vec<EaListValue>>,
}

impl EaDefinition {
    /// A plain STRING definition with no comment.
    pub fn string(name: impl Into<String>) -> Self {
        Self {
            reference: None,
            name: name.into(),
            attr_type: "STRING".into(),
            comment: None,
            flags: None,
            list_values: None,
        }
    }
}

/// A network view (`networkview`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkView {
    #[serde(rename = "_ref")]
    pub reference: String,
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
}

/// A bare object reference, as returned by `GET grid`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridRef {
    #[serde(rename = "_ref")]
    pub reference: String,
}

impl GridRef {
    /// The human name embedded in the reference, when present.
    ///
    /// Grid refs look like `grid/b25lLmNsdXN0ZXIkMA:GridName`; the text
    /// after the last `:` is the display name.
    pub fn display_name(&self) -> Option<&str> {
        self.reference.rsplit_once(':').map(|(_, name)| name)
    }
}

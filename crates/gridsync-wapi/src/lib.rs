//! Async client for Infoblox-style IPAM WAPI grids.
//!
//! This crate is deliberately thin: URL construction, basic-auth transport,
//! WAPI error-body decoding, and typed payloads. It knows nothing about
//! import pipelines — `gridsync-core` owns those and treats this client as
//! its "fetch existing networks" / "apply a change" collaborator.
//!
//! - **[`WapiClient`]** — HTTP client for one grid. Every method maps to a
//!   single WAPI object endpoint (`network`, `extensibleattributedef`,
//!   `networkview`, `grid`).
//! - **[`WapiConfig`]** — explicit connection settings (grid master URL,
//!   credentials, WAPI version, TLS, timeout). Passed in by the caller;
//!   nothing here reads config files or ambient globals.
//! - **[`Error`]** — transport and API failures, decoded from the WAPI
//!   `{"Error": ..., "code": ..., "text": ...}` body shape.

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::WapiClient;
pub use config::{TlsMode, WapiConfig};
pub use error::Error;
pub use types::{
    EaDefinition, EaListValue, ExtAttr, GridRef, NetworkPatch, NetworkView, NewNetwork,
    WapiNetwork,
};

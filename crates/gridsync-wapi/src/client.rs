// WAPI HTTP client
//
// Wraps `reqwest::Client` with versioned URL construction, basic auth on
// every request, and WAPI error-body decoding. Endpoint methods stay
// one-call-one-request; batching and retry policy belong to callers.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::WapiConfig;
use crate::error::Error;
use crate::types::{EaDefinition, GridRef, NetworkPatch, NetworkView, NewNetwork, WapiNetwork};

/// Fields requested for every network read; reconciliation needs all four.
const NETWORK_RETURN_FIELDS: &str = "network,network_view,comment,extattrs";

/// 4xx responses carry `{"Error": "...", "code": "...", "text": "..."}`.
#[derive(serde::Deserialize)]
struct WapiErrorBody {
    #[serde(rename = "Error")]
    error: Option<String>,
    code: Option<String>,
    text: Option<String>,
}

/// Raw HTTP client for one IPAM grid's WAPI.
///
/// All methods hit `{grid}/wapi/v{version}/{object}` with basic auth and
/// return decoded payloads; the WAPI error envelope is translated into
/// [`Error::Api`] before the caller sees it.
pub struct WapiClient {
    http: reqwest::Client,
    endpoint_root: Url,
    username: String,
    password: SecretString,
}

impl WapiClient {
    /// Create a client from explicit connection settings.
    pub fn new(config: &WapiConfig) -> Result<Self, Error> {
        let endpoint_root = config.endpoint_root()?;
        let http = config.build_client()?;
        Ok(Self {
            http,
            endpoint_root,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// The versioned endpoint root this client talks to.
    pub fn endpoint_root(&self) -> &Url {
        &self.endpoint_root
    }

    // ── Network operations ───────────────────────────────────────────

    /// Fetch every network in a view, with the fields reconciliation
    /// needs. An empty view yields an empty vec, not an error.
    pub async fn list_networks(
        &self,
        view: &str,
        max_results: u32,
    ) -> Result<Vec<WapiNetwork>, Error> {
        self.get(
            "network",
            &[
                ("network_view", view),
                ("_return_fields", NETWORK_RETURN_FIELDS),
                ("_max_results", &max_results.to_string()),
            ],
        )
        .await
    }

    /// Create a network; returns the new object reference.
    pub async fn create_network(&self, network: &NewNetwork) -> Result<String, Error> {
        self.post("network", network).await
    }

    /// Update a network by reference; returns the (possibly new) reference.
    pub async fn update_network(
        &self,
        reference: &str,
        patch: &NetworkPatch,
    ) -> Result<String, Error> {
        self.put(reference, patch).await
    }

    // ── Extended-attribute definitions ───────────────────────────────

    /// Look up one EA definition by name.
    pub async fn get_ea_definition(&self, name: &str) -> Result<Option<EaDefinition>, Error> {
        let mut defs: Vec<EaDefinition> =
            self.get("extensibleattributedef", &[("name", name)]).await?;
        Ok(if defs.is_empty() {
            None
        } else {
            Some(defs.swap_remove(0))
        })
    }

    /// Create an EA definition if it does not already exist; returns the
    /// reference either way.
    pub async fn ensure_ea_definition(&self, definition: &EaDefinition) -> Result<String, Error> {
        if let Some(existing) = self.get_ea_definition(&definition.name).await? {
            if let Some(reference) = existing.reference {
                debug!(name = %definition.name, "EA definition already exists");
                return Ok(reference);
            }
        }
        self.post("extensibleattributedef", definition).await
    }

    /// List every EA definition on the grid.
    pub async fn list_ea_definitions(&self) -> Result<Vec<EaDefinition>, Error> {
        self.get("extensibleattributedef", &[]).await
    }

    // ── Views and grid ───────────────────────────────────────────────

    /// List the grid's network views.
    pub async fn list_network_views(&self) -> Result<Vec<NetworkView>, Error> {
        self.get("networkview", &[]).await
    }

    /// Fetch the grid object -- the cheapest connectivity probe.
    pub async fn grid_info(&self) -> Result<Option<GridRef>, Error> {
        let mut grids: Vec<GridRef> = self.get("grid", &[]).await?;
        Ok(if grids.is_empty() {
            None
        } else {
            Some(grids.swap_remove(0))
        })
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn object_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.endpoint_root.join(path)?)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, Error> {
        let url = self.object_url(path)?;
        debug!("GET {url}");
        let resp = self
            .http
            .get(url)
            .query(query)
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .send()
            .await
            .map_err(Error::Transport)?;
        parse_response(resp).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.object_url(path)?;
        debug!("POST {url}");
        let resp = self
            .http
            .post(url)
            .json(body)
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .send()
            .await
            .map_err(Error::Transport)?;
        parse_response(resp).await
    }

    async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.object_url(path)?;
        debug!("PUT {url}");
        let resp = self
            .http
            .put(url)
            .json(body)
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .send()
            .await
            .map_err(Error::Transport)?;
        parse_response(resp).await
    }
}

/// Decode a WAPI response: success bodies deserialize to `T`, error
/// bodies to the `Error`/`code`/`text` envelope.
async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(Error::Authentication {
            message: "invalid credentials or disabled API account".into(),
        });
    }

    let body = resp.text().await.map_err(Error::Transport)?;

    if !status.is_success() {
        // Prefer the structured WAPI error when the body carries one.
        if let Ok(wapi_err) = serde_json::from_str::<WapiErrorBody>(&body) {
            if wapi_err.error.is_some() || wapi_err.text.is_some() {
                return Err(Error::Api {
                    message: wapi_err
                        .text
                        .or(wapi_err.error)
                        .unwrap_or_else(|| format!("HTTP {status}")),
                    code: wapi_err.code,
                    status: status.as_u16(),
                });
            }
        }
        return Err(Error::Api {
            message: format!("HTTP {status}: {}", &body[..body.len().min(200)]),
            code: None,
            status: status.as_u16(),
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        let preview = body[..body.len().min(200)].to_string();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}

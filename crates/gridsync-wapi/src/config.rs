// ── Connection configuration ──
//
// These types describe *how* to reach a grid master. They carry credential
// data and transport tuning, but never touch disk. The CLI constructs a
// `WapiConfig` and hands it in; tests build one pointed at a mock server.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// TLS verification strategy.
///
/// Grid masters overwhelmingly run self-signed certificates, so the
/// default accepts them; production deployments should pin a CA.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// System CA store (strict).
    System,
    /// Custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed grids). Default.
    #[default]
    DangerAcceptInvalid,
}

/// Configuration for connecting to a single grid master.
#[derive(Debug, Clone)]
pub struct WapiConfig {
    /// Grid master base URL (e.g. `https://192.168.1.222`).
    pub url: Url,
    /// API username.
    pub username: String,
    /// API password, kept out of Debug output.
    pub password: SecretString,
    /// WAPI version segment of the endpoint path (e.g. `2.13.1`).
    pub wapi_version: String,
    /// TLS verification strategy.
    pub tls: TlsMode,
    /// Request timeout.
    pub timeout: Duration,
}

impl WapiConfig {
    /// The versioned endpoint root: `{url}/wapi/v{version}/`.
    pub fn endpoint_root(&self) -> Result<Url, crate::error::Error> {
        let base = self.url.as_str().trim_end_matches('/');
        let full = format!("{base}/wapi/v{}/", self.wapi_version);
        Ok(Url::parse(&full)?)
    }

    /// Build a `reqwest::Client` honoring the TLS and timeout settings.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent("gridsync/0.1.0");

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| crate::error::Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| crate::error::Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| crate::error::Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

impl Default for WapiConfig {
    fn default() -> Self {
        Self {
            url: "https://192.168.1.222".parse().expect("static URL"),
            username: "admin".into(),
            password: SecretString::from(String::new()),
            wapi_version: "2.13.1".into(),
            tls: TlsMode::default(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_root_appends_versioned_path() {
        let config = WapiConfig {
            url: "https://grid.example.com".parse().expect("url"),
            ..WapiConfig::default()
        };
        let root = config.endpoint_root().expect("root");
        assert_eq!(root.as_str(), "https://grid.example.com/wapi/v2.13.1/");
    }

    #[test]
    fn endpoint_root_tolerates_trailing_slash() {
        let config = WapiConfig {
            url: "https://grid.example.com/".parse().expect("url"),
            wapi_version: "2.12".into(),
            ..WapiConfig::default()
        };
        let root = config.endpoint_root().expect("root");
        assert_eq!(root.as_str(), "https://grid.example.com/wapi/v2.12/");
    }
}

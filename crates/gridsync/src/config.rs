//! CLI-owned configuration: TOML profiles, credential resolution, and
//! translation to `gridsync_wapi::WapiConfig`.
//!
//! Core never sees these types -- it receives a pre-built `WapiConfig`,
//! so concurrent runs (and tests) can carry distinct settings without
//! ambient state.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use gridsync_wapi::{TlsMode, WapiConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── TOML config structs ──────────────────────────────────────────────

/// CLI-owned TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name (used when --profile is not specified).
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named grid profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_view")]
    pub network_view: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
            network_view: default_view(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_view() -> String {
    "default".into()
}
fn default_wapi_version() -> String {
    "2.13.1".into()
}

/// One grid master profile.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// Grid master URL (e.g., "https://192.168.1.222").
    pub grid_master: String,

    /// API username.
    pub username: String,

    /// Password (plaintext -- prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// WAPI version segment.
    #[serde(default = "default_wapi_version")]
    pub wapi_version: String,

    /// Default network view for imports.
    #[serde(default = "default_view")]
    pub network_view: String,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

// ── Config file path ─────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "gridsync", "gridsync")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("gridsync");
            p.push("config.toml");
            p
        })
}

// ── Config loading ───────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, CliError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("GRIDSYNC_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Profile resolution ───────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Translate a profile + global flags into a `WapiConfig`.
///
/// This is the single boundary where CLI config types cross into the
/// client's types.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<WapiConfig, CliError> {
    // 1. Grid master URL (flag > env > profile)
    let url_str = global.grid_master.as_deref().unwrap_or(&profile.grid_master);
    let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "grid-master".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    // 2. Username (flag > profile)
    let username = global
        .username
        .clone()
        .unwrap_or_else(|| profile.username.clone());

    // 3. Password chain
    let password = resolve_password(profile, profile_name)?;

    // 4. TLS
    let tls = if global.insecure || profile.insecure.unwrap_or(false) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    Ok(WapiConfig {
        url,
        username,
        password,
        wapi_version: profile.wapi_version.clone(),
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(global.timeout)),
    })
}

/// Build a `WapiConfig` straight from CLI flags when no profile exists.
pub fn resolve_from_flags(global: &GlobalOpts, profile_name: &str) -> Result<WapiConfig, CliError> {
    let url_str = global.grid_master.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;
    let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "grid-master".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    let username = global.username.clone().ok_or_else(|| CliError::NoCredentials {
        profile: profile_name.into(),
    })?;
    let password = std::env::var("GRIDSYNC_PASSWORD")
        .map(SecretString::from)
        .map_err(|_| CliError::NoCredentials {
            profile: profile_name.into(),
        })?;

    let tls = if global.insecure {
        TlsMode::DangerAcceptInvalid
    } else {
        TlsMode::System
    };

    Ok(WapiConfig {
        url,
        username,
        password,
        wapi_version: default_wapi_version(),
        tls,
        timeout: Duration::from_secs(global.timeout),
    })
}

// ── Credential helpers ───────────────────────────────────────────────

/// Resolve a profile's password from the credential chain.
fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, CliError> {
    // 1. Well-known env var
    if let Ok(pw) = std::env::var("GRIDSYNC_PASSWORD") {
        return Ok(SecretString::from(pw));
    }

    // 2. Profile's password_env -> env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(pw) = std::env::var(env_name) {
            return Ok(SecretString::from(pw));
        }
    }

    // 3. System keyring
    if let Ok(entry) = keyring::Entry::new("gridsync", &format!("{profile_name}/password")) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(CliError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// The default network view for a run: profile default unless overridden.
pub fn resolve_network_view(
    override_view: Option<&str>,
    profile: Option<&Profile>,
    config: &Config,
) -> String {
    if let Some(view) = override_view {
        return view.to_string();
    }
    if let Some(profile) = profile {
        return profile.network_view.clone();
    }
    config.defaults.network_view.clone()
}

//! Config management: init, show, path.

use std::io::Write;

use dialoguer::Input;
use owo_colors::OwoColorize;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),
        ConfigCommand::Show => show(global),
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}

/// Interactively create (or replace) a profile and write the config file.
fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();
    let profile_name = global.profile.clone().unwrap_or_else(|| "default".into());

    let grid_master: String = Input::new()
        .with_prompt("Grid master URL")
        .default("https://192.168.1.222".into())
        .interact_text()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;

    let username: String = Input::new()
        .with_prompt("API username")
        .default("admin".into())
        .interact_text()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;

    let network_view: String = Input::new()
        .with_prompt("Default network view")
        .default("default".into())
        .interact_text()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;

    let password = rpassword::prompt_password("API password (stored in system keyring): ")?;

    // Keyring first; fall back to plaintext in the file only if the
    // platform store is unavailable.
    let mut plaintext_password = None;
    match keyring::Entry::new("gridsync", &format!("{profile_name}/password"))
        .and_then(|entry| entry.set_password(&password))
    {
        Ok(()) => {
            if !global.quiet {
                println!("{} Password stored in system keyring", "✓".green());
            }
        }
        Err(error) => {
            eprintln!("{} Keyring unavailable ({error}); storing password in config file", "!".yellow());
            plaintext_password = Some(password);
        }
    }

    cfg.profiles.insert(
        profile_name.clone(),
        Profile {
            grid_master,
            username,
            password: plaintext_password,
            password_env: None,
            wapi_version: "2.13.1".into(),
            network_view,
            ca_cert: None,
            insecure: Some(global.insecure),
            timeout: None,
        },
    );
    if cfg.default_profile.is_none() {
        cfg.default_profile = Some(profile_name.clone());
    }

    let path = config::config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let rendered = toml::to_string_pretty(&cfg).map_err(|e| CliError::Validation {
        field: "config".into(),
        reason: e.to_string(),
    })?;
    let mut file = std::fs::File::create(&path)?;
    file.write_all(rendered.as_bytes())?;

    if !global.quiet {
        println!("{} Wrote profile '{profile_name}' to {}", "✓".green(), path.display());
    }
    Ok(())
}

/// Render the resolved config with passwords redacted.
fn show(global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg: Config = config::load_config_or_default();
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some("<redacted>".into());
        }
    }

    let rendered = toml::to_string_pretty(&cfg).map_err(|e| CliError::Validation {
        field: "config".into(),
        reason: e.to_string(),
    })?;
    crate::output::print_output(&rendered, global.quiet);
    Ok(())
}

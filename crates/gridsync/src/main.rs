mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use gridsync_core::{ImportOptions, Importer};
use gridsync_wapi::WapiClient;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config, template, and completions don't need a grid connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Template(args) => commands::template::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "gridsync", &mut std::io::stdout());
            Ok(())
        }

        // Everything else talks to the grid
        Command::Import(args) => {
            let (wapi_config, view) =
                build_wapi_config(&cli.global, args.network_view.as_deref())?;
            let wapi = WapiClient::new(&wapi_config)?;
            let importer = Importer::new(
                wapi,
                ImportOptions {
                    network_view: view,
                    mapping_file: args.mapping_file.clone(),
                    max_results: args.max_results,
                },
            );
            commands::import::handle(&importer, args, &cli.global).await
        }

        cmd => {
            let (wapi_config, _) = build_wapi_config(&cli.global, None)?;
            let wapi = WapiClient::new(&wapi_config)?;

            tracing::debug!(command = ?cmd, "dispatching command");
            match cmd {
                Command::Eas(args) => commands::eas::handle(&wapi, args, &cli.global).await,
                Command::Views(args) => commands::views::handle(&wapi, args, &cli.global).await,
                Command::System(args) => commands::system::handle(&wapi, args, &cli.global).await,
                // Handled above
                Command::Import(_)
                | Command::Config(_)
                | Command::Template(_)
                | Command::Completions(_) => unreachable!(),
            }
        }
    }
}

/// Build a `WapiConfig` plus the effective network view from the config
/// file, profile, and CLI overrides.
fn build_wapi_config(
    global: &cli::GlobalOpts,
    view_override: Option<&str>,
) -> Result<(gridsync_wapi::WapiConfig, String), CliError> {
    let cfg = config::load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);

    // If a profile exists, use it with CLI flag overrides
    if let Some(profile) = cfg.profiles.get(&profile_name) {
        let wapi_config = config::resolve_profile(profile, &profile_name, global)?;
        let view = config::resolve_network_view(view_override, Some(profile), &cfg);
        return Ok((wapi_config, view));
    }

    // An explicitly requested profile that doesn't exist is an error,
    // not a fall-through to bare flags.
    if global.profile.is_some() {
        let mut available: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
        available.sort_unstable();
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available.join(", "),
        });
    }

    // No profile configured -- try to build from CLI flags / env vars alone
    let wapi_config = config::resolve_from_flags(global, &profile_name)?;
    let view = config::resolve_network_view(view_override, None, &cfg);
    Ok((wapi_config, view))
}

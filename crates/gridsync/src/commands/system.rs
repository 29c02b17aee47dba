//! Grid connectivity commands.

use owo_colors::OwoColorize;

use gridsync_wapi::WapiClient;

use crate::cli::{GlobalOpts, SystemArgs, SystemCommand};
use crate::error::CliError;

pub async fn handle(
    wapi: &WapiClient,
    args: SystemArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SystemCommand::Check => {
            let grid = wapi.grid_info().await?;

            if !global.quiet {
                println!("{} Connected to grid master", "✓".green());
                println!("Endpoint:  {}", wapi.endpoint_root());
                if let Some(name) = grid.as_ref().and_then(|g| g.display_name()) {
                    println!("Grid name: {name}");
                }
            }
            Ok(())
        }
    }
}

//! Network view commands.

use tabled::Tabled;

use gridsync_wapi::{NetworkView, WapiClient};

use crate::cli::{GlobalOpts, ViewsArgs, ViewsCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct ViewRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Default")]
    is_default: String,
}

impl From<&NetworkView> for ViewRow {
    fn from(view: &NetworkView) -> Self {
        Self {
            name: view.name.clone(),
            is_default: if view.is_default { "yes" } else { "no" }.into(),
        }
    }
}

pub async fn handle(
    wapi: &WapiClient,
    args: ViewsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ViewsCommand::List => {
            let views = wapi.list_network_views().await?;
            let rendered =
                output::render_list(&global.output, &views, |v| ViewRow::from(v), |v| v.name.clone());
            output::print_output(&rendered, global.quiet);
            Ok(())
        }
    }
}

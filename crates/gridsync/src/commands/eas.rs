//! Extended-attribute definition commands.

use tabled::Tabled;

use gridsync_wapi::{EaDefinition, WapiClient};

use crate::cli::{EasArgs, EasCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct EaRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    attr_type: String,
    #[tabled(rename = "Values")]
    values: String,
    #[tabled(rename = "Comment")]
    comment: String,
}

impl From<&EaDefinition> for EaRow {
    fn from(def: &EaDefinition) -> Self {
        Self {
            name: def.name.clone(),
            attr_type: def.attr_type.clone(),
            values: def
                .list_values
                .as_ref()
                .map(|values| {
                    values
                        .iter()
                        .map(|v| v.value.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default(),
            comment: def.comment.clone().unwrap_or_default(),
        }
    }
}

pub async fn handle(wapi: &WapiClient, args: EasArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        EasCommand::List => {
            let definitions = wapi.list_ea_definitions().await?;
            let rendered = output::render_list(
                &global.output,
                &definitions,
                |def| EaRow::from(def),
                |def| def.name.clone(),
            );
            output::print_output(&rendered, global.quiet);
            Ok(())
        }
    }
}

//! Generate a starter EA mapping document for a provider.

use gridsync_core::{EaMappingRule, EaType, MappingDocument, SourceKind, Transform};
use owo_colors::OwoColorize;

use crate::cli::{GlobalOpts, SourceArg, TemplateArgs};
use crate::error::CliError;

pub fn handle(args: TemplateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let source: SourceKind = args.source.into();
    let document = MappingDocument {
        description: format!("EA mapping configuration for {source} networks"),
        mappings: rules_for(args.source),
    };

    let contents = serde_json::to_string_pretty(&document)?;
    std::fs::write(&args.to, contents)?;

    if !global.quiet {
        println!(
            "{} Generated mapping template: {}",
            "✓".green(),
            args.to.display()
        );
    }
    Ok(())
}

fn rule(source_tag: &str, target: &str) -> EaMappingRule {
    EaMappingRule {
        source_tag: source_tag.into(),
        target_attribute: target.into(),
        transform: Transform::None,
        ea_type: EaType::String,
        default_value: None,
        list_values: Vec::new(),
        create_if_missing: true,
    }
}

fn enum_rule(source_tag: &str, target: &str, values: &[&str]) -> EaMappingRule {
    EaMappingRule {
        ea_type: EaType::Enum,
        list_values: values.iter().map(|v| (*v).to_string()).collect(),
        ..rule(source_tag, target)
    }
}

fn rules_for(source: SourceArg) -> Vec<EaMappingRule> {
    match source {
        SourceArg::Aws => vec![
            rule("Name", "Name"),
            rule("Environment", "Environment"),
            rule("AWS_AccountId", "AWS Account"),
            rule("AWS_Region", "AWS Region"),
            rule("AWS_VpcId", "AWS VPC ID"),
        ],
        SourceArg::Azure => vec![
            rule("Name", "Name"),
            rule("Environment", "Environment"),
            rule("ResourceGroup", "Azure RG"),
        ],
        SourceArg::Gcp => vec![
            rule("Name", "Name"),
            rule("team", "Team"),
            rule("environment", "Environment"),
        ],
        SourceArg::Alibaba => vec![
            rule("Name", "Name"),
            rule("Environment", "Environment"),
        ],
        SourceArg::Properties | SourceArg::Custom => vec![
            rule("Environment", "Environment"),
            rule("Owner", "Network_Owner"),
            rule("Department", "Department"),
            rule("Cost_Center", "Cost_Center"),
            enum_rule(
                "Site_Type",
                "Site_Type",
                &["Office", "Branch", "Datacenter", "Lab", "Cloud"],
            ),
            enum_rule(
                "Compliance",
                "Compliance",
                &["GDPR", "HIPAA", "PCI-DSS", "SOC2", "None"],
            ),
        ],
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn every_source_has_a_template() {
        for source in [
            SourceArg::Aws,
            SourceArg::Azure,
            SourceArg::Gcp,
            SourceArg::Alibaba,
            SourceArg::Properties,
            SourceArg::Custom,
        ] {
            assert!(!rules_for(source).is_empty());
        }
    }

    #[test]
    fn templates_round_trip_through_the_document_loader() {
        let document = MappingDocument {
            description: "x".into(),
            mappings: rules_for(SourceArg::Properties),
        };
        let json = serde_json::to_string(&document).unwrap();
        let parsed: MappingDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.mappings.len(), document.mappings.len());
        assert_eq!(parsed.mappings[4].ea_type, EaType::Enum);
        assert_eq!(parsed.mappings[4].list_values.len(), 5);
    }
}

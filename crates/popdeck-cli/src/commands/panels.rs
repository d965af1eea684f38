use crate::OutputFormat;
use anyhow::Result;
use console::style;
use popdeck_core::PanelId;
use popdeck_core::panels::PanelSpec;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct PanelEntry {
    id: PanelId,
    key: usize,
    title: &'static str,
    site: String,
    accepts: &'static str,
    actions: Vec<ActionEntry>,
}

#[derive(Debug, Serialize)]
struct ActionEntry {
    id: &'static str,
    key: char,
    label: &'static str,
}

impl PanelEntry {
    fn new(key: usize, spec: &'static PanelSpec) -> Self {
        Self {
            id: spec.id,
            key,
            title: spec.title,
            site: spec.site.describe(),
            accepts: spec.inbound,
            actions: spec
                .actions
                .iter()
                .map(|action| ActionEntry {
                    id: action.id,
                    key: action.key,
                    label: action.label,
                })
                .collect(),
        }
    }
}

pub fn execute(format: OutputFormat) -> Result<()> {
    tracing::debug!("Listing panels as {}", format.as_str());

    let entries: Vec<PanelEntry> = PanelId::ALL
        .iter()
        .enumerate()
        .map(|(i, id)| PanelEntry::new(i + 1, id.spec()))
        .collect();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Pretty => {
            for entry in &entries {
                println!(
                    "{} {} {}",
                    style(format!("[{}]", entry.key)).bold(),
                    style(entry.title).bold(),
                    style(format!("({})", entry.id)).dim()
                );
                println!("    site:    {}", entry.site);
                println!("    accepts: {}", entry.accepts);
                for action in &entry.actions {
                    println!("    [{}] {:<22} {}", action.key, action.label, style(action.id).dim());
                }
                println!();
            }
        }
    }

    Ok(())
}

use crate::cli::{Cli, Commands};
use crate::domain::models::Checklist;
use crate::services::enricher::{ChecklistEnricher, EnrichOptions};
use crate::services::guard::LinkGuard;
use crate::services::output::{print_one, read_input};
use crate::services::probe::Probe;
use serde_json::Value;

/// Accepts a bare checklist or the `{ "checklist": ... }` envelope the
/// generator endpoint returns.
pub fn parse_checklist(raw: &str) -> anyhow::Result<Checklist> {
    let value: Value = serde_json::from_str(raw)?;
    let value = match value {
        Value::Object(mut map) if map.contains_key("checklist") => {
            map.remove("checklist").unwrap_or_default()
        }
        other => other,
    };
    Ok(serde_json::from_value(value)?)
}

fn render(checklist: &Checklist) -> String {
    let mut lines = Vec::new();
    for c in &checklist.categories {
        for i in &c.items {
            lines.push(format!(
                "{}\t{}\t{}",
                c.category,
                i.id,
                i.link.as_deref().unwrap_or("-")
            ));
        }
    }
    lines.join("\n")
}

pub async fn handle_checklist_commands<P: Probe>(
    cli: &Cli,
    guard: &LinkGuard<P>,
) -> anyhow::Result<bool> {
    let (country, input) = match &cli.command {
        Commands::Sanitize { country, input }
        | Commands::Enrich { country, input }
        | Commands::Process { country, input } => (country, input),
        _ => return Ok(false),
    };

    let checklist = parse_checklist(&read_input(input)?)?;
    let enricher = ChecklistEnricher::new(
        guard,
        EnrichOptions {
            max_concurrency: cli.max_concurrency,
            per_host_limit: cli.per_host_limit,
        },
    );
    let out = match &cli.command {
        Commands::Sanitize { .. } => enricher.sanitize(country, &checklist).await,
        Commands::Enrich { .. } => enricher.enrich(country, &checklist).await,
        _ => enricher.process(country, &checklist).await,
    };
    print_one(cli.json, out, render)?;
    Ok(true)
}

use crate::cli::{Cli, Commands, RegistryCommands};
use crate::domain::models::CountryReport;
use crate::registry::{CountryEntry, Registry};
use crate::services::output::{print_envelope, print_one, print_out};

fn country_report(registry: &Registry, c: &CountryEntry) -> CountryReport {
    CountryReport {
        key: c.key.clone(),
        label: c.display_label().to_string(),
        aliases: c.aliases.clone(),
        hosts: c.hosts.clone(),
        global_hosts: registry.global_hosts().to_vec(),
        fallback: c.fallback.clone(),
        rule_count: c.rules.len(),
    }
}

pub fn handle_registry_commands(cli: &Cli, registry: &Registry) -> anyhow::Result<bool> {
    let Commands::Registry { command } = &cli.command else {
        return Ok(false);
    };

    match command {
        RegistryCommands::List => {
            let reports: Vec<CountryReport> = registry
                .countries()
                .iter()
                .map(|c| country_report(registry, c))
                .collect();
            print_out(cli.json, &reports, |r| {
                format!("{}\t{}\t{}", r.key, r.label, r.hosts.join(","))
            })?;
        }
        RegistryCommands::Show { country } => {
            let Some(entry) = registry.country(country) else {
                anyhow::bail!("unsupported country: {}", country);
            };
            print_one(cli.json, country_report(registry, entry), |r| {
                let mut lines = vec![
                    format!("key: {}", r.key),
                    format!("label: {}", r.label),
                    format!("hosts: {}", r.hosts.join(", ")),
                    format!("global hosts: {}", r.global_hosts.join(", ")),
                    format!("fallback: {}", r.fallback.as_deref().unwrap_or("n/a")),
                    format!("rules: {}", r.rule_count),
                ];
                if !r.aliases.is_empty() {
                    lines.insert(2, format!("aliases: {}", r.aliases.join(", ")));
                }
                lines.join("\n")
            })?;
        }
        RegistryCommands::Lint => {
            let issues = registry.lint();
            print_envelope(cli.json, issues.is_empty(), &issues, |issues| {
                if issues.is_empty() {
                    return "registry clean".to_string();
                }
                issues
                    .iter()
                    .map(|i| format!("{}\t{:?}\t{}", i.scope, i.kind, i.detail))
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
    }

    Ok(true)
}

use crate::cli::{Cli, Commands};
use crate::domain::models::{CheckReport, MatchReport, NormalizeReport};
use crate::services::guard::LinkGuard;
use crate::services::output::{print_one, read_input};
use crate::services::policy::normalize_url;
use crate::services::probe::Probe;
use crate::services::rules::match_rule;
use crate::services::summary::{guard_summary, parse_summary_text};

pub async fn handle_link_commands<P: Probe>(
    cli: &Cli,
    guard: &LinkGuard<P>,
) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Check { country, url } => {
            let accepted = guard.guard_candidate(country, url).await;
            let report = CheckReport {
                country: country.clone(),
                candidate: url.clone(),
                accepted: accepted.is_some(),
                url: accepted,
            };
            print_one(cli.json, report, |r| match &r.url {
                Some(u) => format!("accepted\t{}", u),
                None => "rejected".to_string(),
            })?;
        }
        Commands::Topic { country, candidate } => {
            let decision = guard.guard_topic(country, candidate.as_deref()).await;
            print_one(cli.json, decision, |d| {
                let status = if d.verified { "verified" } else { "unverified" };
                format!("{}\t{}", status, d.url)
            })?;
        }
        Commands::Match { country, text } => {
            let rule = match_rule(guard.registry(), country, text);
            let report = MatchReport {
                country: country.clone(),
                matched: rule.is_some(),
                url: rule.map(|r| r.url.clone()),
                label: rule.and_then(|r| r.label.clone()),
            };
            print_one(cli.json, report, |r| match &r.url {
                Some(u) => format!("{}\t{}", u, r.label.as_deref().unwrap_or("-")),
                None => "no match".to_string(),
            })?;
        }
        Commands::Normalize { url } => {
            let normalized = normalize_url(url);
            let report = NormalizeReport {
                raw: url.clone(),
                valid: normalized.is_some(),
                url: normalized,
            };
            print_one(cli.json, report, |r| {
                r.url.clone().unwrap_or_else(|| "invalid".to_string())
            })?;
        }
        Commands::Summary { country, input } => {
            let text = read_input(input)?;
            let guarded = guard_summary(guard, country, parse_summary_text(&text)).await;
            print_one(cli.json, guarded, |g| {
                let status = if g.link_verified { "verified" } else { "unverified" };
                format!("{}\t{}\n{}", status, g.official_link, g.summary)
            })?;
        }
        _ => return Ok(false),
    }

    Ok(true)
}

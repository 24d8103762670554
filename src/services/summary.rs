use crate::domain::constants::SUMMARY_UNAVAILABLE;
use crate::domain::models::{GuardedSummary, SourceType, VisaSummary};
use crate::services::guard::LinkGuard;
use crate::services::probe::Probe;
use regex::Regex;
use std::sync::OnceLock;

struct SummaryPatterns {
    source_type: Regex,
    summary: Regex,
    link: Regex,
}

fn patterns() -> &'static SummaryPatterns {
    static PATTERNS: OnceLock<SummaryPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| SummaryPatterns {
        source_type: Regex::new(r"(?i)SourceType:\s*(Oficial|N[ãa]o Oficial)")
            .expect("source type pattern compiles"),
        summary: Regex::new(r"(?is)Resumo:\s*(.*?)\s*Link:").expect("summary pattern compiles"),
        link: Regex::new(r"(?i)Link:\s*(https?://\S+)").expect("link pattern compiles"),
    })
}

/// Reads the tagged `SourceType:` / `Resumo:` / `Link:` text the generator
/// returns. Missing parts fall back to "unofficial", a stock message and an
/// empty link.
pub fn parse_summary_text(text: &str) -> VisaSummary {
    let p = patterns();
    let source_type = match p.source_type.captures(text).and_then(|c| c.get(1)) {
        Some(m) if m.as_str().to_lowercase().starts_with("oficial") => SourceType::Official,
        _ => SourceType::Unofficial,
    };
    let summary = p
        .summary
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| SUMMARY_UNAVAILABLE.to_string());
    let official_link = p
        .link
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    VisaSummary {
        summary,
        official_link,
        source_type,
    }
}

/// Swaps the summary's link for a guarded one (fallback anchor if needed).
pub async fn guard_summary<P: Probe>(
    guard: &LinkGuard<P>,
    country: &str,
    summary: VisaSummary,
) -> GuardedSummary {
    let candidate = Some(summary.official_link.as_str()).filter(|l| !l.trim().is_empty());
    let decision = guard.guard_topic(country, candidate).await;
    GuardedSummary {
        summary: summary.summary,
        source_type: summary.source_type,
        official_link: decision.url,
        link_verified: decision.verified,
        link_title: decision.title,
    }
}

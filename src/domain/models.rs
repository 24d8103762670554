use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Generated checklists sometimes carry `null` where a value is expected;
/// treat it like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

/// Outcome of a single reachability probe. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub reachable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
}

impl ValidationResult {
    pub fn unreachable() -> Self {
        Self::default()
    }

    pub fn reachable(final_url: impl Into<String>, page_title: Option<String>) -> Self {
        Self {
            reachable: true,
            final_url: Some(final_url.into()),
            page_title,
        }
    }
}

/// What callers get back from a topic lookup. `verified == false` means the
/// url is best-effort (usually the raw fallback anchor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardDecision {
    pub url: String,
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A text pattern pointing at an official page. `terms` are phrases matched on
/// whole words after case and accent folding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub terms: Vec<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Checklist {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub introduction: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<ChecklistCategory>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub disclaimer: String,
    /// `id`, `createdAt`, `userId` and anything else the collaborators attach.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Checklist {
    pub fn with_categories(&self, categories: Vec<ChecklistCategory>) -> Self {
        Self {
            title: self.title.clone(),
            introduction: self.introduction.clone(),
            categories,
            disclaimer: self.disclaimer.clone(),
            extra: self.extra.clone(),
        }
    }

    pub fn items(&self) -> impl Iterator<Item = &ChecklistItem> {
        self.categories.iter().flat_map(|c| c.items.iter())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChecklistCategory {
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<ChecklistItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChecklistCategory {
    pub fn with_items(&self, items: Vec<ChecklistItem>) -> Self {
        Self {
            category: self.category.clone(),
            items,
            extra: self.extra.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub task: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub details: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub checked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(
        rename = "ctaLabel",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub cta_label: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChecklistItem {
    /// The link, if it carries anything but whitespace.
    pub fn present_link(&self) -> Option<&str> {
        self.link.as_deref().map(str::trim).filter(|l| !l.is_empty())
    }

    pub fn with_link(&self, link: String, cta_label: Option<String>) -> Self {
        Self {
            link: Some(link),
            cta_label,
            ..self.clone()
        }
    }

    pub fn without_link(&self) -> Self {
        Self {
            link: None,
            cta_label: None,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    #[serde(rename = "Oficial")]
    Official,
    #[serde(rename = "Não Oficial")]
    Unofficial,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisaSummary {
    pub summary: String,
    #[serde(rename = "officialLink")]
    pub official_link: String,
    #[serde(rename = "sourceType")]
    pub source_type: SourceType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuardedSummary {
    pub summary: String,
    #[serde(rename = "sourceType")]
    pub source_type: SourceType,
    #[serde(rename = "officialLink")]
    pub official_link: String,
    #[serde(rename = "linkVerified")]
    pub link_verified: bool,
    #[serde(rename = "linkTitle", skip_serializing_if = "Option::is_none")]
    pub link_title: Option<String>,
}

#[derive(Serialize)]
pub struct CheckReport {
    pub country: String,
    pub candidate: String,
    pub accepted: bool,
    pub url: Option<String>,
}

#[derive(Serialize)]
pub struct MatchReport {
    pub country: String,
    pub matched: bool,
    pub url: Option<String>,
    pub label: Option<String>,
}

#[derive(Serialize)]
pub struct NormalizeReport {
    pub raw: String,
    pub valid: bool,
    pub url: Option<String>,
}

#[derive(Serialize)]
pub struct CountryReport {
    pub key: String,
    pub label: String,
    pub aliases: Vec<String>,
    pub hosts: Vec<String>,
    pub global_hosts: Vec<String>,
    pub fallback: Option<String>,
    pub rule_count: usize,
}

//! Free text to official-page rule matching.
//!
//! Rules are plain data (see `assets/registry.toml`); nothing here depends on a
//! regex engine. Text and terms are folded the same way (lowercase, diacritics
//! stripped, punctuation collapsed to single spaces) and a term matches when it
//! occurs as a whole-word phrase.

use crate::domain::models::{ChecklistItem, Rule};
use crate::registry::Registry;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

pub fn fold_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.nfd().filter(|c| !is_combining_mark(*c)) {
        if ch.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_space = true;
        }
    }
    out
}

impl Rule {
    /// `folded` must come from [`fold_text`].
    pub fn matches_folded(&self, folded: &str) -> bool {
        let haystack = format!(" {} ", folded);
        self.terms
            .iter()
            .filter(|t| !t.is_empty())
            .any(|t| haystack.contains(&format!(" {} ", t)))
    }

    pub fn matches(&self, text: &str) -> bool {
        self.matches_folded(&fold_text(text))
    }
}

/// Text a checklist item is matched on: id, task and details.
pub fn item_text(item: &ChecklistItem) -> String {
    format!("{} {} {}", item.id, item.task, item.details)
}

/// First rule matching `text`: the country's rules in order, then global ones.
pub fn match_rule<'a>(registry: &'a Registry, country: &str, text: &str) -> Option<&'a Rule> {
    let folded = fold_text(text);
    registry
        .country_rules(country)
        .iter()
        .chain(registry.global_rules())
        .find(|rule| rule.matches_folded(&folded))
}

pub fn match_item<'a>(
    registry: &'a Registry,
    country: &str,
    item: &ChecklistItem,
) -> Option<&'a Rule> {
    match_rule(registry, country, &item_text(item))
}

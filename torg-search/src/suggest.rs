//! Autosuggest: typeahead title suggestions.

use serde::{Deserialize, Serialize};
use torg_core::config::defaults::MAX_SUGGEST_LIMIT;
use torg_core::traits::{IProductRepository, TextField};
use torg_core::TorgResult;

/// One typeahead suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    pub title: String,
    pub brand: String,
}

/// Title suggestions for a prefix. Titles starting with the prefix rank
/// before titles merely containing it; both groups order alphabetically.
/// The limit clamps to 1..=25. Candidates are distinct products, so the
/// output is deduplicated by id by construction.
pub fn autosuggest(
    repository: &dyn IProductRepository,
    prefix: &str,
    limit: usize,
) -> TorgResult<Vec<Suggestion>> {
    let needle = prefix.trim().to_lowercase();
    if needle.is_empty() {
        return Ok(Vec::new());
    }
    let limit = limit.clamp(1, MAX_SUGGEST_LIMIT);

    let candidates = repository.find_by_text_match(&[TextField::Title], &needle)?;

    let mut starts: Vec<Suggestion> = Vec::new();
    let mut contains: Vec<Suggestion> = Vec::new();
    for product in candidates {
        let suggestion = Suggestion {
            id: product.id,
            title: product.title,
            brand: product.brand,
        };
        if suggestion.title.to_lowercase().starts_with(&needle) {
            starts.push(suggestion);
        } else {
            contains.push(suggestion);
        }
    }

    starts.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
    contains.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));

    starts.extend(contains);
    starts.truncate(limit);
    Ok(starts)
}

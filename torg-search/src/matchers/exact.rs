//! Exact strategy: whole-token, word-boundary matching.

use regex::Regex;
use torg_core::constants::EXACT_MATCH_SCORE;
use torg_core::errors::SearchError;
use torg_core::models::{slugify, MatchType, Product, ProductHit};
use torg_core::traits::{IProductRepository, TextField};
use torg_core::TorgResult;

use crate::fuser;

/// Fields the exact strategy tests, besides the derived category slug.
const EXACT_FIELDS: [TextField; 4] = [
    TextField::Title,
    TextField::Description,
    TextField::Brand,
    TextField::ProductType,
];

/// Word-boundary matcher. Every hit scores 1.0; ordering within the
/// strategy falls back to stock and id.
pub struct ExactMatcher {
    cap: usize,
}

impl ExactMatcher {
    pub fn new(cap: usize) -> Self {
        Self { cap }
    }

    pub fn run(
        &self,
        repository: &dyn IProductRepository,
        normalized_query: &str,
    ) -> TorgResult<Vec<ProductHit>> {
        let pattern = phrase_regex(normalized_query)?;
        let candidates = fetch_candidates(repository, normalized_query)?;

        let mut hits: Vec<ProductHit> = candidates
            .into_iter()
            .filter(|p| matches_exactly(p, &pattern, normalized_query))
            .map(|p| ProductHit::new(p, EXACT_MATCH_SCORE, MatchType::Exact))
            .collect();

        fuser::rank_hits(&mut hits);
        hits.truncate(self.cap);
        Ok(hits)
    }
}

/// Compile the case-insensitive word-boundary pattern for a query phrase.
///
/// `\b` never matches next to a non-word character, so the boundary
/// assertions are only emitted where the phrase actually starts or ends
/// with a word character.
pub(crate) fn phrase_regex(normalized_query: &str) -> TorgResult<Regex> {
    let mut pattern = String::from("(?i)");
    if normalized_query.chars().next().is_some_and(is_word_char) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&regex::escape(normalized_query));
    if normalized_query.chars().last().is_some_and(is_word_char) {
        pattern.push_str(r"\b");
    }

    Regex::new(&pattern).map_err(|e| {
        SearchError::StrategyFailed {
            strategy: "exact".to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether a product is an exact match for the query: the phrase occurs on
/// word boundaries in a text field, or the query names the category slug.
pub(crate) fn matches_exactly(product: &Product, pattern: &Regex, normalized_query: &str) -> bool {
    pattern.is_match(&product.title)
        || pattern.is_match(&product.description)
        || pattern.is_match(&product.brand)
        || pattern.is_match(&product.product_type)
        || (!product.product_type.is_empty() && product.category_slug() == slugify(normalized_query))
}

/// Substring prefilter through the repository. A hyphenated query gets a
/// second, de-hyphenated pass so slug-shaped input like "rain-gear" still
/// reaches the "Rain Gear" category.
fn fetch_candidates(
    repository: &dyn IProductRepository,
    normalized_query: &str,
) -> TorgResult<Vec<Product>> {
    let mut candidates = repository.find_by_text_match(&EXACT_FIELDS, normalized_query)?;

    if normalized_query.contains('-') {
        let spaced = normalized_query.replace('-', " ");
        let extra = repository.find_by_text_match(&EXACT_FIELDS, &spaced)?;
        for product in extra {
            if !candidates.iter().any(|p| p.id == product.id) {
                candidates.push(product);
            }
        }
    }

    Ok(candidates)
}

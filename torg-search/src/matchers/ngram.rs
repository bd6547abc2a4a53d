//! Ngram strategy: substring matching over the gram window.
//!
//! Candidates come from one repository scan per token seed (the leading
//! gram of each query token, capped at the window maximum). Scoring finds
//! the longest run of the query contained in a field, so "metaldetector"
//! still reaches "Metal Detector" through its shared "detector" run.
//! Products that already match on word boundaries are left to the exact
//! strategy so the two never fight over the same hit.

use std::collections::HashMap;

use torg_core::constants::{NGRAM_BASE_SCORE, NGRAM_SCORE_CEILING};
use torg_core::models::{MatchType, Product, ProductHit};
use torg_core::traits::{IProductRepository, TextField};
use torg_core::TorgResult;

use crate::fuser;
use crate::matchers::exact;

const NGRAM_FIELDS: [TextField; 3] = [TextField::Title, TextField::Description, TextField::Brand];

/// Substring matcher with gram-window candidate seeding.
pub struct NgramMatcher {
    cap: usize,
    min_gram: usize,
    max_gram: usize,
}

impl NgramMatcher {
    pub fn new(cap: usize, min_gram: usize, max_gram: usize) -> Self {
        Self {
            cap,
            min_gram,
            max_gram,
        }
    }

    pub fn run(
        &self,
        repository: &dyn IProductRepository,
        normalized_query: &str,
    ) -> TorgResult<Vec<ProductHit>> {
        if normalized_query.chars().count() < self.min_gram {
            return Ok(Vec::new());
        }

        let pattern = exact::phrase_regex(normalized_query)?;

        let mut by_id: HashMap<String, Product> = HashMap::new();
        for seed in self.seeds(normalized_query) {
            for product in repository.find_by_text_match(&NGRAM_FIELDS, &seed)? {
                by_id.entry(product.id.clone()).or_insert(product);
            }
        }

        let mut hits: Vec<ProductHit> = by_id
            .into_values()
            .filter(|p| !exact::matches_exactly(p, &pattern, normalized_query))
            .filter_map(|p| {
                self.score(&p, normalized_query)
                    .map(|s| ProductHit::new(p, s, MatchType::Ngram))
            })
            .collect();

        fuser::rank_hits(&mut hits);
        hits.truncate(self.cap);
        Ok(hits)
    }

    /// Candidate seeds: the leading gram of each token, capped at the
    /// window maximum. Falls back to the whole query when no token reaches
    /// the minimum gram size.
    fn seeds(&self, normalized_query: &str) -> Vec<String> {
        let mut seeds: Vec<String> = Vec::new();
        for token in normalized_query.split_whitespace() {
            let count = token.chars().count();
            if count < self.min_gram {
                continue;
            }
            let seed: String = token.chars().take(count.min(self.max_gram)).collect();
            if !seeds.contains(&seed) {
                seeds.push(seed);
            }
        }
        if seeds.is_empty() {
            seeds.push(normalized_query.to_string());
        }
        seeds
    }

    /// Base score plus the best per-field coverage bonus, capped below the
    /// exact score. Coverage is the longest contained run of the query over
    /// the field length, so short fields dominated by the match score high.
    fn score(&self, product: &Product, needle: &str) -> Option<f64> {
        let fields = [&product.title, &product.description, &product.brand];

        let mut best: Option<f64> = None;
        for field in fields {
            if field.is_empty() {
                continue;
            }
            let haystack = field.to_lowercase();
            let Some(run) = longest_contained_run(needle, &haystack, self.min_gram) else {
                continue;
            };
            let coverage = run as f64 / field.chars().count() as f64;
            best = Some(best.map_or(coverage, |c: f64| c.max(coverage)));
        }

        best.map(|c| (NGRAM_BASE_SCORE + c).min(NGRAM_SCORE_CEILING))
    }
}

/// Length (in chars) of the longest substring of `needle`, at least
/// `min_len` chars, contained in `haystack`. Longest-first scan over
/// char-boundary windows.
fn longest_contained_run(needle: &str, haystack: &str, min_len: usize) -> Option<usize> {
    let bounds: Vec<usize> = needle
        .char_indices()
        .map(|(i, _)| i)
        .chain([needle.len()])
        .collect();
    let total = bounds.len() - 1;
    if total < min_len {
        return None;
    }

    for len in (min_len..=total).rev() {
        for start in 0..=(total - len) {
            let window = &needle[bounds[start]..bounds[start + len]];
            if haystack.contains(window) {
                return Some(len);
            }
        }
    }
    None
}

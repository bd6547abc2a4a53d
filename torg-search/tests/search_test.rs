//! End-to-end search pipeline tests against in-memory storage and the
//! deterministic embedder.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use torg_core::config::{EmbeddingConfig, SearchConfig};
use torg_core::models::{MatchType, Product};
use torg_core::traits::{IEmbedder, IProductRepository};
use torg_core::{TorgError, TorgResult};
use torg_embeddings::EmbeddingEngine;
use torg_search::{SearchEngine, SearchRequest};
use torg_storage::StorageEngine;

const DIM: usize = 64;

fn make_product(id: &str, title: &str, brand: &str, product_type: &str, stock: i64) -> Product {
    Product {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("{title} description"),
        brand: brand.to_string(),
        color: "blue".to_string(),
        age_bucket: "3-5".to_string(),
        product_type: product_type.to_string(),
        seasons: vec!["winter".to_string()],
        season_relevancy_factor: 0.5,
        price_original: 100.0,
        price_current: 100.0,
        is_on_sale: false,
        stock_level: stock,
        title_embedding: None,
        description_embedding: None,
    }
}

fn embedder() -> Arc<EmbeddingEngine> {
    let config = EmbeddingConfig {
        dimension: DIM,
        ..EmbeddingConfig::default()
    };
    Arc::new(EmbeddingEngine::new(&config).unwrap())
}

/// Storage seeded with a small catalog, titles and descriptions embedded.
fn seeded_repository(products: &[Product]) -> Arc<StorageEngine> {
    let storage = StorageEngine::open_in_memory(DIM).unwrap();
    let embedder = embedder();
    for product in products {
        let mut p = product.clone();
        p.title_embedding = Some(embedder.embed(&p.title).unwrap());
        p.description_embedding = Some(embedder.embed(&p.description).unwrap());
        storage.upsert_product(&p).unwrap();
    }
    Arc::new(storage)
}

fn catalog() -> Vec<Product> {
    vec![
        make_product(
            "p1",
            "Professional Metal Detector",
            "DetectoPro",
            "Metal Detectors",
            7,
        ),
        make_product("p2", "Warm Winter Jacket", "NordicWear", "Jackets", 12),
        make_product("p3", "Light Summer Jacket", "NordicWear", "Jackets", 3),
        make_product("p4", "Øyeskygge Palett", "GlamNord", "Makeup", 5),
        make_product("p5", "Vinterjakke Barn", "NordicWear", "Jackets", 9),
    ]
}

fn engine_with(products: &[Product]) -> SearchEngine {
    let repository = seeded_repository(products);
    SearchEngine::new(repository, embedder(), SearchConfig::default())
}

fn text_only(query: &str) -> SearchRequest {
    let mut request = SearchRequest::new(query);
    request.include_vector_search = false;
    request
}

#[tokio::test]
async fn exact_match_ranks_first_with_full_score() {
    let engine = engine_with(&catalog());
    let outcome = engine
        .consolidated_search(&text_only("metal detector"))
        .await
        .unwrap();

    assert!(!outcome.products.is_empty());
    assert_eq!(outcome.products[0].product.id, "p1");
    assert_eq!(outcome.products[0].score, 1.0);
    assert_eq!(outcome.products[0].match_type, MatchType::Exact);
}

#[tokio::test]
async fn partial_token_is_an_ngram_match() {
    let engine = engine_with(&catalog());
    let outcome = engine.consolidated_search(&text_only("met")).await.unwrap();

    let hit = outcome
        .products
        .iter()
        .find(|h| h.product.id == "p1")
        .expect("metal detector should match");
    assert_eq!(hit.match_type, MatchType::Ngram);
    assert!(hit.score >= 0.8);
    assert!(hit.score < 1.0);
}

#[tokio::test]
async fn short_query_is_rejected() {
    let engine = engine_with(&catalog());
    let err = engine
        .consolidated_search(&SearchRequest::new("ab"))
        .await
        .unwrap_err();
    assert!(matches!(err, TorgError::Validation { .. }));
}

#[tokio::test]
async fn grouped_categories_and_brands_are_counted() {
    let engine = engine_with(&catalog());
    let outcome = engine
        .consolidated_search(&text_only("jacket"))
        .await
        .unwrap();

    // p2, p3 and p5 all sit in the "Jackets" category.
    let jackets = outcome
        .categories
        .iter()
        .find(|c| c.slug == "jackets")
        .expect("jackets category");
    assert_eq!(jackets.product_count, 3);
    assert_eq!(jackets.name, "Jackets");
    assert_eq!(jackets.id, jackets.slug);
    // "jacket" names no brand.
    assert!(outcome.brands.is_empty());
}

#[tokio::test]
async fn brand_queries_group_by_brand() {
    let engine = engine_with(&catalog());
    let outcome = engine
        .consolidated_search(&text_only("nordicwear"))
        .await
        .unwrap();

    let brand = outcome
        .brands
        .iter()
        .find(|b| b.name == "NordicWear")
        .expect("NordicWear brand");
    assert_eq!(brand.id, "nordicwear");
    assert_eq!(brand.product_count, 3);
}

#[tokio::test]
async fn unicode_queries_fold_correctly() {
    let engine = engine_with(&catalog());
    let outcome = engine
        .consolidated_search(&text_only("ØYESKYGGE"))
        .await
        .unwrap();

    assert_eq!(outcome.products[0].product.id, "p4");
    assert_eq!(outcome.products[0].match_type, MatchType::Exact);
}

#[tokio::test]
async fn hits_never_carry_embeddings() {
    let engine = engine_with(&catalog());
    let outcome = engine
        .consolidated_search(&text_only("jacket"))
        .await
        .unwrap();

    for hit in &outcome.products {
        assert!(hit.product.title_embedding.is_none());
        assert!(hit.product.description_embedding.is_none());
    }
}

#[tokio::test]
async fn equal_scores_break_ties_by_stock_then_id() {
    let engine = engine_with(&catalog());
    let outcome = engine
        .consolidated_search(&text_only("jacket"))
        .await
        .unwrap();

    // Both jackets match "jacket" exactly; higher stock first.
    let ids: Vec<&str> = outcome
        .products
        .iter()
        .filter(|h| h.match_type == MatchType::Exact)
        .map(|h| h.product.id.as_str())
        .collect();
    assert_eq!(ids, vec!["p2", "p3"]);
}

#[tokio::test]
async fn facets_describe_the_pre_truncation_set() {
    let engine = engine_with(&catalog());
    let mut request = text_only("jacket");
    request.max_products = 1;

    let outcome = engine.product_search(&request).await.unwrap();

    assert_eq!(outcome.products.len(), 1);
    assert!(outcome.total_results >= 2);
    let brand_total: usize = outcome.facets.brand.iter().map(|b| b.count).sum();
    assert_eq!(brand_total, outcome.total_results);
}

#[tokio::test]
async fn exact_and_vector_overlap_dedups_to_exact() {
    let engine = engine_with(&catalog());
    // Identical text embeds identically, so the vector strategy also finds
    // p2 with similarity 1.0. Fusion must keep a single exact hit.
    let outcome = engine
        .consolidated_search(&SearchRequest::new("warm winter jacket"))
        .await
        .unwrap();

    let matches: Vec<_> = outcome
        .products
        .iter()
        .filter(|h| h.product.id == "p2")
        .collect();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].match_type, MatchType::Exact);
}

struct CountingEmbedder {
    inner: Arc<EmbeddingEngine>,
    calls: AtomicUsize,
}

impl IEmbedder for CountingEmbedder {
    fn embed(&self, text: &str) -> TorgResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.embed(text)
    }

    fn embed_batch(&self, texts: &[String]) -> TorgResult<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.embed_batch(texts)
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn name(&self) -> &str {
        "counting"
    }
}

#[tokio::test]
async fn single_token_query_never_embeds() {
    let repository = seeded_repository(&catalog());
    let counting = Arc::new(CountingEmbedder {
        inner: embedder(),
        calls: AtomicUsize::new(0),
    });
    let engine = SearchEngine::new(
        repository,
        Arc::clone(&counting) as Arc<dyn IEmbedder>,
        SearchConfig::default(),
    );

    let outcome = engine
        .consolidated_search(&SearchRequest::new("vinterjakke"))
        .await
        .unwrap();

    assert!(!outcome.products.is_empty());
    assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
}

struct BrokenEmbedder;

impl IEmbedder for BrokenEmbedder {
    fn embed(&self, _text: &str) -> TorgResult<Vec<f32>> {
        Err(torg_core::errors::EmbeddingError::Timeout { timeout_ms: 1 }.into())
    }

    fn embed_batch(&self, _texts: &[String]) -> TorgResult<Vec<Vec<f32>>> {
        Err(torg_core::errors::EmbeddingError::Timeout { timeout_ms: 1 }.into())
    }

    fn dimension(&self) -> usize {
        DIM
    }

    fn name(&self) -> &str {
        "broken"
    }
}

#[tokio::test]
async fn embedder_failure_degrades_to_text_strategies() {
    let repository = seeded_repository(&catalog());
    let engine = SearchEngine::new(repository, Arc::new(BrokenEmbedder), SearchConfig::default());

    let outcome = engine
        .consolidated_search(&SearchRequest::new("metal detector"))
        .await
        .unwrap();

    assert_eq!(outcome.products[0].product.id, "p1");
    assert_eq!(outcome.products[0].match_type, MatchType::Exact);
}

#[tokio::test]
async fn explain_reports_plan_and_counts() {
    let engine = engine_with(&catalog());
    let explain = engine.explain("Metal Detector", true).await.unwrap();

    assert_eq!(explain.normalized_query, "metal detector");
    assert_eq!(explain.tokens, vec!["metal", "detector"]);
    assert_eq!(explain.strategies.len(), 3);

    let exact = explain
        .strategies
        .iter()
        .find(|s| s.strategy == MatchType::Exact)
        .unwrap();
    assert!(exact.matched >= 1);
    assert!(!exact.degraded);
    assert_eq!(exact.top_candidates[0].product_id, "p1");
    assert_eq!(exact.top_candidates[0].score, 1.0);

    let sample = explain.embedding_sample.expect("vector was planned");
    assert_eq!(sample.len(), 10);
}

#[tokio::test]
async fn explain_omits_embedding_sample_without_vector() {
    let engine = engine_with(&catalog());
    let explain = engine.explain("metal detector", false).await.unwrap();
    assert_eq!(explain.strategies.len(), 2);
    assert!(explain.embedding_sample.is_none());
}

#[tokio::test]
async fn autosuggest_puts_prefix_matches_first() {
    let engine = engine_with(&catalog());
    let suggestions = engine.autosuggest("vinter", None).await.unwrap();

    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0].title, "Vinterjakke Barn");
}

#[tokio::test]
async fn autosuggest_clamps_limit() {
    let engine = engine_with(&catalog());
    let suggestions = engine.autosuggest("jacket", Some(1000)).await.unwrap();
    assert!(suggestions.len() <= 25);
}

#[tokio::test]
async fn autosuggest_blank_prefix_is_empty() {
    let engine = engine_with(&catalog());
    let suggestions = engine.autosuggest("   ", None).await.unwrap();
    assert!(suggestions.is_empty());
}

//! End-to-end handler tests against an in-memory runtime: search grouping,
//! facets, caching, recommendations, ingestion, and the meta endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{TimeZone, Utc};

use torg_api::dto::{
    AutosuggestRequest, ConsolidatedSearchRequest, FeedbackRequest, ProductSearchRequest,
    QueryExplainRequest, RecommendQuery, SimilarRequest,
};
use torg_api::handlers::{ingest, meta, recommend, search};
use torg_api::TorgRuntime;
use torg_core::config::TorgConfig;
use torg_core::models::{Facets, MatchType, Orderline, PairIndexPhase, Product};
use torg_observability::HealthStatus;

fn runtime() -> Arc<TorgRuntime> {
    Arc::new(TorgRuntime::from_config(&TorgConfig::default()).unwrap())
}

fn app_state(runtime: &Arc<TorgRuntime>) -> State<Arc<TorgRuntime>> {
    State(Arc::clone(runtime))
}

fn product(
    id: &str,
    title: &str,
    description: &str,
    brand: &str,
    product_type: &str,
    stock: i64,
) -> Product {
    Product {
        id: id.into(),
        title: title.into(),
        description: description.into(),
        brand: brand.into(),
        color: String::new(),
        age_bucket: String::new(),
        product_type: product_type.into(),
        seasons: Vec::new(),
        season_relevancy_factor: 0.0,
        price_original: 499.0,
        price_current: 499.0,
        is_on_sale: false,
        stock_level: stock,
        title_embedding: None,
        description_embedding: None,
    }
}

/// Five products across three brands. p2/p3/p5 share the Jackets type so
/// grouping and facets have something to aggregate.
fn catalog() -> Vec<Product> {
    let mut p1 = product(
        "p1",
        "Professional Metal Detector",
        "Liquid crystal display and ergonomic grip",
        "DetectoPro",
        "Metal Detectors",
        7,
    );
    p1.seasons = vec!["summer".into()];
    p1.season_relevancy_factor = 0.4;

    let mut p2 = product(
        "p2",
        "Warm Winter Jacket",
        "Insulated jacket for cold days",
        "NordicWear",
        "Jackets",
        12,
    );
    p2.seasons = vec!["winter".into()];
    p2.season_relevancy_factor = 0.6;
    p2.color = "blue".into();

    let mut p3 = product(
        "p3",
        "Fleecejakke Turdress",
        "Myk fleecejakke til tur og lek",
        "NordicWear",
        "Jackets",
        3,
    );
    p3.seasons = vec!["winter".into()];
    p3.season_relevancy_factor = 0.8;
    p3.color = "red".into();
    p3.is_on_sale = true;
    p3.price_current = 399.0;

    let mut p4 = product(
        "p4",
        "Øyeskygge Palett",
        "Tolv matte nyanser",
        "GlamNord",
        "Makeup",
        5,
    );
    p4.color = "purple".into();

    let mut p5 = product(
        "p5",
        "Vinterjakke Barn",
        "Slitesterk vinterjakke for aktive barn",
        "NordicWear",
        "Jackets",
        9,
    );
    p5.age_bucket = "1 to 3 years".into();
    p5.color = "blue".into();

    vec![p1, p2, p3, p4, p5]
}

fn orderline(order: &str, product: &str, customer: &str, seq: i64) -> Orderline {
    let base = Utc.with_ymd_and_hms(2024, 11, 1, 12, 0, 0).unwrap();
    Orderline {
        order_nr: order.into(),
        product_nr: product.into(),
        customer_nr: customer.into(),
        season_name: "winter".into(),
        date_time: base + chrono::Duration::seconds(seq),
    }
}

async fn seed_catalog(runtime: &Arc<TorgRuntime>) {
    let (status, Json(outcome)) =
        ingest::ingest_products(app_state(runtime), Json(catalog())).await.unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(outcome.ingested.len(), 5);
    assert!(outcome.failed.is_empty());
}

/// Orders o1 {p1,p2} and o2 {p1,p3} yield the pairs (p1,p2) and (p1,p3);
/// o3 is a single-item order for customer c3.
async fn seed_orders(runtime: &Arc<TorgRuntime>) {
    let lines = [
        ("o1", "p1", "c1"),
        ("o1", "p2", "c1"),
        ("o2", "p1", "c2"),
        ("o2", "p3", "c2"),
        ("o3", "p1", "c3"),
    ];
    for (seq, (order, product, customer)) in lines.into_iter().enumerate() {
        let (status, Json(body)) = ingest::ingest_orderline(
            app_state(runtime),
            Json(orderline(order, product, customer, seq as i64)),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.status, "recorded");
    }
}

fn ids(recommendations: &[torg_core::models::RecommendedProduct]) -> Vec<&str> {
    recommendations.iter().map(|r| r.product.id.as_str()).collect()
}

#[tokio::test]
async fn consolidated_search_groups_categories_products_and_metadata() {
    let rt = runtime();
    seed_catalog(&rt).await;

    let request = ConsolidatedSearchRequest {
        query: "jackets".into(),
        ..Default::default()
    };
    let Json(response) = search::consolidated_search(app_state(&rt), Json(request))
        .await
        .unwrap();

    let hit_ids: Vec<&str> = response.products.iter().map(|h| h.product.id.as_str()).collect();
    assert_eq!(hit_ids, ["p2", "p5", "p3"], "score ties break on stock");
    assert!(response
        .products
        .iter()
        .all(|h| h.match_type == MatchType::Exact));

    assert_eq!(response.categories.len(), 1);
    assert_eq!(response.categories[0].id, "jackets");
    assert_eq!(response.categories[0].name, "Jackets");
    assert_eq!(response.categories[0].product_count, 3);
    assert!(response.brands.is_empty());

    assert_eq!(response.metadata.total_results, 3);
    assert_eq!(response.metadata.query, "jackets");
}

#[tokio::test]
async fn consolidated_search_groups_brands() {
    let rt = runtime();
    seed_catalog(&rt).await;

    let request = ConsolidatedSearchRequest {
        query: "nordicwear".into(),
        ..Default::default()
    };
    let Json(response) = search::consolidated_search(app_state(&rt), Json(request))
        .await
        .unwrap();

    assert_eq!(response.brands.len(), 1);
    assert_eq!(response.brands[0].id, "nordicwear");
    assert_eq!(response.brands[0].name, "NordicWear");
    assert_eq!(response.brands[0].product_count, 3);
    assert!(response.categories.is_empty());
    assert_eq!(response.products.len(), 3);
}

#[tokio::test]
async fn consolidated_search_rejects_short_queries() {
    let rt = runtime();
    seed_catalog(&rt).await;

    let request = ConsolidatedSearchRequest {
        query: "  ab  ".into(),
        ..Default::default()
    };
    let err = search::consolidated_search(app_state(&rt), Json(request))
        .await
        .unwrap_err();
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn substring_match_reports_ngram_strategy() {
    let rt = runtime();
    seed_catalog(&rt).await;

    // "met" sits inside "Metal" without a word boundary, so the exact
    // strategy misses and the ngram strategy picks it up.
    let request = ConsolidatedSearchRequest {
        query: "met".into(),
        ..Default::default()
    };
    let Json(response) = search::consolidated_search(app_state(&rt), Json(request))
        .await
        .unwrap();

    assert_eq!(response.products.len(), 1);
    assert_eq!(response.products[0].product.id, "p1");
    assert_eq!(response.products[0].match_type, MatchType::Ngram);
    assert_eq!(response.categories.len(), 1);
    assert_eq!(response.categories[0].slug, "metal-detectors");
}

#[tokio::test]
async fn product_search_returns_facets_over_the_matched_set() {
    let rt = runtime();
    seed_catalog(&rt).await;

    let request = ProductSearchRequest {
        query: "jackets".into(),
        ..Default::default()
    };
    let Json(response) = search::product_search(app_state(&rt), Json(request))
        .await
        .unwrap();

    assert_eq!(response.products.len(), 3);
    assert_eq!(response.metadata.total_results, 3);

    let facets = &response.facets;
    assert_eq!(facets.brand.len(), 1);
    assert_eq!(facets.brand[0].value, "NordicWear");
    assert_eq!(Facets::total(&facets.brand), 3);

    let colors: Vec<(&str, usize)> = facets
        .color
        .iter()
        .map(|b| (b.value.as_str(), b.count))
        .collect();
    assert_eq!(colors, [("blue", 2), ("red", 1)]);

    // p5 is the only jacket with an age bucket; empty values never facet.
    assert_eq!(facets.age_bucket.len(), 1);
    assert_eq!(facets.age_bucket[0].value, "1 to 3 years");
    assert_eq!(facets.seasons, vec![torg_core::models::FacetBucket {
        value: "winter".into(),
        count: 2,
    }]);
}

#[tokio::test]
async fn autosuggest_returns_bare_suggestions() {
    let rt = runtime();
    seed_catalog(&rt).await;

    let request = AutosuggestRequest {
        prefix: "jakke".into(),
        limit: None,
    };
    let Json(suggestions) = search::autosuggest(app_state(&rt), Json(request))
        .await
        .unwrap();
    let suggested: Vec<&str> = suggestions.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(suggested, ["p3", "p5"], "in-title matches order alphabetically");

    let request = AutosuggestRequest {
        prefix: "warm".into(),
        limit: Some(5),
    };
    let Json(suggestions) = search::autosuggest(app_state(&rt), Json(request))
        .await
        .unwrap();
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].id, "p2");
    assert_eq!(suggestions[0].title, "Warm Winter Jacket");
    assert_eq!(suggestions[0].brand, "NordicWear");
}

#[tokio::test]
async fn repeated_search_hits_the_cache_and_feeds_metrics() {
    let rt = runtime();
    seed_catalog(&rt).await;

    let request = ConsolidatedSearchRequest {
        query: "jackets".into(),
        ..Default::default()
    };
    let Json(first) = search::consolidated_search(app_state(&rt), Json(request.clone()))
        .await
        .unwrap();
    let Json(second) = search::consolidated_search(app_state(&rt), Json(request))
        .await
        .unwrap();

    let first_ids: Vec<&str> = first.products.iter().map(|h| h.product.id.as_str()).collect();
    let second_ids: Vec<&str> = second.products.iter().map(|h| h.product.id.as_str()).collect();
    assert_eq!(first_ids, second_ids);

    let Json(stats) = meta::api_stats(app_state(&rt)).await.unwrap();
    assert_eq!(stats.cache.search.hits, 1);
    assert_eq!(stats.cache.search.misses, 1);
    assert_eq!(stats.metrics.total_searches, 2);
    assert_eq!(stats.metrics.recorded_searches, 2);
    assert!((stats.metrics.cache_hit_rate - 0.5).abs() < 1e-9);
    assert_eq!(stats.metrics.popular_queries[0].query, "jackets");
    assert_eq!(stats.metrics.popular_queries[0].count, 2);
}

#[tokio::test]
async fn similar_rejects_unknown_product_and_algorithm() {
    let rt = runtime();
    seed_catalog(&rt).await;

    let err = recommend::similar(
        app_state(&rt),
        Path("ghost".to_string()),
        Json(SimilarRequest::default()),
    )
    .await
    .unwrap_err();
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

    let err = recommend::similar(
        app_state(&rt),
        Path("p1".to_string()),
        Json(SimilarRequest {
            algorithm: "pagerank".into(),
            ..Default::default()
        }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn similar_co_occurrence_applies_seasonal_boosts() {
    let rt = runtime();
    seed_catalog(&rt).await;
    seed_orders(&rt).await;

    let request = SimilarRequest {
        algorithm: "co_occurrence".into(),
        limit: None,
        season: Some("winter".into()),
    };
    let Json(similar) = recommend::similar(app_state(&rt), Path("p1".to_string()), Json(request))
        .await
        .unwrap();

    // Both candidates co-occur once with p1. p3 collects relevancy 0.8,
    // the stock boost and the sale boost; p2 collects 0.6 plus stock.
    assert_eq!(ids(&similar), ["p3", "p2"]);
    assert!((similar[0].score - 2.3).abs() < 1e-9);
    assert!((similar[1].score - 1.9).abs() < 1e-9);
}

#[tokio::test]
async fn similar_by_embedding_favors_matching_type_and_brand() {
    let rt = runtime();
    seed_catalog(&rt).await;

    let request = SimilarRequest {
        algorithm: "embedding".into(),
        limit: Some(4),
        season: None,
    };
    let Json(similar) = recommend::similar(app_state(&rt), Path("p3".to_string()), Json(request))
        .await
        .unwrap();

    // The other two Jackets by the same brand dominate on category and
    // brand boosts alone; everything else scores near zero.
    assert!(similar.len() >= 2);
    let top: Vec<&str> = similar.iter().take(2).map(|r| r.product.id.as_str()).collect();
    assert!(top.contains(&"p2") && top.contains(&"p5"), "top two were {top:?}");
    assert!(similar[0].score > 8.0);
    assert!(similar[1].score > 8.0);
    assert!(similar.iter().all(|r| r.product.id != "p3"));
}

#[tokio::test]
async fn user_recommendations_degrade_until_pairs_exist() {
    let rt = runtime();
    seed_catalog(&rt).await;

    let Json(response) = recommend::user_collaborative(
        app_state(&rt),
        Path("c1".to_string()),
        Query(RecommendQuery::default()),
    )
    .await
    .unwrap();

    assert_eq!(response.user_id, "c1");
    assert!(response.recommendations.is_empty());
    let note = response.status.unwrap();
    assert!(note.contains("not ready"), "status note was {note:?}");
}

#[tokio::test]
async fn user_collaborative_recommends_from_pair_counts() {
    let rt = runtime();
    seed_catalog(&rt).await;
    seed_orders(&rt).await;

    // c3 only bought p1, so both pair partners of p1 come back with their
    // raw co-occurrence count.
    let Json(response) = recommend::user_collaborative(
        app_state(&rt),
        Path("c3".to_string()),
        Query(RecommendQuery { limit: Some(10) }),
    )
    .await
    .unwrap();

    assert_eq!(response.status, None);
    assert_eq!(ids(&response.recommendations), ["p2", "p3"]);
    assert!(response.recommendations.iter().all(|r| (r.score - 1.0).abs() < 1e-9));
    assert_eq!(response.metadata.algorithm, "collaborative");
    assert_eq!(response.metadata.count, 2);
}

#[tokio::test]
async fn user_hybrid_blends_history_and_content() {
    let rt = runtime();
    seed_catalog(&rt).await;
    seed_orders(&rt).await;

    let Json(response) = recommend::user_hybrid(
        app_state(&rt),
        Path("c3".to_string()),
        Query(RecommendQuery::default()),
    )
    .await
    .unwrap();

    assert_eq!(response.status, None);
    assert_eq!(response.metadata.algorithm, "hybrid");
    // The collaborative component carries p2 and p3 ahead of anything the
    // content side can contribute for a metal-detector seed.
    assert!(response.recommendations.len() >= 2);
    let top: Vec<&str> = response
        .recommendations
        .iter()
        .take(2)
        .map(|r| r.product.id.as_str())
        .collect();
    assert!(top.contains(&"p2") && top.contains(&"p3"), "top two were {top:?}");
}

#[tokio::test]
async fn frequently_bought_together_ranks_by_pair_count() {
    let rt = runtime();
    seed_catalog(&rt).await;
    seed_orders(&rt).await;

    let Json(response) = recommend::frequently_bought_together(
        app_state(&rt),
        Path("p1".to_string()),
        Query(RecommendQuery::default()),
    )
    .await
    .unwrap();

    assert_eq!(response.product_id, "p1");
    assert_eq!(ids(&response.recommendations), ["p2", "p3"]);
    assert_eq!(response.metadata.algorithm, "frequently_bought_together");
}

#[tokio::test]
async fn content_based_endpoint_requires_known_seed() {
    let rt = runtime();
    seed_catalog(&rt).await;

    let err = recommend::content_based(
        app_state(&rt),
        Path("ghost".to_string()),
        Query(RecommendQuery::default()),
    )
    .await
    .unwrap_err();
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

    let Json(response) = recommend::content_based(
        app_state(&rt),
        Path("p3".to_string()),
        Query(RecommendQuery::default()),
    )
    .await
    .unwrap();
    let top: Vec<&str> = response
        .recommendations
        .iter()
        .take(2)
        .map(|r| r.product.id.as_str())
        .collect();
    assert!(top.contains(&"p2") && top.contains(&"p5"), "top two were {top:?}");
    assert_eq!(response.metadata.algorithm, "content_based");
}

#[tokio::test]
async fn orderline_replay_reports_duplicate() {
    let rt = runtime();
    seed_catalog(&rt).await;
    seed_orders(&rt).await;

    let (status, Json(body)) = ingest::ingest_orderline(
        app_state(&rt),
        Json(orderline("o1", "p1", "c1", 0)),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.status, "duplicate");
    assert_eq!(body.order_nr, "o1");

    let Json(pairs) = recommend::product_pairs_status(app_state(&rt)).await.unwrap();
    assert_eq!(pairs.pair_count, 2, "replayed lines must not inflate counts");
}

#[tokio::test]
async fn pair_rebuild_runs_in_background() {
    let rt = runtime();
    seed_catalog(&rt).await;
    seed_orders(&rt).await;

    let (status, Json(initial)) = recommend::compute_product_pairs(app_state(&rt))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::ACCEPTED);
    assert!(matches!(
        initial.status,
        PairIndexPhase::Processing | PairIndexPhase::Completed
    ));

    let mut last = initial;
    for _ in 0..200 {
        if last.status == PairIndexPhase::Completed {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        let Json(current) = recommend::product_pairs_status(app_state(&rt)).await.unwrap();
        last = current;
    }

    assert_eq!(last.status, PairIndexPhase::Completed);
    assert_eq!(last.pair_count, 2);
    assert!(last.last_run.is_some());
    assert_eq!(last.error, None);
}

#[tokio::test]
async fn ingest_stores_embeddings_and_serves_the_full_document() {
    let rt = runtime();
    seed_catalog(&rt).await;

    let Json(stored) = ingest::get_product(app_state(&rt), Path("p1".to_string()))
        .await
        .unwrap();
    assert_eq!(stored.id, "p1");
    assert_eq!(stored.title, "Professional Metal Detector");
    assert_eq!(stored.title_embedding.as_ref().map(Vec::len), Some(384));
    assert_eq!(stored.description_embedding.as_ref().map(Vec::len), Some(384));

    let err = ingest::get_product(app_state(&rt), Path("ghost".to_string()))
        .await
        .unwrap_err();
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_invalidates_cached_search_results() {
    let rt = runtime();
    seed_catalog(&rt).await;

    let request = ConsolidatedSearchRequest {
        query: "palett".into(),
        ..Default::default()
    };
    let Json(before) = search::consolidated_search(app_state(&rt), Json(request.clone()))
        .await
        .unwrap();
    assert_eq!(before.products.len(), 1);

    let status = ingest::delete_product(app_state(&rt), Path("p4".to_string()))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    // The same query again must recompute, not replay the cached hit.
    let Json(after) = search::consolidated_search(app_state(&rt), Json(request))
        .await
        .unwrap();
    assert!(after.products.is_empty());

    let err = ingest::delete_product(app_state(&rt), Path("p4".to_string()))
        .await
        .unwrap_err();
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn feedback_is_recorded_in_metrics() {
    let rt = runtime();

    let Json(response) = search::feedback(
        app_state(&rt),
        Json(FeedbackRequest {
            query: "jakke".into(),
            product_id: Some("p3".into()),
            action: "click".into(),
        }),
    )
    .await
    .unwrap();
    assert_eq!(response.status, "recorded");

    let Json(stats) = meta::api_stats(app_state(&rt)).await.unwrap();
    assert_eq!(stats.metrics.feedback_events, 1);
}

#[tokio::test]
async fn query_explain_reports_plan_and_cache_key() {
    let rt = runtime();
    seed_catalog(&rt).await;

    let Json(explain) = search::query_explain(
        app_state(&rt),
        Json(QueryExplainRequest {
            query: "Vinterjakke Barn".into(),
            include_vector_search: true,
        }),
    )
    .await
    .unwrap();

    assert_eq!(explain.plan.normalized_query, "vinterjakke barn");
    assert_eq!(explain.plan.tokens, ["vinterjakke", "barn"]);
    let strategies: Vec<MatchType> = explain.plan.strategies.iter().map(|s| s.strategy).collect();
    assert_eq!(strategies, [MatchType::Exact, MatchType::Ngram, MatchType::Vector]);
    assert_eq!(explain.plan.embedding_sample.map(|s| s.len()), Some(10));
    assert_eq!(explain.cache_key.len(), 64);

    // A single token keeps vector search out of the plan.
    let Json(explain) = search::query_explain(
        app_state(&rt),
        Json(QueryExplainRequest {
            query: "vinterjakke".into(),
            include_vector_search: true,
        }),
    )
    .await
    .unwrap();
    assert_eq!(explain.plan.strategies.len(), 2);
    assert_eq!(explain.plan.embedding_sample, None);
}

#[tokio::test]
async fn health_reports_storage_counts() {
    let rt = runtime();
    seed_catalog(&rt).await;
    seed_orders(&rt).await;

    let Json(report) = meta::health(app_state(&rt)).await;
    assert_eq!(report.status, HealthStatus::Healthy);
    assert_eq!(report.products, 5);
    assert_eq!(report.orderlines, 5);
    assert_eq!(report.pairs, 2);
}

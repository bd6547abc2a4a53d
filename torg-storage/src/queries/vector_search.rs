//! Brute-force cosine similarity over stored product embeddings.

use rusqlite::Connection;

use torg_core::errors::TorgResult;
use torg_core::models::{EmbeddingField, Product};

use crate::to_storage_err;

fn embedding_column(field: EmbeddingField) -> &'static str {
    match field {
        EmbeddingField::Title => "title_embedding",
        EmbeddingField::Description => "description_embedding",
    }
}

/// Scan stored embeddings of `field` and return up to `k` products with
/// cosine similarity > 0, ordered descending.
pub fn find_by_vector_similarity(
    conn: &Connection,
    query: &[f32],
    field: EmbeddingField,
    k: usize,
) -> TorgResult<Vec<(Product, f64)>> {
    // Pre-compute the query norm once for early exit on zero-norm queries.
    let query_norm_sq: f64 = query.iter().map(|x| (*x as f64) * (*x as f64)).sum();
    if query_norm_sq == 0.0 || k == 0 {
        return Ok(vec![]);
    }

    let column = embedding_column(field);
    let mut stmt = conn
        .prepare(&format!(
            "SELECT id, {column}, embedding_dimensions FROM products WHERE {column} IS NOT NULL"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            let id: String = row.get(0)?;
            let blob: Vec<u8> = row.get(1)?;
            let dims: Option<i64> = row.get(2)?;
            Ok((id, blob, dims))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let query_len = query.len();
    let mut scored: Vec<(String, f64)> = Vec::new();
    for row in rows {
        let (id, blob, dims) = row.map_err(|e| to_storage_err(e.to_string()))?;
        // Skip dimension mismatches without deserializing the full vector.
        if dims.map(|d| d as usize) != Some(query_len) {
            continue;
        }
        let stored = bytes_to_f32_vec(&blob);
        let sim = cosine_similarity(query, &stored);
        if sim > 0.0 {
            scored.push((id, sim));
        }
    }

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(k);

    let mut results = Vec::with_capacity(scored.len());
    for (id, sim) in scored {
        if let Some(product) = super::product_crud::get_product(conn, &id)? {
            results.push((product, sim));
        }
    }
    Ok(results)
}

/// Convert f32 slice to bytes (little-endian).
pub(crate) fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert bytes back to f32 vec.
pub(crate) fn bytes_to_f32_vec(bytes: &[u8]) -> Vec<f32> {
    let mut result = Vec::with_capacity(bytes.len() / 4);
    for chunk in bytes.chunks_exact(4) {
        result.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    result
}

/// Cosine similarity between two vectors.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();
    let norm_a: f64 = a
        .iter()
        .map(|x| (*x as f64) * (*x as f64))
        .sum::<f64>()
        .sqrt();
    let norm_b: f64 = b
        .iter()
        .map(|x| (*x as f64) * (*x as f64))
        .sum::<f64>()
        .sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_round_trip() {
        let v = vec![0.25_f32, -1.5, 3.0];
        assert_eq!(bytes_to_f32_vec(&f32_vec_to_bytes(&v)), v);
    }

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = vec![0.6_f32, 0.8];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn cosine_of_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }
}

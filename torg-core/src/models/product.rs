use serde::{Deserialize, Serialize};

/// A catalog product. `id` is unique and immutable across the catalog.
///
/// Embedding vectors are owned by the repository and written at ingestion
/// time. A product without embeddings never surfaces from vector search;
/// everything else works unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub age_bucket: String,
    #[serde(default)]
    pub product_type: String,
    #[serde(default)]
    pub seasons: Vec<String>,
    /// Additive score boost applied when the product's seasons contain the
    /// season being shopped for.
    #[serde(default)]
    pub season_relevancy_factor: f64,
    #[serde(default)]
    pub price_original: f64,
    #[serde(default)]
    pub price_current: f64,
    #[serde(default)]
    pub is_on_sale: bool,
    #[serde(default)]
    pub stock_level: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_embedding: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_embedding: Option<Vec<f32>>,
}

/// Which stored embedding a vector query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingField {
    Title,
    Description,
}

impl Product {
    /// Category slug derived from the product type,
    /// e.g. "Metal Detectors" → "metal-detectors".
    pub fn category_slug(&self) -> String {
        slugify(&self.product_type)
    }

    /// The stored embedding for the given field, if present.
    pub fn embedding(&self, field: EmbeddingField) -> Option<&[f32]> {
        match field {
            EmbeddingField::Title => self.title_embedding.as_deref(),
            EmbeddingField::Description => self.description_embedding.as_deref(),
        }
    }

    /// Strip embedding vectors, e.g. before caching or returning a document.
    pub fn without_embeddings(mut self) -> Self {
        self.title_embedding = None;
        self.description_embedding = None;
        self
    }
}

// DDD Entity pattern: products are equal when their ids are equal.
impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Product {}

/// Lowercase slug: alphanumeric characters kept (including æ ø å ä ö),
/// every other run collapses to a single hyphen.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;
    for ch in input.chars() {
        if ch.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            title: "Test".into(),
            description: String::new(),
            brand: String::new(),
            color: String::new(),
            age_bucket: String::new(),
            product_type: "Metal Detectors".into(),
            seasons: vec![],
            season_relevancy_factor: 0.0,
            price_original: 0.0,
            price_current: 0.0,
            is_on_sale: false,
            stock_level: 0,
            title_embedding: None,
            description_embedding: None,
        }
    }

    #[test]
    fn slug_collapses_separators_and_lowercases() {
        assert_eq!(slugify("Metal Detectors"), "metal-detectors");
        assert_eq!(slugify("  Gummistøvler & Sko  "), "gummistøvler-sko");
        assert_eq!(slugify("Vår/Sommer"), "vår-sommer");
    }

    #[test]
    fn equality_is_by_id_only() {
        let a = product("p1");
        let mut b = product("p1");
        b.title = "Different".into();
        assert_eq!(a, b);
        assert_ne!(a, product("p2"));
    }

    #[test]
    fn embedding_accessor_selects_the_field() {
        let mut p = product("p1");
        p.title_embedding = Some(vec![1.0, 0.0]);
        assert_eq!(p.embedding(EmbeddingField::Title), Some([1.0, 0.0].as_slice()));
        assert_eq!(p.embedding(EmbeddingField::Description), None);
    }

    #[test]
    fn serde_uses_camel_case_field_names() {
        let p = product("p1");
        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("productType").is_some());
        assert!(json.get("stockLevel").is_some());
        assert!(json.get("product_type").is_none());
        // Absent embeddings are omitted entirely.
        assert!(json.get("titleEmbedding").is_none());
    }
}

use serde::{Deserialize, Serialize};

/// A category matched by search, grouped with its product count.
/// `id` equals the slug; categories are derived from product types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResult {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub product_count: usize,
}

/// A brand matched by search, grouped with its product count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandResult {
    pub id: String,
    pub name: String,
    pub product_count: usize,
}

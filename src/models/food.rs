use serde::{Deserialize, Serialize};

/// Catalog entry as served by `GET /api/food/list`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct FoodListResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<FoodItem>,
    #[serde(default)]
    pub message: Option<String>,
}

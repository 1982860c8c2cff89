//! Category Model

use serde::{Deserialize, Serialize};

/// Category entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub category_id: i64,
    /// Owner who created the category
    pub user_id: i64,
    pub name: String,
    /// Display position, ascending
    #[cfg_attr(feature = "db", sqlx(rename = "display_order"))]
    pub order: i32,
    /// Nickname of the creator at creation time
    pub author: String,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(skip)]
    pub deleted_at: Option<i64>,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
}

/// Update category payload
///
/// Moving a category onto a taken `order` shifts that slot and every later
/// one down by one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub order: Option<i32>,
}

//! Menu item model (catalog side, read-only for the core)

use serde::{Deserialize, Serialize};

/// Menu item as supplied by the catalog collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub menu_id: i64,
    pub menu_name: String,
    /// Base price in currency units
    pub price: f64,
    /// Discount percentage (0-100), applied at catalog-read time only
    pub discount: f64,
    pub is_available: bool,
}

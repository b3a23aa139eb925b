//! Dining table model (catalog side, read-only for the core)

use serde::{Deserialize, Serialize};

/// Dining table identity as supplied by the catalog collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    pub table_id: i64,
    pub table_name: String,
    pub is_available: bool,
}

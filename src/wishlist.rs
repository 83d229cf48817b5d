//! Wishlist kept by the storefront in browser local storage.
//!
//! The server never stores it: clients send the stored JSON list and get the
//! updated list back.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

pub const STORAGE_KEY: &str = "wishlist";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
pub struct Wishlist {
    ids: Vec<Uuid>,
}

// Entries that are not product ids (stale keys from older catalogs) are dropped
// one by one instead of failing the whole list.
impl<'de> Deserialize<'de> for Wishlist {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = Vec::<Value>::deserialize(deserializer)?;
        Ok(Self::from_entries(entries))
    }
}

impl Wishlist {
    pub fn new(ids: Vec<Uuid>) -> Self {
        Self { ids }
    }

    /// Reads the stored value; a missing or unreadable entry is an empty list.
    pub fn from_storage(raw: Option<&str>) -> Self {
        raw.and_then(|raw| serde_json::from_str::<Self>(raw).ok())
            .unwrap_or_default()
    }

    fn from_entries(entries: Vec<Value>) -> Self {
        let ids = entries
            .iter()
            .filter_map(Value::as_str)
            .filter_map(|entry| Uuid::parse_str(entry.trim()).ok())
            .collect();
        Self::new(ids)
    }

    pub fn to_storage(&self) -> String {
        serde_json::to_string(&self.ids).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn contains(&self, product_id: Uuid) -> bool {
        self.ids.contains(&product_id)
    }

    /// Adds the id when absent, removes every copy when present.
    /// Returns whether the product is in the wishlist afterwards.
    pub fn toggle(&mut self, product_id: Uuid) -> bool {
        if self.contains(product_id) {
            self.ids.retain(|id| *id != product_id);
            false
        } else {
            self.ids.push(product_id);
            true
        }
    }

    pub fn ids(&self) -> &[Uuid] {
        &self.ids
    }

    pub fn into_ids(self) -> Vec<Uuid> {
        self.ids
    }
}

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::models::{Caller, NewProperty, Property, PropertyUpdate};
use crate::repo::{PropertyTable, StoreError};

/// In-memory `properties` table for tests and local development.
///
/// Applies the same owner policy as the hosted backend: a caller only ever sees
/// or touches rows whose `user_id` is its own.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    rows: Arc<Mutex<BTreeMap<String, Property>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, Property>>, StoreError> {
        self.rows
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".to_string()))
    }
}

#[async_trait]
impl PropertyTable for MemoryStore {
    async fn list(&self, caller: &Caller) -> Result<Vec<Property>, StoreError> {
        let mut owned: Vec<Property> = self
            .rows()?
            .values()
            .filter(|p| p.user_id == caller.user_id)
            .cloned()
            .collect();
        owned.sort_by_key(|p| p.created_at);
        Ok(owned)
    }

    async fn insert(&self, caller: &Caller, input: NewProperty) -> Result<Property, StoreError> {
        let property = Property {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: caller.user_id.clone(),
            latitude: input.latitude,
            longitude: input.longitude,
            price: input.price,
            image_url: input.image_url,
            created_at: Utc::now(),
        };
        self.rows()?.insert(property.id.clone(), property.clone());
        Ok(property)
    }

    async fn update(
        &self,
        caller: &Caller,
        id: &str,
        update: PropertyUpdate,
    ) -> Result<Property, StoreError> {
        let mut rows = self.rows()?;
        let row = rows
            .get_mut(id)
            .filter(|p| p.user_id == caller.user_id)
            .ok_or(StoreError::NotFound)?;
        row.price = update.price;
        row.image_url = update.image_url;
        Ok(row.clone())
    }

    async fn delete(&self, caller: &Caller, id: &str) -> Result<(), StoreError> {
        let mut rows = self.rows()?;
        match rows.get(id) {
            Some(p) if p.user_id == caller.user_id => {
                rows.remove(id);
                Ok(())
            }
            _ => Err(StoreError::NotFound),
        }
    }
}

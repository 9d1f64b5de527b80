//! Property listing mutations on behalf of the signed-in user.
//!
//! Every operation follows the same order: authentication check, input
//! validation, then the owner-scoped table call. Nothing here touches the
//! client's query cache; callers invalidate it once a mutation succeeds.

use std::sync::Arc;

use store::{Caller, NewProperty, Property, PropertyTable, PropertyUpdate};

use crate::error::ApiError;

#[derive(Clone)]
pub struct PropertyService {
    table: Arc<dyn PropertyTable>,
}

fn authenticated(caller: Option<&Caller>) -> Result<&Caller, ApiError> {
    caller.ok_or(ApiError::NotAuthenticated)
}

impl PropertyService {
    pub fn new(table: Arc<dyn PropertyTable>) -> Self {
        Self { table }
    }

    /// The caller's properties. Without a caller there is nothing to show.
    pub async fn list(&self, caller: Option<&Caller>) -> Result<Vec<Property>, ApiError> {
        let Some(caller) = caller else {
            return Ok(Vec::new());
        };
        Ok(self.table.list(caller).await?)
    }

    pub async fn create(
        &self,
        caller: Option<&Caller>,
        input: NewProperty,
    ) -> Result<Property, ApiError> {
        let caller = authenticated(caller)?;
        input.validate()?;

        let property = self.table.insert(caller, input).await.map_err(|e| {
            tracing::error!("Creating property for {} failed: {}", caller.user_id, e);
            ApiError::from(e)
        })?;
        tracing::info!("Property {} created by {}", property.id, caller.user_id);
        Ok(property)
    }

    /// Change price and image. Coordinates are fixed at creation.
    pub async fn update(
        &self,
        caller: Option<&Caller>,
        id: &str,
        update: PropertyUpdate,
    ) -> Result<Property, ApiError> {
        let caller = authenticated(caller)?;
        update.validate()?;

        let property = self.table.update(caller, id, update).await?;
        tracing::info!("Property {} updated by {}", id, caller.user_id);
        Ok(property)
    }

    pub async fn delete(&self, caller: Option<&Caller>, id: &str) -> Result<(), ApiError> {
        let caller = authenticated(caller)?;

        self.table.delete(caller, id).await?;
        tracing::info!("Property {} deleted by {}", id, caller.user_id);
        Ok(())
    }
}

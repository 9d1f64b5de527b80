//! # Data access: the `properties` relation behind an abstract table
//!
//! [`PropertyTable`] is the seam between the application and whatever holds the
//! rows: the Supabase PostgREST client on the server (`api::supabase`) or the
//! in-memory [`crate::MemoryStore`] used by tests and local development.
//!
//! Every method takes the [`Caller`] and must scope its effect to
//! `caller.user_id`: reads return only the caller's rows, inserts are owned by
//! the caller, and updates/deletes match on both `id` and owner. Implementations
//! backed by a row-level policy still apply the filter themselves.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Caller, NewProperty, Property, PropertyUpdate};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// No row with this id belongs to the caller.
    #[error("Property not found")]
    NotFound,
    /// The backend's row-level policy refused the operation.
    #[error("Not allowed: {0}")]
    Forbidden(String),
    /// The backend answered and refused the request; the message is user-facing.
    #[error("{0}")]
    Backend(String),
    /// The backend could not be reached or answered with something unreadable.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait PropertyTable: Send + Sync {
    /// All properties owned by the caller.
    async fn list(&self, caller: &Caller) -> Result<Vec<Property>, StoreError>;

    /// Insert a row owned by the caller and return it as stored.
    async fn insert(&self, caller: &Caller, input: NewProperty) -> Result<Property, StoreError>;

    /// Change price and image of one of the caller's rows.
    async fn update(
        &self,
        caller: &Caller,
        id: &str,
        update: PropertyUpdate,
    ) -> Result<Property, StoreError>;

    /// Remove one of the caller's rows.
    async fn delete(&self, caller: &Caller, id: &str) -> Result<(), StoreError>;
}

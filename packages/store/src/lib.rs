pub mod cache;
pub mod models;
pub mod repo;
pub mod validate;

#[cfg(not(target_arch = "wasm32"))]
mod memory;
#[cfg(not(target_arch = "wasm32"))]
pub use memory::MemoryStore;

pub use cache::QueryCache;
pub use models::{Caller, LatLng, NewProperty, Property, PropertyUpdate};
pub use repo::{PropertyTable, StoreError};

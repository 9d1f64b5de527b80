//! Slippy map with property markers.
//!
//! Tiles come from the configured template; clicks become coordinates through
//! [`projection::Viewport`] and open the create dialog.

mod clickable_map;
mod markers;
pub mod projection;

pub use clickable_map::ClickableMap;
pub use markers::{PropertyMarker, TemporaryMarker};

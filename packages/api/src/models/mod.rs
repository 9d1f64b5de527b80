//! Data models shared by server functions and the client.

mod map;
mod user;

pub use map::{MapSettings, DEFAULT_CENTER, DEFAULT_ZOOM};
pub use user::UserInfo;

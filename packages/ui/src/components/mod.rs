//! Small styled building blocks shared by the views.

mod banner;
mod button;
mod input;
mod label;

pub use banner::{Banner, BannerKind};
pub use button::{Button, ButtonSize, ButtonVariant};
pub use input::Input;
pub use label::Label;

mod auth_error;
pub use auth_error::AuthError;

mod handle_token;
pub use handle_token::HandleToken;

mod home;
pub use home::Home;

mod login;
pub use login::Login;

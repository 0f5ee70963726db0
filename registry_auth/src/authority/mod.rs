mod errors;
mod login;
mod throttle;
mod token;

pub use errors::AuthError;
pub use login::{current_user, login_with_password, prepare_logout, refresh_session};
pub use token::{BearerLogin, authenticate_bearer, token_login, token_logout};

mod errors;
mod password;
mod types;
mod user;

pub use errors::UserError;
pub use password::hash_password;
pub(crate) use password::verify_password;
pub use types::User;
pub use user::UserStore;

pub(crate) async fn init() -> Result<(), UserError> {
    UserStore::init().await
}

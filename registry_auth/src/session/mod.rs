mod config;
mod errors;
mod main;
mod types;

pub use config::{SESSION_COOKIE_NAME, XSRF_COOKIE_NAME, XSRF_HEADER_NAME};
pub use errors::SessionError;
pub use main::{
    get_session_id_from_headers, get_user_from_session, prime_csrf_cookie, verify_csrf_pair,
};
pub use types::SessionUser;

pub(crate) use config::SESSION_COOKIE_MAX_AGE;
pub(crate) use main::{
    append_csrf_cookie, create_session, delete_session_by_id, expire_session_cookie,
};

mod csrf;
mod session;

pub use csrf::{prime_csrf_cookie, verify_csrf_pair};
pub use session::{get_session_id_from_headers, get_user_from_session};

pub(crate) use csrf::append_csrf_cookie;
pub(crate) use session::{create_session, delete_session_by_id, expire_session_cookie};

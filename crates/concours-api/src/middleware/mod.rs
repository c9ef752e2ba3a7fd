//! Request middleware

pub mod auth;

pub use auth::{authorize, session_cookie, clear_session_cookie, CurrentUser, SESSION_COOKIE};

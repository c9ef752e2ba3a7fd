//! Authentication and authorization primitives for the Concours portal

pub mod password;
pub mod role;
pub mod session;

pub use password::{hash_password, hash_password_with_params, verify_password, PasswordError};
pub use role::{Role, RoleSet};
pub use session::{SessionClaims, SessionError, SessionKeys, SessionPatch, SESSION_TTL_HOURS};

// Re-export useful types
pub use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Validation};

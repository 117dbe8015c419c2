pub mod auth;

pub use auth::{AuthUser, Rol, ROLES_STAFF};

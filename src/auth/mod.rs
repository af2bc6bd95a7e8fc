//! Bearer-token authentication. Per the spec's open question (c),
//! authentication is a conventional password-hash verifier plus JWT bearer
//! tokens scoped to one owner — no RBAC roles, since nothing in spec.md
//! assigns roles to users.

pub mod jwt;
pub mod middleware;

pub use jwt::JwtHandler;
pub use middleware::{auth_middleware, AuthUser};

pub mod auth;
pub mod rate_limit;

pub use auth::{require_bearer, AuthUser};
pub use rate_limit::{rate_limit, RouteLimiter};

pub mod auth;
pub mod rate_limit;

pub use auth::{enforce_role, issue_token, Claims, Role, RoleGuard};
pub use rate_limit::rate_limit_middleware;

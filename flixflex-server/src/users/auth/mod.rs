pub mod handlers;
pub mod jwt;
pub mod middleware;

pub use jwt::JwtKeys;
pub use middleware::auth_middleware;

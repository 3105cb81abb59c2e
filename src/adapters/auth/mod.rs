//! Authentication adapters.
//!
//! - `JwtSessionValidator` - HS256 session tokens (production)
//! - `MockSessionValidator` - Token map for tests

mod jwt;
mod mock;

pub use jwt::{JwtSessionValidator, SessionClaims};
pub use mock::MockSessionValidator;

//! Authentication adapters.
//!
//! Implementations of the `AccessTokenValidator` port:
//!
//! - `jwt` - HS256 tokens signed by the identity service
//! - `mock` - Test implementation that doesn't require signed tokens

mod jwt;
mod mock;

pub use jwt::{AccessClaims, JwtAccessTokenValidator};
pub use mock::MockAccessTokenValidator;

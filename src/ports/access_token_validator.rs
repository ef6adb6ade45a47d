//! Access token validation port.
//!
//! This port defines the contract for validating bearer tokens and
//! extracting the caller's identity. It is provider-agnostic: a JWT adapter
//! serves production and a mock adapter serves tests.
//!
//! All implementations MUST validate:
//! - **Signature**: Token was issued by the trusted identity provider
//! - **Issuer (iss)** and **Audience (aud)**: Token is meant for this service
//! - **Expiry (exp)**: Token is not expired

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates access tokens and extracts user identity.
///
/// HTTP middleware uses this to validate Bearer tokens.
///
/// # Contract
///
/// - `AuthError::InvalidToken` for malformed tokens or bad signatures
/// - `AuthError::TokenExpired` for expired tokens
/// - `AuthError::ServiceUnavailable` for transient errors
#[async_trait]
pub trait AccessTokenValidator: Send + Sync {
    /// Validate a raw token (without the "Bearer " prefix).
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

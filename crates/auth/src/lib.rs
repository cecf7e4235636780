//! `banksy-auth`: token verification boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it turns a
//! bearer token into verified claims, nothing more. Mapping claims to a
//! stored user row (upsert-on-first-seen) happens in the api layer.

pub mod claims;
pub mod verifier;

pub use claims::{validate_claims, AuthClaims, TokenValidationError};
pub use verifier::{Hs256Verifier, TokenError, TokenVerifier};

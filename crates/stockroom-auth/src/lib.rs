//! Both Stockroom identity schemes behind one `Identity` type.
//!
//! The self-issued scheme (`token`) and the delegated-SSO scheme (`oidc`)
//! never accept each other's tokens: each validates signature, expiry, and
//! issuer explicitly. Route tables select the scheme by path prefix via the
//! extractors in `identity`; nothing inspects a token to guess its origin.

pub mod blacklist;
pub mod identity;
pub mod oidc;
pub mod token;

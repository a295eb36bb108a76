//! Test utilities for Stockroom services.
//!
//! Provides token-minting helpers and a fixed RSA keypair for exercising the
//! OIDC validation path without a live identity provider. Import in
//! `#[cfg(test)]` blocks and `tests/` harnesses only — never in production
//! code.

pub mod tokens;

//! Domain types shared across the Stockroom service and its auth crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod pagination;
pub mod revision;
pub mod role;
pub mod stock;

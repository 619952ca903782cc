//! Boutique Storefront
//!
//! Demonstration storefront and admin console backend. All state lives in
//! per-session in-memory records seeded on first access.
//!
//! ## Features
//! - Product catalog with admin CRUD
//! - Merge-aware shopping cart
//! - Order ledger with status state machine and cancellation
//! - Shared pricing rule (free shipping threshold)

use thiserror::Error;

pub mod api;
pub mod domain;
pub mod session;

// =============================================================================
// Error Types
// =============================================================================

/// Crate-wide error taxonomy. Every expected failure of a core operation is
/// one of these; the API layer maps them onto HTTP status codes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Required field missing or malformed. Never silently defaulted.
    #[error("{0}")]
    Validation(String),

    /// Referenced product, cart line, or order does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Structurally valid request that violates a state invariant. The
    /// message names the blocking state.
    #[error("{0}")]
    Conflict(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

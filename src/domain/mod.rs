//! Domain layer types and invariants.

pub mod entities;
pub mod error;
pub mod session;
pub mod slug;
pub mod types;

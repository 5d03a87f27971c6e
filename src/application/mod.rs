//! Application services: session lifecycle, mutations, listing.

pub mod error;
pub mod listing;
pub mod notify;
pub mod pagination;
pub mod posts;
pub mod repos;
pub mod session;

//! Content-management core for a headless CMS: session handling, post and
//! category CRUD, publish transitions, and paged listings.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub(crate) mod util;

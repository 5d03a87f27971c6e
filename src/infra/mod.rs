//! Infrastructure adapters and runtime bootstrap.

pub mod auth;
pub mod cms;
pub mod error;
pub mod runtime;
pub mod storage;
pub mod telemetry;

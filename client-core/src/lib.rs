//! client-core: shared infrastructure for the tournament web client.
pub mod error;
pub mod identity;
pub mod middleware;
pub mod observability;

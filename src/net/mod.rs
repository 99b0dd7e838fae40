//! Identity provider seams, token handling, and the REST API client.

pub mod api;
pub mod browser_identity;
pub mod identity;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

//! Typed clients over the store facade.

pub mod directory_client;

pub use directory_client::*;

//! # People Directory Sample
//!
//! A small application built on [`resource_store`], exposed as a library so
//! the integration tests can drive it end to end.
//!
//! - **[model]**: Typed records ([`Person`](model::Person),
//!   [`Profile`](model::Profile)) decoded from store entities.
//! - **[transport]**: A canned-data [`Transport`](resource_store::Transport)
//!   standing in for an HTTP backend.
//! - **[clients]**: The [`DirectoryClient`](clients::DirectoryClient)
//!   wrapper that hides JSON handling behind typed methods.
//! - **[lifecycle]**: Orchestration: spawning the store actor, defining
//!   resources, tracing setup, graceful shutdown.

pub mod clients;
pub mod lifecycle;
pub mod model;
pub mod transport;

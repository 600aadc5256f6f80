//! Typed client for the entity service REST API.
//!
//! The service exposes entity CRUD, entity model creation, SQL execution and a
//! version endpoint over plain HTTP. This crate maps each of those onto a
//! declarative command catalog (method + URI template + parameter bindings)
//! and executes the resulting requests with [`reqwest`].
//!
//! It intentionally contains **no** retry policy, **no** caching, and **no**
//! schema validation; malformed input is rejected only by the remote server.

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;

pub use catalog::{Command, entity_path};
pub use client::{EntityServiceClient, Outcome};
pub use config::ClientConfig;
pub use error::{ClientError, Result};

//! Core types and pure rules for the Lineage record manager client.
//!
//! This crate is deliberately free of HTTP and terminal dependencies.
//! Everything the server is authoritative for (relationship consistency,
//! persistence, validation beyond required fields) stays out; what remains
//! is the client-side data model and the handful of rules the UI enforces
//! before talking to the API.

pub mod board;
pub mod deceased;
pub mod error;
pub mod form;
pub mod individual;
pub mod project;
pub mod relationship;

pub use error::{Error, Result};

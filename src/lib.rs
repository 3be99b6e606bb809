//! Interactive shell for a remote data grid of collections and data objects.
//!
//! The core is transport agnostic: every operation runs against the
//! [`client::NamespaceClient`] trait with an explicit [`core::NavigationState`]
//! threaded through, so the whole shell can be driven in tests (or embedded)
//! without a live connection. The binary in `main.rs` adds the REPL loop,
//! credential acquisition and the CLI surface.

pub mod client;
pub mod config;
pub mod core;
pub mod models;
pub mod utils;

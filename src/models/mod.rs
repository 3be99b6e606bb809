//! Data models for the shell.
//!
//! Contains domain types for:
//! - [`Collection`], [`DataObject`], [`Replica`] - remote namespace nodes
//! - [`Manifest`], [`ObjectSeed`] - seed description for the memory backend
//! - [`OutputLine`] - command output routed to stdout or stderr

mod manifest;
mod namespace;
mod terminal;

pub use manifest::{Manifest, ObjectSeed};
pub use namespace::{Collection, DataObject, Replica};
pub use terminal::OutputLine;

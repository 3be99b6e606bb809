//! Shell core.
//!
//! - [`path`] - pure remote-path resolution
//! - [`classify`] - collection-first target classification
//! - [`navigation`] - working/previous/initial collection state
//! - [`commands`] - command parsing and dispatch
//! - [`parser`] - input line tokenization

pub mod classify;
pub mod commands;
pub mod navigation;
pub mod parser;
pub mod path;

pub use classify::{Target, classify, collection_at, data_object_at};
pub use commands::{Command, CommandResult, PathArg, execute_command};
pub use navigation::NavigationState;
pub use parser::split_line;
pub use path::resolve;

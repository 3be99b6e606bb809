//! Command parsing and execution.
//!
//! This module provides:
//! - `Command` enum for parsed shell commands
//! - `CommandResult` for command execution results
//! - `execute_command` for dispatching against the session and navigation
//!
//! Commands are parsed from tokenized input into the `Command` enum, then
//! executed via `execute_command`. Each command accepts an i-prefixed alias
//! (`ls`/`ils`, `cd`/`icd`, ...) for muscle-memory compatibility with the
//! classic grid tools.

mod execute;
mod result;

pub use execute::execute_command;
pub use result::CommandResult;

use std::fmt;

// =============================================================================
// Path Argument Type
// =============================================================================

/// A remote path argument passed to a command (e.g., `cd foo`, `rm bar.txt`).
///
/// Stored as typed, unvalidated; resolution against the working collection
/// happens during execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathArg(String);

impl PathArg {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PathArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<str> for PathArg {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PathArg {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// =============================================================================
// Command Enum
// =============================================================================

/// Parsed shell command.
#[derive(Clone, Debug)]
pub enum Command {
    Ls {
        targets: Vec<PathArg>,
        classify: bool,
        sort: bool,
    },
    Cd(Option<PathArg>),
    Pwd,
    Sysmeta(Vec<PathArg>),
    Get {
        remote: PathArg,
        local: String,
        force: bool,
        verbose: bool,
    },
    Put {
        local: String,
        remote: PathArg,
        force: bool,
        verbose: bool,
    },
    Rm {
        target: PathArg,
        force: bool,
    },
    Mkdir {
        target: PathArg,
        verbose: bool,
    },
    Rmdir {
        target: PathArg,
        recursive: bool,
        force: bool,
        verbose: bool,
    },
    Chksum(PathArg),
    Help,
    Exit,
    /// Recognized command with unusable arguments; the message is printed
    /// as is.
    Invalid(String),
    /// Unrecognized command name.
    Unknown(String),
}

impl Command {
    /// All accepted command names, aliases included. Used for completion.
    pub fn names() -> &'static [&'static str] {
        &[
            "cd", "chksum", "exit", "get", "help", "icd", "ichksum", "iexit", "iget", "ils",
            "imkdir", "iput", "ipwd", "irm", "irmdir", "isysmeta", "ls", "mkdir", "put", "pwd",
            "rm", "rmdir", "stat", "sysmeta",
        ]
    }

    /// Parse a command from its name and arguments.
    pub fn parse(name: &str, args: &[String]) -> Self {
        match name {
            "ls" | "ils" => {
                let mut classify = false;
                let mut sort = true;
                let mut targets = Vec::new();
                for arg in args {
                    match arg.as_str() {
                        "-F" | "--classify" => classify = true,
                        "--sort" => sort = true,
                        "-f" | "--no-sort" => sort = false,
                        flag if is_flag(flag) => {
                            return Self::Invalid(format!("ls: unrecognized option: {flag}"));
                        }
                        path => targets.push(PathArg::new(path)),
                    }
                }
                Self::Ls {
                    targets,
                    classify,
                    sort,
                }
            }
            // `cd -` is a target, not an option, so no flag parsing here.
            "cd" | "icd" => match args {
                [] => Self::Cd(None),
                [target] => Self::Cd(Some(PathArg::new(target))),
                _ => Self::Invalid("cd: too many arguments".to_string()),
            },
            "pwd" | "ipwd" => Self::Pwd,
            "sysmeta" | "isysmeta" | "stat" => {
                Self::Sysmeta(args.iter().map(PathArg::new).collect())
            }
            "get" | "iget" => {
                let mut force = false;
                let mut verbose = false;
                let mut positional = Vec::new();
                for arg in args {
                    match arg.as_str() {
                        "--force" => force = true,
                        "--verbose" => verbose = true,
                        flag if is_flag(flag) => {
                            return Self::Invalid(format!("get: unrecognized option: {flag}"));
                        }
                        value => positional.push(value.to_string()),
                    }
                }
                match positional.as_slice() {
                    [remote, local] => Self::Get {
                        remote: PathArg::new(remote),
                        local: local.clone(),
                        force,
                        verbose,
                    },
                    _ => Self::Invalid("get: expected REMOTE and LOCAL path".to_string()),
                }
            }
            "put" | "iput" => {
                let mut force = false;
                let mut verbose = false;
                let mut positional = Vec::new();
                for arg in args {
                    match arg.as_str() {
                        "--force" => force = true,
                        "--verbose" => verbose = true,
                        flag if is_flag(flag) => {
                            return Self::Invalid(format!("put: unrecognized option: {flag}"));
                        }
                        value => positional.push(value.to_string()),
                    }
                }
                match positional.as_slice() {
                    [local, remote] => Self::Put {
                        local: local.clone(),
                        remote: PathArg::new(remote),
                        force,
                        verbose,
                    },
                    _ => Self::Invalid("put: expected LOCAL and REMOTE path".to_string()),
                }
            }
            "rm" | "irm" => {
                let mut force = false;
                let mut positional = Vec::new();
                for arg in args {
                    match arg.as_str() {
                        "--force" => force = true,
                        flag if is_flag(flag) => {
                            return Self::Invalid(format!("rm: unrecognized option: {flag}"));
                        }
                        value => positional.push(value.to_string()),
                    }
                }
                match positional.as_slice() {
                    [target] => Self::Rm {
                        target: PathArg::new(target),
                        force,
                    },
                    [] => Self::Invalid("rm: missing operand".to_string()),
                    _ => Self::Invalid("rm: too many arguments".to_string()),
                }
            }
            "mkdir" | "imkdir" => {
                let mut verbose = false;
                let mut positional = Vec::new();
                for arg in args {
                    match arg.as_str() {
                        "--verbose" => verbose = true,
                        flag if is_flag(flag) => {
                            return Self::Invalid(format!("mkdir: unrecognized option: {flag}"));
                        }
                        value => positional.push(value.to_string()),
                    }
                }
                match positional.as_slice() {
                    [target] => Self::Mkdir {
                        target: PathArg::new(target),
                        verbose,
                    },
                    [] => Self::Invalid("mkdir: missing operand".to_string()),
                    _ => Self::Invalid("mkdir: too many arguments".to_string()),
                }
            }
            "rmdir" | "irmdir" => {
                let mut recursive = false;
                let mut force = false;
                let mut verbose = false;
                let mut positional = Vec::new();
                for arg in args {
                    match arg.as_str() {
                        "--recursive" => recursive = true,
                        "--force" => force = true,
                        "--verbose" => verbose = true,
                        flag if is_flag(flag) => {
                            return Self::Invalid(format!("rmdir: unrecognized option: {flag}"));
                        }
                        value => positional.push(value.to_string()),
                    }
                }
                match positional.as_slice() {
                    [target] => Self::Rmdir {
                        target: PathArg::new(target),
                        recursive,
                        force,
                        verbose,
                    },
                    [] => Self::Invalid("rmdir: missing operand".to_string()),
                    _ => Self::Invalid("rmdir: too many arguments".to_string()),
                }
            }
            "chksum" | "ichksum" => match args {
                [target] => Self::Chksum(PathArg::new(target)),
                [] => Self::Invalid("chksum: missing operand".to_string()),
                _ => Self::Invalid("chksum: too many arguments".to_string()),
            },
            "help" => Self::Help,
            "exit" | "iexit" => Self::Exit,
            _ => Self::Unknown(name.to_string()),
        }
    }
}

/// An option-looking argument (leading dash, not a bare `-`).
fn is_flag(arg: &str) -> bool {
    arg.len() > 1 && arg.starts_with('-')
}

// =============================================================================
// Tests
// =============================================================================

//! Command execution logic.
//!
//! `execute_command` dispatches a parsed command against the session and the
//! navigation state. Per-target failures become error lines in the result so
//! one bad argument never aborts a batch or the shell; only `exit` ends the
//! loop, via the result's exit flag.

use std::path::Path;

use tracing::debug;

use super::{Command, CommandResult, PathArg};
use crate::client::{ClientError, NamespaceClient, Session};
use crate::config::HELP_TEXT;
use crate::core::classify::{Target, classify, collection_at, data_object_at};
use crate::core::navigation::NavigationState;
use crate::core::path::resolve;
use crate::models::{Collection, OutputLine};
use crate::utils::format::{collection_record, data_object_record, entry_line};

/// Execute a parsed command.
///
/// Navigation is mutated only by `cd`, and only on success.
pub fn execute_command(
    cmd: Command,
    session: &Session,
    nav: &mut NavigationState,
) -> CommandResult {
    match cmd {
        Command::Ls {
            targets,
            classify,
            sort,
        } => execute_ls(session, nav.working(), &targets, classify, sort),
        Command::Cd(target) => execute_cd(session, nav, target),
        Command::Pwd => CommandResult::output(vec![OutputLine::text(nav.working().path.as_str())]),
        Command::Sysmeta(targets) => execute_sysmeta(session, nav.working(), &targets),
        Command::Get {
            remote,
            local,
            force,
            verbose,
        } => execute_get(session, nav.working(), &remote, &local, force, verbose),
        Command::Put {
            local,
            remote,
            force,
            verbose,
        } => execute_put(session, nav.working(), &local, &remote, force, verbose),
        Command::Rm { target, force } => execute_rm(session, nav.working(), &target, force),
        Command::Mkdir { target, verbose } => {
            execute_mkdir(session, nav.working(), &target, verbose)
        }
        Command::Rmdir {
            target,
            recursive,
            force,
            verbose,
        } => execute_rmdir(session, nav.working(), &target, recursive, force, verbose),
        Command::Chksum(target) => execute_chksum(session, nav.working(), &target),
        Command::Help => {
            CommandResult::output(HELP_TEXT.lines().map(OutputLine::text).collect())
        }
        Command::Exit => CommandResult::exit(),
        Command::Invalid(message) => CommandResult::output(vec![OutputLine::error(message)]),
        Command::Unknown(name) => {
            CommandResult::output(vec![OutputLine::error(format!("unknown command: {name}"))])
        }
    }
}

/// Execute `cd`.
fn execute_cd(session: &Session, nav: &mut NavigationState, target: Option<PathArg>) -> CommandResult {
    let arg = target.as_ref().map(|p| p.as_str().to_string());
    match nav.change_directory(session.client(), arg.as_deref()) {
        Ok(()) => CommandResult::empty(),
        Err(ClientError::CollectionNotFound(_)) => {
            CommandResult::output(vec![OutputLine::error(format!(
                "cd: collection does not exist: {}",
                arg.unwrap_or_default()
            ))])
        }
        Err(err) => CommandResult::output(vec![OutputLine::error(format!("cd: {err}"))]),
    }
}

/// Execute `ls`.
///
/// Data-object targets print as one line each, in argument order, before all
/// collection blocks. With more than one requested target each collection
/// block gets a `path:` header, blocks separated by a blank line.
fn execute_ls(
    session: &Session,
    working: &Collection,
    targets: &[PathArg],
    classify_suffix: bool,
    sort: bool,
) -> CommandResult {
    let client = session.client();
    let mut lines = Vec::new();
    let mut target_colls = Vec::new();
    let mut object_paths = Vec::new();

    for path in targets {
        match classify(client, working, path.as_str()) {
            Ok(Target::Collection(collection)) => target_colls.push(collection),
            Ok(Target::DataObject(_)) => object_paths.push(path),
            Err(err) => lines.push(OutputLine::error(format!("ls: {err}"))),
        }
    }
    if targets.is_empty() {
        target_colls.push(working.clone());
    }

    for path in object_paths {
        lines.push(OutputLine::text(path.as_str()));
    }

    let mut first = true;
    for collection in &target_colls {
        if targets.len() > 1 {
            if !first {
                lines.push(OutputLine::text(""));
            }
            lines.push(OutputLine::text(format!("{}:", collection.path)));
        }
        match collection_entries(client, collection, classify_suffix, sort) {
            Ok(mut entries) => lines.append(&mut entries),
            Err(err) => lines.push(OutputLine::error(format!("ls: {err}"))),
        }
        first = false;
    }
    CommandResult::output(lines)
}

/// Entries of one collection, optionally merged into a single alphabetic
/// stream. Unsorted order is client order: subcollections before objects.
fn collection_entries(
    client: &dyn NamespaceClient,
    collection: &Collection,
    classify_suffix: bool,
    sort: bool,
) -> Result<Vec<OutputLine>, ClientError> {
    let (collections, objects) = client.list_children(collection)?;
    let mut entries: Vec<(String, bool)> = collections
        .into_iter()
        .map(|c| (c.name, true))
        .chain(objects.into_iter().map(|o| (o.name, false)))
        .collect();
    if sort {
        entries.sort_by(|a, b| a.0.cmp(&b.0));
    }
    Ok(entries
        .into_iter()
        .map(|(name, is_collection)| {
            OutputLine::text(entry_line(&name, is_collection, classify_suffix))
        })
        .collect())
}

/// Execute `sysmeta`.
fn execute_sysmeta(session: &Session, working: &Collection, targets: &[PathArg]) -> CommandResult {
    let client = session.client();
    let mut lines = Vec::new();
    for target in targets {
        match classify(client, working, target.as_str()) {
            Ok(Target::Collection(collection)) => match client.list_children(&collection) {
                Ok((subcollections, _)) => lines.extend(
                    collection_record(&collection, subcollections.len())
                        .into_iter()
                        .map(OutputLine::text),
                ),
                Err(err) => lines.push(OutputLine::error(format!("sysmeta: {err}"))),
            },
            Ok(Target::DataObject(object)) => lines.extend(
                data_object_record(&object).into_iter().map(OutputLine::text),
            ),
            Err(err) => lines.push(OutputLine::error(format!("sysmeta: {err}"))),
        }
    }
    CommandResult::output(lines)
}

/// Execute `get`.
fn execute_get(
    session: &Session,
    working: &Collection,
    remote: &PathArg,
    local: &str,
    force: bool,
    verbose: bool,
) -> CommandResult {
    let resolved = resolve(remote.as_str(), Some(&working.path));
    debug!(remote = %resolved, local, "get");
    match session.client().download(&resolved, Path::new(local), force) {
        Ok(_) if verbose => {
            CommandResult::output(vec![OutputLine::text(format!("{resolved} -> {local}"))])
        }
        Ok(_) => CommandResult::empty(),
        Err(err @ ClientError::OverwriteWithoutForce(_)) => {
            CommandResult::output(vec![OutputLine::error(err.to_string())])
        }
        Err(err) => CommandResult::output(vec![OutputLine::error(format!("get: {err}"))]),
    }
}

/// Execute `put`.
///
/// The overwrite guard runs here, before the transfer: the destination is
/// checked for an existing data object and the upload refused without
/// `--force`, instead of trusting the transfer client to enforce it.
fn execute_put(
    session: &Session,
    working: &Collection,
    local: &str,
    remote: &PathArg,
    force: bool,
    verbose: bool,
) -> CommandResult {
    let client = session.client();
    let resolved = resolve(remote.as_str(), Some(&working.path));
    if !force && client.get_data_object(&resolved).is_ok() {
        return CommandResult::output(vec![OutputLine::error(
            ClientError::OverwriteWithoutForce(remote.as_str().to_string()).to_string(),
        )]);
    }
    debug!(local, remote = %resolved, "put");
    match client.upload(Path::new(local), &resolved, force) {
        Ok(()) if verbose => {
            CommandResult::output(vec![OutputLine::text(format!("{local} -> {resolved}"))])
        }
        Ok(()) => CommandResult::empty(),
        Err(err @ ClientError::OverwriteWithoutForce(_)) => {
            CommandResult::output(vec![OutputLine::error(err.to_string())])
        }
        Err(err) => CommandResult::output(vec![OutputLine::error(format!("put: {err}"))]),
    }
}

/// Execute `rm`.
fn execute_rm(
    session: &Session,
    working: &Collection,
    target: &PathArg,
    force: bool,
) -> CommandResult {
    let client = session.client();
    match data_object_at(client, working, target.as_str()) {
        Ok(object) => match client.remove_data_object(&object, force) {
            Ok(()) => CommandResult::empty(),
            Err(err) => CommandResult::output(vec![OutputLine::error(format!("rm: {err}"))]),
        },
        Err(ClientError::DataObjectNotFound(_)) => CommandResult::output(vec![OutputLine::error(
            format!("rm: data object does not exist: {target}"),
        )]),
        Err(err) => CommandResult::output(vec![OutputLine::error(format!("rm: {err}"))]),
    }
}

/// Execute `mkdir`.
fn execute_mkdir(
    session: &Session,
    working: &Collection,
    target: &PathArg,
    verbose: bool,
) -> CommandResult {
    let resolved = resolve(target.as_str(), Some(&working.path));
    match session.client().create_collection(&resolved) {
        Ok(collection) if verbose => {
            CommandResult::output(vec![OutputLine::text(collection.path)])
        }
        Ok(_) => CommandResult::empty(),
        Err(err) => CommandResult::output(vec![OutputLine::error(format!("mkdir: {err}"))]),
    }
}

/// Execute `rmdir`.
fn execute_rmdir(
    session: &Session,
    working: &Collection,
    target: &PathArg,
    recursive: bool,
    force: bool,
    verbose: bool,
) -> CommandResult {
    let client = session.client();
    match collection_at(client, working, target.as_str()) {
        Ok(collection) => match client.remove_collection(&collection, recursive, force) {
            Ok(()) if verbose => CommandResult::output(vec![OutputLine::text(collection.path)]),
            Ok(()) => CommandResult::empty(),
            Err(ClientError::NotEmpty(_)) => CommandResult::output(vec![OutputLine::error(
                format!("rmdir: collection not empty: {target}"),
            )]),
            Err(err) => CommandResult::output(vec![OutputLine::error(format!("rmdir: {err}"))]),
        },
        Err(ClientError::CollectionNotFound(_)) => CommandResult::output(vec![OutputLine::error(
            format!("rmdir: collection does not exist: {target}"),
        )]),
        Err(err) => CommandResult::output(vec![OutputLine::error(format!("rmdir: {err}"))]),
    }
}

/// Execute `chksum`.
fn execute_chksum(session: &Session, working: &Collection, target: &PathArg) -> CommandResult {
    let client = session.client();
    match data_object_at(client, working, target.as_str()) {
        Ok(object) => match client.checksum(&object) {
            Ok(checksum) => {
                CommandResult::output(vec![OutputLine::text(format!("{target} {checksum}"))])
            }
            Err(err) => CommandResult::output(vec![OutputLine::error(format!("chksum: {err}"))]),
        },
        Err(ClientError::DataObjectNotFound(_)) => CommandResult::output(vec![OutputLine::error(
            format!("chksum: data object does not exist: {target}"),
        )]),
        Err(err) => CommandResult::output(vec![OutputLine::error(format!("chksum: {err}"))]),
    }
}

// =============================================================================
// Tests
// =============================================================================

//! Shell binary: startup, credential acquisition and the REPL loop.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rustyline::Editor;
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use tracing_subscriber::EnvFilter;

use irodsh::client::{ClientError, ServiceUrl, Session, SessionConfig, SessionError};
use irodsh::config::{PASSWORD_ENV_VAR, URL_ENV_VAR};
use irodsh::core::{Command, NavigationState, execute_command, resolve, split_line};
use irodsh::models::OutputLine;

/// Interactive shell for a remote data grid.
///
/// The service URL has the form `scheme://[user[:password]@]host[:port]/zone/path`
/// and falls back to the IRODS_URL environment variable. With a trailing
/// COMMAND the shell runs it once against the initial collection and exits.
#[derive(Debug, Parser)]
#[command(name = "irodsh", version)]
struct Cli {
    /// Service URL; defaults to $IRODS_URL.
    #[arg(long)]
    url: Option<String>,

    /// Manifest file seeding a mem:// namespace.
    #[arg(long, value_name = "FILE")]
    seed: Option<PathBuf>,

    /// One-shot command and its arguments.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    command: Vec<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("irodsh: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let raw_url = match cli.url.or_else(|| std::env::var(URL_ENV_VAR).ok()) {
        Some(raw) => raw,
        None => return Err(SessionError::MissingUrl.into()),
    };
    let url = ServiceUrl::parse(&raw_url)?;

    let user = url
        .user
        .clone()
        .or_else(os_username)
        .unwrap_or_else(|| "anonymous".to_string());
    let password = if url.requires_auth() {
        Some(acquire_password(&url)?)
    } else {
        url.password.clone()
    };

    let session = Session::connect(SessionConfig {
        url: url.clone(),
        user,
        password,
        seed: cli.seed,
    })?;

    let initial = match session.client().get_collection(&resolve(&url.path, None)) {
        Ok(collection) => collection,
        Err(ClientError::CollectionNotFound(_)) => {
            anyhow::bail!("collection does not exist: {}", url.path)
        }
        Err(err) => return Err(err.into()),
    };
    let mut nav = NavigationState::new(initial);

    if let Some((name, args)) = cli.command.split_first() {
        let result = execute_command(Command::parse(name, args), &session, &mut nav);
        print_output(&result.output);
        return Ok(ExitCode::SUCCESS);
    }

    run_repl(&session, &mut nav)?;
    Ok(ExitCode::SUCCESS)
}

/// URL password, then $IRODS_PASSWORD, then a masked prompt. An empty
/// environment value counts as unset.
fn acquire_password(url: &ServiceUrl) -> Result<String, SessionError> {
    if let Some(password) = &url.password {
        return Ok(password.clone());
    }
    if let Ok(password) = std::env::var(PASSWORD_ENV_VAR)
        && !password.is_empty()
    {
        return Ok(password);
    }
    rpassword::prompt_password("Password: ").map_err(|_| SessionError::PasswordCancelled)
}

fn os_username() -> Option<String> {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .ok()
        .filter(|name| !name.is_empty())
}

fn print_output(lines: &[OutputLine]) {
    for line in lines {
        if line.is_error() {
            eprintln!("{}", line.as_str());
        } else {
            println!("{}", line.as_str());
        }
    }
}

// =============================================================================
// REPL Loop
// =============================================================================

fn run_repl(session: &Session, nav: &mut NavigationState) -> anyhow::Result<()> {
    let mut rl: Editor<ShellHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(ShellHelper::new()));

    loop {
        let prompt = format!("{}@{}$ ", session.user(), nav.working().path);
        match rl.readline(&prompt) {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                let words = split_line(&line);
                let Some((name, args)) = words.split_first() else {
                    continue;
                };
                let result = execute_command(Command::parse(name, args), session, nav);
                print_output(&result.output);
                if result.exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("irodsh: readline error: {err}");
                break;
            }
        }
    }
    Ok(())
}

// =============================================================================
// Line Helper (tab completion)
// =============================================================================

struct ShellHelper {
    files: FilenameCompleter,
}

impl ShellHelper {
    fn new() -> Self {
        Self {
            files: FilenameCompleter::new(),
        }
    }
}

impl rustyline::Helper for ShellHelper {}

impl Highlighter for ShellHelper {}

impl Validator for ShellHelper {}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        None
    }
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let start = line[..pos]
            .rfind(|c: char| c.is_whitespace())
            .map(|i| i + 1)
            .unwrap_or(0);
        let word = &line[start..pos];
        let head: Vec<&str> = line[..start].split_whitespace().collect();

        // First token: command names.
        if head.is_empty() {
            let pairs = Command::names()
                .iter()
                .filter(|name| name.starts_with(word))
                .map(|name| Pair {
                    display: (*name).to_string(),
                    replacement: (*name).to_string(),
                })
                .collect();
            return Ok((start, pairs));
        }

        // Transfer commands take local paths; complete filenames for those.
        if matches!(head[0], "get" | "iget" | "put" | "iput") {
            return self.files.complete(line, pos, ctx);
        }
        Ok((start, Vec::new()))
    }
}

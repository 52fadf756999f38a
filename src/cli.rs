//! CLI interface for taskcmd.
//!
//! Each subcommand is non-interactive: arguments in, structured output out.
//!
//! - `taskcmd commands` lists the logging commands a worker understands.
//! - `taskcmd replay <file>` feeds recorded commands through a fresh job run
//!   and prints what the run did, with secrets masked.

mod format;
mod replay;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::job::JobFile;
use crate::restricted::resolve_restricted;

use format::format_command_table;
use replay::replay;

/// taskcmd: process task logging commands the way a build worker does.
#[derive(Debug, Parser)]
#[command(name = "taskcmd", after_long_help = REPLAY_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

const REPLAY_HELP: &str = r#"Replay input is JSON lines, one command per line:
  {"name": "logdetail", "properties": {"id": "...", "name": "Build", "type": "Task"}}
  {"name": "setvariable", "properties": {"variable": "out"}, "data": "42"}
  {"name": "complete", "properties": {"result": "Succeeded"}}

Examples:
  taskcmd replay run.jsonl --job job.toml
  taskcmd replay run.jsonl --restricted --out summary.json"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every logging command, its aliases, and whether it runs in
    /// restricted mode.
    Commands,

    /// Replay recorded commands through a fresh job run.
    ///
    /// Failed commands mark the run Failed and replay continues. A
    /// `complete` with `done=true` ends the replay early.
    /// The summary JSON is written to `--out` (if given) or stdout.
    Replay {
        /// JSON-lines file of commands.
        input: PathBuf,

        /// Job file describing variables, endpoints, and paths.
        #[arg(long)]
        job: Option<PathBuf>,

        /// Reject commands that are not allowed in restricted mode.
        #[arg(long)]
        restricted: bool,

        /// Write the summary JSON to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config) -> Result<(), String> {
    let cli = Cli::parse();
    let dispatcher =
        Dispatcher::task_commands().map_err(|e| format!("failed to register commands: {e}"))?;

    match cli.command {
        Command::Commands => {
            print!("{}", format_command_table(dispatcher.descriptors()));
            Ok(())
        }
        Command::Replay {
            input,
            job,
            restricted,
            out,
        } => {
            let restricted = resolve_restricted(restricted, config);
            cmd_replay(config, &dispatcher, &input, job, restricted, out)
        }
    }
}

fn cmd_replay(
    config: &Config,
    dispatcher: &Dispatcher,
    input: &Path,
    job: Option<PathBuf>,
    restricted: bool,
    out: Option<PathBuf>,
) -> Result<(), String> {
    let job = match job {
        Some(path) => JobFile::load(&path).map_err(|e| e.to_string())?,
        None => JobFile::default(),
    };
    let context = job.into_context(config.read_only_variables);

    let lines = fs::read_to_string(input)
        .map_err(|e| format!("failed to read {}: {e}", input.display()))?;

    let outcome = replay(dispatcher, context, restricted, &lines)?;
    let json = outcome.to_json()?;

    match out {
        Some(path) => {
            fs::write(&path, &json)
                .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
            eprintln!("{} → {}", outcome.describe(), path.display());
        }
        None => {
            println!("{json}");
        }
    }

    Ok(())
}

//! notedex command-line entry point.
//!
//! # Responsibility
//! - Parse CLI flags and bootstrap core logging.
//! - Run the note command protocol over stdin/stdout.

use clap::Parser;
use log::error;
use notedex_core::{default_log_level, init_logging, run_session, LogLevel, NoteSession};
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

/// In-memory note search over a CREATE/SEARCH/UPDATE/DELETE line protocol.
#[derive(Parser, Debug)]
#[command(name = "notedex")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log verbosity (trace|debug|info|warn|error); defaults per build mode
    #[arg(long)]
    log_level: Option<LogLevel>,

    /// Absolute directory for rolling log files; logging is off when omitted
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Print session statistics to stderr on exit
    #[arg(long)]
    stats: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.unwrap_or_else(default_log_level);
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("notedex: {err}");
            return ExitCode::FAILURE;
        }
    }

    let mut session = NoteSession::new();
    let stdin = io::stdin();
    let mut stdout = BufWriter::new(io::stdout().lock());

    let summary = match run_session(&mut session, stdin.lock(), &mut stdout) {
        Ok(summary) => summary,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={}", err);
            eprintln!("notedex: {err}");
            return ExitCode::FAILURE;
        }
    };

    if cli.stats {
        let stats = session.stats();
        eprintln!(
            "commands={} failures={} documents={} live={} content_nodes={} tag_nodes={}",
            summary.commands,
            summary.failures,
            stats.documents,
            stats.live_documents,
            stats.content_nodes,
            stats.tag_nodes
        );
    }

    ExitCode::SUCCESS
}

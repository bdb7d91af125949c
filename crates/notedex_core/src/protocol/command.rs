//! Line-oriented command protocol.
//!
//! # Responsibility
//! - Read `CREATE`/`SEARCH`/`UPDATE`/`DELETE` commands and their payloads.
//! - Dispatch them to a [`NoteSession`] and write SEARCH results.
//!
//! # Invariants
//! - Command keywords are matched case-sensitively after trimming.
//! - Any other line, a blank line or end of input ends the session.
//! - A failing command is logged and counted; only I/O errors abort the loop.
//! - Every SEARCH writes exactly one line, empty when nothing matches.

use crate::model::document::DocumentId;
use crate::protocol::record::{parse_note_record, RecordError, NOTE_CLOSE_MARKER};
use crate::service::note_service::{NoteServiceError, NoteSession};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};

pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Protocol-layer error.
#[derive(Debug)]
pub enum ProtocolError {
    /// Reading commands or writing results failed.
    Io(io::Error),
    /// A note payload could not be read or parsed.
    Record(RecordError),
    /// The session rejected the command.
    Service(NoteServiceError),
}

impl Display for ProtocolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "protocol i/o failed: {err}"),
            Self::Record(err) => write!(f, "{err}"),
            Self::Service(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProtocolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Record(err) => Some(err),
            Self::Service(err) => Some(err),
        }
    }
}

impl From<io::Error> for ProtocolError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<NoteServiceError> for ProtocolError {
    fn from(value: NoteServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<RecordError> for ProtocolError {
    fn from(value: RecordError) -> Self {
        Self::Record(value)
    }
}

/// Command keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Create,
    Search,
    Update,
    Delete,
}

impl Command {
    /// Parses a command line; `None` for anything that ends the session.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "CREATE" => Some(Self::Create),
            "SEARCH" => Some(Self::Search),
            "UPDATE" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Search => "search",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Counters for one protocol run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Commands dispatched, including failed ones.
    pub commands: usize,
    /// Commands that failed and were skipped.
    pub failures: usize,
}

/// Joins ids with `,` and no surrounding punctuation.
pub fn format_ids(ids: &[DocumentId]) -> String {
    ids.join(",")
}

/// Collects lines up to and including the first line ending in `</note>`.
///
/// # Errors
/// - [`ProtocolError::Record`] with [`RecordError::Truncated`] when input
///   ends first.
/// - [`ProtocolError::Io`] when reading fails.
pub fn read_note_block<I>(lines: &mut I) -> ProtocolResult<String>
where
    I: Iterator<Item = io::Result<String>>,
{
    let mut block = String::new();
    for line in lines {
        let line = line?;
        block.push_str(&line);
        block.push('\n');
        if line.trim_end().ends_with(NOTE_CLOSE_MARKER) {
            return Ok(block);
        }
    }
    Err(RecordError::Truncated.into())
}

/// Runs the command loop until a terminating line or end of input.
///
/// # Errors
/// - [`ProtocolError::Io`] when reading input or writing output fails.
pub fn run_session<R, W>(
    session: &mut NoteSession,
    input: R,
    output: &mut W,
) -> ProtocolResult<RunSummary>
where
    R: BufRead,
    W: Write,
{
    let mut summary = RunSummary::default();
    let mut lines = input.lines();

    while let Some(line) = lines.next() {
        let line = line?;
        let Some(command) = Command::parse(&line) else {
            break;
        };
        summary.commands += 1;

        match dispatch(session, command, &mut lines, output) {
            Ok(()) => {}
            Err(ProtocolError::Io(err)) => return Err(ProtocolError::Io(err)),
            Err(err) => {
                summary.failures += 1;
                warn!(
                    "event=command module=protocol status=error command={} error={}",
                    command.as_str(),
                    err
                );
                if matches!(err, ProtocolError::Record(RecordError::Truncated)) {
                    break;
                }
            }
        }
    }

    output.flush()?;
    info!(
        "event=session_end module=protocol status=ok commands={} failures={}",
        summary.commands, summary.failures
    );
    Ok(summary)
}

fn dispatch<I, W>(
    session: &mut NoteSession,
    command: Command,
    lines: &mut I,
    output: &mut W,
) -> ProtocolResult<()>
where
    I: Iterator<Item = io::Result<String>>,
    W: Write,
{
    match command {
        Command::Create => {
            let doc = parse_note_record(&read_note_block(lines)?)?;
            session.create(doc);
        }
        Command::Update => {
            let doc = parse_note_record(&read_note_block(lines)?)?;
            session.update(doc);
        }
        Command::Search => {
            let query = next_payload(lines)?;
            match session.search(&query) {
                Ok(hits) => writeln!(output, "{}", format_ids(&hits))?,
                Err(err) => {
                    writeln!(output)?;
                    return Err(err.into());
                }
            }
        }
        Command::Delete => {
            let id = next_payload(lines)?;
            session.delete(id.trim())?;
        }
    }
    Ok(())
}

fn next_payload<I>(lines: &mut I) -> ProtocolResult<String>
where
    I: Iterator<Item = io::Result<String>>,
{
    Ok(lines.next().transpose()?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::{format_ids, read_note_block, Command, ProtocolError};
    use crate::protocol::record::RecordError;
    use std::io::{self, BufRead, Cursor};

    #[test]
    fn command_keywords_are_case_sensitive() {
        assert_eq!(Command::parse("  CREATE "), Some(Command::Create));
        assert_eq!(Command::parse("search"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn format_ids_joins_without_brackets() {
        assert_eq!(format_ids(&["n1".to_string(), "n2".to_string()]), "n1,n2");
        assert_eq!(format_ids(&[]), "");
    }

    #[test]
    fn read_note_block_stops_at_closing_marker() {
        let mut lines = Cursor::new("<note>\n<guid>a</guid>\n</note>\nSEARCH\n").lines();
        let block = read_note_block(&mut lines).unwrap();
        assert!(block.ends_with("</note>\n"));
        assert_eq!(lines.next().transpose().unwrap().as_deref(), Some("SEARCH"));
    }

    #[test]
    fn read_note_block_reports_truncation() {
        let mut lines = Cursor::new("<note>\n<guid>a</guid>\n").lines();
        let err = read_note_block(&mut lines).unwrap_err();
        assert!(matches!(err, ProtocolError::Record(RecordError::Truncated)));

        let mut failing = vec![Err(io::Error::other("boom"))].into_iter();
        let err = read_note_block(&mut failing).unwrap_err();
        assert!(matches!(err, ProtocolError::Io(_)));
    }
}

use notedex_core::{run_session, NoteSession, RunSummary};
use std::io::Cursor;

fn run(input: &str) -> (String, RunSummary, NoteSession) {
    let mut session = NoteSession::new();
    let mut output = Vec::new();
    let summary = run_session(&mut session, Cursor::new(input), &mut output).unwrap();
    (String::from_utf8(output).unwrap(), summary, session)
}

const SEED: &str = "CREATE
<note>
  <guid>n1</guid>
  <created>2014-01-03T00:00:00Z</created>
  <tag>work</tag>
  <content>Remember the milk</content>
</note>
CREATE
<note>
  <guid>n2</guid>
  <created>2014-01-05T00:00:00Z</created>
  <tag>personal</tag>
  <content>Buy eggs and milk</content>
</note>
";

#[test]
fn full_protocol_scenario() {
    let input = format!(
        "{SEED}SEARCH
milk
SEARCH
tag:work
SEARCH
created:20140104
SEARCH
mi*
DELETE
n1
SEARCH
milk
UPDATE
<note>
  <guid>n2</guid>
  <created>2014-01-05T00:00:00Z</created>
  <tag>personal</tag>
  <content>Buy bread</content>
</note>
SEARCH
milk
SEARCH
bread
"
    );
    let (output, summary, _) = run(&input);

    assert_eq!(output, "n1,n2\nn1\nn2\nn1,n2\nn2\n\nn2\n");
    assert_eq!(summary.commands, 11);
    assert_eq!(summary.failures, 0);
}

#[test]
fn unknown_line_ends_session() {
    let input = format!("{SEED}QUIT\nSEARCH\nmilk\n");
    let (output, summary, session) = run(&input);

    assert!(output.is_empty());
    assert_eq!(summary.commands, 2);
    assert_eq!(session.stats().documents, 2);
}

#[test]
fn failed_commands_do_not_end_session() {
    let input = "CREATE
<note><guid>bad</guid><created>soon</created><content>x</content></note>
DELETE
ghost
SEARCH
created:tomorrow
CREATE
<note><guid>ok</guid><created>2014-02-01T10:00:00Z</created><content>still works</content></note>
SEARCH
works
";
    let (output, summary, _) = run(input);

    assert_eq!(output, "\nok\n");
    assert_eq!(summary.commands, 5);
    assert_eq!(summary.failures, 3);
}

#[test]
fn truncated_record_stops_reading() {
    let input = "CREATE\n<note>\n<guid>n1</guid>\n";
    let (output, summary, session) = run(input);

    assert!(output.is_empty());
    assert_eq!(summary.failures, 1);
    assert!(session.get("n1").is_none());
}

#[test]
fn search_at_end_of_input_prints_empty_line() {
    let (output, summary, _) = run("SEARCH\n");
    assert_eq!(output, "\n");
    assert_eq!(summary.commands, 1);
}

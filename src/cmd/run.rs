/*!
`run.rs`

Implements `webdev run <PATH>...`: resolve the path (abbreviations allowed) and run
the action it names.

Behavior:
  - Ran                    : action output goes to stdout, exit 0
  - AmbiguousOrIncomplete  : message plus the candidates at that point, exit 2
  - Unknown                : "unknown command", exit 2
  - ActionFailed           : the action's error, exit 1

The outcome is reported once, on stdout; the process then exits with the status
above without a second report from `main`.

JSON Output Shape:
{
  "status": "ok" | "incomplete" | "unknown" | "error",
  "input": "cle hist",
  "path": "clear history",        (ok / error only)
  "prefix": "clear ",             (incomplete only; canonical path so far)
  "message": "...",               (everything but ok)
  "output": ["cleared history"],  (lines the action echoed)
  "candidates": [ {"text": "...", "description": "..."} ]   (incomplete only)
}
*/

use anyhow::Result;
use clap::Args;
use std::io::{self, Write};
use std::sync::Arc;

use crate::cmd::format::{Role, StyleOptions, box_header, color, table};
use crate::cmd::shared::{Session, Settings};
use crate::tree::{Candidate, DispatchOutcome};
use crate::webdev::{BufferConsole, Console, StdoutConsole};

/// CLI arguments for `webdev run <PATH>...`
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Command path, e.g. `outline positioned absolute` or `out pos abs`
    #[arg(value_name = "PATH")]
    pub path: Vec<String>,

    /// Output JSON instead of human-readable text
    #[arg(long)]
    pub json: bool,
}

/// Entry point for the run subcommand.
pub fn execute_run(args: RunArgs, settings: Settings) -> Result<()> {
    let input = args.path.join(" ");

    if args.json {
        let buffer = Arc::new(BufferConsole::new());
        let session = Session::new(settings, buffer.clone())?;
        let outcome = session.execute(&input);
        let candidates = incomplete_candidates(&session, &input, &outcome);
        let body = outcome_json(&input, &outcome, buffer.drain(), &candidates);
        println!(
            "{}",
            serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string())
        );
        return finish(&outcome);
    }

    let console: Arc<dyn Console> = Arc::new(StdoutConsole);
    let session = Session::new(settings, console)?;
    let outcome = session.execute(&input);
    if !outcome.is_success() {
        let style = StyleOptions::detect();
        println!("{}", describe_failure(&input, &outcome, &style));
        let candidates = incomplete_candidates(&session, &input, &outcome);
        if !candidates.is_empty() {
            println!("{}", candidate_table(&candidates, &style));
        }
    }
    finish(&outcome)
}

/// Candidates for an incomplete `input` (only the matching subset when the last
/// token was ambiguous); empty for other outcomes.
pub fn incomplete_candidates(
    session: &Session,
    input: &str,
    outcome: &DispatchOutcome,
) -> Vec<Candidate> {
    match outcome {
        DispatchOutcome::AmbiguousOrIncomplete { .. } => session.complete(input),
        _ => Vec::new(),
    }
}

pub fn candidate_table(candidates: &[Candidate], style: &StyleOptions) -> String {
    let rows: Vec<Vec<String>> = candidates
        .iter()
        .map(|c| vec![c.text.clone(), c.description.clone()])
        .collect();
    table(&["COMPLETION", "DESCRIPTION"], &rows, style)
}

fn describe_failure(input: &str, outcome: &DispatchOutcome, style: &StyleOptions) -> String {
    let title = match outcome {
        DispatchOutcome::Unknown { .. } => "Unknown command",
        DispatchOutcome::AmbiguousOrIncomplete { .. } => "Incomplete command",
        DispatchOutcome::ActionFailed { .. } => "Action failed",
        DispatchOutcome::Ran { .. } => "Done",
    };
    let subtitle = color(Role::Error, format!("'{input}': {outcome}"), style);
    box_header(title, Some(subtitle), style)
}

fn outcome_json(
    input: &str,
    outcome: &DispatchOutcome,
    output: Vec<String>,
    candidates: &[Candidate],
) -> serde_json::Value {
    let mut body = serde_json::json!({
        "status": outcome.status(),
        "input": input,
        "output": output,
    });
    if let serde_json::Value::Object(ref mut map) = body {
        match outcome {
            DispatchOutcome::Ran { path } => {
                map.insert("path".into(), path.clone().into());
            }
            DispatchOutcome::ActionFailed { path, .. } => {
                map.insert("path".into(), path.clone().into());
                map.insert("message".into(), outcome.to_string().into());
            }
            DispatchOutcome::AmbiguousOrIncomplete { prefix, .. } => {
                map.insert("prefix".into(), prefix.clone().into());
                map.insert("message".into(), outcome.to_string().into());
                map.insert(
                    "candidates".into(),
                    serde_json::to_value(candidates).unwrap_or_default(),
                );
            }
            DispatchOutcome::Unknown { .. } => {
                map.insert("message".into(), outcome.to_string().into());
            }
        }
    }
    body
}

/// 0 on success, 2 when the path itself was bad, 1 when the action failed.
fn exit_status(outcome: &DispatchOutcome) -> i32 {
    match outcome {
        DispatchOutcome::Ran { .. } => 0,
        DispatchOutcome::AmbiguousOrIncomplete { .. } | DispatchOutcome::Unknown { .. } => 2,
        DispatchOutcome::ActionFailed { .. } => 1,
    }
}

fn finish(outcome: &DispatchOutcome) -> Result<()> {
    let code = exit_status(outcome);
    if code != 0 {
        io::stdout().flush()?;
        std::process::exit(code);
    }
    Ok(())
}

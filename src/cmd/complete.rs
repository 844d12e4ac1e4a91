/*!
`complete.rs`

Implements `webdev complete <PATH>...`: list the completion candidates for a partial
path, the same list an interactive host would show on <Tab>.

JSON Output Shape:
{
  "input": "clear c",
  "count": 3,
  "candidates": [ {"text": "clear ", "description": "..."}, ... ]
}
*/

use anyhow::Result;
use clap::Args;
use std::sync::Arc;

use crate::cmd::format::{Role, StyleOptions, box_header, color};
use crate::cmd::run::candidate_table;
use crate::cmd::shared::{Session, Settings};
use crate::tree::Candidate;
use crate::webdev::BufferConsole;

/// CLI arguments for `webdev complete <PATH>...`
#[derive(Args, Debug)]
pub struct CompleteArgs {
    /// Partial command path; empty lists the top level
    #[arg(value_name = "PATH")]
    pub path: Vec<String>,

    /// Output JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn execute_complete(args: CompleteArgs, settings: Settings) -> Result<()> {
    let input = args.path.join(" ");
    // Completion never runs an action, so nothing reaches the console.
    let session = Session::new(settings, Arc::new(BufferConsole::new()))?;
    let candidates = session.complete(&input);

    if args.json {
        let body = completion_json(&input, &candidates);
        println!(
            "{}",
            serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string())
        );
        return Ok(());
    }

    let style = StyleOptions::detect();
    let subtitle = format!("{} candidate(s)", candidates.len());
    println!(
        "{}",
        box_header(format!("complete '{input}'"), Some(subtitle), &style)
    );
    if candidates.is_empty() {
        println!("{}", color(Role::Dim, "(no candidates)", &style));
    } else {
        println!("{}", candidate_table(&candidates, &style));
    }
    Ok(())
}

fn completion_json(input: &str, candidates: &[Candidate]) -> serde_json::Value {
    serde_json::json!({
        "input": input,
        "count": candidates.len(),
        "candidates": candidates,
    })
}

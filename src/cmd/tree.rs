/*!
`tree.rs`

Implements `webdev tree`: print every path the command tree accepts, one token per
line, indented by depth. Hidden entries show only with `--show-hidden` (or
`show_hidden` in the settings file).

JSON Output Shape:
{
  "command": "webdev",
  "show_hidden": false,
  "tree": [ {"token": "clear", "description": "Clear data ...", "children": [...]}, ... ]
}
*/

use anyhow::Result;
use clap::Args;
use std::sync::Arc;

use crate::cmd::shared::{Session, Settings};
use crate::webdev::BufferConsole;

/// CLI arguments for `webdev tree`
#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Output JSON (nested entries with descriptions)
    #[arg(long)]
    pub json: bool,
}

pub fn execute_tree(args: TreeArgs, settings: Settings) -> Result<()> {
    let session = Session::new(settings, Arc::new(BufferConsole::new()))?;
    if args.json {
        let body = tree_json(&session);
        println!(
            "{}",
            serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string())
        );
    } else {
        println!("{}", session.render());
    }
    Ok(())
}

fn tree_json(session: &Session) -> serde_json::Value {
    serde_json::json!({
        "command": session.settings().command,
        "show_hidden": session.settings().engine.show_hidden,
        "tree": session.entries(),
    })
}

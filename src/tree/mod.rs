/*!
Command tree resolution engine.

Maps a space-separated command path onto a tree of actions and groups:
  - node.rs      Action / Group / LazyGroup and group-aware lookup
  - validate.rs  startup integrity check (duplicates, defaults, bad tokens, depth)
  - resolve.rs   exact-first, unique-prefix path resolution
  - complete.rs  completion candidates built on top of resolution
  - dispatch.rs  run the resolved action, catching its failures
  - render.rs    full tree listing for debugging

All operations are synchronous and take the tree by shared reference. The only
state read during a call is whatever LazyGroup generators read, so identical input
against a static tree always gives identical output.
*/

use serde::{Deserialize, Serialize};

pub mod complete;
pub mod dispatch;
pub mod node;
pub mod render;
pub mod resolve;
pub mod validate;

pub use complete::{Candidate, complete};
pub use dispatch::{DispatchOutcome, execute};
pub use node::{Action, Group, LazyGroup, Node};
pub use render::{TreeEntry, entries, render_tree};

/// Presentation switches for completion and rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// List `.`-prefixed tokens.
    pub show_hidden: bool,
    /// Skip the "..." entry that offers the bare prefix.
    pub quick_complete: bool,
}

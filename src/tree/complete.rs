//! Completion candidates for a partial command path.
//!
//! Goes through `resolve`, so completion and execution always agree on what a path
//! means.

use serde::Serialize;

use super::EngineConfig;
use super::node::{Group, Node, is_hidden};
use super::resolve::{Resolution, resolve};

/// Description of the synthetic "stop here" entry.
pub const PARENT_ECHO: &str = "...";

/// One completion: the text to insert and the description to show next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub text: String,
    pub description: String,
}

impl Candidate {
    pub fn new(text: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            description: description.into(),
        }
    }
}

/// List completion candidates for `path`.
pub fn complete(root: &Node, path: &str, config: &EngineConfig) -> Vec<Candidate> {
    match resolve(root, path) {
        Resolution::NotFound => Vec::new(),
        Resolution::Resolved { path, action } => {
            vec![Candidate::new(path, action.description())]
        }
        Resolution::Ambiguous { prefix, group } => list_group(&prefix, &group, config),
    }
}

fn list_group(prefix: &str, group: &Group, config: &EngineConfig) -> Vec<Candidate> {
    let mut out = Vec::with_capacity(group.len() + 1);

    let default = group.default_node();
    if let Some((_, node)) = default {
        out.push(Candidate::new(prefix, node.description()));
    }

    for token in group.sorted_tokens() {
        if default.is_some_and(|(d, _)| d == token) {
            continue;
        }
        if is_hidden(token) && !config.show_hidden {
            continue;
        }
        let Some(node) = group.lookup(token) else {
            continue;
        };
        out.push(Candidate::new(format!("{prefix}{token}"), node.description()));
    }

    if !config.quick_complete && default.is_none() && out.len() > 1 {
        out.insert(0, Candidate::new(prefix, PARENT_ECHO));
    }
    out
}

//! Startup integrity check for a command tree.
//!
//! Walks the whole tree once, expanding every LazyGroup a single time, and fails on
//! the first construction mistake found.

use super::node::{ESCAPE_TOKEN, Group, ModelError, Node};

/// Nesting limit; a generator that keeps producing itself trips this.
pub const MAX_DEPTH: usize = 32;

impl Node {
    /// Check token validity, duplicates and default children across the whole tree.
    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            Node::Action(_) => Err(ModelError::NotAGroup {
                path: String::new(),
            }),
            _ => walk(self, "", 0),
        }
    }
}

fn walk(node: &Node, path: &str, depth: usize) -> Result<(), ModelError> {
    if node.is_action() {
        return Ok(());
    }
    if depth > MAX_DEPTH {
        return Err(ModelError::TooDeep {
            path: path.to_string(),
            limit: MAX_DEPTH,
        });
    }
    let group = node.expand()?;
    check_group(&group, path)?;

    for token in group.sorted_tokens() {
        if let Some(child) = group.lookup(token) {
            walk(child, &join(path, token), depth + 1)?;
        }
    }
    Ok(())
}

fn check_group(group: &Group, path: &str) -> Result<(), ModelError> {
    if let Some(token) = group.duplicates().next() {
        return Err(ModelError::DuplicateToken {
            path: path.to_string(),
            token: token.clone(),
        });
    }

    for token in group.sorted_tokens() {
        if token.is_empty() || token.contains(char::is_whitespace) || token == ESCAPE_TOKEN {
            return Err(ModelError::InvalidToken {
                path: path.to_string(),
                token: token.to_string(),
            });
        }
    }

    if let Some(token) = group.default_child() {
        match group.lookup(token) {
            None => {
                return Err(ModelError::MissingDefault {
                    path: path.to_string(),
                    token: token.to_string(),
                });
            }
            Some(child) if !child.is_action() => {
                return Err(ModelError::DefaultNotAction {
                    path: path.to_string(),
                    token: token.to_string(),
                });
            }
            Some(_) => {}
        }
    }
    Ok(())
}

fn join(path: &str, token: &str) -> String {
    if path.is_empty() {
        token.to_string()
    } else {
        format!("{path} {token}")
    }
}

//! Tree introspection: the whole namespace, lazy groups expanded at render time.

use serde::Serialize;

use super::node::{Node, is_hidden};

/// Indentation added per level.
pub const INDENT: &str = "\t";

/// One rendered node, for structured (JSON) output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEntry {
    pub token: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeEntry>,
}

/// Depth-first token listing, one token per line, children one `INDENT` deeper
/// than their parent. Top-level tokens carry one `INDENT`.
pub fn render_tree(root: &Node, show_hidden: bool) -> String {
    let mut lines = Vec::new();
    push_lines(&entries(root, show_hidden), 1, &mut lines);
    lines.join("\n")
}

/// Structured form of the tree. An action root has no entries.
pub fn entries(root: &Node, show_hidden: bool) -> Vec<TreeEntry> {
    let Ok(group) = root.expand() else {
        return Vec::new();
    };
    group
        .sorted_tokens()
        .filter(|token| show_hidden || !is_hidden(token))
        .filter_map(|token| {
            let node = group.lookup(token)?;
            Some(TreeEntry {
                token: token.to_string(),
                description: node.description(),
                children: entries(node, show_hidden),
            })
        })
        .collect()
}

fn push_lines(entries: &[TreeEntry], depth: usize, out: &mut Vec<String>) {
    for e in entries {
        out.push(format!("{}{}", INDENT.repeat(depth), e.token));
        push_lines(&e.children, depth + 1, out);
    }
}

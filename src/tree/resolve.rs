/*!
resolve.rs - walk a command path down the tree.

Matching rules, applied one token at a time from the front of the path:
  1. `?` stops the walk where it stands.
  2. A token equal to a child key matches that child alone, even when longer
     siblings share the prefix (`cache` never collides with `cache2`).
  3. Otherwise every child key starting with the token matches.
  4. No match aborts the whole walk with `NotFound`, however much already resolved.
  5. One match descends; several stop the walk with the matching subset.

Canonical paths are rebuilt from the matched keys, so `cle hist` and
`clear history` resolve to the same thing.
*/

use std::sync::Arc;

use tracing::{debug, trace};

use super::node::{Action, ESCAPE_TOKEN, Group, Node};

/// Result of walking a path.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// The path names an action. `path` is the fully spelled-out token sequence.
    Resolved { path: String, action: Action },
    /// The path stops inside a group. `prefix` is the canonical path so far, with a
    /// trailing space after each token, ready to have a child token appended.
    /// `group` is either the group reached or the subset of children that matched an
    /// ambiguous fragment.
    Ambiguous { prefix: String, group: Arc<Group> },
    /// Some token matched nothing.
    NotFound,
}

/// Resolve a whitespace-separated path against `root`.
pub fn resolve(root: &Node, path: &str) -> Resolution {
    let tokens: Vec<&str> = path.split_whitespace().collect();
    resolve_tokens(root, &tokens)
}

/// Resolve pre-split tokens against `root`.
pub fn resolve_tokens(root: &Node, tokens: &[&str]) -> Resolution {
    let mut current = root.clone();
    let mut prefix = String::new();

    for (idx, &head) in tokens.iter().enumerate() {
        let group = match &current {
            Node::Action(action) => {
                if head == ESCAPE_TOKEN {
                    return resolved(&prefix, action.clone());
                }
                debug!(token = head, "path continues past an action");
                return Resolution::NotFound;
            }
            other => match other.expand() {
                Ok(g) => g,
                Err(_) => return Resolution::NotFound,
            },
        };

        if head == ESCAPE_TOKEN {
            trace!(prefix = %prefix, "escape token");
            return Resolution::Ambiguous { prefix, group };
        }

        let matches = match_tokens(&group, head);
        match matches.as_slice() {
            [] => {
                debug!(token = head, position = idx, "no child matches");
                return Resolution::NotFound;
            }
            [only] => {
                let Some(child) = group.lookup(only) else {
                    return Resolution::NotFound;
                };
                trace!(token = head, matched = %only, "descend");
                prefix.push_str(only);
                prefix.push(' ');
                current = child.clone();
            }
            many => {
                debug!(token = head, candidates = many.len(), "ambiguous token");
                let subset = group.subset(many.iter().map(String::as_str));
                return Resolution::Ambiguous {
                    prefix,
                    group: Arc::new(subset),
                };
            }
        }
    }

    match current {
        Node::Action(action) => resolved(&prefix, action),
        other => match other.expand() {
            Ok(group) => Resolution::Ambiguous { prefix, group },
            Err(_) => Resolution::NotFound,
        },
    }
}

/// Child keys matching `head`: the exact key alone if present, else all keys it prefixes.
pub fn match_tokens(group: &Group, head: &str) -> Vec<String> {
    if group.contains(head) {
        return vec![head.to_string()];
    }
    group
        .sorted_tokens()
        .filter(|k| k.starts_with(head))
        .map(str::to_string)
        .collect()
}

fn resolved(prefix: &str, action: Action) -> Resolution {
    Resolution::Resolved {
        path: prefix.trim_end().to_string(),
        action,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::node::LazyGroup;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn leaf(desc: &str) -> Action {
        Action::new(desc, || Ok(()))
    }

    fn sample() -> Node {
        Group::new()
            .child("toolbar", leaf("Toggle toolbar"))
            .child(
                "clear",
                Group::new()
                    .describe("Clear data ...")
                    .child("cache", leaf("Clear cache"))
                    .child("cache2", leaf("Clear second cache"))
                    .child("cookies", leaf("Clear cookies"))
                    .child("history", leaf("Clear history")),
            )
            .child(
                "outline",
                Group::new()
                    .child("frames", leaf("Outline frames"))
                    .child(
                        "positioned",
                        Group::new()
                            .child("absolute", leaf("Outline absolute"))
                            .child("fixed", leaf("Outline fixed")),
                    ),
            )
            .child(".debug", Group::new().child("cmd_tree", leaf("Display tree")))
            .into()
    }

    fn not_found(r: &Resolution) -> bool {
        matches!(r, Resolution::NotFound)
    }

    fn resolved_path(r: &Resolution) -> Option<(&str, &str)> {
        match r {
            Resolution::Resolved { path, action } => Some((path.as_str(), action.description())),
            _ => None,
        }
    }

    fn ambiguous_keys(r: &Resolution) -> Option<(String, Vec<String>)> {
        match r {
            Resolution::Ambiguous { prefix, group } => {
                Some((prefix.clone(), group.sorted_tokens().map(str::to_string).collect()))
            }
            _ => None,
        }
    }

    #[test]
    fn exact_match_beats_longer_sibling() {
        let root = sample();
        let r = resolve(&root, "clear cache");
        assert_eq!(resolved_path(&r), Some(("clear cache", "Clear cache")));
    }

    #[test]
    fn unique_prefix_matches_full_path() {
        let root = sample();
        let short = resolve(&root, "cle hist");
        let long = resolve(&root, "clear history");
        assert_eq!(resolved_path(&short), Some(("clear history", "Clear history")));
        assert_eq!(resolved_path(&short), resolved_path(&long));
    }

    #[test]
    fn ambiguous_fragment_yields_matching_subset() {
        let root = sample();
        let r = resolve(&root, "clear c");
        let (prefix, keys) = ambiguous_keys(&r).expect("ambiguous");
        assert_eq!(prefix, "clear ");
        assert_eq!(keys, vec!["cache", "cache2", "cookies"]);
    }

    #[test]
    fn ambiguity_stops_consuming_tokens() {
        let root = sample();
        let r = resolve(&root, "clear c bogus");
        let (prefix, keys) = ambiguous_keys(&r).expect("ambiguous");
        assert_eq!(prefix, "clear ");
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn bad_token_anywhere_is_not_found() {
        let root = sample();
        assert!(not_found(&resolve(&root, "clear bogus")));
        assert!(not_found(&resolve(&root, "bogus cache")));
        assert!(not_found(&resolve(&root, "outline positioned nope")));
    }

    #[test]
    fn tokens_past_an_action_are_not_found() {
        let root = sample();
        assert!(not_found(&resolve(&root, "toolbar extra")));
    }

    #[test]
    fn escape_token_stops_at_current_group() {
        let root = sample();
        let r = resolve(&root, "outline ? pos abs");
        let (prefix, keys) = ambiguous_keys(&r).expect("ambiguous");
        assert_eq!(prefix, "outline ");
        assert_eq!(keys, vec!["frames", "positioned"]);
    }

    #[test]
    fn escape_on_action_resolves_it() {
        let root = sample();
        let r = resolve(&root, "toolbar ?");
        assert_eq!(resolved_path(&r), Some(("toolbar", "Toggle toolbar")));
    }

    #[test]
    fn empty_path_lands_on_root() {
        let root = sample();
        let r = resolve(&root, "   ");
        let (prefix, keys) = ambiguous_keys(&r).expect("ambiguous");
        assert_eq!(prefix, "");
        assert_eq!(keys, vec![".debug", "clear", "outline", "toolbar"]);
    }

    #[test]
    fn group_terminus_is_ambiguous_with_canonical_prefix() {
        let root = sample();
        let r = resolve(&root, "out pos");
        let (prefix, keys) = ambiguous_keys(&r).expect("ambiguous");
        assert_eq!(prefix, "outline positioned ");
        assert_eq!(keys, vec!["absolute", "fixed"]);
    }

    #[test]
    fn hidden_tokens_resolve_by_prefix() {
        let root = sample();
        let r = resolve(&root, ".d cmd");
        assert_eq!(resolved_path(&r), Some((".debug cmd_tree", "Display tree")));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let root = sample();
        assert!(not_found(&resolve(&root, "CLEAR cache")));
    }

    #[test]
    fn resolves_through_lazy_group_using_current_state() {
        let flag = Arc::new(AtomicBool::new(false));
        let f = Arc::clone(&flag);
        let root: Node = Group::new()
            .child(
                "resize",
                LazyGroup::new(move || {
                    if f.load(Ordering::SeqCst) {
                        Group::new().child("800x600", leaf("to 800x600"))
                    } else {
                        Group::new().child("640x480", leaf("to 640x480"))
                    }
                }),
            )
            .into();

        assert_eq!(
            resolved_path(&resolve(&root, "res 6")),
            Some(("resize 640x480", "to 640x480"))
        );
        flag.store(true, Ordering::SeqCst);
        assert!(not_found(&resolve(&root, "res 6")));
        assert_eq!(
            resolved_path(&resolve(&root, "res 8")),
            Some(("resize 800x600", "to 800x600"))
        );
    }

    #[test]
    fn match_tokens_prefers_exact() {
        let g = Group::new()
            .child("cache", leaf("a"))
            .child("cache2", leaf("b"));
        assert_eq!(match_tokens(&g, "cache"), vec!["cache"]);
        assert_eq!(match_tokens(&g, "ca"), vec!["cache", "cache2"]);
        assert!(match_tokens(&g, "x").is_empty());
    }

    #[test]
    fn repeated_resolution_is_stable() {
        let root = sample();
        let first = ambiguous_keys(&resolve(&root, "clear c"));
        for _ in 0..3 {
            assert_eq!(ambiguous_keys(&resolve(&root, "clear c")), first);
        }
    }
}

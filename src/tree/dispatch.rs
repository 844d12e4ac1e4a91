//! Run the action a path names and report what happened.
//!
//! Failures inside an action (returned errors and panics alike) end up in
//! `DispatchOutcome::ActionFailed`; nothing escapes to the caller. A caught panic is
//! logged through `tracing` instead of the default hook's stderr report.

use std::cell::Cell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe, catch_unwind};
use std::sync::Once;

use tracing::{debug, warn};

use super::node::{Action, Node};
use super::resolve::{Resolution, resolve};

/// What `execute` did with a path.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The action at `path` ran to completion.
    Ran { path: String },
    /// The path stops inside a group that has no default child. `prefix` is the
    /// canonical path up to that group.
    AmbiguousOrIncomplete { prefix: String, message: String },
    /// Some token of the path matched nothing.
    Unknown { message: String },
    /// The action at `path` failed.
    ActionFailed { path: String, error: anyhow::Error },
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Ran { .. })
    }

    /// Short status keyword for machine-readable output.
    pub fn status(&self) -> &'static str {
        match self {
            DispatchOutcome::Ran { .. } => "ok",
            DispatchOutcome::AmbiguousOrIncomplete { .. } => "incomplete",
            DispatchOutcome::Unknown { .. } => "unknown",
            DispatchOutcome::ActionFailed { .. } => "error",
        }
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchOutcome::Ran { path } => write!(f, "ok: {path}"),
            DispatchOutcome::AmbiguousOrIncomplete { message, .. } => f.write_str(message),
            DispatchOutcome::Unknown { message, .. } => f.write_str(message),
            DispatchOutcome::ActionFailed { error, .. } => write!(f, "error: {error:#}"),
        }
    }
}

/// Resolve `path` and run the action it names.
pub fn execute(root: &Node, path: &str) -> DispatchOutcome {
    match resolve(root, path) {
        Resolution::NotFound => DispatchOutcome::Unknown {
            message: "unknown command".to_string(),
        },
        Resolution::Resolved { path, action } => run(path, &action),
        Resolution::Ambiguous { prefix, group } => match group.default_node() {
            Some((token, Node::Action(action))) => {
                let full = format!("{prefix}{token}");
                debug!(path = %full, "group default");
                run(full, action)
            }
            _ => DispatchOutcome::AmbiguousOrIncomplete {
                prefix,
                message: "incomplete command, use <Tab> or '?' for variants".to_string(),
            },
        },
    }
}

thread_local! {
    static CATCHING: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: Once = Once::new();

/// Wrap the current panic hook so it stays silent for panics `run` is about to catch.
/// Panics anywhere else still reach the previous hook.
fn install_quiet_hook() {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !CATCHING.with(Cell::get) {
                previous(info);
            }
        }));
    });
}

fn run(path: String, action: &Action) -> DispatchOutcome {
    debug!(path = %path, "running action");
    install_quiet_hook();
    let was_catching = CATCHING.with(|c| c.replace(true));
    let result = catch_unwind(AssertUnwindSafe(|| action.run()));
    CATCHING.with(|c| c.set(was_catching));

    match result {
        Ok(Ok(())) => DispatchOutcome::Ran { path },
        Ok(Err(error)) => {
            warn!(path = %path, "action failed: {error:#}");
            DispatchOutcome::ActionFailed { path, error }
        }
        Err(payload) => {
            let detail = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            warn!(path = %path, "action panicked: {detail}");
            DispatchOutcome::ActionFailed {
                path,
                error: anyhow::anyhow!("action panicked: {detail}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::node::Group;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(counter: &Arc<AtomicUsize>, desc: &str) -> Action {
        let c = Arc::clone(counter);
        Action::new(desc, move || {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    #[test]
    fn runs_resolved_action_exactly_once() {
        let cache = Arc::new(AtomicUsize::new(0));
        let cookies = Arc::new(AtomicUsize::new(0));
        let root: Node = Group::new()
            .child(
                "clear",
                Group::new()
                    .child("cache", counting(&cache, "Clear cache"))
                    .child("cookies", counting(&cookies, "Clear cookies")),
            )
            .into();

        let outcome = execute(&root, "clear cache");
        assert!(matches!(&outcome, DispatchOutcome::Ran { path } if path == "clear cache"));
        assert_eq!(cache.load(Ordering::SeqCst), 1);
        assert_eq!(cookies.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unknown_and_incomplete_are_distinct_from_success() {
        let n = Arc::new(AtomicUsize::new(0));
        let root: Node = Group::new()
            .child(
                "clear",
                Group::new()
                    .child("cache", counting(&n, "a"))
                    .child("cookies", counting(&n, "b")),
            )
            .into();

        let unknown = execute(&root, "clear bogus");
        assert!(matches!(unknown, DispatchOutcome::Unknown { .. }));
        assert_eq!(unknown.to_string(), "unknown command");

        let incomplete = execute(&root, "clear c");
        assert!(matches!(
            incomplete,
            DispatchOutcome::AmbiguousOrIncomplete { .. }
        ));
        assert!(!incomplete.is_success());
        assert_ne!(unknown.status(), incomplete.status());
        assert_eq!(n.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn group_with_default_is_runnable() {
        let n = Arc::new(AtomicUsize::new(0));
        let root: Node = Group::new()
            .child(
                "show",
                Group::new()
                    .child("source", counting(&n, "Show source"))
                    .child("css", Action::new("Show CSS", || Ok(())))
                    .default_to("source"),
            )
            .into();

        let outcome = execute(&root, "sh");
        assert!(matches!(&outcome, DispatchOutcome::Ran { path } if path == "show source"));
        assert_eq!(n.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failing_action_is_reported_and_engine_stays_usable() {
        let n = Arc::new(AtomicUsize::new(0));
        let root: Node = Group::new()
            .child(
                "broken",
                Action::new("Always fails", || anyhow::bail!("no window")),
            )
            .child("fine", counting(&n, "Works"))
            .into();

        let failed = execute(&root, "broken");
        match &failed {
            DispatchOutcome::ActionFailed { path, error } => {
                assert_eq!(path, "broken");
                assert!(error.to_string().contains("no window"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(failed.to_string().starts_with("error:"));

        assert!(execute(&root, "fine").is_success());
        assert_eq!(n.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panicking_action_is_caught() {
        let n = Arc::new(AtomicUsize::new(0));
        let root: Node = Group::new()
            .child("boom", Action::new("Panics", || panic!("kaboom")))
            .child("fine", counting(&n, "Works"))
            .into();
        match execute(&root, "boom") {
            DispatchOutcome::ActionFailed { error, .. } => {
                assert!(error.to_string().contains("kaboom"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        // The quiet window closes once the action returns.
        assert!(!CATCHING.with(Cell::get));
        assert!(execute(&root, "fine").is_success());
        assert_eq!(n.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn incomplete_carries_canonical_prefix() {
        let n = Arc::new(AtomicUsize::new(0));
        let root: Node = Group::new()
            .child(
                "clear",
                Group::new()
                    .child("cache", counting(&n, "a"))
                    .child("cookies", counting(&n, "b")),
            )
            .into();
        match execute(&root, "cle c") {
            DispatchOutcome::AmbiguousOrIncomplete { prefix, .. } => assert_eq!(prefix, "clear "),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}

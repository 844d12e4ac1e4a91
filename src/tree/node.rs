/*!
node.rs - command tree node model.

A tree is built from three node kinds:
  - Action    : terminal; an effect plus a description
  - Group     : static children keyed by token, optional description and default child
  - LazyGroup : a generator producing a fresh Group every time it is visited

`Node::expand` is the group view of either group kind. `Group::lookup`, `contains` and
`sorted_tokens` then answer from that one snapshot, so resolution, completion and
rendering expand a LazyGroup once per visit. The expansion is never cached, so menus
built from live state always reflect that state.

Tokens starting with `.` are hidden. This layer does not filter them; completion and
rendering do.
*/

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Zero-argument leaf effect.
pub type Effect = Arc<dyn Fn() -> anyhow::Result<()> + Send + Sync>;

/// Generator behind a `LazyGroup`.
pub type Expander = Arc<dyn Fn() -> Group + Send + Sync>;

/// Prefix marking a hidden token.
pub const HIDDEN_PREFIX: char = '.';

/// Reserved "show me what's here" token.
pub const ESCAPE_TOKEN: &str = "?";

/// Returns true for `.`-prefixed tokens.
pub fn is_hidden(token: &str) -> bool {
    token.starts_with(HIDDEN_PREFIX)
}

/// Tree construction errors. These are programmer errors in the tree literal and are
/// reported by `Node::validate` at startup, never at lookup time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A group operation was applied to an action.
    #[error("'{path}' is an action, not a group")]
    NotAGroup { path: String },

    /// The same token was registered twice in one group.
    #[error("duplicate token '{token}' under '{path}'")]
    DuplicateToken { path: String, token: String },

    /// `default_child` names a token the group does not have.
    #[error("default child '{token}' of '{path}' does not exist")]
    MissingDefault { path: String, token: String },

    /// `default_child` names a group; only actions can stand in for a group.
    #[error("default child '{token}' of '{path}' is not an action")]
    DefaultNotAction { path: String, token: String },

    /// Token that can never be typed (empty, contains whitespace, or reserved).
    #[error("invalid token '{token}' under '{path}'")]
    InvalidToken { path: String, token: String },

    /// Expansion did not bottom out; most likely a generator that returns itself.
    #[error("tree deeper than {limit} levels at '{path}'")]
    TooDeep { path: String, limit: usize },
}

/* ---- Action ---- */

/// Terminal node: an opaque effect plus its description.
#[derive(Clone)]
pub struct Action {
    effect: Effect,
    description: String,
}

impl Action {
    pub fn new<F>(description: impl Into<String>, effect: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            effect: Arc::new(effect),
            description: description.into(),
        }
    }

    /// Build an action that reads the current boolean state and applies its inverse.
    ///
    /// `read` must be side-effect free; `apply` receives the new state.
    pub fn toggle<R, A>(description: impl Into<String>, read: R, apply: A) -> Self
    where
        R: Fn() -> anyhow::Result<bool> + Send + Sync + 'static,
        A: Fn(bool) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::new(description, move || {
            let current = read()?;
            apply(!current)
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Invoke the effect. Errors are returned, not caught; see `dispatch::execute`.
    pub fn run(&self) -> anyhow::Result<()> {
        (self.effect)()
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/* ---- Group ---- */

/// Internal node with static children.
#[derive(Clone, Debug, Default)]
pub struct Group {
    description: Option<String>,
    children: BTreeMap<String, Node>,
    default_child: Option<String>,
    // Tokens inserted more than once; reported by validation.
    duplicates: BTreeSet<String>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a child node. Registering a token twice keeps the last node and is
    /// reported as `DuplicateToken` by validation.
    pub fn child(mut self, token: impl Into<String>, node: impl Into<Node>) -> Self {
        self.insert(token, node);
        self
    }

    /// Name the child that stands in for this group when a path ends here.
    pub fn default_to(mut self, token: impl Into<String>) -> Self {
        self.default_child = Some(token.into());
        self
    }

    pub fn insert(&mut self, token: impl Into<String>, node: impl Into<Node>) {
        let token = token.into();
        if self.children.insert(token.clone(), node.into()).is_some() {
            self.duplicates.insert(token);
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn default_child(&self) -> Option<&str> {
        self.default_child.as_deref()
    }

    /// Exact-match child lookup.
    pub fn lookup(&self, token: &str) -> Option<&Node> {
        self.children.get(token)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.children.contains_key(token)
    }

    /// Child tokens in lexicographic order, hidden ones included.
    pub fn sorted_tokens(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// The default child, if it is set and exists.
    pub fn default_node(&self) -> Option<(&str, &Node)> {
        let token = self.default_child.as_deref()?;
        self.children.get_key_value(token).map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn duplicates(&self) -> impl Iterator<Item = &String> {
        self.duplicates.iter()
    }

    /// Group holding only the given children; no description, no default.
    pub(crate) fn subset<'a>(&self, tokens: impl IntoIterator<Item = &'a str>) -> Group {
        let mut out = Group::new();
        for t in tokens {
            if let Some(node) = self.children.get(t) {
                out.children.insert(t.to_string(), node.clone());
            }
        }
        out
    }
}

/* ---- LazyGroup ---- */

/// Group whose children are generated on every visit.
#[derive(Clone)]
pub struct LazyGroup {
    description: Option<String>,
    expand: Expander,
}

impl LazyGroup {
    pub fn new<F>(expand: F) -> Self
    where
        F: Fn() -> Group + Send + Sync + 'static,
    {
        Self {
            description: None,
            expand: Arc::new(expand),
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Run the generator. The own description wins over the generated one.
    pub fn expand(&self) -> Group {
        let mut group = (self.expand)();
        if let Some(d) = &self.description {
            group.description = Some(d.clone());
        }
        group
    }
}

impl fmt::Debug for LazyGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyGroup")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/* ---- Node ---- */

/// A node of the command tree.
#[derive(Clone, Debug)]
pub enum Node {
    Action(Action),
    Group(Arc<Group>),
    Lazy(LazyGroup),
}

impl From<Action> for Node {
    fn from(a: Action) -> Self {
        Node::Action(a)
    }
}

impl From<Group> for Node {
    fn from(g: Group) -> Self {
        Node::Group(Arc::new(g))
    }
}

impl From<LazyGroup> for Node {
    fn from(l: LazyGroup) -> Self {
        Node::Lazy(l)
    }
}

impl Node {
    pub fn is_action(&self) -> bool {
        matches!(self, Node::Action(_))
    }

    /// Group view of this node. A LazyGroup is expanded freshly on every call.
    pub fn expand(&self) -> Result<Arc<Group>, ModelError> {
        match self {
            Node::Group(g) => Ok(Arc::clone(g)),
            Node::Lazy(l) => Ok(Arc::new(l.expand())),
            Node::Action(_) => Err(ModelError::NotAGroup {
                path: String::new(),
            }),
        }
    }

    /// Description shown next to this node in completion lists.
    pub fn description(&self) -> String {
        match self {
            Node::Action(a) => a.description.clone(),
            Node::Group(g) => g.description().unwrap_or_default().to_string(),
            Node::Lazy(l) => match &l.description {
                Some(d) => d.clone(),
                None => l.expand().description.unwrap_or_default(),
            },
        }
    }
}

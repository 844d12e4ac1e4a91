/*!
shared.rs - settings and the session every subcommand works against.

Focus:
  - Settings: file (YAML or JSON) < CLI flags
  - Session: browser + echo channel + validated command tree, exposing the two
    entry points a host binds to its command: `execute(path)` and `complete(path)`
*/

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::tree::{self, Candidate, DispatchOutcome, EngineConfig, Node, TreeEntry};
use crate::webdev::{self, Browser, Console, SharedBrowser, TreeOptions, WindowSize};

/// Environment fallback for `--config`.
pub const CONFIG_ENV: &str = "WEBDEV_CONFIG";

/* ---- Settings ---- */

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(flatten)]
    pub engine: EngineConfig,
    /// Host command name the tree is registered under.
    pub command: String,
    /// Initial simulated window size.
    pub window: WindowSize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            command: "webdev".to_string(),
            window: WindowSize::default(),
        }
    }
}

impl Settings {
    /// Load from `path` (or `WEBDEV_CONFIG` when `path` is None). No file -> defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let from_env = std::env::var(CONFIG_ENV)
            .ok()
            .filter(|s| !s.trim().is_empty());
        match path.map(str::to_string).or(from_env) {
            Some(p) => Self::from_file(Path::new(&p)),
            None => Ok(Self::default()),
        }
    }

    /// Parse a settings file; `.yaml`/`.yml` as YAML, everything else as JSON.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file: {}", path.display()))?;
        let lower = path.to_string_lossy().to_ascii_lowercase();

        let settings: Settings = if lower.ends_with(".yaml") || lower.ends_with(".yml") {
            serde_yaml::from_str(&raw).context("failed to parse YAML settings file")?
        } else {
            serde_json::from_str(&raw).context("failed to parse JSON settings file")?
        };
        if settings.command.trim().is_empty() {
            anyhow::bail!("settings: 'command' must not be empty");
        }
        Ok(settings)
    }

    /// CLI switches can only turn options on; the file decides otherwise.
    pub fn apply_flags(&mut self, show_hidden: bool, quick_complete: bool) {
        self.engine.show_hidden |= show_hidden;
        self.engine.quick_complete |= quick_complete;
    }
}

/* ---- Session ---- */

pub struct Session {
    settings: Settings,
    browser: SharedBrowser,
    console: Arc<dyn Console>,
    root: Arc<Node>,
}

impl Session {
    /// Build and validate the command tree. A malformed tree fails here, before any
    /// command runs.
    pub fn new(settings: Settings, console: Arc<dyn Console>) -> Result<Self> {
        let browser = Browser::new(settings.window).shared();
        let root = build_validated(&settings, &browser, &console)?;
        Ok(Self {
            settings,
            browser,
            console,
            root,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn browser(&self) -> &SharedBrowser {
        &self.browser
    }

    /// Swap engine options; the tree is rebuilt around the same browser state.
    pub fn set_engine(&mut self, engine: EngineConfig) -> Result<()> {
        let mut next = self.settings.clone();
        next.engine = engine;
        self.root = build_validated(&next, &self.browser, &self.console)?;
        self.settings = next;
        Ok(())
    }

    pub fn execute(&self, path: &str) -> DispatchOutcome {
        tree::execute(&self.root, path)
    }

    pub fn complete(&self, path: &str) -> Vec<Candidate> {
        tree::complete(&self.root, path, &self.settings.engine)
    }

    pub fn render(&self) -> String {
        format!(
            "{}\n{}",
            self.settings.command,
            tree::render_tree(&self.root, self.settings.engine.show_hidden)
        )
    }

    pub fn entries(&self) -> Vec<TreeEntry> {
        tree::entries(&self.root, self.settings.engine.show_hidden)
    }
}

fn build_validated(
    settings: &Settings,
    browser: &SharedBrowser,
    console: &Arc<dyn Console>,
) -> Result<Arc<Node>> {
    let opts = TreeOptions {
        command: settings.command.clone(),
        show_hidden: settings.engine.show_hidden,
    };
    let root = webdev::build_tree(browser, console, &opts);
    root.validate().context("command tree failed validation")?;
    Ok(root)
}

/* ---- Tests ---- */

/*!
state.rs - simulated browser the webdev actions operate on.

Holds exactly what the command tree reads and changes:
  - applied outline/display style sheets (by style id)
  - boolean preferences (cache, java, javascript)
  - toolbar visibility, window size, form submission method
  - a log of clear operations

`Browser` is shared as `Arc<Mutex<..>>` between the tree's closures and the host.
*/

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

pub type SharedBrowser = Arc<Mutex<Browser>>;

/// Preferences the `disable` menu toggles, with their initial values.
pub const PREFERENCES: &[(&str, bool)] = &[
    ("browser.cache.memory.enable", true),
    ("security.enable_java", true),
    ("javascript.enabled", true),
];

/// Window size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl WindowSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self::new(1024, 768)
    }
}

impl fmt::Display for WindowSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Form submission method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMethod {
    Get,
    Post,
}

impl fmt::Display for FormMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FormMethod::Get => "GET",
            FormMethod::Post => "POST",
        })
    }
}

#[derive(Debug, Clone)]
pub struct Browser {
    applied_styles: BTreeSet<String>,
    preferences: BTreeMap<String, bool>,
    toolbar_visible: bool,
    window: WindowSize,
    form_method: FormMethod,
    cleared: Vec<String>,
}

impl Default for Browser {
    fn default() -> Self {
        Self::new(WindowSize::default())
    }
}

impl Browser {
    pub fn new(window: WindowSize) -> Self {
        Self {
            applied_styles: BTreeSet::new(),
            preferences: PREFERENCES
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
            toolbar_visible: false,
            window,
            form_method: FormMethod::Post,
            cleared: Vec::new(),
        }
    }

    pub fn shared(self) -> SharedBrowser {
        Arc::new(Mutex::new(self))
    }

    pub fn style_applied(&self, style_id: &str) -> bool {
        self.applied_styles.contains(style_id)
    }

    pub fn set_style(&mut self, style_id: &str, on: bool) {
        if on {
            self.applied_styles.insert(style_id.to_string());
        } else {
            self.applied_styles.remove(style_id);
        }
    }

    pub fn applied_styles(&self) -> impl Iterator<Item = &str> {
        self.applied_styles.iter().map(String::as_str)
    }

    pub fn preference(&self, name: &str) -> Result<bool> {
        self.preferences
            .get(name)
            .copied()
            .ok_or_else(|| anyhow!("unknown preference '{name}'"))
    }

    pub fn set_preference(&mut self, name: &str, value: bool) -> Result<()> {
        let slot = self
            .preferences
            .get_mut(name)
            .ok_or_else(|| anyhow!("unknown preference '{name}'"))?;
        *slot = value;
        Ok(())
    }

    pub fn toolbar_visible(&self) -> bool {
        self.toolbar_visible
    }

    pub fn toggle_toolbar(&mut self) -> bool {
        self.toolbar_visible = !self.toolbar_visible;
        self.toolbar_visible
    }

    pub fn window(&self) -> WindowSize {
        self.window
    }

    pub fn resize(&mut self, size: WindowSize) {
        self.window = size;
    }

    pub fn form_method(&self) -> FormMethod {
        self.form_method
    }

    pub fn convert_forms(&mut self, method: FormMethod) {
        self.form_method = method;
    }

    pub fn clear(&mut self, what: &str) {
        self.cleared.push(what.to_string());
    }

    /// Everything cleared so far, oldest first.
    pub fn cleared(&self) -> &[String] {
        &self.cleared
    }
}

/// Lock the shared browser. Every mutation is a single field write, so state left
/// behind by a holder that panicked is still consistent and the guard is recovered.
pub fn lock(browser: &SharedBrowser) -> MutexGuard<'_, Browser> {
    browser.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_size_display() {
        assert_eq!(WindowSize::new(640, 480).to_string(), "640x480");
    }

    #[test]
    fn lock_survives_a_panicking_holder() {
        let shared = Browser::default().shared();
        let inner = Arc::clone(&shared);
        let joined = std::thread::spawn(move || {
            let mut guard = lock(&inner);
            guard.toggle_toolbar();
            panic!("holder died");
        })
        .join();
        assert!(joined.is_err());
        assert!(shared.is_poisoned());

        let mut guard = lock(&shared);
        assert!(guard.toolbar_visible());
        assert!(!guard.toggle_toolbar());
    }

    #[test]
    fn preferences_start_enabled() {
        let b = Browser::default();
        for (name, _) in PREFERENCES {
            assert!(b.preference(name).unwrap());
        }
        assert!(b.preference("nope").is_err());
    }

    #[test]
    fn styles_toggle_on_and_off() {
        let mut b = Browser::default();
        b.set_style("webdeveloper-outline-frames", true);
        assert!(b.style_applied("webdeveloper-outline-frames"));
        b.set_style("webdeveloper-outline-frames", false);
        assert_eq!(b.applied_styles().count(), 0);
    }

    #[test]
    fn unknown_preference_cannot_be_set() {
        let mut b = Browser::default();
        assert!(b.set_preference("x.y", false).is_err());
    }
}

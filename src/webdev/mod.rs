/*!
The `webdev` command namespace.

Top level:
  toolbar, preferences
  clear     { auth, cache, cookies, history }
  outline   { frames, headings, tables, blocklevel, depricated,
              positioned { absolute, fixed, relative, float } }
  form      { convert { post2get, get2post }, details, info }
  disable   { cache, java, javascript }
  resize    (generated from the current window size)
  .debug    { loaded_styles, cmd_tree }   hidden, defaults to cmd_tree

Outline and display entries are toggles keyed by the style id they apply; the
`disable` entries are toggles over boolean preferences. `.debug loaded_styles`
lists style ids currently applied, which is how new toggles find their id.
*/

pub mod console;
pub mod state;

use std::sync::{Arc, Weak};

use anyhow::anyhow;
use tracing::info;

use crate::tree::{Action, Group, LazyGroup, Node, render_tree};

pub use console::{BufferConsole, Console, StdoutConsole};
pub use state::{Browser, FormMethod, SharedBrowser, WindowSize, lock};

/// Sizes offered by `resize`.
pub const RESIZE_PRESETS: &[WindowSize] = &[
    WindowSize::new(640, 480),
    WindowSize::new(800, 600),
    WindowSize::new(1024, 768),
    WindowSize::new(1280, 1024),
];

/// Host-side knobs baked into the tree.
#[derive(Debug, Clone)]
pub struct TreeOptions {
    /// Host command name; heads the `.debug cmd_tree` listing.
    pub command: String,
    /// Whether `.debug cmd_tree` lists hidden entries.
    pub show_hidden: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            command: "webdev".to_string(),
            show_hidden: false,
        }
    }
}

/// Build the command tree around a browser and an echo channel.
pub fn build_tree(
    browser: &SharedBrowser,
    console: &Arc<dyn Console>,
    opts: &TreeOptions,
) -> Arc<Node> {
    Arc::new_cyclic(|me: &Weak<Node>| {
        let (b, c) = (browser, console);
        Group::new()
            .child("toolbar", toolbar(b, c))
            .child("preferences", preferences(b, c))
            .child("clear", clear_menu(b, c))
            .child("outline", outline_menu(b, c))
            .child("form", form_menu(b, c))
            .child("disable", disable_menu(b, c))
            .child("resize", resize_menu(b, c))
            .child(
                ".debug",
                Group::new()
                    .describe("Debugging helpers ...")
                    .child("loaded_styles", loaded_styles(b, c))
                    .child("cmd_tree", command_tree(me.clone(), c, opts))
                    .default_to("cmd_tree"),
            )
            .into()
    })
}

/* ---- Menus ---- */

fn clear_menu(b: &SharedBrowser, c: &Arc<dyn Console>) -> Group {
    Group::new()
        .describe("Clear data ...")
        .child("auth", clear(b, c, "HTTP authentication"))
        .child("cache", clear(b, c, "cache"))
        .child("history", clear(b, c, "history"))
        .child("cookies", clear(b, c, "session cookies"))
}

fn outline_menu(b: &SharedBrowser, c: &Arc<dyn Console>) -> Group {
    let positioned_menu = Group::new()
        .describe("Outline positioned elements ...")
        .child(
            "absolute",
            positioned(b, c, "absolute", "Outline absolute positioned elements"),
        )
        .child("fixed", positioned(b, c, "fixed", "Outline fixed elements"))
        .child(
            "relative",
            positioned(b, c, "relative", "Outline relative positioned elements"),
        )
        .child(
            "float",
            style_toggle(
                b,
                c,
                "Outline floated elements",
                "webdeveloper-outline-floated-elements",
            ),
        );

    Group::new()
        .describe("Outline objects ...")
        .child(
            "frames",
            style_toggle(b, c, "Outline frames", "webdeveloper-outline-frames"),
        )
        .child(
            "headings",
            style_toggle(b, c, "Outline headings", "webdeveloper-outline-headings"),
        )
        .child(
            "tables",
            style_toggle(b, c, "Outline tables", "webdeveloper-outline-all-tables"),
        )
        .child(
            "blocklevel",
            style_toggle(
                b,
                c,
                "Outline block level elements",
                "webdeveloper-outline-block-level-elements",
            ),
        )
        .child(
            "depricated",
            style_toggle(
                b,
                c,
                "Outline depricated elements",
                "webdeveloper-outline-deprecated-elements",
            ),
        )
        .child("positioned", positioned_menu)
}

fn form_menu(b: &SharedBrowser, c: &Arc<dyn Console>) -> Group {
    let convert = Group::new()
        .describe("Convert forms method ...")
        .child(
            "post2get",
            convert_forms(b, c, FormMethod::Get, "Convert forms from POST to GET"),
        )
        .child(
            "get2post",
            convert_forms(b, c, FormMethod::Post, "Convert forms from GET to POST"),
        );

    Group::new()
        .describe("Do something with forms ...")
        .child("convert", convert)
        .child(
            "details",
            style_toggle(
                b,
                c,
                "Show details for all forms",
                "webdeveloper-display-form-details",
            ),
        )
        .child("info", form_info(b, c))
}

// Named `disable` rather than `toggle` so it does not share a first letter with `toolbar`.
fn disable_menu(b: &SharedBrowser, c: &Arc<dyn Console>) -> Group {
    Group::new()
        .describe("Toggle various things ...")
        .child(
            "cache",
            preference_toggle(b, c, "Disable caching", "browser.cache.memory.enable"),
        )
        .child(
            "java",
            preference_toggle(b, c, "Disable Java", "security.enable_java"),
        )
        .child(
            "javascript",
            preference_toggle(b, c, "Disable JavaScript", "javascript.enabled"),
        )
}

/* ---- Leaf constructors ---- */

fn toolbar(browser: &SharedBrowser, console: &Arc<dyn Console>) -> Action {
    let (b, c) = (Arc::clone(browser), Arc::clone(console));
    Action::new("Toggle toolbar", move || {
        let visible = lock(&b).toggle_toolbar();
        info!(visible, "toolbar toggled");
        c.echo(if visible { "toolbar shown" } else { "toolbar hidden" });
        Ok(())
    })
}

fn preferences(browser: &SharedBrowser, console: &Arc<dyn Console>) -> Action {
    let (b, c) = (Arc::clone(browser), Arc::clone(console));
    Action::new("Web Developer's Options", move || {
        let guard = lock(&b);
        for (name, _) in state::PREFERENCES {
            c.echo(&format!("{name} = {}", guard.preference(name)?));
        }
        Ok(())
    })
}

fn clear(browser: &SharedBrowser, console: &Arc<dyn Console>, what: &'static str) -> Action {
    let (b, c) = (Arc::clone(browser), Arc::clone(console));
    Action::new(format!("Clear {what}"), move || {
        lock(&b).clear(what);
        info!(what, "cleared");
        c.echo(&format!("cleared {what}"));
        Ok(())
    })
}

/// Toggle backed by an applied style sheet.
fn style_toggle(
    browser: &SharedBrowser,
    console: &Arc<dyn Console>,
    description: &str,
    style_id: impl Into<String>,
) -> Action {
    let style_id: String = style_id.into();
    let style_id: Arc<str> = Arc::from(style_id);
    let label = description.to_string();
    let (read_b, read_id) = (Arc::clone(browser), Arc::clone(&style_id));
    let (b, c) = (Arc::clone(browser), Arc::clone(console));
    Action::toggle(
        description,
        move || Ok(lock(&read_b).style_applied(&read_id)),
        move |on| {
            lock(&b).set_style(&style_id, on);
            info!(style_id = %style_id, on, "style toggled");
            c.echo(&format!("{label}: {}", on_off(on)));
            Ok(())
        },
    )
}

fn positioned(
    browser: &SharedBrowser,
    console: &Arc<dyn Console>,
    position: &str,
    description: &str,
) -> Action {
    let style_id = format!("webdeveloper-outline-{position}-positioned-elements");
    style_toggle(browser, console, description, style_id)
}

/// Toggle over a boolean preference. "Disabled" is the preference being false.
fn preference_toggle(
    browser: &SharedBrowser,
    console: &Arc<dyn Console>,
    description: &'static str,
    preference: &'static str,
) -> Action {
    let read_b = Arc::clone(browser);
    let (b, c) = (Arc::clone(browser), Arc::clone(console));
    Action::toggle(
        description,
        move || Ok(!lock(&read_b).preference(preference)?),
        move |disabled| {
            lock(&b).set_preference(preference, !disabled)?;
            info!(preference, value = !disabled, "preference changed");
            c.echo(&format!("{description}: {}", on_off(disabled)));
            Ok(())
        },
    )
}

fn convert_forms(
    browser: &SharedBrowser,
    console: &Arc<dyn Console>,
    method: FormMethod,
    description: &'static str,
) -> Action {
    let (b, c) = (Arc::clone(browser), Arc::clone(console));
    Action::new(description, move || {
        lock(&b).convert_forms(method);
        c.echo(&format!("forms now submit via {method}"));
        Ok(())
    })
}

fn form_info(browser: &SharedBrowser, console: &Arc<dyn Console>) -> Action {
    let (b, c) = (Arc::clone(browser), Arc::clone(console));
    Action::new("Show information for all forms", move || {
        let method = lock(&b).form_method();
        c.echo(&format!("forms submit via {method}"));
        Ok(())
    })
}

/// Generated on every visit: presets other than the current window size.
fn resize_menu(browser: &SharedBrowser, console: &Arc<dyn Console>) -> LazyGroup {
    let (b, c) = (Arc::clone(browser), Arc::clone(console));
    LazyGroup::new(move || {
        let current = lock(&b).window();
        let mut group = Group::new();
        for &size in RESIZE_PRESETS {
            if size == current {
                continue;
            }
            let (b, c) = (Arc::clone(&b), Arc::clone(&c));
            group.insert(
                size.to_string(),
                Action::new(format!("Resize main window to {size}"), move || {
                    lock(&b).resize(size);
                    info!(%size, "window resized");
                    c.echo(&format!("Resizing to {size}"));
                    Ok(())
                }),
            );
        }
        group
    })
    .describe("Resize main window ...")
}

fn loaded_styles(browser: &SharedBrowser, console: &Arc<dyn Console>) -> Action {
    let (b, c) = (Arc::clone(browser), Arc::clone(console));
    Action::new("Display loaded styles", move || {
        let styles: Vec<String> = lock(&b).applied_styles().map(str::to_string).collect();
        if styles.is_empty() {
            c.echo("none");
        } else {
            c.echo(&styles.join(","));
        }
        Ok(())
    })
}

fn command_tree(tree: Weak<Node>, console: &Arc<dyn Console>, opts: &TreeOptions) -> Action {
    let c = Arc::clone(console);
    let title = opts.command.clone();
    let show_hidden = opts.show_hidden;
    Action::new("Display command tree", move || {
        let root = tree
            .upgrade()
            .ok_or_else(|| anyhow!("command tree no longer exists"))?;
        c.echo(&format!("{title}\n{}", render_tree(&root, show_hidden)));
        Ok(())
    })
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

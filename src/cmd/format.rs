/*!
format.rs

Human-output helpers for the `webdev` CLI: colors, a boxed header and a plain
column table. JSON output paths do not use these.

Style decisions:
  - Color on unless NO_COLOR is set.
  - Width from COLUMNS (clamped 40..=220), else 100.

Public API Summary:
  - StyleOptions::detect() / StyleOptions::plain()
  - color(role, text, &StyleOptions) -> String
  - box_header(title, subtitle_opt, &StyleOptions) -> String
  - table(headers, rows, &StyleOptions) -> String
*/

use std::borrow::Cow;

#[derive(Debug, Clone)]
pub struct StyleOptions {
    pub use_color: bool,
    pub term_width: usize,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self::detect()
    }
}

impl StyleOptions {
    pub fn detect() -> Self {
        let width = std::env::var("COLUMNS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .map(|w| w.clamp(40, 220))
            .unwrap_or(100);

        StyleOptions {
            use_color: std::env::var_os("NO_COLOR").is_none(),
            term_width: width,
        }
    }

    /// No color, default width. Used for the shell transcript and tests.
    pub fn plain() -> Self {
        StyleOptions {
            use_color: false,
            term_width: 100,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Role {
    Primary,
    Secondary,
    Accent,
    Error,
    Dim,
}

pub fn color(role: Role, text: impl AsRef<str>, style: &StyleOptions) -> String {
    if !style.use_color {
        return text.as_ref().to_string();
    }
    let code = match role {
        Role::Primary => "38;5;45",    // cyan-ish
        Role::Secondary => "38;5;250", // gray
        Role::Accent => "38;5;213",    // magenta/pink
        Role::Error => "38;5;196",     // red
        Role::Dim => "2",
    };
    format!("\x1b[{code}m{}\x1b[0m", text.as_ref())
}

/* -------------------------------------------------------------------------- */
/* Box Header                                                                 */
/* -------------------------------------------------------------------------- */

/// Single-line boxed title with an optional dimmed subtitle. Content wider than the
/// terminal is cut with an ellipsis rather than wrapped.
pub fn box_header(
    title: impl AsRef<str>,
    subtitle: Option<impl AsRef<str>>,
    style: &StyleOptions,
) -> String {
    let plain = match &subtitle {
        Some(s) => format!("{}  {}", title.as_ref(), s.as_ref()),
        None => title.as_ref().to_string(),
    };
    let max_inner = style.term_width.saturating_sub(4).max(10);
    let shown = truncate(&plain, max_inner);
    let inner_len = display_width(&shown);

    let styled = if shown == plain {
        match &subtitle {
            Some(s) => format!(
                "{}  {}",
                color(Role::Primary, title.as_ref(), style),
                color(Role::Secondary, s.as_ref(), style)
            ),
            None => color(Role::Primary, title.as_ref(), style),
        }
    } else {
        color(Role::Primary, &shown, style)
    };

    let bar = "─".repeat(inner_len + 2);
    format!("┌{bar}┐\n│ {styled} │\n└{bar}┘")
}

/* -------------------------------------------------------------------------- */
/* Table Rendering                                                             */
/* -------------------------------------------------------------------------- */

/// Left-aligned columns separated by two spaces, with a dashed header rule. The last
/// column is never padded.
pub fn table(headers: &[&str], rows: &[Vec<String>], style: &StyleOptions) -> String {
    if headers.is_empty() {
        return String::new();
    }
    let cols = headers.len();

    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(cols) {
            widths[i] = widths[i].max(display_width(cell));
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    lines.push(color(Role::Accent, join_row(&header_cells, &widths), style));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    lines.push(color(Role::Dim, join_row(&rule, &widths), style));
    for row in rows {
        lines.push(join_row(row, &widths));
    }
    lines.join("\n")
}

fn join_row(cells: &[String], widths: &[usize]) -> String {
    let last = widths.len().saturating_sub(1);
    let mut out = String::new();
    for (i, w) in widths.iter().enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        out.push_str(cell);
        if i < last {
            out.push_str(&" ".repeat(w.saturating_sub(display_width(cell))));
        }
    }
    out
}

/* -------------------------------------------------------------------------- */
/* Text Helpers                                                                */
/* -------------------------------------------------------------------------- */

pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars <= 1 {
        return "…".into();
    }
    let mut out: String = s.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

fn strip_ansi(s: &str) -> Cow<'_, str> {
    // Scans for ESC '[' ... letter; enough for the codes `color` emits.
    if !s.contains('\x1b') {
        return Cow::Borrowed(s);
    }
    let mut buf = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        buf.push(ch);
    }
    Cow::Owned(buf)
}

fn display_width(s: &str) -> usize {
    strip_ansi(s).chars().count()
}

/* -------------------------------------------------------------------------- */
/* Tests                                                                       */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_header_basic() {
        let style = StyleOptions::plain();
        let b = box_header("Title", Some("sub info"), &style);
        assert_eq!(b, "┌─────────────────┐\n│ Title  sub info │\n└─────────────────┘");
    }

    #[test]
    fn test_box_header_truncates() {
        let style = StyleOptions {
            use_color: false,
            term_width: 14,
        };
        let b = box_header("a very long title indeed", None::<&str>, &style);
        assert!(b.contains("a very lo…"));
    }

    #[test]
    fn test_table_basic() {
        let style = StyleOptions::plain();
        let t = table(
            &["A", "B"],
            &[
                vec!["x".into(), "y".into()],
                vec!["longer".into(), "val".into()],
            ],
            &style,
        );
        assert_eq!(t, "A       B\n------  ---\nx       y\nlonger  val");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
    }

    #[test]
    fn test_strip_ansi() {
        let colored = "\x1b[31mRED\x1b[0m";
        assert_eq!(strip_ansi(colored), "RED");
    }

    #[test]
    fn test_color_respects_style() {
        let plain = StyleOptions::plain();
        assert_eq!(color(Role::Error, "x", &plain), "x");
        let colored = StyleOptions {
            use_color: true,
            term_width: 80,
        };
        assert!(color(Role::Error, "x", &colored).starts_with("\x1b["));
    }
}

/*!
`shell.rs`

Implements `webdev shell`: a line-oriented host that keeps one browser alive across
commands, so toggles and resizes can be observed from later commands.

Shell commands (words split shell-style, `#` starts a comment line):
  webdev <path>          run a path (`:webdev` also accepted; the name follows `command`)
  webdev <path> ?        list the variants at that point instead of running
  complete <partial>     list candidates for a partial path
  tree                   print the command tree
  set hidden on|off      show / hide `.`-prefixed entries
  set quick on|off       drop / keep the "..." entry in completions
  status                 summary of the simulated browser state
  help
  quit | exit

Input comes from stdin, or from a file with `--script`. A bad line is reported and
the loop moves on; only I/O errors end it early.
*/

use anyhow::{Context, Result};
use clap::Args;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;

use crate::cmd::format::StyleOptions;
use crate::cmd::run::{candidate_table, incomplete_candidates};
use crate::cmd::shared::{Session, Settings};
use crate::webdev::{self, BufferConsole};

/// CLI arguments for `webdev shell`
#[derive(Args, Debug)]
pub struct ShellArgs {
    /// Read shell commands from FILE instead of stdin (no prompt)
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,
}

pub fn execute_shell(args: ShellArgs, settings: Settings) -> Result<()> {
    let console = Arc::new(BufferConsole::new());
    let mut shell = Shell {
        session: Session::new(settings, console.clone())?,
        console,
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.script {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("failed to open script: {}", path.display()))?;
            shell.run_loop(BufReader::new(file), &mut out, false)
        }
        None => {
            let stdin = io::stdin();
            shell.run_loop(stdin.lock(), &mut out, true)
        }
    }
}

struct Shell {
    session: Session,
    console: Arc<BufferConsole>,
}

enum Flow {
    Continue,
    Quit,
}

impl Shell {
    fn run_loop<R: BufRead, W: Write>(&mut self, input: R, out: &mut W, prompt: bool) -> Result<()> {
        let prompt_text = format!("{}> ", self.session.settings().command);
        let mut lines = input.lines();
        loop {
            if prompt {
                write!(out, "{prompt_text}")?;
                out.flush()?;
            }
            let Some(line) = lines.next() else {
                break;
            };
            let line = line.context("failed to read input")?;
            if let Flow::Quit = self.handle_line(&line, out)? {
                break;
            }
        }
        Ok(())
    }

    fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(Flow::Continue);
        }
        let words = match shell_words::split(trimmed) {
            Ok(w) => w,
            Err(e) => {
                writeln!(out, "parse error: {e}")?;
                return Ok(Flow::Continue);
            }
        };
        let Some((head, rest)) = words.split_first() else {
            return Ok(Flow::Continue);
        };
        let rest = rest.join(" ");
        let command = self.session.settings().command.clone();

        match head.as_str() {
            "quit" | "exit" => return Ok(Flow::Quit),
            "help" => writeln!(out, "{}", help_text(&command))?,
            "tree" => writeln!(out, "{}", self.session.render())?,
            "status" => self.status(out)?,
            "complete" => self.list(&rest, out)?,
            "set" => self.set(&words[1..], out)?,
            h if h.strip_prefix(':').unwrap_or(h) == command => self.dispatch(&rest, out)?,
            other => writeln!(out, "unknown shell command '{other}', try 'help'")?,
        }
        Ok(Flow::Continue)
    }

    fn dispatch<W: Write>(&mut self, path: &str, out: &mut W) -> Result<()> {
        // A trailing `?` asks for the variants instead of running anything.
        if path.split_whitespace().last() == Some("?") {
            return self.list(path, out);
        }
        let outcome = self.session.execute(path);
        for line in self.console.drain() {
            writeln!(out, "{line}")?;
        }
        if !outcome.is_success() {
            writeln!(out, "{outcome}")?;
            let candidates = incomplete_candidates(&self.session, path, &outcome);
            if !candidates.is_empty() {
                writeln!(out, "{}", candidate_table(&candidates, &StyleOptions::plain()))?;
            }
        }
        Ok(())
    }

    fn list<W: Write>(&self, partial: &str, out: &mut W) -> Result<()> {
        let candidates = self.session.complete(partial);
        if candidates.is_empty() {
            writeln!(out, "(no candidates)")?;
        } else {
            writeln!(out, "{}", candidate_table(&candidates, &StyleOptions::plain()))?;
        }
        Ok(())
    }

    fn set<W: Write>(&mut self, args: &[String], out: &mut W) -> Result<()> {
        let [option, value] = args else {
            writeln!(out, "usage: set hidden|quick on|off")?;
            return Ok(());
        };
        let enabled = match value.as_str() {
            "on" => true,
            "off" => false,
            _ => {
                writeln!(out, "usage: set hidden|quick on|off")?;
                return Ok(());
            }
        };
        let mut engine = self.session.settings().engine;
        match option.as_str() {
            "hidden" => engine.show_hidden = enabled,
            "quick" => engine.quick_complete = enabled,
            other => {
                writeln!(out, "unknown option '{other}' (hidden, quick)")?;
                return Ok(());
            }
        }
        self.session.set_engine(engine)?;
        writeln!(out, "{option} = {value}")?;
        Ok(())
    }

    fn status<W: Write>(&self, out: &mut W) -> Result<()> {
        let browser = webdev::lock(self.session.browser());
        let styles: Vec<&str> = browser.applied_styles().collect();
        writeln!(
            out,
            "toolbar: {}",
            if browser.toolbar_visible() { "shown" } else { "hidden" }
        )?;
        writeln!(out, "window: {}", browser.window())?;
        writeln!(out, "forms: {}", browser.form_method())?;
        writeln!(
            out,
            "styles: {}",
            if styles.is_empty() { "none".to_string() } else { styles.join(",") }
        )?;
        writeln!(
            out,
            "cleared: {}",
            if browser.cleared().is_empty() {
                "nothing".to_string()
            } else {
                browser.cleared().join(",")
            }
        )?;
        Ok(())
    }
}

fn help_text(command: &str) -> String {
    let rows = [
        (format!("{command} <path>"), "run a command path (prefixes allowed)"),
        (format!("{command} <path> ?"), "list the variants at that point"),
        ("complete <partial>".to_string(), "list completion candidates"),
        ("tree".to_string(), "print the command tree"),
        ("set hidden on|off".to_string(), "show or hide '.' entries"),
        ("set quick on|off".to_string(), "drop or keep the '...' completion entry"),
        ("status".to_string(), "browser state"),
        ("quit".to_string(), "leave the shell"),
    ];
    rows.iter()
        .map(|(usage, what)| format!("{usage:<22}{what}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn transcript(script: &str) -> String {
        let console = Arc::new(BufferConsole::new());
        let mut shell = Shell {
            session: Session::new(Settings::default(), console.clone()).unwrap(),
            console,
        };
        let mut out = Vec::new();
        shell
            .run_loop(Cursor::new(script.to_string()), &mut out, false)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn runs_paths_and_keeps_state() {
        let out = transcript("webdev toolbar\nwebdev res 800\nstatus\n");
        assert!(out.contains("toolbar shown\n"));
        assert!(out.contains("Resizing to 800x600\n"));
        assert!(out.contains("window: 800x600\n"));
    }

    #[test]
    fn colon_prefix_and_comments() {
        let out = transcript("# comment\n\n:webdev cle cook\n");
        assert_eq!(out, "cleared session cookies\n");
    }

    #[test]
    fn incomplete_path_lists_candidates() {
        let out = transcript("webdev clear\n");
        assert!(out.starts_with("incomplete command, use <Tab> or '?' for variants\n"));
        assert!(out.contains("clear auth"));
        assert!(out.contains("clear history"));
    }

    #[test]
    fn unknown_path_and_bad_quotes_do_not_stop_loop() {
        let out = transcript("webdev bogus\nwebdev \"unterminated\nwebdev toolbar\n");
        assert!(out.contains("unknown command\n"));
        assert!(out.contains("parse error"));
        assert!(out.ends_with("toolbar shown\n"));
    }

    #[test]
    fn set_hidden_changes_completion() {
        let out = transcript("complete\nset hidden on\ncomplete\n");
        let mut parts = out.split("hidden = on\n");
        assert!(!parts.next().unwrap().contains(".debug"));
        assert!(parts.next().unwrap().contains(".debug"));
    }

    #[test]
    fn trailing_question_mark_lists_without_running() {
        let out = transcript("webdev clear ?\nwebdev toolbar ?\nstatus\n");
        assert!(out.starts_with("COMPLETION"));
        assert!(out.contains("clear cookies"));
        assert!(!out.contains("incomplete command"));
        assert!(out.contains("toolbar     Toggle toolbar"));
        assert!(out.contains("toolbar: hidden"));
    }

    #[test]
    fn help_names_the_configured_command() {
        let out = transcript("help\n");
        assert!(out.starts_with("webdev <path>         run a command path"));
        assert!(out.contains("set quick on|off"));
    }

    #[test]
    fn script_file_runs_to_completion() {
        let mut script = tempfile::NamedTempFile::new().unwrap();
        writeln!(script, "webdev toolbar\nstatus\nquit").unwrap();
        let args = ShellArgs {
            script: Some(script.path().to_path_buf()),
        };
        assert!(execute_shell(args, Settings::default()).is_ok());
    }

    #[test]
    fn missing_script_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");
        let args = ShellArgs {
            script: Some(missing),
        };
        let err = execute_shell(args, Settings::default()).unwrap_err();
        let text = format!("{err:#}");
        assert!(text.contains("failed to open script"));
        assert!(text.contains("nope.txt"));
    }

    #[test]
    fn quit_stops_reading() {
        let out = transcript("quit\nwebdev toolbar\n");
        assert!(out.is_empty());
    }

    #[test]
    fn set_usage_errors() {
        let out = transcript("set hidden maybe\nset colors on\n");
        assert!(out.contains("usage: set hidden|quick on|off"));
        assert!(out.contains("unknown option 'colors'"));
    }
}

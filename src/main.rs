use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

mod cmd;
mod tree;
mod utils;
mod webdev;

use cmd::{CompleteArgs, RunArgs, Settings, ShellArgs, TreeArgs};

/// webdev - web developer toolkit driven by abbreviated command paths
///
/// Command layout:
///   webdev run <PATH>...        [--json]   run the action a path names
///   webdev complete [PATH]...   [--json]   completion candidates for a partial path
///   webdev tree                 [--json]   every path the tree accepts
///   webdev shell [--script FILE]           keep one browser alive across commands
///
/// Paths:
///   Tokens may be abbreviated to any unique prefix: `out pos abs` is
///   `outline positioned absolute`. An exact token always wins over a longer one
///   (`disable java` vs `disable javascript`). A trailing `?` stops at the current
///   position. `.`-prefixed entries (`.debug`) are hidden from listings but runnable.
///
/// Global flags / env:
///   -v / -vv / -vvv    More logging on stderr (RUST_LOG overrides)
///   -q / --quiet       Errors only
///   --config FILE      Settings file (.yaml/.yml or .json); WEBDEV_CONFIG fallback
///   --show-hidden      List hidden entries in completions and the tree
///   --quick-complete   Drop the "..." entry from completions
///
/// Examples:
///   webdev run clear cache
///   webdev run out pos abs
///   webdev complete disable ja --json
///   webdev --show-hidden tree
///   webdev run .debug
#[derive(Parser, Debug)]
#[command(
    name = "webdev",
    version,
    author,
    about = "webdev - abbreviated command paths over a simulated browser",
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all non-error logging
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Settings file (YAML or JSON)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<String>,

    /// Include hidden (`.`-prefixed) entries in listings
    #[arg(long, global = true)]
    show_hidden: bool,

    /// Omit the "..." parent entry from completions
    #[arg(long, global = true)]
    quick_complete: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the action a command path names
    Run(RunArgs),

    /// List completion candidates for a partial path
    Complete(CompleteArgs),

    /// Print the command tree
    Tree(TreeArgs),

    /// Interactive shell over a single browser session
    Shell(ShellArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = utils::derive_level(cli.verbose, cli.quiet);
    utils::init_logging(level);

    // Settings: file (--config > WEBDEV_CONFIG) < flags
    let mut settings = Settings::load(cli.config.as_deref())?;
    settings.apply_flags(cli.show_hidden, cli.quick_complete);
    debug!(?settings, "effective settings");

    match cli.command {
        Commands::Run(args) => cmd::execute_run(args, settings),
        Commands::Complete(args) => cmd::execute_complete(args, settings),
        Commands::Tree(args) => cmd::execute_tree(args, settings),
        Commands::Shell(args) => cmd::execute_shell(args, settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "webdev",
            "complete",
            "clear",
            "--show-hidden",
            "-vv",
            "--config",
            "wd.yaml",
        ])
        .unwrap();
        assert!(cli.show_hidden);
        assert!(!cli.quick_complete);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config.as_deref(), Some("wd.yaml"));
        match cli.command {
            Commands::Complete(a) => assert_eq!(a.path, vec!["clear"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn shell_script_flag() {
        let cli = Cli::try_parse_from(["webdev", "shell", "--script", "cmds.txt"]).unwrap();
        match cli.command {
            Commands::Shell(a) => {
                assert_eq!(a.script.as_deref(), Some(std::path::Path::new("cmds.txt")))
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn subcommand_required() {
        assert!(Cli::try_parse_from(["webdev"]).is_err());
    }
}

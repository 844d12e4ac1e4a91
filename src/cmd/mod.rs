/*!
Subcommand modules for the `webdev` CLI.

Layout:
  src/cmd/
    mod.rs        (this file: module declarations + re-exports)
    shared.rs     Settings (file + flags) and Session (browser + validated tree)
    run.rs        RunArgs      + execute_run
    complete.rs   CompleteArgs + execute_complete
    tree.rs       TreeArgs     + execute_tree
    shell.rs      ShellArgs    + execute_shell
    format.rs     colors, boxed header, column table

Conventions:
  - Each subcommand module exposes exactly one public `execute_*` function that
    takes its args plus the resolved Settings and returns `anyhow::Result<()>`.
  - Argument structs derive `clap::Args` and are kept minimal.
  - Everything that touches the command tree goes through `shared::Session`.
*/

pub mod complete;
pub mod format;
pub mod run;
pub mod shared;
pub mod shell;
pub mod tree;

pub use complete::{CompleteArgs, execute_complete};
pub use run::{RunArgs, execute_run};
pub use shared::Settings;
pub use shell::{ShellArgs, execute_shell};
pub use tree::{TreeArgs, execute_tree};

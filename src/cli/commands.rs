//! Subcommands of the `script-acceptance` CLI.

pub mod init;
pub mod run;

//! `kb completions`: print a shell completion script for `kb`.

use anyhow::{Context, Result};
use clap::Args;
use clap_complete::{Shell, generate};
use std::io::{self, Write};

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate the script for.
    #[arg(value_enum)]
    pub shell: Shell,
}

fn write_completions(shell: Shell, command: &mut clap::Command, out: &mut dyn Write) {
    generate(shell, command, "kb", out);
}

/// Print the completion script for `shell` on stdout.
///
/// # Errors
///
/// Returns an error if stdout cannot be flushed after the script is written.
pub fn run_completions(shell: Shell, command: &mut clap::Command) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_completions(shell, command, &mut out);
    out.flush().context("failed to flush completion script")
}

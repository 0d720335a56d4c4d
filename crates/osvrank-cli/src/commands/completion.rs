// SPDX-License-Identifier: Apache-2.0

//! Shell completion generation.

use std::io::Write;

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;

/// Generate completion script to stdout.
pub fn run_generate(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
    std::io::stdout().flush()?;
    Ok(())
}

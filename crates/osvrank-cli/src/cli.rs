// SPDX-License-Identifier: Apache-2.0

//! Command-line interface definition for osvrank.
//!
//! Uses clap's derive API for declarative CLI parsing. The pipeline stages
//! are exposed as verb subcommands so they can be run independently or
//! chained in CI.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Extended help text for the completion subcommand with shell-specific examples.
const COMPLETION_HELP: &str = r#"EXAMPLES

  bash
    Add to ~/.bashrc or ~/.bash_profile:
      eval "$(osvrank completion bash)"

  zsh
    Generate completion file:
      mkdir -p ~/.zsh/completions
      osvrank completion zsh > ~/.zsh/completions/_osvrank

    Add to ~/.zshrc (before compinit):
      fpath=(~/.zsh/completions $fpath)
      autoload -U compinit && compinit -i

  fish
    Generate completion file:
      osvrank completion fish > ~/.config/fish/completions/osvrank.fish
"#;

/// Output format for CLI results.
#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with colors (default)
    #[default]
    Text,
    /// JSON output for programmatic consumption
    Json,
}

/// Global output configuration passed to commands.
#[derive(Clone, Copy)]
pub struct OutputContext {
    /// Output format (text, json)
    pub format: OutputFormat,
    /// Suppress non-essential output (spinners, progress)
    pub quiet: bool,
    /// Whether stdout is a terminal (TTY)
    pub is_tty: bool,
}

impl OutputContext {
    /// Creates an `OutputContext` from CLI arguments.
    pub fn from_cli(format: OutputFormat, quiet: bool) -> Self {
        Self {
            format,
            quiet,
            is_tty: std::io::stdout().is_terminal(),
        }
    }

    /// Returns true if interactive elements (spinners, colors) should be shown.
    pub fn is_interactive(&self) -> bool {
        self.is_tty && !self.quiet && matches!(self.format, OutputFormat::Text)
    }
}

/// osvrank - priority ranking of OSV advisories for the npm ecosystem.
///
/// Downloads the OSV bulk snapshot, extracts recent GHSA and MAL advisories
/// into a summary table, and scores them by severity, weaponization
/// keywords, and npm download exposure.
#[derive(Parser)]
#[command(name = "osvrank")]
#[command(version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Output format (text, json)
    #[arg(long, short = 'o', global = true, default_value = "text", value_enum)]
    pub output: OutputFormat,

    /// Suppress non-essential output (spinners, progress)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug-level logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Download and unpack the OSV bulk snapshot
    Fetch {
        /// Snapshot archive URL (defaults to the npm all.zip bulk export)
        #[arg(long)]
        url: Option<String>,

        /// Directory to unpack the snapshot into
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Extract recent advisories from a local snapshot into the summary CSV
    Extract {
        /// Directory containing the unpacked snapshot JSON files
        #[arg(long)]
        snapshot_dir: Option<PathBuf>,

        /// Recency window in 30-day months
        #[arg(long)]
        months: Option<u32>,

        /// Summary CSV path to write
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Score the summary CSV and emit the ranked CSV, chart, and report
    Rank {
        /// Summary CSV path to read (written by `osvrank extract`)
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Directory for the ranked CSV, chart, and report
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Number of rows retained in the ranked report
        #[arg(long)]
        top: Option<usize>,

        /// Skip npm download lookups (exposure scores become 0)
        #[arg(long)]
        no_downloads: bool,
    },

    /// Generate shell completion scripts (output to stdout)
    #[command(after_long_help = COMPLETION_HELP)]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

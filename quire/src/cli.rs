use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line interface for quire
#[derive(Parser, Debug)]
#[command(author, version, about = "Quire: outlines, sidebars and reading times")]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times). Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(
    short = 'c',
    long = "config-file",
    global = true,
    action = clap::ArgAction::Append
  )]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", global = true, action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// All supported subcommands for the quire CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Count words and estimate reading time.
  Stats {
    /// Markdown files to measure.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,
  },

  /// Render a Markdown file to HTML.
  Render {
    /// Markdown file to render.
    file: PathBuf,

    /// Write the HTML here instead of standard output.
    #[arg(short, long)]
    output: Option<PathBuf>,
  },

  /// Print the outline of a Markdown file.
  Outline {
    /// Markdown file whose headings form the outline.
    file: PathBuf,

    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,
  },

  /// Resolve the configured sidebar for a page.
  Sidebar {
    /// Page path, e.g. `guide/intro.md`.
    #[arg(short, long)]
    path: String,

    /// Location hash of the page, including `#`.
    #[arg(long, default_value = "")]
    hash: String,

    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,
  },

  /// List published posts, newest first.
  Posts {
    /// Post sources; non-Markdown files and `index.md` are skipped.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Also skip the `test.md` scratch post.
    #[arg(long)]
    production: bool,

    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,
  },

  /// Initialize a new quire configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "quire.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::panic, reason = "Fine in tests")]

  use clap::CommandFactory;

  use super::*;

  #[test]
  fn test_cli_is_well_formed() {
    Cli::command().debug_assert();
  }

  #[test]
  fn test_global_flags_after_subcommand() {
    let cli = Cli::parse_from([
      "quire",
      "sidebar",
      "--path",
      "guide/intro.md",
      "-v",
      "--config",
      "layout.aside=left",
    ]);
    assert!(cli.verbose);
    assert_eq!(cli.config_overrides, vec!["layout.aside=left"]);
    match cli.command {
      Commands::Sidebar { path, hash, json } => {
        assert_eq!(path, "guide/intro.md");
        assert!(hash.is_empty());
        assert!(!json);
      },
      other => panic!("unexpected command {other:?}"),
    }
  }
}

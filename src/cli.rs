//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `devhost`.
#[derive(Debug, Parser)]
#[command(name = "devhost", version, about = "Developer-tooling host: source control, bots, bugs and IRC")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show what the host detects about this machine and checkout.
    Info,
    /// Show the working copy and its local changes.
    Scm {
        /// Limit queries to these directories (relative to the checkout root).
        #[arg(long = "patch-dir", value_name = "DIR")]
        patch_dirs: Vec<PathBuf>,
    },
    /// Match local changes (or a patch file) against the watch list.
    Watchlist {
        /// Read the diff from this file instead of the working copy.
        #[arg(long, value_name = "FILE")]
        patch: Option<PathBuf>,
    },
    /// List builder states on the build master.
    Bots {
        /// Query the Chromium WebKit master instead.
        #[arg(long)]
        chromium: bool,
    },
    /// Show a bug.
    Bug {
        /// Bug number.
        id: u64,
    },
    /// Show a queue's status for an attachment.
    PatchStatus {
        /// Queue name, e.g. `commit-queue`.
        queue: String,
        /// Attachment id.
        attachment: u64,
    },
    /// Post a message to the IRC channel.
    IrcSay {
        /// Text to post.
        message: String,
        /// Do not ask for confirmation.
        #[arg(long)]
        yes: bool,
    },
}

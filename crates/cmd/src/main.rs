// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod common;

use common::CliContext;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "dfsp")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// YAML client configuration (defaults to $DFSPATH_CONFIG)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Filesystem URI, overriding fs.defaultFS
    #[arg(long, global = true)]
    fs: Option<String>,

    /// Host directory backing the host:// scheme, overriding fs.host.root
    #[arg(long, global = true)]
    root: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List a directory
    Ls {
        /// Directory to list
        #[arg(default_value = ".")]
        path: String,
        /// Include names starting with '_' or '.'
        #[arg(short, long)]
        all: bool,
    },
    /// Show metadata for a path
    Stat {
        path: String,
    },
    /// Create a directory and its missing parents
    Mkdir {
        path: String,
    },
    /// Move a file or directory, removing emptied source directories
    Mv {
        src: String,
        dst: String,
        /// Fail instead of replacing an existing destination
        #[arg(short, long)]
        no_clobber: bool,
    },
    /// Remove a file or directory tree
    Rm {
        path: String,
    },
    /// Write a file's contents to stdout
    Cat {
        path: String,
    },
    /// Copy a host file into the filesystem
    Put {
        /// Source file on the host filesystem
        source: PathBuf,
        /// Destination path
        dest: String,
        /// Block size for the new file
        #[arg(short, long)]
        block_size: Option<u64>,
        /// Replace an existing destination
        #[arg(short, long)]
        force: bool,
    },
    /// Append a host file, or stdin, to a file
    Append {
        dest: String,
        /// Source file on the host filesystem (defaults to stdin)
        source: Option<PathBuf>,
    },
}

#[allow(clippy::print_stdout)]
fn print_line(line: &str) {
    println!("{line}");
}

#[tokio::main]
async fn main() -> Result<()> {
    diagnostics::init_diagnostics();

    let cli = Cli::parse();
    let ctx = CliContext::from_args(cli.config, cli.fs, cli.root)?;

    match cli.command {
        Commands::Ls { path, all } => commands::list_command(&ctx, &path, all, print_line).await,
        Commands::Stat { path } => commands::stat_command(&ctx, &path, print_line).await,
        Commands::Mkdir { path } => commands::mkdir_command(&ctx, &path, print_line).await,
        Commands::Mv {
            src,
            dst,
            no_clobber,
        } => commands::mv_command(&ctx, &src, &dst, no_clobber, print_line).await,
        Commands::Rm { path } => commands::rm_command(&ctx, &path, print_line).await,
        Commands::Cat { path } => {
            commands::cat_command(&ctx, &path, &mut tokio::io::stdout()).await
        }
        Commands::Put {
            source,
            dest,
            block_size,
            force,
        } => commands::put_command(&ctx, &source, &dest, block_size, force, print_line).await,
        Commands::Append { dest, source } => match source {
            Some(source) => {
                let mut input = tokio::fs::File::open(&source).await?;
                commands::append_command(&ctx, &dest, &mut input, print_line).await
            }
            None => {
                commands::append_command(&ctx, &dest, &mut tokio::io::stdin(), print_line).await
            }
        },
    }
}

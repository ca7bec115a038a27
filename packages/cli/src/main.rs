mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{compile, init, push, snippets, CompileArgs, InitArgs, PushArgs, SnippetsCommand};
use tracing_subscriber::EnvFilter;

/// Mailcraft CLI - block-based email builder
#[derive(Parser, Debug)]
#[command(name = "mailcraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new Mailcraft project
    Init(InitArgs),

    /// Compile stored documents to email HTML
    Compile(CompileArgs),

    /// Upload a stored document as a campaign draft
    Push(PushArgs),

    /// Manage saved snippets
    Snippets {
        #[command(subcommand)]
        command: SnippetsCommand,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| match cli.command {
            Command::Init(args) => init(args, &cwd),
            Command::Compile(args) => compile(args, &cwd),
            Command::Push(args) => push(args, &cwd),
            Command::Snippets { command } => snippets(command, &cwd),
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}

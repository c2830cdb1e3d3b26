//! config/cli.rs
//! Argumentos de línea de comandos.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "async_db_talk")]
#[command(about = "Async database access patterns, demonstrated against PostgreSQL")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand, PartialEq)]
pub enum Command {
    /// Run the demos (all of them when no label is given)
    Run {
        /// Demo labels to run, in order
        labels: Vec<String>,
    },
    /// List the available demos
    List,
    /// Serve the demos over HTTP
    Serve,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run { labels: Vec::new() })
    }
}

// Wed Jan 15 2026 - Alex

pub mod args;
pub mod handler;

pub use args::Args;
pub use handler::CommandHandler;

use clap::Parser;

/// Parses the command line and runs it, returning the process exit code.
pub fn run() -> anyhow::Result<i32> {
    let args = Args::parse();
    CommandHandler::new().execute(args)
}

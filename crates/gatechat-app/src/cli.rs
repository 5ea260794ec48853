use std::path::PathBuf;

use clap::Parser;

/// Gatechat, a key-gated Gemini chat for the terminal.
#[derive(Parser, Debug)]
#[command(name = "gatechat", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter override (e.g. `gatechat=debug`).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

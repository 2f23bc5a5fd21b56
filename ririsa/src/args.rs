use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;

/// Ririsa image gateway
#[derive(Debug, Parser)]
#[command(name = "ririsa", about = "Prompt-driven image generation, merging, and editing gateway")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "ririsa.toml", env = "RIRISA_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "RIRISA_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Log filter in `RUST_LOG` syntax
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log: String,
}

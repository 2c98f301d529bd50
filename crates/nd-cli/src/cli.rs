use crate::commands::Commands;

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "nd")]
#[command(about = "Run and supervise the netter route server")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Config directory (default: ND_CONFIG_DIR or the platform config dir)
    #[arg(long, global = true)]
    pub(crate) config_dir: Option<PathBuf>,
}

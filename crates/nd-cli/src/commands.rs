use std::ffi::OsString;
use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Start the server for a route file and follow it until it stops
    Start {
        /// Route file passed to `netter parse --path`
        path: PathBuf,

        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Check that the netter tool is installed and runnable
    Check,

    /// Parse a route file once and print the result
    Parse {
        path: PathBuf,
    },

    /// Run the netter tool once with the given arguments
    Run {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<OsString>,
    },
}

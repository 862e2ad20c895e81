use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "plugin-runner", about = "Invoke transcoding plugins and report JSON results", version)]
pub struct Cli {
    /// Directory holding the plugin files (overrides PLUGINS_PATH).
    #[arg(long = "plugins-dir", global = true)]
    pub plugins_dir: Option<PathBuf>,

    /// Pretty-print JSON written to stdout.
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the declared details of a plugin.
    #[command(visible_alias = "details")]
    Describe {
        /// The ID of the plugin to call.
        #[arg(long)]
        id: String,
    },

    /// Execute a plugin against a file and write the results file.
    #[command(visible_alias = "plugin")]
    Execute {
        /// The ID of the plugin to call.
        #[arg(long)]
        id: String,

        /// Path to the parameters file (JSON).
        #[arg(long)]
        parameters: PathBuf,

        /// Path to the results file; overwritten.
        #[arg(long)]
        output: PathBuf,
    },

    /// List the plugin ids available in the plugins directory.
    List {
        /// Describe every plugin and report its details instead of just the id.
        #[arg(long)]
        details: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "prquad-cli",
    about = "A command line shell for a bucketed PR quadtree",
    long_about = "prquad-cli builds an in-memory PR quadtree over 2-D integer points.\nIt can preload points from a file and execute commands interactively or non-interactively."
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", default_value = "prquad.toml")]
    pub config: String,

    /// Generate a default configuration file and exit
    #[arg(long = "generate-config")]
    pub generate_config: bool,

    /// Side length exponent k of the indexed space (overrides config)
    #[arg(short = 'k', long = "resolution")]
    pub resolution: Option<u32>,

    /// Bucket size b of leaf nodes (overrides config)
    #[arg(short = 'b', long = "bucket-size")]
    pub bucket_size: Option<usize>,

    /// Log level: trace, debug, info, warn, error (overrides config)
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// File of points to insert before running commands
    #[arg(long = "points")]
    pub points: Option<PathBuf>,

    /// Enter interactive mode
    #[arg(short = 'i', long = "interactive")]
    pub interactive: bool,

    /// Command to execute (if not in interactive mode)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl CliArgs {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.bucket_size == Some(0) {
            return Err("Bucket size must be greater than 0".to_string());
        }

        if self.interactive && !self.command.is_empty() {
            return Err("Cannot combine -i with a one-shot command".to_string());
        }

        Ok(())
    }

    pub fn should_run_interactive(&self) -> bool {
        self.interactive || self.command.is_empty()
    }
}

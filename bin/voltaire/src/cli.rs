//! CLI definition and entrypoint to executable

use crate::commands::{config, rlp, tx};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use voltaire_config::Config;
use voltaire_tracing::{
    tracing::{metadata::LevelFilter, Level},
    LayerInfo, LogFormat, Tracer, VoltaireTracer,
};

/// Parse CLI options, set up logging and run the chosen command.
pub(crate) fn run() -> eyre::Result<()> {
    let opt = Cli::parse();

    let config = match &opt.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    opt.logs.tracer(&config, &opt.verbosity).init()?;

    match opt.command {
        Commands::Decode(command) => command.execute(&config.codec),
        Commands::SigningHash(command) => command.execute(&config.codec),
        Commands::Recover(command) => command.execute(&config.codec),
        Commands::Verify(command) => command.execute(&config.codec),
        Commands::Rlp(command) => command.execute(),
        Commands::Config(command) => command.execute(&config),
    }
}

/// Commands to be executed
#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    /// Decode a raw transaction and print it as JSON
    #[command(name = "decode")]
    Decode(tx::DecodeCommand),
    /// Print the hash a raw transaction's signature commits to
    #[command(name = "signing-hash")]
    SigningHash(tx::SigningHashCommand),
    /// Recover the sender of a raw transaction
    #[command(name = "recover")]
    Recover(tx::RecoverCommand),
    /// Check that a raw transaction was signed by the given sender
    #[command(name = "verify")]
    Verify(tx::VerifyCommand),
    /// Dump any RLP payload as a tree
    #[command(name = "rlp")]
    Rlp(rlp::Command),
    /// Print the active configuration as TOML
    #[command(name = "config")]
    Config(config::Command),
}

#[derive(Debug, Parser)]
#[command(author, version, about = "Voltaire", long_about = None)]
struct Cli {
    /// The command to run
    #[clap(subcommand)]
    command: Commands,

    /// The path to the configuration file to use.
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[clap(flatten)]
    logs: Logs,

    #[clap(flatten)]
    verbosity: Verbosity,
}

#[derive(Debug, Args)]
#[command(next_help_heading = "Logging")]
struct Logs {
    /// The format to use for log output. Overrides the configuration file.
    #[arg(long = "log.format", value_name = "FORMAT", global = true)]
    format: Option<LogFormat>,

    /// Extra comma separated filter directives, appended to the configured ones.
    #[arg(long = "log.filter", value_name = "FILTER", global = true, default_value = "")]
    filter: String,

    /// Sets whether or not the formatter emits ANSI terminal escape codes for colors and other
    /// text formatting.
    #[arg(long = "color", value_name = "COLOR", global = true, default_value = "always")]
    color: String,
}

impl Logs {
    /// Builds the tracer from the configuration file and the command line.
    fn tracer(&self, config: &Config, verbosity: &Verbosity) -> VoltaireTracer {
        let filters = [config.log.filter.as_str(), self.filter.as_str()]
            .into_iter()
            .filter(|filter| !filter.is_empty())
            .collect::<Vec<_>>()
            .join(",");

        VoltaireTracer::new().with_stderr(LayerInfo::new(
            self.format.unwrap_or(config.log.format),
            verbosity.directive(),
            filters,
            Some(self.color.clone()),
        ))
    }
}

#[derive(Debug, Args)]
#[command(next_help_heading = "Display")]
struct Verbosity {
    /// Set the minimum log level.
    ///
    /// -v      Errors
    /// -vv     Warnings
    /// -vvv    Info
    /// -vvvv   Debug
    /// -vvvvv  Traces (warning: very verbose!)
    #[clap(short, long, action = ArgAction::Count, global = true, default_value_t = 2, verbatim_doc_comment, help_heading = "Display")]
    verbosity: u8,

    /// Silence all log output.
    #[clap(long, alias = "silent", short = 'q', global = true, help_heading = "Display")]
    quiet: bool,
}

impl Verbosity {
    /// Get the default directive for the given verbosity, or `off` if the verbosity corresponds
    /// to silent.
    fn directive(&self) -> String {
        if self.quiet {
            return LevelFilter::OFF.to_string()
        }

        let level = match self.verbosity.saturating_sub(1) {
            0 => Level::ERROR,
            1 => Level::WARN,
            2 => Level::INFO,
            3 => Level::DEBUG,
            _ => Level::TRACE,
        };
        LevelFilter::from_level(level).to_string()
    }
}

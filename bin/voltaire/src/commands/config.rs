//! `voltaire config` command

use clap::Parser;
use voltaire_config::Config;

/// `voltaire config` command
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// Print the built-in defaults instead of the loaded configuration.
    #[arg(long)]
    default: bool,
}

impl Command {
    /// Execute `config` command
    pub(crate) fn execute(self, config: &Config) -> eyre::Result<()> {
        let config = if self.default { Config::default() } else { config.clone() };
        print!("{}", toml::to_string_pretty(&config)?);
        Ok(())
    }
}

//! Command line tool for raw Ethereum transactions.

mod cli;
mod commands;

fn main() {
    if let Err(err) = cli::run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

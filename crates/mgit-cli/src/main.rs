use clap::Parser;
use colored::Colorize;

mod cli;
mod commands;
mod config;
mod repo;

fn main() {
    let cli = cli::Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = commands::run_command(cli) {
        eprintln!("{} {e:#}", "fatal:".red().bold());
        let code = if e.downcast_ref::<repo::NotARepository>().is_some() {
            128
        } else {
            1
        };
        std::process::exit(code);
    }
}

//! kvadmin CLI: Redis-style admin shell for key-value stores.
//!
//! Three modes:
//! - **Shell mode**: `kvadmin [flags] COMMAND`: single command, exit
//! - **REPL mode**: `kvadmin [flags]`: interactive prompt (if stdin is TTY)
//! - **Pipe mode**: `echo "scan key:*" | kvadmin`: line-by-line from stdin

mod commands;
mod config;
mod demo;
mod format;
mod parse;
mod session;

use std::io::IsTerminal;
use std::process;

use kvadmin::{AdminConfig, KvAdmin, Connector};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use config::load_config;
use format::{format_error, OutputOptions};
use parse::matches_to_action;
use session::Session;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("KVADMIN_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();

    let matches = build_cli().get_matches();
    let output = OutputOptions::from_matches(&matches);

    let config = match load_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string(), output.mode));
            process::exit(1);
        }
    };
    debug!(?config, "effective configuration");

    let exit_code = if matches.get_flag("memory") {
        match KvAdmin::builder().config(config.clone()).in_memory() {
            Ok(admin) => run(admin, &matches, &config, output),
            Err(e) => fail(&e.to_string(), output),
        }
    } else {
        match KvAdmin::connect(&config) {
            Ok(admin) => run(admin, &matches, &config, output),
            Err(e) => fail(&e.to_string(), output),
        }
    };
    process::exit(exit_code);
}

fn fail(message: &str, output: OutputOptions) -> i32 {
    eprintln!("{}", format_error(message, output.mode));
    1
}

fn run<M: Connector>(
    admin: KvAdmin<M>,
    matches: &clap::ArgMatches,
    config: &AdminConfig,
    output: OutputOptions,
) -> i32 {
    let session = Session::new(admin, output, config.demo.clone());

    let exit_code = if matches.subcommand().is_some() {
        // Shell mode: parse, execute, format, exit
        match matches_to_action(matches) {
            Ok(action) => session.run(action),
            Err(e) => fail(&e, output),
        }
    } else if std::io::stdin().is_terminal() {
        session::run_repl(&session);
        0
    } else {
        session::run_pipe(&session)
    };

    // process::exit skips destructors
    session.close();
    exit_code
}

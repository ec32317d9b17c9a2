//! clap command tree.
//!
//! The same subcommands serve shell mode (`kvadmin scan key:*`) and every
//! line typed into the REPL or piped on stdin.

use clap::{value_parser, Arg, ArgAction, Command};

/// Top-level command: global flags plus every subcommand.
pub fn build_cli() -> Command {
    Command::new("kvadmin")
        .about("Administrative client for Redis-protocol key-value stores")
        .version(env!("CARGO_PKG_VERSION"))
        .long_about(
            "Populate, enumerate, delete and read keys. Every operation prints a \
             JSON report.\n\nWithout a subcommand, starts an interactive shell when \
             stdin is a terminal and reads one command per line otherwise.",
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .env("KVADMIN_CONFIG")
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("host")
                .long("host")
                .value_name("HOST")
                .help("Server host [env: REDIS_HOST]"),
        )
        .arg(
            Arg::new("port")
                .long("port")
                .short('p')
                .value_name("PORT")
                .value_parser(value_parser!(u16))
                .help("Server port [env: REDIS_PORT]"),
        )
        .arg(
            Arg::new("password")
                .long("password")
                .short('a')
                .value_name("PASSWORD")
                .help("Server password [env: REDIS_PASSWORD]"),
        )
        .arg(
            Arg::new("tls")
                .long("tls")
                .action(ArgAction::SetTrue)
                .help("Connect with TLS [env: REDIS_SSL]"),
        )
        .arg(
            Arg::new("max-scan-iterations")
                .long("max-scan-iterations")
                .value_name("N")
                .value_parser(value_parser!(u64).range(1..))
                .help("Abort a scan after N page requests [env: KVADMIN_MAX_SCAN_ITERATIONS]"),
        )
        .arg(
            Arg::new("memory")
                .long("memory")
                .action(ArgAction::SetTrue)
                .help("Use a throwaway in-process store instead of a server"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .short('j')
                .action(ArgAction::SetTrue)
                .help("Print reports as single-line JSON"),
        )
        .arg(
            Arg::new("show-keys")
                .long("show-keys")
                .action(ArgAction::SetTrue)
                .help("Include enumerated keys in printed reports"),
        )
        .subcommands(subcommands())
}

/// Command used to parse one REPL or pipe line.
pub fn build_repl_cmd() -> Command {
    Command::new("kvadmin")
        .no_binary_name(true)
        .subcommand_required(true)
        .disable_version_flag(true)
        .subcommands(subcommands())
}

fn subcommands() -> Vec<Command> {
    vec![
        Command::new("populate")
            .about("Clear the store and write COUNT entries key:<i> -> value:<i>")
            .arg(
                Arg::new("count")
                    .required(true)
                    .value_parser(value_parser!(u64)),
            ),
        Command::new("keys").about("List every key with a single KEYS *"),
        Command::new("scan")
            .about("List keys matching PATTERN with cursor-based SCAN")
            .arg(Arg::new("pattern").default_value("*").help("Glob pattern"))
            .arg(
                Arg::new("count")
                    .long("count")
                    .short('n')
                    .value_parser(value_parser!(usize))
                    .default_value("1000")
                    .help("COUNT hint per page"),
            ),
        Command::new("del")
            .about("Delete every key containing FILTER")
            .arg(Arg::new("filter").required(true)),
        Command::new("get")
            .about("Read one key")
            .arg(Arg::new("key").required(true)),
        Command::new("ping").about("Check connectivity"),
        Command::new("demo")
            .about("Run populate, del, keys and scan in sequence")
            .arg(
                Arg::new("count")
                    .long("count")
                    .short('n')
                    .value_parser(value_parser!(u64))
                    .help("Entries to populate [default: from config]"),
            )
            .arg(
                Arg::new("filter")
                    .long("filter")
                    .short('f')
                    .help("Substring to delete [default: from config]"),
            ),
    ]
}

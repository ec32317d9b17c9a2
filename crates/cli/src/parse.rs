//! ArgMatches → Command/Demo/MetaCommand conversion.
//!
//! Translates clap's parsed arguments into the appropriate action:
//! - Single operations → `CliAction::Execute(Command)`
//! - The scripted sequence → `CliAction::Demo`
//! - REPL meta-commands → `CliAction::Meta`

use clap::ArgMatches;
use kvadmin::{Command, Filter, Pattern};

use crate::commands::build_repl_cmd;

/// The result of parsing user input.
#[derive(Debug, PartialEq, Eq)]
pub enum CliAction {
    /// One operation.
    Execute(Command),
    /// populate, del, keys, scan in sequence.
    Demo(DemoArgs),
    /// A REPL-only meta-command.
    Meta(MetaCommand),
}

/// Overrides for the demo sequence; `None` falls back to configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemoArgs {
    pub count: Option<u64>,
    pub filter: Option<String>,
}

/// REPL meta-commands.
#[derive(Debug, PartialEq, Eq)]
pub enum MetaCommand {
    Help { command: Option<String> },
    Quit,
    Clear,
}

/// Check for REPL meta-commands before delegating to clap.
///
/// Returns `Some(MetaCommand)` if the line is a meta-command, `None` otherwise.
pub fn check_meta_command(line: &str) -> Option<MetaCommand> {
    let mut parts = line.split_whitespace();
    let cmd = parts.next()?;

    match cmd {
        "quit" | "exit" => Some(MetaCommand::Quit),
        "clear" => Some(MetaCommand::Clear),
        "help" => Some(MetaCommand::Help {
            command: parts.next().map(str::to_string),
        }),
        _ => None,
    }
}

/// Parse one REPL or pipe line.
pub fn parse_line(line: &str) -> Result<CliAction, String> {
    if let Some(meta) = check_meta_command(line) {
        return Ok(CliAction::Meta(meta));
    }

    let tokens = shlex::split(line).ok_or_else(|| "Unbalanced quotes".to_string())?;
    let matches = build_repl_cmd()
        .try_get_matches_from(tokens)
        .map_err(|e| e.render().to_string().trim_end().to_string())?;
    matches_to_action(&matches)
}

/// Convert clap ArgMatches into a CliAction.
pub fn matches_to_action(matches: &ArgMatches) -> Result<CliAction, String> {
    let (sub_name, m) = matches
        .subcommand()
        .ok_or_else(|| "No command provided".to_string())?;

    match sub_name {
        "populate" => {
            let count = *m
                .get_one::<u64>("count")
                .ok_or("populate requires COUNT")?;
            Ok(CliAction::Execute(Command::Populate { count }))
        }
        "keys" => Ok(CliAction::Execute(Command::ListKeys)),
        "scan" => {
            let pattern = m
                .get_one::<String>("pattern")
                .map(|p| Pattern::new(p.as_str()))
                .unwrap_or_default();
            let page_hint = m.get_one::<usize>("count").copied().unwrap_or(1000);
            Ok(CliAction::Execute(Command::ScanKeys { pattern, page_hint }))
        }
        "del" => {
            let filter = m.get_one::<String>("filter").ok_or("del requires FILTER")?;
            Ok(CliAction::Execute(Command::DeleteByFilter {
                filter: Filter::new(filter.as_str()),
            }))
        }
        "get" => {
            let key = m.get_one::<String>("key").ok_or("get requires KEY")?;
            Ok(CliAction::Execute(Command::Fetch { key: key.clone() }))
        }
        "ping" => Ok(CliAction::Execute(Command::Ping)),
        "demo" => Ok(CliAction::Demo(DemoArgs {
            count: m.get_one::<u64>("count").copied(),
            filter: m.get_one::<String>("filter").cloned(),
        })),
        other => Err(format!("Unknown command: {}", other)),
    }
}

//! Session: one client plus output settings, driven by shell, REPL or pipe.

use std::io::{self, BufRead};
use std::path::PathBuf;

use kvadmin::{DemoSettings, KvAdmin, Connector};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use crate::commands::build_repl_cmd;
use crate::demo::demo_commands;
use crate::format::{emit, format_error, OutputOptions};
use crate::parse::{parse_line, CliAction, MetaCommand};

const PROMPT: &str = "kvadmin> ";

/// What the caller should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Keep reading; carries the line's exit code.
    Continue(i32),
    Quit,
}

pub struct Session<M: Connector> {
    admin: KvAdmin<M>,
    output: OutputOptions,
    demo: DemoSettings,
}

impl<M: Connector> Session<M> {
    pub fn new(admin: KvAdmin<M>, output: OutputOptions, demo: DemoSettings) -> Self {
        Self {
            admin,
            output,
            demo,
        }
    }

    pub fn admin(&self) -> &KvAdmin<M> {
        &self.admin
    }

    /// Run an action and print its reports. Returns the exit code.
    pub fn run(&self, action: CliAction) -> i32 {
        match action {
            CliAction::Execute(command) => emit(&self.admin.execute(command), self.output),
            CliAction::Demo(args) => demo_commands(&self.demo, &args)
                .into_iter()
                .map(|command| emit(&self.admin.execute(command), self.output))
                .max()
                .unwrap_or(0),
            CliAction::Meta(_) => {
                eprintln!(
                    "{}",
                    format_error("Meta-commands are only available in REPL mode", self.output.mode)
                );
                1
            }
        }
    }

    /// Parse and run one line of REPL or pipe input.
    pub fn execute_line(&self, line: &str) -> LineOutcome {
        match parse_line(line) {
            Ok(CliAction::Meta(meta)) => self.meta(meta),
            Ok(action) => LineOutcome::Continue(self.run(action)),
            Err(e) => {
                eprintln!("{}", format_error(&e, self.output.mode));
                LineOutcome::Continue(1)
            }
        }
    }

    fn meta(&self, meta: MetaCommand) -> LineOutcome {
        match meta {
            MetaCommand::Quit => LineOutcome::Quit,
            MetaCommand::Clear => {
                print!("\x1B[2J\x1B[1;1H");
                LineOutcome::Continue(0)
            }
            MetaCommand::Help { command } => {
                let mut cmd = build_repl_cmd();
                let help = match command {
                    Some(name) => match cmd.find_subcommand_mut(&name) {
                        Some(sub) => sub.render_help(),
                        None => {
                            eprintln!(
                                "{}",
                                format_error(&format!("Unknown command: {}", name), self.output.mode)
                            );
                            return LineOutcome::Continue(1);
                        }
                    },
                    None => cmd.render_help(),
                };
                println!("{}", help);
                println!("Meta-commands: help [COMMAND], clear, quit, exit");
                LineOutcome::Continue(0)
            }
        }
    }

    /// Close the pool.
    pub fn close(&self) {
        self.admin.close();
    }
}

fn history_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".kvadmin_history"))
}

/// Interactive prompt with line editing and persistent history.
pub fn run_repl<M: Connector>(session: &Session<M>) {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string(), session.output.mode));
            return;
        }
    };

    let history = history_path();
    if let Some(path) = &history {
        if let Err(e) = editor.load_history(path) {
            debug!(error = %e, "no history loaded");
        }
    }

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line.as_str());
                if session.execute_line(&line) == LineOutcome::Quit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}", format_error(&e.to_string(), session.output.mode));
                break;
            }
        }
    }

    if let Some(path) = &history {
        if let Err(e) = editor.save_history(path) {
            debug!(error = %e, "could not save history");
        }
    }
}

/// Execute stdin line by line. Blank lines and `#` comments are skipped.
///
/// Returns 1 if any line failed.
pub fn run_pipe<M: Connector>(session: &Session<M>) -> i32 {
    run_lines(session, io::stdin().lock())
}

fn run_lines<M: Connector>(session: &Session<M>, input: impl BufRead) -> i32 {
    let mut exit_code = 0;
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("{}", format_error(&e.to_string(), session.output.mode));
                return 1;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match session.execute_line(trimmed) {
            LineOutcome::Quit => break,
            LineOutcome::Continue(code) => exit_code = exit_code.max(code),
        }
    }
    exit_code
}

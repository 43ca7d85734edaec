//! Terminal surface for a produce board.
//!
//! # Responsibility
//! - Drive one wall-clock board from line commands on stdin.
//! - Re-render the three collections after every state change.
//!
//! # Invariants
//! - Matured reversals are polled before each command runs.
//! - The board is disposed before the process exits.

use log::info;
use sortboard_core::{init_logging, BoardConfig, BoardError, Clock, Item, LogTarget, SortBoard};
use std::io::{self, BufRead, Write};
use std::time::Duration;

const HELP: &str = "commands: select <id> | activate <id> | deactivate <id> | wait <ms> | show | log | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Select(String),
    Activate(String),
    Deactivate(String),
    Wait(Duration),
    Show,
    Log,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut parts = line.split_whitespace();
    let verb = parts.next().unwrap_or_default().to_ascii_lowercase();
    let arg = parts.collect::<Vec<_>>().join(" ");
    let require_id = |arg: String| {
        if arg.is_empty() {
            Err(format!("`{verb}` needs an item id"))
        } else {
            Ok(arg)
        }
    };

    match verb.as_str() {
        "select" | "s" => require_id(arg).map(Command::Select),
        "activate" | "a" => require_id(arg).map(Command::Activate),
        "deactivate" | "d" => require_id(arg).map(Command::Deactivate),
        "wait" | "w" => arg
            .parse::<u64>()
            .map(|ms| Command::Wait(Duration::from_millis(ms)))
            .map_err(|_| format!("`wait` needs milliseconds, got `{arg}`")),
        "show" | "" => Ok(Command::Show),
        "log" => Ok(Command::Log),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(format!("unknown command `{other}`; {HELP}")),
    }
}

fn render<C: Clock>(board: &SortBoard<C>) -> String {
    let row = |title: &str, items: &[Item]| {
        let names = items
            .iter()
            .map(|item| {
                if board.has_pending(&item.id) {
                    format!("{}*", item.name)
                } else {
                    item.name.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("{title:<14}| {names}")
    };
    [
        row("Items", board.uncategorized()),
        row("Fruit", board.fruits()),
        row("Vegetable", board.vegetables()),
    ]
    .join("\n")
}

fn execute<C: Clock>(board: &mut SortBoard<C>, command: &Command) -> Result<String, BoardError> {
    match command {
        Command::Select(id) => {
            board.handle_select(id)?;
            Ok(render(board))
        }
        Command::Activate(id) => {
            board.activate(id)?;
            Ok(render(board))
        }
        Command::Deactivate(id) => {
            board.deactivate(id)?;
            Ok(render(board))
        }
        Command::Show => Ok(render(board)),
        Command::Log => Ok(board
            .actions()
            .iter()
            .map(|action| format!("{action:?}"))
            .collect::<Vec<_>>()
            .join("\n")),
        Command::Help => Ok(HELP.to_string()),
        Command::Wait(_) | Command::Quit => Ok(String::new()),
    }
}

fn main() {
    let config = match BoardConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };
    if let Err(err) = LogTarget::from_env("cli").and_then(|target| match target {
        Some(target) => init_logging(target, &config),
        None => Ok(()),
    }) {
        eprintln!("logging disabled: {err}");
    }
    let mut board = match SortBoard::produce(config) {
        Ok(board) => board,
        Err(err) => {
            eprintln!("failed to open board: {err}");
            std::process::exit(1);
        }
    };

    println!("sortboard {} ({HELP})", sortboard_core::core_version());
    println!("{}", render(&board));

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        report_reversals(&mut board);

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        if let Command::Wait(duration) = command {
            std::thread::sleep(duration);
            report_reversals(&mut board);
            continue;
        }

        match execute(&mut board, &command) {
            Ok(output) if !output.is_empty() => println!("{output}"),
            Ok(_) => {}
            Err(err) => eprintln!("{err}"),
        }
        let _ = io::stdout().flush();
    }

    let cancelled = board.dispose();
    info!("event=cli_exit module=cli status=ok cancelled_timers={cancelled}");
}

fn report_reversals<C: Clock>(board: &mut SortBoard<C>) {
    match board.poll_timers() {
        Ok(returned) if !returned.is_empty() => {
            println!("returned: {}", returned.join(", "));
            println!("{}", render(board));
        }
        Ok(_) => {}
        Err(err) => eprintln!("{err}"),
    }
}

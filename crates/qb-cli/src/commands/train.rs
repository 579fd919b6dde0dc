use std::io::{self, BufRead, Write};

use colored::Colorize;
use qb_client::{CharacterApi, StatusScreen};
use qb_core::Attribute;

use super::{Context, render_allocation};

/// One line of input in the training loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Increase(Attribute, u32),
    Decrease(Attribute, u32),
    Reset,
    Commit,
    Show,
    Reload,
    Help,
    Quit,
}

const HELP: &str = "\
  + <attr> [n]   spend n points (default 1) on an attribute
  - <attr> [n]   take n points back
  reset          discard pending changes
  commit         send pending changes to the server
  show           print the current allocation
  reload         fetch the character again, discarding pending changes
  quit           leave (pending changes are discarded)

  attributes: strength (str), dexterity (dex), wisdom (wis), perception (per)";

fn parse_action(input: &str) -> Result<Action, String> {
    let trimmed = input.trim();

    let (sign, rest) = if let Some(rest) = trimmed.strip_prefix('+') {
        (Some(true), rest)
    } else if let Some(rest) = trimmed.strip_prefix('-') {
        (Some(false), rest)
    } else {
        (None, trimmed)
    };

    if let Some(increase) = sign {
        let mut words = rest.split_whitespace();
        let attr: Attribute = words
            .next()
            .ok_or("which attribute? e.g. `+ str`")?
            .parse()
            .map_err(|e: qb_core::CoreError| e.to_string())?;
        let count = match words.next() {
            Some(n) => n
                .parse::<u32>()
                .map_err(|_| format!("not a number: \"{n}\""))?,
            None => 1,
        };
        if words.next().is_some() {
            return Err("too many arguments".into());
        }
        return Ok(if increase {
            Action::Increase(attr, count)
        } else {
            Action::Decrease(attr, count)
        });
    }

    match trimmed.to_lowercase().as_str() {
        "reset" => Ok(Action::Reset),
        "commit" | "confirm" => Ok(Action::Commit),
        "show" | "status" => Ok(Action::Show),
        "reload" => Ok(Action::Reload),
        "help" | "?" => Ok(Action::Help),
        "quit" | "q" | "exit" => Ok(Action::Quit),
        other => Err(format!("unknown command: {other} (try `help`)")),
    }
}

async fn execute<A: CharacterApi>(
    screen: &mut StatusScreen<A>,
    action: Action,
) -> Result<String, String> {
    let message = match action {
        Action::Increase(attr, n) => {
            let done = screen.increase_by(attr, n);
            if done < n {
                format!("{attr}: +{done} (no points left)")
            } else {
                format!("{attr}: +{done}")
            }
        }
        Action::Decrease(attr, n) => {
            let done = screen.decrease_by(attr, n);
            if done < n {
                format!("{attr}: -{done} (already at its confirmed value)")
            } else {
                format!("{attr}: -{done}")
            }
        }
        Action::Reset => {
            screen.reset();
            "Pending changes discarded.".to_string()
        }
        Action::Commit => {
            if !screen.session().is_some_and(|s| s.is_dirty()) {
                return Ok("Nothing to commit.".to_string());
            }
            screen.commit().await.map_err(|e| e.to_string())?;
            "Attributes updated.".green().to_string()
        }
        Action::Reload => {
            screen.load().await.map_err(|e| e.to_string())?;
            "Reloaded.".to_string()
        }
        Action::Show => String::new(),
        Action::Help => return Ok(HELP.to_string()),
        Action::Quit => return Ok("Goodbye!".to_string()),
    };

    let view = match (screen.character(), screen.session()) {
        (Some(character), Some(session)) => render_allocation(character, session),
        _ => String::new(),
    };
    if message.is_empty() {
        Ok(view.trim_end().to_string())
    } else {
        Ok(format!("  {message}\n\n{}", view.trim_end()))
    }
}

pub async fn run(ctx: &Context) -> Result<(), String> {
    let mut screen = ctx.status_screen().await?;

    println!("  {} attribute training", "Starting".bold());
    println!("  Type 'help' for commands, 'quit' to exit.\n");
    if let Ok(view) = execute(&mut screen, Action::Show).await {
        println!("{view}\n");
    }

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let action = match parse_action(input) {
            Ok(action) => action,
            Err(e) => {
                println!("{}\n", e.yellow());
                continue;
            }
        };

        match execute(&mut screen, action).await {
            Ok(output) => {
                if !output.is_empty() {
                    println!("{output}\n");
                }
                if action == Action::Quit {
                    break;
                }
            }
            Err(e) => println!("{}\n", e.yellow()),
        }
    }

    if screen.session().is_some_and(|s| s.is_dirty()) {
        println!("  {}", "Uncommitted changes were discarded.".dimmed());
    }
    Ok(())
}

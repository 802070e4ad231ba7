//! Interactive terminal browser (`advdir browse`).
//!
//! Reads one command per line from stdin, feeds it to the [`Session`], runs
//! any resulting fetch against the server, and redraws the table.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::client::{dispatch, DirectoryApi, HttpDirectory};
use crate::config::Config;
use crate::session::{Action, Session, SortKey};
use crate::view;

const HELP: &str = "\
commands:
  search <text>   commit a search (resets to page 1)
  clear           drop the current search
  next | prev     change page
  size <n>        change page size
  sort <column>   sort the current page (first, last, city, degree,
                  specialties, years, phone); repeat to flip direction
  unsort          restore server order
  help            show this message
  quit            exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Act(Action),
    Help,
    Quit,
}

/// Parses one input line.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "search" | "s" => {
            if rest.is_empty() {
                Err("usage: search <text>".to_string())
            } else {
                Ok(Command::Act(Action::Search(rest.to_string())))
            }
        }
        "clear" | "reset" => Ok(Command::Act(Action::ClearSearch)),
        "next" | "n" => Ok(Command::Act(Action::NextPage)),
        "prev" | "p" => Ok(Command::Act(Action::PrevPage)),
        "size" => rest
            .parse::<u32>()
            .map(|n| Command::Act(Action::SetPageSize(n)))
            .map_err(|_| "usage: size <n>".to_string()),
        "sort" => rest
            .parse::<SortKey>()
            .map(|key| Command::Act(Action::Sort(key))),
        "unsort" => Ok(Command::Act(Action::ClearSort)),
        "help" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        "" => Err(String::new()),
        other => Err(format!("unknown command: {} (try 'help')", other)),
    }
}

/// Runs the interactive loop against the server at `base_url` (or the
/// configured `[client].base_url`).
pub async fn run_browse(config: &Config, base_url: Option<String>) -> Result<()> {
    let mut client_config = config.client.clone();
    if let Some(url) = base_url {
        client_config.base_url = url;
    }
    let api = HttpDirectory::new(&client_config)?;

    println!("Browsing {} (type 'help' for commands)", client_config.base_url);
    let mut session = Session::new(config.pagination.page_size_options.clone());
    dispatch(&mut session, &api, Action::Mount).await;
    println!("{}", view::render(&session));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => println!("{}", HELP),
            Ok(Command::Act(action)) => {
                step(&mut session, &api, action).await;
                println!("{}", view::render(&session));
            }
            Err(msg) if msg.is_empty() => {}
            Err(msg) => eprintln!("{}", msg),
        }
    }

    Ok(())
}

async fn step(session: &mut Session, api: &dyn DirectoryApi, action: Action) {
    let fetched = dispatch(session, api, action.clone()).await;
    if !fetched && matches!(action, Action::NextPage | Action::PrevPage) {
        println!("(no more pages in that direction)");
    }
}

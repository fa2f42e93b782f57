//! Interactive session
//!
//! A long-lived loop over stdin lines. The background sync loop runs for the
//! whole session and its notices are printed as they arrive.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use quotebook_core::sync::spawn_sync_loop;
use quotebook_core::transfer::EXPORT_FILE_NAME;
use quotebook_core::{Config, QuoteWidget};

use super::{quote, transfer};
use crate::output::Output;

const HELP: &str = "Commands:
  next                      show another quote
  filter <category>         switch category (\"all\" for every quote)
  add <category> | <text>   add a quote
  categories                list categories
  sync                      fetch quotes from the server now
  export [path]             write quotes to a JSON file
  import <path>             append quotes from a JSON file
  quit                      leave";

/// A parsed input line
#[derive(Debug, PartialEq, Eq)]
enum LineCommand {
    Next,
    Filter(String),
    Add { category: String, text: String },
    Categories,
    Sync,
    Export(PathBuf),
    Import(PathBuf),
    Help,
    Quit,
    Unknown(String),
}

impl LineCommand {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word {
            "" | "next" | "n" => LineCommand::Next,
            "filter" | "f" if !rest.is_empty() => LineCommand::Filter(rest.to_string()),
            "add" | "a" => match rest.split_once('|') {
                Some((category, text)) => LineCommand::Add {
                    category: category.to_string(),
                    text: text.to_string(),
                },
                None => LineCommand::Unknown(line.to_string()),
            },
            "categories" | "c" => LineCommand::Categories,
            "sync" | "s" => LineCommand::Sync,
            "export" if rest.is_empty() => LineCommand::Export(PathBuf::from(EXPORT_FILE_NAME)),
            "export" => LineCommand::Export(PathBuf::from(rest)),
            "import" if !rest.is_empty() => LineCommand::Import(PathBuf::from(rest)),
            "help" | "?" => LineCommand::Help,
            "quit" | "q" | "exit" => LineCommand::Quit,
            _ => LineCommand::Unknown(line.to_string()),
        }
    }
}

/// Run the interactive session until `quit` or end of input
pub async fn run(widget: QuoteWidget, config: &Config, output: &Output) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut widget = widget.with_events(event_tx);

    // The first tick doubles as the startup reconciliation
    let sync_handle = config
        .sync_enabled
        .then(|| spawn_sync_loop(widget.reconciler(), config.sync_interval()));

    let current = match widget.restore_last_viewed() {
        Some(quote) => Some(quote),
        None => widget.show_random().await,
    };
    output.print_quote(current.as_ref());
    output.message("Type \"help\" for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt(output);

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let command = LineCommand::parse(&line);
                if command == LineCommand::Quit {
                    break;
                }
                if let Err(e) = execute(&mut widget, command, output).await {
                    eprintln!("Error: {:#}", e);
                }
            }
            Some(event) = event_rx.recv() => {
                output.notice(event.notice());
            }
        }
    }

    if let Some(handle) = sync_handle {
        handle.shutdown().await;
    }
    debug!("Interactive session ended");

    Ok(())
}

async fn execute(widget: &mut QuoteWidget, command: LineCommand, output: &Output) -> Result<()> {
    match command {
        LineCommand::Next => quote::show(widget, output).await,
        LineCommand::Filter(category) => quote::filter(widget, &category, output).await,
        LineCommand::Add { category, text } => {
            // The push keeps running in the background
            widget.add_quote(&text, &category).await?;
            output.success("New quote added!");
            Ok(())
        }
        LineCommand::Categories => quote::categories(widget, output).await,
        LineCommand::Sync => {
            let merged = widget.sync_quotes().await?;
            if merged.is_empty() {
                output.message("Already up to date");
            }
            Ok(())
        }
        LineCommand::Export(path) => transfer::export(widget, &path, output).await,
        LineCommand::Import(path) => transfer::import(widget, &path, output).await,
        LineCommand::Help => {
            output.message(HELP);
            Ok(())
        }
        LineCommand::Unknown(line) => {
            output.message(&format!("Unknown command: {} (try \"help\")", line));
            Ok(())
        }
        LineCommand::Quit => Ok(()),
    }
}

fn prompt(output: &Output) {
    if output.format == crate::output::OutputFormat::Human {
        print!("> ");
        let _ = std::io::stdout().flush();
    }
}

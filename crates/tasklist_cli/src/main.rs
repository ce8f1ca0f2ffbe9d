//! Interactive front-end for the task list.
//!
//! # Responsibility
//! - Drive the core `Synchronizer` from stdin commands.
//! - Print the `view` screen for every intent outcome, startup refresh included.

mod command;
mod config;
mod view;

use anyhow::{anyhow, Context};
use clap::Parser;
use command::{parse_command, Command, HELP};
use config::CliArgs;
use log::info;
use std::sync::Arc;
use tasklist_core::{
    init_logging, InMemoryTaskStore, SqliteTaskStore, SyncOutcome, Synchronizer, TaskStore,
};
use tokio::io::{AsyncBufReadExt, BufReader};

type SharedStore = Arc<dyn TaskStore>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if let Some(log_dir) = args.log_dir.as_deref() {
        init_logging(args.log_level(), log_dir).map_err(|err| anyhow!(err))?;
    }

    let store: SharedStore = match args.db.as_ref() {
        Some(path) => Arc::new(
            SqliteTaskStore::open(path)
                .with_context(|| format!("failed to open task database `{}`", path.display()))?,
        ),
        None => Arc::new(InMemoryTaskStore::new()),
    };
    info!(
        "event=cli_start module=cli status=ok store={}",
        if args.db.is_some() { "sqlite" } else { "memory" }
    );

    let sync = Synchronizer::new(store);
    let outcome = sync.refresh().await;
    show(&sync, outcome);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => println!("{HELP}"),
            Command::List => println!("{}", view::render(&sync.snapshot())),
            Command::Refresh => show(&sync, sync.refresh().await),
            Command::Add(title) => {
                sync.set_draft(title);
                show(&sync, sync.submit_draft().await);
            }
            Command::Toggle(position) => match sync.tasks().get(position - 1) {
                Some(task) => show(&sync, sync.toggle(task).await),
                None => println!("no task #{position}"),
            },
            Command::Remove(position) => match sync.tasks().get(position - 1) {
                Some(task) => show(&sync, sync.remove(task.id).await),
                None => println!("no task #{position}"),
            },
        }
    }

    Ok(())
}

/// Prints the outcome of one intent. A reported error is not repeated.
fn show(sync: &Synchronizer<SharedStore>, outcome: SyncOutcome) {
    println!("{}", view::report(&outcome, &sync.snapshot()));
    if matches!(outcome, SyncOutcome::Failed(_)) {
        sync.clear_error();
    }
}

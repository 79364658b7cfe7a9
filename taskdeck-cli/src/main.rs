use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskdeck_core::TaskManager;
use taskdeck_store::{SaveFile, default_save_path, load_tasks};

mod menu;

#[derive(Parser, Debug)]
#[command(
    name = "taskdeck",
    version,
    about = "Personal task list with a delimited-text save file"
)]
struct Cli {
    /// Save file path (default: ~/.taskdeck/tasks.csv)
    #[arg(long)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print saved tasks and exit
    List {
        /// Only completed tasks
        #[arg(long, conflicts_with = "pending")]
        completed: bool,

        /// Only pending tasks
        #[arg(long)]
        pending: bool,
    },

    /// Print total/completed/pending counts and exit
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let path = match cli.file {
        Some(p) => p,
        None => default_save_path()?,
    };
    let store = SaveFile::new(path);

    let mut manager = TaskManager::new();
    let summary = load_tasks(&store, &mut manager).await?;
    if !summary.skipped.is_empty() {
        eprintln!(
            "Warning: skipped {} malformed row(s) in {}",
            summary.skipped.len(),
            store.path().display()
        );
    }

    match cli.command {
        Some(Command::List { completed, pending }) => {
            let tasks = if completed {
                manager.completed()
            } else if pending {
                manager.pending()
            } else {
                manager.all()
            };
            if tasks.is_empty() {
                println!("No tasks.");
            }
            for t in &tasks {
                println!("{}", t.summary());
            }
        }

        Some(Command::Stats) => {
            let s = manager.stats();
            println!(
                "Total: {}  Completed: {}  Pending: {}",
                s.total, s.completed, s.pending
            );
        }

        None => {
            menu::run(&store, &mut manager).await?;
        }
    }

    Ok(())
}

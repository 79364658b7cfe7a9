//! Interactive numbered menu. Pure glue around the manager and the store.

use anyhow::Result;
use std::io::{self, Write};

use taskdeck_core::{Task, TaskManager, TaskStats};
use taskdeck_store::{SaveFile, backup, delete_save, load_tasks, save_tasks};

fn prompt(label: &str) -> Result<String> {
    print!("{label}: ");
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

fn prompt_id(label: &str) -> Result<Option<u64>> {
    let s = prompt(label)?;
    match s.parse() {
        Ok(id) => Ok(Some(id)),
        Err(_) => {
            println!("Not a task id: {s}");
            Ok(None)
        }
    }
}

fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks.");
        return;
    }
    for t in tasks {
        println!("{}", t.summary());
    }
}

fn print_stats(stats: TaskStats) {
    println!(
        "Total: {}  Completed: {}  Pending: {}",
        stats.total, stats.completed, stats.pending
    );
}

pub async fn run(store: &SaveFile, manager: &mut TaskManager) -> Result<()> {
    println!("taskdeck — {}", store.path().display());

    loop {
        println!();
        println!(" 1) Add task");
        println!(" 2) List all");
        println!(" 3) List completed");
        println!(" 4) List pending");
        println!(" 5) Update task");
        println!(" 6) Toggle completion");
        println!(" 7) Remove task");
        println!(" 8) Stats");
        println!(" 9) Clear all");
        println!("10) Save");
        println!("11) Reload from disk");
        println!("12) Backup save file");
        println!("13) Delete save file");
        println!(" 0) Save and exit");

        match prompt("Choose")?.as_str() {
            "1" => {
                let title = prompt("Title")?;
                let description = prompt("Description (optional)")?;
                match manager.add(&title, &description) {
                    Ok(task) => println!("Added {}", task.summary()),
                    Err(e) => println!("{e}"),
                }
            }

            "2" => print_tasks(&manager.all()),
            "3" => print_tasks(&manager.completed()),
            "4" => print_tasks(&manager.pending()),

            "5" => {
                if let Some(id) = prompt_id("Task id")? {
                    let title = prompt("New title (blank to keep)")?;
                    let description = prompt("New description (blank to keep)")?;
                    let description = if description.is_empty() {
                        None
                    } else {
                        Some(description.as_str())
                    };
                    if manager.update(id, Some(&title), description) {
                        println!("Updated.");
                    } else {
                        println!("No task with id {id}.");
                    }
                }
            }

            "6" => {
                if let Some(id) = prompt_id("Task id")? {
                    match manager.toggle(id) {
                        Some(true) => println!("Marked completed."),
                        Some(false) => println!("Marked pending."),
                        None => println!("No task with id {id}."),
                    }
                }
            }

            "7" => {
                if let Some(id) = prompt_id("Task id")? {
                    if manager.remove(id) {
                        println!("Removed.");
                    } else {
                        println!("No task with id {id}.");
                    }
                }
            }

            "8" => print_stats(manager.stats()),

            "9" => {
                let confirm = prompt("Type 'yes' to drop every task")?;
                if confirm == "yes" {
                    let n = manager.clear();
                    println!("Cleared {n} task(s).");
                } else {
                    println!("Left alone.");
                }
            }

            "10" => {
                save_tasks(store, manager).await?;
                println!(
                    "Saved {} task(s) to {}",
                    manager.len(),
                    store.path().display()
                );
            }

            "11" => {
                let summary = load_tasks(store, manager).await?;
                println!("Loaded {} task(s).", summary.loaded);
                if !summary.skipped.is_empty() {
                    println!("Skipped {} malformed row(s).", summary.skipped.len());
                }
            }

            "12" => match backup(store).await {
                Ok(dest) => println!("Backup written to {}", dest.display()),
                Err(e) => println!("{e:#}"),
            },

            "13" => {
                if delete_save(store).await? {
                    println!("Deleted {}", store.path().display());
                } else {
                    println!("Nothing to delete.");
                }
            }

            "0" => {
                save_tasks(store, manager).await?;
                println!("Saved. Bye.");
                return Ok(());
            }

            other => println!("Unknown choice: {other}"),
        }
    }
}

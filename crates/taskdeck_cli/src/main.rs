//! taskdeck command-line entry point.
//!
//! # Responsibility
//! - Parse the subcommand surface and map it onto core service calls.
//! - Own the process wiring: logging bootstrap, store open, exit codes.

mod render;

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use taskdeck_core::{
    default_log_level, init_logging, CompleteOutcome, FileStore, NewTask, ReopenOutcome, TaskEdit,
    TaskService, DEFAULT_STORAGE_FILE,
};

const DUE_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Parser)]
#[command(name = "taskdeck", version, about = "Single-user TODO list manager")]
struct Cli {
    /// Storage file path.
    #[arg(long, global = true, default_value = DEFAULT_STORAGE_FILE)]
    file: PathBuf,

    /// Directory for log files.
    #[arg(long, global = true, default_value = ".taskdeck/logs")]
    log_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a new task. Quote multi-word titles.
    Add {
        /// Title of the task.
        title: String,
        /// Date the task is due (YYYY-MM-DD). Requires --duetime.
        #[arg(long, requires = "duetime")]
        duedate: Option<String>,
        /// Time of day the task is due (HH:MM). Requires --duedate.
        #[arg(long, requires = "duedate")]
        duetime: Option<String>,
        /// Mark the task as urgent.
        #[arg(long)]
        urgent: bool,
    },
    /// List tasks.
    List {
        /// Show only completed tasks.
        #[arg(long)]
        completed: bool,
    },
    /// Mark a task as completed.
    Complete {
        /// ID of the task to complete.
        id: String,
    },
    /// Return a completed task to pending.
    Reopen {
        /// ID of the task to reopen.
        id: String,
    },
    /// Remove a task.
    Delete {
        /// ID of the task to remove.
        id: String,
    },
    /// Edit a task's title or priority.
    Edit {
        /// ID of the task to edit.
        id: String,
        /// New title.
        #[arg(long)]
        title: Option<String>,
        /// Set priority to urgent.
        #[arg(long)]
        urgent: bool,
        /// Set priority to not urgent.
        #[arg(long, conflicts_with = "urgent")]
        not_urgent: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(message) = run(cli) {
        eprintln!("{message}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    // Logging is best-effort for a one-shot CLI; a failure to set up log
    // files must not block the user's command.
    let _ = init_logging(default_log_level(), &cli.log_dir);

    let mut store = FileStore::open(&cli.file).map_err(|err| err.to_string())?;
    let mut service = TaskService::new(&mut store);

    match cli.command {
        Command::Add {
            title,
            duedate,
            duetime,
            urgent,
        } => {
            let duedatetime = parse_due(duedate.as_deref(), duetime.as_deref())?;
            let task = service
                .add(NewTask {
                    title,
                    project_name: None,
                    priority: Some(priority_label(urgent).to_string()),
                    duedatetime,
                })
                .map_err(|err| err.to_string())?;
            render::task_added(&task);
        }
        Command::List { completed } => {
            let tasks = service.list(completed);
            render::task_list(&tasks);
        }
        Command::Complete { id } => {
            match service.complete(&id).map_err(|err| err.to_string())? {
                CompleteOutcome::Completed(task) => render::task_completed(&task),
                CompleteOutcome::AlreadyCompleted(task) => render::already_completed(&task),
            }
        }
        Command::Reopen { id } => match service.reopen(&id).map_err(|err| err.to_string())? {
            ReopenOutcome::Reopened(task) => render::task_reopened(&task),
            ReopenOutcome::AlreadyPending(task) => render::already_pending(&task),
        },
        Command::Delete { id } => {
            let task = service.remove(&id).map_err(|err| err.to_string())?;
            render::task_removed(&task);
        }
        Command::Edit {
            id,
            title,
            urgent,
            not_urgent,
        } => {
            let priority = if urgent {
                Some("urgent".to_string())
            } else if not_urgent {
                Some("not urgent".to_string())
            } else {
                None
            };
            let task = service
                .edit(&id, TaskEdit { title, priority })
                .map_err(|err| err.to_string())?;
            render::task_edited(&task);
        }
    }

    Ok(())
}

fn priority_label(urgent: bool) -> &'static str {
    if urgent {
        "urgent"
    } else {
        "not urgent"
    }
}

/// Combines --duedate and --duetime into one timestamp.
///
/// Invalid input fails the command with a clear message; there is no
/// fallback "invalid" display value.
fn parse_due(duedate: Option<&str>, duetime: Option<&str>) -> Result<Option<NaiveDateTime>, String> {
    match (duedate, duetime) {
        (Some(date), Some(time)) => {
            let combined = format!("{date} {time}");
            NaiveDateTime::parse_from_str(&combined, DUE_FORMAT)
                .map(Some)
                .map_err(|_| {
                    format!("invalid due date/time `{combined}`; expected YYYY-MM-DD and HH:MM")
                })
        }
        (None, None) => Ok(None),
        // clap's `requires` keeps these together; guard anyway.
        _ => Err("--duedate and --duetime must be given together".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_due, priority_label};
    use chrono::{NaiveDate, NaiveDateTime};

    #[test]
    fn parse_due_accepts_date_and_time() {
        let parsed = parse_due(Some("2024-01-01"), Some("10:30"))
            .expect("valid input should parse")
            .expect("both parts given should yield a timestamp");
        let expected: NaiveDateTime = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn parse_due_without_input_is_none() {
        assert_eq!(parse_due(None, None), Ok(None));
    }

    #[test]
    fn parse_due_rejects_garbage() {
        let err = parse_due(Some("tomorrow"), Some("noon")).unwrap_err();
        assert!(err.contains("invalid due date/time"));
    }

    #[test]
    fn parse_due_rejects_half_specified_input() {
        assert!(parse_due(Some("2024-01-01"), None).is_err());
    }

    #[test]
    fn priority_label_matches_flags() {
        assert_eq!(priority_label(true), "urgent");
        assert_eq!(priority_label(false), "not urgent");
    }
}

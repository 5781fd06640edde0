//! Human-readable rendering for the terminal.

use chrono::NaiveDateTime;
use taskdeck_core::{Task, TaskStatus};

pub fn task_added(task: &Task) {
    let urgent = task
        .priority
        .as_deref()
        .is_some_and(|priority| priority == "urgent");
    println!(
        "✅ Task added{}: {}",
        if urgent { " [Urgent]" } else { "" },
        task.title
    );
    if let Some(due) = task.duedatetime {
        println!("\tDue: {}", format_datetime(due));
    }
    println!("\nTask ID: {}", task.meta.id);
}

pub fn task_list(tasks: &[&Task]) {
    println!("\n📋 Task List:");
    if tasks.is_empty() {
        println!("  (no tasks)");
        return;
    }
    println!(
        "  {:<36}  {:<9}  {:<16}  {:<10}  {}",
        "ID", "Status", "Due", "Priority", "Title"
    );
    for task in tasks {
        println!(
            "  {:<36}  {:<9}  {:<16}  {:<10}  {}",
            task.meta.id,
            status_label(task.status),
            task.duedatetime.map_or_else(|| "-".to_string(), format_datetime),
            task.priority.as_deref().unwrap_or("-"),
            task.title
        );
    }
}

pub fn task_completed(task: &Task) {
    println!("✅ Task completed: {}", task.title);
}

pub fn already_completed(task: &Task) {
    println!("Task already completed: {}", task.title);
}

pub fn task_reopened(task: &Task) {
    println!("🔁 Task reopened: {}", task.title);
}

pub fn already_pending(task: &Task) {
    println!("Task is already pending: {}", task.title);
}

pub fn task_removed(task: &Task) {
    println!("🗑️ Task deleted: {}", task.title);
}

pub fn task_edited(task: &Task) {
    println!("✏️ Task updated: {}", task.title);
}

fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "pending",
        TaskStatus::Completed => "completed",
    }
}

fn format_datetime(value: NaiveDateTime) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}

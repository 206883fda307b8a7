use std::io::{self, BufRead, Write};

use chrono::{Local, NaiveDate};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::models::{new_task_id, Frequency, OwnerProfile, Priority, Task, TaskPatch};
use crate::storage::Persistence;
use crate::tracker::Tracker;

/// Parses an optional `YYYY-MM-DD` argument, defaulting to `today`.
pub fn parse_date(date: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    match date {
        None => Ok(today),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|_| Error::InvalidDate(s.to_string())),
    }
}

/// Asks a y/N question on `output` and reads the answer from `input`.
/// `force` skips the question. A refusal prints "Aborted." unless `silent`.
pub fn confirm_with(
    question: &str,
    force: bool,
    silent: bool,
    mut input: impl BufRead,
    mut output: impl Write,
) -> Result<bool> {
    if force {
        return Ok(true);
    }
    write!(output, "{} [y/N] ", question)?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    if answer.trim().eq_ignore_ascii_case("y") {
        return Ok(true);
    }
    if !silent {
        writeln!(output, "Aborted.")?;
    }
    Ok(false)
}

fn confirm(question: &str, force: bool, silent: bool) -> Result<bool> {
    confirm_with(question, force, silent, io::stdin().lock(), io::stdout())
}

fn local_time(at: chrono::DateTime<chrono::Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}

fn task_title<S: Persistence, C: Clock>(t: &Tracker<S, C>, task_id: &str) -> String {
    t.task(task_id)
        .map(|task| task.title.clone())
        .unwrap_or_else(|| task_id.to_string())
}

/// Prints the checklist for a day, grouped by time of day.
pub fn cmd_today<S: Persistence, C: Clock>(t: &mut Tracker<S, C>, date: Option<String>) -> Result<()> {
    let date = parse_date(date.as_deref(), t.today())?;
    let checklist = t.checklist(date);
    let pet = &t.profile().pet_name;

    if pet.is_empty() {
        println!("{}", date.format("%A, %B %-d"));
    } else {
        println!("{} for {}", date.format("%A, %B %-d"), pet);
    }
    println!("{}/{} tasks finished", checklist.completed, checklist.total);

    if checklist.groups.is_empty() {
        println!("Nothing scheduled.");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("When").add_attribute(Attribute::Bold),
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Task").add_attribute(Attribute::Bold),
            Cell::new("Priority").add_attribute(Attribute::Bold),
            Cell::new("Reminder").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
            Cell::new("Note").add_attribute(Attribute::Bold),
        ]);

    for group in &checklist.groups {
        for entry in &group.entries {
            let (status, color) = match entry.item.completed_at {
                Some(at) if entry.item.completed => (format!("Done {}", local_time(at)), Color::Green),
                _ => ("Pending".to_string(), Color::Yellow),
            };
            let mut title = entry.task.title.clone();
            for sub in &entry.task.subtasks {
                title.push_str("\n  - ");
                title.push_str(sub);
            }
            table.add_row(vec![
                Cell::new(group.time_of_day),
                Cell::new(&entry.task.id),
                Cell::new(title),
                Cell::new(entry.task.priority),
                Cell::new(entry.task.reminder_time.clone().unwrap_or_default()),
                Cell::new(status).fg(color),
                Cell::new(entry.item.note.clone().unwrap_or_default()),
            ]);
        }
    }

    println!("{table}");
    Ok(())
}

/// Flips completion of one task for a day, optionally setting its note.
pub fn cmd_toggle<S: Persistence, C: Clock>(
    t: &mut Tracker<S, C>,
    task_id: String,
    date: Option<String>,
    note: Option<String>,
    silent: bool,
) -> Result<()> {
    let date = parse_date(date.as_deref(), t.today())?;
    let found = t.toggle_completion(date, &task_id, note)?;
    if !silent {
        if !found {
            eprintln!("Task {} is not on the checklist for {}.", task_id, date);
        } else {
            let done = t
                .stored_log(date)
                .and_then(|log| log.item(&task_id))
                .map(|item| item.completed)
                .unwrap_or(false);
            let state = if done { "done" } else { "not done" };
            println!("{} marked {} for {}.", task_title(t, &task_id), state, date);
        }
    }
    Ok(())
}

/// Marks every task of a day as done.
pub fn cmd_done_all<S: Persistence, C: Clock>(
    t: &mut Tracker<S, C>,
    date: Option<String>,
    silent: bool,
) -> Result<()> {
    let date = parse_date(date.as_deref(), t.today())?;
    t.mark_all_done(date)?;
    if !silent {
        println!("All tasks completed for {}. Nice work!", date);
    }
    Ok(())
}

/// Clears all completions of a day. Asks first unless `force` is set.
pub fn cmd_reset_day<S: Persistence, C: Clock>(
    t: &mut Tracker<S, C>,
    date: Option<String>,
    force: bool,
    silent: bool,
) -> Result<()> {
    let date = parse_date(date.as_deref(), t.today())?;
    if !confirm(&format!("Clear all completed tasks for {}?", date), force, silent)? {
        return Ok(());
    }
    t.reset_day(date)?;
    if !silent {
        println!("Checklist for {} reset.", date);
    }
    Ok(())
}

/// Sets the note of one task for a day.
pub fn cmd_note<S: Persistence, C: Clock>(
    t: &mut Tracker<S, C>,
    task_id: String,
    text: String,
    date: Option<String>,
    silent: bool,
) -> Result<()> {
    let date = parse_date(date.as_deref(), t.today())?;
    let found = t.set_note(date, &task_id, &text)?;
    if !silent {
        if found {
            println!("Note saved for {}.", task_title(t, &task_id));
        } else {
            eprintln!("Task {} is not on the checklist for {}.", task_id, date);
        }
    }
    Ok(())
}

/// Replaces the note of every task of a day. Asks first unless `force` is set.
pub fn cmd_note_all<S: Persistence, C: Clock>(
    t: &mut Tracker<S, C>,
    text: String,
    date: Option<String>,
    force: bool,
    silent: bool,
) -> Result<()> {
    let date = parse_date(date.as_deref(), t.today())?;
    if !confirm(&format!("Replace every note for {}?", date), force, silent)? {
        return Ok(());
    }
    t.set_all_notes(date, &text)?;
    if !silent {
        println!("Note applied to all tasks for {}.", date);
    }
    Ok(())
}

/// Creates a task from a title and optional field values. Returns its id.
pub fn cmd_task_add<S: Persistence, C: Clock>(
    t: &mut Tracker<S, C>,
    title: String,
    fields: TaskPatch,
    silent: bool,
) -> Result<String> {
    if title.trim().is_empty() {
        return Err(Error::InvalidArgument("task title cannot be empty".into()));
    }
    if fields.weekdays.as_ref().is_some_and(|d| d.is_empty()) {
        return Err(Error::InvalidArgument("a task needs at least one weekday".into()));
    }
    let mut task = Task::new(new_task_id(), title);
    task.apply(fields);
    let id = task.id.clone();
    t.add_task(task)?;
    if !silent {
        println!("Task added (id = {})", id);
    }
    Ok(id)
}

/// Lists the routine, newest task first.
pub fn cmd_task_list<S: Persistence, C: Clock>(t: &Tracker<S, C>) {
    if t.tasks().is_empty() {
        println!("No tasks found.");
        return;
    }
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Category").add_attribute(Attribute::Bold),
            Cell::new("When").add_attribute(Attribute::Bold),
            Cell::new("Days").add_attribute(Attribute::Bold),
            Cell::new("Priority").add_attribute(Attribute::Bold),
            Cell::new("Reminder").add_attribute(Attribute::Bold),
            Cell::new("Active").add_attribute(Attribute::Bold),
        ]);

    for task in t.tasks() {
        let days = if task.frequency == Frequency::Daily {
            "Daily".to_string()
        } else {
            task.weekdays.iter().map(|d| d.as_str()).collect::<Vec<_>>().join(", ")
        };
        let priority_color = match task.priority {
            Priority::High => Color::Red,
            Priority::Medium => Color::Yellow,
            Priority::Low => Color::Green,
        };
        table.add_row(vec![
            Cell::new(&task.id),
            Cell::new(&task.title),
            Cell::new(&task.category),
            Cell::new(task.time_of_day),
            Cell::new(days),
            Cell::new(task.priority).fg(priority_color),
            Cell::new(task.reminder_time.clone().unwrap_or_default()),
            Cell::new(if task.is_active { "yes" } else { "no" }),
        ]);
    }
    println!("{table}");
}

/// Applies a partial update to a task.
pub fn cmd_task_edit<S: Persistence, C: Clock>(
    t: &mut Tracker<S, C>,
    id: String,
    fields: TaskPatch,
    silent: bool,
) -> Result<()> {
    if fields.is_empty() {
        if !silent {
            eprintln!("Nothing to change.");
        }
        return Ok(());
    }
    if fields.weekdays.as_ref().is_some_and(|d| d.is_empty()) {
        return Err(Error::InvalidArgument("a task needs at least one weekday".into()));
    }
    let found = t.update_task(&id, fields)?;
    if !silent {
        if found {
            println!("Task {} updated.", id);
        } else {
            eprintln!("Task {} not found.", id);
        }
    }
    Ok(())
}

/// Turns a task on or off for future checklists.
pub fn cmd_task_set_active<S: Persistence, C: Clock>(
    t: &mut Tracker<S, C>,
    id: String,
    active: bool,
    silent: bool,
) -> Result<()> {
    let patch = TaskPatch {
        is_active: Some(active),
        ..TaskPatch::default()
    };
    cmd_task_edit(t, id, patch, silent)
}

/// Deletes a task and its history entries.
pub fn cmd_task_remove<S: Persistence, C: Clock>(
    t: &mut Tracker<S, C>,
    id: String,
    silent: bool,
) -> Result<()> {
    let removed = t.delete_task(&id)?;
    if !silent {
        if removed {
            println!("Task {} removed.", id);
        } else {
            eprintln!("Task {} not found.", id);
        }
    }
    Ok(())
}

/// Prints the history index and the detail of one date.
pub fn cmd_history<S: Persistence, C: Clock>(
    t: &Tracker<S, C>,
    date: Option<String>,
    days: u32,
) -> Result<()> {
    let selected = parse_date(date.as_deref(), t.today())?;

    let mut index = Table::new();
    index
        .load_preset(UTF8_FULL)
        .set_header(vec!["Date", "Done"]);
    for summary in t.history_index(days) {
        let mut date_cell = Cell::new(summary.date.format("%b %-d"));
        if summary.date == selected {
            date_cell = date_cell.add_attribute(Attribute::Bold);
        }
        index.add_row(vec![
            date_cell,
            Cell::new(format!("{}/{}", summary.completed, summary.total)),
        ]);
    }
    println!("{index}");

    let day = t.history(selected);
    println!(
        "{}: {}/{} tasks completed",
        selected, day.summary.completed, day.summary.total
    );
    if !day.summary.has_log {
        println!("No log yet. Complete the day's tasks to see them here.");
        return Ok(());
    }

    let mut detail = Table::new();
    detail
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Task", "Status", "At", "Note"]);
    for item in day.items {
        let (status, color) = if item.completed {
            ("Completed", Color::Green)
        } else {
            ("Missed", Color::Red)
        };
        detail.add_row(vec![
            Cell::new(item.title),
            Cell::new(status).fg(color),
            Cell::new(item.completed_at.map(local_time).unwrap_or_default()),
            Cell::new(item.note.unwrap_or_default()),
        ]);
    }
    println!("{detail}");
    Ok(())
}

/// Prints the weekly series, average, streak and active task count.
pub fn cmd_stats<S: Persistence, C: Clock>(t: &Tracker<S, C>) {
    let series = t.weekly_series();
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Day", "Date", "Done", "Completion"]);
    for day in &series {
        let color = if day.percent >= 100 {
            Color::Green
        } else if day.percent >= 50 {
            Color::Yellow
        } else {
            Color::Red
        };
        table.add_row(vec![
            Cell::new(day.weekday),
            Cell::new(day.date),
            Cell::new(day.completed),
            Cell::new(format!("{}%", day.percent)).fg(color),
        ]);
    }
    println!("{table}");
    println!("Weekly average: {}%", crate::metrics::weekly_average(&series));
    println!("Current streak: {} days", t.streak());
    println!("Active tasks:   {}", t.active_task_count());
}

pub fn cmd_profile_show<S: Persistence, C: Clock>(t: &Tracker<S, C>) {
    let p = t.profile();
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.add_row(vec!["Owner", p.owner_name.as_str()]);
    table.add_row(vec!["Pet", p.pet_name.as_str()]);
    table.add_row(vec!["Breed", p.breed.as_str()]);
    table.add_row(vec!["Age", p.age.as_str()]);
    table.add_row(vec!["Avatar", p.avatar_url.as_deref().unwrap_or("-")]);
    println!("{table}");
}

/// Overwrites the given profile fields and saves the whole profile.
pub fn cmd_profile_set<S: Persistence, C: Clock>(
    t: &mut Tracker<S, C>,
    owner: Option<String>,
    pet: Option<String>,
    breed: Option<String>,
    age: Option<String>,
    avatar: Option<String>,
    silent: bool,
) -> Result<()> {
    let current = t.profile().clone();
    let profile = OwnerProfile {
        owner_name: owner.unwrap_or(current.owner_name),
        pet_name: pet.unwrap_or(current.pet_name),
        breed: breed.unwrap_or(current.breed),
        age: age.unwrap_or(current.age),
        avatar_url: match avatar {
            Some(a) if a.trim().is_empty() => None,
            Some(a) => Some(a),
            None => current.avatar_url,
        },
    };
    t.set_profile(profile)?;
    if !silent {
        println!("Profile saved.");
    }
    Ok(())
}

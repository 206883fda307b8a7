//! # pawtrack
//!
//! A terminal companion for a pet's daily care routine. Keep a list of
//! recurring tasks (walks, meals, grooming, training), tick them off day by
//! day, and look back at history and streaks.
//!
//! ## Usage
//!
//! ```bash
//! # Today's checklist
//! pawtrack today
//!
//! # Tick a task off (again to undo), optionally with a note
//! pawtrack toggle task-1 --note "long route"
//!
//! # Bulk actions
//! pawtrack done-all
//! pawtrack reset-day --force
//! pawtrack note-all "fed early" --force
//!
//! # Manage the routine
//! pawtrack task add "Brush teeth" --time evening --days tue,fri --priority low
//! pawtrack task edit <ID> --frequency daily
//! pawtrack task list
//!
//! # Look back
//! pawtrack history --date 2025-06-01
//! pawtrack stats
//! ```
//!
//! ## Data Storage
//!
//! State is one JSON file in your local data directory
//! (`~/.local/share/pawtrack/state.json` on Linux). Override it with the
//! `PAWTRACK_DB` environment variable. Set `PAWTRACK_NO_SEED=1` to start
//! from an empty routine instead of the sample one.
//!
//! Diagnostics go to stderr and are controlled by `RUST_LOG`.

use std::io;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pawtrack::clock::SystemClock;
use pawtrack::commands::*;
use pawtrack::config::Config;
use pawtrack::error::{Error, Result};
use pawtrack::models::{Frequency, Priority, TaskPatch, TimeOfDay, Weekday};
use pawtrack::storage::JsonFileStore;
use pawtrack::tracker::Tracker;

#[derive(Parser)]
#[command(name = "pawtrack")]
#[command(about = "Daily care routine tracker for your pet", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the checklist for a day
    Today {
        /// Date in YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Mark a task done, or not done if it already is
    Toggle {
        task_id: String,
        #[arg(short, long)]
        date: Option<String>,
        /// Also set the task's note for that day
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Mark every task of a day done
    DoneAll {
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Clear all completions of a day (notes are kept)
    ResetDay {
        #[arg(short, long)]
        date: Option<String>,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Set the note of one task for a day
    Note {
        task_id: String,
        text: String,
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Replace the note of every task of a day
    NoteAll {
        text: String,
        #[arg(short, long)]
        date: Option<String>,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Manage the routine
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Browse past days
    History {
        /// Date to show in detail (default: today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Weekly completion, streak and routine size
    Stats,
    /// Owner and pet details
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
}

/// Field flags shared by `task add` and `task edit`.
#[derive(clap::Args)]
struct TaskFields {
    /// Category, e.g. Exercise or Meals
    #[arg(short, long)]
    category: Option<String>,
    /// morning, afternoon, evening or any
    #[arg(short, long)]
    time: Option<TimeOfDay>,
    /// daily or weekdays
    #[arg(short, long)]
    frequency: Option<Frequency>,
    /// Comma separated days, e.g. mon,wed,fri
    #[arg(short = 'D', long, value_delimiter = ',')]
    days: Vec<Weekday>,
    /// Subtask label (repeatable)
    #[arg(short, long = "subtask")]
    subtasks: Vec<String>,
    #[arg(short, long)]
    notes: Option<String>,
    /// low, medium or high
    #[arg(short, long)]
    priority: Option<Priority>,
    /// Reminder time, e.g. 07:30
    #[arg(short, long)]
    reminder: Option<String>,
}

impl TaskFields {
    fn into_patch(self) -> TaskPatch {
        TaskPatch {
            category: self.category,
            time_of_day: self.time,
            frequency: self.frequency,
            weekdays: (!self.days.is_empty()).then_some(self.days),
            subtasks: (!self.subtasks.is_empty()).then_some(self.subtasks),
            notes: self.notes.map(Some),
            priority: self.priority,
            reminder_time: self.reminder.map(Some),
            ..TaskPatch::default()
        }
    }
}

#[derive(Subcommand)]
enum TaskCommands {
    /// Add a new task
    Add {
        /// Task title (quoted if it has spaces)
        title: String,
        #[command(flatten)]
        fields: TaskFields,
        /// Create the task switched off
        #[arg(long)]
        inactive: bool,
    },
    /// List tasks, newest first
    List,
    /// Edit a task
    Edit {
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: TaskFields,
        /// Remove the task notes
        #[arg(long)]
        clear_notes: bool,
        /// Remove the reminder
        #[arg(long)]
        clear_reminder: bool,
    },
    /// Include a task in future checklists
    Activate { id: String },
    /// Leave a task out of future checklists
    Deactivate { id: String },
    /// Remove a task and its history entries
    Remove { id: String },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Show the profile
    Show,
    /// Update profile fields
    Set {
        #[arg(long)]
        owner: Option<String>,
        #[arg(long)]
        pet: Option<String>,
        #[arg(long)]
        breed: Option<String>,
        #[arg(long)]
        age: Option<String>,
        /// Avatar URL; an empty value removes it
        #[arg(long)]
        avatar: Option<String>,
    },
}

fn init_tracing() {
    // Tracing is opt-in via RUST_LOG; empty or invalid filters are ignored.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn run(command: Commands, config: &Config) -> Result<()> {
    if let Commands::Completions { shell } = &command {
        let shell_enum = match shell.as_str() {
            "bash" => Shell::Bash,
            "zsh" => Shell::Zsh,
            "fish" => Shell::Fish,
            "powershell" => Shell::PowerShell,
            "elvish" => Shell::Elvish,
            _ => {
                return Err(Error::InvalidArgument(format!(
                    "unsupported shell: {}",
                    shell
                )))
            }
        };
        let mut cmd = Cli::command();
        generate(shell_enum, &mut cmd, "pawtrack", &mut io::stdout());
        return Ok(());
    }

    let store = JsonFileStore::new(&config.db_path);
    let mut t = if config.seed_on_first_run {
        Tracker::open_or_seed(store, SystemClock)?
    } else {
        Tracker::open(store, SystemClock)?
    };

    match command {
        Commands::Today { date } => cmd_today(&mut t, date),
        Commands::Toggle { task_id, date, note } => cmd_toggle(&mut t, task_id, date, note, false),
        Commands::DoneAll { date } => cmd_done_all(&mut t, date, false),
        Commands::ResetDay { date, force } => cmd_reset_day(&mut t, date, force, false),
        Commands::Note { task_id, text, date } => cmd_note(&mut t, task_id, text, date, false),
        Commands::NoteAll { text, date, force } => cmd_note_all(&mut t, text, date, force, false),
        Commands::Task { command } => match command {
            TaskCommands::Add { title, fields, inactive } => {
                let mut patch = fields.into_patch();
                if inactive {
                    patch.is_active = Some(false);
                }
                cmd_task_add(&mut t, title, patch, false).map(|_| ())
            }
            TaskCommands::List => {
                cmd_task_list(&t);
                Ok(())
            }
            TaskCommands::Edit { id, title, fields, clear_notes, clear_reminder } => {
                let mut patch = fields.into_patch();
                patch.title = title;
                if clear_notes {
                    patch.notes = Some(None);
                }
                if clear_reminder {
                    patch.reminder_time = Some(None);
                }
                cmd_task_edit(&mut t, id, patch, false)
            }
            TaskCommands::Activate { id } => cmd_task_set_active(&mut t, id, true, false),
            TaskCommands::Deactivate { id } => cmd_task_set_active(&mut t, id, false, false),
            TaskCommands::Remove { id } => cmd_task_remove(&mut t, id, false),
        },
        Commands::History { date } => cmd_history(&t, date, config.history_days),
        Commands::Stats => {
            cmd_stats(&t);
            Ok(())
        }
        Commands::Profile { command } => match command {
            ProfileCommands::Show => {
                cmd_profile_show(&t);
                Ok(())
            }
            ProfileCommands::Set { owner, pet, breed, age, avatar } => {
                cmd_profile_set(&mut t, owner, pet, breed, age, avatar, false)
            }
        },
        Commands::Completions { .. } => Ok(()),
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::from_env();
    let command = cli.command.unwrap_or(Commands::Today { date: None });

    if let Err(e) = run(command, &config) {
        if e.is_warning() {
            eprintln!("Warning: {}", e);
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(e.exit_code());
    }
}

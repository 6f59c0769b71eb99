use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dl", about = concat!("[=] daylist v", env!("CARGO_PKG_VERSION"), " - your day, one list"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different data directory
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,

    /// Act on this day instead of today (YYYY-MM-DD)
    #[arg(short = 'd', long = "date", global = true)]
    pub date: Option<chrono::NaiveDate>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the day's tasks (the default when no command is given)
    List,
    /// Add tasks; commas, semicolons, and newlines separate titles
    Add(AddArgs),
    /// Toggle a task between done and not done
    Done(IndexArg),
    /// Move a task to a new spot within its group
    Move(MoveArgs),
    /// Delete a task (undoable for a short while)
    Rm(IndexArg),
    /// Bring back the last deleted task
    Undo,
    /// Edit a task's title or time
    Edit(EditArgs),
    /// Make a task daily, or stop the habit with --off
    Daily(DailyArgs),
    /// Choose which group lists first
    Sort(SortArgs),
    /// List every day that has tasks
    Days(DaysArgs),
    /// Show one task in full
    Show(IndexArg),
    /// Show the day's progress
    Stats,
}

// ---------------------------------------------------------------------------
// Command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// What to add; quoting is optional
    #[arg(required = true)]
    pub text: Vec<String>,
    /// Time of day for the new tasks (HH:MM); defaults to now
    #[arg(long)]
    pub time: Option<String>,
    /// Create the tasks as daily habits
    #[arg(long)]
    pub daily: bool,
}

#[derive(Args)]
pub struct IndexArg {
    /// Task number as shown by `dl list`
    pub index: usize,
}

#[derive(Args)]
pub struct MoveArgs {
    /// Task number to move
    pub from: usize,
    /// Number of the spot it should take
    pub to: usize,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task number as shown by `dl list`
    pub index: usize,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New time of day (HH:MM)
    #[arg(long)]
    pub time: Option<String>,
}

#[derive(Args)]
pub struct DailyArgs {
    /// Task number as shown by `dl list`
    pub index: usize,
    /// Stop the habit: clears the daily flag on every task with this title
    #[arg(long)]
    pub off: bool,
}

#[derive(Args)]
pub struct DaysArgs {
    /// Show at most this many days, newest first
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct SortArgs {
    /// `completed-first` or `incomplete-first`
    pub order: String,
}

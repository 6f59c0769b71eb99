use std::path::PathBuf;

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime};
use tracing::{debug, warn};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::model::book::Book;
use crate::model::config::Config;
use crate::model::task::TaskId;
use crate::ops::day::{day_progress, distinct_days, resolve_local};
use crate::ops::order::{
    create_tasks, edit_task, reorder, set_group_order, toggle_completed, visible_order,
};
use crate::ops::recur::{materialize_daily, set_daily};
use crate::ops::undo::{delete_task, restore_last};
use crate::parse::parse_titles;
use crate::store::{BookStore, JsonStore};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let now = Local::now();
    let today = now.date_naive();
    let day = cli.date.unwrap_or(today);

    let dir = resolve_data_dir(cli.data_dir.as_deref())?;
    let config = Config::load(&dir).map_err(|e| format!("malformed config.toml: {}", e))?;
    let mut store = JsonStore::open(&dir)?;
    if wake_book(store.book_mut(), now) {
        save_quietly(&mut store);
    }

    match cli.command.unwrap_or(Commands::List) {
        // Read commands
        Commands::List => cmd_list(&store, &config, day, now, json),
        Commands::Days(args) => cmd_days(&store, args, today, json),
        Commands::Show(args) => cmd_show(&store, args, day, json),
        Commands::Stats => cmd_stats(&store, day, now, json),

        // Write commands
        Commands::Add(args) => cmd_add(&mut store, args, day, now),
        Commands::Done(args) => cmd_done(&mut store, args, day),
        Commands::Move(args) => cmd_move(&mut store, args, day),
        Commands::Rm(args) => cmd_rm(&mut store, &config, args, day, now),
        Commands::Undo => cmd_undo(&mut store, now),
        Commands::Edit(args) => cmd_edit(&mut store, args, day),
        Commands::Daily(args) => cmd_daily(&mut store, args, day),
        Commands::Sort(args) => cmd_sort(&mut store, args),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn resolve_data_dir(flag: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match flag {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => dirs::data_dir()
            .map(|base| base.join("daylist"))
            .ok_or_else(|| "no data directory on this platform; pass -C <dir>".into()),
    }
}

/// Bring the book up to date for the wall clock: note the day rollover,
/// clone any daily templates due today, drop an expired undo slot. Returns
/// whether anything changed.
fn wake_book(book: &mut Book, now: DateTime<Local>) -> bool {
    let today = now.date_naive();
    let mut dirty = false;
    if book.last_open_day != Some(today) {
        debug!(%today, "first open of the day");
        book.last_open_day = Some(today);
        dirty = true;
    }
    let completed_first = book.completed_first;
    let cloned = materialize_daily(&mut book.tasks, today, completed_first);
    if !cloned.is_empty() {
        debug!(count = cloned.len(), "materialized daily tasks");
        dirty = true;
    }
    if book.undo.sweep(now) {
        dirty = true;
    }
    dirty
}

/// Persist the book, trading a failed write for a warning. Commands keep
/// their in-process effect either way.
fn save_quietly(store: &mut impl BookStore) {
    if let Err(e) = store.save() {
        warn!(error = %e, "could not save the book");
    }
}

/// Resolve a 1-based number from `list` into the id of the task it names.
fn resolve_index(
    book: &Book,
    day: NaiveDate,
    index: usize,
) -> Result<TaskId, Box<dyn std::error::Error>> {
    let vis = visible_order(&book.tasks, day, book.completed_first);
    if index == 0 || index > vis.len() {
        return Err(format!("no task {} on {}", index, day).into());
    }
    Ok(book.tasks[vis[index - 1]].id)
}

fn parse_time(raw: &str) -> Result<NaiveTime, Box<dyn std::error::Error>> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| format!("invalid time '{}': use HH:MM", raw).into())
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_list(
    store: &impl BookStore,
    config: &Config,
    day: NaiveDate,
    now: DateTime<Local>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let book = store.book();
    let vis = visible_order(&book.tasks, day, book.completed_first);
    let (done, total) = day_progress(&book.tasks, day);
    let undo_armed = book.undo.is_armed(now);

    if json {
        let out = DayJson {
            date: day,
            completed_first: book.completed_first,
            done,
            total,
            undo_armed,
            tasks: vis
                .iter()
                .enumerate()
                .map(|(i, &t)| task_to_json(i + 1, &book.tasks[t]))
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if vis.is_empty() {
        println!("(no tasks for {})", day);
    } else {
        println!("{}", format_day_header(day, done, total));
        for (i, &t) in vis.iter().enumerate() {
            println!("{}", format_task_line(i + 1, &book.tasks[t], config.show_times));
        }
    }
    if undo_armed {
        println!("(dl undo available)");
    }
    Ok(())
}

fn cmd_days(
    store: &impl BookStore,
    args: DaysArgs,
    today: NaiveDate,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let book = store.book();
    let mut days = distinct_days(&book.tasks);
    if let Some(limit) = args.limit {
        days.truncate(limit);
    }

    if json {
        let out: Vec<DaySummaryJson> = days
            .iter()
            .map(|&date| {
                let (done, total) = day_progress(&book.tasks, date);
                DaySummaryJson { date, done, total }
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if days.is_empty() {
        println!("(no tasks yet)");
        return Ok(());
    }
    for date in days {
        let (done, total) = day_progress(&book.tasks, date);
        let marker = if date == today { " (today)" } else { "" };
        println!("{}{}  {}/{} done", date, marker, done, total);
    }
    Ok(())
}

fn cmd_show(
    store: &impl BookStore,
    args: IndexArg,
    day: NaiveDate,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let book = store.book();
    let id = resolve_index(book, day, args.index)?;
    let task = book
        .get(id)
        .ok_or_else(|| format!("no task {} on {}", args.index, day))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(args.index, task))?);
    } else {
        for line in format_task_detail(task) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_stats(
    store: &impl BookStore,
    day: NaiveDate,
    now: DateTime<Local>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let book = store.book();
    let (done, total) = day_progress(&book.tasks, day);
    let daily = book.tasks.iter().filter(|t| t.day() == day && t.daily).count();
    let undo_armed = book.undo.is_armed(now);

    if json {
        let out = StatsJson {
            date: day,
            done,
            total,
            daily,
            undo_armed,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}: {}/{} done, {} daily", day, done, total, daily);
    if undo_armed {
        println!("undo: armed");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_add(
    store: &mut impl BookStore,
    args: AddArgs,
    day: NaiveDate,
    now: DateTime<Local>,
) -> Result<(), Box<dyn std::error::Error>> {
    let titles = parse_titles(&args.text.join(" "));
    let time = args.time.as_deref().map(parse_time).transpose()?;
    let created_at = match time {
        Some(t) => resolve_local(day.and_time(t)),
        None if day == now.date_naive() => now,
        None => resolve_local(day.and_time(now.time())),
    };

    let book = store.book_mut();
    let completed_first = book.completed_first;
    let ids = create_tasks(&mut book.tasks, titles, created_at, completed_first);
    if ids.is_empty() {
        println!("nothing to add");
        return Ok(());
    }
    if args.daily {
        for id in &ids {
            set_daily(&mut book.tasks, *id, true);
        }
    }
    save_quietly(store);
    println!("added {} task(s) to {}", ids.len(), day);
    Ok(())
}

fn cmd_done(
    store: &mut impl BookStore,
    args: IndexArg,
    day: NaiveDate,
) -> Result<(), Box<dyn std::error::Error>> {
    let id = resolve_index(store.book(), day, args.index)?;
    let book = store.book_mut();
    let completed_first = book.completed_first;
    toggle_completed(&mut book.tasks, id, completed_first);

    let task = book
        .get(id)
        .ok_or_else(|| format!("no task {} on {}", args.index, day))?;
    let line = if task.completed {
        format!("done: {}", task.title)
    } else {
        format!("reopened: {}", task.title)
    };
    save_quietly(store);
    println!("{}", line);
    Ok(())
}

fn cmd_move(
    store: &mut impl BookStore,
    args: MoveArgs,
    day: NaiveDate,
) -> Result<(), Box<dyn std::error::Error>> {
    let id = resolve_index(store.book(), day, args.from)?;
    let book = store.book_mut();
    let completed_first = book.completed_first;

    if reorder(
        &mut book.tasks,
        day,
        completed_first,
        args.from - 1,
        1,
        args.to.saturating_sub(1),
    ) {
        // Report where the task actually landed; the destination may have
        // been clamped to its group.
        let landed = visible_order(&book.tasks, day, completed_first)
            .iter()
            .position(|&i| book.tasks[i].id == id)
            .map_or(args.to, |i| i + 1);
        save_quietly(store);
        println!("moved {} → {}", args.from, landed);
    } else {
        println!("no change");
    }
    Ok(())
}

fn cmd_rm(
    store: &mut impl BookStore,
    config: &Config,
    args: IndexArg,
    day: NaiveDate,
    now: DateTime<Local>,
) -> Result<(), Box<dyn std::error::Error>> {
    let id = resolve_index(store.book(), day, args.index)?;
    let ttl = Duration::seconds(config.undo_ttl_secs as i64);

    let book = store.book_mut();
    let title = book
        .get(id)
        .map(|t| t.title.clone())
        .ok_or_else(|| format!("no task {} on {}", args.index, day))?;
    delete_task(book, id, now, ttl);
    save_quietly(store);
    println!("deleted: {}  (dl undo within {}s)", title, config.undo_ttl_secs);
    Ok(())
}

fn cmd_undo(
    store: &mut impl BookStore,
    now: DateTime<Local>,
) -> Result<(), Box<dyn std::error::Error>> {
    let book = store.book_mut();
    match restore_last(book, now) {
        Some(id) => {
            let title = book.get(id).map(|t| t.title.clone()).unwrap_or_default();
            save_quietly(store);
            println!("restored: {}", title);
        }
        None => println!("nothing to undo"),
    }
    Ok(())
}

fn cmd_edit(
    store: &mut impl BookStore,
    args: EditArgs,
    day: NaiveDate,
) -> Result<(), Box<dyn std::error::Error>> {
    if args.title.is_none() && args.time.is_none() {
        return Err("nothing to edit: pass --title and/or --time".into());
    }
    let time = args.time.as_deref().map(parse_time).transpose()?;
    let id = resolve_index(store.book(), day, args.index)?;

    let book = store.book_mut();
    edit_task(&mut book.tasks, id, args.title.as_deref(), time);
    let title = book
        .get(id)
        .map(|t| t.title.clone())
        .ok_or_else(|| format!("no task {} on {}", args.index, day))?;
    save_quietly(store);
    println!("edited: {}", title);
    Ok(())
}

fn cmd_daily(
    store: &mut impl BookStore,
    args: DailyArgs,
    day: NaiveDate,
) -> Result<(), Box<dyn std::error::Error>> {
    let id = resolve_index(store.book(), day, args.index)?;
    let book = store.book_mut();
    set_daily(&mut book.tasks, id, !args.off);
    let title = book
        .get(id)
        .map(|t| t.title.clone())
        .ok_or_else(|| format!("no task {} on {}", args.index, day))?;
    save_quietly(store);
    if args.off {
        println!("habit stopped: {}", title);
    } else {
        println!("daily: {}", title);
    }
    Ok(())
}

fn cmd_sort(
    store: &mut impl BookStore,
    args: SortArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let completed_first = match args.order.as_str() {
        "completed-first" => true,
        "incomplete-first" => false,
        other => {
            return Err(format!(
                "unknown order '{}': use completed-first or incomplete-first",
                other
            )
            .into());
        }
    };
    let book = store.book_mut();
    book.completed_first = completed_first;
    set_group_order(&mut book.tasks, completed_first);
    save_quietly(store);
    println!("sort order → {}", args.order);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Task;
    use crate::store::MemStore;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at(hour: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 14, hour, 0, 0).unwrap()
    }

    fn store_with(titles: &[&str]) -> MemStore {
        let mut book = Book::default();
        for (i, title) in titles.iter().enumerate() {
            let created = at(9) + Duration::minutes(i as i64);
            book.insert(Task::new(title.to_string(), created, (i + 1) as f64));
        }
        MemStore::with_book(book)
    }

    #[test]
    fn failed_saves_do_not_fail_commands() {
        let mut store = store_with(&["A", "B"]);
        store.fail_saves = true;
        let day = at(9).date_naive();

        cmd_done(&mut store, IndexArg { index: 1 }, day).unwrap();
        assert!(store.book().tasks[0].completed);
        assert_eq!(store.saves, 0);
    }

    #[test]
    fn wake_notes_rollover_and_materializes() {
        let mut book = Book::default();
        let mut habit = Task::new("Vitamins".to_string(), at(8) - Duration::days(1), 1.0);
        habit.daily = true;
        book.insert(habit);

        assert!(wake_book(&mut book, at(8)));
        assert_eq!(book.last_open_day, Some(at(8).date_naive()));
        assert_eq!(book.tasks.len(), 2);

        // Nothing left to do later the same day.
        assert!(!wake_book(&mut book, at(9)));
    }

    #[test]
    fn resolve_index_is_one_based_per_day() {
        let store = store_with(&["A", "B"]);
        let day = at(9).date_naive();

        let id = resolve_index(store.book(), day, 2).unwrap();
        assert_eq!(store.book().get(id).map(|t| t.title.as_str()), Some("B"));
        assert!(resolve_index(store.book(), day, 0).is_err());
        assert!(resolve_index(store.book(), day, 3).is_err());
    }
}

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::task::Task;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub index: usize,
    pub id: String,
    pub title: String,
    pub created_at: String,
    pub completed: bool,
    pub position: f64,
    pub daily: bool,
}

#[derive(Serialize)]
pub struct DayJson {
    pub date: NaiveDate,
    pub completed_first: bool,
    pub done: usize,
    pub total: usize,
    pub undo_armed: bool,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct DaySummaryJson {
    pub date: NaiveDate,
    pub done: usize,
    pub total: usize,
}

#[derive(Serialize)]
pub struct StatsJson {
    pub date: NaiveDate,
    pub done: usize,
    pub total: usize,
    pub daily: usize,
    pub undo_armed: bool,
}

pub fn task_to_json(index: usize, task: &Task) -> TaskJson {
    TaskJson {
        index,
        id: task.id.to_string(),
        title: task.title.clone(),
        created_at: task.created_at.to_rfc3339(),
        completed: task.completed,
        position: task.position,
        daily: task.daily,
    }
}

// ---------------------------------------------------------------------------
// Plain output
// ---------------------------------------------------------------------------

/// Format a single task as a one-line summary:
/// ` 3. [x] 09:12  Emails (daily)`
pub fn format_task_line(index: usize, task: &Task, show_time: bool) -> String {
    let checkbox = if task.completed { 'x' } else { ' ' };
    let time = if show_time {
        format!("{}  ", task.created_at.format("%H:%M"))
    } else {
        String::new()
    };
    let daily = if task.daily { " (daily)" } else { "" };
    format!("{:>2}. [{}] {}{}{}", index, checkbox, time, task.title, daily)
}

pub fn format_day_header(day: NaiveDate, done: usize, total: usize) -> String {
    format!("{}  {}/{} done", day.format("%a %Y-%m-%d"), done, total)
}

/// Multi-line detail block for `show`.
pub fn format_task_detail(task: &Task) -> Vec<String> {
    let mut lines = vec![
        format!("title:    {}", task.title),
        format!("id:       {}", task.id),
        format!("day:      {}", task.day()),
        format!("time:     {}", task.created_at.format("%H:%M")),
        format!("position: {}", task.position),
        format!("state:    {}", if task.completed { "done" } else { "open" }),
    ];
    if task.daily {
        lines.push("daily:    yes".to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use pretty_assertions::assert_eq;

    #[test]
    fn task_lines_read_like_a_checklist() {
        let at = Local.with_ymd_and_hms(2026, 3, 14, 9, 12, 0).unwrap();
        let mut task = Task::new("Emails".to_string(), at, 2.0);
        assert_eq!(format_task_line(3, &task, true), " 3. [ ] 09:12  Emails");

        task.completed = true;
        task.daily = true;
        assert_eq!(
            format_task_line(3, &task, false),
            " 3. [x] Emails (daily)"
        );
    }

    #[test]
    fn header_carries_the_progress() {
        let day = Local
            .with_ymd_and_hms(2026, 3, 14, 0, 0, 0)
            .unwrap()
            .date_naive();
        assert_eq!(format_day_header(day, 1, 4), "Sat 2026-03-14  1/4 done");
    }

    #[test]
    fn detail_mentions_daily_only_when_set() {
        let at = Local.with_ymd_and_hms(2026, 3, 14, 9, 12, 0).unwrap();
        let mut task = Task::new("Emails".to_string(), at, 2.0);

        let lines = format_task_detail(&task);
        assert_eq!(lines[0], "title:    Emails");
        assert_eq!(lines.last().map(String::as_str), Some("state:    open"));

        task.daily = true;
        let lines = format_task_detail(&task);
        assert_eq!(lines.last().map(String::as_str), Some("daily:    yes"));
    }
}

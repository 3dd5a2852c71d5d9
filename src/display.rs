//! Date parsing and terminal formatting helpers for the CLI.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::fields::{Priority, TaskFilter};
use crate::task::Task;
use crate::view::{is_overdue, TaskStats};

/// Number of id characters shown in tables.
pub const SHORT_ID_LEN: usize = 8;

/// Parse human-readable due date input relative to `today`.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - "next monday", "this friday", bare weekday names and their short forms
/// - "end of week" / "eow", "end of month" / "eom"
/// - "in 3d", "in 2w", "in 1m"
/// - "YYYY-MM-DD"
///
/// Returns `None` for anything unrecognised or out of the calendar's range.
pub fn parse_due_date(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return add_days(today, 1),
        "yesterday" => return add_days(today, -1),
        "end of week" | "eow" => {
            let until_sunday = 6 - i64::from(today.weekday().num_days_from_monday());
            return add_days(today, until_sunday);
        }
        "end of month" | "eom" => {
            let (year, month) = if today.month() == 12 {
                (today.year() + 1, 1)
            } else {
                (today.year(), today.month() + 1)
            };
            let first_of_next = NaiveDate::from_ymd_opt(year, month, 1)?;
            return first_of_next.pred_opt();
        }
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        let rest = rest.trim();
        // Approximate: 30 days per month
        for (unit, days) in [('d', 1), ('w', 7), ('m', 30)] {
            if let Some(num) = rest.strip_suffix(unit) {
                if let Ok(n) = num.trim().parse::<i64>() {
                    return add_days(today, n.checked_mul(days)?);
                }
            }
        }
    }

    let weekdays = [
        ("monday", 0), ("tuesday", 1), ("wednesday", 2), ("thursday", 3),
        ("friday", 4), ("saturday", 5), ("sunday", 6),
        ("mon", 0), ("tue", 1), ("wed", 2), ("thu", 3),
        ("fri", 4), ("sat", 5), ("sun", 6),
    ];
    let current = i64::from(today.weekday().num_days_from_monday());
    for (name, target) in weekdays {
        let ahead = (target + 7 - current) % 7;
        if s == name || s == format!("this {name}") {
            return add_days(today, ahead);
        }
        if s == format!("next {name}") {
            return add_days(today, ahead + 7);
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::try_days(days)?)
}

/// Parse a due date from the command line.
///
/// Full RFC 3339 timestamps are taken as-is; anything [`parse_due_date`]
/// understands resolves to local midnight of that day.
pub fn parse_due_input(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s.trim()) {
        return Some(ts.with_timezone(&Utc));
    }
    let today = Local::now().date_naive();
    let date = parse_due_date(s, today)?;
    start_of_day(date, |t| {
        Local.from_local_datetime(&t).earliest().map(|d| d.with_timezone(&Utc))
    })
}

/// First valid instant of `date` in a zone, given how that zone maps local
/// times. Midnight can fall in a DST gap, so later times are tried in 15
/// minute steps; UTC midnight is the last resort.
fn start_of_day<F>(date: NaiveDate, to_utc: F) -> Option<DateTime<Utc>>
where
    F: Fn(NaiveDateTime) -> Option<DateTime<Utc>>,
{
    let midnight = date.and_hms_opt(0, 0, 0)?;
    (0..=12)
        .filter_map(|step| midnight.checked_add_signed(Duration::minutes(15 * step)))
        .find_map(&to_utc)
        .or_else(|| Some(Utc.from_utc_datetime(&midnight)))
}

fn local_date(ts: DateTime<Utc>) -> NaiveDate {
    ts.with_timezone(&Local).date_naive()
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<NaiveDate>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(d) => {
            let days = (d - today).num_days();
            match days {
                0 => "today".into(),
                1 => "tomorrow".into(),
                n if n > 1 => format!("in {n}d"),
                n => format!("{}d late", -n),
            }
        }
    }
}

/// Short calendar date, e.g. "Jan 5, 2026".
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// "Just now", "3 hours ago", "2 days ago", or the date once a week has passed.
pub fn format_relative_time(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - ts).num_hours();
    let days = hours / 24;
    if hours < 1 {
        "Just now".into()
    } else if hours < 24 {
        format!("{hours} hour{} ago", if hours == 1 { "" } else { "s" })
    } else if days < 7 {
        format!("{days} day{} ago", if days == 1 { "" } else { "s" })
    } else {
        format_date(local_date(ts))
    }
}

pub fn format_priority(p: Priority) -> &'static str {
    p.label()
}

pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

/// Message shown when the view is empty.
pub fn empty_message(total: usize, filter: TaskFilter) -> String {
    if total == 0 {
        "No tasks yet. Create your first task with `taskflow add`.".into()
    } else {
        match filter {
            TaskFilter::All => "No tasks found. Try adjusting your filters or search terms.".into(),
            f => format!(
                "No {} tasks found. Try adjusting your filters or search terms.",
                f.as_str()
            ),
        }
    }
}

/// One table row, without the trailing newline.
pub fn format_row(t: &Task, now: DateTime<Utc>) -> String {
    let done = if t.completed { "[x]" } else { "[ ]" };
    let due = format_due_relative(t.due_date.map(local_date), local_date(now));
    let due = if is_overdue(t, now) { format!("{due}!") } else { due };
    format!(
        "{:<9} {} {:<7} {:<10} {:<14} {}",
        short_id(&t.id),
        done,
        format_priority(t.priority),
        due,
        truncate(&t.category, 14),
        t.title
    )
}

/// Print tasks as a table.
pub fn print_table(tasks: &[&Task], now: DateTime<Utc>) {
    println!(
        "{:<9} {} {:<7} {:<10} {:<14} {}",
        "ID", "   ", "Pri", "Due", "Category", "Title"
    );
    for t in tasks {
        println!("{}", format_row(t, now));
    }
}

pub fn format_stats(stats: &TaskStats) -> String {
    let mut line = format!(
        "Total: {}  Active: {}  Completed: {}",
        stats.total, stats.active, stats.completed
    );
    if stats.overdue > 0 {
        line.push_str(&format!("  Overdue: {}", stats.overdue));
    }
    line.push_str(&format!("  Progress: {}%", stats.completion_rate));
    line
}

/// Print every field of one task.
pub fn print_task(t: &Task, now: DateTime<Utc>) {
    println!("ID:           {}", t.id);
    println!("Title:        {}", t.title);
    println!("Status:       {}", if t.completed { "Completed" } else { "Active" });
    println!("Priority:     {}", format_priority(t.priority));
    println!("Category:     {}", t.category);
    match t.due_date {
        Some(d) => {
            let overdue = if is_overdue(t, now) { " OVERDUE" } else { "" };
            println!(
                "Due:          {} ({}){overdue}",
                format_date(local_date(d)),
                format_due_relative(Some(local_date(d)), local_date(now))
            );
        }
        None => println!("Due:          -"),
    }
    println!("Created:      {} ({})", t.created_at.to_rfc3339(), format_relative_time(t.created_at, now));
    println!("Updated:      {} ({})", t.updated_at.to_rfc3339(), format_relative_time(t.updated_at, now));
    println!("Description:\n{}", t.description.as_deref().unwrap_or("-"));
}

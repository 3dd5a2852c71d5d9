//! Derived views over the task collection.
//!
//! Everything here is pure: functions take borrowed tasks and return new
//! lists or counts without touching the collection they were given.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::fields::TaskFilter;
use crate::task::Task;

/// Keep tasks whose title, description or category contains `term`,
/// ignoring case. A blank term keeps everything in its original order.
pub fn filter_by_search<'a, I>(tasks: I, term: &str) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let term = term.trim();
    if term.is_empty() {
        return tasks.into_iter().collect();
    }
    let term = term.to_lowercase();
    tasks
        .into_iter()
        .filter(|t| {
            t.title.to_lowercase().contains(&term)
                || t.description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&term))
                || t.category.to_lowercase().contains(&term)
        })
        .collect()
}

/// Distinct categories, sorted ascending.
pub fn unique_categories<'a, I>(tasks: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks
        .into_iter()
        .map(|t| t.category.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Order by priority, urgent first. The sort is stable: tasks of equal
/// priority keep their relative input order.
pub fn sort_by_priority(mut tasks: Vec<&Task>) -> Vec<&Task> {
    tasks.sort_by_key(|t| t.priority.rank());
    tasks
}

/// An incomplete task whose due date lies strictly before `now`.
pub fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    match task.due_date {
        Some(due) if !task.completed => now > due,
        _ => false,
    }
}

/// Counts over a task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    pub overdue: usize,
    /// Whole percentage of completed tasks, rounded half up.
    pub completion_rate: u8,
}

pub fn compute_stats<'a, I>(tasks: I, now: DateTime<Utc>) -> TaskStats
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut stats = TaskStats::default();
    for task in tasks {
        stats.total += 1;
        if task.completed {
            stats.completed += 1;
        }
        if is_overdue(task, now) {
            stats.overdue += 1;
        }
    }
    stats.active = stats.total - stats.completed;
    stats.completion_rate = completion_rate(stats.completed, stats.total);
    stats
}

/// `round(100 * completed / total)` with halves rounding up, in integers.
fn completion_rate(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    // floor(100c/t + 1/2) == floor((200c + t) / 2t)
    let rate = (200 * completed + total) / (2 * total);
    u8::try_from(rate.min(100)).unwrap_or(100)
}

/// The criteria the derived view is computed from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewCriteria {
    pub filter: TaskFilter,
    pub search_term: String,
    pub selected_category: Option<String>,
}

/// Apply the full pipeline: search, category, completion status, then
/// priority sort. Sorting always runs last.
pub fn derive_view<'a>(tasks: &'a [Task], criteria: &ViewCriteria) -> Vec<&'a Task> {
    let searched = filter_by_search(tasks, &criteria.search_term);
    let filtered: Vec<&Task> = searched
        .into_iter()
        .filter(|t| {
            criteria
                .selected_category
                .as_deref()
                .map_or(true, |c| t.category == c)
        })
        .filter(|t| criteria.filter.matches(t))
        .collect();
    sort_by_priority(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Priority;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn task(id: &str, title: &str, priority: Priority, category: &str) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            completed: false,
            priority,
            category: category.to_string(),
            created_at: now(),
            updated_at: now(),
            due_date: None,
        }
    }

    fn ids(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.id.clone()).collect()
    }

    fn sample() -> Vec<Task> {
        let mut report = task("1", "Quarterly report", Priority::High, "Work");
        report.description = Some("Numbers for the BOARD".into());
        let mut milk = task("2", "Buy milk", Priority::Low, "Shopping");
        milk.completed = true;
        let gym = task("3", "Gym", Priority::Urgent, "Personal");
        let standup = task("4", "Standup notes", Priority::High, "Work");
        vec![report, milk, gym, standup]
    }

    #[test]
    fn test_search_matches_title_description_and_category() {
        let tasks = sample();
        assert_eq!(ids(&filter_by_search(&tasks, "MILK")), vec!["2"]);
        assert_eq!(ids(&filter_by_search(&tasks, "board")), vec!["1"]);
        assert_eq!(ids(&filter_by_search(&tasks, "work")), vec!["1", "4"]);
        assert_eq!(ids(&filter_by_search(&tasks, "  gym  ")), vec!["3"]);
        assert!(filter_by_search(&tasks, "nothing").is_empty());
    }

    #[test]
    fn test_blank_search_is_identity() {
        let tasks = sample();
        assert_eq!(ids(&filter_by_search(&tasks, "   ")), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_unique_categories_sorted() {
        let tasks = sample();
        assert_eq!(unique_categories(&tasks), vec!["Personal", "Shopping", "Work"]);
        assert!(unique_categories(&Vec::<Task>::new()).is_empty());
    }

    #[test]
    fn test_sort_by_priority_urgent_first() {
        let tasks = vec![
            task("a", "a", Priority::Low, "x"),
            task("b", "b", Priority::Urgent, "x"),
        ];
        let sorted = sort_by_priority(tasks.iter().collect());
        assert_eq!(ids(&sorted), vec!["b", "a"]);
    }

    #[test]
    fn test_overdue_rules() {
        let mut t = task("1", "Pay rent", Priority::High, "Home");
        assert!(!is_overdue(&t, now()));

        t.due_date = Some(now() - Duration::days(1));
        assert!(is_overdue(&t, now()));

        t.completed = true;
        assert!(!is_overdue(&t, now()));

        t.completed = false;
        t.due_date = Some(now());
        assert!(!is_overdue(&t, now()), "equal timestamps are not overdue");
    }

    #[test]
    fn test_stats() {
        let mut tasks = sample();
        tasks[2].due_date = Some(now() - Duration::hours(1));
        let stats = compute_stats(&tasks, now());
        assert_eq!(
            stats,
            TaskStats {
                total: 4,
                completed: 1,
                active: 3,
                overdue: 1,
                completion_rate: 25,
            }
        );
        assert_eq!(compute_stats(&Vec::<Task>::new(), now()), TaskStats::default());
    }

    #[test]
    fn test_completion_rate_rounds_half_up() {
        assert_eq!(completion_rate(1, 8), 13); // 12.5
        assert_eq!(completion_rate(1, 3), 33);
        assert_eq!(completion_rate(2, 3), 67);
        assert_eq!(completion_rate(3, 3), 100);
        assert_eq!(completion_rate(0, 5), 0);
    }

    #[test]
    fn test_derive_view_pipeline() {
        let tasks = sample();
        let mut criteria = ViewCriteria::default();
        assert_eq!(ids(&derive_view(&tasks, &criteria)), vec!["3", "1", "4", "2"]);

        criteria.filter = TaskFilter::Active;
        assert_eq!(ids(&derive_view(&tasks, &criteria)), vec!["3", "1", "4"]);

        criteria.selected_category = Some("Work".into());
        assert_eq!(ids(&derive_view(&tasks, &criteria)), vec!["1", "4"]);

        criteria.search_term = "notes".into();
        assert_eq!(ids(&derive_view(&tasks, &criteria)), vec!["4"]);

        criteria = ViewCriteria {
            filter: TaskFilter::Completed,
            ..Default::default()
        };
        assert_eq!(ids(&derive_view(&tasks, &criteria)), vec!["2"]);
    }

    #[test]
    fn test_category_filter_is_exact() {
        let tasks = sample();
        let criteria = ViewCriteria {
            selected_category: Some("work".into()),
            ..Default::default()
        };
        assert!(derive_view(&tasks, &criteria).is_empty());
    }

    fn arb_priority() -> impl Strategy<Value = Priority> {
        prop_oneof![
            Just(Priority::Low),
            Just(Priority::Medium),
            Just(Priority::High),
            Just(Priority::Urgent),
        ]
    }

    fn arb_tasks() -> impl Strategy<Value = Vec<Task>> {
        prop::collection::vec(
            (arb_priority(), any::<bool>(), prop::option::of(-48i64..48), "[a-z ]{0,12}"),
            0..24,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (priority, completed, due_offset, title))| {
                    let mut t = task(&i.to_string(), &title, priority, "cat");
                    t.completed = completed;
                    t.due_date = due_offset.map(|h| now() + Duration::hours(h));
                    t
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_sort_is_stable(tasks in arb_tasks()) {
            let sorted = sort_by_priority(tasks.iter().collect());
            prop_assert_eq!(sorted.len(), tasks.len());
            for pair in sorted.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                prop_assert!(a.priority.rank() <= b.priority.rank());
                if a.priority == b.priority {
                    let ia: usize = a.id.parse().unwrap();
                    let ib: usize = b.id.parse().unwrap();
                    prop_assert!(ia < ib);
                }
            }
        }

        #[test]
        fn prop_empty_search_keeps_everything(tasks in arb_tasks()) {
            let out = filter_by_search(&tasks, "");
            prop_assert_eq!(out.len(), tasks.len());
            for (a, b) in out.iter().zip(tasks.iter()) {
                prop_assert_eq!(*a, b);
            }
        }

        #[test]
        fn prop_stats_are_consistent(tasks in arb_tasks()) {
            let stats = compute_stats(&tasks, now());
            prop_assert_eq!(stats.active + stats.completed, stats.total);
            prop_assert!(stats.completion_rate <= 100);
            prop_assert!(stats.overdue <= stats.active);
            if stats.total == 0 {
                prop_assert_eq!(stats.completion_rate, 0);
            }
        }

        #[test]
        fn prop_completed_is_never_overdue(tasks in arb_tasks()) {
            for t in tasks.iter().filter(|t| t.completed) {
                prop_assert!(!is_overdue(t, now()));
            }
        }
    }
}

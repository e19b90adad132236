//! Derived task view: filter, sort and count.
//!
//! Pure functions over a task slice and the current settings. Nothing here
//! touches the store.

use std::cmp::Ordering;

use feruca::Collator;
use serde::Serialize;

use crate::settings::{AppSettings, SortBy};
use crate::task::Task;

/// Aggregate counters over the full, unfiltered collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TaskCounts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub completion_rate_percent: u32,
}

impl TaskCounts {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|task| task.completed).count();
        Self {
            total,
            completed,
            pending: total - completed,
            completion_rate_percent: completion_rate(completed, total),
        }
    }
}

/// What the presentation layer renders
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TaskView {
    pub display: Vec<Task>,
    pub counts: TaskCounts,
}

/// Build the display list and counters for `tasks` under `settings`
pub fn build_view(tasks: &[Task], settings: &AppSettings) -> TaskView {
    let mut display: Vec<Task> = tasks
        .iter()
        .filter(|task| settings.show_completed_tasks || !task.completed)
        .cloned()
        .collect();
    sort_tasks(&mut display, settings.sort_by);

    TaskView {
        display,
        counts: TaskCounts::from_tasks(tasks),
    }
}

/// Stable sort in place; ties keep their relative order
pub fn sort_tasks(tasks: &mut [Task], sort_by: SortBy) {
    match sort_by {
        SortBy::Manual => {}
        SortBy::Deadline => tasks.sort_by(|left, right| match (left.deadline, right.deadline) {
            (Some(l), Some(r)) => l.cmp(&r),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }),
        SortBy::Alphabetical => {
            let mut collator = Collator::default();
            tasks.sort_by(|left, right| {
                collator.collate(left.title.as_str(), right.title.as_str())
            })
        }
        SortBy::Newest => tasks.sort_by(|left, right| right.created_at.cmp(&left.created_at)),
        SortBy::Oldest => tasks.sort_by(|left, right| left.created_at.cmp(&right.created_at)),
    }
}

/// Locale-aware string ordering (Unicode Collation Algorithm, CLDR root).
///
/// Accents and case only break ties between otherwise equal letters, so
/// `"éclair"` sorts between `"apple"` and `"zebra"` and `"apple"` precedes
/// `"Apple"`.
pub fn locale_cmp(left: &str, right: &str) -> Ordering {
    Collator::default().collate(left, right)
}

/// `round(completed / total * 100)`, or 0 for an empty collection
pub fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(
        id: &str,
        title: &str,
        completed: bool,
        created_at: i64,
        deadline: Option<i64>,
    ) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            completed,
            created_at,
            deadline,
        }
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|task| task.id.as_str()).collect()
    }

    fn settings(sort_by: SortBy, show_completed_tasks: bool) -> AppSettings {
        AppSettings {
            sort_by,
            show_completed_tasks,
            ..AppSettings::default()
        }
    }

    #[test]
    fn test_hidden_completed_with_alphabetical() {
        let tasks = vec![
            task("b", "B", false, 100, None),
            task("a", "A", true, 200, None),
        ];
        let view = build_view(&tasks, &settings(SortBy::Alphabetical, false));

        assert_eq!(ids(&view.display), vec!["b"]);
        assert_eq!(
            view.counts,
            TaskCounts {
                total: 2,
                completed: 1,
                pending: 1,
                completion_rate_percent: 50,
            }
        );
    }

    #[test]
    fn test_deadline_sort_puts_undated_last() {
        let tasks = vec![
            task("x", "x", false, 1, Some(300)),
            task("n1", "n1", false, 2, None),
            task("y", "y", false, 3, Some(100)),
            task("n2", "n2", false, 4, None),
        ];
        let view = build_view(&tasks, &settings(SortBy::Deadline, true));
        assert_eq!(ids(&view.display), vec!["y", "x", "n1", "n2"]);
    }

    #[test]
    fn test_manual_keeps_collection_order() {
        let tasks = vec![
            task("3", "c", false, 3, None),
            task("1", "a", true, 1, None),
            task("2", "b", false, 2, None),
        ];
        let view = build_view(&tasks, &settings(SortBy::Manual, true));
        assert_eq!(ids(&view.display), vec!["3", "1", "2"]);

        let hidden = build_view(&tasks, &settings(SortBy::Manual, false));
        assert_eq!(ids(&hidden.display), vec!["3", "2"]);
        assert_eq!(hidden.counts.total, 3);
    }

    #[test]
    fn test_newest_and_oldest_are_stable() {
        let tasks = vec![
            task("first", "a", false, 50, None),
            task("second", "b", false, 50, None),
            task("older", "c", false, 10, None),
            task("newer", "d", false, 90, None),
        ];

        let newest = build_view(&tasks, &settings(SortBy::Newest, true));
        assert_eq!(ids(&newest.display), vec!["newer", "first", "second", "older"]);

        let oldest = build_view(&tasks, &settings(SortBy::Oldest, true));
        assert_eq!(ids(&oldest.display), vec!["older", "first", "second", "newer"]);
    }

    #[test]
    fn test_locale_cmp() {
        assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_cmp("Zebra", "apple"), Ordering::Greater);
        assert_eq!(locale_cmp("apple", "Apple"), Ordering::Less);
        assert_eq!(locale_cmp("same", "same"), Ordering::Equal);
        assert_eq!(locale_cmp("ab", "abc"), Ordering::Less);
    }

    #[test]
    fn test_locale_cmp_accents() {
        let mut titles = vec!["zebra", "éclair", "apple", "Émile"];
        titles.sort_by(|left, right| locale_cmp(left, right));
        assert_eq!(titles, vec!["apple", "éclair", "Émile", "zebra"]);

        assert_eq!(locale_cmp("resume", "résumé"), Ordering::Less);
        assert_eq!(locale_cmp("résumé", "rester"), Ordering::Greater);
    }

    #[test]
    fn test_alphabetical_sorts_accented_titles() {
        let tasks = vec![
            task("z", "zebra", false, 1, None),
            task("e", "éclair", false, 2, None),
            task("a", "apple", false, 3, None),
            task("E", "Émile", false, 4, None),
        ];
        let view = build_view(&tasks, &settings(SortBy::Alphabetical, true));
        assert_eq!(ids(&view.display), vec!["a", "e", "E", "z"]);
    }

    #[test]
    fn test_alphabetical_ignores_case() {
        let tasks = vec![
            task("1", "banana", false, 1, None),
            task("2", "Apple", false, 2, None),
            task("3", "cherry", false, 3, None),
        ];
        let view = build_view(&tasks, &settings(SortBy::Alphabetical, true));
        assert_eq!(ids(&view.display), vec!["2", "1", "3"]);
    }

    #[test]
    fn test_completion_rate_rounding() {
        assert_eq!(completion_rate(0, 0), 0);
        assert_eq!(completion_rate(1, 3), 33);
        assert_eq!(completion_rate(2, 3), 67);
        assert_eq!(completion_rate(3, 3), 100);
        assert_eq!(TaskCounts::from_tasks(&[]), TaskCounts::default());
    }
}

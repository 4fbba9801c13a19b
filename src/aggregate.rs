use crate::api::HabitApi;
use crate::dates::{matches_date_key, DateKey};
use crate::models::{Completion, Habit, Statistics};
use futures::future::join_all;
use serde::Serialize;
use std::collections::HashSet;
use tracing::warn;

/// Totals shown at the top of the statistics screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Totals {
    pub total_completions: u64,
    pub max_streak: u32,
    pub active_habits_count: usize,
}

pub fn is_completed_on(completions: &[Completion], day: DateKey) -> bool {
    completions
        .iter()
        .any(|completion| matches_date_key(&completion.completed_at, day))
}

pub fn aggregate<'a, I>(per_habit: I) -> Totals
where
    I: IntoIterator<Item = &'a (Habit, Statistics)>,
{
    per_habit
        .into_iter()
        .fold(Totals::default(), |acc, (_, stats)| Totals {
            total_completions: acc.total_completions.saturating_add(stats.total_completions),
            max_streak: acc.max_streak.max(stats.longest_streak),
            active_habits_count: acc.active_habits_count + usize::from(stats.current_streak > 0),
        })
}

/// Fetches statistics for every habit at once and keeps the ones that arrived.
///
/// Output follows the order of `habits`. A failed habit is left out.
pub async fn collect_statistics<A>(api: &A, habits: Vec<Habit>) -> Vec<(Habit, Statistics)>
where
    A: HabitApi + ?Sized,
{
    let requests = habits.into_iter().map(|habit| async move {
        match api.get_statistics(&habit.id).await {
            Ok(stats) => Some((habit, stats)),
            Err(err) => {
                warn!(habit_id = %habit.id, "failed to load statistics: {err}");
                None
            }
        }
    });

    join_all(requests).await.into_iter().flatten().collect()
}

/// Ids of the habits with a completion on `day`.
///
/// Habits whose completions cannot be fetched are treated as not completed.
pub async fn completed_ids_on<A>(api: &A, habits: &[Habit], day: DateKey) -> HashSet<String>
where
    A: HabitApi + ?Sized,
{
    let requests = habits.iter().map(|habit| async move {
        match api.list_completions(&habit.id).await {
            Ok(completions) => is_completed_on(&completions, day).then(|| habit.id.clone()),
            Err(err) => {
                warn!(habit_id = %habit.id, "failed to load completions: {err}");
                None
            }
        }
    });

    join_all(requests).await.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{habit, FakeApi};

    fn stats(total: u64, current: u32, longest: u32) -> Statistics {
        Statistics {
            total_completions: total,
            current_streak: current,
            longest_streak: longest,
            completions: Vec::new(),
        }
    }

    fn completion(at: &str) -> Completion {
        Completion {
            id: format!("c-{at}"),
            habit_id: "h1".into(),
            completed_at: at.into(),
            notes: None,
            created_at: at.into(),
        }
    }

    #[test]
    fn aggregate_of_nothing_is_zero() {
        let empty: Vec<(Habit, Statistics)> = Vec::new();
        assert_eq!(aggregate(&empty), Totals::default());
    }

    #[test]
    fn aggregate_sums_and_counts() {
        let entries = vec![
            (habit("h1", "Read"), stats(5, 2, 5)),
            (habit("h2", "Run"), stats(0, 0, 0)),
        ];
        assert_eq!(
            aggregate(&entries),
            Totals {
                total_completions: 5,
                max_streak: 5,
                active_habits_count: 1,
            }
        );
    }

    #[test]
    fn aggregate_takes_max_of_longest_streaks() {
        let entries = vec![
            (habit("h1", "Read"), stats(12, 1, 4)),
            (habit("h2", "Run"), stats(30, 3, 9)),
            (habit("h3", "Stretch"), stats(2, 0, 2)),
        ];
        let totals = aggregate(&entries);
        assert_eq!(totals.total_completions, 44);
        assert_eq!(totals.max_streak, 9);
        assert_eq!(totals.active_habits_count, 2);
    }

    #[test]
    fn completed_on_scans_unordered_list() {
        let day = DateKey::parse("2025-11-17").unwrap();
        let completions = vec![
            completion("2025-11-19T07:00:00Z"),
            completion("2025-11-17T00:00:00Z"),
            completion("2025-11-10"),
        ];
        assert!(is_completed_on(&completions, day));
        assert!(!is_completed_on(&completions, DateKey::parse("2025-11-18").unwrap()));
        assert!(!is_completed_on(&[], day));
    }

    #[tokio::test]
    async fn one_failing_statistics_fetch_does_not_drop_the_rest() {
        let api = FakeApi::default();
        let h1 = api.insert_habit("Read");
        let h2 = api.insert_habit("Run");
        let h3 = api.insert_habit("Write");
        api.set_statistics(&h1.id, stats(5, 2, 5));
        api.set_statistics(&h3.id, stats(1, 1, 1));
        api.fail_statistics(&h2.id);

        let collected = collect_statistics(&api, vec![h1.clone(), h2, h3.clone()]).await;
        let ids: Vec<&str> = collected.iter().map(|(h, _)| h.id.as_str()).collect();
        assert_eq!(ids, vec![h1.id.as_str(), h3.id.as_str()]);

        let totals = aggregate(&collected);
        assert_eq!(totals.total_completions, 6);
        assert_eq!(totals.active_habits_count, 2);
    }

    #[tokio::test]
    async fn completed_ids_skip_failing_habits() {
        let api = FakeApi::default();
        let day = DateKey::parse("2025-11-17").unwrap();
        let h1 = api.insert_habit("Read");
        let h2 = api.insert_habit("Run");
        let h3 = api.insert_habit("Write");
        api.complete_habit(&h1.id, Some(day)).await.unwrap();
        api.complete_habit(&h2.id, Some(day)).await.unwrap();
        api.fail_completions(&h2.id);

        let ids = completed_ids_on(&api, &[h1.clone(), h2, h3], day).await;
        assert_eq!(ids, HashSet::from([h1.id]));
    }
}

//! Command handlers behind the `habits` binary. Each one returns the text
//! to print so it can be exercised without a terminal.

use crate::aggregate::aggregate;
use crate::api::HabitApi;
use crate::app::{load_day, load_statistics, HabitsController};
use crate::dates::{self, DateKey, Locale};
use crate::errors::{ClientError, Result};
use crate::models::{CreateHabitRequest, UpdateHabitRequest};
use crate::state::{
    HabitsScreen, ToggleOutcome, NOTICE_ALREADY_COMPLETED, NOTICE_COMPLETED, NOTICE_REMOVED,
};
use crate::ui::{render_day, render_statistics};
use std::sync::Arc;
use tracing::info;

pub async fn list<A>(api: &A, date: Option<DateKey>, locale: Locale) -> Result<String>
where
    A: HabitApi + ?Sized,
{
    let mut screen = HabitsScreen::new(date.unwrap_or_else(dates::today));
    let ticket = screen.begin_load();
    let load = load_day(api, ticket.date).await?;
    screen.finish_load(ticket, Ok(load));
    Ok(render_day(&screen, locale))
}

pub async fn add<A>(api: &A, request: CreateHabitRequest) -> Result<String>
where
    A: HabitApi + ?Sized,
{
    let habit = api.create_habit(request).await?;
    info!(habit_id = %habit.id, "habit created");
    Ok(format!("Habit created (id = {})", habit.id))
}

/// Marks a habit complete. Without a date the server picks today.
pub async fn done<A>(api: &A, habit_id: &str, date: Option<DateKey>) -> Result<String>
where
    A: HabitApi + ?Sized,
{
    match api.complete_habit(habit_id, date).await {
        Ok(()) => Ok(NOTICE_COMPLETED.to_string()),
        Err(ClientError::AlreadyCompleted) => Ok(NOTICE_ALREADY_COMPLETED.to_string()),
        Err(err) => Err(err),
    }
}

pub async fn undo<A>(api: &A, habit_id: &str, date: Option<DateKey>) -> Result<String>
where
    A: HabitApi + ?Sized,
{
    api.remove_completion(habit_id, date.unwrap_or_else(dates::today))
        .await?;
    Ok(NOTICE_REMOVED.to_string())
}

/// Toggles like the habits screen does: completed on that day means the
/// completion is removed, otherwise one is recorded.
pub async fn toggle<A>(api: Arc<A>, habit_id: &str, date: Option<DateKey>) -> Result<String>
where
    A: HabitApi + ?Sized,
{
    let mut screen = HabitsScreen::new(date.unwrap_or_else(dates::today));
    let ticket = screen.begin_load();
    let load = load_day(api.as_ref(), ticket.date).await?;
    if !load.habits.iter().any(|habit| habit.id == habit_id) {
        return Err(ClientError::NotFound(format!("habit {habit_id} not found")));
    }
    screen.finish_load(ticket, Ok(load));

    let mut controller = HabitsController::new(api, screen);
    let outcome = controller.toggle(habit_id).await?;
    let message = controller.screen_mut().take_notice().unwrap_or_default();
    Ok(match outcome {
        ToggleOutcome::Busy => format!("habit {habit_id} is already being updated"),
        _ => message,
    })
}

pub async fn show<A>(api: &A, habit_id: &str) -> Result<String>
where
    A: HabitApi + ?Sized,
{
    let habit = api.get_habit(habit_id).await?;
    let stats = api.get_statistics(habit_id).await?;
    let mut out = format!("{} ({}, {})\n", habit.name, habit.frequency, habit.color);
    if let Some(subtitle) = habit.subtitle() {
        out.push_str(&format!("{subtitle}\n"));
    }
    out.push_str(&format!(
        "total {} / current streak {} / longest streak {}\n",
        stats.total_completions, stats.current_streak, stats.longest_streak
    ));
    Ok(out)
}

pub async fn edit<A>(api: &A, habit_id: &str, request: UpdateHabitRequest) -> Result<String>
where
    A: HabitApi + ?Sized,
{
    if request == UpdateHabitRequest::default() {
        return Err(ClientError::validation("nothing to update"));
    }
    if request.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
        return Err(ClientError::validation("habit name is required"));
    }
    let habit = api.update_habit(habit_id, request).await?;
    Ok(format!("Habit {} updated", habit.id))
}

pub async fn remove<A>(api: &A, habit_id: &str) -> Result<String>
where
    A: HabitApi + ?Sized,
{
    api.delete_habit(habit_id).await?;
    Ok(format!("Habit {habit_id} removed"))
}

pub async fn stats<A>(api: &A) -> Result<String>
where
    A: HabitApi + ?Sized,
{
    let entries = load_statistics(api).await?;
    Ok(render_statistics(&entries, aggregate(&entries)))
}

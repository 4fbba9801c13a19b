use crate::aggregate::{collect_statistics, completed_ids_on, is_completed_on};
use crate::api::HabitApi;
use crate::dates::DateKey;
use crate::errors::Result;
use crate::models::{CreateHabitRequest, Habit, Statistics};
use crate::state::{
    DayLoad, HabitsScreen, LoadTicket, StatisticsScreen, ToggleAction, ToggleOutcome,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Habits and the subset completed on `date`.
pub async fn load_day<A>(api: &A, date: DateKey) -> Result<DayLoad>
where
    A: HabitApi + ?Sized,
{
    let habits = api.list_habits().await?;
    let completed = completed_ids_on(api, &habits, date).await;
    info!(%date, habits = habits.len(), completed = completed.len(), "loaded day");
    Ok(DayLoad { habits, completed })
}

/// Every habit paired with its statistics, minus the ones that failed.
pub async fn load_statistics<A>(api: &A) -> Result<Vec<(Habit, Statistics)>>
where
    A: HabitApi + ?Sized,
{
    let habits = api.list_habits().await?;
    let requested = habits.len();
    let entries = collect_statistics(api, habits).await;
    if entries.len() < requested {
        warn!(
            missing = requested - entries.len(),
            "statistics incomplete, some habits were left out"
        );
    }
    Ok(entries)
}

/// Drives the habits-for-a-day screen against an API.
pub struct HabitsController<A: HabitApi + ?Sized> {
    api: Arc<A>,
    screen: HabitsScreen,
}

impl<A: HabitApi + ?Sized> HabitsController<A> {
    pub fn new(api: Arc<A>, screen: HabitsScreen) -> Self {
        Self { api, screen }
    }

    pub fn screen(&self) -> &HabitsScreen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut HabitsScreen {
        &mut self.screen
    }

    pub async fn reload(&mut self) -> bool {
        let ticket = self.screen.begin_load();
        self.run_load(ticket).await
    }

    pub async fn refresh(&mut self) -> bool {
        let ticket = self.screen.begin_refresh();
        self.run_load(ticket).await
    }

    pub async fn previous_day(&mut self) -> bool {
        let ticket = self.screen.previous_day();
        self.run_load(ticket).await
    }

    pub async fn next_day(&mut self) -> bool {
        let ticket = self.screen.next_day();
        self.run_load(ticket).await
    }

    pub async fn go_to_today(&mut self) -> bool {
        let ticket = self.screen.go_to_today();
        self.run_load(ticket).await
    }

    pub async fn select_date(&mut self, date: DateKey) -> bool {
        let ticket = self.screen.select_date(date);
        self.run_load(ticket).await
    }

    async fn run_load(&mut self, ticket: LoadTicket) -> bool {
        let result = load_day(self.api.as_ref(), ticket.date).await;
        self.screen.finish_load(ticket, result)
    }

    /// Completes or un-completes a habit on the selected day. An
    /// already-completed answer from the API counts as success. Dropping the
    /// returned future before it settles frees the habit for the next toggle.
    pub async fn toggle(&mut self, habit_id: &str) -> Result<ToggleOutcome> {
        let Some(pending) = self.screen.start_toggle(habit_id) else {
            return Ok(ToggleOutcome::Busy);
        };
        let (action, date) = (pending.action(), pending.date());

        let result = match action {
            ToggleAction::Complete => self.api.complete_habit(habit_id, Some(date)).await,
            ToggleAction::Uncomplete => self.api.remove_completion(habit_id, date).await,
        };
        if let Err(err) = &result {
            warn!(%habit_id, %date, "toggle failed: {err}");
        }

        pending.finish(result)
    }

    /// Creates a habit and appends it to the list. On failure the list is
    /// left alone and the error is also shown as the notice.
    pub async fn create(&mut self, request: CreateHabitRequest) -> Result<Habit> {
        let created = match self.api.create_habit(request).await {
            Ok(habit) => habit,
            Err(err) => {
                self.screen.set_notice(err.to_string());
                return Err(err);
            }
        };

        let date = self.screen.selected_date();
        let completed = match self.api.list_completions(&created.id).await {
            Ok(completions) => is_completed_on(&completions, date),
            Err(err) => {
                warn!(habit_id = %created.id, "failed to load completions for new habit: {err}");
                false
            }
        };

        info!(habit_id = %created.id, name = %created.name, "habit created");
        self.screen.habit_created(created.clone(), completed);
        Ok(created)
    }
}

/// Drives the statistics screen.
pub struct StatisticsController<A: HabitApi + ?Sized> {
    api: Arc<A>,
    screen: StatisticsScreen,
}

impl<A: HabitApi + ?Sized> StatisticsController<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            screen: StatisticsScreen::default(),
        }
    }

    pub fn screen(&self) -> &StatisticsScreen {
        &self.screen
    }

    pub async fn reload(&mut self) -> bool {
        let generation = self.screen.begin_load();
        let result = load_statistics(self.api.as_ref()).await;
        self.screen.finish_load(generation, result)
    }
}

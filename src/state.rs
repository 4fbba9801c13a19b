//! Per-screen state. Each screen owns its data and only changes it through
//! the transitions below; async work happens in [`crate::app`] between them.

use crate::aggregate::{aggregate, Totals};
use crate::dates::{self, DateKey};
use crate::errors::ClientError;
use crate::models::{Habit, Statistics};
use std::collections::HashSet;

/// Ties an in-flight load to the state it was started against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    pub date: DateKey,
}

/// Result of a habits-for-a-day load.
#[derive(Debug, Clone, PartialEq)]
pub struct DayLoad {
    pub habits: Vec<Habit>,
    pub completed: HashSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Complete,
    Uncomplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Completed,
    AlreadyCompleted,
    Removed,
    /// A toggle for the same habit was still in flight.
    Busy,
}

pub const NOTICE_COMPLETED: &str = "Habit marked as complete!";
pub const NOTICE_ALREADY_COMPLETED: &str = "Habit was already complete";
pub const NOTICE_REMOVED: &str = "Completion removed";
pub const NOTICE_CREATED: &str = "Habit created!";

#[derive(Debug, Clone)]
pub struct HabitsScreen {
    selected_date: DateKey,
    habits: Vec<Habit>,
    completed: HashSet<String>,
    toggling: HashSet<String>,
    generation: u64,
    loading: bool,
    refreshing: bool,
    notice: Option<String>,
}

impl Default for HabitsScreen {
    fn default() -> Self {
        Self::new(dates::today())
    }
}

impl HabitsScreen {
    pub fn new(selected_date: DateKey) -> Self {
        Self {
            selected_date,
            habits: Vec::new(),
            completed: HashSet::new(),
            toggling: HashSet::new(),
            generation: 0,
            loading: true,
            refreshing: false,
            notice: None,
        }
    }

    pub fn selected_date(&self) -> DateKey {
        self.selected_date
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn is_completed(&self, habit_id: &str) -> bool {
        self.completed.contains(habit_id)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn is_toggling(&self, habit_id: &str) -> bool {
        self.toggling.contains(habit_id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn is_viewing_today(&self) -> bool {
        dates::is_today(&self.selected_date.to_string())
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub fn set_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    pub fn previous_day(&mut self) -> LoadTicket {
        self.select_date(dates::previous(self.selected_date))
    }

    pub fn next_day(&mut self) -> LoadTicket {
        self.select_date(dates::next(self.selected_date))
    }

    pub fn go_to_today(&mut self) -> LoadTicket {
        self.select_date(dates::today())
    }

    /// Switches the selected day; the completed set is cleared right away so
    /// the previous day's marks never show against the new date.
    pub fn select_date(&mut self, date: DateKey) -> LoadTicket {
        self.selected_date = date;
        self.completed.clear();
        self.begin_load()
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        LoadTicket {
            generation: self.generation,
            date: self.selected_date,
        }
    }

    pub fn begin_refresh(&mut self) -> LoadTicket {
        self.refreshing = true;
        self.begin_load()
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation && ticket.date == self.selected_date
    }

    /// Applies a load result. Returns false when the ticket is stale and the
    /// result was dropped.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<DayLoad, ClientError>,
    ) -> bool {
        if !self.is_current(&ticket) {
            return false;
        }
        match result {
            Ok(load) => {
                self.habits = load.habits;
                self.completed = load.completed;
            }
            Err(err) => self.notice = Some(err.to_string()),
        }
        self.loading = false;
        self.refreshing = false;
        true
    }

    /// Marks a toggle as in flight and decides which way it goes.
    pub fn begin_toggle(&mut self, habit_id: &str) -> Option<(ToggleAction, DateKey)> {
        if !self.toggling.insert(habit_id.to_string()) {
            return None;
        }
        let action = if self.completed.contains(habit_id) {
            ToggleAction::Uncomplete
        } else {
            ToggleAction::Complete
        };
        Some((action, self.selected_date))
    }

    /// Like [`HabitsScreen::begin_toggle`], but the in-flight mark is tied to
    /// the returned guard and goes away when it is dropped unsettled.
    pub fn start_toggle(&mut self, habit_id: &str) -> Option<PendingToggle<'_>> {
        let (action, date) = self.begin_toggle(habit_id)?;
        Some(PendingToggle {
            screen: self,
            habit_id: habit_id.to_string(),
            action,
            date,
        })
    }

    /// Settles a toggle. Failures are recorded as the notice and handed
    /// back; the completed set is only touched on success.
    pub fn finish_toggle(
        &mut self,
        habit_id: &str,
        action: ToggleAction,
        date: DateKey,
        result: Result<(), ClientError>,
    ) -> Result<ToggleOutcome, ClientError> {
        self.toggling.remove(habit_id);

        let outcome = match (action, result) {
            (ToggleAction::Complete, Ok(())) => ToggleOutcome::Completed,
            (ToggleAction::Complete, Err(ClientError::AlreadyCompleted)) => {
                ToggleOutcome::AlreadyCompleted
            }
            (ToggleAction::Uncomplete, Ok(())) => ToggleOutcome::Removed,
            (_, Err(err)) => {
                self.notice = Some(err.to_string());
                return Err(err);
            }
        };

        let still_selected = date == self.selected_date;
        let notice = match outcome {
            ToggleOutcome::Removed => {
                if still_selected {
                    self.completed.remove(habit_id);
                }
                NOTICE_REMOVED
            }
            ToggleOutcome::AlreadyCompleted => {
                if still_selected {
                    self.completed.insert(habit_id.to_string());
                }
                NOTICE_ALREADY_COMPLETED
            }
            _ => {
                if still_selected {
                    self.completed.insert(habit_id.to_string());
                }
                NOTICE_COMPLETED
            }
        };
        self.notice = Some(notice.to_string());
        Ok(outcome)
    }

    pub fn habit_created(&mut self, habit: Habit, completed_on_selected: bool) {
        if completed_on_selected {
            self.completed.insert(habit.id.clone());
        }
        self.habits.push(habit);
        self.notice = Some(NOTICE_CREATED.to_string());
    }
}

/// A toggle in flight. Dropping it without calling
/// [`PendingToggle::finish`] clears the habit's in-flight mark and leaves
/// everything else as it was.
#[derive(Debug)]
pub struct PendingToggle<'a> {
    screen: &'a mut HabitsScreen,
    habit_id: String,
    action: ToggleAction,
    date: DateKey,
}

impl PendingToggle<'_> {
    pub fn action(&self) -> ToggleAction {
        self.action
    }

    pub fn date(&self) -> DateKey {
        self.date
    }

    pub fn finish(mut self, result: Result<(), ClientError>) -> Result<ToggleOutcome, ClientError> {
        let (action, date) = (self.action, self.date);
        self.screen.finish_toggle(&self.habit_id, action, date, result)
    }
}

impl Drop for PendingToggle<'_> {
    fn drop(&mut self) {
        self.screen.toggling.remove(&self.habit_id);
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatisticsScreen {
    entries: Vec<(Habit, Statistics)>,
    error: Option<String>,
    generation: u64,
    loading: bool,
}

impl StatisticsScreen {
    pub fn entries(&self) -> &[(Habit, Statistics)] {
        &self.entries
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn totals(&self) -> Totals {
        aggregate(&self.entries)
    }

    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        self.generation
    }

    /// A failed listing keeps the previously loaded entries.
    pub fn finish_load(
        &mut self,
        generation: u64,
        result: Result<Vec<(Habit, Statistics)>, ClientError>,
    ) -> bool {
        if generation != self.generation {
            return false;
        }
        match result {
            Ok(entries) => self.entries = entries,
            Err(err) => self.error = Some(err.to_string()),
        }
        self.loading = false;
        true
    }
}

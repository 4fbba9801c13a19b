//! In-memory [`HabitApi`] used by the unit tests.

use crate::api::{validate_create, HabitApi};
use crate::dates::{self, matches_date_key, DateKey};
use crate::errors::{ClientError, Result};
use crate::models::{
    Completion, CreateHabitRequest, Frequency, Habit, Statistics, UpdateHabitRequest, PALETTE,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub fn habit(id: &str, name: &str) -> Habit {
    Habit {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        frequency: Frequency::Daily,
        color: PALETTE[0].to_string(),
        category: None,
        created_at: "2025-11-01T10:00:00Z".to_string(),
        updated_at: "2025-11-01T10:00:00Z".to_string(),
    }
}

#[derive(Default)]
struct Store {
    next_id: u64,
    habits: Vec<Habit>,
    completions: Vec<Completion>,
    statistics: HashMap<String, Statistics>,
    failing_statistics: HashSet<String>,
    failing_completions: HashSet<String>,
    fail_listing: bool,
    fail_mutations: bool,
    stall_mutations: bool,
}

#[derive(Default)]
pub struct FakeApi {
    store: Mutex<Store>,
}

impl FakeApi {
    fn with_store<T>(&self, f: impl FnOnce(&mut Store) -> T) -> T {
        let mut store = self.store.lock().unwrap();
        f(&mut store)
    }

    pub fn insert_habit(&self, name: &str) -> Habit {
        self.with_store(|store| {
            store.next_id += 1;
            let created = habit(&format!("h{}", store.next_id), name);
            store.habits.push(created.clone());
            created
        })
    }

    pub fn set_statistics(&self, id: &str, stats: Statistics) {
        self.with_store(|store| store.statistics.insert(id.to_string(), stats));
    }

    pub fn fail_statistics(&self, id: &str) {
        self.with_store(|store| store.failing_statistics.insert(id.to_string()));
    }

    pub fn fail_completions(&self, id: &str) {
        self.with_store(|store| store.failing_completions.insert(id.to_string()));
    }

    pub fn fail_listing(&self, fail: bool) {
        self.with_store(|store| store.fail_listing = fail);
    }

    pub fn fail_mutations(&self, fail: bool) {
        self.with_store(|store| store.fail_mutations = fail);
    }

    /// Makes mark-complete and remove-completion calls wait forever.
    pub fn stall_mutations(&self, stall: bool) {
        self.with_store(|store| store.stall_mutations = stall);
    }

    fn stalled(&self) -> bool {
        self.with_store(|store| store.stall_mutations)
    }

    pub fn completion_count(&self, id: &str) -> usize {
        self.with_store(|store| store.completions.iter().filter(|c| c.habit_id == id).count())
    }
}

fn server_error() -> ClientError {
    ClientError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
}

fn habit_not_found() -> ClientError {
    ClientError::from_status(StatusCode::NOT_FOUND, "habit not found")
}

#[async_trait]
impl HabitApi for FakeApi {
    async fn list_habits(&self) -> Result<Vec<Habit>> {
        self.with_store(|store| {
            if store.fail_listing {
                return Err(server_error());
            }
            Ok(store.habits.clone())
        })
    }

    async fn get_habit(&self, id: &str) -> Result<Habit> {
        self.with_store(|store| {
            store
                .habits
                .iter()
                .find(|habit| habit.id == id)
                .cloned()
                .ok_or_else(habit_not_found)
        })
    }

    async fn create_habit(&self, request: CreateHabitRequest) -> Result<Habit> {
        let request = validate_create(request)?;
        self.with_store(|store| {
            if store.fail_mutations {
                return Err(server_error());
            }
            store.next_id += 1;
            let mut created = habit(&format!("h{}", store.next_id), &request.name);
            created.description = request.description;
            created.category = request.category;
            created.frequency = request.frequency;
            created.color = request.color;
            store.habits.push(created.clone());
            Ok(created)
        })
    }

    async fn update_habit(&self, id: &str, request: UpdateHabitRequest) -> Result<Habit> {
        self.with_store(|store| {
            let habit = store
                .habits
                .iter_mut()
                .find(|habit| habit.id == id)
                .ok_or_else(habit_not_found)?;
            if let Some(name) = request.name {
                habit.name = name;
            }
            if let Some(frequency) = request.frequency {
                habit.frequency = frequency;
            }
            Ok(habit.clone())
        })
    }

    async fn delete_habit(&self, id: &str) -> Result<()> {
        self.with_store(|store| {
            let before = store.habits.len();
            store.habits.retain(|habit| habit.id != id);
            if store.habits.len() == before {
                return Err(habit_not_found());
            }
            store.completions.retain(|completion| completion.habit_id != id);
            Ok(())
        })
    }

    async fn complete_habit(&self, id: &str, date: Option<DateKey>) -> Result<()> {
        if self.stalled() {
            std::future::pending::<()>().await;
        }
        let day = date.unwrap_or_else(dates::today);
        self.with_store(|store| {
            if store.fail_mutations {
                return Err(server_error());
            }
            if !store.habits.iter().any(|habit| habit.id == id) {
                return Err(habit_not_found());
            }
            let duplicate = store
                .completions
                .iter()
                .any(|c| c.habit_id == id && matches_date_key(&c.completed_at, day));
            if duplicate {
                return Err(ClientError::AlreadyCompleted);
            }
            store.next_id += 1;
            store.completions.push(Completion {
                id: format!("c{}", store.next_id),
                habit_id: id.to_string(),
                completed_at: format!("{day}T00:00:00Z"),
                notes: None,
                created_at: format!("{day}T00:00:00Z"),
            });
            Ok(())
        })
    }

    async fn remove_completion(&self, id: &str, date: DateKey) -> Result<()> {
        if self.stalled() {
            std::future::pending::<()>().await;
        }
        self.with_store(|store| {
            if store.fail_mutations {
                return Err(server_error());
            }
            let before = store.completions.len();
            store
                .completions
                .retain(|c| !(c.habit_id == id && matches_date_key(&c.completed_at, date)));
            if store.completions.len() == before {
                return Err(ClientError::from_status(
                    StatusCode::NOT_FOUND,
                    "completion not found",
                ));
            }
            Ok(())
        })
    }

    async fn list_completions(&self, id: &str) -> Result<Vec<Completion>> {
        self.with_store(|store| {
            if store.failing_completions.contains(id) {
                return Err(server_error());
            }
            Ok(store
                .completions
                .iter()
                .filter(|completion| completion.habit_id == id)
                .cloned()
                .collect())
        })
    }

    async fn get_statistics(&self, id: &str) -> Result<Statistics> {
        self.with_store(|store| {
            if store.failing_statistics.contains(id) {
                return Err(server_error());
            }
            if let Some(stats) = store.statistics.get(id) {
                return Ok(stats.clone());
            }
            let completions: Vec<String> = store
                .completions
                .iter()
                .filter(|completion| completion.habit_id == id)
                .map(|completion| completion.completed_at.clone())
                .collect();
            Ok(Statistics {
                total_completions: completions.len() as u64,
                current_streak: 0,
                longest_streak: 0,
                completions,
            })
        })
    }
}

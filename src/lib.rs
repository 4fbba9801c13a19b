pub mod aggregate;
pub mod api;
pub mod app;
pub mod config;
pub mod dates;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;
pub mod ui;

#[cfg(test)]
mod fake;

pub use aggregate::{aggregate, is_completed_on, Totals};
pub use api::{HabitApi, HttpHabitApi};
pub use config::Config;
pub use dates::DateKey;
pub use errors::ClientError;

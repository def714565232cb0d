//! Habits and their daily progress. [repository::HabitRepository] owns both persisted collections,
//! the rest of the application only ever holds copies.

pub mod entities;
pub mod repository;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HabitError {
    #[error("habit name can't be empty")]
    EmptyName,
}

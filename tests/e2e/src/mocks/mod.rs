//! Test data

mod fixtures;

pub use fixtures::{QuizItem, TestDataFactory};

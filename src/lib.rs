//! Decimal keypad calculator with a persistent history of computations.

pub mod calculator;
pub mod config;
pub mod history;
pub mod keypad;
pub mod logging;

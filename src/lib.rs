//! Trivia question API: categories, paginated and searchable questions, and
//! a quiz that hands out unseen questions at random.

pub mod configuration;
pub mod db;
pub mod server;
pub mod telemetry;

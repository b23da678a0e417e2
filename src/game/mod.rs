//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering
//! dependencies, including the three food behaviors the game is built around.

pub mod action;
pub mod config;
pub mod engine;
pub mod food;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::GameConfig;
pub use engine::{GameEngine, GameOverSummary, TickOutcome};
pub use food::{Food, FoodKind, Heading};
pub use state::{GameOverReason, GameState, Position, Snake};

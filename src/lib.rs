//! Skittish Snake - a terminal Snake game where the food reacts to you
//!
//! Some food sits still until eaten. Some is startled into a zig-zag run
//! when the snake gets close. Some teleports across the grid exactly once.
//!
//! Core game logic lives in [`game`] and has no I/O dependencies. The other
//! modules wire it to a ratatui interface driven by a tokio event loop.

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;

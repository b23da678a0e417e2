//! Keyboard input handling for interactive play

pub mod handler;

pub use handler::{InputHandler, KeyAction};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the game grid, in cells
    pub grid_width: usize,
    /// Height of the game grid, in cells
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,

    // Speed ramp: the tick interval starts at the base and loses the
    // decrement for every point scored, never dropping below the floor.
    /// Tick interval at score zero, in milliseconds
    pub base_tick_ms: u64,
    /// Interval reduction per point scored, in milliseconds
    pub tick_decrement_ms: u64,
    /// Smallest allowed tick interval, in milliseconds
    pub min_tick_ms: u64,

    /// Fewest ticks a fleeing food keeps running once startled
    pub flee_min_ticks: u32,
    /// One past the most ticks a fleeing food keeps running
    pub flee_max_ticks: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            initial_snake_length: 3,
            base_tick_ms: 100,
            tick_decrement_ms: 5,
            min_tick_ms: 50,
            // One to two seconds of running at the base tick rate
            flee_min_ticks: 10,
            flee_max_ticks: 20,
        }
    }
}

impl GameConfig {
    /// Create a configuration with a custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Tick interval for a given score: base minus the per-point decrement,
    /// floored at the minimum. Non-increasing as the score climbs.
    pub fn interval_for_score(&self, score: u32) -> Duration {
        let ms = self
            .base_tick_ms
            .saturating_sub(u64::from(score) * self.tick_decrement_ms)
            .max(self.min_tick_ms);
        Duration::from_millis(ms)
    }
}

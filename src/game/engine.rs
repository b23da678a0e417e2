use tracing::{debug, info};

use super::{
    action::{Action, Direction},
    config::GameConfig,
    food::Food,
    state::{GameOverReason, GameState, Position, Snake},
};

/// How a session ended, reported once on the tick it happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverSummary {
    pub reason: GameOverReason,
    pub final_score: u32,
    pub ticks: u32,
}

/// Result of a single tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    /// Number of foods eaten this tick
    pub eaten: u32,
    /// Set on the tick a session ended; the state has already been
    /// replaced with a fresh session by then
    pub game_over: Option<GameOverSummary>,
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: rand::rngs::ThreadRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: rand::thread_rng(),
        }
    }

    /// Build a fresh session: a centered snake heading right and one food
    pub fn new_session(&mut self) -> GameState {
        let center_x = (self.config.grid_width / 2) as i32;
        let center_y = (self.config.grid_height / 2) as i32;

        let snake = Snake::new(
            Position::new(center_x, center_y),
            Direction::Right,
            self.config.initial_snake_length,
        );

        let food = Food::spawn(&self.config, &mut self.rng);

        GameState::new(
            snake,
            vec![food],
            self.config.grid_width,
            self.config.grid_height,
            self.config.interval_for_score(0),
        )
    }

    /// Execute one tick of the game.
    ///
    /// On a fatal move the state is replaced with a fresh session and the
    /// outcome carries a summary of the ended one, so callers never have to
    /// stop ticking.
    pub fn step(&mut self, state: &mut GameState, action: Action) -> TickOutcome {
        // Steer, ignoring 180 degree turns
        match action {
            Action::Move(new_direction) => {
                if !state.snake.direction.is_opposite(new_direction) {
                    state.snake.direction = new_direction;
                }
            }
            Action::Continue => {
                // Keep current direction
            }
        }

        let new_head = state.snake.head().moved_in_direction(state.snake.direction);

        if let Some(reason) = self.check_collision(state, new_head) {
            state.ticks += 1;
            let summary = GameOverSummary {
                reason,
                final_score: state.score,
                ticks: state.ticks,
            };
            info!(
                ?reason,
                score = summary.final_score,
                ticks = summary.ticks,
                "game over, starting a new session"
            );
            *state = self.new_session();

            return TickOutcome {
                eaten: 0,
                game_over: Some(summary),
            };
        }

        state.snake.push_head(new_head);

        // Eat every food sitting on the new head cell
        let before = state.foods.len();
        state.foods.retain(|food| food.pos != new_head);
        let eaten = (before - state.foods.len()) as u32;

        if eaten > 0 {
            state.score += eaten;
            debug!(eaten, score = state.score, "snake ate food");
            // One replacement per food eaten keeps the population constant
            for _ in 0..eaten {
                let food = Food::spawn(&self.config, &mut self.rng);
                state.foods.push(food);
            }
        } else {
            state.snake.pop_tail();
        }

        // Every food reacts to the snake's new position, replacements included
        for food in state.foods.iter_mut() {
            food.update(&state.snake, &self.config, &mut self.rng);
        }

        state.tick_interval = self.config.interval_for_score(state.score);
        state.ticks += 1;

        TickOutcome {
            eaten,
            game_over: None,
        }
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<GameOverReason> {
        if !state.is_in_bounds(pos) {
            return Some(GameOverReason::Boundary);
        }

        if state.snake.collides_with_body(pos) {
            return Some(GameOverReason::SelfCollision);
        }

        None
    }
}

use rand::Rng;
use tracing::debug;

use super::config::GameConfig;
use super::state::{Position, Snake};

/// Food reacts when the snake's head comes within two cells, measured as
/// Euclidean distance and compared squared. This is (2 cells) squared.
const STARTLE_RANGE_SQ: i64 = 4;

/// One of the eight compass directions a fleeing food can run in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Heading {
    /// All headings in compass order
    pub const ALL: [Heading; 8] = [
        Heading::North,
        Heading::NorthEast,
        Heading::East,
        Heading::SouthEast,
        Heading::South,
        Heading::SouthWest,
        Heading::West,
        Heading::NorthWest,
    ];

    /// One-cell offset (dx, dy) for this heading; y grows downward
    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::North => (0, -1),
            Heading::NorthEast => (1, -1),
            Heading::East => (1, 0),
            Heading::SouthEast => (1, 1),
            Heading::South => (0, 1),
            Heading::SouthWest => (-1, 1),
            Heading::West => (-1, 0),
            Heading::NorthWest => (-1, -1),
        }
    }

    /// The heading rotated 180 degrees
    pub fn reversed(self) -> Heading {
        match self {
            Heading::North => Heading::South,
            Heading::NorthEast => Heading::SouthWest,
            Heading::East => Heading::West,
            Heading::SouthEast => Heading::NorthWest,
            Heading::South => Heading::North,
            Heading::SouthWest => Heading::NorthEast,
            Heading::West => Heading::East,
            Heading::NorthWest => Heading::SouthEast,
        }
    }

    fn random(rng: &mut impl Rng) -> Heading {
        Heading::ALL[rng.gen_range(0..Heading::ALL.len())]
    }
}

/// Behavior variant of a food item, with its variant-specific state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoodKind {
    /// Sits still until eaten
    Normal,
    /// Runs from the snake for a bounded number of ticks, then turns Normal
    Fleeing {
        heading: Heading,
        /// Remaining ticks of running; counts down only while startled
        ticks_left: u32,
        /// Latched true the first time the head comes close; never unlatched
        startled: bool,
    },
    /// Jumps to a random free cell exactly once, then sits still
    Teleporting {
        /// Latched true after the single jump
        relocated: bool,
    },
}

/// A food item on the grid. Eaten when the snake's head lands on its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    pub pos: Position,
    pub kind: FoodKind,
}

impl Food {
    pub fn normal(pos: Position) -> Self {
        Self {
            pos,
            kind: FoodKind::Normal,
        }
    }

    pub fn fleeing(pos: Position, heading: Heading, ticks_left: u32) -> Self {
        Self {
            pos,
            kind: FoodKind::Fleeing {
                heading,
                ticks_left,
                startled: false,
            },
        }
    }

    pub fn teleporting(pos: Position) -> Self {
        Self {
            pos,
            kind: FoodKind::Teleporting { relocated: false },
        }
    }

    /// Spawn a food of a uniformly random kind at a uniformly random cell.
    /// Spawning does not check occupancy: a food under the snake is legal
    /// and stays uneaten until the head crosses its cell.
    pub fn spawn(config: &GameConfig, rng: &mut impl Rng) -> Self {
        let pos = Position::new(
            rng.gen_range(0..config.grid_width) as i32,
            rng.gen_range(0..config.grid_height) as i32,
        );
        match rng.gen_range(0..3) {
            0 => Self::normal(pos),
            1 => {
                let heading = Heading::random(rng);
                let ticks_left = rng.gen_range(config.flee_min_ticks..config.flee_max_ticks);
                Self::fleeing(pos, heading, ticks_left)
            }
            _ => Self::teleporting(pos),
        }
    }

    /// Advance this food by one tick given the snake's position.
    /// Mutates only the food itself, never the snake.
    pub fn update(&mut self, snake: &Snake, config: &GameConfig, rng: &mut impl Rng) {
        match self.kind {
            FoodKind::Normal => {}
            FoodKind::Fleeing { .. } => self.update_fleeing(snake.head(), config),
            FoodKind::Teleporting { relocated } => {
                if !relocated && snake.head().distance_squared(self.pos) <= STARTLE_RANGE_SQ {
                    self.pos = random_free_cell(snake, config, rng);
                    self.kind = FoodKind::Teleporting { relocated: true };
                    debug!(x = self.pos.x, y = self.pos.y, "food teleported away");
                }
            }
        }
    }

    fn update_fleeing(&mut self, head: Position, config: &GameConfig) {
        let FoodKind::Fleeing {
            mut heading,
            mut ticks_left,
            mut startled,
        } = self.kind
        else {
            return;
        };

        if !startled && head.distance_squared(self.pos) <= STARTLE_RANGE_SQ {
            startled = true;
            debug!(x = self.pos.x, y = self.pos.y, "food startled, breaking into a run");
        }

        if startled {
            if ticks_left == 0 {
                // Out of breath: ordinary food from here on, frozen in place
                self.kind = FoodKind::Normal;
                debug!(x = self.pos.x, y = self.pos.y, "fleeing food settled down");
                return;
            }
            self.pos = flee_step(self.pos, &mut heading, config);
            ticks_left -= 1;
        }

        self.kind = FoodKind::Fleeing {
            heading,
            ticks_left,
            startled,
        };
    }
}

/// One flight step: try the current heading, bounce 180 degrees off a wall,
/// and on degenerate grids where both are blocked take the first legal
/// heading in compass order. Stays put only when no step is legal at all.
/// The heading that produced the committed step is written back.
fn flee_step(pos: Position, heading: &mut Heading, config: &GameConfig) -> Position {
    let (w, h) = (config.grid_width, config.grid_height);
    let step = |hd: Heading| {
        let (dx, dy) = hd.delta();
        pos.moved_by(dx, dy)
    };

    let forward = step(*heading);
    if forward.in_grid(w, h) {
        return forward;
    }

    let reversed = heading.reversed();
    let back = step(reversed);
    if back.in_grid(w, h) {
        *heading = reversed;
        return back;
    }

    for hd in Heading::ALL {
        let candidate = step(hd);
        if candidate.in_grid(w, h) {
            *heading = hd;
            return candidate;
        }
    }

    pos
}

/// A uniformly random cell not occupied by any snake segment, found by
/// resampling. Unlike spawning, a teleport destination never lands on the
/// snake.
fn random_free_cell(snake: &Snake, config: &GameConfig, rng: &mut impl Rng) -> Position {
    loop {
        let pos = Position::new(
            rng.gen_range(0..config.grid_width) as i32,
            rng.gen_range(0..config.grid_height) as i32,
        );
        if !snake.occupies(pos) {
            return pos;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::action::Direction;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn snake_at(head: Position) -> Snake {
        Snake::new(head, Direction::Right, 3)
    }

    /// A fleeing food already startled into its run
    fn running(pos: Position, heading: Heading, ticks_left: u32) -> Food {
        Food {
            pos,
            kind: FoodKind::Fleeing {
                heading,
                ticks_left,
                startled: true,
            },
        }
    }

    #[test]
    fn test_heading_reversal() {
        for hd in Heading::ALL {
            assert_eq!(hd.reversed().reversed(), hd);
            let (dx, dy) = hd.delta();
            let (rx, ry) = hd.reversed().delta();
            assert_eq!((dx, dy), (-rx, -ry));
        }
    }

    #[test]
    fn test_normal_food_never_reacts() {
        let config = GameConfig::small();
        let snake = snake_at(Position::new(5, 5));
        let mut food = Food::normal(Position::new(6, 5));

        for _ in 0..10 {
            food.update(&snake, &config, &mut rng());
        }
        assert_eq!(food.pos, Position::new(6, 5));
        assert_eq!(food.kind, FoodKind::Normal);
    }

    #[test]
    fn test_fleeing_startles_within_two_cells() {
        let config = GameConfig::small();
        let snake = snake_at(Position::new(5, 5));

        // Exactly two cells away: startled, and it runs on the same tick
        let mut near = Food::fleeing(Position::new(7, 5), Heading::East, 5);
        near.update(&snake, &config, &mut rng());
        assert!(matches!(near.kind, FoodKind::Fleeing { startled: true, .. }));
        assert_eq!(near.pos, Position::new(8, 5));

        // Three cells away: unmoved and calm
        let mut far = Food::fleeing(Position::new(8, 5), Heading::East, 5);
        far.update(&snake, &config, &mut rng());
        assert!(matches!(far.kind, FoodKind::Fleeing { startled: false, .. }));
        assert_eq!(far.pos, Position::new(8, 5));
    }

    #[test]
    fn test_fleeing_latch_keeps_it_running() {
        let config = GameConfig::new(30, 30);
        // Head nowhere near; the latch alone keeps the food running
        let snake = snake_at(Position::new(25, 25));
        let mut food = running(Position::new(2, 2), Heading::East, 5);

        food.update(&snake, &config, &mut rng());
        assert_eq!(food.pos, Position::new(3, 2));
        food.update(&snake, &config, &mut rng());
        assert_eq!(food.pos, Position::new(4, 2));
    }

    #[test]
    fn test_fleeing_counts_down_and_settles() {
        let config = GameConfig::small();
        let snake = snake_at(Position::new(0, 9));
        let mut food = running(Position::new(2, 2), Heading::South, 2);

        food.update(&snake, &config, &mut rng());
        assert!(matches!(
            food.kind,
            FoodKind::Fleeing { ticks_left: 1, .. }
        ));
        food.update(&snake, &config, &mut rng());
        assert!(matches!(
            food.kind,
            FoodKind::Fleeing { ticks_left: 0, .. }
        ));
        let resting = food.pos;

        // Lifetime exhausted: converts to Normal and freezes in place
        food.update(&snake, &config, &mut rng());
        assert_eq!(food.kind, FoodKind::Normal);
        assert_eq!(food.pos, resting);

        // Still inert with the head right next to it
        let close = snake_at(resting.moved_by(1, 0));
        food.update(&close, &config, &mut rng());
        assert_eq!(food.kind, FoodKind::Normal);
        assert_eq!(food.pos, resting);
    }

    #[test]
    fn test_fleeing_reverses_off_wall() {
        let config = GameConfig::small();
        let snake = snake_at(Position::new(0, 0));
        let mut food = running(Position::new(9, 5), Heading::East, 5);

        // East is out of bounds; it bounces west and keeps that heading
        food.update(&snake, &config, &mut rng());
        assert_eq!(food.pos, Position::new(8, 5));
        assert!(matches!(
            food.kind,
            FoodKind::Fleeing {
                heading: Heading::West,
                ..
            }
        ));
        food.update(&snake, &config, &mut rng());
        assert_eq!(food.pos, Position::new(7, 5));
    }

    #[test]
    fn test_fleeing_cornered_takes_first_open_heading() {
        // On a 3x1 strip, North and South are both out of bounds
        let config = GameConfig::new(3, 1);
        let snake = snake_at(Position::new(0, 0));
        let mut food = running(Position::new(1, 0), Heading::North, 5);

        // Compass scan finds East as the first legal step
        food.update(&snake, &config, &mut rng());
        assert_eq!(food.pos, Position::new(2, 0));
        assert!(matches!(
            food.kind,
            FoodKind::Fleeing {
                heading: Heading::East,
                ..
            }
        ));
    }

    #[test]
    fn test_fleeing_pinned_still_counts_down() {
        // A 1x1 grid has no legal step in any heading
        let config = GameConfig::new(1, 1);
        let snake = snake_at(Position::new(0, 0));
        let mut food = running(Position::new(0, 0), Heading::North, 1);

        // Stays put but the lifetime still burns down, so it terminates
        food.update(&snake, &config, &mut rng());
        assert_eq!(food.pos, Position::new(0, 0));
        assert!(matches!(
            food.kind,
            FoodKind::Fleeing { ticks_left: 0, .. }
        ));
        food.update(&snake, &config, &mut rng());
        assert_eq!(food.kind, FoodKind::Normal);
    }

    #[test]
    fn test_teleport_jumps_once() {
        let config = GameConfig::small();
        let snake = snake_at(Position::new(5, 5));
        let mut food = Food::teleporting(Position::new(6, 6));
        let mut rng = rng();

        food.update(&snake, &config, &mut rng);
        assert_eq!(food.kind, FoodKind::Teleporting { relocated: true });
        assert!(food.pos.in_grid(config.grid_width, config.grid_height));
        assert!(!snake.occupies(food.pos));

        // Approached again: the latch holds and it never jumps twice
        let chasing = snake_at(food.pos.moved_by(1, 0));
        let landed = food.pos;
        food.update(&chasing, &config, &mut rng);
        assert_eq!(food.pos, landed);
    }

    #[test]
    fn test_teleport_destination_avoids_snake() {
        // Snake covers three cells of a 2x2 grid; only (1, 0) is free,
        // so the destination is forced no matter what the rng draws
        let config = GameConfig::new(2, 2);
        let mut snake = Snake::new(Position::new(0, 0), Direction::Down, 1);
        snake.body = vec![
            Position::new(0, 0),
            Position::new(0, 1),
            Position::new(1, 1),
        ];
        let mut food = Food::teleporting(Position::new(1, 1));

        food.update(&snake, &config, &mut rng());
        assert_eq!(food.pos, Position::new(1, 0));
        assert_eq!(food.kind, FoodKind::Teleporting { relocated: true });
    }

    #[test]
    fn test_teleport_out_of_range_stays() {
        let config = GameConfig::small();
        let snake = snake_at(Position::new(0, 0));
        let mut food = Food::teleporting(Position::new(9, 9));

        food.update(&snake, &config, &mut rng());
        assert_eq!(food.pos, Position::new(9, 9));
        assert_eq!(food.kind, FoodKind::Teleporting { relocated: false });
    }

    #[test]
    fn test_spawn_in_bounds_with_all_kinds() {
        let config = GameConfig::small();
        let mut rng = rng();
        let (mut normal, mut fleeing, mut teleporting) = (0, 0, 0);

        for _ in 0..200 {
            let food = Food::spawn(&config, &mut rng);
            assert!(food.pos.in_grid(config.grid_width, config.grid_height));
            match food.kind {
                FoodKind::Normal => normal += 1,
                FoodKind::Fleeing {
                    ticks_left,
                    startled,
                    ..
                } => {
                    assert!(!startled);
                    assert!(ticks_left >= config.flee_min_ticks);
                    assert!(ticks_left < config.flee_max_ticks);
                    fleeing += 1;
                }
                FoodKind::Teleporting { relocated } => {
                    assert!(!relocated);
                    teleporting += 1;
                }
            }
        }

        assert!(normal > 0);
        assert!(fleeing > 0);
        assert!(teleporting > 0);
    }
}

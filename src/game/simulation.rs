use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use super::{
    action::{Direction, Intent},
    config::{FoodPlacement, GameConfig},
    state::{EndReason, GameState, Position, RoundState, Snake, Snapshot},
};

/// What a call to [`SnakeSimulation::tick`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The round is paused or over; nothing changed
    Skipped,
    /// The snake advanced one cell
    Moved { ate_food: bool },
    /// The snake advanced and the round ended
    Ended(EndReason),
}

/// Tick-driven snake state machine
///
/// Owns the whole game state. Hosts feed it intents (`set_direction`,
/// `toggle_pause`, `reset`), call `tick` on a fixed cadence and draw from
/// `snapshot`. Food placement is the only source of randomness and comes from
/// the injected RNG.
pub struct SnakeSimulation<R = StdRng> {
    config: GameConfig,
    state: GameState,
    /// Direction the next tick will move in
    next_direction: Direction,
    rng: R,
}

impl SnakeSimulation<StdRng> {
    /// Create a simulation seeded from `config.rng_seed`, or from the OS
    ///
    /// `config` must pass [`GameConfig::validate`].
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> SnakeSimulation<R> {
    /// Create a simulation that places food with `rng`
    ///
    /// `config` must pass [`GameConfig::validate`]; an empty or oversized grid
    /// cannot be spawned on.
    pub fn with_rng(config: GameConfig, mut rng: R) -> Self {
        debug_assert!(config.validate().is_ok(), "unvalidated config: {config:?}");
        let state = spawn_state(&config, &mut rng);
        let next_direction = state.snake.direction;
        Self {
            config,
            state,
            next_direction,
            rng,
        }
    }

    /// Start from an explicit state instead of the spawn layout
    ///
    /// The body must hold at least the head; its shape is not checked.
    pub fn with_state(config: GameConfig, state: GameState, rng: R) -> Self {
        debug_assert!(!state.snake.is_empty(), "snake needs a head");
        let next_direction = state.snake.direction;
        Self {
            config,
            state,
            next_direction,
            rng,
        }
    }

    /// Throw away the current round and start a new one
    pub fn reset(&mut self) {
        self.state = spawn_state(&self.config, &mut self.rng);
        self.next_direction = self.state.snake.direction;
        info!(food = ?self.state.food, "round started");
    }

    /// Steer the next tick; returns whether the request was taken
    ///
    /// Requests while paused or over are dropped, as is a request to reverse
    /// the direction of the last move.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.state.round != RoundState::Active {
            trace!(?direction, round = ?self.state.round, "turn dropped, round inactive");
            return false;
        }
        if direction.is_opposite(self.state.snake.direction) {
            trace!(?direction, "turn dropped, would reverse");
            return false;
        }

        self.next_direction = direction;
        true
    }

    /// Flip between active and paused; no effect once the round is over
    pub fn toggle_pause(&mut self) {
        self.state.round = match self.state.round {
            RoundState::Active => RoundState::Paused,
            RoundState::Paused => RoundState::Active,
            RoundState::Over => return,
        };
        debug!(round = ?self.state.round, "pause toggled");
    }

    /// Advance the round by one cell
    pub fn tick(&mut self) -> TickOutcome {
        if self.state.round != RoundState::Active {
            return TickOutcome::Skipped;
        }

        let direction = self.next_direction;
        let new_head = self.state.snake.head().moved_in_direction(direction);
        let ate_food = new_head == self.state.food;

        self.state.snake.advance(direction, ate_food);
        self.state.ticks += 1;

        let board_full = self.state.snake.len() >= self.config.total_cells();
        if ate_food {
            self.state.score += 1;
            if !board_full {
                self.state.food = sample_food(&self.config, &self.state.snake, &mut self.rng);
            }
            debug!(
                score = self.state.score,
                length = self.state.snake.len(),
                food = ?self.state.food,
                "food eaten"
            );
        }

        if let Some(reason) = self.collision() {
            return self.end_round(reason);
        }
        if board_full {
            return self.end_round(EndReason::BoardFilled);
        }

        TickOutcome::Moved { ate_food }
    }

    /// Dispatch an intent to the matching operation
    pub fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::Turn(direction) => {
                self.set_direction(direction);
            }
            Intent::TogglePause => self.toggle_pause(),
            Intent::Restart => self.reset(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            body: self.state.snake.body.clone(),
            food: self.state.food,
            score: self.state.score,
            state: self.state.round,
            direction: self.next_direction,
            end_reason: self.state.end_reason,
            ticks: self.state.ticks,
            grid_cells: self.config.grid_cells,
            cell_size: self.config.cell_size,
            field_size: self.config.field_size(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direction the next tick will move in
    pub fn direction(&self) -> Direction {
        self.next_direction
    }

    fn collision(&self) -> Option<EndReason> {
        if !self.config.contains(self.state.snake.head()) {
            return Some(EndReason::Wall);
        }
        if self.state.snake.head_hits_body() {
            return Some(EndReason::SelfCollision);
        }
        None
    }

    fn end_round(&mut self, reason: EndReason) -> TickOutcome {
        self.state.round = RoundState::Over;
        self.state.end_reason = Some(reason);
        info!(
            ?reason,
            score = self.state.score,
            length = self.state.snake.len(),
            ticks = self.state.ticks,
            "round over"
        );
        TickOutcome::Ended(reason)
    }
}

fn spawn_state<R: Rng>(config: &GameConfig, rng: &mut R) -> GameState {
    let snake = Snake::with_capacity(
        config.spawn_head,
        Direction::Right,
        config.initial_snake_length,
        config.total_cells(),
    );
    let food = sample_food(config, &snake, rng);
    GameState::new(snake, food)
}

/// Pick a food cell according to the configured placement rule
pub fn sample_food<R: Rng>(config: &GameConfig, snake: &Snake, rng: &mut R) -> Position {
    let cells = config.grid_cells as i32;

    if config.food_placement == FoodPlacement::AvoidSnake {
        let free = (0..cells)
            .flat_map(|y| (0..cells).map(move |x| Position::new(x, y)))
            .filter(|pos| !snake.body.contains(pos))
            .choose(rng);
        if let Some(pos) = free {
            return pos;
        }
    }

    Position::new(rng.gen_range(0..cells), rng.gen_range(0..cells))
}

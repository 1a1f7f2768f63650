//! The game state machine: one snake, one piece of food, one score.

use std::collections::VecDeque;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::collision::{self, Collision};
use crate::config::GameConfig;
use crate::difficulty::DifficultyPolicy;
use crate::error::ConfigError;
use crate::grid::{Cell, Direction, Grid};
use crate::input::InputBuffer;
use crate::score_store::ScoreStore;

pub const POINTS_PER_FOOD: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum Status {
    #[display("idle")]
    Idle,
    #[display("running")]
    Running,
    #[display("game over")]
    GameOver,
    /// The snake fills the whole board and no food can be placed.
    #[display("won")]
    Won,
}

/// What a single call to [`GameSession::advance`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The session was not running; nothing changed.
    Inactive,
    Moved,
    /// Food was eaten. `new_interval` is set when the tick interval changed
    /// and the clock has to be re-armed.
    Ate {
        score: u32,
        new_interval: Option<u64>,
    },
    Collided(Collision),
    Won,
}

/// Owned copy of the session state, handed to renderers and observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub grid_size: i32,
    pub snake: Vec<Cell>,
    pub food: Option<Cell>,
    pub direction: Direction,
    pub score: u32,
    pub high_score: u32,
    pub speed_ms: u64,
    pub status: Status,
}

impl Snapshot {
    pub fn head(&self) -> Option<Cell> {
        self.snake.first().copied()
    }
}

/// Receives session events. Every method defaults to doing nothing.
pub trait SessionObserver {
    fn on_score_changed(&mut self, _score: u32) {}
    fn on_game_over(&mut self, _final_score: u32, _is_new_high_score: bool) {}
    fn on_won(&mut self, _final_score: u32, _is_new_high_score: bool) {}
    fn on_tick(&mut self, _snapshot: &Snapshot) {}
}

impl SessionObserver for () {}

pub struct GameSession {
    grid: Grid,
    snake: VecDeque<Cell>,
    food: Option<Cell>,
    input: InputBuffer,
    score: u32,
    high_score: u32,
    speed_ms: u64,
    status: Status,
    difficulty: DifficultyPolicy,
    rng: StdRng,
    store: Box<dyn ScoreStore>,
    score_key: String,
}

impl GameSession {
    /// Creates an idle session. The high score is read from `store` right away.
    pub fn new(config: &GameConfig, store: Box<dyn ScoreStore>) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let high_score = store.read(&config.score_key);
        let grid = Grid::new(config.grid_size);
        info!(
            "new session on a {0}x{0} grid, high score {high_score}",
            grid.size()
        );

        Ok(GameSession {
            grid,
            snake: VecDeque::new(),
            food: None,
            input: InputBuffer::new(Direction::Right),
            score: 0,
            high_score,
            speed_ms: config.difficulty.base_interval(),
            status: Status::Idle,
            difficulty: config.difficulty,
            rng,
            store,
            score_key: config.score_key.clone(),
        })
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn speed_ms(&self) -> u64 {
        self.speed_ms
    }

    pub fn direction(&self) -> Direction {
        self.input.current()
    }

    pub fn next_direction(&self) -> Direction {
        self.input.pending()
    }

    pub fn snake(&self) -> &VecDeque<Cell> {
        &self.snake
    }

    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    pub fn store(&self) -> &dyn ScoreStore {
        self.store.as_ref()
    }

    /// Leaves `Idle`. Returns `false` (and does nothing) in any other state.
    pub fn start(&mut self, observer: &mut dyn SessionObserver) -> bool {
        if !self.status.is_idle() {
            debug!("start ignored while {}", self.status);
            return false;
        }
        self.seed_round(observer);
        true
    }

    /// Throws away the current round and begins a fresh one.
    pub fn restart(&mut self, observer: &mut dyn SessionObserver) {
        self.seed_round(observer);
    }

    /// Buffers a direction for the next tick. Ignored unless running.
    pub fn set_direction(&mut self, requested: Direction) -> bool {
        if !self.status.is_running() {
            return false;
        }
        self.input.set_direction(requested)
    }

    /// Runs one tick.
    pub fn advance(&mut self, observer: &mut dyn SessionObserver) -> TickOutcome {
        if !self.status.is_running() {
            return TickOutcome::Inactive;
        }
        let Some(&head) = self.snake.front() else {
            return TickOutcome::Inactive;
        };

        let direction = self.input.commit();
        let proposed = head + direction;
        let will_grow = self.food == Some(proposed);

        // Checked against the body before the tail moves.
        let hit = collision::check(&self.grid, proposed, &self.snake, will_grow);
        if !hit.is_safe() {
            debug!("{hit} collision at ({}, {})", proposed.x, proposed.y);
            self.finish(Status::GameOver, observer);
            return TickOutcome::Collided(hit);
        }

        self.snake.push_front(proposed);

        let outcome = if will_grow {
            self.score += POINTS_PER_FOOD;
            observer.on_score_changed(self.score);

            let new_interval = self.difficulty.next_interval(self.speed_ms, self.score);
            if let Some(interval) = new_interval {
                debug!("speed up: {} ms -> {interval} ms", self.speed_ms);
                self.speed_ms = interval;
            }

            self.food = self.spawn_food();
            if self.food.is_none() {
                self.finish(Status::Won, observer);
                return TickOutcome::Won;
            }
            TickOutcome::Ate {
                score: self.score,
                new_interval,
            }
        } else {
            self.snake.pop_back();
            TickOutcome::Moved
        };

        observer.on_tick(&self.snapshot());
        outcome
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid_size: self.grid.size(),
            snake: self.snake.iter().copied().collect(),
            food: self.food,
            direction: self.input.current(),
            score: self.score,
            high_score: self.high_score,
            speed_ms: self.speed_ms,
            status: self.status,
        }
    }

    fn seed_round(&mut self, observer: &mut dyn SessionObserver) {
        let center = self.grid.center();
        // Three cells trailing left of the head; pushed right on tiny boards.
        let head_x = center.x.max(2);
        self.snake.clear();
        self.snake.extend((0..3).map(|i| Cell::new(head_x - i, center.y)));
        self.input = InputBuffer::new(Direction::Right);
        self.score = 0;
        self.speed_ms = self.difficulty.base_interval();
        self.food = self.spawn_food();
        self.status = Status::Running;
        info!("round started, tick every {} ms", self.speed_ms);

        observer.on_score_changed(self.score);
        observer.on_tick(&self.snapshot());
    }

    /// Uniform rejection sampling over the board. `None` once the snake
    /// covers every cell, so the loop always has a free cell to find.
    fn spawn_food(&mut self) -> Option<Cell> {
        if self.snake.len() >= self.grid.cell_count() {
            return None;
        }
        let size = self.grid.size();
        loop {
            let candidate = Cell::new(self.rng.gen_range(0..size), self.rng.gen_range(0..size));
            if !self.snake.contains(&candidate) {
                return Some(candidate);
            }
        }
    }

    fn finish(&mut self, status: Status, observer: &mut dyn SessionObserver) {
        self.status = status;
        let is_new_high_score = self.score > self.high_score;
        if is_new_high_score {
            self.high_score = self.score;
            self.store.write(&self.score_key, self.high_score);
        }
        info!(
            "round ended ({status}) with score {}{}",
            self.score,
            if is_new_high_score { ", new high score" } else { "" }
        );

        match status {
            Status::Won => observer.on_won(self.score, is_new_high_score),
            _ => observer.on_game_over(self.score, is_new_high_score),
        }
        observer.on_tick(&self.snapshot());
    }

    /// Puts the session into an arbitrary running position.
    #[cfg(test)]
    pub(crate) fn arrange(
        &mut self,
        snake: &[(i32, i32)],
        direction: Direction,
        food: Option<(i32, i32)>,
    ) {
        self.snake = snake.iter().copied().map(Cell::from).collect();
        self.input = InputBuffer::new(direction);
        self.food = food.map(Cell::from);
        self.status = Status::Running;
    }

    #[cfg(test)]
    pub(crate) fn set_score(&mut self, score: u32) {
        self.score = score;
    }
}

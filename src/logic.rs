//! One simulation step of the game and the state a renderer reads.

use std::collections::VecDeque;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::actor::{Food, Position};
use crate::settings::Settings;
use crate::snake::{Direction, Snake};
use crate::store::ScoreStore;

pub const SNAKE_START: Position = Position::new(3, 3);
pub const FOOD_START: Position = Position::new(1, 1);

/// What happened during a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub ate_food: bool,
    /// Index of the segment the head landed on.
    pub bitten_at: Option<usize>,
    pub wrapped: bool,
}

/// Read-only view of the game handed to the renderer after each tick.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub head: Position,
    pub segments: &'a VecDeque<Position>,
    pub food: Position,
    pub score: u32,
    pub high_score: u32,
    pub new_high_score: bool,
    pub settings: &'a Settings,
}

impl Snapshot<'_> {
    pub fn board_size(&self) -> u32 {
        self.settings.board_size
    }
}

pub struct GameLogic<S, R> {
    settings: Settings,
    key: String,
    snake: Snake,
    food: Food,
    pending: Option<Direction>,
    score: u32,
    high_score: u32,
    high_score_streak: bool,
    store: S,
    rng: R,
}

impl<S: ScoreStore, R: Rng> GameLogic<S, R> {
    pub fn new(settings: Settings, store: S, rng: R) -> Self {
        let key = settings.key();
        let high_score = store.load(&key);
        info!(%key, high_score, "loaded high score");

        GameLogic {
            snake: Snake::new(SNAKE_START, settings.min_snake_length as usize),
            food: Food::new(FOOD_START),
            settings,
            key,
            pending: None,
            score: 0,
            high_score,
            high_score_streak: false,
            store,
            rng,
        }
    }

    /// Applies a turn request. A refused turn is kept and retried at the
    /// start of every tick until it goes through or a newer request
    /// replaces it.
    pub fn handle_control(&mut self, direction: Direction) {
        if self.snake.turn(direction) {
            self.pending = None;
        } else {
            debug!(?direction, "turn refused, buffering");
            self.pending = Some(direction);
        }
    }

    pub fn tick(&mut self) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if let Some(direction) = self.pending {
            self.handle_control(direction);
        }

        self.snake.advance();

        if self.snake.head() == self.food.position() {
            self.snake.grow(self.settings.feed_grow as usize);
            self.update_score();
            self.food.relocate(self.settings.board_size, &mut self.rng);
            debug!(length = self.snake.length(), food = ?self.food.position(), "ate food");
            outcome.ate_food = true;
        }

        // Only the nearest bite counts.
        if let Some(index) = self.snake.bitten_segment() {
            self.snake
                .truncate_at(index, self.settings.min_snake_length as usize);
            self.update_score();
            debug!(index, length = self.snake.length(), "bit own tail");
            outcome.bitten_at = Some(index);
        }

        let head = self.snake.head();
        let wrapped = Position::new(
            wrap(head.x, self.settings.board_size),
            wrap(head.y, self.settings.board_size),
        );
        if wrapped != head {
            self.snake.set_position(wrapped);
            outcome.wrapped = true;
        }

        outcome
    }

    fn update_score(&mut self) {
        let grown = self
            .snake
            .length()
            .saturating_sub(self.settings.min_snake_length as usize);
        self.score = u32::try_from(grown).unwrap_or(u32::MAX);
        if self.score > self.high_score {
            info!(score = self.score, previous = self.high_score, "new high score");
            self.high_score = self.score;
            if let Err(err) = self.store.store(&self.key, self.score) {
                warn!(error = %err, "failed to save high score");
            }
            self.high_score_streak = true;
        } else {
            self.high_score_streak = false;
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            head: self.snake.head(),
            segments: self.snake.segments(),
            food: self.food.position(),
            score: self.score,
            high_score: self.high_score,
            new_high_score: self.high_score_streak,
            settings: &self.settings,
        }
    }
}

impl<S, R> GameLogic<S, R> {
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &Food {
        &self.food
    }

    pub fn pending(&self) -> Option<Direction> {
        self.pending
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn is_high_score_streak(&self) -> bool {
        self.high_score_streak
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    #[cfg(test)]
    fn place(&mut self, head: Position, food: Position) {
        self.snake.set_position(head);
        self.food = Food::new(food);
    }
}

/// Moves a coordinate that stepped off one edge to the opposite edge.
/// In-range values are returned unchanged.
pub fn wrap(value: i32, board_size: u32) -> i32 {
    let size = board_size as i32;
    if value < 0 {
        size - 1
    } else if value >= size {
        0
    } else {
        value
    }
}

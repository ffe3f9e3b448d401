//! Snake simulation
//!
//! Positions are pixel coordinates snapped to a square grid. The body is an
//! ordered sequence of occupied cells: the head is the newest cell at the
//! back, the tail is evicted from the front.

use std::collections::VecDeque;

use glam::IVec2;
use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::event::GameEvent;
use crate::consts::{SNAKE_CELL, SNAKE_HEIGHT, SNAKE_INITIAL_LENGTH, SNAKE_WIDTH};

/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    /// Unit step, y grows downward
    pub fn delta(&self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }
}

/// Rectangular play field measured in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub width: i32,
    pub height: i32,
    pub cell: i32,
}

impl Default for Field {
    fn default() -> Self {
        Self {
            width: SNAKE_WIDTH,
            height: SNAKE_HEIGHT,
            cell: SNAKE_CELL,
        }
    }
}

impl Field {
    pub fn contains(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    pub fn center(&self) -> IVec2 {
        let snap = |v: i32| (v / 2 / self.cell) * self.cell;
        IVec2::new(snap(self.width), snap(self.height))
    }

    /// Every cell origin on the field, row by row
    pub fn cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        let cols = self.width / self.cell;
        let rows = self.height / self.cell;
        (0..rows).flat_map(move |r| (0..cols).map(move |c| IVec2::new(c * self.cell, r * self.cell)))
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snake {
    /// Occupied cells, tail at the front, head at the back
    body: VecDeque<IVec2>,
    heading: Direction,
    /// Accepted turn, applied on the next tick
    pending: Option<Direction>,
    /// Length the body trims to after each move
    target_len: usize,
}

impl Snake {
    /// A straight snake of `length` cells trailing behind `head`
    pub fn new(head: IVec2, heading: Direction, length: usize, cell: i32) -> Self {
        let length = length.max(1);
        let back = -heading.delta() * cell;
        let body = (0..length as i32).rev().map(|i| head + back * i).collect();
        Self {
            body,
            heading,
            pending: None,
            target_len: length,
        }
    }

    pub fn head(&self) -> IVec2 {
        // body is never empty: built with length >= 1 and only grows
        self.body.back().copied().unwrap_or_default()
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn pending(&self) -> Option<Direction> {
        self.pending
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Cells from tail to head
    pub fn cells(&self) -> impl DoubleEndedIterator<Item = &IVec2> {
        self.body.iter()
    }

    pub fn occupies(&self, pos: IVec2) -> bool {
        self.body.contains(&pos)
    }

    /// Request a turn for the next tick
    ///
    /// Checked against the heading the snake is moving in now, not against
    /// an earlier request from the same tick. Reversals and turns along the
    /// current axis are ignored.
    pub fn request_turn(&mut self, direction: Direction) -> bool {
        if direction == self.heading || direction.is_opposite(self.heading) {
            return false;
        }
        self.pending = Some(direction);
        true
    }

    /// Apply any pending turn and return the next head cell
    fn steer(&mut self, cell: i32) -> IVec2 {
        if let Some(turn) = self.pending.take() {
            self.heading = turn;
        }
        self.head() + self.heading.delta() * cell
    }

    /// Append the head and trim the tail down to the target length
    fn advance_to(&mut self, head: IVec2, grow: bool) {
        if grow {
            self.target_len += 1;
        }
        self.body.push_back(head);
        while self.body.len() > self.target_len {
            self.body.pop_front();
        }
    }

    /// Head shares a cell with any other segment
    fn head_hits_body(&self) -> bool {
        let head = self.head();
        self.body.iter().rev().skip(1).any(|c| *c == head)
    }
}

/// Why a snake session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnakeOutcome {
    /// Head left the play field
    Wall,
    /// Head ran into the body
    SelfCollision,
    /// No free cell left for food
    BoardFull,
}

/// Complete snake game state
#[derive(Debug, Clone)]
pub struct SnakeState {
    pub field: Field,
    pub snake: Snake,
    pub food: Option<IVec2>,
    pub score: u32,
    pub time_ticks: u64,
    outcome: Option<SnakeOutcome>,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl SnakeState {
    /// Fresh game: snake centered, heading right, food on a free cell
    pub fn new(seed: u64) -> Self {
        let field = Field::default();
        let snake = Snake::new(field.center(), Direction::Right, SNAKE_INITIAL_LENGTH, field.cell);
        let mut state = Self::with_snake(field, snake, None, seed);
        state.relocate_food();
        state
    }

    /// Build a state around an existing snake (for scenarios and tests)
    pub fn with_snake(field: Field, snake: Snake, food: Option<IVec2>, seed: u64) -> Self {
        Self {
            field,
            snake,
            food,
            score: 0,
            time_ticks: 0,
            outcome: None,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<SnakeOutcome> {
        self.outcome
    }

    pub fn request_turn(&mut self, direction: Direction) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.snake.request_turn(direction)
    }

    /// Take the events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance one cell
    pub fn tick(&mut self) {
        if self.is_terminal() {
            return;
        }
        self.time_ticks += 1;

        let next = self.snake.steer(self.field.cell);
        if !self.field.contains(next) {
            self.finish(SnakeOutcome::Wall);
            return;
        }

        let ate = self.food == Some(next);
        self.snake.advance_to(next, ate);

        if self.snake.head_hits_body() {
            self.finish(SnakeOutcome::SelfCollision);
            return;
        }

        if ate {
            self.score += 1;
            self.events.push(GameEvent::AteFood);
            self.relocate_food();
        }
    }

    /// Move the food to a random cell the snake does not occupy
    fn relocate_food(&mut self) {
        let free: Vec<IVec2> = self
            .field
            .cells()
            .filter(|c| !self.snake.occupies(*c))
            .collect();
        self.food = free.choose(&mut self.rng).copied();
        if self.food.is_none() {
            self.finish(SnakeOutcome::BoardFull);
        }
    }

    fn finish(&mut self, outcome: SnakeOutcome) {
        self.outcome = Some(outcome);
        if outcome != SnakeOutcome::BoardFull {
            self.events.push(GameEvent::Collided);
        }
        log::debug!(
            "Snake finished: {:?} after {} ticks, length {}",
            outcome,
            self.time_ticks,
            self.snake.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn state_at(head: IVec2, heading: Direction, len: usize, food: Option<IVec2>) -> SnakeState {
        let field = Field::default();
        SnakeState::with_snake(field, Snake::new(head, heading, len, field.cell), food, 1)
    }

    #[test]
    fn test_opposite_directions() {
        assert!(Direction::Up.is_opposite(Direction::Down));
        assert!(Direction::Left.is_opposite(Direction::Right));
        assert!(!Direction::Up.is_opposite(Direction::Left));
    }

    #[test]
    fn test_new_game_layout() {
        let state = SnakeState::new(3);
        assert_eq!(state.snake.head(), IVec2::new(300, 200));
        let cells: Vec<_> = state.snake.cells().copied().collect();
        assert_eq!(
            cells,
            [IVec2::new(260, 200), IVec2::new(280, 200), IVec2::new(300, 200)]
        );
        let food = state.food.unwrap();
        assert!(!state.snake.occupies(food));
        assert!(state.field.contains(food));
        assert_eq!(food.x % SNAKE_CELL, 0);
        assert_eq!(food.y % SNAKE_CELL, 0);
    }

    #[test]
    fn test_reversal_is_ignored() {
        let mut state = state_at(IVec2::new(100, 100), Direction::Right, 3, None);
        assert!(!state.request_turn(Direction::Left));
        state.tick();
        assert_eq!(state.snake.head(), IVec2::new(120, 100));
        assert_eq!(state.snake.heading(), Direction::Right);
    }

    #[test]
    fn test_turn_applies_on_next_tick() {
        let mut state = state_at(IVec2::new(100, 100), Direction::Right, 3, None);
        assert!(state.request_turn(Direction::Down));
        assert_eq!(state.snake.heading(), Direction::Right);
        state.tick();
        assert_eq!(state.snake.head(), IVec2::new(100, 120));
        assert_eq!(state.snake.heading(), Direction::Down);
    }

    #[test]
    fn test_double_press_checks_current_heading() {
        // Up is accepted, Left is a reversal of the current heading (Right)
        // even though the pending turn is Up
        let mut state = state_at(IVec2::new(100, 100), Direction::Right, 3, None);
        assert!(state.request_turn(Direction::Up));
        assert!(!state.request_turn(Direction::Left));
        assert_eq!(state.snake.pending(), Some(Direction::Up));
        state.tick();
        assert_eq!(state.snake.head(), IVec2::new(100, 80));
        assert!(!state.is_terminal());
    }

    #[test]
    fn test_food_grows_snake() {
        let mut state = state_at(IVec2::new(100, 100), Direction::Right, 3, Some(IVec2::new(120, 100)));
        state.tick();
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), 4);
        assert_eq!(state.drain_events(), vec![GameEvent::AteFood]);
        let food = state.food.unwrap();
        assert!(!state.snake.occupies(food));

        state.food = None;
        state.tick();
        assert_eq!(state.snake.len(), 4);
    }

    #[test]
    fn test_wall_collision() {
        let mut state = state_at(IVec2::new(0, 100), Direction::Left, 3, None);
        state.tick();
        assert_eq!(state.outcome(), Some(SnakeOutcome::Wall));
        assert!(state.drain_events().contains(&GameEvent::Collided));
    }

    #[test]
    fn test_self_collision() {
        // Body: (20,100) .. (100,100) heading right
        let mut state = state_at(IVec2::new(100, 100), Direction::Right, 5, None);
        state.request_turn(Direction::Down);
        state.tick();
        state.request_turn(Direction::Left);
        state.tick();
        state.request_turn(Direction::Up);
        state.tick();
        assert_eq!(state.outcome(), Some(SnakeOutcome::SelfCollision));
    }

    #[test]
    fn test_moving_into_vacated_tail_is_safe() {
        // A 4-cell loop: the head takes the cell the tail leaves this tick
        let mut state = state_at(IVec2::new(100, 100), Direction::Right, 4, None);
        state.request_turn(Direction::Down);
        state.tick();
        state.request_turn(Direction::Left);
        state.tick();
        state.request_turn(Direction::Up);
        state.tick();
        assert!(!state.is_terminal());
    }

    #[test]
    fn test_board_full_is_terminal() {
        let field = Field {
            width: 40,
            height: 20,
            cell: 20,
        };
        let snake = Snake::new(IVec2::new(0, 0), Direction::Right, 1, 20);
        let mut state = SnakeState::with_snake(field, snake, Some(IVec2::new(20, 0)), 9);
        state.tick();
        assert_eq!(state.snake.len(), 2);
        assert_eq!(state.outcome(), Some(SnakeOutcome::BoardFull));
        assert!(state.food.is_none());
    }

    #[test]
    fn test_terminal_state_is_frozen() {
        let mut state = state_at(IVec2::new(0, 100), Direction::Left, 3, None);
        state.tick();
        let head = state.snake.head();
        state.tick();
        assert_eq!(state.snake.head(), head);
        assert!(!state.request_turn(Direction::Up));
    }

    proptest! {
        #[test]
        fn prop_body_distinct_and_growth_counts_food(
            seed in any::<u64>(),
            turns in proptest::collection::vec(0usize..4, 1..200)
        ) {
            let mut state = SnakeState::new(seed);
            let initial = state.snake.len();
            for t in turns {
                state.request_turn(Direction::ALL[t]);
                state.tick();
                if state.is_terminal() {
                    break;
                }
                let mut seen = std::collections::HashSet::new();
                prop_assert!(state.snake.cells().all(|c| seen.insert(*c)));
                prop_assert_eq!(state.snake.len(), initial + state.score as usize);
                if let Some(food) = state.food {
                    prop_assert!(!state.snake.occupies(food));
                }
            }
        }
    }
}

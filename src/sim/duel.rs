//! Grid duel: two seats taking turns on a shared board
//!
//! Against the computer, its reply is delayed by a tick cooldown instead of
//! blocking, so input and rendering stay live while it "thinks".

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::event::GameEvent;
use super::grid::{Board, Cell, Mark, select_move};

/// Who occupies the second seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Opponent {
    Human,
    #[default]
    Computer,
}

/// How a finished match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuelOutcome {
    Won { seat: usize, mark: Mark },
    Draw,
}

/// Turn phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuelPhase {
    /// Waiting for the seat to move
    AwaitingMove { seat: usize },
    /// Computer cooldown, moves when `ticks_left` reaches zero
    ComputerThinking { ticks_left: u32 },
    Finished(DuelOutcome),
}

/// Seat index of the player who moves first
pub const FIRST_SEAT: usize = 0;
const COMPUTER_SEAT: usize = 1;

/// Complete grid duel state
#[derive(Debug, Clone)]
pub struct Duel {
    pub board: Board,
    pub opponent: Opponent,
    /// Mark held by each seat
    marks: [Mark; 2],
    phase: DuelPhase,
    thinking_ticks: u32,
    pub time_ticks: u64,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl Duel {
    /// Marks are shuffled between the seats; seat 0 moves first
    pub fn new(size: usize, opponent: Opponent, thinking_ticks: u32, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut marks = [Mark::X, Mark::O];
        marks.shuffle(&mut rng);
        Self {
            board: Board::new(size),
            opponent,
            marks,
            phase: DuelPhase::AwaitingMove { seat: FIRST_SEAT },
            thinking_ticks,
            time_ticks: 0,
            rng,
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> DuelPhase {
        self.phase
    }

    pub fn mark_of(&self, seat: usize) -> Mark {
        self.marks[seat % 2]
    }

    pub fn seat_name(&self, seat: usize) -> &'static str {
        match (self.opponent, seat % 2) {
            (Opponent::Computer, 0) => "Player",
            (Opponent::Computer, _) => "Computer",
            (Opponent::Human, 0) => "Player 1",
            (Opponent::Human, _) => "Player 2",
        }
    }

    pub fn outcome(&self) -> Option<DuelOutcome> {
        match self.phase {
            DuelPhase::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }

    /// Seat whose move it is (the computer's seat while thinking)
    pub fn seat_to_move(&self) -> Option<usize> {
        match self.phase {
            DuelPhase::AwaitingMove { seat } => Some(seat),
            DuelPhase::ComputerThinking { .. } => Some(COMPUTER_SEAT),
            DuelPhase::Finished(_) => None,
        }
    }

    /// Line shown at game over
    pub fn result_text(&self) -> String {
        match self.outcome() {
            Some(DuelOutcome::Won { seat, .. }) => format!("{} won the game!!", self.seat_name(seat)),
            Some(DuelOutcome::Draw) => "Match Drawn!!".to_string(),
            None => String::new(),
        }
    }

    /// A human move on `cell`. Ignored when it is not a human's turn or the
    /// cell is taken.
    pub fn place(&mut self, cell: Cell) -> bool {
        let DuelPhase::AwaitingMove { seat } = self.phase else {
            return false;
        };
        if self.is_computer(seat) {
            return false;
        }
        self.apply(seat, cell)
    }

    /// Take the events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance the thinking cooldown
    pub fn tick(&mut self) {
        if self.is_terminal() {
            return;
        }
        self.time_ticks += 1;

        if let DuelPhase::ComputerThinking { ticks_left } = self.phase {
            if ticks_left > 0 {
                self.phase = DuelPhase::ComputerThinking {
                    ticks_left: ticks_left - 1,
                };
                return;
            }
            let mover = self.mark_of(COMPUTER_SEAT);
            let reply = select_move(&self.board, mover, mover.other(), &mut self.rng);
            match reply {
                Some(cell) => {
                    log::debug!("Computer plays {:?}", cell);
                    self.apply(COMPUTER_SEAT, cell);
                }
                None => self.finish(DuelOutcome::Draw),
            }
        }
    }

    fn is_computer(&self, seat: usize) -> bool {
        self.opponent == Opponent::Computer && seat == COMPUTER_SEAT
    }

    fn apply(&mut self, seat: usize, cell: Cell) -> bool {
        let mark = self.mark_of(seat);
        if !self.board.place(cell, mark) {
            return false;
        }
        self.events.push(GameEvent::MarkPlaced(mark));

        if let Some(winner) = self.board.winner() {
            self.finish(DuelOutcome::Won { seat, mark: winner });
        } else if self.board.is_full() {
            self.finish(DuelOutcome::Draw);
        } else {
            let next = 1 - seat;
            self.phase = if self.is_computer(next) {
                DuelPhase::ComputerThinking {
                    ticks_left: self.thinking_ticks,
                }
            } else {
                DuelPhase::AwaitingMove { seat: next }
            };
        }
        true
    }

    fn finish(&mut self, outcome: DuelOutcome) {
        self.phase = DuelPhase::Finished(outcome);
        self.events.push(GameEvent::MatchDecided);
        log::debug!("Duel finished: {:?}", outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pvp() -> Duel {
        Duel::new(3, Opponent::Human, 0, 11)
    }

    #[test]
    fn test_marks_are_distinct() {
        for seed in 0..10 {
            let duel = Duel::new(3, Opponent::Human, 0, seed);
            assert_ne!(duel.mark_of(0), duel.mark_of(1));
        }
    }

    #[test]
    fn test_pvp_turns_alternate() {
        let mut duel = pvp();
        assert_eq!(duel.seat_to_move(), Some(0));
        assert!(duel.place(Cell::new(0, 0)));
        assert_eq!(duel.seat_to_move(), Some(1));
        assert!(duel.place(Cell::new(1, 1)));
        assert_eq!(duel.board.get(Cell::new(0, 0)), Some(duel.mark_of(0)));
        assert_eq!(duel.board.get(Cell::new(1, 1)), Some(duel.mark_of(1)));
    }

    #[test]
    fn test_occupied_cell_is_ignored() {
        let mut duel = pvp();
        duel.place(Cell::new(0, 0));
        assert!(!duel.place(Cell::new(0, 0)));
        assert_eq!(duel.seat_to_move(), Some(1));
    }

    #[test]
    fn test_pvp_win() {
        let mut duel = pvp();
        for (r, c) in [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)] {
            duel.place(Cell::new(r, c));
        }
        assert_eq!(
            duel.outcome(),
            Some(DuelOutcome::Won {
                seat: 0,
                mark: duel.mark_of(0)
            })
        );
        assert_eq!(duel.result_text(), "Player 1 won the game!!");
        assert!(!duel.place(Cell::new(2, 2)));
    }

    #[test]
    fn test_draw() {
        let mut duel = pvp();
        for (r, c) in [
            (0, 0),
            (0, 1),
            (0, 2),
            (1, 1),
            (1, 0),
            (1, 2),
            (2, 1),
            (2, 0),
            (2, 2),
        ] {
            duel.place(Cell::new(r, c));
        }
        assert_eq!(duel.outcome(), Some(DuelOutcome::Draw));
        assert_eq!(duel.result_text(), "Match Drawn!!");
    }

    #[test]
    fn test_computer_thinks_before_moving() {
        let mut duel = Duel::new(3, Opponent::Computer, 3, 5);
        assert!(duel.place(Cell::new(1, 1)));
        assert_eq!(duel.phase(), DuelPhase::ComputerThinking { ticks_left: 3 });

        // Player can't move while the computer thinks
        assert!(!duel.place(Cell::new(0, 0)));

        for _ in 0..3 {
            duel.tick();
            assert_eq!(duel.board.empty_cells().len(), 8);
        }
        duel.tick();
        assert_eq!(duel.board.empty_cells().len(), 7);
        assert_eq!(duel.seat_to_move(), Some(0));
    }

    #[test]
    fn test_computer_blocks() {
        let mut duel = Duel::new(3, Opponent::Computer, 0, 2);
        duel.place(Cell::new(0, 0));
        duel.tick();
        // Find a second player move that threatens a row the computer hasn't blocked
        let top_row_open = duel.board.get(Cell::new(0, 1)).is_none()
            && duel.board.get(Cell::new(0, 2)).is_none();
        let threat = if top_row_open {
            Cell::new(0, 1)
        } else {
            Cell::new(1, 0)
        };
        duel.place(threat);
        duel.tick();
        let blocked = if threat == Cell::new(0, 1) {
            Cell::new(0, 2)
        } else {
            Cell::new(2, 0)
        };
        assert_eq!(duel.board.get(blocked), Some(duel.mark_of(1)));
    }

    #[test]
    fn test_events_emitted() {
        let mut duel = pvp();
        duel.place(Cell::new(2, 2));
        assert_eq!(duel.drain_events(), vec![GameEvent::MarkPlaced(duel.mark_of(0))]);
    }
}

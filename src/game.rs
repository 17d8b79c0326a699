//! Local turn coordinator: one human seat against the targeting engine.
//!
//! Tick-driven and clock-injected: the surrounding event loop passes a
//! millisecond timestamp into [`LocalGame::fire`] and [`LocalGame::tick`],
//! and the coordinator arms the opponent's think delay against it. All
//! state lives on one thread; nothing here blocks.

use alloc::vec::Vec;

use rand::rngs::SmallRng;

use crate::board::Board;
use crate::common::{Coord, MatchEnd, ShotResult, TurnError};
use crate::targeting::{Difficulty, FollowUp, TargetingState};

/// Whose action the coordinator is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// Waiting for the player to pick a target.
    AwaitingPlayer,
    /// The opponent's pending turn timer is armed.
    EnemyThinking { since_ms: u64 },
    /// Match finished.
    Over(MatchEnd),
}

/// One resolved shot, for the render layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotReport {
    pub coord: Coord,
    pub result: ShotResult,
    /// Name of the ship this shot finished off, if any.
    pub sunk: Option<&'static str>,
}

/// A single-player match against the engine.
pub struct LocalGame {
    /// The player's fleet; the engine fires at this.
    player_board: Board,
    /// The opponent's fleet; the player fires at this.
    enemy_board: Board,
    difficulty: Difficulty,
    targeting: TargetingState,
    rng: SmallRng,
    think_delay_ms: u64,
    turn: TurnState,
}

impl LocalGame {
    /// Start a match over two prepared boards. Ship placement happens before
    /// this, through the board API or the surrounding placement UI.
    pub fn new(
        player_board: Board,
        enemy_board: Board,
        difficulty: Difficulty,
        think_delay_ms: u64,
        rng: SmallRng,
    ) -> Self {
        LocalGame {
            player_board,
            enemy_board,
            difficulty,
            targeting: TargetingState::new(),
            rng,
            think_delay_ms,
            turn: TurnState::AwaitingPlayer,
        }
    }

    pub fn player_board(&self) -> &Board {
        &self.player_board
    }

    pub fn enemy_board(&self) -> &Board {
        &self.enemy_board
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn turn(&self) -> TurnState {
        self.turn
    }

    pub fn outcome(&self) -> Option<MatchEnd> {
        match self.turn {
            TurnState::Over(end) => Some(end),
            _ => None,
        }
    }

    /// Resolve the player's shot against the enemy fleet, then either end
    /// the match or arm the opponent's turn timer.
    pub fn fire(&mut self, coord: Coord, now_ms: u64) -> Result<ShotReport, TurnError> {
        match self.turn {
            TurnState::AwaitingPlayer => {}
            TurnState::EnemyThinking { .. } => return Err(TurnError::NotYourTurn),
            TurnState::Over(_) => return Err(TurnError::MatchOver),
        }
        let result = self.enemy_board.fire(coord)?;
        let sunk = match result {
            ShotResult::Hit => self.enemy_board.sunk_ship_at(coord).map(|s| s.class().name()),
            ShotResult::Miss => None,
        };
        if self.enemy_board.cells_remaining() == 0 {
            self.turn = TurnState::Over(MatchEnd::Won);
        } else {
            self.turn = TurnState::EnemyThinking { since_ms: now_ms };
        }
        Ok(ShotReport {
            coord,
            result,
            sunk,
        })
    }

    /// Advance the opponent's pending turn. Once the think delay has
    /// elapsed the engine is invoked exactly once; the returned reports
    /// carry two entries only when the hard engine takes its reversal shot.
    pub fn tick(&mut self, now_ms: u64) -> Vec<ShotReport> {
        let since_ms = match self.turn {
            TurnState::EnemyThinking { since_ms } => since_ms,
            _ => return Vec::new(),
        };
        if now_ms.saturating_sub(since_ms) < self.think_delay_ms {
            return Vec::new();
        }

        let mut reports = Vec::new();
        let mut next =
            self.targeting
                .select_target(self.difficulty, self.player_board.grid(), &mut self.rng);
        while let Some(coord) = next.take() {
            let result = match self.player_board.fire(coord) {
                Ok(result) => result,
                // Unreachable by the engine's contract; never re-fire.
                Err(_) => break,
            };
            let sunk = match result {
                ShotResult::Hit => self.player_board.sunk_ship_at(coord),
                ShotResult::Miss => None,
            };
            reports.push(ShotReport {
                coord,
                result,
                sunk: sunk.map(|s| s.class().name()),
            });
            let follow = self.targeting.observe(
                self.difficulty,
                self.player_board.grid(),
                coord,
                result,
                sunk.is_some(),
            );
            if self.player_board.cells_remaining() == 0 {
                self.turn = TurnState::Over(MatchEnd::Lost);
                return reports;
            }
            if let FollowUp::FireNow(target) = follow {
                next = Some(target);
            }
        }
        self.turn = TurnState::AwaitingPlayer;
        reports
    }
}

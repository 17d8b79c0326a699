//! Networked turn coordinator: a symmetric peer driving a request/response
//! shot exchange over a non-blocking message channel.
//!
//! Each side owns only its own board and an attack grid recording what it
//! knows about the opponent's waters. A shot goes out as a message, the
//! coordinator refuses further local firing until the result comes back,
//! applies the result exactly as the local path would, and only then yields
//! the turn. A disconnect can arrive at any point and is terminal.
//!
//! If a result never arrives the coordinator stays awaiting it; there is no
//! timeout here on purpose.

use alloc::vec::Vec;

use rand::rngs::SmallRng;

use crate::board::Board;
use crate::common::{Coord, MatchEnd, ShotResult, TurnError};
use crate::grid::{Cell, Grid};
use crate::protocol::{Message, PeerChannel};
use crate::targeting::{Difficulty, FollowUp, TargetingState};

/// Who controls the local seat.
pub enum Seat {
    /// Shots are queued by the surrounding application.
    Human,
    /// The targeting engine picks shots automatically.
    Engine {
        difficulty: Difficulty,
        state: TargetingState,
        rng: SmallRng,
    },
}

impl Seat {
    /// An engine seat with fresh hunt state.
    pub fn engine(difficulty: Difficulty, rng: SmallRng) -> Self {
        Seat::Engine {
            difficulty,
            state: TargetingState::new(),
            rng,
        }
    }
}

/// Things that happened during a tick, for the render layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteEvent {
    /// Our in-flight shot came back resolved.
    ShotResolved { coord: Coord, result: ShotResult },
    /// The peer fired at our board.
    IncomingShot { coord: Coord, result: ShotResult },
    /// Match ended.
    Ended(MatchEnd),
}

/// One side of a peer-to-peer match.
pub struct RemoteGame<C: PeerChannel> {
    channel: C,
    /// Our fleet, fired at by the peer.
    board: Board,
    /// What we know of the peer's waters: empty, hit or miss. The engine
    /// seat uses this as its board-facing view.
    attacks: Grid,
    /// Peer ship cells we have not hit yet.
    enemy_cells: usize,
    seat: Seat,
    my_turn: bool,
    in_flight: Option<Coord>,
    /// Carry for the engine's reversal shot: the alternation does not allow
    /// a second send this turn, so it becomes our next shot instead.
    forced_next: Option<Coord>,
    end: Option<MatchEnd>,
}

impl<C: PeerChannel> RemoteGame<C> {
    /// Start a match. `enemy_fleet_cells` is the agreed total of the peer's
    /// ship cells; `first_turn` is true on the hosting side (the host fires
    /// first).
    pub fn new(
        board: Board,
        enemy_fleet_cells: usize,
        seat: Seat,
        channel: C,
        first_turn: bool,
    ) -> Self {
        let attacks = Grid::new(board.size());
        RemoteGame {
            channel,
            board,
            attacks,
            enemy_cells: enemy_fleet_cells,
            seat,
            my_turn: first_turn,
            in_flight: None,
            forced_next: None,
            end: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn attacks(&self) -> &Grid {
        &self.attacks
    }

    pub fn my_turn(&self) -> bool {
        self.my_turn
    }

    /// A shot has been sent and its result not yet received.
    pub fn awaiting_result(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn outcome(&self) -> Option<MatchEnd> {
        self.end
    }

    /// Queue the human seat's shot for sending.
    pub fn queue_shot(&mut self, coord: Coord) -> Result<(), TurnError> {
        if self.end.is_some() {
            return Err(TurnError::MatchOver);
        }
        if !self.my_turn || self.in_flight.is_some() {
            return Err(TurnError::NotYourTurn);
        }
        if !self.attacks.get(coord)?.is_untried() {
            return Err(TurnError::Board(crate::common::BoardError::AlreadyFired {
                row: coord.0,
                col: coord.1,
            }));
        }
        self.send_shot(coord);
        Ok(())
    }

    /// Drive the coordinator one tick: let the engine seat act if the turn
    /// is ours, then apply at most one queued peer message.
    pub fn tick(&mut self) -> Vec<RemoteEvent> {
        let mut events = Vec::new();
        if self.end.is_some() {
            return events;
        }

        if self.my_turn && self.in_flight.is_none() {
            let planned = match &mut self.seat {
                Seat::Engine {
                    difficulty,
                    state,
                    rng,
                } => self
                    .forced_next
                    .take()
                    .or_else(|| state.select_target(*difficulty, &self.attacks, rng)),
                Seat::Human => None,
            };
            if let Some(coord) = planned {
                self.send_shot(coord);
            }
        }
        if self.end.is_some() {
            events.push(RemoteEvent::Ended(MatchEnd::OpponentLeft));
            return events;
        }

        let Some(msg) = self.channel.try_recv() else {
            return events;
        };
        match msg {
            Message::Disconnect => {
                self.end = Some(MatchEnd::OpponentLeft);
                events.push(RemoteEvent::Ended(MatchEnd::OpponentLeft));
            }
            Message::Result { hit } => self.apply_result(hit, &mut events),
            Message::Shot { row, col } => {
                self.apply_incoming((row as usize, col as usize), &mut events)
            }
        }
        events
    }

    fn send_shot(&mut self, coord: Coord) {
        let msg = Message::Shot {
            row: coord.0 as u8,
            col: coord.1 as u8,
        };
        if self.channel.send(msg).is_err() {
            self.end = Some(MatchEnd::OpponentLeft);
            return;
        }
        self.in_flight = Some(coord);
    }

    /// The result for our in-flight shot arrived.
    fn apply_result(&mut self, hit: bool, events: &mut Vec<RemoteEvent>) {
        let Some(coord) = self.in_flight.take() else {
            // A result with no shot outstanding is unroutable; drop it.
            return;
        };
        let (result, mark) = if hit {
            (ShotResult::Hit, Cell::Hit)
        } else {
            (ShotResult::Miss, Cell::Miss)
        };
        if self.attacks.mark(coord, mark).is_err() {
            // The coordinate was vetted before sending; nothing sane to do.
            return;
        }
        if hit {
            self.enemy_cells = self.enemy_cells.saturating_sub(1);
        }
        events.push(RemoteEvent::ShotResolved { coord, result });

        if let Seat::Engine {
            difficulty, state, ..
        } = &mut self.seat
        {
            // No sunk reports cross the wire; the hard engine's reversal
            // machinery covers ship endings.
            if let FollowUp::FireNow(next) =
                state.observe(*difficulty, &self.attacks, coord, result, false)
            {
                self.forced_next = Some(next);
            }
        }

        if self.enemy_cells == 0 {
            self.end = Some(MatchEnd::Won);
            events.push(RemoteEvent::Ended(MatchEnd::Won));
            return;
        }
        self.my_turn = false;
    }

    /// The peer fired at our board.
    fn apply_incoming(&mut self, coord: Coord, events: &mut Vec<RemoteEvent>) {
        let result = match self.board.fire(coord) {
            Ok(result) => result,
            // Out-of-contract coordinate; message integrity is the
            // transport's job, so skip rather than crash.
            Err(_) => return,
        };
        events.push(RemoteEvent::IncomingShot { coord, result });
        if self
            .channel
            .send(Message::Result {
                hit: result.is_hit(),
            })
            .is_err()
        {
            self.end = Some(MatchEnd::OpponentLeft);
            events.push(RemoteEvent::Ended(MatchEnd::OpponentLeft));
            return;
        }
        if self.board.cells_remaining() == 0 {
            self.end = Some(MatchEnd::Lost);
            events.push(RemoteEvent::Ended(MatchEnd::Lost));
            return;
        }
        self.my_turn = true;
    }
}

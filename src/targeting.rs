//! The opponent targeting engine: rule-driven selection of the next shot.
//!
//! Three strategies share one state value. `Easy` fires at random untried
//! cells and keeps no memory. `Medium` additionally queues the neighbors of
//! every hit and works through that queue before falling back to random
//! fire. `Hard` runs the full hunt-and-destroy machine: random search until
//! a hit, orientation probing around that first hit, line-following once a
//! second hit locks the axis, and a single reversal shot from the origin
//! when the line overshoots the far end of the ship.
//!
//! Decisions and observations are split into [`TargetingState::select_target`]
//! and [`TargetingState::observe`] so the same engine drives both the local
//! coordinator (shot resolved immediately) and the networked one (shot sent
//! to the peer, result observed when the reply arrives). The engine never
//! yields an out-of-bounds or already-tried coordinate.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use rand::Rng;

use crate::common::{Coord, ShotResult};
use crate::grid::Grid;

/// Strategy tier, chosen by the surrounding application once per turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// An orthogonal step on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Direction {
    dr: i8,
    dc: i8,
}

impl Direction {
    pub const UP: Direction = Direction { dr: -1, dc: 0 };
    pub const DOWN: Direction = Direction { dr: 1, dc: 0 };
    pub const LEFT: Direction = Direction { dr: 0, dc: -1 };
    pub const RIGHT: Direction = Direction { dr: 0, dc: 1 };

    /// Probe order around a fresh hit. Fixed so seeded games replay
    /// identically.
    pub const PROBE_ORDER: [Direction; 4] = [
        Direction::UP,
        Direction::DOWN,
        Direction::LEFT,
        Direction::RIGHT,
    ];

    pub fn opposite(self) -> Self {
        Direction {
            dr: -self.dr,
            dc: -self.dc,
        }
    }

    /// Row/column deltas.
    pub fn delta(self) -> (i8, i8) {
        (self.dr, self.dc)
    }

    /// One step from `from`, or `None` when it would cross the top or left
    /// edge. The right and bottom edges are the grid's bounds check.
    pub fn step(self, from: Coord) -> Option<Coord> {
        let row = from.0.checked_add_signed(self.dr as isize)?;
        let col = from.1.checked_add_signed(self.dc as isize)?;
        Some((row, col))
    }
}

/// Sub-phase of destroy mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DestroyPhase {
    /// Orientation unknown. `firing` is the probe direction whose shot is in
    /// flight between a decision and its observation.
    Probe { firing: Option<Direction> },
    /// Orientation locked; shots follow `dir` from the latest hit.
    Follow { dir: Direction },
    /// The one reversal shot is in flight; destroy ends when it resolves,
    /// whatever the outcome.
    Reverse { dir: Direction },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Destroy {
    /// First confirmed hit on the ship under attack.
    origin: Coord,
    /// Anchor for line-following; most recent confirmed hit.
    last_hit: Coord,
    /// Probe directions not yet consumed.
    pending: VecDeque<Direction>,
    phase: DestroyPhase,
}

impl Destroy {
    fn begin(origin: Coord) -> Self {
        Destroy {
            origin,
            last_hit: origin,
            pending: Direction::PROBE_ORDER.iter().copied().collect(),
            phase: DestroyPhase::Probe { firing: None },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Search,
    Destroy(Destroy),
}

/// What the caller must do after feeding back a shot result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    /// Nothing further this turn.
    None,
    /// The reversal shot: resolve (or send) this coordinate before the turn
    /// ends. The only case where one engine invocation spans two shots.
    FireNow(Coord),
}

/// Mutable hunt state carried between turns.
///
/// Reset at match start and whenever the caller reports the targeted ship
/// sunk. All destroy-mode fields live inside the `Destroy` variant, so
/// search mode carries none of them by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetingState {
    mode: Mode,
    /// Medium-mode queue of cells adjacent to prior hits. Not a destroy
    /// field: it survives sunk reports and only a match reset clears it.
    target_queue: VecDeque<Coord>,
}

impl Default for TargetingState {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetingState {
    pub fn new() -> Self {
        TargetingState {
            mode: Mode::Search,
            target_queue: VecDeque::new(),
        }
    }

    /// Back to the initial state: searching, nothing queued.
    pub fn reset(&mut self) {
        *self = TargetingState::new();
    }

    /// True while no ship is being actively destroyed.
    pub fn is_searching(&self) -> bool {
        matches!(self.mode, Mode::Search)
    }

    /// First hit on the ship currently under attack, if any.
    pub fn destroy_origin(&self) -> Option<Coord> {
        match &self.mode {
            Mode::Destroy(d) => Some(d.origin),
            Mode::Search => None,
        }
    }

    /// Anchor of the line-following logic, if destroying.
    pub fn last_hit(&self) -> Option<Coord> {
        match &self.mode {
            Mode::Destroy(d) => Some(d.last_hit),
            Mode::Search => None,
        }
    }

    /// The confirmed ship axis, once a second hit locked it.
    pub fn locked_direction(&self) -> Option<Direction> {
        match &self.mode {
            Mode::Destroy(d) => match d.phase {
                DestroyPhase::Follow { dir } | DestroyPhase::Reverse { dir } => Some(dir),
                DestroyPhase::Probe { .. } => None,
            },
            Mode::Search => None,
        }
    }

    /// Probe directions not yet consumed while the orientation is unknown.
    pub fn pending_probes(&self) -> usize {
        match &self.mode {
            Mode::Destroy(d) if matches!(d.phase, DestroyPhase::Probe { .. }) => d.pending.len(),
            _ => 0,
        }
    }

    /// Number of queued medium-mode targets.
    pub fn queued_targets(&self) -> usize {
        self.target_queue.len()
    }

    /// Pick the next coordinate to fire at. Never yields an out-of-bounds or
    /// already-tried coordinate; `None` only when `view` has no untried cell
    /// left.
    pub fn select_target<R: Rng + ?Sized>(
        &mut self,
        difficulty: Difficulty,
        view: &Grid,
        rng: &mut R,
    ) -> Option<Coord> {
        match difficulty {
            Difficulty::Easy => random_untried(view, rng),
            Difficulty::Medium => {
                // Stale entries (fired upon since they were queued) are
                // discarded within the same turn.
                while let Some(coord) = self.target_queue.pop_front() {
                    if view.is_untried(coord) {
                        return Some(coord);
                    }
                }
                random_untried(view, rng)
            }
            Difficulty::Hard => self.select_hard(view, rng),
        }
    }

    fn select_hard<R: Rng + ?Sized>(&mut self, view: &Grid, rng: &mut R) -> Option<Coord> {
        if let Mode::Destroy(destroy) = &mut self.mode {
            match destroy.phase {
                DestroyPhase::Probe { .. } => {
                    while let Some(dir) = destroy.pending.pop_front() {
                        if let Some(target) = dir.step(destroy.origin) {
                            if view.is_untried(target) {
                                destroy.phase = DestroyPhase::Probe { firing: Some(dir) };
                                return Some(target);
                            }
                        }
                    }
                    // Every direction around the origin is blocked; give up
                    // on this ship.
                }
                DestroyPhase::Follow { dir } => {
                    if let Some(target) = dir.step(destroy.last_hit) {
                        if view.is_untried(target) {
                            return Some(target);
                        }
                    }
                    // The line ran into an edge or an old shot without an
                    // observed miss; the ship is abandoned here.
                }
                DestroyPhase::Reverse { .. } => {
                    // A reversal shot should have been resolved through
                    // observe(); recover by restarting the search.
                }
            }
            self.mode = Mode::Search;
        }
        random_untried(view, rng)
    }

    /// Feed back the outcome of a resolved shot.
    ///
    /// `sunk` is supplied by callers that can scan the hit ship's coordinate
    /// set; callers without sunk information (the wire carries only
    /// hit/miss) pass `false` and rely on the overshoot machinery.
    pub fn observe(
        &mut self,
        difficulty: Difficulty,
        view: &Grid,
        coord: Coord,
        result: ShotResult,
        sunk: bool,
    ) -> FollowUp {
        match difficulty {
            Difficulty::Easy => FollowUp::None,
            Difficulty::Medium => {
                if result.is_hit() {
                    self.enqueue_neighbors(view, coord);
                }
                FollowUp::None
            }
            Difficulty::Hard => self.observe_hard(view, coord, result, sunk),
        }
    }

    fn observe_hard(
        &mut self,
        view: &Grid,
        coord: Coord,
        result: ShotResult,
        sunk: bool,
    ) -> FollowUp {
        if sunk {
            // Ship confirmed destroyed, whichever branch hit it last.
            self.mode = Mode::Search;
            return FollowUp::None;
        }
        let Mode::Destroy(destroy) = &mut self.mode else {
            if result.is_hit() {
                self.mode = Mode::Destroy(Destroy::begin(coord));
            }
            return FollowUp::None;
        };
        match destroy.phase {
            DestroyPhase::Probe { firing } => {
                if result.is_hit() {
                    destroy.last_hit = coord;
                    if let Some(dir) = firing {
                        destroy.phase = DestroyPhase::Follow { dir };
                    }
                } else {
                    // One direction consumed per fired probe.
                    destroy.phase = DestroyPhase::Probe { firing: None };
                }
                return FollowUp::None;
            }
            DestroyPhase::Follow { dir } => {
                if result.is_hit() {
                    destroy.last_hit = coord;
                    return FollowUp::None;
                }
                // Overshot the far end: turn around at the origin and take
                // the one reversal shot, then stand down either way.
                let back = dir.opposite();
                destroy.last_hit = destroy.origin;
                if let Some(target) = back.step(destroy.origin) {
                    if view.is_untried(target) {
                        destroy.phase = DestroyPhase::Reverse { dir: back };
                        return FollowUp::FireNow(target);
                    }
                }
            }
            DestroyPhase::Reverse { .. } => {}
        }
        // Follow-miss with no viable reversal, or the reversal shot
        // resolved: destroy ends for this ship.
        self.mode = Mode::Search;
        FollowUp::None
    }

    /// Queue the untried orthogonal neighbors of a hit for later
    /// medium-mode shots. Bounds-checked, deduplicated.
    fn enqueue_neighbors(&mut self, view: &Grid, coord: Coord) {
        for dir in Direction::PROBE_ORDER {
            if let Some(neighbor) = dir.step(coord) {
                if view.is_untried(neighbor) && !self.target_queue.contains(&neighbor) {
                    self.target_queue.push_back(neighbor);
                }
            }
        }
    }
}

/// Uniformly random untried cell, or `None` when the view is exhausted.
/// Candidates are enumerated so termination is bounded by the grid area
/// even on degenerate boards.
fn random_untried<R: Rng + ?Sized>(view: &Grid, rng: &mut R) -> Option<Coord> {
    let candidates: Vec<Coord> = view.untried_cells().collect();
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[rng.random_range(0..candidates.len())])
}

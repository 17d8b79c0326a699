use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use broadside::{
    Board, Cell, ChannelClosed, Difficulty, Grid, MatchEnd, Message, Orientation, PeerChannel,
    RemoteEvent, RemoteGame, Seat, ShipClass, ShotResult, TargetingState, TurnError,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

const CRUISER: ShipClass = ShipClass::new("Cruiser", 3);
const BUOY: ShipClass = ShipClass::new("Buoy", 1);

#[derive(Default)]
struct Script {
    inbox: VecDeque<Message>,
    sent: Vec<Message>,
    closed: bool,
}

/// Hand-scripted peer: the test queues inbound messages and inspects what
/// the coordinator sent.
#[derive(Clone, Default)]
struct ScriptedChannel(Rc<RefCell<Script>>);

impl ScriptedChannel {
    fn push(&self, msg: Message) {
        self.0.borrow_mut().inbox.push_back(msg);
    }

    fn sent(&self) -> Vec<Message> {
        self.0.borrow().sent.clone()
    }

    fn close(&self) {
        self.0.borrow_mut().closed = true;
    }
}

impl PeerChannel for ScriptedChannel {
    fn send(&mut self, msg: Message) -> Result<(), ChannelClosed> {
        let mut script = self.0.borrow_mut();
        if script.closed {
            return Err(ChannelClosed);
        }
        script.sent.push(msg);
        Ok(())
    }

    fn try_recv(&mut self) -> Option<Message> {
        self.0.borrow_mut().inbox.pop_front()
    }
}

fn cruiser_board(size: usize) -> Board {
    let mut board = Board::new(size);
    board.place(CRUISER, Orientation::Horizontal, 0, 0).unwrap();
    board
}

#[test]
fn engine_seat_fires_on_its_first_tick() {
    let channel = ScriptedChannel::default();
    let seat = Seat::engine(Difficulty::Easy, SmallRng::seed_from_u64(3));
    let mut game = RemoteGame::new(cruiser_board(10), 3, seat, channel.clone(), true);

    game.tick();
    let sent = channel.sent();
    assert_eq!(sent.len(), 1);
    assert!(matches!(sent[0], Message::Shot { .. }));
    assert!(game.awaiting_result());
    assert!(game.my_turn());
}

#[test]
fn result_is_applied_before_the_turn_is_yielded() {
    let channel = ScriptedChannel::default();
    let seat = Seat::engine(Difficulty::Easy, SmallRng::seed_from_u64(3));
    let mut game = RemoteGame::new(cruiser_board(10), 3, seat, channel.clone(), true);

    game.tick();
    let Message::Shot { row, col } = channel.sent()[0] else {
        panic!("expected a shot");
    };

    channel.push(Message::Result { hit: false });
    let events = game.tick();
    assert_eq!(
        events,
        vec![RemoteEvent::ShotResolved {
            coord: (row as usize, col as usize),
            result: ShotResult::Miss,
        }]
    );
    assert_eq!(
        game.attacks().get((row as usize, col as usize)),
        Ok(Cell::Miss)
    );
    assert!(!game.my_turn());
    assert!(!game.awaiting_result());
}

#[test]
fn incoming_shot_is_resolved_and_answered() {
    let channel = ScriptedChannel::default();
    let mut game = RemoteGame::new(cruiser_board(10), 3, Seat::Human, channel.clone(), false);

    channel.push(Message::Shot { row: 0, col: 0 });
    let events = game.tick();
    assert_eq!(
        events,
        vec![RemoteEvent::IncomingShot {
            coord: (0, 0),
            result: ShotResult::Hit,
        }]
    );
    assert_eq!(channel.sent(), vec![Message::Result { hit: true }]);
    assert!(game.my_turn());
}

#[test]
fn disconnect_is_terminal_and_touches_nothing() {
    let channel = ScriptedChannel::default();
    let mut game = RemoteGame::new(cruiser_board(10), 3, Seat::Human, channel.clone(), false);

    channel.push(Message::Disconnect);
    channel.push(Message::Shot { row: 0, col: 0 });
    let events = game.tick();
    assert_eq!(events, vec![RemoteEvent::Ended(MatchEnd::OpponentLeft)]);
    assert_eq!(game.outcome(), Some(MatchEnd::OpponentLeft));

    // The queued shot behind the disconnect is never applied.
    assert!(game.tick().is_empty());
    assert_eq!(game.board().cells_remaining(), 3);
    assert!(channel.sent().is_empty());
    assert_eq!(game.queue_shot((5, 5)).unwrap_err(), TurnError::MatchOver);
}

#[test]
fn unroutable_result_is_skipped() {
    let channel = ScriptedChannel::default();
    let mut game = RemoteGame::new(cruiser_board(10), 3, Seat::Human, channel.clone(), false);

    channel.push(Message::Result { hit: true });
    let events = game.tick();
    assert!(events.is_empty());
    assert_eq!(game.attacks().count(Cell::Hit), 0);
    assert!(game.outcome().is_none());
}

#[test]
fn human_seat_shot_queueing_guards() {
    let channel = ScriptedChannel::default();
    let mut game = RemoteGame::new(cruiser_board(10), 3, Seat::Human, channel.clone(), false);

    // Not our turn yet.
    assert_eq!(game.queue_shot((1, 1)).unwrap_err(), TurnError::NotYourTurn);

    channel.push(Message::Shot { row: 9, col: 9 });
    game.tick();
    assert!(game.my_turn());

    assert!(matches!(
        game.queue_shot((20, 1)).unwrap_err(),
        TurnError::Board(_)
    ));
    game.queue_shot((1, 1)).unwrap();
    assert_eq!(
        channel.sent().last(),
        Some(&Message::Shot { row: 1, col: 1 })
    );
    // One shot in flight at a time.
    assert_eq!(game.queue_shot((1, 2)).unwrap_err(), TurnError::NotYourTurn);
}

#[test]
fn losing_shot_still_gets_a_result_reply() {
    let mut board = Board::new(5);
    board.place(BUOY, Orientation::Horizontal, 1, 1).unwrap();
    let channel = ScriptedChannel::default();
    let mut game = RemoteGame::new(board, 3, Seat::Human, channel.clone(), false);

    channel.push(Message::Shot { row: 1, col: 1 });
    let events = game.tick();
    assert_eq!(
        events,
        vec![
            RemoteEvent::IncomingShot {
                coord: (1, 1),
                result: ShotResult::Hit,
            },
            RemoteEvent::Ended(MatchEnd::Lost),
        ]
    );
    assert_eq!(channel.sent(), vec![Message::Result { hit: true }]);
    assert_eq!(game.outcome(), Some(MatchEnd::Lost));
}

#[test]
fn clearing_the_enemy_fleet_wins() {
    let channel = ScriptedChannel::default();
    let mut game = RemoteGame::new(cruiser_board(5), 1, Seat::Human, channel.clone(), true);

    game.queue_shot((2, 2)).unwrap();
    channel.push(Message::Result { hit: true });
    let events = game.tick();
    assert_eq!(
        events,
        vec![
            RemoteEvent::ShotResolved {
                coord: (2, 2),
                result: ShotResult::Hit,
            },
            RemoteEvent::Ended(MatchEnd::Won),
        ]
    );
    assert_eq!(game.outcome(), Some(MatchEnd::Won));
}

#[test]
fn engine_reversal_shot_carries_to_the_next_turn() {
    // Prime a hard-mode state that is locked upward from (3, 3) with its
    // origin at (4, 3); the scripted miss forces the reversal, which the
    // alternation defers to our next turn.
    let scratch = Grid::new(10);
    let mut state = TargetingState::new();
    let mut rng = SmallRng::seed_from_u64(1);
    state.observe(Difficulty::Hard, &scratch, (4, 3), ShotResult::Hit, false);
    let probe = state
        .select_target(Difficulty::Hard, &scratch, &mut rng)
        .unwrap();
    assert_eq!(probe, (3, 3));
    state.observe(Difficulty::Hard, &scratch, probe, ShotResult::Hit, false);

    let channel = ScriptedChannel::default();
    let seat = Seat::Engine {
        difficulty: Difficulty::Hard,
        state,
        rng,
    };
    let mut game = RemoteGame::new(cruiser_board(10), 12, seat, channel.clone(), true);

    // Our turn: the engine follows the locked line to (2, 3).
    game.tick();
    assert_eq!(
        channel.sent().last(),
        Some(&Message::Shot { row: 2, col: 3 })
    );

    // The miss comes back: reversal wants (5, 3) but the turn is yielded.
    channel.push(Message::Result { hit: false });
    game.tick();
    assert!(!game.my_turn());
    assert!(!game.awaiting_result());

    // The peer takes its shot; answering it hands the turn back.
    channel.push(Message::Shot { row: 9, col: 9 });
    game.tick();
    assert!(game.my_turn());

    // Next turn opens with the deferred reversal shot.
    game.tick();
    assert_eq!(
        channel.sent().last(),
        Some(&Message::Shot { row: 5, col: 3 })
    );
}

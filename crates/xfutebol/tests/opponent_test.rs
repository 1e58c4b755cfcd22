//! Opponent orchestrator behaviour with scripted and engine proposal sources.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use xfutebol::{
    ActionKind, Difficulty, EngineBot, GameModeType, GameService, HaltReason, LogSource,
    OpponentOrchestrator, OpponentProposal, OrchestratorState, Position, ProposalSource, Team,
};
use xfutebol_engine::{Board, BoardTile, GameMatch, GameMode, Piece, PieceRole, Team as EngineTeam};

/// Replays a fixed list of proposals and counts how often it was asked.
struct Scripted {
    proposals: VecDeque<OpponentProposal>,
    calls: Arc<AtomicUsize>,
}

impl Scripted {
    fn new(proposals: Vec<OpponentProposal>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                proposals: proposals.into(),
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

#[async_trait::async_trait]
impl ProposalSource for Scripted {
    async fn propose(&mut self, _service: &GameService, _session_id: &str, _team: Team) -> Option<OpponentProposal> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.proposals.pop_front()
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn proposal(piece_id: &str, kind: ActionKind, path: &[(u8, u8)]) -> OpponentProposal {
    OpponentProposal {
        piece_id: piece_id.to_string(),
        kind,
        path: path.iter().map(|(row, col)| Position::new(*row, *col)).collect(),
    }
}

fn orchestrator(service: &GameService, id: &str, team: Team, source: Scripted) -> OpponentOrchestrator {
    OpponentOrchestrator::new(service.clone(), id, team, Box::new(source)).with_pacing(Duration::ZERO)
}

fn tile(row: usize, col: usize) -> BoardTile {
    BoardTile::from_coords(row, col).expect("Tile on board")
}

/// White attacker one step from the goal mouth, holding the ball.
fn near_goal(service: &GameService) -> String {
    let mut board = Board::empty();
    board
        .place(tile(6, 3), Piece::new(EngineTeam::White, PieceRole::Attacker, 1))
        .expect("Free tile");
    board
        .place(tile(2, 2), Piece::new(EngineTeam::White, PieceRole::Attacker, 2))
        .expect("Free tile");
    board
        .place(tile(5, 6), Piece::new(EngineTeam::Black, PieceRole::Defender, 1))
        .expect("Free tile");
    board.give_ball(tile(6, 3)).expect("Holder exists");
    service.adopt_match(
        GameModeType::QuickMatch,
        GameMatch::with_board(GameMode::quick_match(), board),
    )
}

#[tokio::test]
async fn test_three_illegal_proposals_trip_the_breaker() {
    let service = GameService::new();
    let id = service.create_session(GameModeType::QuickMatch);
    let illegal = proposal("WA01", ActionKind::Move, &[(0, 0)]);
    let (source, calls) = Scripted::new(vec![illegal; 5]);
    let mut runner = orchestrator(&service, &id, Team::White, source);

    let report = runner.run().await;

    assert_eq!(*report.halt(), HaltReason::TooManyErrors);
    assert_eq!(*report.attempts(), 3);
    assert_eq!(*report.executed(), 0);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(runner.state(), &OrchestratorState::Halted(HaltReason::TooManyErrors));

    let board = service.get_board(&id).expect("Session exists");
    assert_eq!(board.current_turn, Team::White);
    assert_eq!(board.actions_remaining, 2);

    let entries = service.log_entries(&id).expect("Session exists");
    let halted: Vec<_> = entries.iter().filter(|e| e.event() == "HALTED").collect();
    assert_eq!(halted.len(), 1);
    let reason = halted[0]
        .data()
        .as_ref()
        .and_then(|data| data.get("reason"))
        .and_then(|reason| reason.as_str());
    assert_eq!(reason, Some("too_many_errors"));

    let stuck: Vec<_> = entries
        .iter()
        .filter(|e| *e.source() == LogSource::Bot && e.error().is_some())
        .collect();
    assert_eq!(stuck.len(), 1);
}

#[tokio::test]
async fn test_vanished_piece_surfaces_as_one_error() {
    let service = GameService::new();
    let id = service.create_session(GameModeType::QuickMatch);
    let vanished = proposal("WX09", ActionKind::Move, &[(4, 3)]);
    let (source, calls) = Scripted::new(vec![vanished; 5]);
    let mut runner = orchestrator(&service, &id, Team::White, source);

    let report = runner.run().await;

    assert_eq!(*report.halt(), HaltReason::TooManyErrors);
    assert_eq!(*report.attempts(), 3);
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    let entries = service.log_entries(&id).expect("Session exists");
    let errors: Vec<_> = entries.iter().filter(|e| e.error().is_some()).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(*errors[0].source(), LogSource::Bot);
    let rejected = entries
        .iter()
        .filter(|e| e.event() == "REJECTED" && *e.source() == LogSource::System)
        .count();
    assert_eq!(rejected, 3);

    let text = service.export_log(&id).expect("Session exists");
    assert!(text.contains("\nerrors: 1\n"));
}

#[tokio::test]
async fn test_success_resets_failure_count() {
    let service = GameService::new();
    let id = service.create_session(GameModeType::QuickMatch);
    let to = service.get_legal_moves(&id, "WA01")[0];
    let bad = proposal("ZZ99", ActionKind::Move, &[(4, 3)]);
    let good = proposal("WA01", ActionKind::Move, &[(to.row, to.col)]);
    let (source, _) = Scripted::new(vec![
        bad.clone(),
        bad.clone(),
        good,
        bad.clone(),
        bad.clone(),
        bad,
    ]);
    let mut runner = orchestrator(&service, &id, Team::White, source);

    let report = runner.run().await;

    assert_eq!(*report.halt(), HaltReason::TooManyErrors);
    assert_eq!(*report.attempts(), 6);
    assert_eq!(*report.executed(), 1);
    assert_eq!(service.actions_remaining(&id), Some(1));

    let errors = service
        .log_entries(&id)
        .expect("Session exists")
        .iter()
        .filter(|e| e.error().is_some())
        .count();
    assert_eq!(errors, 1);
}

#[tokio::test]
async fn test_goal_halts_immediately() {
    let service = GameService::new();
    let id = near_goal(&service);
    let to = service.get_legal_moves(&id, "WA02")[0];
    let (source, calls) = Scripted::new(vec![
        proposal("WA01", ActionKind::Move, &[(7, 3)]),
        proposal("WA02", ActionKind::Move, &[(to.row, to.col)]),
    ]);
    let mut runner = orchestrator(&service, &id, Team::White, source);

    let report = runner.run().await;

    assert_eq!(*report.halt(), HaltReason::GoalOrGameOver);
    assert_eq!(*report.attempts(), 1);
    assert_eq!(*report.executed(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let board = service.get_board(&id).expect("Session exists");
    assert_eq!(board.white_score, 1);
    assert_eq!(board.current_turn, Team::Black);

    // Kickoff went to Black, so resuming White yields straight away.
    let resumed = runner.resume().await;
    assert_eq!(*resumed.halt(), HaltReason::TurnYielded);
    assert_eq!(*resumed.attempts(), 0);
}

#[tokio::test]
async fn test_engine_bot_plays_a_full_turn() {
    let service = GameService::new();
    let id = service.create_session(GameModeType::QuickMatch);
    let mut runner = OpponentOrchestrator::new(
        service.clone(),
        &id,
        Team::White,
        Box::new(EngineBot::new(Difficulty::Easy)),
    )
    .with_pacing(Duration::ZERO);

    let report = runner.run().await;

    assert_eq!(*report.halt(), HaltReason::TurnYielded);
    assert_eq!(*report.executed(), 2);
    assert_eq!(*report.attempts(), 2);
    let board = service.get_board(&id).expect("Session exists");
    assert_eq!(board.current_turn, Team::Black);
    assert_eq!(board.turn_number, 2);
}

#[tokio::test]
async fn test_waits_when_not_its_turn() {
    let service = GameService::new();
    let id = service.create_session(GameModeType::QuickMatch);
    let (source, calls) = Scripted::new(vec![proposal("BA01", ActionKind::Move, &[(4, 3)])]);
    let mut runner = orchestrator(&service, &id, Team::Black, source);

    let report = runner.run().await;

    assert_eq!(*report.halt(), HaltReason::TurnYielded);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_source_is_a_clean_stop() {
    let service = GameService::new();
    let id = service.create_session(GameModeType::QuickMatch);
    let (source, calls) = Scripted::new(Vec::new());
    let mut runner = orchestrator(&service, &id, Team::White, source);

    let report = runner.run().await;

    assert_eq!(*report.halt(), HaltReason::NoProposal);
    assert_eq!(*report.attempts(), 0);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let errors = service
        .log_entries(&id)
        .expect("Session exists")
        .iter()
        .filter(|e| e.error().is_some())
        .count();
    assert_eq!(errors, 0);
}

#[tokio::test]
async fn test_cancel_stops_before_proposing() {
    let service = GameService::new();
    let id = service.create_session(GameModeType::QuickMatch);
    let (source, calls) = Scripted::new(vec![proposal("WA01", ActionKind::Move, &[(4, 3)])]);
    let mut runner = orchestrator(&service, &id, Team::White, source);

    runner.cancel_handle().cancel();
    let report = runner.run().await;

    assert_eq!(*report.halt(), HaltReason::Cancelled);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_session_halts() {
    let service = GameService::new();
    let (source, _) = Scripted::new(Vec::new());
    let mut runner = orchestrator(&service, "gone", Team::White, source);

    let report = runner.run().await;

    assert_eq!(*report.halt(), HaltReason::SessionNotFound);
}

#[tokio::test]
async fn test_finished_match_halts_with_game_over() {
    let service = GameService::new();
    let mut board = Board::empty();
    board
        .place(tile(4, 4), Piece::new(EngineTeam::White, PieceRole::Attacker, 1))
        .expect("Free tile");
    board.give_ball(tile(4, 4)).expect("Holder exists");
    let id = service.adopt_match(
        GameModeType::GoldenGoal,
        GameMatch::with_board(GameMode::golden_goal(), board),
    );
    let shot = [Position::new(5, 4), Position::new(6, 4), Position::new(7, 4)];
    assert!(service.execute_shoot(&id, "WA01", &shot).game_over);

    let (source, calls) = Scripted::new(Vec::new());
    let mut runner = orchestrator(&service, &id, Team::White, source);
    let report = runner.run().await;

    assert_eq!(*report.halt(), HaltReason::GameOver);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

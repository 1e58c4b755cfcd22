//! Action dispatch through the service.

use xfutebol::{ActionKind, GameModeType, GameService, Position, Team};
use xfutebol_engine::{Board, BoardTile, GameMatch, GameMode, Piece, PieceRole, Team as EngineTeam};

fn tile(row: usize, col: usize) -> BoardTile {
    BoardTile::from_coords(row, col).expect("Tile on board")
}

/// Adopts a White-to-move match built from `(team, role, seq, row, col)` entries.
fn adopt(
    service: &GameService,
    mode: GameModeType,
    pieces: &[(EngineTeam, PieceRole, u8, usize, usize)],
    ball: (usize, usize),
) -> String {
    let mut board = Board::empty();
    for (team, role, seq, row, col) in pieces {
        board
            .place(tile(*row, *col), Piece::new(*team, *role, *seq))
            .expect("Free tile");
    }
    board.give_ball(tile(ball.0, ball.1)).expect("Holder exists");
    service.adopt_match(mode, GameMatch::with_board(GameMode::from(mode), board))
}

#[test]
fn test_two_moves_flip_turn() {
    let service = GameService::new();
    let id = service.create_session(GameModeType::QuickMatch);

    let to = service.get_legal_moves(&id, "WA01")[0];
    let first = service.execute_move(&id, "WA01", to);
    assert!(first.success, "{}", first.message);
    assert_eq!(first.actions_remaining, 1);
    assert!(!first.turn_ended);

    let board = service.get_board(&id).expect("Session exists");
    assert_eq!(board.piece("WA01").map(|p| p.position), Some(to));

    let next = service.get_legal_moves(&id, "WA01")[0];
    let second = service.execute_move(&id, "WA01", next);
    assert!(second.success, "{}", second.message);
    assert!(second.turn_ended);
    assert_eq!(second.actions_remaining, 0);

    let board = service.get_board(&id).expect("Session exists");
    assert_eq!(board.current_turn, Team::Black);
    assert_eq!(board.actions_remaining, 2);
    assert_eq!(board.turn_number, 2);
    assert_eq!(board.piece("WA01").map(|p| p.position), Some(next));
}

#[test]
fn test_unknown_piece_does_not_mutate() {
    let service = GameService::new();
    let id = service.create_session(GameModeType::QuickMatch);
    let before = service.get_board(&id).expect("Session exists");

    for kind in [ActionKind::Move, ActionKind::Pass, ActionKind::Push] {
        let path = match kind {
            ActionKind::Push => vec![Position::new(4, 4), Position::new(5, 4)],
            _ => vec![Position::new(4, 3)],
        };
        let outcome = service.execute(&id, "ZZ99", kind, &path);
        assert!(!outcome.success);
        assert!(outcome.message.contains("Piece not found"), "{}", outcome.message);
        assert_eq!(outcome.actions_remaining, 2);
    }

    assert_eq!(service.get_board(&id), Some(before));
}

#[test]
fn test_unknown_session_fails_softly() {
    let service = GameService::new();
    let outcome = service.execute_move("missing", "WA01", Position::new(4, 3));
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Game not found");
    assert_eq!(outcome.actions_remaining, 0);
}

#[test]
fn test_off_board_position_is_a_conversion_failure() {
    let service = GameService::new();
    let id = service.create_session(GameModeType::QuickMatch);

    let outcome = service.execute_pass(&id, "WA01", &[Position::new(3, 4), Position::new(3, 9)]);
    assert!(!outcome.success);
    assert!(outcome.message.contains("off the board"), "{}", outcome.message);

    let outcome = service.execute_move(&id, "WA01", Position::new(8, 3));
    assert!(!outcome.success);
    assert!(outcome.message.contains("off the board"), "{}", outcome.message);
    assert_eq!(service.actions_remaining(&id), Some(2));
}

#[test]
fn test_path_shape_errors() {
    let service = GameService::new();
    let id = service.create_session(GameModeType::QuickMatch);

    let empty = service.execute_kick(&id, "WA01", &[]);
    assert!(!empty.success);
    assert_eq!(empty.message, "Path is empty");

    let push = service.execute(&id, "WA01", ActionKind::Push, &[Position::new(4, 4)]);
    assert!(!push.success);
    assert_eq!(push.message, "Expected 2 positions, got 1");

    let moved = service.execute(&id, "WA01", ActionKind::Move, &[]);
    assert!(!moved.success);
    assert_eq!(moved.message, "Expected 1 positions, got 0");

    let entries = service.log_entries(&id).expect("Session exists");
    let rejected: Vec<_> = entries.iter().filter(|e| e.event() == "REJECTED").collect();
    assert_eq!(rejected.len(), 3);
    assert!(rejected.iter().all(|e| e.error().is_none()));
    let reason = rejected[1]
        .data()
        .as_ref()
        .and_then(|data| data.get("description"))
        .and_then(|d| d.as_str());
    assert_eq!(reason, Some("Expected 2 positions, got 1"));
}

#[test]
fn test_engine_rejection_is_a_failed_outcome() {
    let service = GameService::new();
    let id = service.create_session(GameModeType::QuickMatch);

    let to = service.get_legal_moves(&id, "BA01")[0];
    let outcome = service.execute_move(&id, "BA01", to);
    assert!(!outcome.success);
    assert_eq!(outcome.message, "It is White's turn");
    assert_eq!(outcome.actions_remaining, 2);

    let outcome = service.execute_intercept(&id, "WA01", &[Position::new(4, 4)]);
    assert!(!outcome.success);
    assert!(outcome.message.contains("holding the ball"), "{}", outcome.message);

    assert_eq!(service.current_turn(&id), Some(Team::White));
    assert_eq!(service.actions_remaining(&id), Some(2));
}

#[test]
fn test_ball_less_piece_in_goal_mouth_does_not_score() {
    let service = GameService::new();
    let id = adopt(
        &service,
        GameModeType::QuickMatch,
        &[
            (EngineTeam::White, PieceRole::Attacker, 1, 2, 2),
            (EngineTeam::White, PieceRole::Attacker, 2, 6, 3),
            (EngineTeam::Black, PieceRole::Goalkeeper, 1, 7, 6),
        ],
        (2, 2),
    );

    let outcome = service.execute_move(&id, "WA02", Position::new(7, 3));
    assert!(outcome.success, "{}", outcome.message);
    assert_eq!(outcome.goal_scored, None);
    assert!(!outcome.kickoff_reset);

    let board = service.get_board(&id).expect("Session exists");
    assert_eq!((board.white_score, board.black_score), (0, 0));
    assert_eq!(board.piece("WA02").map(|p| p.position), Some(Position::new(7, 3)));
}

#[test]
fn test_carrier_goal_resets_kickoff_and_invalidates_targets() {
    let service = GameService::new();
    let id = adopt(
        &service,
        GameModeType::QuickMatch,
        &[
            (EngineTeam::White, PieceRole::Attacker, 1, 6, 3),
            (EngineTeam::White, PieceRole::Attacker, 2, 5, 5),
            (EngineTeam::Black, PieceRole::Goalkeeper, 1, 7, 6),
        ],
        (6, 3),
    );
    let stale = service.get_legal_moves(&id, "WA02");
    assert!(!stale.is_empty());

    let outcome = service.execute_move(&id, "WA01", Position::new(7, 3));
    assert!(outcome.success, "{}", outcome.message);
    assert_eq!(outcome.goal_scored, Some(Team::White));
    assert!(outcome.kickoff_reset);
    assert!(outcome.turn_ended);
    assert_eq!(outcome.actions_remaining, 0);
    assert!(!outcome.game_over);

    let board = service.get_board(&id).expect("Session exists");
    assert_eq!(board.pieces.len(), 14);
    assert_eq!((board.white_score, board.black_score), (1, 0));
    assert_eq!(board.current_turn, Team::Black);
    assert_eq!(board.ball_holder().map(|p| p.id.as_str()), Some("BA01"));
    assert_eq!(board.piece("WA02").map(|p| p.position), Some(Position::new(3, 5)));

    // Targets fetched before the reset no longer apply.
    let retry = service.execute_move(&id, "WA02", stale[0]);
    assert!(!retry.success);
    assert_ne!(service.get_legal_moves(&id, "WA02"), stale);
}

#[test]
fn test_golden_goal_ends_match() {
    let service = GameService::new();
    let id = adopt(
        &service,
        GameModeType::GoldenGoal,
        &[(EngineTeam::White, PieceRole::Attacker, 1, 4, 4)],
        (4, 4),
    );

    let shot = service
        .get_legal_shoots(&id, "WA01")
        .into_iter()
        .find(|path| path.positions.last() == Some(&Position::new(7, 4)))
        .expect("Straight shot available");
    let outcome = service.execute_shoot(&id, "WA01", &shot.positions);

    assert!(outcome.success, "{}", outcome.message);
    assert!(outcome.game_over);
    assert_eq!(outcome.winner, Some(Team::White));
    assert!(service.is_over(&id));
    assert_eq!(service.winner(&id), Some(Team::White));

    let after = service.execute_move(&id, "WA01", Position::new(6, 4));
    assert!(!after.success);
    assert_eq!(after.message, "The match is already over");
}

#[test]
fn test_push_uses_two_positions() {
    let service = GameService::new();
    let id = adopt(
        &service,
        GameModeType::QuickMatch,
        &[
            (EngineTeam::White, PieceRole::Attacker, 1, 3, 3),
            (EngineTeam::Black, PieceRole::Defender, 1, 4, 3),
        ],
        (4, 3),
    );

    let pushes = service.get_legal_pushes(&id, "WA01");
    assert!(pushes.iter().any(|p| p.positions == vec![Position::new(4, 3), Position::new(5, 3)]));

    let outcome = service.execute_push(&id, "WA01", Position::new(4, 3), Position::new(5, 3));
    assert!(outcome.success, "{}", outcome.message);

    let board = service.get_board(&id).expect("Session exists");
    assert_eq!(board.piece("BD01").map(|p| p.position), Some(Position::new(5, 3)));
    assert_eq!(board.ball_position, Some(Position::new(4, 3)));
    assert!(board.ball_holder().is_none());
}

#[test]
fn test_pass_then_intercept() {
    let service = GameService::new();
    let id = adopt(
        &service,
        GameModeType::QuickMatch,
        &[
            (EngineTeam::White, PieceRole::Attacker, 1, 3, 3),
            (EngineTeam::White, PieceRole::Midfielder, 1, 3, 6),
            (EngineTeam::Black, PieceRole::Defender, 1, 4, 7),
        ],
        (3, 3),
    );

    let pass = [Position::new(3, 4), Position::new(3, 5), Position::new(3, 6)];
    let outcome = service.execute_pass(&id, "WA01", &pass);
    assert!(outcome.success, "{}", outcome.message);
    let board = service.get_board(&id).expect("Session exists");
    assert_eq!(board.ball_holder().map(|p| p.id.as_str()), Some("WM01"));

    // Second White action ends the turn.
    let to = service.get_legal_moves(&id, "WA01")[0];
    assert!(service.execute_move(&id, "WA01", to).turn_ended);

    let steal = service.execute_intercept(&id, "BD01", &[Position::new(3, 6)]);
    assert!(steal.success, "{}", steal.message);
    let board = service.get_board(&id).expect("Session exists");
    assert_eq!(board.ball_holder().map(|p| p.id.as_str()), Some("BD01"));
}

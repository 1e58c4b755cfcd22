//! Session lifecycle and board queries.

use xfutebol::{GameModeType, GameService, PieceRole, Position, Team};

#[test]
fn test_new_quick_match_board() {
    let service = GameService::new();
    let id = service.create_session(GameModeType::QuickMatch);

    let board = service.get_board(&id).expect("Session exists");
    assert_eq!(board.pieces.len(), 14);
    assert_eq!(board.pieces.iter().filter(|p| p.team == Team::White).count(), 7);
    assert_eq!(board.pieces.iter().filter(|p| p.team == Team::Black).count(), 7);
    assert_eq!(board.pieces.iter().filter(|p| p.has_ball).count(), 1);
    assert_eq!(board.ball_position, None);
    assert_eq!(board.current_turn, Team::White);
    assert_eq!(board.actions_remaining, 2);
    assert_eq!((board.white_score, board.black_score), (0, 0));
    assert_eq!(board.turn_number, 1);

    let holder = board.ball_holder().expect("Kickoff holder");
    assert_eq!(holder.id, "WA01");
    assert_eq!(holder.role, PieceRole::Attacker);
    assert_eq!(holder.position, Position::new(3, 3));
}

#[test]
fn test_delete_twice() {
    let service = GameService::new();
    let id = service.create_session(GameModeType::StandardMatch);
    assert!(service.session_exists(&id));

    assert!(service.delete_session(&id));
    assert!(!service.session_exists(&id));
    assert!(!service.delete_session(&id));
    assert!(!service.session_exists(&id));
    assert!(service.get_board(&id).is_none());
}

#[test]
fn test_delete_unknown_session() {
    let service = GameService::new();
    assert!(!service.delete_session("never-created"));
}

#[test]
fn test_missing_session_queries_are_empty() {
    let service = GameService::new();

    assert!(service.get_board("nope").is_none());
    assert!(service.get_legal_moves("nope", "WA01").is_empty());
    assert!(service.get_legal_passes("nope", "WA01").is_empty());
    assert!(!service.is_over("nope"));
    assert_eq!(service.winner("nope"), None);
    assert_eq!(service.current_turn("nope"), None);
    assert!(service.get_opponent_action("nope", Default::default()).is_none());
    assert!(service.export_log("nope").is_none());
    assert!(service.sync_log("nope").is_none());
    assert!(!service.log_event("nope", "CLICK", "Clicked", None));
}

#[test]
fn test_sessions_are_independent() {
    let service = GameService::new();
    let first = service.create_session(GameModeType::QuickMatch);
    let second = service.create_session(GameModeType::GoldenGoal);
    assert_ne!(first, second);

    let mut ids = service.list_sessions();
    ids.sort();
    let mut expected = vec![first.clone(), second.clone()];
    expected.sort();
    assert_eq!(ids, expected);

    let to = service.get_legal_moves(&first, "WA01")[0];
    assert!(service.execute_move(&first, "WA01", to).success);

    let untouched = service.get_board(&second).expect("Second session exists");
    assert_eq!(untouched.actions_remaining, 2);
    assert_eq!(
        untouched.piece("WA01").map(|p| p.position),
        Some(Position::new(3, 3))
    );
}

#[test]
fn test_clones_share_sessions() {
    let service = GameService::new();
    let clone = service.clone();
    let id = clone.create_session(GameModeType::QuickMatch);
    assert!(service.session_exists(&id));
}

#[test]
fn test_unknown_piece_has_no_targets() {
    let service = GameService::new();
    let id = service.create_session(GameModeType::QuickMatch);
    assert!(service.get_legal_moves(&id, "ZZ99").is_empty());
    assert!(service.get_legal_pushes(&id, "ZZ99").is_empty());
}

#[test]
fn test_render_marks_ball_holder() {
    let service = GameService::new();
    let id = service.create_session(GameModeType::QuickMatch);
    let rendered = service.get_board(&id).expect("Session exists").render();

    assert!(rendered.contains("WA01*"));
    assert!(rendered.contains("White to move"));
    assert_eq!(rendered.lines().count(), 10);
}

#[test]
fn test_opponent_action_is_legal_for_side_on_move() {
    let service = GameService::new();
    let id = service.create_session(GameModeType::QuickMatch);

    let proposal = service
        .get_opponent_action(&id, xfutebol::Difficulty::Hard)
        .expect("Bot has a move at kickoff");
    let piece = service
        .get_board(&id)
        .and_then(|board| board.piece(&proposal.piece_id).cloned())
        .expect("Proposed piece on board");
    assert_eq!(piece.team, Team::White);

    let outcome = service.execute(&id, &proposal.piece_id, proposal.kind, &proposal.path);
    assert!(outcome.success, "{}", outcome.message);
}

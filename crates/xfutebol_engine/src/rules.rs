//! Legal path generation for the seven action kinds.
//!
//! Every action travels in a straight line along one of the eight compass
//! directions and is stopped by the first piece in the way. A path lists the
//! tiles visited after the acting piece's own tile, in order.

use tracing::instrument;

use crate::board::Board;
use crate::tile::{BoardTile, Direction};
use crate::types::{Action, Piece, PieceRole, Team};

/// Furthest a pass can travel.
pub const PASS_RANGE: u8 = 4;
/// Furthest a shot can travel.
pub const SHOOT_RANGE: u8 = 3;
/// Furthest a kick can travel.
pub const KICK_RANGE: u8 = 3;
/// Furthest a defending piece can step.
pub const DEFEND_RANGE: u8 = 2;
/// A ball carrier only dribbles one tile at a time.
pub const DRIBBLE_RANGE: u8 = 1;

/// All legal paths for the piece on `from` performing `action`.
///
/// Turn ownership and the action budget are not considered here; the match
/// checks those before executing.
#[instrument(skip(board))]
pub fn legal_paths(board: &Board, from: BoardTile, action: Action) -> Vec<Vec<BoardTile>> {
    let Some(piece) = board.piece_at(from).filter(|piece| piece.team != Team::Neutral) else {
        return Vec::new();
    };
    let has_ball = board.holds_ball(from);
    match action {
        Action::Move => move_paths(board, from, piece, has_ball),
        Action::Pass if has_ball => pass_paths(board, from, piece.team),
        Action::Shoot if has_ball => shoot_paths(board, from, piece.team),
        Action::Kick if has_ball => kick_paths(board, from),
        Action::Intercept if !has_ball => intercept_paths(board, from, piece),
        Action::Defend if !has_ball => defend_paths(board, from, piece),
        Action::Push => push_paths(board, from, piece.team),
        Action::Pass | Action::Shoot | Action::Kick | Action::Intercept | Action::Defend => {
            Vec::new()
        }
    }
}

/// Free tiles from `from` in `direction`, stopping before the first piece.
fn free_run(board: &Board, from: BoardTile, direction: Direction, max_len: u8) -> Vec<BoardTile> {
    from.ray(direction, max_len)
        .into_iter()
        .take_while(|tile| board.is_free(*tile))
        .collect()
}

/// Whether `piece` may stand on `tile` (goalkeepers stay in their box).
fn may_stand(piece: &Piece, tile: BoardTile) -> bool {
    piece.role != PieceRole::Goalkeeper || Board::in_box(piece.team, tile)
}

/// Every prefix of `run` ending on a tile accepted by `keep`.
fn prefixes(run: &[BoardTile], mut keep: impl FnMut(BoardTile) -> bool) -> Vec<Vec<BoardTile>> {
    (0..run.len())
        .filter(|end| keep(run[*end]))
        .map(|end| run[..=end].to_vec())
        .collect()
}

fn move_paths(board: &Board, from: BoardTile, piece: &Piece, has_ball: bool) -> Vec<Vec<BoardTile>> {
    let range = if has_ball {
        DRIBBLE_RANGE
    } else {
        piece.role.move_range()
    };
    Direction::ALL
        .into_iter()
        .flat_map(|direction| free_run(board, from, direction, range))
        .filter(|tile| may_stand(piece, *tile))
        .map(|tile| vec![tile])
        .collect()
}

fn pass_paths(board: &Board, from: BoardTile, team: Team) -> Vec<Vec<BoardTile>> {
    let mut paths = Vec::new();
    for direction in Direction::ALL {
        let ray = from.ray(direction, PASS_RANGE);
        if let Some(hit) = ray.iter().position(|tile| !board.is_free(*tile))
            && board.team_at(ray[hit]) == team
        {
            paths.push(ray[..=hit].to_vec());
        }
    }
    paths
}

fn shoot_paths(board: &Board, from: BoardTile, team: Team) -> Vec<Vec<BoardTile>> {
    let zone = Board::scoring_zone(team);
    Direction::ALL
        .into_iter()
        .flat_map(|direction| {
            let run = free_run(board, from, direction, SHOOT_RANGE);
            prefixes(&run, |tile| zone.contains(&tile))
        })
        .collect()
}

fn kick_paths(board: &Board, from: BoardTile) -> Vec<Vec<BoardTile>> {
    Direction::ALL
        .into_iter()
        .flat_map(|direction| {
            let run = free_run(board, from, direction, KICK_RANGE);
            prefixes(&run, |tile| !Board::is_goal_mouth(tile))
        })
        .collect()
}

fn intercept_paths(board: &Board, from: BoardTile, piece: &Piece) -> Vec<Vec<BoardTile>> {
    if let Some(holder) = board.ball_holder() {
        if from.is_adjacent(holder) && board.team_at(holder) == piece.team.opponent() {
            return vec![vec![holder]];
        }
        return Vec::new();
    }
    match board.loose_ball() {
        Some(ball) if from.is_adjacent(ball) && may_stand(piece, ball) => vec![vec![ball]],
        _ => Vec::new(),
    }
}

fn defend_paths(board: &Board, from: BoardTile, piece: &Piece) -> Vec<Vec<BoardTile>> {
    let marks_opponent = |tile: BoardTile| {
        Direction::ALL.into_iter().any(|direction| {
            tile.step(direction)
                .is_some_and(|next| board.team_at(next) == piece.team.opponent())
        })
    };
    Direction::ALL
        .into_iter()
        .flat_map(|direction| {
            let run = free_run(board, from, direction, DEFEND_RANGE);
            prefixes(&run, |tile| {
                piece.team.owns_half(tile) && may_stand(piece, tile) && marks_opponent(tile)
            })
        })
        .collect()
}

fn push_paths(board: &Board, from: BoardTile, team: Team) -> Vec<Vec<BoardTile>> {
    Direction::ALL
        .into_iter()
        .filter_map(|direction| {
            let target = from.step(direction)?;
            if board.team_at(target) != team.opponent() {
                return None;
            }
            let destination = target.step(direction)?;
            board.is_free(destination).then(|| vec![target, destination])
        })
        .collect()
}

//! Board state: pieces, the ball and the pitch markings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::GameError;
use crate::tile::BoardTile;
use crate::types::{Piece, PieceRole, Team};

/// Columns of the goal mouth on both goal lines.
pub const GOAL_COLUMNS: [u8; 2] = [3, 4];

/// The ball. When held, `position` is the holder's tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ball {
    /// Where the ball is.
    pub position: BoardTile,
    /// Id of the piece holding it, `None` when loose.
    pub possession: Option<String>,
}

/// The 8x8 board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pieces: BTreeMap<BoardTile, Piece>,
    /// The ball, if it is in play.
    pub ball: Option<Ball>,
}

/// Kickoff formation for White as `(role, seq, row, col)`; Black is the point mirror.
const FORMATION: [(PieceRole, u8, usize, usize); 7] = [
    (PieceRole::Goalkeeper, 1, 0, 3),
    (PieceRole::Defender, 1, 1, 2),
    (PieceRole::Defender, 2, 1, 5),
    (PieceRole::Midfielder, 1, 2, 1),
    (PieceRole::Midfielder, 2, 2, 6),
    (PieceRole::Attacker, 1, 3, 3),
    (PieceRole::Attacker, 2, 3, 5),
];

impl Board {
    /// A board with no pieces and no ball.
    pub fn empty() -> Self {
        Self {
            pieces: BTreeMap::new(),
            ball: None,
        }
    }

    /// Standard formation with `kickoff` team's first attacker holding the ball.
    #[instrument]
    pub fn standard(kickoff: Team) -> Self {
        let mut board = Self::empty();
        for (role, seq, row, col) in FORMATION {
            let white = BoardTile::from_coords(row, col);
            let black = BoardTile::from_coords(7 - row, 7 - col);
            if let (Some(white), Some(black)) = (white, black) {
                board.pieces.insert(white, Piece::new(Team::White, role, seq));
                board.pieces.insert(black, Piece::new(Team::Black, role, seq));
            }
        }
        let kicker = Piece::new(kickoff, PieceRole::Attacker, 1).id;
        if let Some((tile, _)) = board.find_piece(&kicker) {
            board.ball = Some(Ball {
                position: tile,
                possession: Some(kicker),
            });
        }
        board
    }

    /// Places a piece on a free tile.
    pub fn place(&mut self, tile: BoardTile, piece: Piece) -> Result<(), GameError> {
        if self.pieces.contains_key(&tile) {
            return Err(GameError::TileOccupied(tile));
        }
        if self.find_piece(&piece.id).is_some() {
            return Err(GameError::DuplicatePiece(piece.id));
        }
        self.pieces.insert(tile, piece);
        Ok(())
    }

    /// Hands the ball to the piece on `tile`.
    pub fn give_ball(&mut self, tile: BoardTile) -> Result<(), GameError> {
        let piece = self.pieces.get(&tile).ok_or(GameError::NoPieceAt(tile))?;
        self.ball = Some(Ball {
            position: tile,
            possession: Some(piece.id.clone()),
        });
        Ok(())
    }

    /// Leaves the ball loose on `tile`.
    pub fn drop_ball(&mut self, tile: BoardTile) {
        self.ball = Some(Ball {
            position: tile,
            possession: None,
        });
    }

    /// All pieces with their tiles, ordered by tile.
    pub fn pieces(&self) -> impl Iterator<Item = (BoardTile, &Piece)> {
        self.pieces.iter().map(|(tile, piece)| (*tile, piece))
    }

    /// The piece on `tile`.
    pub fn piece_at(&self, tile: BoardTile) -> Option<&Piece> {
        self.pieces.get(&tile)
    }

    /// Team owning `tile`; `Neutral` when empty.
    pub fn team_at(&self, tile: BoardTile) -> Team {
        self.pieces
            .get(&tile)
            .map(|piece| piece.team)
            .unwrap_or(Team::Neutral)
    }

    /// Whether no piece stands on `tile`.
    pub fn is_free(&self, tile: BoardTile) -> bool {
        !self.pieces.contains_key(&tile)
    }

    /// Finds a piece by id.
    pub fn find_piece(&self, id: &str) -> Option<(BoardTile, &Piece)> {
        self.pieces
            .iter()
            .find(|(_, piece)| piece.id == id)
            .map(|(tile, piece)| (*tile, piece))
    }

    /// Tile of the piece holding the ball.
    pub fn ball_holder(&self) -> Option<BoardTile> {
        self.ball
            .as_ref()
            .filter(|ball| ball.possession.is_some())
            .map(|ball| ball.position)
    }

    /// Tile of the loose ball.
    pub fn loose_ball(&self) -> Option<BoardTile> {
        self.ball
            .as_ref()
            .filter(|ball| ball.possession.is_none())
            .map(|ball| ball.position)
    }

    /// Whether the piece on `tile` holds the ball.
    pub fn holds_ball(&self, tile: BoardTile) -> bool {
        self.ball_holder() == Some(tile)
    }

    /// Goal-mouth tiles `team` scores into.
    pub fn scoring_zone(team: Team) -> Vec<BoardTile> {
        let row = match team.opponent().goal_row() {
            Some(row) => row as usize,
            None => return Vec::new(),
        };
        GOAL_COLUMNS
            .iter()
            .filter_map(|col| BoardTile::from_coords(row, *col as usize))
            .collect()
    }

    /// Whether `tile` is in any scoring zone.
    pub fn is_goal_mouth(tile: BoardTile) -> bool {
        (tile.row() == 0 || tile.row() == 7) && GOAL_COLUMNS.contains(&tile.col())
    }

    /// Whether `tile` lies inside `team`'s goalkeeper box.
    pub fn in_box(team: Team, tile: BoardTile) -> bool {
        let rows = match team {
            Team::White => 0..=1,
            Team::Black => 6..=7,
            Team::Neutral => return false,
        };
        rows.contains(&tile.row()) && (2..=5).contains(&tile.col())
    }

    /// Team that just scored, judged from where the ball is.
    ///
    /// A carrier scores only in its own attacking zone; a loose ball scores for
    /// whoever attacks the zone it lies in.
    pub fn goal_scored(&self) -> Option<Team> {
        let ball = self.ball.as_ref()?;
        if !Self::is_goal_mouth(ball.position) {
            return None;
        }
        let attacker = if ball.position.row() == 7 {
            Team::White
        } else {
            Team::Black
        };
        match &ball.possession {
            None => Some(attacker),
            Some(_) => (self.team_at(ball.position) == attacker).then_some(attacker),
        }
    }

    /// Moves a piece, carrying the ball with it or picking up a loose ball on arrival.
    pub(crate) fn relocate(&mut self, from: BoardTile, to: BoardTile) -> Result<(), GameError> {
        if !self.is_free(to) {
            return Err(GameError::TileOccupied(to));
        }
        let piece = self.pieces.remove(&from).ok_or(GameError::NoPieceAt(from))?;
        let carrying = self.holds_ball_id(&piece.id);
        let picks_up = self.loose_ball() == Some(to);
        let id = piece.id.clone();
        self.pieces.insert(to, piece);
        if carrying || picks_up {
            self.ball = Some(Ball {
                position: to,
                possession: Some(id),
            });
        }
        Ok(())
    }

    fn holds_ball_id(&self, id: &str) -> bool {
        self.ball
            .as_ref()
            .and_then(|ball| ball.possession.as_deref())
            == Some(id)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard(Team::White)
    }
}

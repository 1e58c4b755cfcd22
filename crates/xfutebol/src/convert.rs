//! Mappings between host and engine value types.
//!
//! Every match is exhaustive. A new engine variant breaks the build here
//! instead of being coerced to some host value at runtime.

use xfutebol_engine as engine;
use xfutebol_engine::BoardTile;

use crate::error::ConversionError;
use crate::types::{ActionKind, ActionOutcome, Difficulty, GameModeType, PieceRole, Position, Team};

impl From<Team> for engine::Team {
    fn from(team: Team) -> Self {
        match team {
            Team::White => engine::Team::White,
            Team::Black => engine::Team::Black,
        }
    }
}

impl TryFrom<engine::Team> for Team {
    type Error = ConversionError;

    fn try_from(team: engine::Team) -> Result<Self, Self::Error> {
        match team {
            engine::Team::White => Ok(Team::White),
            engine::Team::Black => Ok(Team::Black),
            engine::Team::Neutral => Err(ConversionError::UnmappedTeam(team)),
        }
    }
}

impl From<PieceRole> for engine::PieceRole {
    fn from(role: PieceRole) -> Self {
        match role {
            PieceRole::Goalkeeper => engine::PieceRole::Goalkeeper,
            PieceRole::Defender => engine::PieceRole::Defender,
            PieceRole::Midfielder => engine::PieceRole::Midfielder,
            PieceRole::Attacker => engine::PieceRole::Attacker,
        }
    }
}

impl From<engine::PieceRole> for PieceRole {
    fn from(role: engine::PieceRole) -> Self {
        match role {
            engine::PieceRole::Goalkeeper => PieceRole::Goalkeeper,
            engine::PieceRole::Defender => PieceRole::Defender,
            engine::PieceRole::Midfielder => PieceRole::Midfielder,
            engine::PieceRole::Attacker => PieceRole::Attacker,
        }
    }
}

impl From<ActionKind> for engine::Action {
    fn from(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Move => engine::Action::Move,
            ActionKind::Pass => engine::Action::Pass,
            ActionKind::Shoot => engine::Action::Shoot,
            ActionKind::Intercept => engine::Action::Intercept,
            ActionKind::Kick => engine::Action::Kick,
            ActionKind::Defend => engine::Action::Defend,
            ActionKind::Push => engine::Action::Push,
        }
    }
}

impl From<engine::Action> for ActionKind {
    fn from(action: engine::Action) -> Self {
        match action {
            engine::Action::Move => ActionKind::Move,
            engine::Action::Pass => ActionKind::Pass,
            engine::Action::Shoot => ActionKind::Shoot,
            engine::Action::Intercept => ActionKind::Intercept,
            engine::Action::Kick => ActionKind::Kick,
            engine::Action::Defend => ActionKind::Defend,
            engine::Action::Push => ActionKind::Push,
        }
    }
}

impl From<Difficulty> for engine::Difficulty {
    fn from(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => engine::Difficulty::Easy,
            Difficulty::Medium => engine::Difficulty::Medium,
            Difficulty::Hard => engine::Difficulty::Hard,
        }
    }
}

impl From<engine::Difficulty> for Difficulty {
    fn from(difficulty: engine::Difficulty) -> Self {
        match difficulty {
            engine::Difficulty::Easy => Difficulty::Easy,
            engine::Difficulty::Medium => Difficulty::Medium,
            engine::Difficulty::Hard => Difficulty::Hard,
        }
    }
}

impl From<GameModeType> for engine::GameMode {
    fn from(mode: GameModeType) -> Self {
        match mode {
            GameModeType::QuickMatch => engine::GameMode::quick_match(),
            GameModeType::StandardMatch => engine::GameMode::standard_match(),
            GameModeType::GoldenGoal => engine::GameMode::golden_goal(),
        }
    }
}

impl TryFrom<Position> for BoardTile {
    type Error = ConversionError;

    fn try_from(position: Position) -> Result<Self, Self::Error> {
        BoardTile::from_coords(position.row as usize, position.col as usize).ok_or(
            ConversionError::OutOfRange {
                row: position.row,
                col: position.col,
            },
        )
    }
}

impl From<BoardTile> for Position {
    fn from(tile: BoardTile) -> Self {
        Position::new(tile.row(), tile.col())
    }
}

impl TryFrom<&engine::ActionOutcome> for ActionOutcome {
    type Error = ConversionError;

    fn try_from(raw: &engine::ActionOutcome) -> Result<Self, Self::Error> {
        let goal_scored = raw.goal_scored.map(Team::try_from).transpose()?;
        let winner = raw.winner.map(Team::try_from).transpose()?;

        let mut message = format!("{} completed", ActionKind::from(raw.action));
        if let Some(scorer) = goal_scored {
            message.push_str(&format!(", goal for {}", scorer));
        }
        if raw.game_over {
            match winner {
                Some(team) => message.push_str(&format!(", {} wins", team)),
                None => message.push_str(", match drawn"),
            }
        }

        Ok(Self {
            success: true,
            message,
            game_over: raw.game_over,
            winner,
            actions_remaining: raw.actions_remaining,
            goal_scored,
            turn_ended: raw.turn_ended,
            kickoff_reset: raw.kickoff_reset,
        })
    }
}

/// Converts a whole path, failing on the first off-board position.
pub fn path_to_tiles(path: &[Position]) -> Result<Vec<BoardTile>, ConversionError> {
    path.iter().map(|position| BoardTile::try_from(*position)).collect()
}

/// Converts engine tiles to host positions.
pub fn tiles_to_path(tiles: &[BoardTile]) -> Vec<Position> {
    tiles.iter().map(|tile| Position::from(*tile)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_action_kinds_round_trip() {
        for kind in ActionKind::iter() {
            assert_eq!(ActionKind::from(engine::Action::from(kind)), kind);
        }
    }

    #[test]
    fn test_neutral_team_rejected() {
        assert_eq!(
            Team::try_from(engine::Team::Neutral),
            Err(ConversionError::UnmappedTeam(engine::Team::Neutral))
        );
        assert_eq!(Team::try_from(engine::Team::Black), Ok(Team::Black));
    }

    #[test]
    fn test_off_board_position_rejected() {
        assert_eq!(
            BoardTile::try_from(Position::new(8, 2)),
            Err(ConversionError::OutOfRange { row: 8, col: 2 })
        );
        let tile = BoardTile::try_from(Position::new(7, 0)).expect("On board");
        assert_eq!(Position::from(tile), Position::new(7, 0));
    }

    #[test]
    fn test_path_fails_on_first_bad_position() {
        let path = [Position::new(1, 1), Position::new(1, 9), Position::new(9, 9)];
        assert_eq!(
            path_to_tiles(&path),
            Err(ConversionError::OutOfRange { row: 1, col: 9 })
        );
    }
}

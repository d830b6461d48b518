use thiserror::Error;

use crate::bracket::{Round, TeamId};
use crate::qualification::Position;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BracketError {
  #[error("{team} is not playing in {round} match {index}")]
  InvalidWinnerSelection { round: Round, index: usize, team: TeamId },

  #[error("{team} is already the {other} qualifier of group {group}")]
  InvalidGroupSelection { group: usize, other: Position, team: TeamId },

  #[error("{team} is not a member of group {group}")]
  TeamNotInGroup { group: usize, team: TeamId },

  #[error("{round} has no match at index {index}")]
  InvalidIndex { round: Round, index: usize },

  #[error("group index {0} is out of range")]
  InvalidGroup(usize),

  #[error("invalid roster: {0}")]
  InvalidRoster(String),

  #[error("config error: {0}")]
  Config(String),

  #[error("server error: {0}")]
  Server(String),
}

pub type Result<T> = std::result::Result<T, BracketError>;

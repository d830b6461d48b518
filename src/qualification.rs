use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bracket::{Bracket, TeamId};

pub const GROUP_COUNT: usize = 8;
pub const TEAMS_PER_GROUP: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Position {
  First,
  Second,
}

impl Position {
  pub fn other(self) -> Position {
    match self {
      Position::First => Position::Second,
      Position::Second => Position::First,
    }
  }
}

impl fmt::Display for Position {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Position::First => f.write_str("first"),
      Position::Second => f.write_str("second"),
    }
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
  pub name: String,
  pub teams: Vec<TeamId>,
  pub first: Option<TeamId>,
  pub second: Option<TeamId>,
}

impl Group {
  pub fn new(name: impl Into<String>, teams: Vec<TeamId>) -> Self {
    Group {
      name: name.into(),
      teams,
      first: None,
      second: None,
    }
  }

  pub fn qualifier(&self, position: Position) -> Option<&TeamId> {
    match position {
      Position::First => self.first.as_ref(),
      Position::Second => self.second.as_ref(),
    }
  }

  pub(crate) fn set_qualifier(&mut self, position: Position, team: Option<TeamId>) {
    match position {
      Position::First => self.first = team,
      Position::Second => self.second = team,
    }
  }

  pub fn contains(&self, team: &TeamId) -> bool {
    self.teams.contains(team)
  }

  /// Teams selectable for `position`: the roster minus whoever holds the other place.
  pub fn options(&self, position: Position) -> Vec<TeamId> {
    let taken = self.qualifier(position.other());
    self
      .teams
      .iter()
      .filter(|team| Some(*team) != taken)
      .cloned()
      .collect()
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedSource {
  pub group: usize,
  pub position: Position,
}

const fn seed(group: usize, position: Position) -> SeedSource {
  SeedSource { group, position }
}

/// Round of 16 seeding: slot k (k < 4) is the winner of group 2k against the
/// runner-up of group 2k+1, slot k+4 mirrors it.
pub const SEED_SLOTS: [[SeedSource; 2]; 8] = [
  [seed(0, Position::First), seed(1, Position::Second)],
  [seed(2, Position::First), seed(3, Position::Second)],
  [seed(4, Position::First), seed(5, Position::Second)],
  [seed(6, Position::First), seed(7, Position::Second)],
  [seed(1, Position::First), seed(0, Position::Second)],
  [seed(3, Position::First), seed(2, Position::Second)],
  [seed(5, Position::First), seed(4, Position::Second)],
  [seed(7, Position::First), seed(6, Position::Second)],
];

fn resolve_seed(groups: &[Group], source: SeedSource) -> Option<TeamId> {
  groups
    .get(source.group)
    .and_then(|group| group.qualifier(source.position))
    .cloned()
}

/// Writes the current qualifiers into the Round of 16. A slot whose qualifier
/// is still undecided keeps the team it already had. Winners that no longer
/// play in their slot are dropped. Later rounds are left to `Bracket::cascade`.
pub fn resolve_round_of_16(groups: &[Group], bracket: &mut Bracket) -> usize {
  let mut changed = 0;
  for (slot, [home, away]) in bracket.round_of_16.iter_mut().zip(SEED_SLOTS.iter()) {
    let before = slot.clone();
    if let Some(team) = resolve_seed(groups, *home) {
      slot.team1 = Some(team);
    }
    if let Some(team) = resolve_seed(groups, *away) {
      slot.team2 = Some(team);
    }
    slot.retain_valid_winner();
    if *slot != before {
      changed += 1;
    }
  }
  changed
}

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(String);

impl TeamId {
  pub fn new(name: impl Into<String>) -> Self {
    TeamId(name.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl From<&str> for TeamId {
  fn from(value: &str) -> Self {
    TeamId(value.to_string())
  }
}

impl From<String> for TeamId {
  fn from(value: String) -> Self {
    TeamId(value)
  }
}

impl fmt::Display for TeamId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Round {
  RoundOf16,
  Quarterfinals,
  Semifinals,
  Final,
}

impl Round {
  pub const ALL: [Round; 4] = [
    Round::RoundOf16,
    Round::Quarterfinals,
    Round::Semifinals,
    Round::Final,
  ];

  pub fn match_count(self) -> usize {
    match self {
      Round::RoundOf16 => 8,
      Round::Quarterfinals => 4,
      Round::Semifinals => 2,
      Round::Final => 1,
    }
  }

  pub fn key(self) -> &'static str {
    match self {
      Round::RoundOf16 => "roundOf16",
      Round::Quarterfinals => "quarterfinals",
      Round::Semifinals => "semifinals",
      Round::Final => "final",
    }
  }
}

impl fmt::Display for Round {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = match self {
      Round::RoundOf16 => "Round of 16",
      Round::Quarterfinals => "Quarterfinals",
      Round::Semifinals => "Semifinals",
      Round::Final => "Final",
    };
    f.write_str(label)
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchState {
  Empty,
  Partial,
  Ready,
  Decided,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
  pub team1: Option<TeamId>,
  pub team2: Option<TeamId>,
  pub winner: Option<TeamId>,
}

impl Match {
  pub fn new(team1: Option<TeamId>, team2: Option<TeamId>) -> Self {
    Match {
      team1,
      team2,
      winner: None,
    }
  }

  pub fn state(&self) -> MatchState {
    if self.winner.is_some() {
      return MatchState::Decided;
    }
    match (&self.team1, &self.team2) {
      (None, None) => MatchState::Empty,
      (Some(_), Some(_)) => MatchState::Ready,
      _ => MatchState::Partial,
    }
  }

  pub fn involves(&self, team: &TeamId) -> bool {
    self.team1.as_ref() == Some(team) || self.team2.as_ref() == Some(team)
  }

  /// Replaces both teams, absent values included, and drops a winner that is
  /// no longer playing. Returns whether anything changed.
  pub fn update_teams(&mut self, team1: Option<TeamId>, team2: Option<TeamId>) -> bool {
    let before = self.clone();
    self.team1 = team1;
    self.team2 = team2;
    self.retain_valid_winner();
    *self != before
  }

  pub(crate) fn retain_valid_winner(&mut self) {
    let keep = match &self.winner {
      Some(winner) => self.involves(winner),
      None => false,
    };
    if !keep {
      self.winner = None;
    }
  }
}

/// Which two matches of `from` feed each match of `to`. `sources[i]` lists
/// the indices whose winners become team1 and team2 of match `i`.
#[derive(Debug)]
pub struct Feed {
  pub from: Round,
  pub to: Round,
  pub sources: &'static [[usize; 2]],
}

const QUARTERFINAL_SOURCES: [[usize; 2]; 4] = [[0, 1], [2, 3], [4, 5], [6, 7]];
const SEMIFINAL_SOURCES: [[usize; 2]; 2] = [[0, 1], [2, 3]];
const FINAL_SOURCES: [[usize; 2]; 1] = [[0, 1]];

/// Ordered from the earliest round forward; the cascade relies on this order.
pub const FEEDS: [Feed; 3] = [
  Feed {
    from: Round::RoundOf16,
    to: Round::Quarterfinals,
    sources: &QUARTERFINAL_SOURCES,
  },
  Feed {
    from: Round::Quarterfinals,
    to: Round::Semifinals,
    sources: &SEMIFINAL_SOURCES,
  },
  Feed {
    from: Round::Semifinals,
    to: Round::Final,
    sources: &FINAL_SOURCES,
  },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketLink {
  pub from_round: Round,
  pub from_index: usize,
  pub to_round: Round,
  pub to_index: usize,
}

/// Every edge of the feed table, for renderers drawing connector lines.
pub fn bracket_links() -> Vec<BracketLink> {
  let mut links = Vec::new();
  for feed in &FEEDS {
    for (to_index, pair) in feed.sources.iter().enumerate() {
      for from_index in pair.iter().copied() {
        links.push(BracketLink {
          from_round: feed.from,
          from_index,
          to_round: feed.to,
          to_index,
        });
      }
    }
  }
  links.sort_by_key(|link| (link.from_round as u8, link.from_index));
  links
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bracket {
  pub round_of_16: [Match; 8],
  pub quarterfinals: [Match; 4],
  pub semifinals: [Match; 2],
  #[serde(rename = "final")]
  pub final_match: Match,
}

impl Bracket {
  pub fn new() -> Self {
    Bracket::default()
  }

  pub fn matches(&self, round: Round) -> &[Match] {
    match round {
      Round::RoundOf16 => &self.round_of_16,
      Round::Quarterfinals => &self.quarterfinals,
      Round::Semifinals => &self.semifinals,
      Round::Final => std::slice::from_ref(&self.final_match),
    }
  }

  pub fn matches_mut(&mut self, round: Round) -> &mut [Match] {
    match round {
      Round::RoundOf16 => &mut self.round_of_16,
      Round::Quarterfinals => &mut self.quarterfinals,
      Round::Semifinals => &mut self.semifinals,
      Round::Final => std::slice::from_mut(&mut self.final_match),
    }
  }

  pub fn get(&self, round: Round, index: usize) -> Option<&Match> {
    self.matches(round).get(index)
  }

  pub fn champion(&self) -> Option<&TeamId> {
    self.final_match.winner.as_ref()
  }

  /// Recomputes every round after the Round of 16 from the winners of the
  /// round before it. Running it twice without new input is a no-op.
  pub fn cascade(&mut self) -> usize {
    let mut changed = 0;
    for feed in &FEEDS {
      let winners = self
        .matches(feed.from)
        .iter()
        .map(|m| m.winner.clone())
        .collect::<Vec<_>>();
      let targets = self.matches_mut(feed.to);
      for (target, [a, b]) in targets.iter_mut().zip(feed.sources.iter()) {
        let team1 = winners.get(*a).cloned().flatten();
        let team2 = winners.get(*b).cloned().flatten();
        if target.update_teams(team1, team2) {
          changed += 1;
        }
      }
    }
    changed
  }
}

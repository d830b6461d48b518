use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::bracket::{bracket_links, Bracket, BracketLink, Match, MatchState, Round, TeamId};
use crate::error::{BracketError, Result};
use crate::qualification::{resolve_round_of_16, Group, Position};
use crate::roster::RosterConfig;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentState {
  pub groups: Vec<Group>,
  pub bracket: Bracket,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
  pub round: Round,
  pub index: usize,
  pub team1: Option<TeamId>,
  pub team2: Option<TeamId>,
  pub winner: Option<TeamId>,
  pub state: MatchState,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundView {
  pub round: Round,
  pub key: &'static str,
  pub label: String,
  pub matches: Vec<MatchView>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentSnapshot {
  pub event_name: String,
  pub groups: Vec<Group>,
  pub bracket: Bracket,
  pub rounds: Vec<RoundView>,
  pub champion: Option<TeamId>,
  pub links: Vec<BracketLink>,
}

/// Owns the group and bracket state. Every transition is computed on a copy
/// and published by swapping the `Arc`, so a reader holding a previous state
/// never sees a half-applied change.
pub struct Tournament {
  roster: RosterConfig,
  state: Arc<TournamentState>,
}

impl Tournament {
  pub fn new(roster: RosterConfig) -> Result<Self> {
    roster.validate()?;
    let state = Arc::new(fresh_state(&roster));
    info!(event = %roster.event.name, "tournament initialized");
    Ok(Tournament { roster, state })
  }

  pub fn state(&self) -> Arc<TournamentState> {
    Arc::clone(&self.state)
  }

  pub fn groups(&self) -> &[Group] {
    &self.state.groups
  }

  pub fn bracket(&self) -> &Bracket {
    &self.state.bracket
  }

  pub fn champion(&self) -> Option<&TeamId> {
    self.state.bracket.champion()
  }

  pub fn qualifier_options(&self, group_index: usize, position: Position) -> Result<Vec<TeamId>> {
    let group = self
      .state
      .groups
      .get(group_index)
      .ok_or(BracketError::InvalidGroup(group_index))?;
    Ok(group.options(position))
  }

  pub fn select_qualifier(
    &mut self,
    group_index: usize,
    position: Position,
    team: Option<TeamId>,
  ) -> Result<Arc<TournamentState>> {
    let group = self
      .state
      .groups
      .get(group_index)
      .ok_or(BracketError::InvalidGroup(group_index))?;
    if let Some(team) = team.as_ref() {
      if !group.contains(team) {
        warn!(group = group_index, %team, "qualifier is not on the group roster");
        return Err(BracketError::TeamNotInGroup {
          group: group_index,
          team: team.clone(),
        });
      }
      if group.qualifier(position.other()) == Some(team) {
        warn!(group = group_index, %team, "team already holds the other qualifying place");
        return Err(BracketError::InvalidGroupSelection {
          group: group_index,
          other: position.other(),
          team: team.clone(),
        });
      }
    }

    let mut next = (*self.state).clone();
    next.groups[group_index].set_qualifier(position, team);
    let seeded = resolve_round_of_16(&next.groups, &mut next.bracket);
    let cascaded = next.bracket.cascade();
    debug!(group = group_index, %position, seeded, cascaded, "qualifier updated");
    Ok(self.publish(next))
  }

  pub fn select_winner(&mut self, round: Round, match_index: usize, team: TeamId) -> Result<Arc<TournamentState>> {
    let target = self
      .state
      .bracket
      .get(round, match_index)
      .ok_or(BracketError::InvalidIndex {
        round,
        index: match_index,
      })?;
    if !target.involves(&team) {
      warn!(%round, index = match_index, %team, "rejected winner selection");
      return Err(BracketError::InvalidWinnerSelection {
        round,
        index: match_index,
        team,
      });
    }

    let mut next = (*self.state).clone();
    next.bracket.matches_mut(round)[match_index].winner = Some(team);
    let cascaded = next.bracket.cascade();
    debug!(%round, index = match_index, cascaded, "winner selected");
    Ok(self.publish(next))
  }

  pub fn select_final_winner(&mut self, team: TeamId) -> Result<Arc<TournamentState>> {
    self.select_winner(Round::Final, 0, team)
  }

  pub fn reset(&mut self) -> Arc<TournamentState> {
    info!(event = %self.roster.event.name, "tournament reset");
    self.publish(fresh_state(&self.roster))
  }

  pub fn snapshot(&self) -> TournamentSnapshot {
    let state = self.state();
    let rounds = Round::ALL
      .iter()
      .map(|round| RoundView {
        round: *round,
        key: round.key(),
        label: round.to_string(),
        matches: state
          .bracket
          .matches(*round)
          .iter()
          .enumerate()
          .map(|(index, m)| match_view(*round, index, m))
          .collect(),
      })
      .collect();

    TournamentSnapshot {
      event_name: self.roster.event.name.clone(),
      groups: state.groups.clone(),
      bracket: state.bracket.clone(),
      rounds,
      champion: state.bracket.champion().cloned(),
      links: bracket_links(),
    }
  }

  fn publish(&mut self, next: TournamentState) -> Arc<TournamentState> {
    self.state = Arc::new(next);
    self.state()
  }
}

fn fresh_state(roster: &RosterConfig) -> TournamentState {
  TournamentState {
    groups: roster.to_groups(),
    bracket: Bracket::new(),
  }
}

fn match_view(round: Round, index: usize, m: &Match) -> MatchView {
  MatchView {
    round,
    index,
    team1: m.team1.clone(),
    team2: m.team2.clone(),
    winner: m.winner.clone(),
    state: m.state(),
  }
}

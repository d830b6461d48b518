use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fs, path::Path};

use crate::bracket::TeamId;
use crate::error::{BracketError, Result};
use crate::qualification::{Group, GROUP_COUNT, TEAMS_PER_GROUP};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEventConfig {
  pub id: String,
  pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterGroupConfig {
  pub name: String,
  pub teams: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterConfig {
  pub event: RosterEventConfig,
  pub groups: Vec<RosterGroupConfig>,
}

impl RosterConfig {
  /// Checks the fixed tournament shape: 8 groups of 4, every team entered once.
  pub fn validate(&self) -> Result<()> {
    if self.groups.len() != GROUP_COUNT {
      return Err(BracketError::InvalidRoster(format!(
        "expected {GROUP_COUNT} groups, found {}",
        self.groups.len()
      )));
    }
    let mut seen = HashSet::new();
    for group in &self.groups {
      if group.teams.len() != TEAMS_PER_GROUP {
        return Err(BracketError::InvalidRoster(format!(
          "{} has {} teams, expected {TEAMS_PER_GROUP}",
          group.name,
          group.teams.len()
        )));
      }
      for team in &group.teams {
        let trimmed = team.trim();
        if trimmed.is_empty() {
          return Err(BracketError::InvalidRoster(format!("{} has a blank team name", group.name)));
        }
        if !seen.insert(trimmed.to_string()) {
          return Err(BracketError::InvalidRoster(format!("{trimmed} is entered more than once")));
        }
      }
    }
    Ok(())
  }

  pub fn to_groups(&self) -> Vec<Group> {
    self
      .groups
      .iter()
      .map(|group| {
        let teams = group
          .teams
          .iter()
          .map(|team| TeamId::new(team.trim()))
          .collect();
        Group::new(group.name.trim(), teams)
      })
      .collect()
  }
}

pub fn build_default_roster() -> RosterConfig {
  let groups = [
    ("A", ["Al Ahly SC", "FC Porto", "Inter Miami CF", "Palmeiras"]),
    ("B", ["Atletico Madrid", "Botafogo RJ", "Paris Saint-Germain", "Seattle Sounders FC"]),
    ("C", ["Auckland City FC", "Bayern München", "Benfica", "Boca Juniors"]),
    ("D", ["Chelsea", "Espérance", "Flamengo", "Leon"]),
    ("E", ["Inter", "Monterrey", "River Plate", "Urawa Red Diamonds"]),
    ("F", ["Borussia Dortmund", "Fluminense", "Mamelodi Sundowns FC", "Ulsan HD FC"]),
    ("G", ["Al-Ain", "Juventus", "Manchester City", "Wydad Casablanca"]),
    ("H", ["Al Hilal", "Pachuca", "Real Madrid", "Salzburg"]),
  ];

  RosterConfig {
    event: RosterEventConfig {
      id: "club-world-cup-2025".to_string(),
      name: "Club World Cup 2025".to_string(),
    },
    groups: groups
      .iter()
      .map(|(letter, teams)| RosterGroupConfig {
        name: format!("Group {letter}"),
        teams: teams.iter().map(|team| team.to_string()).collect(),
      })
      .collect(),
  }
}

pub fn load_roster_from(path: &Path) -> Result<RosterConfig> {
  if !path.is_file() {
    return Err(BracketError::Config(format!("roster not found at {}", path.display())));
  }
  let data = fs::read_to_string(path)
    .map_err(|e| BracketError::Config(format!("read roster {}: {e}", path.display())))?;
  let roster = serde_json::from_str::<RosterConfig>(&data)
    .map_err(|e| BracketError::Config(format!("parse roster {}: {e}", path.display())))?;
  roster.validate()?;
  Ok(roster)
}

/// Loads the configured roster, or the built-in one when no path is set.
pub fn load_roster(path: Option<&Path>) -> Result<RosterConfig> {
  match path {
    Some(path) => load_roster_from(path),
    None => Ok(build_default_roster()),
  }
}

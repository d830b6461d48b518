use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use crate::bracket::{Round, TeamId};
use crate::qualification::Position;
use crate::tournament::Tournament;

// ── Constants ──────────────────────────────────────────────────────────

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:17890";
pub const LOG_FILE_NAME: &str = "bracket.log";

// ── Shared state type aliases ──────────────────────────────────────────

pub type SharedTournament = Arc<Mutex<Tournament>>;

// ── App config ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub static_dir: String,
    pub roster_path: String,
}

// ── Request payloads ───────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectQualifierRequest {
    pub group_index: usize,
    pub position: Position,
    #[serde(default)]
    pub team: Option<TeamId>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectWinnerRequest {
    pub round: Round,
    pub match_index: usize,
    pub team: TeamId,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectFinalWinnerRequest {
    pub team: TeamId,
}

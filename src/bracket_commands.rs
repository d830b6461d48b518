use crate::bracket::TeamId;
use crate::error::BracketError;
use crate::qualification::Position;
use crate::tournament::{Tournament, TournamentSnapshot};
use crate::types::*;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

// ── Errors ──────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum CommandError {
    Rejected(BracketError),
    Poisoned,
}

impl From<BracketError> for CommandError {
    fn from(err: BracketError) -> Self {
        CommandError::Rejected(err)
    }
}

impl IntoResponse for CommandError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            CommandError::Rejected(err) => {
                let status = match err {
                    BracketError::InvalidWinnerSelection { .. }
                    | BracketError::InvalidGroupSelection { .. }
                    | BracketError::TeamNotInGroup { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                    BracketError::InvalidIndex { .. } | BracketError::InvalidGroup(_) => StatusCode::NOT_FOUND,
                    BracketError::InvalidRoster(_) | BracketError::Config(_) | BracketError::Server(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, err.to_string())
            }
            CommandError::Poisoned => {
                error!("tournament lock poisoned");
                (StatusCode::INTERNAL_SERVER_ERROR, "Tournament state is unavailable.".to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Lock the tournament for one whole transition, then call `f` with it.
fn with_tournament<F, R>(shared: &SharedTournament, f: F) -> Result<R, CommandError>
where
    F: FnOnce(&mut Tournament) -> Result<R, BracketError>,
{
    let mut guard = shared.lock().map_err(|_| CommandError::Poisoned)?;
    f(&mut guard).map_err(CommandError::from)
}

/// The UI sends an empty string when a selector is cleared.
fn non_blank(team: Option<TeamId>) -> Option<TeamId> {
    team.filter(|team| !team.as_str().trim().is_empty())
}

// ── Commands ────────────────────────────────────────────────────────────

pub async fn bracket_state(State(shared): State<SharedTournament>) -> Result<Json<TournamentSnapshot>, CommandError> {
    with_tournament(&shared, |t| Ok(t.snapshot())).map(Json)
}

pub async fn qualifier_options(
    State(shared): State<SharedTournament>,
    Path((group_index, position)): Path<(usize, Position)>,
) -> Result<Json<Vec<TeamId>>, CommandError> {
    with_tournament(&shared, |t| t.qualifier_options(group_index, position)).map(Json)
}

pub async fn select_qualifier(
    State(shared): State<SharedTournament>,
    Json(request): Json<SelectQualifierRequest>,
) -> Result<Json<TournamentSnapshot>, CommandError> {
    with_tournament(&shared, |t| {
        t.select_qualifier(request.group_index, request.position, non_blank(request.team))?;
        Ok(t.snapshot())
    })
    .map(Json)
}

pub async fn select_winner(
    State(shared): State<SharedTournament>,
    Json(request): Json<SelectWinnerRequest>,
) -> Result<Json<TournamentSnapshot>, CommandError> {
    with_tournament(&shared, |t| {
        t.select_winner(request.round, request.match_index, request.team)?;
        Ok(t.snapshot())
    })
    .map(Json)
}

pub async fn select_final_winner(
    State(shared): State<SharedTournament>,
    Json(request): Json<SelectFinalWinnerRequest>,
) -> Result<Json<TournamentSnapshot>, CommandError> {
    with_tournament(&shared, |t| {
        t.select_final_winner(request.team)?;
        Ok(t.snapshot())
    })
    .map(Json)
}

pub async fn reset_bracket(State(shared): State<SharedTournament>) -> Result<Json<TournamentSnapshot>, CommandError> {
    with_tournament(&shared, |t| {
        t.reset();
        Ok(t.snapshot())
    })
    .map(Json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_team_means_cleared() {
        assert_eq!(non_blank(Some(TeamId::from("  "))), None);
        assert_eq!(non_blank(Some(TeamId::from("Chelsea"))), Some(TeamId::from("Chelsea")));
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn selection_errors_map_to_unprocessable() {
        let response = CommandError::from(BracketError::InvalidGroup(9)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = CommandError::from(BracketError::InvalidWinnerSelection {
            round: crate::bracket::Round::Final,
            index: 0,
            team: TeamId::from("Chelsea"),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}

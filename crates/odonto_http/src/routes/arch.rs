//! Arch submission and listing routes.
//!
//! # Invariants
//! - Validation failures map to 400 and never open a transaction.
//! - Any storage failure during a batch maps to 500 after rollback.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

use odonto_core::{
    ArchEntry, ArchService, ArchServiceError, ArchSubmission, ArchValidationError,
    SqliteArchRepository, SqliteToothRepository, Tooth, ToothRepository,
};

use crate::error::ApiError;
use crate::state::AppState;
use crate::wire::AddArchBody;

const MISSING_FIELDS_MESSAGE: &str = "Por favor, forneça todos os dados necessários.";
const LENGTH_MISMATCH_MESSAGE: &str = "Notas e dentes não correspondem.";
const INVALID_TOKEN_MESSAGE: &str = "Dados da arcada inválidos.";
const SAVE_FAILED_MESSAGE: &str = "Erro ao salvar os dados";
const SAVED_MESSAGE: &str = "Dados inseridos com sucesso.";
const LIST_FAILED_MESSAGE: &str = "Erro ao listar os dados.";

#[derive(Debug, Serialize)]
pub struct AddArchResponse {
    message: &'static str,
    linhas: usize,
}

pub async fn add_arch(
    State(state): State<AppState>,
    payload: Result<Json<AddArchBody>, JsonRejection>,
) -> Result<Json<AddArchResponse>, ApiError> {
    let Json(body) = payload?;
    let submission = ArchSubmission::from(body);

    let ack = state
        .with_connection(move |conn| {
            ArchService::new(SqliteArchRepository::new(conn))
                .submit(&submission)
                .map_err(submit_error)
        })
        .await?;

    Ok(Json(AddArchResponse {
        message: SAVED_MESSAGE,
        linhas: ack.rows,
    }))
}

pub async fn list_arch_entries(
    State(state): State<AppState>,
) -> Result<Json<Vec<ArchEntry>>, ApiError> {
    let entries = state
        .with_connection(|conn| {
            ArchService::new(SqliteArchRepository::new(conn))
                .list_entries()
                .map_err(|err| ApiError::internal(LIST_FAILED_MESSAGE, err))
        })
        .await?;
    Ok(Json(entries))
}

pub async fn list_teeth(State(state): State<AppState>) -> Result<Json<Vec<Tooth>>, ApiError> {
    let teeth = state
        .with_connection(|conn| {
            SqliteToothRepository::new(conn)
                .list_teeth()
                .map_err(|err| ApiError::internal(LIST_FAILED_MESSAGE, err))
        })
        .await?;
    Ok(Json(teeth))
}

fn submit_error(err: ArchServiceError) -> ApiError {
    match err {
        ArchServiceError::Validation(ArchValidationError::MissingFields) => {
            ApiError::bad_request(MISSING_FIELDS_MESSAGE)
        }
        ArchServiceError::Validation(invalid @ ArchValidationError::LengthMismatch { .. }) => {
            ApiError::bad_request(LENGTH_MISMATCH_MESSAGE).with_cause(invalid)
        }
        ArchServiceError::Validation(invalid) => {
            ApiError::bad_request(INVALID_TOKEN_MESSAGE).with_cause(invalid)
        }
        other => ApiError::internal(SAVE_FAILED_MESSAGE, other),
    }
}

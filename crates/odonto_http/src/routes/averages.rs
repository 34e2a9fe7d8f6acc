//! Patient average routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use odonto_core::{AverageService, AverageServiceError, PatientAverage, SqliteAverageRepository};

use crate::error::ApiError;
use crate::state::AppState;
use crate::wire::{AddAverageBody, FieldValue};

const MISSING_FIELDS_MESSAGE: &str = "Por favor, forneça o código e a média do paciente.";
const RECORD_FAILED_MESSAGE: &str = "Erro ao cadastrar média.";
const LIST_FAILED_MESSAGE: &str = "Erro ao listar médias.";

pub async fn add_average(
    State(state): State<AppState>,
    payload: Result<Json<AddAverageBody>, JsonRejection>,
) -> Result<Json<PatientAverage>, ApiError> {
    let Json(body) = payload?;
    let patient_ref = body.cod_paciente.map(FieldValue::into_token);
    let average_value = body.media.map(FieldValue::into_token);

    let average = state
        .with_connection(move |conn| {
            AverageService::new(SqliteAverageRepository::new(conn))
                .record_average(patient_ref.as_deref(), average_value.as_deref())
                .map_err(record_error)
        })
        .await?;
    Ok(Json(average))
}

pub async fn list_averages(
    State(state): State<AppState>,
) -> Result<Json<Vec<PatientAverage>>, ApiError> {
    let averages = state
        .with_connection(|conn| {
            AverageService::new(SqliteAverageRepository::new(conn))
                .list_averages()
                .map_err(|err| ApiError::internal(LIST_FAILED_MESSAGE, err))
        })
        .await?;
    Ok(Json(averages))
}

fn record_error(err: AverageServiceError) -> ApiError {
    match err {
        AverageServiceError::MissingFields => ApiError::bad_request(MISSING_FIELDS_MESSAGE),
        AverageServiceError::InvalidField { .. } => {
            ApiError::bad_request(MISSING_FIELDS_MESSAGE).with_cause(err)
        }
        other => ApiError::internal(RECORD_FAILED_MESSAGE, other),
    }
}

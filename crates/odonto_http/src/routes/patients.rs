//! Patient registration and lookup routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

use odonto_core::{Patient, PatientRegistration, PatientService, PatientServiceError};
use odonto_core::SqlitePatientRepository;

use crate::error::ApiError;
use crate::state::AppState;
use crate::wire::AddPatientBody;

const MISSING_FIELDS_MESSAGE: &str = "Por favor, preencha todos os campos.";
const REGISTER_FAILED_MESSAGE: &str = "Erro ao cadastrar paciente.";
const MISSING_CODE_MESSAGE: &str = "codPaciente do paciente é necessário.";
const NOT_FOUND_MESSAGE: &str = "Paciente não encontrado.";
const LOOKUP_FAILED_MESSAGE: &str = "Erro ao buscar paciente.";

pub async fn add_patient(
    State(state): State<AppState>,
    payload: Result<Json<AddPatientBody>, JsonRejection>,
) -> Result<Json<Patient>, ApiError> {
    let Json(body) = payload?;
    let registration = PatientRegistration::from(body);

    let patient = state
        .with_connection(move |conn| {
            PatientService::new(SqlitePatientRepository::new(conn))
                .register(&registration)
                .map_err(register_error)
        })
        .await?;
    Ok(Json(patient))
}

pub async fn get_patient(
    State(state): State<AppState>,
    Path(cod_paciente): Path<String>,
) -> Result<Json<Patient>, ApiError> {
    let patient = state
        .with_connection(move |conn| {
            PatientService::new(SqlitePatientRepository::new(conn))
                .find_by_enrollment_code(&cod_paciente)
                .map_err(lookup_error)
        })
        .await?;
    Ok(Json(patient))
}

fn register_error(err: PatientServiceError) -> ApiError {
    match err {
        PatientServiceError::MissingFields => ApiError::bad_request(MISSING_FIELDS_MESSAGE),
        PatientServiceError::InvalidField { .. } => {
            ApiError::bad_request(MISSING_FIELDS_MESSAGE).with_cause(err)
        }
        other => ApiError::internal(REGISTER_FAILED_MESSAGE, other),
    }
}

fn lookup_error(err: PatientServiceError) -> ApiError {
    match err {
        PatientServiceError::MissingFields => ApiError::bad_request(MISSING_CODE_MESSAGE),
        PatientServiceError::NotFound(_) => ApiError::not_found(NOT_FOUND_MESSAGE),
        other => ApiError::internal(LOOKUP_FAILED_MESSAGE, other),
    }
}

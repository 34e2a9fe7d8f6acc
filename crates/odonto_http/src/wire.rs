//! Request payloads as sent by existing clients.
//!
//! Field values arrive as JSON strings or numbers; list fields arrive as a
//! comma-delimited string or a JSON array. Everything is normalized to text
//! tokens before it reaches core validation.

use odonto_core::{ArchSubmission, PatientRegistration, RawTokenList};
use serde::Deserialize;

/// Scalar field accepted as either a string or a number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(serde_json::Number),
}

impl FieldValue {
    pub fn into_token(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

/// List field accepted as delimited text or a JSON array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ListField {
    Items(Vec<FieldValue>),
    Single(FieldValue),
}

impl From<ListField> for RawTokenList {
    fn from(value: ListField) -> Self {
        match value {
            ListField::Items(items) => {
                Self::Items(items.into_iter().map(FieldValue::into_token).collect())
            }
            ListField::Single(value) => Self::Delimited(value.into_token()),
        }
    }
}

fn token(value: Option<FieldValue>) -> Option<String> {
    value.map(FieldValue::into_token)
}

/// `POST /addpaciente` body.
#[derive(Debug, Deserialize)]
pub struct AddPatientBody {
    pub nome: Option<FieldValue>,
    pub cpf: Option<FieldValue>,
    pub matricula: Option<FieldValue>,
    pub sexo: Option<FieldValue>,
    pub idade: Option<FieldValue>,
}

impl From<AddPatientBody> for PatientRegistration {
    fn from(body: AddPatientBody) -> Self {
        Self {
            name: token(body.nome),
            national_id: token(body.cpf),
            enrollment_code: token(body.matricula),
            sex: token(body.sexo),
            age: token(body.idade),
        }
    }
}

/// `POST /adddentes` body.
#[derive(Debug, Deserialize)]
pub struct AddArchBody {
    #[serde(rename = "Avaliacao_arcada")]
    pub scores: Option<ListField>,
    #[serde(rename = "fk_Paciente_Cod_Paciente")]
    pub patient_ref: Option<FieldValue>,
    #[serde(rename = "fk_Dente_Cod_dente")]
    pub tooth_refs: Option<ListField>,
}

impl From<AddArchBody> for ArchSubmission {
    fn from(body: AddArchBody) -> Self {
        Self {
            scores: body.scores.map(RawTokenList::from),
            patient_ref: token(body.patient_ref),
            tooth_refs: body.tooth_refs.map(RawTokenList::from),
        }
    }
}

/// `POST /addmedia` body.
#[derive(Debug, Deserialize)]
pub struct AddAverageBody {
    pub cod_paciente: Option<FieldValue>,
    pub media: Option<FieldValue>,
}

#[cfg(test)]
mod tests {
    use super::{AddArchBody, AddPatientBody};
    use odonto_core::{ArchSubmission, PatientRegistration, RawTokenList};

    #[test]
    fn arch_body_accepts_delimited_strings() {
        let body: AddArchBody = serde_json::from_str(
            r#"{"Avaliacao_arcada":"5,4,3","fk_Paciente_Cod_Paciente":"7","fk_Dente_Cod_dente":"11,12,13"}"#,
        )
        .unwrap();
        let submission = ArchSubmission::from(body);
        assert_eq!(submission, ArchSubmission::delimited("5,4,3", "7", "11,12,13"));
    }

    #[test]
    fn arch_body_accepts_arrays_and_numbers() {
        let body: AddArchBody = serde_json::from_str(
            r#"{"Avaliacao_arcada":[5,"4"],"fk_Paciente_Cod_Paciente":7,"fk_Dente_Cod_dente":[11,12]}"#,
        )
        .unwrap();
        let submission = ArchSubmission::from(body);
        assert_eq!(
            submission.scores,
            Some(RawTokenList::Items(vec!["5".to_string(), "4".to_string()]))
        );
        assert_eq!(submission.patient_ref.as_deref(), Some("7"));
        assert_eq!(
            submission.tooth_refs,
            Some(RawTokenList::Items(vec!["11".to_string(), "12".to_string()]))
        );
    }

    #[test]
    fn patient_body_treats_null_and_absent_as_missing() {
        let body: AddPatientBody =
            serde_json::from_str(r#"{"nome":"Ana","cpf":null,"idade":30}"#).unwrap();
        let registration = PatientRegistration::from(body);
        assert_eq!(registration.name.as_deref(), Some("Ana"));
        assert_eq!(registration.national_id, None);
        assert_eq!(registration.enrollment_code, None);
        assert_eq!(registration.age.as_deref(), Some("30"));
    }
}

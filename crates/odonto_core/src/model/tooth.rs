//! Tooth reference entity.

use serde::{Deserialize, Serialize};

/// Tooth identifier in FDI two-digit notation (`11`..`48`).
pub type ToothId = i64;

/// One row of the read-only tooth catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tooth {
    #[serde(rename = "cod_dente")]
    pub tooth_id: ToothId,
    #[serde(rename = "nome")]
    pub name: String,
}

//! Core use-case services.
//!
//! # Responsibility
//! - Validate caller input before any repository call.
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep the HTTP boundary decoupled from storage details.

pub mod arch_service;
pub mod average_service;
pub mod patient_service;

/// Returns the trimmed value when present and non-blank.
pub(crate) fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

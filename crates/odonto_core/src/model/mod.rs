//! Domain model for dental exam records.
//!
//! # Responsibility
//! - Define the records shared by repositories, services and the HTTP boundary.
//! - Own the arch submission shape and its validation error taxonomy.
//!
//! # Invariants
//! - Identities (`PatientId`, `ToothId`, ...) are assigned by the store.
//! - Every persisted record is append-only from the core's point of view.

pub mod arch;
pub mod average;
pub mod patient;
pub mod tooth;

//! Route handlers, one module per resource.

pub mod arch;
pub mod averages;
pub mod health;
pub mod patients;

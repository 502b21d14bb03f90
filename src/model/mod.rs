//! Form model types.
//!
//! This module contains the data types shared by the store, the persistence
//! bridge, and the command line:
//! - `Form` and `FormPatch`
//! - `Field`, `NewField`, `FieldPatch` and `FieldType`
//! - `Submission`
//! - wire helpers for timestamps

mod error;
mod field;
mod form;
mod submission;
pub mod timestamp;

pub use error::ModelError;
pub use field::{Field, FieldPatch, FieldType, NewField};
pub use form::{Form, FormPatch};
pub use submission::Submission;

//! Model persistence
//!
//! The trained classifier is written as a JSON artifact that carries its own
//! feature schema, so the serving side never needs a separate list of
//! expected fields.

mod artifact;

pub use artifact::ModelArtifact;

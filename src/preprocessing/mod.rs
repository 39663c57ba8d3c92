//! Data preprocessing module
//!
//! Feature scaling fitted on named columns, persisted alongside the model so
//! the serving path applies the same transform the classifier was trained on.

mod scaler;

pub use scaler::{Scaler, ScalerType};

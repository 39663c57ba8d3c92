//! Built-in diabetes progression dataset
//!
//! 442 patients, ten baseline variables (age, sex, body mass index, average
//! blood pressure and six blood serum measurements) and a quantitative
//! measure of disease progression one year after baseline. Feature values
//! are mean-centred and scaled; the target is raw.
//!
//! The CSV is compiled into the binary so training needs no external files.

use crate::error::{ClassifierError, Result};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use std::io::Cursor;

const DIABETES_CSV: &[u8] = include_bytes!("../../data/diabetes.csv");

/// Feature columns, in the order the classifier consumes them
pub const FEATURE_NAMES: [&str; 10] = [
    "age", "sex", "bmi", "bp", "s1", "s2", "s3", "s4", "s5", "s6",
];

/// Continuous disease-progression column
pub const TARGET_COLUMN: &str = "target";

/// Progression values strictly above this are labelled diabetic
pub const DIABETIC_THRESHOLD: f64 = 140.0;

/// Load the embedded dataset as a `DataFrame`
pub fn load_diabetes() -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .into_reader_with_file_handle(Cursor::new(DIABETES_CSV))
        .finish()?;

    for name in FEATURE_NAMES.iter().chain(std::iter::once(&TARGET_COLUMN)) {
        if df.column(name).is_err() {
            return Err(ClassifierError::FeatureNotFound(name.to_string()));
        }
    }

    Ok(df)
}

/// Owned copy of [`FEATURE_NAMES`]
pub fn feature_names() -> Vec<String> {
    FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
}

/// Derive a 0/1 label from a continuous column: `1.0` when `value > threshold`
pub fn binarize_target(df: &DataFrame, column: &str, threshold: f64) -> Result<Array1<f64>> {
    let values = float_column(df, column)?;

    values
        .into_iter()
        .enumerate()
        .map(|(row, v)| match v {
            Some(v) => Ok(if v > threshold { 1.0 } else { 0.0 }),
            None => Err(ClassifierError::DataError(format!(
                "null target in column '{}' at row {}",
                column, row
            ))),
        })
        .collect()
}

/// Extract named columns from a DataFrame into a row-major `Array2<f64>`.
/// Nulls are read as `0.0`.
pub fn feature_matrix(df: &DataFrame, col_names: &[String]) -> Result<Array2<f64>> {
    let n_rows = df.height();
    let n_cols = col_names.len();

    let col_data: Vec<Vec<f64>> = col_names
        .iter()
        .map(|col_name| {
            let values = float_column(df, col_name)?;
            Ok(values.into_iter().map(|v| v.unwrap_or(0.0)).collect())
        })
        .collect::<Result<Vec<Vec<f64>>>>()?;

    Ok(Array2::from_shape_fn((n_rows, n_cols), |(r, c)| col_data[c][r]))
}

fn float_column(df: &DataFrame, col_name: &str) -> Result<Float64Chunked> {
    let column = df
        .column(col_name)
        .map_err(|_| ClassifierError::FeatureNotFound(col_name.to_string()))?;
    let casted = column.cast(&DataType::Float64)?;
    Ok(casted.f64()?.clone())
}

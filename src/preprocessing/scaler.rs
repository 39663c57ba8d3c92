//! Feature scaling over named DataFrame columns

use crate::error::{ClassifierError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Type of scaler to use
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScalerType {
    /// Standard scaling (z-score normalization): (x - mean) / std
    Standard,
    /// Min-Max scaling: (x - min) / (max - min)
    MinMax,
    /// No scaling
    None,
}

/// Parameters for a fitted column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ScalerParams {
    center: f64, // mean or min
    scale: f64,  // std or range
}

/// Feature scaler, fitted per column name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scaler {
    scaler_type: ScalerType,
    params: HashMap<String, ScalerParams>,
    is_fitted: bool,
}

impl Scaler {
    /// Create a new scaler
    pub fn new(scaler_type: ScalerType) -> Self {
        Self {
            scaler_type,
            params: HashMap::new(),
            is_fitted: false,
        }
    }

    pub fn scaler_type(&self) -> &ScalerType {
        &self.scaler_type
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Whether the scaler holds parameters for `column`
    pub fn covers(&self, column: &str) -> bool {
        self.params.contains_key(column)
    }

    /// Fit the scaler to the given columns of `df`
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        if df.height() == 0 {
            return Err(ClassifierError::PreprocessingError(
                "cannot fit scaler on an empty frame".to_string(),
            ));
        }

        self.params.clear();
        for col_name in columns {
            let column = df
                .column(col_name)
                .map_err(|_| ClassifierError::FeatureNotFound(col_name.to_string()))?;
            let series = column.as_materialized_series();

            let params = self.compute_params(series)?;
            self.params.insert(col_name.to_string(), params);
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Transform the fitted columns of `df`; other columns pass through untouched.
    /// Every fitted column must be present.
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        self.apply(df, |v, p| (v - p.center) / p.scale)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    /// Undo [`Scaler::transform`]
    pub fn inverse_transform(&self, df: &DataFrame) -> Result<DataFrame> {
        self.apply(df, |v, p| v * p.scale + p.center)
    }

    /// Save the fitted scaler as JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if !self.is_fitted {
            return Err(ClassifierError::ModelNotFitted);
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a scaler from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let scaler: Self = serde_json::from_str(&json)?;
        Ok(scaler)
    }

    /// Builds all replacement columns first, then swaps them in on one clone.
    fn apply(&self, df: &DataFrame, f: impl Fn(f64, &ScalerParams) -> f64) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(ClassifierError::ModelNotFitted);
        }

        let replacements: Vec<Series> = self
            .params
            .iter()
            .map(|(col_name, params)| {
                let column = df
                    .column(col_name)
                    .map_err(|_| ClassifierError::FeatureNotFound(col_name.clone()))?;
                let series = column.as_materialized_series();
                let ca = series.cast(&DataType::Float64)?;
                let mapped: Float64Chunked = ca
                    .f64()?
                    .into_iter()
                    .map(|opt| opt.map(|v| f(v, params)))
                    .collect();
                Ok(mapped.with_name(series.name().clone()).into_series())
            })
            .collect::<Result<Vec<_>>>()?;

        let mut result = df.clone();
        for scaled in replacements {
            result.with_column(scaled)?;
        }

        Ok(result)
    }

    fn compute_params(&self, series: &Series) -> Result<ScalerParams> {
        let casted = series.cast(&DataType::Float64)?;
        let ca = casted.f64()?;

        match self.scaler_type {
            ScalerType::Standard => {
                let mean = ca.mean().unwrap_or(0.0);
                // population std, matching the usual StandardScaler definition
                let std = ca.std(0).unwrap_or(1.0);
                Ok(ScalerParams {
                    center: mean,
                    scale: if std == 0.0 { 1.0 } else { std },
                })
            }
            ScalerType::MinMax => {
                let min = ca.min().unwrap_or(0.0);
                let max = ca.max().unwrap_or(1.0);
                let range = max - min;
                Ok(ScalerParams {
                    center: min,
                    scale: if range == 0.0 { 1.0 } else { range },
                })
            }
            ScalerType::None => Ok(ScalerParams {
                center: 0.0,
                scale: 1.0,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        df!(
            "a" => &[1.0, 2.0, 3.0, 4.0, 5.0],
            "b" => &[7.0, 7.0, 7.0, 7.0, 7.0],
            "label" => &[0.0, 1.0, 0.0, 1.0, 1.0]
        )
        .unwrap()
    }

    #[test]
    fn test_standard_scaler() {
        let mut scaler = Scaler::new(ScalerType::Standard);
        let result = scaler.fit_transform(&frame(), &["a"]).unwrap();

        let col = result.column("a").unwrap().f64().unwrap();
        assert!(col.mean().unwrap().abs() < 1e-10);
        assert!((col.std(0).unwrap() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_constant_column_is_left_centred() {
        let mut scaler = Scaler::new(ScalerType::Standard);
        let result = scaler.fit_transform(&frame(), &["b"]).unwrap();

        let col = result.column("b").unwrap().f64().unwrap();
        assert!(col.into_iter().all(|v| v == Some(0.0)));
    }

    #[test]
    fn test_unfitted_columns_pass_through() {
        let mut scaler = Scaler::new(ScalerType::Standard);
        let result = scaler.fit_transform(&frame(), &["a"]).unwrap();
        let label: Vec<Option<f64>> = result.column("label").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(label, vec![Some(0.0), Some(1.0), Some(0.0), Some(1.0), Some(1.0)]);
    }

    #[test]
    fn test_minmax_scaler() {
        let mut scaler = Scaler::new(ScalerType::MinMax);
        let result = scaler.fit_transform(&frame(), &["a"]).unwrap();

        let col = result.column("a").unwrap().f64().unwrap();
        assert!((col.min().unwrap() - 0.0).abs() < 1e-10);
        assert!((col.max().unwrap() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_inverse_transform() {
        let df = frame();
        let mut scaler = Scaler::new(ScalerType::Standard);
        let scaled = scaler.fit_transform(&df, &["a"]).unwrap();
        let unscaled = scaler.inverse_transform(&scaled).unwrap();

        let original = df.column("a").unwrap().f64().unwrap();
        let restored = unscaled.column("a").unwrap().f64().unwrap();

        for (o, r) in original.into_iter().zip(restored.into_iter()) {
            assert!((o.unwrap() - r.unwrap()).abs() < 1e-10);
        }
    }

    #[test]
    fn test_transform_requires_fit() {
        let scaler = Scaler::new(ScalerType::Standard);
        assert!(matches!(scaler.transform(&frame()), Err(ClassifierError::ModelNotFitted)));
    }

    #[test]
    fn test_transform_missing_column() {
        let mut scaler = Scaler::new(ScalerType::Standard);
        scaler.fit(&frame(), &["a"]).unwrap();
        let other = df!("b" => &[1.0]).unwrap();
        assert!(matches!(
            scaler.transform(&other),
            Err(ClassifierError::FeatureNotFound(ref c)) if c == "a"
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scaler.json");

        let mut scaler = Scaler::new(ScalerType::Standard);
        scaler.fit(&frame(), &["a"]).unwrap();
        scaler.save(&path).unwrap();

        let loaded = Scaler::load(&path).unwrap();
        assert!(loaded.is_fitted());
        assert!(loaded.covers("a"));
        assert_eq!(loaded.params, scaler.params);
    }
}

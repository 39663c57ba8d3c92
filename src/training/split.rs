//! Seeded train/test partitioning

use crate::error::{ClassifierError, Result};
use polars::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Row indices of a single train/test split
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

/// Shuffled hold-out splitter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainTestSplit {
    test_size: f64,
    random_state: Option<u64>,
}

impl Default for TrainTestSplit {
    fn default() -> Self {
        Self::new(0.2)
    }
}

impl TrainTestSplit {
    /// Create a splitter holding out `test_size` of the rows
    pub fn new(test_size: f64) -> Self {
        Self {
            test_size,
            random_state: None,
        }
    }

    /// Set random state for reproducibility
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Generate the split; the test side gets `ceil(n_samples * test_size)` rows
    pub fn split(&self, n_samples: usize) -> Result<SplitIndices> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(ClassifierError::InvalidParameter {
                name: "test_size".to_string(),
                value: self.test_size.to_string(),
                reason: "must be strictly between 0 and 1".to_string(),
            });
        }

        let n_test = (n_samples as f64 * self.test_size).ceil() as usize;
        if n_test == 0 || n_test >= n_samples {
            return Err(ClassifierError::DataError(format!(
                "n_samples ({}) too small for test_size {}",
                n_samples, self.test_size
            )));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        let mut rng = match self.random_state {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        indices.shuffle(&mut rng);

        let train_indices = indices.split_off(n_test);
        Ok(SplitIndices {
            train_indices,
            test_indices: indices,
        })
    }

    /// Split a DataFrame into `(train, test)` frames
    pub fn split_frame(&self, df: &DataFrame) -> Result<(DataFrame, DataFrame)> {
        let split = self.split(df.height())?;
        Ok((
            take_rows(df, &split.train_indices)?,
            take_rows(df, &split.test_indices)?,
        ))
    }
}

fn take_rows(df: &DataFrame, rows: &[usize]) -> Result<DataFrame> {
    let idx = IdxCa::from_vec(
        "idx".into(),
        rows.iter().map(|&i| i as IdxSize).collect(),
    );
    Ok(df.take(&idx)?)
}

//! Classification metrics

use crate::error::{ClassifierError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Fraction of predictions equal to the true label
pub fn accuracy_score(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64> {
    if y_true.len() != y_pred.len() {
        return Err(ClassifierError::ShapeError {
            expected: format!("{} predictions", y_true.len()),
            actual: format!("{} predictions", y_pred.len()),
        });
    }
    if y_true.is_empty() {
        return Err(ClassifierError::DataError(
            "accuracy is undefined for an empty set".to_string(),
        ));
    }

    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(actual, pred)| (*pred - *actual).abs() < 0.5)
        .count();

    Ok(correct as f64 / y_true.len() as f64)
}

/// Binary confusion counts, positive class = 1
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_positive: usize,
    pub false_positive: usize,
    pub true_negative: usize,
    pub false_negative: usize,
}

impl ConfusionMatrix {
    pub fn from_predictions(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(ClassifierError::ShapeError {
                expected: format!("{} predictions", y_true.len()),
                actual: format!("{} predictions", y_pred.len()),
            });
        }

        let mut cm = Self::default();
        for (actual, pred) in y_true.iter().zip(y_pred.iter()) {
            match (*actual >= 0.5, *pred >= 0.5) {
                (true, true) => cm.true_positive += 1,
                (false, true) => cm.false_positive += 1,
                (false, false) => cm.true_negative += 1,
                (true, false) => cm.false_negative += 1,
            }
        }
        Ok(cm)
    }

    pub fn total(&self) -> usize {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }

    pub fn precision(&self) -> Option<f64> {
        let predicted = self.true_positive + self.false_positive;
        (predicted > 0).then(|| self.true_positive as f64 / predicted as f64)
    }

    pub fn recall(&self) -> Option<f64> {
        let actual = self.true_positive + self.false_negative;
        (actual > 0).then(|| self.true_positive as f64 / actual as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_accuracy() {
        let y_true = array![1.0, 0.0, 1.0, 1.0];
        let y_pred = array![1.0, 0.0, 0.0, 1.0];
        assert_eq!(accuracy_score(&y_true, &y_pred).unwrap(), 0.75);
    }

    #[test]
    fn test_accuracy_length_mismatch() {
        assert!(accuracy_score(&array![1.0], &array![1.0, 0.0]).is_err());
        assert!(accuracy_score(&Array1::zeros(0), &Array1::zeros(0)).is_err());
    }

    #[test]
    fn test_confusion_matrix() {
        let y_true = array![1.0, 0.0, 1.0, 0.0, 1.0];
        let y_pred = array![1.0, 1.0, 0.0, 0.0, 1.0];
        let cm = ConfusionMatrix::from_predictions(&y_true, &y_pred).unwrap();

        assert_eq!(cm.true_positive, 2);
        assert_eq!(cm.false_positive, 1);
        assert_eq!(cm.true_negative, 1);
        assert_eq!(cm.false_negative, 1);
        assert_eq!(cm.total(), 5);
        assert!((cm.precision().unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert!((cm.recall().unwrap() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_precision_undefined_without_positive_predictions() {
        let cm = ConfusionMatrix::from_predictions(&array![1.0, 0.0], &array![0.0, 0.0]).unwrap();
        assert_eq!(cm.precision(), None);
        assert_eq!(cm.recall(), Some(0.0));
    }
}

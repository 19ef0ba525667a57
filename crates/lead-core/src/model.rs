use serde::{Deserialize, Serialize};

use crate::error::ScoreError;
use crate::util::sigmoid;

/// artifact 里的原始形态
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegressionSpec {
    pub classes: Vec<i64>,
    pub coef: Vec<f64>,
    pub intercept: f64,
}

/// 二分类逻辑回归：p1 = sigmoid(intercept + coef · x)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "LogisticRegressionSpec", into = "LogisticRegressionSpec")]
pub struct LogisticRegression {
    classes: [i64; 2],
    coef: Vec<f64>,
    intercept: f64,
}

impl TryFrom<LogisticRegressionSpec> for LogisticRegression {
    type Error = String;

    fn try_from(spec: LogisticRegressionSpec) -> Result<Self, Self::Error> {
        let classes: [i64; 2] = spec
            .classes
            .as_slice()
            .try_into()
            .map_err(|_| format!("expected 2 classes, got {}", spec.classes.len()))?;
        if classes[0] == classes[1] {
            return Err(format!("duplicate class label {}", classes[0]));
        }
        if spec.coef.is_empty() {
            return Err("coef is empty".into());
        }
        if let Some(i) = spec.coef.iter().position(|w| !w.is_finite()) {
            return Err(format!("coef[{i}] is not finite"));
        }
        if !spec.intercept.is_finite() {
            return Err("intercept is not finite".into());
        }
        Ok(Self {
            classes,
            coef: spec.coef,
            intercept: spec.intercept,
        })
    }
}

impl From<LogisticRegression> for LogisticRegressionSpec {
    fn from(m: LogisticRegression) -> Self {
        Self {
            classes: m.classes.to_vec(),
            coef: m.coef,
            intercept: m.intercept,
        }
    }
}

impl LogisticRegression {
    #[inline]
    pub fn n_features(&self) -> usize {
        self.coef.len()
    }

    #[inline]
    pub fn classes(&self) -> [i64; 2] {
        self.classes
    }

    #[inline]
    fn decision_function(&self, row: &[f64]) -> Result<f64, ScoreError> {
        if row.len() != self.coef.len() {
            return Err(ScoreError::FeatureMismatch {
                expected: self.coef.len(),
                actual: row.len(),
            });
        }
        Ok(self.intercept + row.iter().zip(&self.coef).map(|(x, w)| x * w).sum::<f64>())
    }

    /// 每行 [P(classes[0]), P(classes[1])]
    pub fn predict_proba(&self, x: &[Vec<f64>]) -> Result<Vec<[f64; 2]>, ScoreError> {
        x.iter()
            .map(|row| {
                let p1 = sigmoid(self.decision_function(row)?);
                if !p1.is_finite() {
                    return Err(ScoreError::NonFiniteProbability);
                }
                Ok([1.0 - p1, p1])
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn model() -> LogisticRegression {
        serde_json::from_value(serde_json::json!({
            "classes": [0, 1],
            "coef": [0.5, -1.0],
            "intercept": 0.25
        }))
        .unwrap()
    }

    #[test]
    fn proba_rows_sum_to_one() {
        let m = model();
        let out = m.predict_proba(&[vec![1.0, 2.0], vec![0.0, 0.0]]).unwrap();
        assert_eq!(out.len(), 2);

        // z = 0.25 + 0.5 - 2.0 = -1.25
        let want = 1.0 / (1.0 + 1.25f64.exp());
        assert_abs_diff_eq!(out[0][1], want, epsilon = 1e-12);
        assert_abs_diff_eq!(out[0][0] + out[0][1], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out[1][1], 1.0 / (1.0 + (-0.25f64).exp()), epsilon = 1e-12);
    }

    #[test]
    fn width_mismatch() {
        let err = model().predict_proba(&[vec![1.0]]).unwrap_err();
        assert!(matches!(err, ScoreError::FeatureMismatch { expected: 2, actual: 1 }));
    }

    #[test]
    fn nan_input_is_not_silently_scored() {
        let err = model().predict_proba(&[vec![f64::NAN, 0.0]]).unwrap_err();
        assert!(matches!(err, ScoreError::NonFiniteProbability));
    }

    #[test]
    fn rejects_bad_specs() {
        let bad = [
            serde_json::json!({"classes": [0, 1, 2], "coef": [1.0], "intercept": 0.0}),
            serde_json::json!({"classes": [1, 1], "coef": [1.0], "intercept": 0.0}),
            serde_json::json!({"classes": [0, 1], "coef": [], "intercept": 0.0}),
            serde_json::json!({"classes": [0, 1], "coef": [1.0]}),
        ];
        for b in bad {
            assert!(serde_json::from_value::<LogisticRegression>(b.clone()).is_err(), "{b}");
        }
    }
}

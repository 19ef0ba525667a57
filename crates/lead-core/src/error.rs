use thiserror::Error;

/// 请求期错误。加载期错误走 anyhow（见 artifact.rs），不会出现在这里。
#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("invalid field `{field}`: {reason}")]
    InvalidLead { field: &'static str, reason: String },

    #[error("unknown category for `{field}`: {value:?}")]
    UnknownCategory { field: &'static str, value: String },

    #[error("feature width mismatch: expected {expected}, got {actual}")]
    FeatureMismatch { expected: usize, actual: usize },

    #[error("classifier produced a non-finite probability")]
    NonFiniteProbability,
}

impl ScoreError {
    /// true -> 4xx；false -> 5xx
    pub fn is_client_error(&self) -> bool {
        matches!(self, ScoreError::InvalidLead { .. })
    }

    /// metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            ScoreError::InvalidLead { .. } => "invalid_lead",
            ScoreError::UnknownCategory { .. } => "unknown_category",
            ScoreError::FeatureMismatch { .. } => "feature_mismatch",
            ScoreError::NonFiniteProbability => "non_finite",
        }
    }
}

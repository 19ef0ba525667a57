// crates/lead-core/src/schema.rs
use serde::{Deserialize, Serialize};

use crate::error::ScoreError;

pub const FIELD_LEAD_SOURCE: &str = "lead_source";
pub const FIELD_COURSES_VIEWED: &str = "number_of_courses_viewed";
pub const FIELD_ANNUAL_INCOME: &str = "annual_income";

/// 一条待打分的 lead。每个请求创建一次，响应之后丢弃。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    /// 开放词表，不做枚举校验（未知值交给 vectorizer 的策略处理）
    pub lead_source: String,

    /// 无符号：负数在反序列化阶段就被拒绝
    pub number_of_courses_viewed: u32,

    pub annual_income: f64,
}

impl LeadRecord {
    /// 进模型之前的边界校验。失败一律属于客户端错误。
    pub fn validate(&self) -> Result<(), ScoreError> {
        if !self.annual_income.is_finite() {
            return Err(ScoreError::InvalidLead {
                field: FIELD_ANNUAL_INCOME,
                reason: "must be a finite number".into(),
            });
        }
        if self.annual_income < 0.0 {
            return Err(ScoreError::InvalidLead {
                field: FIELD_ANNUAL_INCOME,
                reason: format!("must be >= 0, got {}", self.annual_income),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub probability: f64,
    pub converted: bool,
}

impl Prediction {
    #[inline]
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        Self {
            probability,
            converted: probability >= threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_courses_rejected_by_serde() {
        let r = serde_json::from_str::<LeadRecord>(
            r#"{"lead_source":"events","number_of_courses_viewed":-1,"annual_income":1.0}"#,
        );
        assert!(r.is_err());
    }

    #[test]
    fn courses_must_be_a_u32_integer() {
        // 严格整数：2.0 也不收；超过 u32::MAX 同样拒绝
        for raw in ["2.0", "2.5", "4294967296", "\"2\""] {
            let body = format!(
                r#"{{"lead_source":"events","number_of_courses_viewed":{raw},"annual_income":1.0}}"#
            );
            assert!(serde_json::from_str::<LeadRecord>(&body).is_err(), "accepted {raw}");
        }

        let ok: LeadRecord = serde_json::from_str(
            r#"{"lead_source":"events","number_of_courses_viewed":4294967295,"annual_income":1.0}"#,
        )
        .unwrap();
        assert_eq!(ok.number_of_courses_viewed, u32::MAX);
    }

    #[test]
    fn missing_income_rejected_by_serde() {
        let r = serde_json::from_str::<LeadRecord>(
            r#"{"lead_source":"events","number_of_courses_viewed":1}"#,
        );
        let e = r.unwrap_err().to_string();
        assert!(e.contains("annual_income"), "{e}");
    }

    #[test]
    fn extra_keys_are_ignored() {
        let r: LeadRecord = serde_json::from_str(
            r#"{"lead_source":"events","number_of_courses_viewed":1,"annual_income":2.5,"x":true}"#,
        )
        .unwrap();
        assert_eq!(r.number_of_courses_viewed, 1);
        assert_eq!(r.annual_income, 2.5);
    }

    #[test]
    fn validate_income() {
        let mut lead = LeadRecord {
            lead_source: "events".into(),
            number_of_courses_viewed: 0,
            annual_income: 0.0,
        };
        assert!(lead.validate().is_ok());

        lead.annual_income = -10.0;
        assert!(matches!(
            lead.validate(),
            Err(ScoreError::InvalidLead { field: FIELD_ANNUAL_INCOME, .. })
        ));

        lead.annual_income = f64::NAN;
        assert!(lead.validate().is_err());
    }

    #[test]
    fn threshold_is_inclusive() {
        assert!(Prediction::from_probability(0.5, 0.5).converted);
        assert!(!Prediction::from_probability(0.4999, 0.5).converted);
    }
}

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::config::UnknownCategoryPolicy;
use crate::error::ScoreError;
use crate::schema::{LeadRecord, FIELD_ANNUAL_INCOME, FIELD_COURSES_VIEWED, FIELD_LEAD_SOURCE};

fn default_separator() -> String {
    "=".to_string()
}

/// artifact 里的原始形态
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictVectorizerSpec {
    pub feature_names: Vec<String>,
    #[serde(default = "default_separator")]
    pub separator: String,
}

/// 字典向量化：字符串字段 one-hot（`field=value` 列置 1），数值字段按字段名取列。
///
/// 反序列化时即校验列名必须与 LeadRecord 的字段完全对应，
/// 所以 transform 阶段只剩下“未知类别”这一种失败。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "DictVectorizerSpec", into = "DictVectorizerSpec")]
pub struct DictVectorizer {
    feature_names: Vec<String>,
    separator: String,
    lead_source_cols: HashMap<String, usize>,
    courses_col: usize,
    income_col: usize,
}

impl TryFrom<DictVectorizerSpec> for DictVectorizer {
    type Error = String;

    fn try_from(spec: DictVectorizerSpec) -> Result<Self, Self::Error> {
        if spec.separator.is_empty() {
            return Err("vectorizer separator is empty".into());
        }

        let mut seen = HashSet::with_capacity(spec.feature_names.len());
        let mut lead_source_cols = HashMap::new();
        let mut courses_col = None;
        let mut income_col = None;
        let prefix = format!("{FIELD_LEAD_SOURCE}{}", spec.separator);

        for (i, name) in spec.feature_names.iter().enumerate() {
            if !seen.insert(name.as_str()) {
                return Err(format!("duplicate feature name {name:?}"));
            }
            if name == FIELD_COURSES_VIEWED {
                courses_col = Some(i);
            } else if name == FIELD_ANNUAL_INCOME {
                income_col = Some(i);
            } else if let Some(value) = name.strip_prefix(&prefix) {
                lead_source_cols.insert(value.to_string(), i);
            } else {
                return Err(format!(
                    "feature {name:?} does not map to a lead field \
                     ({FIELD_LEAD_SOURCE}{sep}<value>, {FIELD_COURSES_VIEWED}, {FIELD_ANNUAL_INCOME})",
                    sep = spec.separator
                ));
            }
        }

        let courses_col =
            courses_col.ok_or_else(|| format!("missing numeric feature {FIELD_COURSES_VIEWED:?}"))?;
        let income_col =
            income_col.ok_or_else(|| format!("missing numeric feature {FIELD_ANNUAL_INCOME:?}"))?;
        if lead_source_cols.is_empty() {
            return Err(format!("no one-hot columns for {FIELD_LEAD_SOURCE:?}"));
        }

        Ok(Self {
            feature_names: spec.feature_names,
            separator: spec.separator,
            lead_source_cols,
            courses_col,
            income_col,
        })
    }
}

impl From<DictVectorizer> for DictVectorizerSpec {
    fn from(v: DictVectorizer) -> Self {
        Self {
            feature_names: v.feature_names,
            separator: v.separator,
        }
    }
}

impl DictVectorizer {
    #[inline]
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// 训练时见过的 lead_source 取值（按列序）
    pub fn known_lead_sources(&self) -> Vec<&str> {
        let mut v: Vec<(&str, usize)> = self
            .lead_source_cols
            .iter()
            .map(|(k, i)| (k.as_str(), *i))
            .collect();
        v.sort_by_key(|(_, i)| *i);
        v.into_iter().map(|(k, _)| k).collect()
    }

    /// 一组 record -> 稠密矩阵（每行 n_features 列）
    pub fn transform(
        &self,
        records: &[LeadRecord],
        policy: UnknownCategoryPolicy,
    ) -> Result<Vec<Vec<f64>>, ScoreError> {
        records.iter().map(|r| self.transform_one(r, policy)).collect()
    }

    pub fn transform_one(
        &self,
        record: &LeadRecord,
        policy: UnknownCategoryPolicy,
    ) -> Result<Vec<f64>, ScoreError> {
        let mut row = vec![0.0; self.n_features()];

        match self.lead_source_cols.get(&record.lead_source) {
            Some(&i) => row[i] = 1.0,
            None => match policy {
                UnknownCategoryPolicy::Ignore => {
                    metrics::counter!("vectorizer_unknown_category_total").increment(1);
                }
                UnknownCategoryPolicy::Reject => {
                    return Err(ScoreError::UnknownCategory {
                        field: FIELD_LEAD_SOURCE,
                        value: record.lead_source.clone(),
                    });
                }
            },
        }

        row[self.courses_col] = record.number_of_courses_viewed as f64;
        row[self.income_col] = record.annual_income;
        Ok(row)
    }
}

use anyhow::ensure;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// lead_source 出现训练时没见过的取值怎么办
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownCategoryPolicy {
    /// 所有 one-hot 列保持 0（与默认配置的 DictVectorizer 一致）
    #[default]
    Ignore,
    /// 直接报错，按内部错误返回
    Reject,
}

impl FromStr for UnknownCategoryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown policy {other:?}, expected ignore|reject")),
        }
    }
}

impl fmt::Display for UnknownCategoryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ignore => "ignore",
            Self::Reject => "reject",
        })
    }
}

/// 运行时配置：server 从命令行 / 环境变量填充
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// [transformer, classifier] 两段式 artifact（.json 或 .json.gz）
    pub artifact_path: PathBuf,

    /// probability >= threshold 即判定 converted
    pub decision_threshold: f64,

    pub unknown_category: UnknownCategoryPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            artifact_path: PathBuf::from("pipeline_v1.json"),
            decision_threshold: 0.5,
            unknown_category: UnknownCategoryPolicy::Ignore,
        }
    }
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            (0.0..=1.0).contains(&self.decision_threshold),
            "decision_threshold must be within [0, 1], got {}",
            self.decision_threshold
        );
        Ok(())
    }
}

use anyhow::{ensure, Context, Result};
use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::config::UnknownCategoryPolicy;
use crate::error::ScoreError;
use crate::model::LogisticRegression;
use crate::schema::LeadRecord;
use crate::util::clamp01;
use crate::vectorizer::DictVectorizer;

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

/// 训练侧产出的 (transformer, classifier) 二元组。
///
/// 文件格式：JSON 数组，固定两项、固定顺序 `[vectorizer, classifier]`；
/// 后缀 `.gz` 时先 gunzip。进程启动时读一次，之后只读共享。
#[derive(Debug, Clone)]
pub struct ScoringArtifact {
    pub source: Option<PathBuf>,
    vectorizer: DictVectorizer,
    classifier: LogisticRegression,
}

impl ScoringArtifact {
    pub fn new(vectorizer: DictVectorizer, classifier: LogisticRegression) -> Result<Self> {
        ensure!(
            vectorizer.n_features() == classifier.n_features(),
            "artifact schema mismatch: vectorizer has {} features, classifier expects {}",
            vectorizer.n_features(),
            classifier.n_features()
        );
        Ok(Self {
            source: None,
            vectorizer,
            classifier,
        })
    }

    pub fn from_reader<R: Read>(rdr: R) -> Result<Self> {
        let (vectorizer, classifier): (DictVectorizer, LogisticRegression) =
            serde_json::from_reader(rdr).context("decode [vectorizer, classifier]")?;
        Self::new(vectorizer, classifier)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let f = fs::File::open(path)
            .with_context(|| format!("open artifact: {}", path.display()))?;
        let rdr = BufReader::new(f);

        let mut artifact = if is_gzip(path) {
            Self::from_reader(flate2::read::GzDecoder::new(rdr))
        } else {
            Self::from_reader(rdr)
        }
        .with_context(|| format!("load artifact: {}", path.display()))?;

        artifact.source = Some(path.to_path_buf());
        tracing::info!(
            path = %path.display(),
            n_features = artifact.n_features(),
            classes = ?artifact.classifier.classes(),
            lead_sources = ?artifact.vectorizer.known_lead_sources(),
            "scoring artifact loaded"
        );
        Ok(artifact)
    }

    /// 写回 artifact 格式（测试 / 工具用）
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&(&self.vectorizer, &self.classifier)).context("encode artifact")
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.vectorizer.n_features()
    }

    pub fn vectorizer(&self) -> &DictVectorizer {
        &self.vectorizer
    }

    pub fn classifier(&self) -> &LogisticRegression {
        &self.classifier
    }

    /// stage 1：单条 record 包成长度 1 的序列 -> 1 行特征矩阵
    pub fn transform(
        &self,
        lead: &LeadRecord,
        policy: UnknownCategoryPolicy,
    ) -> Result<Vec<Vec<f64>>, ScoreError> {
        self.vectorizer.transform(std::slice::from_ref(lead), policy)
    }

    /// stage 2：predict_proba 取第 1 列（class-1 概率）
    pub fn predict(&self, x: &[Vec<f64>]) -> Result<f64, ScoreError> {
        let proba = self.classifier.predict_proba(x)?;
        let p1 = proba
            .first()
            .map(|row| row[1])
            .ok_or(ScoreError::FeatureMismatch {
                expected: self.n_features(),
                actual: 0,
            })?;
        Ok(clamp01(p1))
    }

    /// transform -> predict 的完整一次打分
    pub fn score(&self, lead: &LeadRecord, policy: UnknownCategoryPolicy) -> Result<f64, ScoreError> {
        let x = self.transform(lead, policy)?;
        self.predict(&x)
    }
}

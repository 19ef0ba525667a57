use crate::{
    artifact::ScoringArtifact,
    config::Config,
    error::ScoreError,
    schema::{LeadRecord, Prediction},
    util::now_us,
};

use anyhow::Context;
use std::sync::Arc;
use std::time::Instant;

/// 进程级共享状态：启动时构造一次，之后只读（无锁）
#[derive(Debug, Clone)]
pub struct AppCore {
    pub cfg: Config,
    pub artifact: Arc<ScoringArtifact>,
}

impl AppCore {
    /// 校验配置 + 从 cfg.artifact_path 加载；任何失败都应该让进程起不来
    pub fn load(cfg: Config) -> anyhow::Result<Self> {
        cfg.validate().context("invalid config")?;
        let artifact = ScoringArtifact::load(&cfg.artifact_path)?;
        Ok(Self {
            cfg,
            artifact: Arc::new(artifact),
        })
    }

    pub fn with_artifact(cfg: Config, artifact: ScoringArtifact) -> anyhow::Result<Self> {
        cfg.validate().context("invalid config")?;
        Ok(Self {
            cfg,
            artifact: Arc::new(artifact),
        })
    }

    /// validate -> transform -> predict -> threshold
    pub fn predict(&self, lead: &LeadRecord) -> Result<Prediction, ScoreError> {
        let t0 = Instant::now();
        let out = self.predict_inner(lead);

        match &out {
            Ok(p) => {
                metrics::counter!("predict_ok_total").increment(1);
                if p.converted {
                    metrics::counter!("predict_converted_total").increment(1);
                }
            }
            Err(e) => {
                metrics::counter!("predict_error_total", "kind" => e.kind()).increment(1);
                if !e.is_client_error() {
                    tracing::warn!(err = %e, lead_source = %lead.lead_source, "inference failed");
                }
            }
        }
        metrics::histogram!("e2e_us").record(now_us(t0) as f64);
        out
    }

    fn predict_inner(&self, lead: &LeadRecord) -> Result<Prediction, ScoreError> {
        // 校验失败时不碰模型
        lead.validate()?;

        let t_tf = Instant::now();
        let x = self.artifact.transform(lead, self.cfg.unknown_category)?;
        metrics::histogram!("stage_transform_us").record(now_us(t_tf) as f64);

        let t_pred = Instant::now();
        let p = self.artifact.predict(&x)?;
        metrics::histogram!("stage_predict_us").record(now_us(t_pred) as f64);

        Ok(Prediction::from_probability(p, self.cfg.decision_threshold))
    }
}

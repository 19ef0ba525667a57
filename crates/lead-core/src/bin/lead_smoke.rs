use std::path::PathBuf;

use lead_core::{config::UnknownCategoryPolicy, schema::LeadRecord};

fn main() -> anyhow::Result<()> {
    // 1) artifact 路径：LEAD_ARTIFACT 或默认值
    let path = std::env::var("LEAD_ARTIFACT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("pipeline_v1.json"));

    // 2) 载入（失败直接退出）
    let artifact = lead_core::artifact::ScoringArtifact::load(&path)?;
    println!("n_features={}", artifact.n_features());
    println!("classes={:?}", artifact.classifier().classes());
    for name in artifact.vectorizer().feature_names() {
        println!("  {name}");
    }

    // 3) 固定样例；也可以把一条 JSON 作为第一个参数传进来
    let lead: LeadRecord = match std::env::args().nth(1) {
        Some(s) => serde_json::from_str(&s)?,
        None => LeadRecord {
            lead_source: "paid_ads".into(),
            number_of_courses_viewed: 2,
            annual_income: 79276.0,
        },
    };
    lead.validate()?;

    let p = artifact.score(&lead, UnknownCategoryPolicy::Ignore)?;
    println!("Predicted probability: {p:.3}");

    Ok(())
}

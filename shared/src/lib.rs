use serde::{Deserialize, Serialize};
use strum_macros::Display;

#[derive(Serialize, Deserialize, Clone)]
pub struct AnalyzeRequest {
    pub image: String,
}

/// Classification labels of the binary skin screening model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Condition {
    Healthy,
    Jaundice,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub condition: Condition,
    pub confidence_percent: String,
    pub description: String,
    pub medical_risk: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptoms_detected: Option<Vec<String>>,
    pub recommended_action: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub model: String,
    pub tta_augmentations: u32,
    pub raw_score: f32,
    pub analysis_time_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub status: String,
    pub text: String,
    pub report: Report,
    pub metadata: AnalysisMetadata,
}

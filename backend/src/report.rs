use std::time::Duration;

use shared::{AnalysisMetadata, AnalyzeResponse, Condition, Report};

use crate::inference::tta::TTA_SAMPLES;

/// Descriptor reported back to clients; matches the persisted artifact.
pub const MODEL_DESCRIPTOR: &str = "MobileNetV2 + TTA";

/// Scores strictly above the threshold map to Jaundice. A score of exactly
/// 0.5 resolves to Healthy.
const DECISION_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationResult {
    pub condition: Condition,
    /// Distance from the decision boundary, in [0.5, 1.0].
    pub confidence: f32,
    /// Mean TTA probability, in [0, 1].
    pub raw_score: f32,
}

/// Maps an aggregated probability to a label and a confidence.
pub fn classify(raw_score: f32) -> ClassificationResult {
    if raw_score > DECISION_THRESHOLD {
        ClassificationResult {
            condition: Condition::Jaundice,
            confidence: raw_score,
            raw_score,
        }
    } else {
        ClassificationResult {
            condition: Condition::Healthy,
            confidence: 1.0 - raw_score,
            raw_score,
        }
    }
}

/// Fills the fixed per-label report template. Pure and deterministic: the
/// same classification always yields the same report content.
pub fn build_response(result: &ClassificationResult, elapsed: Duration) -> AnalyzeResponse {
    let percent = format_percent(result.confidence);
    let (text, report) = match result.condition {
        Condition::Jaundice => (
            format!("Possible jaundice detected with {percent}% confidence."),
            Report {
                condition: Condition::Jaundice,
                confidence_percent: format!("{percent}%"),
                description: "Yellow discoloration detected, likely due to bilirubin buildup."
                    .into(),
                medical_risk: "Moderate to High".into(),
                symptoms_detected: Some(vec!["yellow skin tone".into()]),
                recommended_action: "Consult a pediatrician within 24 hours for bilirubin testing."
                    .into(),
            },
        ),
        Condition::Healthy => (
            format!("No jaundice detected. Confidence {percent}%."),
            Report {
                condition: Condition::Healthy,
                confidence_percent: format!("{percent}%"),
                description: "No visible signs of jaundice detected.".into(),
                medical_risk: "Low".into(),
                symptoms_detected: None,
                recommended_action: "Continue routine newborn checkups.".into(),
            },
        ),
    };

    AnalyzeResponse {
        status: "success".into(),
        text,
        report,
        metadata: AnalysisMetadata {
            model: MODEL_DESCRIPTOR.into(),
            tta_augmentations: TTA_SAMPLES as u32,
            raw_score: result.raw_score,
            analysis_time_ms: round2(elapsed.as_secs_f64() * 1000.0),
        },
    }
}

/// Renders a confidence as a percentage rounded to two decimal places, with
/// a trailing zero dropped (0.8 -> "80.0", 0.8235 -> "82.35").
fn format_percent(confidence: f32) -> String {
    let percent = round2(confidence as f64 * 100.0);
    let rendered = format!("{percent:.2}");
    match rendered.strip_suffix('0') {
        Some(trimmed) => trimmed.to_string(),
        None => rendered,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_score_resolves_to_healthy() {
        let result = classify(0.5);
        assert_eq!(result.condition, Condition::Healthy);
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn score_just_above_boundary_is_jaundice() {
        let result = classify(0.5000001);
        assert_eq!(result.condition, Condition::Jaundice);
    }

    #[test]
    fn confidence_is_distance_from_boundary() {
        assert!((classify(0.2).confidence - 0.8).abs() < 1e-6);
        assert!((classify(0.95).confidence - 0.95).abs() < 1e-6);
        for score in [0.0, 0.3, 0.5, 0.7, 1.0] {
            let confidence = classify(score).confidence;
            assert!((0.5..=1.0).contains(&confidence));
        }
    }

    #[test]
    fn percent_rendering_matches_served_format() {
        assert_eq!(format_percent(0.8), "80.0");
        assert_eq!(format_percent(0.95), "95.0");
        assert_eq!(format_percent(0.8235), "82.35");
        assert_eq!(format_percent(0.5), "50.0");
        assert_eq!(format_percent(1.0), "100.0");
    }

    #[test]
    fn healthy_report_has_no_symptom_list() {
        let response = build_response(&classify(0.2), Duration::from_millis(12));

        assert_eq!(response.status, "success");
        assert_eq!(response.text, "No jaundice detected. Confidence 80.0%.");
        assert_eq!(response.report.condition, Condition::Healthy);
        assert_eq!(response.report.confidence_percent, "80.0%");
        assert_eq!(response.report.medical_risk, "Low");
        assert!(response.report.symptoms_detected.is_none());
        assert_eq!(response.metadata.model, MODEL_DESCRIPTOR);
        assert_eq!(response.metadata.tta_augmentations, 10);
    }

    #[test]
    fn jaundice_report_lists_detected_symptoms() {
        let response = build_response(&classify(0.95), Duration::from_millis(12));

        assert_eq!(
            response.text,
            "Possible jaundice detected with 95.0% confidence."
        );
        assert_eq!(response.report.condition, Condition::Jaundice);
        assert_eq!(response.report.confidence_percent, "95.0%");
        assert_eq!(response.report.medical_risk, "Moderate to High");
        assert_eq!(
            response.report.symptoms_detected.as_deref(),
            Some(["yellow skin tone".to_string()].as_slice())
        );
    }

    #[test]
    fn report_generation_is_idempotent() {
        let result = classify(0.73);
        let elapsed = Duration::from_millis(40);
        let first = serde_json::to_string(&build_response(&result, elapsed)).unwrap();
        let second = serde_json::to_string(&build_response(&result, elapsed)).unwrap();
        assert_eq!(first, second);
    }
}

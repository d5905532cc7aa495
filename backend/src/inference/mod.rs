pub mod augment;
pub mod model;
pub mod preprocess;
pub mod tta;

use std::sync::Arc;
use std::time::Instant;

use shared::AnalyzeResponse;

use crate::report;

pub use augment::AugmentationParameters;
pub use model::{ScoringError, ScoringModel, TorchModel};
pub use preprocess::DecodeError;

/// Model input width and height in pixels.
pub const IMG_SIZE: usize = 224;
/// Color channels after preprocessing.
pub const CHANNELS: usize = 3;

/// Normalized image data in HWC layout, values in [0, 1].
pub type ImageTensor = ndarray::Array3<f32>;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("image decoding failed: {0}")]
    Decode(#[from] DecodeError),
    #[error("model scoring failed: {0}")]
    Scoring(#[from] ScoringError),
}

/// Entry point into the inference pipeline. Holds the process-wide scoring
/// model and augmentation constants; constructed once at startup and shared
/// read-only across requests.
pub struct Analyzer {
    model: Arc<dyn ScoringModel>,
    augmentation: AugmentationParameters,
}

impl Analyzer {
    pub fn new(model: Arc<dyn ScoringModel>) -> Self {
        Self {
            model,
            augmentation: AugmentationParameters::default(),
        }
    }

    /// Runs the full pipeline on encoded image bytes: preprocess, TTA
    /// ensemble scoring, report generation.
    pub fn analyze(&self, image_bytes: &[u8]) -> Result<AnalyzeResponse, AnalysisError> {
        let start = Instant::now();

        let tensor = preprocess::decode_image(image_bytes)?;
        let score = tta::aggregate(self.model.as_ref(), &tensor, &self.augmentation)?;
        let result = report::classify(score);

        log::info!(
            "Analysis complete: {} (raw score {:.4})",
            result.condition,
            result.raw_score
        );
        Ok(report::build_response(&result, start.elapsed()))
    }
}

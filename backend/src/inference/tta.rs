use super::ImageTensor;
use super::augment::{self, AugmentationParameters};
use super::model::{ScoringError, ScoringModel};

/// Total predictions per request: the original tensor plus nine augmented
/// draws. Fixed protocol; changing it changes every reported confidence.
pub const TTA_SAMPLES: usize = 10;

/// Runs the test-time-augmentation ensemble and reduces it to a single
/// probability.
///
/// The original tensor is scored first, then `TTA_SAMPLES - 1` freshly
/// augmented variants. The result is the arithmetic mean with equal weights;
/// ordering does not affect it. Any scoring failure aborts the whole
/// ensemble, no partial mean is returned.
pub fn aggregate(
    model: &dyn ScoringModel,
    tensor: &ImageTensor,
    params: &AugmentationParameters,
) -> Result<f32, ScoringError> {
    let mut predictions = Vec::with_capacity(TTA_SAMPLES);
    predictions.push(model.score(tensor)?);
    for _ in 1..TTA_SAMPLES {
        let augmented = augment::random_transform(tensor, params);
        predictions.push(model.score(&augmented)?);
    }

    log::debug!("tta predictions: {:?}", predictions);
    Ok(predictions.iter().sum::<f32>() / predictions.len() as f32)
}

use std::sync::{Arc, Mutex};

use tch::{CModule, Device, Tensor};

use super::{CHANNELS, IMG_SIZE, ImageTensor};

#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("torch runtime error: {0}")]
    Torch(#[from] tch::TchError),
    #[error("model produced probability outside [0, 1]: {0}")]
    OutOfRange(f32),
}

/// Black-box scoring boundary: one normalized tensor in, one probability out.
///
/// Production loads a persisted TorchScript artifact; tests substitute stub
/// implementations.
pub trait ScoringModel: Send + Sync {
    fn score(&self, tensor: &ImageTensor) -> Result<f32, ScoringError>;
}

/// TorchScript-backed scoring model, loaded once at process startup and never
/// reloaded.
pub struct TorchModel {
    module: Arc<Mutex<CModule>>,
    device: Device,
}

impl TorchModel {
    pub fn load(model_path: &str) -> Result<Self, ScoringError> {
        let device = Device::cuda_if_available();
        let module = CModule::load_on_device(model_path, device)?;
        Ok(Self {
            module: Arc::new(Mutex::new(module)),
            device,
        })
    }
}

impl ScoringModel for TorchModel {
    fn score(&self, tensor: &ImageTensor) -> Result<f32, ScoringError> {
        // HWC -> NCHW, matching the exported artifact's input layout.
        let mut chw = Vec::with_capacity(CHANNELS * IMG_SIZE * IMG_SIZE);
        for c in 0..CHANNELS {
            for y in 0..IMG_SIZE {
                for x in 0..IMG_SIZE {
                    chw.push(tensor[[y, x, c]]);
                }
            }
        }
        let input = Tensor::from_slice(&chw)
            .f_view([1, CHANNELS as i64, IMG_SIZE as i64, IMG_SIZE as i64])?
            .to_device(self.device);

        let output = self.module.lock().unwrap().forward_ts(&[input])?;
        let probability = output.f_view(-1)?.f_double_value(&[0])? as f32;
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(ScoringError::OutOfRange(probability));
        }
        Ok(probability)
    }
}

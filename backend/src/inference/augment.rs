use rand::Rng;

use super::{CHANNELS, ImageTensor};

/// Perturbation ranges for test-time augmentation. Process-wide constants,
/// shared read-only by all requests; not adjustable per request.
#[derive(Debug, Clone, Copy)]
pub struct AugmentationParameters {
    /// Maximum absolute rotation in degrees.
    pub rotation_degrees: f32,
    /// Maximum horizontal shift as a fraction of the width.
    pub width_shift: f32,
    /// Maximum vertical shift as a fraction of the height.
    pub height_shift: f32,
    /// Maximum zoom deviation from 1.0, sampled per axis.
    pub zoom: f32,
    /// Probability of mirroring horizontally.
    pub horizontal_flip_prob: f32,
}

impl Default for AugmentationParameters {
    fn default() -> Self {
        Self {
            rotation_degrees: 15.0,
            width_shift: 0.1,
            height_shift: 0.1,
            zoom: 0.1,
            horizontal_flip_prob: 0.5,
        }
    }
}

/// Draws one randomly perturbed variant of `tensor`.
///
/// Rotation, shift, zoom and a coin-flip mirror are sampled independently on
/// every call and composed into a single inverse affine warp around the image
/// center. Shape and value range are preserved.
pub fn random_transform(tensor: &ImageTensor, params: &AugmentationParameters) -> ImageTensor {
    let mut rng = rand::rng();
    let (height, width, _) = tensor.dim();

    let theta = rng
        .random_range(-params.rotation_degrees..=params.rotation_degrees)
        .to_radians();
    let tx = rng.random_range(-params.width_shift..=params.width_shift) * width as f32;
    let ty = rng.random_range(-params.height_shift..=params.height_shift) * height as f32;
    let zx = rng.random_range(1.0 - params.zoom..=1.0 + params.zoom);
    let zy = rng.random_range(1.0 - params.zoom..=1.0 + params.zoom);
    let flip = rng.random::<f32>() < params.horizontal_flip_prob;

    warp(tensor, theta, tx, ty, zx, zy, flip)
}

/// Applies the inverse affine transform: for every output pixel the source
/// coordinate is computed and sampled bilinearly.
fn warp(
    tensor: &ImageTensor,
    theta: f32,
    tx: f32,
    ty: f32,
    zx: f32,
    zy: f32,
    flip: bool,
) -> ImageTensor {
    let (height, width, _) = tensor.dim();
    let cx = (width as f32 - 1.0) / 2.0;
    let cy = (height as f32 - 1.0) / 2.0;
    let (sin_t, cos_t) = theta.sin_cos();

    let mut out = ImageTensor::zeros(tensor.dim());
    for y in 0..height {
        for x in 0..width {
            let dx = x as f32 - cx - tx;
            let dy = y as f32 - cy - ty;
            let mut sx = (cos_t * dx + sin_t * dy) / zx + cx;
            let sy = (-sin_t * dx + cos_t * dy) / zy + cy;
            if flip {
                sx = width as f32 - 1.0 - sx;
            }
            for c in 0..CHANNELS {
                out[[y, x, c]] = sample_bilinear(tensor, sx, sy, c);
            }
        }
    }
    out
}

/// Bilinear lookup with nearest-edge fill: coordinates outside the grid are
/// clamped to the border pixel.
fn sample_bilinear(tensor: &ImageTensor, x: f32, y: f32, channel: usize) -> f32 {
    let (height, width, _) = tensor.dim();
    let x = x.clamp(0.0, width as f32 - 1.0);
    let y = y.clamp(0.0, height as f32 - 1.0);

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(width - 1);
    let y1 = (y0 + 1).min(height - 1);
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let v00 = tensor[[y0, x0, channel]];
    let v10 = tensor[[y0, x1, channel]];
    let v01 = tensor[[y1, x0, channel]];
    let v11 = tensor[[y1, x1, channel]];

    v00 * (1.0 - fx) * (1.0 - fy)
        + v10 * fx * (1.0 - fy)
        + v01 * (1.0 - fx) * fy
        + v11 * fx * fy
}

use image::imageops::FilterType;
use ndarray::Array3;

use super::{CHANNELS, IMG_SIZE, ImageTensor};

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("unrecognized or corrupt image data: {0}")]
    InvalidImage(#[from] image::ImageError),
}

/// Decodes arbitrary encoded image bytes into the model input tensor.
///
/// Any decodable format is accepted. The pixel grid is converted to RGB
/// (alpha dropped, grayscale expanded), hard-resized to 224x224 without
/// preserving aspect ratio, and scaled from u8 intensities to [0, 1].
pub fn decode_image(bytes: &[u8]) -> Result<ImageTensor, DecodeError> {
    let decoded = image::load_from_memory(bytes)?;
    let resized = decoded.resize_exact(IMG_SIZE as u32, IMG_SIZE as u32, FilterType::Triangle);
    let rgb = resized.to_rgb8();

    let mut tensor = Array3::zeros((IMG_SIZE, IMG_SIZE, CHANNELS));
    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..CHANNELS {
            tensor[[y as usize, x as usize, c]] = pixel[c] as f32 / 255.0;
        }
    }
    Ok(tensor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    fn encode_png(img: DynamicImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn gradient(width: u32, height: u32) -> DynamicImage {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn output_shape_is_fixed_for_any_source_size() {
        for (w, h) in [(300, 300), (640, 480), (31, 517), (224, 224)] {
            let tensor = decode_image(&encode_png(gradient(w, h))).unwrap();
            assert_eq!(tensor.dim(), (IMG_SIZE, IMG_SIZE, CHANNELS));
        }
    }

    #[test]
    fn values_are_normalized_to_unit_range() {
        let white = RgbImage::from_pixel(50, 80, Rgb([255, 255, 255]));
        let tensor = decode_image(&encode_png(DynamicImage::ImageRgb8(white))).unwrap();
        assert!(tensor.iter().all(|v| *v > 0.99 && *v <= 1.0));

        let tensor = decode_image(&encode_png(gradient(120, 77))).unwrap();
        assert!(tensor.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn grayscale_is_expanded_to_three_channels() {
        let gray = image::GrayImage::from_pixel(64, 64, image::Luma([100]));
        let tensor = decode_image(&encode_png(DynamicImage::ImageLuma8(gray))).unwrap();

        assert_eq!(tensor.dim(), (IMG_SIZE, IMG_SIZE, CHANNELS));
        let expected = 100.0 / 255.0;
        for pixel in tensor.rows() {
            assert_eq!(pixel[0], pixel[1]);
            assert_eq!(pixel[1], pixel[2]);
            assert!((pixel[0] - expected).abs() < 0.005);
        }
    }

    #[test]
    fn alpha_channel_is_discarded() {
        let rgba = RgbaImage::from_pixel(40, 40, Rgba([10, 20, 30, 0]));
        let tensor = decode_image(&encode_png(DynamicImage::ImageRgba8(rgba))).unwrap();

        assert_eq!(tensor.dim(), (IMG_SIZE, IMG_SIZE, CHANNELS));
        assert!((tensor[[0, 0, 0]] - 10.0 / 255.0).abs() < 0.005);
        assert!((tensor[[0, 0, 2]] - 30.0 / 255.0).abs() < 0.005);
    }

    #[test]
    fn non_image_bytes_are_rejected() {
        let result = decode_image(b"definitely not a valid image payload");
        assert!(matches!(result, Err(DecodeError::InvalidImage(_))));
    }
}

//! # U²-Net Background Removal
//!
//! Implementazione di `BackgroundRemover` basata sul modello di segmentazione
//! U²-Net eseguito con ONNX Runtime (`ort`).
//!
//! ## Pipeline:
//! 1. **Preprocess**: resize a 320x320 (Lanczos3), scala per il valore massimo,
//!    normalizza con media/deviazione ImageNet, layout NCHW
//! 2. **Inference**: una singola sessione ONNX, riutilizzata per tutto il batch
//! 3. **Postprocess**: normalizzazione min-max della maschera, resize alla
//!    dimensione originale, maschera usata come canale alpha
//!
//! Disponibile solo con la feature `onnx`.

use crate::background::BackgroundRemover;
use crate::error::{ConvertError, Result};
use image::{imageops, imageops::FilterType, GrayImage, Luma, Rgba, RgbaImage};
use ndarray::prelude::*;
use ort::session::Session;
use ort::value::TensorRef;
use std::path::Path;
use tracing::{debug, info};

/// Side of the square model input
pub const MODEL_INPUT_SIZE: u32 = 320;

const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const STD: [f32; 3] = [0.229, 0.224, 0.225];

pub struct U2Net {
    session: Session,
    input_name: String,
}

impl U2Net {
    /// Load the model from an `.onnx` file
    pub fn new(model_path: &Path) -> Result<Self> {
        info!("Loading background removal model: {}", model_path.display());
        let session = Session::builder()?.commit_from_file(model_path)?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| {
                ConvertError::BackgroundRemoval("model declares no inputs".to_string())
            })?;

        Ok(Self {
            session,
            input_name,
        })
    }

    fn predict(&mut self, tensor: ArrayView4<f32>) -> Result<Array4<f32>> {
        let outputs = self.session.run(ort::inputs![
            self.input_name.as_str() => TensorRef::from_array_view(&tensor.as_standard_layout())?
        ])?;

        let mask = outputs[0]
            .try_extract_array::<f32>()?
            .into_dimensionality::<Ix4>()
            .map_err(|e| ConvertError::BackgroundRemoval(format!("unexpected mask shape: {e}")))?
            .to_owned();
        Ok(mask)
    }
}

impl BackgroundRemover for U2Net {
    fn remove_background(&mut self, image: &RgbaImage) -> Result<RgbaImage> {
        let tensor = preprocess(image);
        let prediction = self.predict(tensor.view())?;
        debug!("Mask prediction shape: {:?}", prediction.shape());

        let mask = prediction_to_mask(prediction.view(), image.width(), image.height())?;
        Ok(apply_mask(image, &mask))
    }
}

/// Build the normalised NCHW input tensor
fn preprocess(image: &RgbaImage) -> Array4<f32> {
    let side = MODEL_INPUT_SIZE;
    let resized = imageops::resize(image, side, side, FilterType::Lanczos3);

    let max_value = resized
        .pixels()
        .flat_map(|p| p.0.into_iter().take(3))
        .max()
        .map(|v| f32::from(v).max(1e-6))
        .unwrap_or(1.0);

    let mut tensor = Array4::<f32>::zeros((1, 3, side as usize, side as usize));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for c in 0..3 {
            let value = f32::from(pixel[c]) / max_value;
            tensor[[0, c, y as usize, x as usize]] = (value - MEAN[c]) / STD[c];
        }
    }
    tensor
}

/// Min-max normalise the first mask channel and scale it to the image size
fn prediction_to_mask(prediction: ArrayView4<f32>, width: u32, height: u32) -> Result<GrayImage> {
    let (_, _, rows, cols) = prediction.dim();
    if rows == 0 || cols == 0 {
        return Err(ConvertError::BackgroundRemoval("empty mask".to_string()));
    }

    let channel = prediction.slice(s![0, 0, .., ..]);
    let min = channel.fold(f32::INFINITY, |a, &b| a.min(b));
    let max = channel.fold(f32::NEG_INFINITY, |a, &b| a.max(b));
    let range = (max - min).max(f32::EPSILON);

    let mask = GrayImage::from_fn(cols as u32, rows as u32, |x, y| {
        let value = (channel[[y as usize, x as usize]] - min) / range;
        Luma([(value * 255.0).round().clamp(0.0, 255.0) as u8])
    });

    Ok(imageops::resize(&mask, width, height, FilterType::Lanczos3))
}

/// Keep the colour channels and take alpha from the mask
fn apply_mask(image: &RgbaImage, mask: &GrayImage) -> RgbaImage {
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let p = image.get_pixel(x, y);
        Rgba([p[0], p[1], p[2], mask.get_pixel(x, y)[0]])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preprocess_shape_and_normalisation() {
        let image = RgbaImage::from_pixel(40, 20, Rgba([255, 255, 255, 255]));
        let tensor = preprocess(&image);

        assert_eq!(tensor.shape(), &[1, 3, 320, 320]);
        let expected_red = (1.0 - MEAN[0]) / STD[0];
        assert!((tensor[[0, 0, 10, 10]] - expected_red).abs() < 1e-4);
    }

    #[test]
    fn test_mask_is_min_max_normalised_and_resized() {
        let mut prediction = Array4::<f32>::from_elem((1, 1, 4, 4), 0.2);
        prediction[[0, 0, 0, 0]] = 0.9;

        let mask = prediction_to_mask(prediction.view(), 8, 8).unwrap();
        assert_eq!(mask.dimensions(), (8, 8));
        assert_eq!(mask.get_pixel(7, 7)[0], 0);
    }

    #[test]
    fn test_apply_mask_keeps_colour() {
        let image = RgbaImage::from_pixel(2, 1, Rgba([10, 20, 30, 255]));
        let mask = GrayImage::from_raw(2, 1, vec![0, 200]).unwrap();

        let out = apply_mask(&image, &mask);
        assert_eq!(out.get_pixel(0, 0).0, [10, 20, 30, 0]);
        assert_eq!(out.get_pixel(1, 0).0, [10, 20, 30, 200]);
    }
}

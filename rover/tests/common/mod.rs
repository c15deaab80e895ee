#![allow(dead_code)]

use sensor::{Camera, CaptureError};
use vision::{Model, Tensor, VisionError};

pub fn jpeg_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(64, 48, image::Rgb([90, 120, 60]));
    let mut buf = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut buf).encode_image(&img).unwrap();
    buf
}

/// Returns the same JPEG every time.
pub struct StillCamera(pub Vec<u8>);

impl StillCamera {
    pub fn new() -> Self {
        Self(jpeg_bytes())
    }
}

impl Camera for StillCamera {
    fn capture(&mut self) -> Result<Vec<u8>, CaptureError> {
        Ok(self.0.clone())
    }
}

pub struct DeadCamera;

impl Camera for DeadCamera {
    fn capture(&mut self) -> Result<Vec<u8>, CaptureError> {
        Err(CaptureError::Driver("no sensor".into()))
    }
}

pub struct FixedModel(pub f32);

impl Model for FixedModel {
    fn predict(&self, _: &Tensor) -> Result<f32, VisionError> {
        Ok(self.0)
    }
}

pub fn jpg_count(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "jpg"))
        .count()
}

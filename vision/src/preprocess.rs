use image::imageops;
use image::{Rgb, RgbImage};
use ndarray::Array3;
use sensor::Frame;

use crate::VisionError;

pub const INPUT_WIDTH: u32 = 200;
pub const INPUT_HEIGHT: u32 = 66;
pub const INPUT_CHANNELS: usize = 3;

/// Model input laid out height × width × channel, values in `[0, 1]`.
pub type Tensor = Array3<f32>;

/// Separable taps of the 3×3 Gaussian `[1 2 1; 2 4 2; 1 2 1] / 16`.
const GAUSSIAN_TAPS: [u32; 3] = [1, 2, 1];

/// Prepare a captured frame for the classifier.
pub fn preprocess(frame: &Frame) -> Result<Tensor, VisionError> {
    preprocess_image(&frame.pixels)
}

/// Crop away the top half, convert RGB to YUV, smooth with a 3×3 Gaussian,
/// resize bilinearly to 200×66 and scale to `[0, 1]`.
pub fn preprocess_image(image: &RgbImage) -> Result<Tensor, VisionError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(VisionError::InvalidFrame(format!("{width}x{height} image")));
    }

    // Sky and horizon carry nothing about the lane.
    let top = height / 2;
    let road = imageops::crop_imm(image, 0, top, width, height - top).to_image();
    let yuv = rgb_to_yuv(&road);
    let smoothed = gaussian_3x3(&yuv);
    let resized = resize_bilinear(&smoothed, INPUT_WIDTH, INPUT_HEIGHT);

    let values = resized
        .into_raw()
        .into_iter()
        .map(|v| f32::from(v) / 255.0)
        .collect();
    Array3::from_shape_vec(
        (INPUT_HEIGHT as usize, INPUT_WIDTH as usize, INPUT_CHANNELS),
        values,
    )
    .map_err(|e| VisionError::InvalidFrame(e.to_string()))
}

fn rgb_to_yuv(image: &RgbImage) -> RgbImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        let [r, g, b] = pixel.0.map(f32::from);
        let y = 0.299 * r + 0.587 * g + 0.114 * b;
        let u = 0.492 * (b - y) + 128.0;
        let v = 0.877 * (r - y) + 128.0;
        *pixel = Rgb([channel(y), channel(u), channel(v)]);
    }
    out
}

/// 3×3 Gaussian smoothing with mirrored borders (`dcb|abcd|cba`).
fn gaussian_3x3(image: &RgbImage) -> RgbImage {
    let (width, height) = image.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let mut acc = [0u32; 3];
        for (dy, wy) in GAUSSIAN_TAPS.iter().enumerate() {
            let sy = mirror(y as i64 + dy as i64 - 1, height);
            for (dx, wx) in GAUSSIAN_TAPS.iter().enumerate() {
                let sx = mirror(x as i64 + dx as i64 - 1, width);
                let p = image.get_pixel(sx, sy);
                for c in 0..3 {
                    acc[c] += wy * wx * u32::from(p[c]);
                }
            }
        }
        Rgb(acc.map(|v| ((v + 8) / 16) as u8))
    })
}

/// Bilinear resize with centre-aligned sampling, as OpenCV's `INTER_LINEAR`
/// does it: two taps per axis at any scale. The `imageops` triangle filter
/// widens its support when shrinking and gives different pixels.
fn resize_bilinear(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    let (src_w, src_h) = image.dimensions();
    let xs: Vec<Tap> = (0..width).map(|x| Tap::new(x, src_w, width)).collect();
    let ys: Vec<Tap> = (0..height).map(|y| Tap::new(y, src_h, height)).collect();
    RgbImage::from_fn(width, height, |x, y| {
        let (tx, ty) = (&xs[x as usize], &ys[y as usize]);
        let row = |sy| {
            let a = image.get_pixel(tx.lo, sy).0.map(f32::from);
            let b = image.get_pixel(tx.hi, sy).0.map(f32::from);
            [0, 1, 2].map(|c| a[c] + (b[c] - a[c]) * tx.frac)
        };
        let (top, bottom) = (row(ty.lo), row(ty.hi));
        Rgb([0, 1, 2].map(|c| channel(top[c] + (bottom[c] - top[c]) * ty.frac)))
    })
}

/// Source neighbours and blend weight for one output coordinate.
struct Tap {
    lo: u32,
    hi: u32,
    frac: f32,
}

impl Tap {
    fn new(out: u32, src_len: u32, out_len: u32) -> Self {
        let pos = (out as f32 + 0.5) * src_len as f32 / out_len as f32 - 0.5;
        let last = src_len - 1;
        if pos <= 0.0 {
            return Self { lo: 0, hi: 0, frac: 0.0 };
        }
        let lo = pos.floor() as u32;
        if lo >= last {
            return Self { lo: last, hi: last, frac: 0.0 };
        }
        Self {
            lo,
            hi: lo + 1,
            frac: pos - lo as f32,
        }
    }
}

fn mirror(i: i64, len: u32) -> u32 {
    let len = i64::from(len);
    if len == 1 {
        0
    } else if i < 0 {
        (-i) as u32
    } else if i >= len {
        (2 * len - 2 - i) as u32
    } else {
        i as u32
    }
}

fn channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

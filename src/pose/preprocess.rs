use anyhow::{Result, anyhow};
use image::{RgbImage, imageops::FilterType};
use ndarray::Array4;

use crate::types::{Landmark, LandmarkSet, NUM_LANDMARKS};

pub const INPUT_SIZE: u32 = 256;

/// The model emits (x, y, z, visibility, presence) per landmark, with
/// coordinates in input-pixel space.
pub const VALUES_PER_LANDMARK: usize = 5;

#[derive(Clone, Debug)]
pub struct LetterboxInfo {
    pub scale: f32,
    pub pad_x: f32,
    pub pad_y: f32,
    pub orig_w: u32,
    pub orig_h: u32,
}

/// Letterboxes the image into the model's square input: aspect-preserving
/// resize, centered on a black canvas, pixels normalized to [0, 1], NHWC.
pub fn prepare_image(image: &RgbImage) -> Result<(Array4<f32>, LetterboxInfo)> {
    let (orig_w, orig_h) = image.dimensions();
    if orig_w == 0 || orig_h == 0 {
        return Err(anyhow!("cannot prepare an empty image"));
    }

    let scale = INPUT_SIZE as f32 / (orig_w.max(orig_h) as f32);
    let new_w = (orig_w as f32 * scale).round().max(1.0) as u32;
    let new_h = (orig_h as f32 * scale).round().max(1.0) as u32;
    let resized = image::imageops::resize(image, new_w, new_h, FilterType::CatmullRom);

    let pad_x = ((INPUT_SIZE as i64 - new_w as i64) / 2).max(0) as f32;
    let pad_y = ((INPUT_SIZE as i64 - new_h as i64) / 2).max(0) as f32;
    let mut canvas = RgbImage::from_pixel(INPUT_SIZE, INPUT_SIZE, image::Rgb([0u8, 0u8, 0u8]));
    for y in 0..new_h {
        for x in 0..new_w {
            let px = *resized.get_pixel(x, y);
            let lx = (x as f32 + pad_x).round() as u32;
            let ly = (y as f32 + pad_y).round() as u32;
            if lx < canvas.width() && ly < canvas.height() {
                canvas.put_pixel(lx, ly, px);
            }
        }
    }

    let mut input = Array4::<f32>::zeros((1, INPUT_SIZE as usize, INPUT_SIZE as usize, 3));
    for y in 0..INPUT_SIZE {
        for x in 0..INPUT_SIZE {
            let pixel = canvas.get_pixel(x, y).0;
            input[[0, y as usize, x as usize, 0]] = pixel[0] as f32 / 255.0;
            input[[0, y as usize, x as usize, 1]] = pixel[1] as f32 / 255.0;
            input[[0, y as usize, x as usize, 2]] = pixel[2] as f32 / 255.0;
        }
    }

    let letterbox = LetterboxInfo {
        scale,
        pad_x,
        pad_y,
        orig_w,
        orig_h,
    };

    Ok((input, letterbox))
}

/// Decodes the flattened landmark tensor: un-letterboxes each point back to
/// original-image pixels, normalizes by the image dimensions, and squashes
/// the visibility logit through a sigmoid.
pub fn decode_landmarks(flat: &[f32], letterbox: &LetterboxInfo) -> Result<LandmarkSet> {
    if flat.len() < NUM_LANDMARKS * VALUES_PER_LANDMARK {
        return Err(anyhow!(
            "unexpected landmark tensor length: got {}, need {}",
            flat.len(),
            NUM_LANDMARKS * VALUES_PER_LANDMARK
        ));
    }

    let mut normalized = Vec::with_capacity(NUM_LANDMARKS);
    let mut pixels = Vec::with_capacity(NUM_LANDMARKS);
    for chunk in flat.chunks_exact(VALUES_PER_LANDMARK).take(NUM_LANDMARKS) {
        let px = ((chunk[0] - letterbox.pad_x) / letterbox.scale)
            .clamp(0.0, (letterbox.orig_w.saturating_sub(1)) as f32);
        let py = ((chunk[1] - letterbox.pad_y) / letterbox.scale)
            .clamp(0.0, (letterbox.orig_h.saturating_sub(1)) as f32);

        normalized.push(Landmark {
            x: px / letterbox.orig_w as f32,
            y: py / letterbox.orig_h as f32,
            z: chunk[2] / INPUT_SIZE as f32,
            visibility: sigmoid(chunk[3]),
        });
        pixels.push((px, py));
    }

    Ok(LandmarkSet { normalized, pixels })
}

fn sigmoid(v: f32) -> f32 {
    1.0 / (1.0 + (-v).exp())
}

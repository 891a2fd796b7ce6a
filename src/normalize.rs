// Turns a stroke's canvas region into the classifier's input format.
//
// A tightly cropped stroke blown straight up to 28x28 fills the whole frame,
// which is not what the classifier was trained on: MNIST digits sit centered
// with a dark border. So after the first resize the image is zero-padded and
// shrunk back down, which recentres the digit away from the edges.

use std::path::Path;

use image::{
    GrayImage, Luma,
    imageops::{self, FilterType},
};

use crate::types::{BoundingBox, FrameBuffer};

/// Side length of the classifier input (MNIST format).
pub const CLASSIFIER_SIDE: u32 = 28;
/// Zero padding added on each side between the two resizes.
const RECENTER_PAD: u32 = 10;

/// A 28x28 single-channel image with values in [0,1], row-major.
#[derive(Clone, Debug)]
pub struct NormalizedImage {
    pixels: Vec<f32>,
}

impl NormalizedImage {
    /// Wrap a raw 28x28 pixel array. Panics in tests only; production code
    /// always goes through [`normalize_region`].
    #[cfg(test)]
    pub fn from_pixels(pixels: Vec<f32>) -> Self {
        assert_eq!(pixels.len(), (CLASSIFIER_SIDE * CLASSIFIER_SIDE) as usize);
        Self { pixels }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.pixels
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Save as an 8-bit PNG, for eyeballing what the classifier actually saw.
    pub fn save_png(&self, path: &Path) -> image::ImageResult<()> {
        let img = GrayImage::from_fn(CLASSIFIER_SIDE, CLASSIFIER_SIDE, |x, y| {
            let v = self.pixels[(y * CLASSIFIER_SIDE + x) as usize];
            Luma([(v * 255.0).round().clamp(0.0, 255.0) as u8])
        });
        img.save(path)
    }
}

/// Run the full normalization pipeline over the canvas region in `bounds`:
/// luminance crop, resize to 28, pad by 10, resize back to 28, scale to [0,1].
pub fn normalize_region(canvas: &FrameBuffer, bounds: &BoundingBox) -> NormalizedImage {
    let crop = sample_crop(canvas, bounds);
    let small = imageops::resize(&crop, CLASSIFIER_SIDE, CLASSIFIER_SIDE, FilterType::Triangle);

    let padded_side = CLASSIFIER_SIDE + 2 * RECENTER_PAD;
    let mut padded = GrayImage::new(padded_side, padded_side); // zero = black
    imageops::replace(&mut padded, &small, RECENTER_PAD as i64, RECENTER_PAD as i64);

    let framed = imageops::resize(&padded, CLASSIFIER_SIDE, CLASSIFIER_SIDE, FilterType::Triangle);

    let pixels = framed
        .pixels()
        .map(|Luma([v])| f32::from(*v) / 255.0)
        .collect();
    NormalizedImage { pixels }
}

/// Sample the canvas inside `bounds` as an 8-bit gray image. The box may hang
/// over the canvas edge; those pixels read as background.
fn sample_crop(canvas: &FrameBuffer, bounds: &BoundingBox) -> GrayImage {
    let w = bounds.width().max(1);
    let h = bounds.height().max(1);
    GrayImage::from_fn(w, h, |dx, dy| {
        Luma([canvas.luminance_at(bounds.min_x + dx as i32, bounds.min_y + dy as i32)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::fill_disc;
    use crate::types::Point;

    fn canvas_with_disc() -> FrameBuffer {
        let mut fb = FrameBuffer::new(640, 480, 0);
        fill_disc(&mut fb, 100, 100, 8, 0x00FFFFFF);
        fb
    }

    #[test]
    fn output_has_classifier_shape_and_range() {
        let fb = canvas_with_disc();
        let bounds = BoundingBox::around(&[Point { x: 100, y: 100 }]).unwrap();
        let img = normalize_region(&fb, &bounds);
        assert_eq!(img.len(), 28 * 28);
        assert!(img.as_slice().iter().all(|&v| (0.0..=1.0).contains(&v)));
        // The stroke must actually show up as foreground.
        assert!(img.as_slice().iter().any(|&v| v > 0.5));
    }

    #[test]
    fn background_region_normalizes_to_all_zeros() {
        let fb = FrameBuffer::new(640, 480, 0);
        let bounds = BoundingBox { min_x: 50, min_y: 50, max_x: 150, max_y: 150 };
        let img = normalize_region(&fb, &bounds);
        assert!(img.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn box_over_the_edge_samples_background() {
        let fb = canvas_with_disc();
        // Hangs past the top-left corner; must not panic, must stay in range.
        let bounds = BoundingBox { min_x: -20, min_y: -20, max_x: 30, max_y: 30 };
        let img = normalize_region(&fb, &bounds);
        assert!(img.as_slice().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn same_size_resize_is_near_identity() {
        // Pins down the resize step alone: 28x28 -> 28x28 with a triangle
        // filter must reproduce the input up to interpolation rounding.
        let src = GrayImage::from_fn(28, 28, |x, y| Luma([((x * 7 + y * 3) % 256) as u8]));
        let out = imageops::resize(&src, 28, 28, FilterType::Triangle);
        for (a, b) in src.pixels().zip(out.pixels()) {
            let diff = (i16::from(a.0[0]) - i16::from(b.0[0])).abs();
            assert!(diff <= 2, "resize drifted by {diff}");
        }
    }
}

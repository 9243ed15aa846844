use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::contrast::otsu_level;
use imageproc::filter::{filter3x3, gaussian_blur_f32, separable_filter_equal};
use imageproc::morphology::{grayscale_dilate, grayscale_erode, Mask};

/// Sigma a 5x5 Gaussian gets when none is given: `0.3 * ((k - 1) / 2 - 1) + 0.8`.
const BLUR_SIGMA: f32 = 1.1;
/// Half-width of the 5x5 square structuring element.
const MORPH_RADIUS: u8 = 2;

const SHARPEN_KERNEL: [f32; 9] = [-1.0, -1.0, -1.0, -1.0, 9.0, -1.0, -1.0, -1.0, -1.0];
const DERIVATIVE_KERNEL: [f32; 9] = [-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0];
const SUMMATION_TAPS: [f32; 5] = [0.2; 5];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Filter {
    Blur,
    Sharpen,
    TransparencyMask,
    Erode,
    Dilate,
    Summation,
    Derivative,
}

impl Filter {
    pub const ALL: [Filter; 7] = [
        Filter::Blur,
        Filter::Sharpen,
        Filter::TransparencyMask,
        Filter::Erode,
        Filter::Dilate,
        Filter::Summation,
        Filter::Derivative,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Filter::Blur => "Blur",
            Filter::Sharpen => "Unblur",
            Filter::TransparencyMask => "Transparency Meter",
            Filter::Erode => "Erode",
            Filter::Dilate => "Dilate",
            Filter::Summation => "Summation Filter",
            Filter::Derivative => "Derivative Filter",
        }
    }

    /// Convolution filters live in their own submenu.
    pub fn is_convolution(&self) -> bool {
        matches!(self, Filter::Summation | Filter::Derivative)
    }

    pub fn apply(&self, src: &RgbImage) -> RgbImage {
        match self {
            Filter::Blur => gaussian_blur_f32(src, BLUR_SIGMA),
            Filter::Sharpen => filter3x3::<_, f32, u8>(src, &SHARPEN_KERNEL),
            Filter::TransparencyMask => transparency_mask(src).0,
            Filter::Erode => {
                let mask = Mask::square(MORPH_RADIUS);
                per_channel(src, |c| grayscale_erode(c, &mask))
            }
            Filter::Dilate => {
                let mask = Mask::square(MORPH_RADIUS);
                per_channel(src, |c| grayscale_dilate(c, &mask))
            }
            Filter::Summation => separable_filter_equal(src, &SUMMATION_TAPS),
            Filter::Derivative => filter3x3::<_, f32, u8>(src, &DERIVATIVE_KERNEL),
        }
    }
}

/// Keeps the pixels darker than the Otsu level and blacks out the rest.
/// Returns the masked image and the share of kept pixels in `[0, 1]`.
pub fn transparency_mask(src: &RgbImage) -> (RgbImage, f32) {
    let gray = luma_bt601(src);
    let level = otsu_level(&gray);
    let mut kept = 0u64;
    let masked = RgbImage::from_fn(src.width(), src.height(), |x, y| {
        if gray.get_pixel(x, y)[0] > level {
            Rgb([0, 0, 0])
        } else {
            kept += 1;
            *src.get_pixel(x, y)
        }
    });
    let total = u64::from(src.width()) * u64::from(src.height());
    let share = if total == 0 {
        0.0
    } else {
        kept as f32 / total as f32
    };
    (masked, share)
}

/// Gray conversion with BT.601 weights, rounded to nearest.
pub fn luma_bt601(src: &RgbImage) -> GrayImage {
    GrayImage::from_fn(src.width(), src.height(), |x, y| {
        let [r, g, b] = src.get_pixel(x, y).0;
        let sum = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
        Luma([((sum + 500) / 1000) as u8])
    })
}

fn per_channel(src: &RgbImage, op: impl Fn(&GrayImage) -> GrayImage) -> RgbImage {
    let planes: Vec<GrayImage> = (0..3)
        .map(|c| {
            let plane = GrayImage::from_fn(src.width(), src.height(), |x, y| {
                Luma([src.get_pixel(x, y)[c]])
            });
            op(&plane)
        })
        .collect();
    RgbImage::from_fn(src.width(), src.height(), |x, y| {
        Rgb([
            planes[0].get_pixel(x, y)[0],
            planes[1].get_pixel(x, y)[0],
            planes[2].get_pixel(x, y)[0],
        ])
    })
}

/// Per-channel 256-bin counts, in R, G, B order.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    pub channels: [[u32; 256]; 3],
}

impl Histogram {
    pub fn of(src: &RgbImage) -> Self {
        let mut channels = [[0u32; 256]; 3];
        for pixel in src.pixels() {
            for (c, bins) in channels.iter_mut().enumerate() {
                bins[pixel[c] as usize] += 1;
            }
        }
        Self { channels }
    }

    pub fn max_count(&self) -> u32 {
        self.channels
            .iter()
            .flat_map(|bins| bins.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

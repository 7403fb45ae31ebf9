//! Intensity mapping between `ndarray` planes and `image` buffers.
//!
//! Shared by the montage and GIF pipelines: winsorized intensity limits,
//! gray conversion with the matrix-to-raster coordinate swap (array indexing
//! is `[column, row]` with the second axis running bottom-up, raster indexing
//! is `(x, y)` with y running top-down), and analytic colormaps.

use image::{GrayImage, ImageBuffer, Luma, Rgba, RgbaImage};
use ndarray::{ArrayBase, Data, Dimension, Ix2};
use ndarray_stats::QuantileExt;

/// Colormap applied to normalized gray frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Colormap {
    Gray,
    /// Black over red and yellow to white.
    Hot,
    /// Blue over cyan and yellow to red.
    Jet,
}

impl Colormap {
    /// Map a normalized gray value to RGB.
    pub fn rgb(&self, value: u8) -> [u8; 3] {
        let t = value as f64 / 255.0;
        match self {
            Colormap::Gray => [value, value, value],
            Colormap::Hot => [
                to_channel(3.0 * t),
                to_channel(3.0 * t - 1.0),
                to_channel(3.0 * t - 2.0),
            ],
            Colormap::Jet => [
                to_channel(1.5 - (4.0 * t - 3.0).abs()),
                to_channel(1.5 - (4.0 * t - 2.0).abs()),
                to_channel(1.5 - (4.0 * t - 1.0).abs()),
            ],
        }
    }
}

fn to_channel(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}


/// Winsorization limits: the `lo_pct` and `hi_pct` percentiles of the finite
/// samples, linearly interpolated. An input without finite samples yields
/// `(0, 0)`.
pub fn clip_limits<I>(values: I, lo_pct: f64, hi_pct: f64) -> (f64, f64)
where
    I: IntoIterator<Item = f64>,
{
    let mut samples: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    if samples.is_empty() {
        return (0.0, 0.0);
    }
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    (percentile(&samples, lo_pct), percentile(&samples, hi_pct))
}

fn percentile(sorted: &[f64], pct: f64) -> f64 {
    let pos = pct.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let below = pos.floor() as usize;
    let above = pos.ceil() as usize;
    let frac = pos - below as f64;
    sorted[below] * (1.0 - frac) + sorted[above] * frac
}


/// Full intensity range of an array, skipping NaN samples.
pub fn intensity_range<S, D>(data: &ArrayBase<S, D>) -> (f64, f64)
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    if data.is_empty() {
        return (0.0, 0.0);
    }
    (*data.min_skipnan(), *data.max_skipnan())
}


/// Scale a value into 0..=255 over the `[lo, hi]` window.
///
/// Values outside the window are clamped; NaN samples and degenerate windows
/// render as 0.
pub fn scale_to_u8(value: f64, lo: f64, hi: f64) -> u8 {
    if !value.is_finite() || hi <= lo {
        return 0;
    }
    let t = ((value - lo) / (hi - lo)).clamp(0.0, 1.0);
    (t * 255.0).round() as u8
}


/// Convert a 2D plane to a grayscale image in anatomical orientation.
///
/// The plane's first axis maps to the raster x axis and its second axis runs
/// bottom-up, so plane `[i, j]` lands at pixel `(i, height - 1 - j)`.
pub fn plane_to_gray<S>(plane: &ArrayBase<S, Ix2>, lo: f64, hi: f64) -> GrayImage
where
    S: Data<Elem = f64>,
{
    let (nx, ny) = plane.dim();
    ImageBuffer::from_fn(nx as u32, ny as u32, |px, py| {
        let value = plane[[px as usize, ny - 1 - py as usize]];
        Luma([scale_to_u8(value, lo, hi)])
    })
}


/// Expand a gray image to RGBA through a colormap.
pub fn apply_colormap(gray: &GrayImage, map: Colormap) -> RgbaImage {
    let (width, height) = gray.dimensions();
    ImageBuffer::from_fn(width, height, |x, y| {
        let [r, g, b] = map.rgb(gray.get_pixel(x, y).0[0]);
        Rgba([r, g, b, 255])
    })
}

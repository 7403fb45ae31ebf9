//! The volume-to-animation pipeline: turn NIfTI volumes into looping GIFs.
//!
//! Frames are cut out of a 4D volume (one frame per timepoint at a fixed
//! slice of the chosen anatomical view) or out of a 3D volume (one frame per
//! slice, animating through the brain). Each sequence is air-cropped,
//! winsorized, normalized, colored and decorated, several sequences can be
//! laid side by side, and the result is handed to the GIF encoder of the
//! `image` crate.

use image::codecs::gif::{GifEncoder, Repeat};
use image::imageops::{self, FilterType};
use image::{Delay, Frame, Rgba, RgbaImage};
use ndarray::{s, Array2, Array3, Array4, Axis};

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::{DfmriError, Result};
use crate::render::{apply_colormap, clip_limits, plane_to_gray, Colormap};

/// Anatomical view of a volume; selects the through-plane axis of the
/// (x, y, z) voxel grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    /// In-plane (x, y), sliced along z.
    Axial,
    /// In-plane (x, z), sliced along y.
    Coronal,
    /// In-plane (y, z), sliced along x.
    Sagittal,
}

impl View {
    /// Axis index perpendicular to the view plane.
    pub fn through_axis(&self) -> usize {
        match self {
            View::Axial => 2,
            View::Coronal => 1,
            View::Sagittal => 0,
        }
    }
}

/// Settings of the GIF pipeline.
#[derive(Debug, Clone)]
pub struct GifConfig {
    pub view: View,
    /// Slice index along the through-plane axis; the middle slice if None.
    pub slice: Option<usize>,
    /// Winsorization percentiles for the intensity window.
    pub clip: (f64, f64),
    /// Compute the intensity window per frame instead of per sequence.
    pub renormalize: bool,
    /// Integer upscaling factor.
    pub scale: u32,
    /// Linear instead of nearest-neighbor resampling when upscaling.
    pub smooth: bool,
    /// Progress bar along the bottom edge.
    pub timebar: bool,
    /// Crosshair at the given (x, y) pixel of the unscaled, unrotated frame.
    pub crosshair: Option<(u32, u32)>,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    /// Number of clockwise quarter turns.
    pub quarter_turns: u8,
    /// Append the reversed sequence for a seamless back-and-forth loop.
    pub rewind: bool,
    pub colormap: Colormap,
    /// Crop away surrounding air before rendering.
    pub crop: bool,
    /// Fraction of the intensity window above which a voxel counts as tissue.
    pub crop_threshold: f64,
    pub frame_delay_ms: u32,
}

impl Default for GifConfig {
    fn default() -> GifConfig {
        GifConfig {
            view: View::Axial,
            slice: None,
            clip: (1.0, 99.0),
            renormalize: false,
            scale: 1,
            smooth: false,
            timebar: true,
            crosshair: None,
            flip_horizontal: false,
            flip_vertical: false,
            quarter_turns: 0,
            rewind: false,
            colormap: Colormap::Gray,
            crop: true,
            crop_threshold: 0.05,
            frame_delay_ms: 100,
        }
    }
}


/// Cut one frame per timepoint out of a 4D volume, at a fixed slice of the
/// chosen view. The middle slice is used when none is given.
pub fn slice_frames(
    vol: &Array4<f64>,
    view: View,
    slice: Option<usize>,
) -> Result<Vec<Array2<f64>>> {
    let through = view.through_axis();
    let n_slices = vol.shape()[through];
    let nt = vol.shape()[3];
    if n_slices == 0 || nt == 0 {
        return Err(DfmriError::EmptyInput);
    }
    let index = slice.unwrap_or(n_slices / 2);
    if index >= n_slices {
        return Err(DfmriError::SliceOutOfRange(index, n_slices));
    }
    let mut frames = Vec::with_capacity(nt);
    for t in 0..nt {
        let vol3 = vol.index_axis(Axis(3), t);
        frames.push(vol3.index_axis(Axis(through), index).to_owned());
    }
    Ok(frames)
}


/// Cut one frame per slice out of a 3D volume, animating through the brain
/// along the chosen view's through-plane axis.
pub fn volume_frames(vol: &Array3<f64>, view: View) -> Result<Vec<Array2<f64>>> {
    let through = view.through_axis();
    let n_slices = vol.shape()[through];
    if n_slices == 0 {
        return Err(DfmriError::EmptyInput);
    }
    Ok((0..n_slices)
        .map(|i| vol.index_axis(Axis(through), i).to_owned())
        .collect())
}


/// Run the full pipeline over one or more frame sequences and write the GIF.
///
/// All sequences must have the same frame count; they are processed
/// independently and laid out side by side, one output frame per timepoint.
pub fn write_gif<P: AsRef<Path>>(
    frame_sets: &[Vec<Array2<f64>>],
    cfg: &GifConfig,
    path: P,
) -> Result<()> {
    let frames = render_frames(frame_sets, cfg)?;
    encode_gif(&frames, cfg, path)
}


/// Convenience wrapper: animate a 4D volume over time at the configured
/// view and slice.
pub fn write_volume_gif<P: AsRef<Path>>(
    vol: &Array4<f64>,
    cfg: &GifConfig,
    path: P,
) -> Result<()> {
    let frames = slice_frames(vol, cfg.view, cfg.slice)?;
    write_gif(&[frames], cfg, path)
}


/// Convenience wrapper: animate a 3D volume through its slices.
pub fn write_slices_gif<P: AsRef<Path>>(
    vol: &Array3<f64>,
    cfg: &GifConfig,
    path: P,
) -> Result<()> {
    let frames = volume_frames(vol, cfg.view)?;
    write_gif(&[frames], cfg, path)
}


fn render_frames(frame_sets: &[Vec<Array2<f64>>], cfg: &GifConfig) -> Result<Vec<RgbaImage>> {
    if frame_sets.is_empty() || frame_sets.iter().any(|set| set.is_empty()) {
        return Err(DfmriError::EmptyInput);
    }
    let n = frame_sets[0].len();
    if frame_sets.iter().any(|set| set.len() != n) {
        return Err(DfmriError::MismatchedFrameCounts);
    }

    let mut per_set: Vec<Vec<RgbaImage>> = Vec::with_capacity(frame_sets.len());
    for set in frame_sets {
        let planes = if cfg.crop { crop_set(set, cfg) } else { set.to_vec() };
        let shared = clip_limits(
            planes.iter().flat_map(|p| p.iter().copied()),
            cfg.clip.0,
            cfg.clip.1,
        );
        let mut frames = Vec::with_capacity(n);
        for plane in &planes {
            let (lo, hi) = if cfg.renormalize {
                clip_limits(plane.iter().copied(), cfg.clip.0, cfg.clip.1)
            } else {
                shared
            };
            let gray = plane_to_gray(plane, lo, hi);
            let mut frame = apply_colormap(&gray, cfg.colormap);
            if let Some((x, y)) = cfg.crosshair {
                draw_crosshair(&mut frame, x, y);
            }
            frame = orient(frame, cfg);
            if cfg.scale > 1 {
                let filter = if cfg.smooth {
                    FilterType::Triangle
                } else {
                    FilterType::Nearest
                };
                frame = imageops::resize(
                    &frame,
                    frame.width() * cfg.scale,
                    frame.height() * cfg.scale,
                    filter,
                );
            }
            frames.push(frame);
        }
        per_set.push(frames);
    }

    let mut composited = Vec::with_capacity(n);
    for t in 0..n {
        let row: Vec<&RgbaImage> = per_set.iter().map(|set| &set[t]).collect();
        let mut frame = hconcat(&row);
        if cfg.timebar {
            draw_timebar(&mut frame, t, n);
        }
        composited.push(frame);
    }

    if cfg.rewind && n > 2 {
        // the endpoints are not repeated, so the loop turns around cleanly
        let tail: Vec<RgbaImage> = composited[1..n - 1].iter().rev().cloned().collect();
        composited.extend(tail);
    }
    Ok(composited)
}


/// Air-crop a frame sequence to the bounding box of its mean plane.
fn crop_set(set: &[Array2<f64>], cfg: &GifConfig) -> Vec<Array2<f64>> {
    let shape = set[0].dim();
    if set.iter().any(|p| p.dim() != shape) {
        return set.to_vec();
    }
    let (lo, hi) = clip_limits(
        set.iter().flat_map(|p| p.iter().copied()),
        cfg.clip.0,
        cfg.clip.1,
    );
    let threshold = lo + cfg.crop_threshold * (hi - lo);

    let mut mean = Array2::<f64>::zeros(shape);
    for plane in set {
        mean += plane;
    }
    mean /= set.len() as f64;

    match content_bbox(&mean, threshold) {
        Some((x0, x1, y0, y1)) => set
            .iter()
            .map(|p| p.slice(s![x0..x1, y0..y1]).to_owned())
            .collect(),
        None => set.to_vec(),
    }
}


/// Bounding box of the above-threshold samples, as half-open ranges.
/// None when the whole plane is below the threshold.
fn content_bbox(plane: &Array2<f64>, threshold: f64) -> Option<(usize, usize, usize, usize)> {
    let (nx, ny) = plane.dim();
    let (mut x0, mut x1, mut y0, mut y1) = (nx, 0usize, ny, 0usize);
    for ((x, y), &value) in plane.indexed_iter() {
        if value.is_finite() && value > threshold {
            x0 = x0.min(x);
            x1 = x1.max(x + 1);
            y0 = y0.min(y);
            y1 = y1.max(y + 1);
        }
    }
    if x0 >= x1 || y0 >= y1 {
        None
    } else {
        Some((x0, x1, y0, y1))
    }
}


fn orient(frame: RgbaImage, cfg: &GifConfig) -> RgbaImage {
    let mut frame = frame;
    if cfg.flip_horizontal {
        frame = imageops::flip_horizontal(&frame);
    }
    if cfg.flip_vertical {
        frame = imageops::flip_vertical(&frame);
    }
    for _ in 0..(cfg.quarter_turns % 4) {
        frame = imageops::rotate90(&frame);
    }
    frame
}


fn hconcat(frames: &[&RgbaImage]) -> RgbaImage {
    let height = frames.iter().map(|f| f.height()).max().unwrap_or(0);
    let width: u32 = frames.iter().map(|f| f.width()).sum();
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));
    let mut x = 0i64;
    for frame in frames {
        // shorter sequences sit vertically centered on the canvas
        let y = ((height - frame.height()) / 2) as i64;
        imageops::overlay(&mut canvas, *frame, x, y);
        x += frame.width() as i64;
    }
    canvas
}


fn draw_timebar(frame: &mut RgbaImage, t: usize, n: usize) {
    let (width, height) = frame.dimensions();
    if width == 0 || height == 0 {
        return;
    }
    let bar_height = (height / 48).max(2).min(height);
    let filled = if n <= 1 {
        width
    } else {
        ((t as f64 / (n - 1) as f64) * width as f64).round() as u32
    };
    for y in height - bar_height..height {
        for x in 0..width {
            let pixel = if x < filled {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([40, 40, 40, 255])
            };
            frame.put_pixel(x, y, pixel);
        }
    }
}


fn draw_crosshair(frame: &mut RgbaImage, x: u32, y: u32) {
    let color = Rgba([255, 64, 64, 255]);
    if y < frame.height() {
        for px in 0..frame.width() {
            frame.put_pixel(px, y, color);
        }
    }
    if x < frame.width() {
        for py in 0..frame.height() {
            frame.put_pixel(x, py, color);
        }
    }
}


fn encode_gif<P: AsRef<Path>>(frames: &[RgbaImage], cfg: &GifConfig, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut encoder = GifEncoder::new_with_speed(BufWriter::new(file), 10);
    encoder.set_repeat(Repeat::Infinite)?;
    for image in frames {
        let frame = Frame::from_parts(
            image.clone(),
            0,
            0,
            Delay::from_numer_denom_ms(cfg.frame_delay_ms, 1),
        );
        encoder.encode_frame(frame)?;
    }
    Ok(())
}

//! Static slice overviews of a volume.
//!
//! Lays all axial slices of a volume out in a grid, the quick-look a
//! matplotlib subplot matrix gives during quality control. Each tile is
//! normalized on its own by default, like successive imshow calls would be;
//! a shared intensity window over the whole volume is available instead.

use image::imageops;
use image::{GrayImage, Luma};
use ndarray::{Array3, Array4, Axis};

use std::path::Path;

use crate::error::{DfmriError, Result};
use crate::render::{clip_limits, intensity_range, plane_to_gray};

/// Settings of the montage grid.
#[derive(Debug, Clone)]
pub struct MontageConfig {
    /// Number of grid rows the slices are spread over.
    pub rows: usize,
    /// Winsorization percentiles for the intensity window.
    pub clip: (f64, f64),
    /// One intensity window over the whole volume instead of per slice.
    pub shared_scale: bool,
    /// Gap between tiles in pixels.
    pub gap: u32,
}

impl Default for MontageConfig {
    fn default() -> MontageConfig {
        MontageConfig {
            rows: 2,
            clip: (0.0, 100.0),
            shared_scale: false,
            gap: 2,
        }
    }
}


/// Render all z slices of a volume into a grid image.
pub fn montage(vol: &Array3<f64>, cfg: &MontageConfig) -> Result<GrayImage> {
    let (nx, ny, nz) = vol.dim();
    if nx == 0 || ny == 0 || nz == 0 {
        return Err(DfmriError::EmptyInput);
    }
    let rows = cfg.rows.max(1).min(nz);
    let cols = (nz + rows - 1) / rows;

    // the default window is a plain min/max autoscale; winsorization only
    // kicks in for narrowed percentiles
    let full_range = cfg.clip == (0.0, 100.0);
    let shared = if cfg.shared_scale {
        Some(if full_range {
            intensity_range(vol)
        } else {
            clip_limits(vol.iter().copied(), cfg.clip.0, cfg.clip.1)
        })
    } else {
        None
    };

    let tile_w = nx as u32;
    let tile_h = ny as u32;
    let out_w = cols as u32 * tile_w + (cols as u32 - 1) * cfg.gap;
    let out_h = rows as u32 * tile_h + (rows as u32 - 1) * cfg.gap;
    let mut canvas = GrayImage::from_pixel(out_w, out_h, Luma([0u8]));

    for z in 0..nz {
        let plane = vol.index_axis(Axis(2), z);
        let (lo, hi) = match shared {
            Some(limits) => limits,
            None if full_range => intensity_range(&plane),
            None => clip_limits(plane.iter().copied(), cfg.clip.0, cfg.clip.1),
        };
        let tile = plane_to_gray(&plane, lo, hi);
        let row = (z / cols) as u32;
        let col = (z % cols) as u32;
        imageops::replace(
            &mut canvas,
            &tile,
            (col * (tile_w + cfg.gap)) as i64,
            (row * (tile_h + cfg.gap)) as i64,
        );
    }
    Ok(canvas)
}


/// Render the montage of a 4D volume at a fixed timepoint or b-value index.
pub fn montage_at(vol: &Array4<f64>, t: usize, cfg: &MontageConfig) -> Result<GrayImage> {
    let nt = vol.shape()[3];
    if t >= nt {
        return Err(DfmriError::TimepointOutOfRange(t, nt));
    }
    montage(&vol.index_axis(Axis(3), t).to_owned(), cfg)
}


/// Render a montage and save it, with the format chosen by extension.
pub fn write_montage<P: AsRef<Path>>(vol: &Array3<f64>, cfg: &MontageConfig, path: P) -> Result<()> {
    let img = montage(vol, cfg)?;
    img.save(path.as_ref())?;
    Ok(())
}


#[cfg(test)]
mod test {
    use super::*;
    use ndarray::{Array3, Array4};

    #[test]
    fn the_grid_spreads_slices_over_rows() {
        let vol = Array3::from_shape_fn((6, 4, 8), |(x, _, _)| x as f64);
        let img = montage(&vol, &MontageConfig::default()).unwrap();
        // 8 slices over 2 rows: 4 columns of 6x4 tiles with 2 px gaps
        assert_eq!((4 * 6 + 3 * 2, 2 * 4 + 2), img.dimensions());
    }

    #[test]
    fn fewer_slices_than_rows_collapse_the_grid() {
        let vol = Array3::from_shape_fn((3, 3, 1), |_| 1.0);
        let img = montage(&vol, &MontageConfig::default()).unwrap();
        assert_eq!((3, 3), img.dimensions());
    }

    #[test]
    fn per_slice_scaling_fills_the_gray_range() {
        // two slices of very different magnitude
        let mut vol = Array3::<f64>::zeros((2, 2, 2));
        vol[[1, 0, 0]] = 10.0;
        vol[[1, 0, 1]] = 1000.0;
        let cfg = MontageConfig { gap: 0, ..MontageConfig::default() };
        let img = montage(&vol, &cfg).unwrap();
        // two slices over two rows: tiles stack vertically
        assert_eq!((2, 4), img.dimensions());
        // both tiles reach 255 despite the magnitude difference
        assert_eq!(255, img.get_pixel(1, 1).0[0]);
        assert_eq!(255, img.get_pixel(1, 3).0[0]);
    }

    #[test]
    fn shared_scaling_keeps_relative_intensity() {
        let mut vol = Array3::<f64>::zeros((2, 2, 2));
        vol[[1, 0, 0]] = 10.0;
        vol[[1, 0, 1]] = 1000.0;
        let cfg = MontageConfig {
            gap: 0,
            shared_scale: true,
            ..MontageConfig::default()
        };
        let img = montage(&vol, &cfg).unwrap();
        assert_eq!(3, img.get_pixel(1, 1).0[0]);
        assert_eq!(255, img.get_pixel(1, 3).0[0]);
    }

    #[test]
    fn the_timepoint_must_exist() {
        let vol = Array4::<f64>::zeros((2, 2, 2, 3));
        assert!(montage_at(&vol, 3, &MontageConfig::default()).is_err());
        assert!(montage_at(&vol, 2, &MontageConfig::default()).is_ok());
    }
}

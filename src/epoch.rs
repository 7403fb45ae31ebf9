//! ADC time-course extraction at significant voxels, and epoch handling.
//!
//! The workflow mirrors a block-design diffusion fMRI analysis: a region mask
//! and a z-statistic map select the voxels of interest, their ADC series are
//! pulled from the 4D volume, cut into stimulation epochs and expressed
//! relative to the per-epoch baseline.

use ndarray::{s, Array2, Array3, Array4, ArrayView1};

use crate::error::{DfmriError, Result};


/// Find the significant voxels of a statistical map within a region mask.
///
/// A voxel is significant when its mask value equals one of `labels` and its
/// z value exceeds `threshold` (3.1 being the conventional choice). Returns
/// the (x, y, z) indices of the matching voxels.
pub fn significant_voxels(
    mask: &Array3<f64>,
    labels: &[i32],
    zmap: &Array3<f64>,
    threshold: f64,
) -> Result<Vec<[usize; 3]>> {
    if mask.dim() != zmap.dim() {
        return Err(DfmriError::MismatchedShapes);
    }
    let mut voxels = Vec::new();
    for ((x, y, z), &label) in mask.indexed_iter() {
        // mask voxels carry integer region labels stored as floats
        if labels.iter().any(|&l| label == l as f64) && zmap[[x, y, z]] > threshold {
            voxels.push([x, y, z]);
        }
    }
    Ok(voxels)
}


/// Pull the time series of the given voxels out of a 4D ADC volume.
///
/// Returns a `(n_voxels, n_timepoints)` matrix, one row per voxel in the
/// order given.
pub fn extract_timecourses(adc: &Array4<f64>, voxels: &[[usize; 3]]) -> Result<Array2<f64>> {
    let (nx, ny, nz, nt) = adc.dim();
    let mut timecourses = Array2::<f64>::zeros((voxels.len(), nt));
    for (row, v) in voxels.iter().enumerate() {
        if v[0] >= nx || v[1] >= ny || v[2] >= nz {
            return Err(DfmriError::VoxelOutOfBounds(v[0], v[1], v[2]));
        }
        timecourses
            .row_mut(row)
            .assign(&adc.slice(s![v[0], v[1], v[2], ..]));
    }
    Ok(timecourses)
}


/// Cut a time series into epochs of `epoch_len` samples.
///
/// When the series length is not a multiple of `epoch_len`, the *leading*
/// remainder samples are discarded, so the epochs stay aligned to the end of
/// the run. A series shorter than one epoch yields a `(0, epoch_len)` array.
pub fn reshape_by_epoch(series: ArrayView1<f64>, epoch_len: usize) -> Result<Array2<f64>> {
    if epoch_len == 0 {
        return Err(DfmriError::InvalidEpochLength);
    }
    let discard = series.len() % epoch_len;
    let trimmed = series.slice(s![discard..]).to_owned();
    let n_epochs = trimmed.len() / epoch_len;
    Ok(trimmed.into_shape((n_epochs, epoch_len))?)
}


/// Express each epoch relative to its own baseline.
///
/// The baseline is the mean of the last `baseline_len` samples of the epoch;
/// every sample of the epoch is divided by it. A zero baseline produces
/// infinities, which propagate.
pub fn normalize_epochs(mut epochs: Array2<f64>, baseline_len: usize) -> Result<Array2<f64>> {
    let epoch_len = epochs.ncols();
    if baseline_len == 0 || baseline_len > epoch_len {
        return Err(DfmriError::InvalidBaselineLength(baseline_len, epoch_len));
    }
    for mut epoch in epochs.rows_mut() {
        let baseline = epoch
            .slice(s![epoch_len - baseline_len..])
            .mean()
            .unwrap_or(f64::NAN);
        epoch.mapv_inplace(|v| v / baseline);
    }
    Ok(epochs)
}

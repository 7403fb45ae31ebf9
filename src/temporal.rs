//! Temporal statistics on 4D functional volumes.
//!
//! The time axis is the 4th array axis throughout, matching the NIfTI
//! convention of (x, y, z, t) volumes. Voxels with zero temporal variance
//! produce infinities in the SNR map; values propagate instead of being
//! masked out.

use ndarray::{Array3, Array4, Axis};

use crate::error::{DfmriError, Result};


/// Calculate the temporal mean of a 4D volume.
///
/// Returns a 3D volume, averaged over the time axis.
pub fn temporal_mean(vol: &Array4<f64>) -> Result<Array3<f64>> {
    vol.mean_axis(Axis(3)).ok_or(DfmriError::EmptyInput)
}


/// Calculate the temporal standard deviation of a 4D volume.
///
/// Returns a 3D volume of the population standard deviation (zero delta
/// degrees of freedom) over the time axis.
pub fn temporal_std(vol: &Array4<f64>) -> Result<Array3<f64>> {
    if vol.shape()[3] == 0 {
        return Err(DfmriError::EmptyInput);
    }
    Ok(vol.std_axis(Axis(3), 0.0))
}


/// Calculate the voxelwise temporal SNR of a 4D volume.
///
/// `tr_ms` is the repetition time in milliseconds; the SNR is
/// `mean / (std * sqrt(TR))` per voxel.
pub fn temporal_snr(vol: &Array4<f64>, tr_ms: f64) -> Result<Array3<f64>> {
    if !(tr_ms > 0.0) {
        return Err(DfmriError::InvalidRepetitionTime(tr_ms));
    }
    let tmean = temporal_mean(vol)?;
    let tstd = temporal_std(vol)?;
    Ok(tmean / (tstd * tr_ms.sqrt()))
}

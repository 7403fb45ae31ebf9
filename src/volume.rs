//! Functions for reading and writing brain volumes in NIfTI-1 files.
//!
//! These are thin wrappers around the `nifti` crate that hand volumes out as
//! owned `ndarray` arrays, the way the rest of this crate consumes them. Both
//! plain `.nii` and gzipped `.nii.gz` files are handled, chosen by extension.

use ndarray::{Array, Array2, Array3, Array4, ArrayD, Axis, Dimension, Ix3, Ix4};
use nifti::writer::WriterOptions;
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};

use std::path::Path;

use crate::error::{DfmriError, Result};


/// Read a NIfTI file into an array of whatever dimensionality it declares.
pub fn read_volume_dyn<P: AsRef<Path>>(path: P) -> Result<ArrayD<f64>> {
    let obj = ReaderOptions::new().read_file(path.as_ref())?;
    let data = obj.into_volume().into_ndarray::<f64>()?;
    Ok(data)
}


/// Read a 3D volume from a NIfTI file.
///
/// A 4D file with a singleton time axis (as produced by some exporters for
/// statistical maps) is accepted and squeezed down to 3D.
pub fn read_volume<P: AsRef<Path>>(path: P) -> Result<Array3<f64>> {
    let mut data = read_volume_dyn(path)?;
    if data.ndim() == 4 && data.shape()[3] == 1 {
        data = data.index_axis_move(Axis(3), 0);
    }
    if data.ndim() != 3 {
        return Err(DfmriError::WrongDimensionality(3, data.ndim()));
    }
    Ok(data.into_dimensionality::<Ix3>()?)
}


/// Read a 4D functional volume from a NIfTI file.
pub fn read_volume_4d<P: AsRef<Path>>(path: P) -> Result<Array4<f64>> {
    let data = read_volume_dyn(path)?;
    if data.ndim() != 4 {
        return Err(DfmriError::WrongDimensionality(4, data.ndim()));
    }
    Ok(data.into_dimensionality::<Ix4>()?)
}


/// Read only the parsed header of a NIfTI file.
pub fn read_header<P: AsRef<Path>>(path: P) -> Result<NiftiHeader> {
    let obj = ReaderOptions::new().read_file(path.as_ref())?;
    Ok(obj.header().clone())
}


/// Read the 4x4 voxel-to-world affine matrix of a NIfTI file.
pub fn read_affine<P: AsRef<Path>>(path: P) -> Result<Array2<f64>> {
    let hdr = read_header(path)?;
    Ok(affine_from_header(&hdr))
}


/// Compute the voxel-to-world affine from a parsed header.
///
/// The sform rows are used when `sform_code` marks them as valid. Otherwise
/// the affine falls back to a diagonal matrix of the voxel sizes, which keeps
/// scaling information but drops orientation.
pub fn affine_from_header(hdr: &NiftiHeader) -> Array2<f64> {
    let mut affine = Array2::<f64>::eye(4);
    if hdr.sform_code > 0 {
        let rows = [hdr.srow_x, hdr.srow_y, hdr.srow_z];
        for (i, srow) in rows.iter().enumerate() {
            for j in 0..4 {
                affine[[i, j]] = srow[j] as f64;
            }
        }
    } else {
        for i in 0..3 {
            affine[[i, i]] = hdr.pixdim[i + 1] as f64;
        }
    }
    affine
}


/// Save an array as a `.nii` or `.nii.gz` file (chosen by extension).
///
/// With a reference header its metadata is carried over to the new file; the
/// data-dependent fields are rewritten from the array itself. An explicit
/// affine overrides the sform rows. With neither, the volume is written with
/// an identity affine.
pub fn write_volume<P, D>(
    path: P,
    data: &Array<f64, D>,
    affine: Option<&Array2<f64>>,
    reference: Option<&NiftiHeader>,
) -> Result<()>
where
    P: AsRef<Path>,
    D: Dimension + ndarray::RemoveAxis,
{
    let mut hdr = match reference {
        Some(h) => h.clone(),
        None => NiftiHeader::default(),
    };
    let identity;
    let affine = match (affine, reference) {
        (Some(a), _) => Some(a),
        (None, None) => {
            identity = Array2::<f64>::eye(4);
            Some(&identity)
        }
        (None, Some(_)) => None,
    };
    if let Some(aff) = affine {
        if aff.shape() != [4, 4] {
            return Err(DfmriError::BadAffineShape);
        }
        hdr.sform_code = 1;
        for j in 0..4 {
            hdr.srow_x[j] = aff[[0, j]] as f32;
            hdr.srow_y[j] = aff[[1, j]] as f32;
            hdr.srow_z[j] = aff[[2, j]] as f32;
        }
    }
    WriterOptions::new(path.as_ref())
        .reference_header(&hdr)
        .write_nifti(data)?;
    Ok(())
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn affine_prefers_the_sform_rows() {
        let mut hdr = NiftiHeader::default();
        hdr.sform_code = 1;
        hdr.srow_x = [-2.0, 0.0, 0.0, 90.0];
        hdr.srow_y = [0.0, 2.0, 0.0, -126.0];
        hdr.srow_z = [0.0, 0.0, 2.0, -72.0];

        let affine = affine_from_header(&hdr);
        assert_eq!(affine[[0, 0]], -2.0);
        assert_eq!(affine[[0, 3]], 90.0);
        assert_eq!(affine[[1, 3]], -126.0);
        assert_eq!(affine[[2, 2]], 2.0);
        assert_eq!(affine[[3, 3]], 1.0);
    }

    #[test]
    fn affine_falls_back_to_voxel_sizes() {
        let mut hdr = NiftiHeader::default();
        hdr.sform_code = 0;
        hdr.pixdim = [1.0, 0.5, 0.75, 3.0, 2.0, 0.0, 0.0, 0.0];

        let affine = affine_from_header(&hdr);
        assert_eq!(affine[[0, 0]], 0.5);
        assert_eq!(affine[[1, 1]], 0.75);
        assert_eq!(affine[[2, 2]], 3.0);
        assert_eq!(affine[[0, 3]], 0.0);
    }
}

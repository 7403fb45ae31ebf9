use approx::assert_abs_diff_eq;
use ndarray::{Array2, Array3, Array4};
use tempfile::tempdir;

use dfmri::{read_affine, read_header, read_volume, read_volume_4d, write_volume};

fn checker(nx: usize, ny: usize, nz: usize) -> Array3<f64> {
    Array3::from_shape_fn((nx, ny, nz), |(x, y, z)| ((x + y + z) % 2) as f64 * 50.0 + 7.25)
}

#[test]
fn volumes_round_trip_through_nii() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("vol.nii");
    let vol = checker(4, 5, 6);

    write_volume(&target, &vol, None, None).unwrap();
    let loaded = read_volume(&target).unwrap();

    assert_eq!(vol.shape(), loaded.shape());
    for (&a, &b) in vol.iter().zip(loaded.iter()) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-12);
    }
}

#[test]
fn volumes_round_trip_through_nii_gz() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("vol.nii.gz");
    let vol = checker(3, 3, 3);

    write_volume(&target, &vol, None, None).unwrap();
    let loaded = read_volume(&target).unwrap();

    assert_eq!(vol.shape(), loaded.shape());
    assert_abs_diff_eq!(vol[[2, 1, 0]], loaded[[2, 1, 0]], epsilon = 1e-12);
}

#[test]
fn four_d_volumes_keep_their_time_axis() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("bold.nii");
    let vol = Array4::from_shape_fn((4, 4, 3, 10), |(x, y, z, t)| {
        1000.0 + (x + 2 * y + 3 * z) as f64 + t as f64 / 10.0
    });

    write_volume(&target, &vol, None, None).unwrap();
    let loaded = read_volume_4d(&target).unwrap();

    assert_eq!(&[4, 4, 3, 10], loaded.shape());
    assert_abs_diff_eq!(vol[[1, 2, 0, 9]], loaded[[1, 2, 0, 9]], epsilon = 1e-12);
}

#[test]
fn dimensionality_is_enforced() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("vol.nii");
    write_volume(&target, &checker(3, 3, 3), None, None).unwrap();

    assert!(read_volume_4d(&target).is_err());
    assert!(read_volume(&target).is_ok());
}

#[test]
fn the_affine_survives_the_round_trip() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("vol.nii");
    let mut affine = Array2::<f64>::eye(4);
    affine[[0, 0]] = -2.0;
    affine[[1, 1]] = 2.0;
    affine[[2, 2]] = 2.0;
    affine[[0, 3]] = 90.0;
    affine[[1, 3]] = -126.0;
    affine[[2, 3]] = -72.0;

    write_volume(&target, &checker(4, 4, 4), Some(&affine), None).unwrap();
    let loaded = read_affine(&target).unwrap();

    // stored as f32 in the header
    for (&a, &b) in affine.iter().zip(loaded.iter()) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-4);
    }
}

#[test]
fn a_missing_affine_defaults_to_identity() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("vol.nii");
    write_volume(&target, &checker(2, 2, 2), None, None).unwrap();

    let affine = read_affine(&target).unwrap();
    assert_abs_diff_eq!(1.0, affine[[0, 0]], epsilon = 1e-6);
    assert_abs_diff_eq!(1.0, affine[[1, 1]], epsilon = 1e-6);
    assert_abs_diff_eq!(0.0, affine[[0, 3]], epsilon = 1e-6);
}

#[test]
fn bad_affine_shapes_are_rejected() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("vol.nii");
    let affine = Array2::<f64>::eye(3);
    assert!(write_volume(&target, &checker(2, 2, 2), Some(&affine), None).is_err());
}

#[test]
fn reference_headers_carry_metadata_over() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("source.nii");
    let derived = dir.path().join("derived.nii");

    let mut affine = Array2::<f64>::eye(4);
    affine[[0, 3]] = 12.5;
    write_volume(&source, &checker(4, 4, 4), Some(&affine), None).unwrap();

    let reference = read_header(&source).unwrap();
    write_volume(&derived, &checker(4, 4, 4), None, Some(&reference)).unwrap();

    let loaded = read_affine(&derived).unwrap();
    assert_abs_diff_eq!(12.5, loaded[[0, 3]], epsilon = 1e-4);
}

#[test]
fn missing_files_are_an_error() {
    assert!(read_volume("/no/such/place/vol.nii").is_err());
}

//! Rust toolkit for diffusion fMRI analysis workflows.
//!
//! The focus of this package is on 4D functional volumes in NIfTI-1 files:
//! loading and saving them, comparing header metadata between scans,
//! computing temporal statistics (mean, standard deviation, temporal SNR),
//! extracting and normalizing ADC time courses at significant voxels, and
//! visualizing volumes as static montages or animated GIFs.

pub mod cow;
pub mod epoch;
pub mod error;
pub mod header;
pub mod mkgif;
pub mod montage;
pub mod plot;
pub mod render;
pub mod temporal;
pub mod util;
pub mod volume;

pub use cow::Cow;
pub use epoch::{extract_timecourses, normalize_epochs, reshape_by_epoch, significant_voxels};
pub use error::{DfmriError, Result};
pub use header::{
    diff_headers, format_diff, header_fields, read_raw_header, FieldDiff, FieldKind, FieldValue,
    HeaderField,
};
pub use mkgif::{
    slice_frames, volume_frames, write_gif, write_slices_gif, write_volume_gif, GifConfig, View,
};
pub use montage::{montage, montage_at, write_montage, MontageConfig};
pub use plot::{plot_epoch_timecourse, EpochAnnotation, PlotConfig};
pub use render::Colormap;
pub use temporal::{temporal_mean, temporal_snr, temporal_std};
pub use volume::{
    affine_from_header, read_affine, read_header, read_volume, read_volume_4d, read_volume_dyn,
    write_volume,
};

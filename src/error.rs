use quick_error::quick_error;
use std::io::Error as IOError;

quick_error! {
    /// Error type for all error variants originated by this crate.
    #[derive(Debug)]
    pub enum DfmriError {
        /// The file could not be parsed as NIfTI.
        InvalidNiftiFile(err: nifti::error::NiftiError) {
            from()
            source(err)
            display("Invalid NIfTI file: {}", err)
        }

        /// The volume does not have the dimensionality an operation requires.
        WrongDimensionality(expected: usize, actual: usize) {
            display("Expected a {}D volume, found {}D", expected, actual)
        }

        /// An input array or frame sequence contained no data.
        EmptyInput {
            display("Empty input")
        }

        MismatchedShapes {
            display("Input volumes have mismatched shapes")
        }

        /// Concatenated frame sequences must have the same frame count.
        MismatchedFrameCounts {
            display("Frame sequences have different lengths")
        }

        InvalidRepetitionTime(tr_ms: f64) {
            display("Repetition time must be positive, got {} ms", tr_ms)
        }

        InvalidEpochLength {
            display("Epoch length must be at least 1 sample")
        }

        /// The baseline window does not fit into an epoch.
        InvalidBaselineLength(baseline: usize, epoch_len: usize) {
            display("Baseline of {} samples does not fit an epoch of {} samples", baseline, epoch_len)
        }

        VoxelOutOfBounds(x: usize, y: usize, z: usize) {
            display("Voxel ({}, {}, {}) is outside the volume", x, y, z)
        }

        SliceOutOfRange(index: usize, len: usize) {
            display("Slice {} out of range for axis of length {}", index, len)
        }

        TimepointOutOfRange(index: usize, len: usize) {
            display("Timepoint {} out of range for time axis of length {}", index, len)
        }

        /// The file ended before a full NIfTI-1 header was read.
        HeaderTooShort(len: usize) {
            display("Header too short: got {} of 348 bytes", len)
        }

        /// The sizeof_hdr field matches no known NIfTI-1 layout.
        UnrecognizedHeader {
            display("Not a NIfTI-1 header")
        }

        BadAffineShape {
            display("Affine must be a 4x4 matrix")
        }

        /// The confidence interval needs at least two epochs.
        TooFewEpochs(n: usize) {
            display("Need at least 2 epochs for a confidence interval, got {}", n)
        }

        Shape(err: ndarray::ShapeError) {
            from()
            source(err)
            display("Shape error: {}", err)
        }

        Image(err: image::ImageError) {
            from()
            source(err)
            display("Image error: {}", err)
        }

        /// The chart backend failed to draw.
        Render(msg: String) {
            display("Render error: {}", msg)
        }

        /// I/O Error
        Io(err: IOError) {
            from()
            source(err)
        }
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, DfmriError>;

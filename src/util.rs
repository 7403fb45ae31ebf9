//! Utility functions used in all other dfmri modules.

use std::{path::Path};

/// ANSI escape sequence for bright blue terminal output.
pub const CBLUE: &str = "\x1b[94m";

/// ANSI escape sequence that resets terminal styling.
pub const ENDC: &str = "\x1b[0m";

/// Check whether the file extension ends with ".gz".
pub fn is_gz_file<P>(path: P) -> bool
where
    P: AsRef<Path>,
{
    path.as_ref()
        .file_name()
        .map(|a| a.to_string_lossy().ends_with(".gz"))
        .unwrap_or(false)
}

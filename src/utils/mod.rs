pub mod binary_resolver;
pub mod constants;
pub mod media;

use std::path::PathBuf;

/// Millisecond epoch timestamp used in output file names.
pub fn epoch_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Directory where result files land: the working directory, or the home
/// directory when the working directory is not writable.
pub fn output_dir() -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let writable = std::fs::metadata(&cwd)
        .map(|meta| !meta.permissions().readonly())
        .unwrap_or(false);
    if writable {
        cwd
    } else {
        dirs::home_dir().unwrap_or(cwd)
    }
}

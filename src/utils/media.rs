//! Video post-processing via ffmpeg.

use crate::error::Result;
use crate::exec;
use crate::utils::binary_resolver;
use log::info;
use std::path::{Path, PathBuf};

/// Re-encode the recording in place with x264. ffmpeg reports progress on
/// stderr, which is demoted to the debug log.
pub async fn compress_video(path: &Path) -> Result<()> {
    info!("Compressing video...");
    let ffmpeg = binary_resolver::find_ffmpeg()?;
    let source = path.to_string_lossy().into_owned();
    let compressed = PathBuf::from(format!("{source}.out.mp4"));
    let target = compressed.to_string_lossy().into_owned();

    exec::capture(
        &ffmpeg,
        &["-i", &source, "-vcodec", "libx264", "-crf", "20", &target],
        true,
    )
    .await?;

    std::fs::rename(&compressed, path)?;
    Ok(())
}

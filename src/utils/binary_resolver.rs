//! Resolves the external tool binaries the wrappers shell out to.

use crate::error::{Error, Result};
use std::path::PathBuf;

/// Look up a tool on PATH, falling back to the `~/.mth` install directory
/// for machines where the Android platform-tools are unpacked by hand.
pub fn find_tool(name: &str) -> Result<PathBuf> {
    if let Ok(path) = which::which(name) {
        return Ok(path);
    }

    if let Some(home) = dirs::home_dir() {
        let candidate = home.join(".mth").join("platform-tools").join(name);
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    Err(Error::ToolNotFound(name.to_string()))
}

pub fn find_adb() -> Result<PathBuf> {
    find_tool("adb")
}

pub fn find_ffmpeg() -> Result<PathBuf> {
    find_tool("ffmpeg")
}

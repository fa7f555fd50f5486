use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::{
    core::Fps,
    error::{BellezaError, BellezaResult},
};

/// One encode job: turn an on-disk, contiguously numbered frame sequence
/// into a video file at the target frame rate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeRequest {
    /// Input frame pattern, e.g. `<tempdir>/frame_%04d.png`.
    pub input_pattern: PathBuf,
    /// Target frame rate from the playback-speed configuration.
    pub fps: Fps,
    /// Output video path. An existing file is overwritten.
    pub out_path: PathBuf,
}

/// Narrow capability interface over the external encoding process.
///
/// The export pipeline depends only on this contract; subprocess invocation,
/// a native library binding, or a remote service can all sit behind it.
pub trait Encoder {
    fn encode(&mut self, req: &EncodeRequest) -> BellezaResult<()>;
}

/// [`Encoder`] that invokes the system `ffmpeg` binary.
///
/// We intentionally shell out to `ffmpeg` rather than bind a native encoding
/// library to avoid FFmpeg dev header/lib requirements.
#[derive(Clone, Debug)]
pub struct FfmpegEncoder {
    binary: PathBuf,
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegEncoder {
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("ffmpeg"),
        }
    }

    /// Use an explicit binary path instead of resolving `ffmpeg` on PATH.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Encoder for FfmpegEncoder {
    fn encode(&mut self, req: &EncodeRequest) -> BellezaResult<()> {
        let output = Command::new(&self.binary)
            .args(build_args(req))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    BellezaError::encoder_missing(format!(
                        "'{}' was not found; install FFmpeg and make sure it is on PATH",
                        self.binary.display()
                    ))
                } else {
                    BellezaError::encoder_failure(format!(
                        "failed to run '{}': {e}",
                        self.binary.display()
                    ))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BellezaError::encoder_failure(format!(
                "'{}' exited with status {}: {}",
                self.binary.display(),
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

/// Argument list for one encode invocation: PNG sequence in, h264 + yuv420p
/// out for broad player compatibility, overwriting the destination.
fn build_args(req: &EncodeRequest) -> Vec<OsString> {
    vec![
        OsString::from("-loglevel"),
        OsString::from("error"),
        OsString::from("-framerate"),
        OsString::from(req.fps.0.to_string()),
        OsString::from("-i"),
        req.input_pattern.clone().into_os_string(),
        OsString::from("-c:v"),
        OsString::from("libx264"),
        OsString::from("-pix_fmt"),
        OsString::from("yuv420p"),
        OsString::from("-y"),
        req.out_path.clone().into_os_string(),
    ]
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> BellezaResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

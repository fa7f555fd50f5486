use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    compositor::StackSnapshot,
    core::{Canvas, Fps, FrameIndex},
    encode_ffmpeg::{EncodeRequest, Encoder, ensure_parent_dir},
    error::{BellezaError, BellezaResult},
    model::LayerStack,
    raster::Raster,
};

/// Frame filename pattern handed to the encoder.
pub const FRAME_FILE_PATTERN: &str = "frame_%04d.png";

/// Filename for one exported frame: zero-padded width-4 decimal index.
pub fn frame_file_name(frame: FrameIndex) -> String {
    format!("frame_{:04}.png", frame.0)
}

/// Result of one export call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    /// All frames were produced and persisted/encoded.
    Completed { frames: u64 },
    /// No destination was chosen (the user cancelled the picker); nothing
    /// was written. A deliberate no-op, not a failure.
    Skipped,
}

/// Export every animation frame as a standalone PNG in `dest`, named
/// `frame_0000.png` .. `frame_NNNN.png`.
///
/// Frames are composited and written strictly in increasing index order. A
/// failed write aborts the remaining frames with
/// [`BellezaError::FrameWrite`] naming the failing index; frames already
/// written are left in place, not rolled back.
#[tracing::instrument(skip(stack, canvas))]
pub fn export_image_sequence(
    stack: &LayerStack,
    canvas: &Canvas,
    dest: Option<&Path>,
) -> BellezaResult<ExportOutcome> {
    let Some(dest) = dest else {
        return Ok(ExportOutcome::Skipped);
    };

    canvas.validate()?;
    stack.validate()?;
    let total = stack.frame_count();
    if total == 0 {
        return Err(BellezaError::validation(
            "nothing to export: no layer has any frame",
        ));
    }

    std::fs::create_dir_all(dest)
        .with_context(|| format!("failed to create export directory '{}'", dest.display()))?;

    let snapshot = StackSnapshot::of(stack);
    for f in 0..total {
        let frame = FrameIndex(f);
        tracing::debug!(frame = f, "compositing");
        let raster = snapshot.composite(frame, canvas)?;
        tracing::debug!(frame = f, "persisting");
        write_frame_png(dest, frame, &raster)?;
    }

    tracing::debug!(frames = total, dest = %dest.display(), "image sequence exported");
    Ok(ExportOutcome::Completed { frames: total })
}

/// Export the animation as a video by writing the flattened frame sequence
/// into a fresh temporary directory and handing it to `encoder`.
///
/// The temporary directory is removed before this returns on every path:
/// success, a frame failure, or an encoder failure.
#[tracing::instrument(skip(stack, canvas, encoder))]
pub fn export_video(
    stack: &LayerStack,
    canvas: &Canvas,
    fps: Fps,
    dest: Option<&Path>,
    encoder: &mut dyn Encoder,
) -> BellezaResult<ExportOutcome> {
    let Some(dest) = dest else {
        return Ok(ExportOutcome::Skipped);
    };

    canvas.validate()?;
    stack.validate()?;
    fps.validate()?;
    let total = stack.frame_count();
    if total == 0 {
        return Err(BellezaError::validation(
            "nothing to export: no layer has any frame",
        ));
    }

    let temp_dir = unique_temp_dir();
    std::fs::create_dir_all(&temp_dir).with_context(|| {
        format!(
            "failed to create temporary frame directory '{}'",
            temp_dir.display()
        )
    })?;
    // Removes the directory on every exit path below, including errors.
    let _cleanup = TempDirGuard(Some(temp_dir.clone()));

    let snapshot = StackSnapshot::of(stack);
    for f in 0..total {
        let frame = FrameIndex(f);
        tracing::debug!(frame = f, "compositing");
        let raster = snapshot.composite(frame, canvas)?;
        tracing::debug!(frame = f, "persisting");
        write_frame_png(&temp_dir, frame, &raster)?;
    }

    ensure_parent_dir(dest)?;
    let request = EncodeRequest {
        input_pattern: temp_dir.join(FRAME_FILE_PATTERN),
        fps,
        out_path: dest.to_path_buf(),
    };
    tracing::debug!(out = %dest.display(), "encoding video");
    encoder.encode(&request)?;

    tracing::debug!(frames = total, out = %dest.display(), "video exported");
    Ok(ExportOutcome::Completed { frames: total })
}

fn write_frame_png(dir: &Path, frame: FrameIndex, raster: &Raster) -> BellezaResult<()> {
    let path = dir.join(frame_file_name(frame));
    // Composites are seeded with an opaque background, so every output pixel
    // has alpha 255 and premultiplied equals straight RGBA here.
    image::save_buffer_with_format(
        &path,
        raster.data(),
        raster.width(),
        raster.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| BellezaError::frame_write(frame, format!("'{}': {e}", path.display())))
}

fn unique_temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!(
        "belleza_export_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    ))
}

struct TempDirGuard(Option<PathBuf>);

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_dir_all(path);
        }
    }
}

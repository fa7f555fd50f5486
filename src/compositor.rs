use crate::{
    composite_cpu::over_in_place,
    core::{Canvas, FrameIndex},
    error::{BellezaError, BellezaResult},
    model::{FrameStore, LayerStack},
    raster::Raster,
};

/// Immutable view of the stack taken once per export.
///
/// Captures the composite order and per-layer state (visibility, opacity,
/// frame-store reference) at a single point in time, so every frame of one
/// export is flattened against the same stack; per-frame compositing never
/// re-queries layer order. The borrow also keeps the host from mutating the
/// stack for the lifetime of the snapshot.
pub struct StackSnapshot<'a> {
    entries: Vec<LayerView<'a>>,
}

struct LayerView<'a> {
    name: &'a str,
    visible: bool,
    opacity_factor: f32,
    frames: &'a FrameStore,
}

impl<'a> StackSnapshot<'a> {
    /// Capture the stack bottom-to-top.
    pub fn of(stack: &'a LayerStack) -> Self {
        let entries = stack
            .layers_in_composite_order()
            .map(|layer| LayerView {
                name: &layer.name,
                visible: layer.visible,
                opacity_factor: layer.opacity_factor(),
                frames: &layer.frames,
            })
            .collect();
        Self { entries }
    }

    /// Flatten one frame: seed with the canvas background (opaque), then
    /// blend every visible layer's raster at `frame` bottom-to-top with
    /// "over", layer opacity scaling source alpha.
    ///
    /// Layers with no content at `frame` contribute nothing (transparent,
    /// not black). Zero-opacity and invisible layers are skipped before any
    /// pixel work. A non-degenerate raster whose size differs from the
    /// canvas is an error, never cropped or stretched.
    pub fn composite(&self, frame: FrameIndex, canvas: &Canvas) -> BellezaResult<Raster> {
        canvas.validate()?;

        let bg = canvas.background_premul().to_array();
        let mut out = Raster::filled(canvas.width, canvas.height, bg);

        for layer in &self.entries {
            if !layer.visible || layer.opacity_factor <= 0.0 {
                continue;
            }
            let Some(raster) = layer.frames.get(frame) else {
                continue;
            };
            if raster.is_degenerate() {
                continue;
            }
            if raster.width() != canvas.width || raster.height() != canvas.height {
                return Err(BellezaError::composite(format!(
                    "layer '{}' frame {} is {}x{}, canvas is {}x{}",
                    layer.name,
                    frame,
                    raster.width(),
                    raster.height(),
                    canvas.width,
                    canvas.height
                )));
            }

            over_in_place(out.data_mut(), raster.data(), layer.opacity_factor)?;
        }

        Ok(out)
    }

    /// Number of layers captured by the snapshot.
    pub fn layer_count(&self) -> usize {
        self.entries.len()
    }
}

/// One-shot composite of a single frame against the stack's current order.
/// Interactive hosts use this for on-screen redraw; exports build one
/// [`StackSnapshot`] and reuse it across the whole frame range.
pub fn composite_frame(
    stack: &LayerStack,
    frame: FrameIndex,
    canvas: &Canvas,
) -> BellezaResult<Raster> {
    StackSnapshot::of(stack).composite(frame, canvas)
}

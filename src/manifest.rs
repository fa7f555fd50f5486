use std::{collections::BTreeMap, fs::File, io::BufReader, path::Path, path::PathBuf};

use anyhow::Context as _;

use crate::{
    core::{Canvas, Fps, FrameIndex},
    error::{BellezaError, BellezaResult},
    model::{Layer, LayerStack},
    raster::Raster,
};

/// JSON description of one headless export job: the canvas, the frame rate,
/// and the layer stack with per-frame PNG sources.
///
/// Layers are listed bottom-to-top, matching the stack's composite order.
/// Frame paths are resolved relative to the manifest file's directory. This
/// is the CLI's input format, not the editor's project file.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ExportManifest {
    pub canvas: Canvas,
    pub fps: Fps,
    pub layers: Vec<LayerEntry>,
}

/// One layer of the manifest. `visible` and `opacity` default to the
/// editor's new-layer defaults.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct LayerEntry {
    pub name: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default = "default_opacity")]
    pub opacity: u8,
    /// Sparse frame index -> PNG path.
    pub frames: BTreeMap<u64, PathBuf>,
}

fn default_visible() -> bool {
    true
}

fn default_opacity() -> u8 {
    100
}

impl ExportManifest {
    /// Read and parse a manifest from `path`.
    pub fn load(path: &Path) -> BellezaResult<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open manifest '{}'", path.display()))?;
        let manifest: Self = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            BellezaError::validation(format!("failed to parse manifest '{}': {e}", path.display()))
        })?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn validate(&self) -> BellezaResult<()> {
        self.canvas.validate()?;
        self.fps.validate()?;
        for entry in &self.layers {
            if entry.name.trim().is_empty() {
                return Err(BellezaError::validation("layer name must be non-empty"));
            }
            if entry.opacity > 100 {
                return Err(BellezaError::validation(format!(
                    "layer '{}' has opacity {} > 100",
                    entry.name, entry.opacity
                )));
            }
        }
        Ok(())
    }

    /// Decode every referenced PNG and assemble the layer stack.
    ///
    /// Each image must match the canvas size exactly; pixels are converted
    /// from straight to premultiplied alpha on load.
    pub fn build_stack(&self, root: &Path) -> BellezaResult<LayerStack> {
        let mut stack = LayerStack::new();
        for entry in &self.layers {
            let mut layer = Layer::new(&entry.name);
            layer.visible = entry.visible;
            layer.set_opacity(entry.opacity);

            for (&index, source) in &entry.frames {
                let path = root.join(source);
                let img = image::open(&path)
                    .with_context(|| {
                        format!(
                            "failed to load frame {} of layer '{}' from '{}'",
                            index,
                            entry.name,
                            path.display()
                        )
                    })?
                    .to_rgba8();

                if img.width() != self.canvas.width || img.height() != self.canvas.height {
                    return Err(BellezaError::validation(format!(
                        "frame {} of layer '{}' is {}x{}, canvas is {}x{}",
                        index,
                        entry.name,
                        img.width(),
                        img.height(),
                        self.canvas.width,
                        self.canvas.height
                    )));
                }

                let raster =
                    Raster::from_straight_rgba8(img.width(), img.height(), img.as_raw())?;
                layer.frames.insert(FrameIndex(index), raster);
            }

            stack.add_layer(layer);
        }
        Ok(stack)
    }
}

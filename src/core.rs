use crate::error::{BellezaError, BellezaResult};

/// Absolute 0-based frame index on the animation timeline.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl std::fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Integer frames-per-second, as configured by the playback-speed control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps(pub u32);

impl Fps {
    /// Create a validated FPS value.
    pub fn new(fps: u32) -> BellezaResult<Self> {
        let fps = Self(fps);
        fps.validate()?;
        Ok(fps)
    }

    pub fn validate(&self) -> BellezaResult<()> {
        if self.0 == 0 {
            return Err(BellezaError::validation("fps must be > 0"));
        }
        Ok(())
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        1.0 / f64::from(self.0)
    }
}

/// Output canvas: dimensions in pixels plus the background color every
/// flattened frame is seeded with.
///
/// The background is conceptually layer zero — always present, always at the
/// very bottom, and always treated as fully opaque regardless of the alpha
/// stored here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Background color (RGBA8, straight alpha; alpha is ignored).
    pub background: [u8; 4],
}

impl Canvas {
    /// Create a canvas with the given dimensions and background color.
    pub fn new(width: u32, height: u32, background: [u8; 4]) -> Self {
        Self {
            width,
            height,
            background,
        }
    }

    pub fn validate(&self) -> BellezaResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(BellezaError::validation("canvas width/height must be > 0"));
        }
        Ok(())
    }

    /// Background as an opaque premultiplied pixel.
    pub fn background_premul(&self) -> Rgba8Premul {
        let [r, g, b, _] = self.background;
        Rgba8Premul { r, g, b, a: 255 }
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
